// Template-programmer endpoints
//
// Template catalog reads, versioned-template resolution, deployment with
// status polling, and project import/export. The deploy response shape
// changed across releases: 1.2.8 answers with a deploymentId sentence,
// later trains answer with a task reference whose terminal progress
// carries the deployment id.

use serde_json::json;
use tracing::debug;
use url::Url;

use crate::auth::ClusterVersion;
use crate::client::DnacClient;
use crate::error::Error;
use crate::intent::models::{
    DeploymentState, DeploymentStatus, Project, TargetInfo, TaskInfo, TaskReference,
    TemplateSummary, VersionedTemplate,
};
use crate::poll::{self, PollPolicy};

/// Marker the cluster embeds in a deploy task's progress when an
/// identical deployment already exists.
const ALREADY_DEPLOYED: &str = "already deployed with same params";

/// A template push: which committed version to apply, and to which
/// targets.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    /// UUID of the committed (versioned) template.
    pub template_id: String,
    /// Devices to push to, each with its parameter values.
    pub targets: Vec<TargetInfo>,
}

/// The deploy POST answers with one of two shapes depending on release.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeployReply {
    #[serde(default)]
    deployment_id: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    task_id: Option<String>,
}

impl DnacClient {
    fn template_url(&self, suffix: &str) -> Result<Url, Error> {
        let path = self.version().template_path();
        self.url(&format!("{path}{suffix}"))
    }

    fn deploy_status_url(&self, deployment_id: &str) -> Result<Url, Error> {
        let path = self.version().deploy_status_path();
        self.url(&format!("{path}/{deployment_id}"))
    }

    fn project_url(&self, suffix: &str) -> Result<Url, Error> {
        let path = self
            .version()
            .project_path()
            .ok_or(Error::UnsupportedVersion {
                version: self.version(),
                resource: "template-programmer/project",
            })?;
        self.url(&format!("{path}{suffix}"))
    }

    // ── Catalog reads ────────────────────────────────────────────────

    /// List the template catalog.
    ///
    /// `GET /api/v2/template-programmer/template` (v1 on 1.2.8). The
    /// template-programmer family answers with bare JSON, no envelope.
    pub async fn list_templates(&self) -> Result<Vec<TemplateSummary>, Error> {
        let url = self.template_url("")?;
        debug!("listing templates");
        self.get(url).await
    }

    /// Find a catalog entry by template name.
    pub async fn get_template_by_name(&self, name: &str) -> Result<TemplateSummary, Error> {
        let templates = self.list_templates().await?;
        templates
            .into_iter()
            .find(|t| t.name == name)
            .ok_or_else(|| Error::NotFound {
                what: format!("template {name}"),
            })
    }

    /// Fetch the full body of one committed template version.
    ///
    /// `GET /api/v2/template-programmer/template/{versioned_id}`
    pub async fn get_versioned_template(&self, id: &str) -> Result<VersionedTemplate, Error> {
        let url = self.template_url(&format!("/{id}"))?;
        self.get(url).await
    }

    /// Resolve a template name plus version number to the committed
    /// template body.
    ///
    /// `version` 0 selects the latest committed version. A version the
    /// template never committed maps to [`Error::NotFound`].
    pub async fn resolve_versioned_template(
        &self,
        name: &str,
        version: u32,
    ) -> Result<VersionedTemplate, Error> {
        let summary = self.get_template_by_name(name).await?;

        let picked = if version == 0 {
            summary
                .versions_info
                .iter()
                .max_by_key(|v| v.number().unwrap_or(0))
        } else {
            summary
                .versions_info
                .iter()
                .find(|v| v.number() == Some(version))
        };

        let versioned_id = picked.map(|v| v.id.clone()).ok_or_else(|| Error::NotFound {
            what: format!("template {name} version {version}"),
        })?;

        self.get_versioned_template(&versioned_id).await
    }

    // ── Deployment ───────────────────────────────────────────────────

    /// Push a template without waiting for the job to finish.
    ///
    /// `POST /api/v2/template-programmer/template/deploy`. Returns the
    /// deployment id for use with
    /// [`check_deployment`](Self::check_deployment).
    pub async fn deploy_template(&self, req: &DeployRequest) -> Result<String, Error> {
        let reply = self.submit_deploy(req).await?;
        self.resolve_deployment_id(&req.template_id, reply, None)
            .await
    }

    /// Push a template and poll the deployment until it leaves `INIT`.
    ///
    /// `FAILURE` maps to [`Error::DeploymentFailed`]; exceeding the
    /// policy's deadline maps to [`Error::PollTimeout`].
    pub async fn deploy_template_sync(
        &self,
        req: &DeployRequest,
        policy: &PollPolicy,
    ) -> Result<DeploymentStatus, Error> {
        let reply = self.submit_deploy(req).await?;
        let deployment_id = self
            .resolve_deployment_id(&req.template_id, reply, Some(policy))
            .await?;

        let status =
            poll::poll_until(policy, || self.probe_deployment(&deployment_id)).await?;

        if status.status == DeploymentState::Failure {
            return Err(Error::DeploymentFailed {
                deployment_id,
                status: format!("{:?}", status.status),
            });
        }
        Ok(status)
    }

    /// Probe a deployment's status once.
    ///
    /// `GET .../template/deploy/status/{id}`. Bare JSON, no envelope.
    pub async fn check_deployment(&self, deployment_id: &str) -> Result<DeploymentStatus, Error> {
        let url = self.deploy_status_url(deployment_id)?;
        debug!(deployment_id, "checking deployment");
        self.get(url).await
    }

    async fn probe_deployment(
        &self,
        deployment_id: &str,
    ) -> Result<Option<DeploymentStatus>, Error> {
        let status = self.check_deployment(deployment_id).await?;
        Ok((status.status != DeploymentState::Init).then_some(status))
    }

    async fn submit_deploy(&self, req: &DeployRequest) -> Result<DeployReply, Error> {
        if req.template_id.is_empty() {
            return Err(Error::InvalidRequest {
                message: "deployment needs a versioned template id".into(),
            });
        }
        if req.targets.is_empty() || req.targets.iter().any(|t| t.id.is_empty()) {
            return Err(Error::InvalidRequest {
                message: "deployment needs at least one target with a non-empty id".into(),
            });
        }

        let url = self.template_url("/deploy")?;
        let body = deploy_body(self.version(), req);
        debug!(template_id = %req.template_id, targets = req.targets.len(), "deploying template");
        self.post_enveloped(url, &body).await
    }

    /// Turn a deploy reply into a deployment id.
    ///
    /// 1.2.8 answers with a `deploymentId` sentence whose last token is
    /// the id. Later trains answer with a task reference; the id is the
    /// last colon-separated element of the task's progress. With a
    /// policy the task is polled to terminal first; without one it is
    /// read once (the original asynchronous behavior).
    async fn resolve_deployment_id(
        &self,
        template_id: &str,
        reply: DeployReply,
        wait: Option<&PollPolicy>,
    ) -> Result<String, Error> {
        if let Some(sentence) = reply.deployment_id {
            let id = sentence
                .split_whitespace()
                .last()
                .unwrap_or(sentence.as_str());
            return Ok(id.to_owned());
        }

        let task_id = reply
            .task_id
            .or_else(|| {
                reply
                    .url
                    .as_deref()
                    .and_then(|u| u.rsplit('/').next())
                    .map(str::to_owned)
            })
            .ok_or_else(|| Error::Deserialization {
                message: "deploy reply carried neither deploymentId nor a task reference".into(),
                body: String::new(),
            })?;

        let task: TaskInfo = match wait {
            Some(policy) => self.wait_for_task(&task_id, policy).await?,
            None => self.check_task(&task_id).await?,
        };

        deployment_id_from_progress(template_id, &task.progress)
    }

    // ── Projects ─────────────────────────────────────────────────────

    /// List template-programmer projects.
    ///
    /// `GET /api/v2/template-programmer/project` (1.3.1.x only).
    pub async fn list_projects(&self) -> Result<Vec<Project>, Error> {
        let url = self.project_url("")?;
        debug!("listing projects");
        self.get(url).await
    }

    /// Find a project by name using the `?name=` filter.
    pub async fn get_project_by_name(&self, name: &str) -> Result<Project, Error> {
        let url = self.project_url("")?;
        let projects: Vec<Project> = self
            .get_with_params(url, &[("name", name.to_owned())])
            .await?;
        projects
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::NotFound {
                what: format!("project {name}"),
            })
    }

    /// Export a project and its templates as a portable JSON value.
    pub async fn export_project(&self, name: &str) -> Result<Project, Error> {
        self.get_project_by_name(name).await
    }

    /// Import a project definition, waiting for the cluster-side task.
    ///
    /// `POST /api/v2/template-programmer/project` with the project body;
    /// the task's failure reason surfaces as [`Error::TaskFailed`].
    pub async fn import_project(
        &self,
        project: &Project,
        policy: &PollPolicy,
    ) -> Result<TaskInfo, Error> {
        let url = self.project_url("")?;
        debug!(name = %project.name, "importing project");
        let task: TaskReference = self.post_enveloped(url, project).await?;
        self.wait_for_task(&task.task_id, policy).await
    }
}

/// Build the deploy body for the configured release. 1.2.8 used
/// snake_case keys; 1.2.10 onward uses camelCase.
fn deploy_body(version: ClusterVersion, req: &DeployRequest) -> serde_json::Value {
    match version {
        ClusterVersion::V1_2_8 => json!({
            "template_id": req.template_id,
            "target_info": req.targets,
        }),
        _ => json!({
            "templateId": req.template_id,
            "targetInfo": req.targets,
        }),
    }
}

/// The deploy task reports progress as a colon-separated sentence whose
/// last element is the deployment id, e.g.
/// `"Template Deployment Tasks: ... : <uuid>"`.
fn deployment_id_from_progress(template_id: &str, progress: &str) -> Result<String, Error> {
    if progress.contains(ALREADY_DEPLOYED) {
        return Err(Error::AlreadyDeployed {
            template: template_id.to_owned(),
        });
    }
    progress
        .rsplit(':')
        .next()
        .map(|id| id.trim().to_owned())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::Deserialization {
            message: format!("no deployment id in task progress: {progress}"),
            body: progress.to_owned(),
        })
}
