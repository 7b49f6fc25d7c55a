#![allow(clippy::unwrap_used)]
// Integration tests for the template-programmer endpoints using wiremock.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dnac_api::intent::models::{TargetInfo, TargetKind};
use dnac_api::{ClusterVersion, Credentials, DeployRequest, DnacClient, Error, PollPolicy};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(version: ClusterVersion) -> (MockServer, DnacClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = DnacClient::with_client(
        reqwest::Client::new(),
        base_url,
        version,
        Credentials::new("admin", "test-password".to_owned()),
    );

    Mock::given(method("POST"))
        .and(path("/api/system/v1/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Token": "t" })))
        .mount(&server)
        .await;

    (server, client)
}

fn fast_policy() -> PollPolicy {
    PollPolicy::new(Duration::from_millis(10), Duration::from_secs(2))
}

fn catalog() -> serde_json::Value {
    json!([
        {
            "name": "Enable CTS Interfaces",
            "templateId": "tpl-1",
            "projectName": "Onboarding",
            "versionsInfo": [
                { "id": "tpl-1-v1", "version": "1" },
                { "id": "tpl-1-v2", "version": "2" }
            ]
        },
        {
            "name": "Create VRF",
            "templateId": "tpl-2",
            "projectName": "Routing",
            "versionsInfo": [ { "id": "tpl-2-v1", "version": "1" } ]
        }
    ])
}

fn deploy_request() -> DeployRequest {
    DeployRequest {
        template_id: "tpl-1-v2".into(),
        targets: vec![TargetInfo {
            id: "dev-1".into(),
            kind: TargetKind::ManagedDeviceUuid,
            params: serde_json::Map::new(),
        }],
    }
}

// ── Catalog tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_list_templates_is_bare_json() {
    let (server, client) = setup(ClusterVersion::V1_3_1_4).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/template-programmer/template"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog()))
        .mount(&server)
        .await;

    let templates = client.list_templates().await.unwrap();
    assert_eq!(templates.len(), 2);
    assert_eq!(templates[0].versions_info.len(), 2);
}

#[tokio::test]
async fn test_legacy_release_uses_v1_template_path() {
    let (server, client) = setup(ClusterVersion::V1_2_8).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/template-programmer/template"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let templates = client.list_templates().await.unwrap();
    assert!(templates.is_empty());
}

#[tokio::test]
async fn test_resolve_versioned_template_latest() {
    let (server, client) = setup(ClusterVersion::V1_3_1_4).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/template-programmer/template"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog()))
        .mount(&server)
        .await;

    // Version 0 selects the latest committed version (v2).
    Mock::given(method("GET"))
        .and(path("/api/v2/template-programmer/template/tpl-1-v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "tpl-1-v2",
            "name": "Enable CTS Interfaces",
            "templateContent": "cts credentials id $id password $pw",
            "templateParams": []
        })))
        .mount(&server)
        .await;

    let tpl = client
        .resolve_versioned_template("Enable CTS Interfaces", 0)
        .await
        .unwrap();
    assert_eq!(tpl.id, "tpl-1-v2");
    assert!(tpl.template_content.unwrap().starts_with("cts"));
}

#[tokio::test]
async fn test_resolve_versioned_template_unknown_version() {
    let (server, client) = setup(ClusterVersion::V1_3_1_4).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/template-programmer/template"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog()))
        .mount(&server)
        .await;

    let err = client
        .resolve_versioned_template("Create VRF", 9)
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "expected NotFound, got: {err:?}");

    let err = client
        .resolve_versioned_template("No Such Template", 0)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

// ── Deployment tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_deploy_template_sync_polls_to_success() {
    let (server, client) = setup(ClusterVersion::V1_3_1_4).await;

    // Deploy answers with a task reference (post-1.2.8 shape).
    Mock::given(method("POST"))
        .and(path("/api/v2/template-programmer/template/deploy"))
        .and(body_partial_json(json!({ "templateId": "tpl-1-v2" })))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "response": { "taskId": "task-d", "url": "/api/v1/task/task-d" }
        })))
        .mount(&server)
        .await;

    // The deploy task's terminal progress names the deployment id.
    Mock::given(method("GET"))
        .and(path("/api/v1/task/task-d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "id": "task-d",
                "progress": "Template Deployment Tasks: started: ok: deploy-42",
                "isError": false,
                "endTime": 1_560_000_003_000_i64
            }
        })))
        .mount(&server)
        .await;

    // Status: one INIT probe, then SUCCESS.
    Mock::given(method("GET"))
        .and(path(
            "/dna/intent/api/v1/template-programmer/template/deploy/status/deploy-42",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deploymentId": "deploy-42",
            "status": "INIT"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(
            "/dna/intent/api/v1/template-programmer/template/deploy/status/deploy-42",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deploymentId": "deploy-42",
            "status": "SUCCESS",
            "devices": [ { "deviceId": "dev-1", "status": "SUCCESS" } ]
        })))
        .mount(&server)
        .await;

    let status = client
        .deploy_template_sync(&deploy_request(), &fast_policy())
        .await
        .unwrap();

    assert_eq!(
        status.status,
        dnac_api::intent::models::DeploymentState::Success
    );
    assert_eq!(status.devices.len(), 1);
}

#[tokio::test]
async fn test_deploy_template_sync_surfaces_failure() {
    let (server, client) = setup(ClusterVersion::V1_3_1_4).await;

    Mock::given(method("POST"))
        .and(path("/api/v2/template-programmer/template/deploy"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "response": { "taskId": "task-d", "url": "/api/v1/task/task-d" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/task/task-d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "id": "task-d",
                "progress": "Template Deployment Tasks: started: ok: deploy-42",
                "isError": false,
                "endTime": 1_560_000_003_000_i64
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(
            "/dna/intent/api/v1/template-programmer/template/deploy/status/deploy-42",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deploymentId": "deploy-42",
            "status": "FAILURE"
        })))
        .mount(&server)
        .await;

    let err = client
        .deploy_template_sync(&deploy_request(), &fast_policy())
        .await
        .unwrap_err();

    assert!(
        matches!(err, Error::DeploymentFailed { ref deployment_id, .. } if deployment_id == "deploy-42"),
        "expected DeploymentFailed, got: {err:?}"
    );
}

#[tokio::test]
async fn test_deploy_detects_duplicate_deployment() {
    let (server, client) = setup(ClusterVersion::V1_3_1_4).await;

    Mock::given(method("POST"))
        .and(path("/api/v2/template-programmer/template/deploy"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "response": { "taskId": "task-d", "url": "/api/v1/task/task-d" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/task/task-d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "id": "task-d",
                "progress": "Deployment of template: already deployed with same params: tpl-1-v2",
                "isError": false,
                "endTime": 1_560_000_003_000_i64
            }
        })))
        .mount(&server)
        .await;

    let err = client.deploy_template(&deploy_request()).await.unwrap_err();
    assert!(
        matches!(err, Error::AlreadyDeployed { .. }),
        "expected AlreadyDeployed, got: {err:?}"
    );
}

#[tokio::test]
async fn test_deploy_rejects_empty_targets() {
    let (_server, client) = setup(ClusterVersion::V1_3_1_4).await;

    let req = DeployRequest {
        template_id: "tpl-1-v2".into(),
        targets: vec![],
    };
    let err = client.deploy_template(&req).await.unwrap_err();
    assert!(matches!(err, Error::InvalidRequest { .. }));
}

// ── Project tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_projects_are_version_gated() {
    let (_server, client) = setup(ClusterVersion::V1_2_10).await;

    let err = client.list_projects().await.unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedVersion {
            resource: "template-programmer/project",
            ..
        }
    ));
}

#[tokio::test]
async fn test_get_project_by_name() {
    let (server, client) = setup(ClusterVersion::V1_3_1_3).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/template-programmer/project"))
        .and(query_param("name", "Onboarding"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "name": "Onboarding",
                "id": "proj-1",
                "isDeletable": true,
                "templates": [ { "name": "Enable CTS Interfaces", "templateId": "tpl-1" } ]
            }
        ])))
        .mount(&server)
        .await;

    let project = client.get_project_by_name("Onboarding").await.unwrap();
    assert_eq!(project.id.as_deref(), Some("proj-1"));
    assert_eq!(project.templates.len(), 1);
}
