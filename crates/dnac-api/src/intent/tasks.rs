// Task status and results endpoints
//
// Every mutating intent operation runs asynchronously: the cluster hands
// back a task id, the task eventually goes terminal, and for some task
// kinds the results land in a downloadable file. This module owns the
// status probe, the wait loop built on `poll::poll_until`, and the file
// fetch.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::client::DnacClient;
use crate::error::Error;
use crate::intent::models::TaskInfo;
use crate::poll::{self, PollPolicy};

impl DnacClient {
    fn task_url(&self, task_id: &str) -> Result<Url, Error> {
        let path = self.version().task_path();
        self.url(&format!("{path}/{task_id}"))
    }

    fn file_url(&self, file_id: &str) -> Result<Url, Error> {
        let path = self.version().file_path();
        self.url(&format!("{path}/{file_id}"))
    }

    /// Probe a task's status once.
    ///
    /// `GET /api/v1/task/{id}`. Does not wait: callers inspect
    /// [`TaskInfo::is_terminal`] themselves or use
    /// [`wait_for_task`](Self::wait_for_task).
    pub async fn check_task(&self, task_id: &str) -> Result<TaskInfo, Error> {
        let url = self.task_url(task_id)?;
        debug!(task_id, "checking task");
        self.get_enveloped(url).await
    }

    /// Poll a task until it goes terminal, fails, or the policy's
    /// deadline passes.
    ///
    /// A task is terminal once the cluster stamps its `endTime`. A
    /// terminal task with `isError` set maps to [`Error::TaskFailed`]
    /// carrying the cluster's failure reason; running past
    /// `policy.timeout` maps to [`Error::PollTimeout`].
    pub async fn wait_for_task(
        &self,
        task_id: &str,
        policy: &PollPolicy,
    ) -> Result<TaskInfo, Error> {
        let info = poll::poll_until(policy, || self.probe_task(task_id)).await?;

        if info.failed() {
            return Err(Error::TaskFailed {
                task_id: task_id.to_owned(),
                progress: info.progress.clone(),
                reason: info
                    .failure_reason
                    .clone()
                    .unwrap_or_else(|| "unspecified failure".into()),
            });
        }
        Ok(info)
    }

    async fn probe_task(&self, task_id: &str) -> Result<Option<TaskInfo>, Error> {
        let info = self.check_task(task_id).await?;
        Ok(info.is_terminal().then_some(info))
    }

    /// Download a results file and deserialize its JSON content.
    ///
    /// `GET /dna/intent/api/v1/file/{id}` (the pre-intent path on 1.2.8).
    pub async fn download_file<T: DeserializeOwned>(&self, file_id: &str) -> Result<T, Error> {
        let url = self.file_url(file_id)?;
        debug!(file_id, "downloading results file");
        self.get(url).await
    }

    /// Download a results file as raw text (archived configs are served
    /// as plain text, not JSON).
    pub async fn download_file_text(&self, file_id: &str) -> Result<String, Error> {
        let url = self.file_url(file_id)?;
        debug!(file_id, "downloading file as text");
        self.get_text(url).await
    }

    /// Wait for a task, then fetch the results file its terminal
    /// progress points at.
    ///
    /// Task kinds that store results in a file report the file's UUID in
    /// their terminal `progress` string as `{"fileId": "<uuid>"}`.
    pub async fn task_result_file<T: DeserializeOwned>(
        &self,
        task_id: &str,
        policy: &PollPolicy,
    ) -> Result<T, Error> {
        let info = self.wait_for_task(task_id, policy).await?;
        let file_id = info.result_file_id().ok_or_else(|| Error::NotFound {
            what: format!(
                "results file for task {task_id} (progress: {})",
                info.progress
            ),
        })?;
        self.download_file(&file_id).await
    }
}
