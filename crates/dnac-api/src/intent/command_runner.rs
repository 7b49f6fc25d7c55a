// Command-runner endpoints
//
// Read-only CLI execution against managed devices. A POST spawns a task;
// the task's terminal progress names a results file holding the
// per-device output.

use serde::Serialize;
use tracing::debug;

use crate::client::DnacClient;
use crate::error::Error;
use crate::intent::models::{CommandOutput, TaskReference};
use crate::poll::PollPolicy;

/// A set of CLI commands to run across a set of devices.
///
/// Serializes to the read-request body:
/// `{"commands": [...], "deviceUuids": [...]}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandBatch {
    commands: Vec<String>,
    device_uuids: Vec<String>,
}

impl CommandBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// One command against one device.
    pub fn single(command: impl Into<String>, device_uuid: impl Into<String>) -> Self {
        Self {
            commands: vec![command.into()],
            device_uuids: vec![device_uuid.into()],
        }
    }

    /// Add a command to the batch.
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.commands.push(command.into());
        self
    }

    /// Add a target device to the batch.
    pub fn device(mut self, device_uuid: impl Into<String>) -> Self {
        self.device_uuids.push(device_uuid.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() || self.device_uuids.is_empty()
    }
}

impl DnacClient {
    /// Submit a command batch without waiting for it to run.
    ///
    /// `POST /dna/intent/api/v1/network-device-poller/cli/read-request`
    /// (the pre-intent path on 1.2.8). Returns the spawned task's
    /// reference; monitor it with
    /// [`wait_for_task`](Self::wait_for_task) or fetch the output with
    /// [`task_result_file`](Self::task_result_file).
    pub async fn run_commands(&self, batch: &CommandBatch) -> Result<TaskReference, Error> {
        if batch.is_empty() {
            return Err(Error::InvalidRequest {
                message: "command batch needs at least one command and one device".into(),
            });
        }

        let url = self.url(self.version().command_runner_path())?;
        debug!(
            commands = batch.commands.len(),
            devices = batch.device_uuids.len(),
            "submitting command batch"
        );
        self.post_enveloped(url, batch).await
    }

    /// Submit a command batch and block until the output is available.
    ///
    /// Spawns the task, polls it per `policy`, then downloads and
    /// deserializes the results file.
    pub async fn run_commands_sync(
        &self,
        batch: &CommandBatch,
        policy: &PollPolicy,
    ) -> Result<Vec<CommandOutput>, Error> {
        let task = self.run_commands(batch).await?;
        self.task_result_file(&task.task_id, policy).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn batch_serializes_to_read_request_body() {
        let batch = CommandBatch::new()
            .command("show version")
            .command("show ip interface brief")
            .device("84e4b133-2668-4705-8163-5694c84e78fb");

        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "commands": ["show version", "show ip interface brief"],
                "deviceUuids": ["84e4b133-2668-4705-8163-5694c84e78fb"]
            })
        );
    }

    #[test]
    fn batch_without_devices_is_empty() {
        let batch = CommandBatch::new().command("show version");
        assert!(batch.is_empty());
        assert!(!CommandBatch::single("show clock", "uuid").is_empty());
    }
}
