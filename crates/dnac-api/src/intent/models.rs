//! Response types for the intent and system API families.
//!
//! Field names use camelCase via `#[serde(rename_all = "camelCase")]`.
//! `#[serde(default)]` is applied liberally because the cluster is
//! inconsistent about field presence across release trains; each model
//! keeps a `#[serde(flatten)] extra` catch-all for undocumented fields.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ── Response envelope ────────────────────────────────────────────────

/// Standard intent-API envelope: `{"response": ...}`.
///
/// Some endpoints also place a `version` string next to `response`;
/// nothing in this crate needs it, so it is ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub response: T,
}

// ── Network devices ──────────────────────────────────────────────────

/// Managed device from the network-device inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDevice {
    pub id: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub management_ip_address: Option<String>,
    #[serde(default)]
    pub mac_address: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub platform_id: Option<String>,
    #[serde(default)]
    pub software_version: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default, rename = "type")]
    pub device_type: Option<String>,
    #[serde(default)]
    pub reachability_status: Option<String>,
    #[serde(default)]
    pub up_time: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// VLAN attached to a device interface, from the `/{id}/vlan` sub-resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceVlan {
    #[serde(default)]
    pub vlan_number: Option<i64>,
    #[serde(default)]
    pub interface_name: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub mask: Option<i64>,
    #[serde(default)]
    pub network_address: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Assurance detail for one device, from the device-detail search.
///
/// The payload is almost entirely free-form; only the identity fields are
/// modeled, everything else lands in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDetail {
    #[serde(default)]
    pub nw_device_name: Option<String>,
    #[serde(default)]
    pub mac_address: Option<String>,
    #[serde(default)]
    pub management_ip_addr: Option<String>,
    #[serde(default)]
    pub platform_id: Option<String>,
    #[serde(default)]
    pub software_version: Option<String>,
    #[serde(default)]
    pub overall_health: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Asynchronous tasks ───────────────────────────────────────────────

/// Reference handed back by endpoints that spawn a task:
/// `{"response": {"taskId": "...", "url": "..."}}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskReference {
    pub task_id: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Status of a task from `GET /api/v1/task/{id}`.
///
/// A task is terminal once `end_time` is set; `is_error` and
/// `failure_reason` qualify the outcome. For command-runner tasks the
/// terminal `progress` is the JSON string `{"fileId": "<uuid>"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub progress: String,
    #[serde(default)]
    pub is_error: Option<bool>,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub start_time: Option<i64>,
    #[serde(default)]
    pub end_time: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TaskInfo {
    /// Whether the cluster has finished working on this task.
    pub fn is_terminal(&self) -> bool {
        self.end_time.is_some()
    }

    /// Whether the task ended in an error state.
    pub fn failed(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// Parse a `{"fileId": "<uuid>"}` terminal progress string.
    pub fn result_file_id(&self) -> Option<String> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Progress {
            file_id: String,
        }
        serde_json::from_str::<Progress>(&self.progress)
            .ok()
            .map(|p| p.file_id)
    }
}

// ── Command runner ───────────────────────────────────────────────────

/// Per-device CLI output stored in a task's results file.
///
/// The file is a JSON array with one entry per target device; each entry
/// buckets command output by outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutput {
    pub device_uuid: String,
    #[serde(default)]
    pub command_responses: CommandResponses,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Command output keyed by command string, bucketed by outcome.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandResponses {
    #[serde(default, rename = "SUCCESS")]
    pub success: HashMap<String, String>,
    #[serde(default, rename = "FAILURE")]
    pub failure: HashMap<String, String>,
    #[serde(default, rename = "BLACKLISTED")]
    pub blacklisted: HashMap<String, String>,
}

// ── Templates ────────────────────────────────────────────────────────

/// Catalog entry from the template-programmer listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub name: String,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub composite: Option<bool>,
    #[serde(default)]
    pub versions_info: Vec<TemplateVersionInfo>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One committed version of a template. The cluster reports the version
/// number as a string ("1", "2", ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVersionInfo {
    pub id: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub version_comment: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TemplateVersionInfo {
    /// The version number parsed out of the cluster's string form.
    pub fn number(&self) -> Option<u32> {
        self.version.as_deref().and_then(|v| v.parse().ok())
    }
}

/// Full body of one committed template version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionedTemplate {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub template_content: Option<String>,
    #[serde(default)]
    pub template_params: Vec<serde_json::Value>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub software_type: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// How the cluster should interpret a deployment target's `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetKind {
    Default,
    ManagedDeviceUuid,
    ManagedDeviceHostname,
    ManagedDeviceIp,
    PreProvisionedSerial,
    PreProvisionedMac,
}

/// One deployment target: a device identifier plus template parameters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TargetKind,
    pub params: serde_json::Map<String, serde_json::Value>,
}

/// State reported for a template deployment job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeploymentState {
    #[serde(rename = "INIT")]
    Init,
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "FAILURE")]
    Failure,
    #[serde(other)]
    Unknown,
}

/// Status of a deployment job from the deploy-status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStatus {
    #[serde(default)]
    pub deployment_id: Option<String>,
    #[serde(default = "DeploymentStatus::default_state")]
    pub status: DeploymentState,
    #[serde(default)]
    pub devices: Vec<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DeploymentStatus {
    fn default_state() -> DeploymentState {
        DeploymentState::Unknown
    }
}

/// Template-programmer project (a folder of templates).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_deletable: Option<bool>,
    #[serde(default)]
    pub tags: Vec<serde_json::Value>,
    #[serde(default)]
    pub templates: Vec<TemplateSummary>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Configuration archive ────────────────────────────────────────────

/// One device's entry in the cluster-wide archive listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveSummary {
    pub device_id: String,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub versions: Vec<ArchiveVersion>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The cluster-wide archive listing: `{"archiveResultlist": [...]}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ArchiveListing {
    #[serde(default, rename = "archiveResultlist")]
    pub archive_result_list: Vec<ArchiveSummary>,
}

/// A per-device archive version listing: `{"versions": [...]}`.
#[derive(Debug, Deserialize)]
pub(crate) struct VersionListing {
    #[serde(default)]
    pub versions: Vec<ArchiveVersion>,
}

/// One archived snapshot of a device's configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveVersion {
    pub id: String,
    #[serde(default)]
    pub created_time: Option<i64>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub startup_running_status: Option<String>,
    #[serde(default)]
    pub files: Vec<ConfigFile>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A configuration file inside an archive version.
///
/// `file_type` is one of `RUNNINGCONFIG`, `STARTUPCONFIG`, or `VLAN`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub file_id: String,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub created_time: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Sites ────────────────────────────────────────────────────────────

/// Health summary for one site from the site-health listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteHealth {
    pub site_name: String,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub site_type: Option<String>,
    #[serde(default)]
    pub parent_site_name: Option<String>,
    #[serde(default)]
    pub network_health_average: Option<f64>,
    #[serde(default)]
    pub healthy_clients_percentage: Option<f64>,
    #[serde(default)]
    pub number_of_network_device: Option<i64>,
    #[serde(default)]
    pub number_of_clients: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Clients ──────────────────────────────────────────────────────────

/// Assurance detail for one client endpoint, keyed by MAC address.
///
/// The response is a composite of host detail, connection topology, and
/// health scores; only the host identity is modeled explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDetail {
    #[serde(default)]
    pub detail: Option<ClientHost>,
    #[serde(default)]
    pub connection_info: Option<serde_json::Value>,
    #[serde(default)]
    pub topology: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Host identity block inside [`ClientDetail`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientHost {
    #[serde(default)]
    pub host_mac: Option<String>,
    #[serde(default)]
    pub host_name: Option<String>,
    #[serde(default)]
    pub host_ip_v4: Option<String>,
    #[serde(default)]
    pub host_type: Option<String>,
    #[serde(default)]
    pub connection_status: Option<String>,
    #[serde(default)]
    pub ssid: Option<String>,
    #[serde(default)]
    pub health_score: Vec<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn task_progress_file_id_parses() {
        let task: TaskInfo = serde_json::from_value(serde_json::json!({
            "id": "t1",
            "progress": "{\"fileId\": \"6e9e1261-f088-4e9c-b2a0-8f006c682694\"}",
            "isError": false,
            "startTime": 1_560_000_000_000_i64,
            "endTime": 1_560_000_003_000_i64
        }))
        .unwrap();

        assert!(task.is_terminal());
        assert!(!task.failed());
        assert_eq!(
            task.result_file_id().as_deref(),
            Some("6e9e1261-f088-4e9c-b2a0-8f006c682694")
        );
    }

    #[test]
    fn task_in_creation_has_no_file_id() {
        let task: TaskInfo = serde_json::from_value(serde_json::json!({
            "progress": "CLI Runner request creation"
        }))
        .unwrap();

        assert!(!task.is_terminal());
        assert_eq!(task.result_file_id(), None);
    }

    #[test]
    fn template_version_number_parses_from_string() {
        let info: TemplateVersionInfo = serde_json::from_value(serde_json::json!({
            "id": "v-uuid",
            "version": "3"
        }))
        .unwrap();
        assert_eq!(info.number(), Some(3));
    }

    #[test]
    fn deployment_state_tolerates_unknown_values() {
        let status: DeploymentStatus = serde_json::from_value(serde_json::json!({
            "deploymentId": "d1",
            "status": "IN_PROGRESS"
        }))
        .unwrap();
        assert_eq!(status.status, DeploymentState::Unknown);
    }

    #[test]
    fn target_kind_serializes_to_screaming_snake() {
        let json = serde_json::to_value(TargetKind::ManagedDeviceUuid).unwrap();
        assert_eq!(json, "MANAGED_DEVICE_UUID");
        let json = serde_json::to_value(TargetKind::PreProvisionedMac).unwrap();
        assert_eq!(json, "PRE_PROVISIONED_MAC");
    }

    #[test]
    fn command_responses_bucket_by_outcome() {
        let output: CommandOutput = serde_json::from_value(serde_json::json!({
            "deviceUuid": "dev-1",
            "commandResponses": {
                "SUCCESS": { "show version": "Cisco IOS XE ..." },
                "FAILURE": {},
                "BLACKLISTED": { "reload": "command disallowed" }
            }
        }))
        .unwrap();

        assert_eq!(output.command_responses.success.len(), 1);
        assert_eq!(output.command_responses.blacklisted.len(), 1);
        assert!(output.command_responses.failure.is_empty());
    }
}
