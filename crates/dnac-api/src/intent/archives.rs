// Configuration-archive endpoints
//
// The cluster snapshots device configurations into a per-device archive
// of versions, each holding running/startup config files. Writes are
// task-backed: the POST/DELETE answers with a task id and the outcome
// only shows up once the task goes terminal.

use serde_json::json;
use tracing::debug;
use url::Url;

use crate::client::DnacClient;
use crate::error::Error;
use crate::intent::models::{
    ArchiveListing, ArchiveSummary, ArchiveVersion, TaskInfo, TaskReference, VersionListing,
};
use crate::poll::PollPolicy;

/// Which configuration kinds to snapshot into the archive.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveSelection {
    pub running: bool,
    pub startup: bool,
}

impl Default for ArchiveSelection {
    fn default() -> Self {
        Self {
            running: true,
            startup: false,
        }
    }
}

impl DnacClient {
    fn archive_url(&self) -> Result<Url, Error> {
        let path = self
            .version()
            .archive_path()
            .ok_or(Error::UnsupportedVersion {
                version: self.version(),
                resource: "archive-config",
            })?;
        self.url(path)
    }

    fn device_archive_url(&self, suffix: &str) -> Result<Url, Error> {
        let path = self
            .version()
            .device_archive_path()
            .ok_or(Error::UnsupportedVersion {
                version: self.version(),
                resource: "archive-config/network-device",
            })?;
        self.url(&format!("{path}{suffix}"))
    }

    /// List the cluster-wide configuration archive.
    ///
    /// `GET /api/v1/archive-config`, answered as
    /// `{"archiveResultlist": [...]}` with one entry per device.
    pub async fn list_archives(&self) -> Result<Vec<ArchiveSummary>, Error> {
        let url = self.archive_url()?;
        debug!("listing configuration archives");
        let listing: ArchiveListing = self.get(url).await?;
        Ok(listing.archive_result_list)
    }

    /// List the archived versions for one device.
    ///
    /// `GET /api/v1/archive-config/network-device/{id}/version`
    pub async fn list_archive_versions(
        &self,
        device_id: &str,
    ) -> Result<Vec<ArchiveVersion>, Error> {
        let url = self.device_archive_url(&format!("/{device_id}/version"))?;
        debug!(device_id, "listing archive versions");
        let listing: VersionListing = self.get(url).await?;
        Ok(listing.versions)
    }

    /// Fetch one archived version with its config file manifest.
    ///
    /// `GET /api/v1/archive-config/network-device/{id}/version/{vid}`
    pub async fn get_archive_version(
        &self,
        device_id: &str,
        version_id: &str,
    ) -> Result<ArchiveVersion, Error> {
        let url = self.device_archive_url(&format!("/{device_id}/version/{version_id}"))?;
        let listing: VersionListing = self.get(url).await?;
        listing
            .versions
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound {
                what: format!("archive version {version_id} for device {device_id}"),
            })
    }

    /// Snapshot device configurations into the archive and wait for the
    /// cluster-side task.
    ///
    /// `POST /api/v1/archive-config` with the device list and the
    /// selected config kinds. The `vlan` and `all` kinds are pinned off:
    /// the cluster fails the task when they are requested.
    pub async fn archive_device_configs(
        &self,
        device_ids: &[String],
        selection: ArchiveSelection,
        policy: &PollPolicy,
    ) -> Result<TaskInfo, Error> {
        if device_ids.is_empty() {
            return Err(Error::InvalidRequest {
                message: "archive request needs at least one device".into(),
            });
        }

        let url = self.archive_url()?;
        let body = json!({
            "deviceIds": device_ids,
            "configFileType": {
                "startupconfig": selection.startup,
                "runningconfig": selection.running,
                "vlan": false,
                "all": false,
            },
        });
        debug!(devices = device_ids.len(), "archiving device configs");

        let task: TaskReference = self.post_enveloped(url, &body).await?;
        self.wait_for_task(&task.task_id, policy).await
    }

    /// Delete one archived version, waiting for the cluster-side task.
    ///
    /// `DELETE /api/v1/archive-config/network-device/{id}/version/{vid}`
    pub async fn delete_archive_version(
        &self,
        device_id: &str,
        version_id: &str,
        policy: &PollPolicy,
    ) -> Result<TaskInfo, Error> {
        let url = self.device_archive_url(&format!("/{device_id}/version/{version_id}"))?;
        debug!(device_id, version_id, "deleting archive version");
        let task: TaskReference = self.delete_enveloped(url).await?;
        self.wait_for_task(&task.task_id, policy).await
    }

    /// Delete one config file from an archived version, waiting for the
    /// cluster-side task.
    pub async fn delete_config_file(
        &self,
        device_id: &str,
        version_id: &str,
        file_id: &str,
        policy: &PollPolicy,
    ) -> Result<TaskInfo, Error> {
        let url = self
            .device_archive_url(&format!("/{device_id}/version/{version_id}/file/{file_id}"))?;
        debug!(device_id, version_id, file_id, "deleting config file");
        let task: TaskReference = self.delete_enveloped(url).await?;
        self.wait_for_task(&task.task_id, policy).await
    }

    /// Download the raw text of an archived configuration file.
    ///
    /// Config files come back as plain text, unlike task results files.
    pub async fn download_config_file(&self, file_id: &str) -> Result<String, Error> {
        self.download_file_text(file_id).await
    }
}
