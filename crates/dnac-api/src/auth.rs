use std::fmt;
use std::str::FromStr;

use secrecy::SecretString;

use crate::error::Error;

/// Credentials for the initial basic-auth login against the token endpoint.
///
/// The password lives in a [`SecretString`] so it is redacted from `Debug`
/// output and never serialized by accident. After login the client only
/// carries the issued token; these credentials are kept around solely for
/// expiry-triggered re-authentication.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// The release train of the DNA Center cluster being addressed.
///
/// Resource paths moved around between releases (`/api/v1/...` vs
/// `/dna/intent/api/v1/...`, template-programmer v1 vs v2), so every
/// endpoint family asks this enum for its path. A resource that a release
/// does not publish returns `None` and surfaces as
/// [`Error::UnsupportedVersion`](crate::Error::UnsupportedVersion).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterVersion {
    V1_2_8,
    V1_2_10,
    V1_3_0_2,
    V1_3_0_3,
    V1_3_1_3,
    V1_3_1_4,
}

impl ClusterVersion {
    /// Network inventory: `GET /dna/intent/api/v1/network-device`
    pub fn network_device_path(self) -> &'static str {
        "/dna/intent/api/v1/network-device"
    }

    /// Assurance device detail. Not published on 1.2.8.
    pub fn device_detail_path(self) -> Option<&'static str> {
        match self {
            Self::V1_2_8 => None,
            _ => Some("/dna/intent/api/v1/device-detail"),
        }
    }

    /// Command-runner read requests. 1.2.8 predates the intent prefix.
    pub fn command_runner_path(self) -> &'static str {
        match self {
            Self::V1_2_8 => "/api/v1/network-device-poller/cli/read-request",
            _ => "/dna/intent/api/v1/network-device-poller/cli/read-request",
        }
    }

    /// Task status probes.
    pub fn task_path(self) -> &'static str {
        "/api/v1/task"
    }

    /// Task result files.
    pub fn file_path(self) -> &'static str {
        match self {
            Self::V1_2_8 => "/api/v1/file",
            _ => "/dna/intent/api/v1/file",
        }
    }

    /// Template-programmer templates. v2 from 1.2.10 onward.
    pub fn template_path(self) -> &'static str {
        match self {
            Self::V1_2_8 => "/api/v1/template-programmer/template",
            _ => "/api/v2/template-programmer/template",
        }
    }

    /// Template deployment status.
    pub fn deploy_status_path(self) -> &'static str {
        match self {
            Self::V1_3_1_4 => "/dna/intent/api/v1/template-programmer/template/deploy/status",
            _ => "/api/v1/template-programmer/template/deploy/status",
        }
    }

    /// Template-programmer projects. Only published on the 1.3.1.x trains.
    pub fn project_path(self) -> Option<&'static str> {
        match self {
            Self::V1_3_1_3 | Self::V1_3_1_4 => Some("/api/v2/template-programmer/project"),
            _ => None,
        }
    }

    /// Cluster-wide configuration archive. Not published on 1.2.8.
    pub fn archive_path(self) -> Option<&'static str> {
        match self {
            Self::V1_2_8 => None,
            _ => Some("/api/v1/archive-config"),
        }
    }

    /// Per-device configuration archive. Not published on 1.2.8.
    pub fn device_archive_path(self) -> Option<&'static str> {
        match self {
            Self::V1_2_8 => None,
            _ => Some("/api/v1/archive-config/network-device"),
        }
    }

    /// Assurance site health. Not published on 1.2.8.
    pub fn site_health_path(self) -> Option<&'static str> {
        match self {
            Self::V1_2_8 => None,
            _ => Some("/dna/intent/api/v1/site-health"),
        }
    }

    /// Assurance client detail. Not published on 1.2.8.
    pub fn client_detail_path(self) -> Option<&'static str> {
        match self {
            Self::V1_2_8 => None,
            _ => Some("/dna/intent/api/v1/client-detail"),
        }
    }
}

impl fmt::Display for ClusterVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::V1_2_8 => "1.2.8",
            Self::V1_2_10 => "1.2.10",
            Self::V1_3_0_2 => "1.3.0.2",
            Self::V1_3_0_3 => "1.3.0.3",
            Self::V1_3_1_3 => "1.3.1.3",
            Self::V1_3_1_4 => "1.3.1.4",
        };
        f.write_str(s)
    }
}

impl FromStr for ClusterVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1.2.8" => Ok(Self::V1_2_8),
            "1.2.10" => Ok(Self::V1_2_10),
            "1.3.0.2" => Ok(Self::V1_3_0_2),
            "1.3.0.3" => Ok(Self::V1_3_0_3),
            "1.3.1.3" => Ok(Self::V1_3_1_3),
            "1.3.1.4" => Ok(Self::V1_3_1_4),
            other => Err(Error::UnknownVersion(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn version_round_trips_through_strings() {
        for s in ["1.2.8", "1.2.10", "1.3.0.2", "1.3.0.3", "1.3.1.3", "1.3.1.4"] {
            let v: ClusterVersion = s.parse().expect("supported version");
            assert_eq!(v.to_string(), s);
        }
    }

    #[test]
    fn unknown_version_is_rejected() {
        let err = "2.1.0".parse::<ClusterVersion>().unwrap_err();
        assert!(matches!(err, Error::UnknownVersion(v) if v == "2.1.0"));
    }

    #[test]
    fn legacy_release_misses_newer_resources() {
        let v = ClusterVersion::V1_2_8;
        assert!(v.device_detail_path().is_none());
        assert!(v.archive_path().is_none());
        assert!(v.site_health_path().is_none());
        assert_eq!(
            v.command_runner_path(),
            "/api/v1/network-device-poller/cli/read-request"
        );
        assert_eq!(v.template_path(), "/api/v1/template-programmer/template");
    }

    #[test]
    fn current_release_uses_intent_paths() {
        let v = ClusterVersion::V1_3_1_4;
        assert_eq!(
            v.command_runner_path(),
            "/dna/intent/api/v1/network-device-poller/cli/read-request"
        );
        assert_eq!(v.file_path(), "/dna/intent/api/v1/file");
        assert!(v.deploy_status_path().starts_with("/dna/intent/"));
    }
}
