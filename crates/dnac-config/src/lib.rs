//! Cluster connection profiles for `dnac-api`.
//!
//! A TOML file plus `DNAC_*` environment overrides describe how to reach
//! one DNA Center cluster: address, release train, credentials, TLS.
//! [`ClusterConfig::connect`] turns a loaded profile into a ready
//! [`DnacClient`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dnac_api::{ClusterVersion, Credentials, DnacClient, TlsMode, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured (set user/password or DNAC_PASSWORD)")]
    NoCredentials,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Api(#[from] dnac_api::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Cluster profile ─────────────────────────────────────────────────

/// Connection settings for one DNA Center cluster.
///
/// The FQDN (`name`) is preferred over `ip` when both are set; leaving
/// both empty fails at [`base_url`](Self::base_url) time rather than
/// producing a half-built URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClusterConfig {
    /// FQDN of the cluster (preferred over `ip`).
    #[serde(default)]
    pub name: String,

    /// IPv4 address, used when no FQDN is available.
    #[serde(default)]
    pub ip: String,

    /// TCP port for the API.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Release train running on the cluster (e.g. "1.3.1.4").
    #[serde(default = "default_version")]
    pub version: String,

    /// Administrator account name.
    #[serde(default)]
    pub user: String,

    /// Password (plaintext -- prefer the DNAC_PASSWORD env var).
    #[serde(default)]
    pub password: Option<String>,

    /// Verify the cluster's TLS certificate. Off by default: lab
    /// clusters ship self-signed certificates.
    #[serde(default)]
    pub verify_tls: bool,

    /// Path to a custom CA certificate (implies verification).
    #[serde(default)]
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            ip: String::new(),
            port: default_port(),
            version: default_version(),
            user: String::new(),
            password: None,
            verify_tls: false,
            ca_cert: None,
            timeout: default_timeout(),
        }
    }
}

fn default_port() -> u16 {
    443
}
fn default_version() -> String {
    "1.3.1.4".into()
}
fn default_timeout() -> u64 {
    30
}

impl ClusterConfig {
    /// Parse the configured release train.
    pub fn cluster_version(&self) -> Result<ClusterVersion, ConfigError> {
        self.version
            .parse()
            .map_err(|_| ConfigError::Validation {
                field: "version".into(),
                reason: format!("unsupported release train: {}", self.version),
            })
    }

    /// Build the cluster base URL, preferring the FQDN over the IP.
    pub fn base_url(&self) -> Result<url::Url, ConfigError> {
        let fqdn = (!self.name.is_empty()).then_some(self.name.as_str());
        let ip = (!self.ip.is_empty()).then_some(self.ip.as_str());
        Ok(DnacClient::cluster_url(fqdn, ip, self.port)?)
    }

    /// Resolve login credentials.
    ///
    /// The `DNAC_PASSWORD` environment variable wins over the plaintext
    /// `password` field; with neither this is [`ConfigError::NoCredentials`].
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        if self.user.is_empty() {
            return Err(ConfigError::NoCredentials);
        }
        let password = std::env::var("DNAC_PASSWORD")
            .ok()
            .or_else(|| self.password.clone())
            .ok_or(ConfigError::NoCredentials)?;
        Ok(Credentials::new(self.user.clone(), password))
    }

    /// Translate the TLS and timeout settings into a `TransportConfig`.
    pub fn transport(&self) -> TransportConfig {
        let tls = if let Some(ref ca) = self.ca_cert {
            TlsMode::CustomCa(ca.clone())
        } else if self.verify_tls {
            TlsMode::System
        } else {
            TlsMode::DangerAcceptInvalid
        };
        TransportConfig {
            tls,
            timeout: Duration::from_secs(self.timeout),
        }
    }

    /// Build a ready-to-use client from this profile.
    ///
    /// No HTTP is issued; the client logs in lazily on first use.
    pub fn connect(&self) -> Result<DnacClient, ConfigError> {
        let client = DnacClient::new(
            self.base_url()?,
            self.cluster_version()?,
            self.credentials()?,
            &self.transport(),
        )?;
        Ok(client)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "dnac-rs", "dnac").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("dnac");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the cluster profile from the canonical path + environment.
///
/// Merge order: built-in defaults, then the TOML file, then `DNAC_*`
/// environment variables (e.g. `DNAC_NAME`, `DNAC_VERSION`, `DNAC_USER`).
pub fn load_config() -> Result<ClusterConfig, ConfigError> {
    load_config_from(&config_path())
}

/// Load the cluster profile from an explicit TOML path + environment.
pub fn load_config_from(path: &Path) -> Result<ClusterConfig, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(ClusterConfig::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("DNAC_").ignore(&["password"]));

    let config: ClusterConfig = figment.extract()?;
    Ok(config)
}

/// Serialize the profile to TOML and write it to the canonical path.
pub fn save_config(cfg: &ClusterConfig) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}
