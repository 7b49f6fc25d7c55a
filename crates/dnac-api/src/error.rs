use thiserror::Error;

use crate::auth::ClusterVersion;

/// Top-level error type for the `dnac-api` crate.
///
/// Covers every failure mode across the API surfaces: authentication,
/// transport, intent endpoints, and the asynchronous task machinery.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (wrong credentials, account locked, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The cached token was rejected and re-login did not help.
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    // ── Cluster addressing ──────────────────────────────────────────
    /// Neither an FQDN nor an IP address was configured for the cluster.
    #[error("No path to the cluster: configure an FQDN or IP address")]
    NoClusterAddress,

    /// The configured cluster release does not publish this resource.
    #[error("Resource {resource} is not available on cluster version {version}")]
    UnsupportedVersion {
        version: ClusterVersion,
        resource: &'static str,
    },

    /// A version string that does not match any supported release train.
    #[error("Unsupported cluster version: {0}")]
    UnknownVersion(String),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API responses ───────────────────────────────────────────────
    /// Non-success HTTP status from the controller.
    #[error("API request failed (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The controller answered 200 but with no usable body.
    #[error("API request succeeded but returned no content: {url}")]
    EmptyResponse { url: String },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A lookup (device by hostname, site by name, template version, ...)
    /// matched nothing.
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// The null or broadcast MAC address was passed to a client lookup.
    #[error("Illegal MAC address: {mac}")]
    InvalidMac { mac: String },

    /// A request was rejected before any HTTP was issued (empty command
    /// batch, deployment with no targets, ...).
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    // ── Asynchronous tasks ──────────────────────────────────────────
    /// A controller-side task finished in an error state.
    #[error("Task {task_id} failed: {reason}")]
    TaskFailed {
        task_id: String,
        progress: String,
        reason: String,
    },

    /// A template deployment reached the FAILURE state.
    #[error("Deployment {deployment_id} failed: {status}")]
    DeploymentFailed {
        deployment_id: String,
        status: String,
    },

    /// The controller refused a template push because an identical
    /// deployment already exists.
    #[error("Template {template} already deployed with the same parameters")]
    AlreadyDeployed { template: String },

    /// A poll loop hit its deadline before the watched job went terminal.
    #[error("Timed out after {waited_secs}s waiting for a terminal state")]
    PollTimeout { waited_secs: u64 },
}

impl Error {
    /// Returns `true` if this error indicates auth has expired
    /// and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::SessionExpired)
    }

    /// Returns `true` for 4xx responses -- the request itself is wrong
    /// and retrying without change will not help.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Api { status, .. } => (400..500).contains(status),
            Self::Transport(e) => e.status().is_some_and(|s| s.is_client_error()),
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error worth retrying:
    /// 5xx responses, timeouts, and connection failures.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api { status, .. } => (500..600).contains(status),
            Self::Transport(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            Self::PollTimeout { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::Api { status: 404, .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }
}
