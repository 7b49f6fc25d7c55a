// DNA Center HTTP client
//
// Wraps `reqwest::Client` with cluster URL construction, token-based
// authorization, and uniform response handling. All endpoint families
// (devices, templates, etc.) are implemented as inherent methods via
// separate files under `intent/` to keep this module focused on
// transport mechanics.

use std::sync::RwLock;

use reqwest::{Method, StatusCode, header};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::{ClusterVersion, Credentials};
use crate::error::Error;
use crate::intent::models::Envelope;
use crate::transport::TransportConfig;

/// Token endpoint. Stable across every supported release train.
const AUTH_TOKEN_PATH: &str = "/api/system/v1/auth/token";

/// The login response is a single-field object: `{"Token": "<jwt>"}`.
#[derive(serde::Deserialize)]
struct TokenResponse {
    #[serde(rename = "Token")]
    token: String,
}

/// Error bodies vary by endpoint family; probe the two common shapes.
#[derive(serde::Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    response: Option<ApiErrorInner>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(serde::Deserialize)]
struct ApiErrorInner {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// Async client for a Cisco DNA Center cluster.
///
/// Owns the session: it performs the initial basic-auth login against the
/// token endpoint, caches the issued token, injects it as an
/// `X-Auth-Token` header on every request, and re-authenticates once when
/// the cluster rejects the token with a 401. Endpoint methods live in the
/// [`intent`](crate::intent) modules.
pub struct DnacClient {
    http: reqwest::Client,
    base_url: Url,
    version: ClusterVersion,
    credentials: Credentials,
    /// Issued auth token. `None` until the first login; refreshed in place
    /// when the cluster signals expiry.
    token: RwLock<Option<String>>,
}

impl DnacClient {
    /// Create a new client from a base URL and a `TransportConfig`.
    ///
    /// No HTTP is issued here; the login happens lazily on the first
    /// request (or eagerly via [`login`](Self::login)).
    pub fn new(
        base_url: Url,
        version: ClusterVersion,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            version,
            credentials,
            token: RwLock::new(None),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        version: ClusterVersion,
        credentials: Credentials,
    ) -> Self {
        Self {
            http,
            base_url,
            version,
            credentials,
            token: RwLock::new(None),
        }
    }

    /// Build a cluster base URL from an FQDN and/or IP address.
    ///
    /// The FQDN is preferred when both are configured; with neither this
    /// is [`Error::NoClusterAddress`] rather than a silently empty URL.
    pub fn cluster_url(fqdn: Option<&str>, ip: Option<&str>, port: u16) -> Result<Url, Error> {
        let host = fqdn
            .filter(|h| !h.is_empty())
            .or_else(|| ip.filter(|h| !h.is_empty()))
            .ok_or(Error::NoClusterAddress)?;
        Url::parse(&format!("https://{host}:{port}")).map_err(Error::InvalidUrl)
    }

    /// The cluster base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The configured cluster release train.
    pub fn version(&self) -> ClusterVersion {
        self.version
    }

    /// Whether a token is currently cached.
    pub fn has_token(&self) -> bool {
        self.token.read().expect("token lock poisoned").is_some()
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Log in to the cluster and cache the issued token.
    ///
    /// `POST /api/system/v1/auth/token` with an
    /// `Authorization: Basic base64(user:pass)` header. Called
    /// automatically before the first request and again whenever the
    /// cluster answers 401.
    pub async fn login(&self) -> Result<(), Error> {
        let url = self.base_url.join(AUTH_TOKEN_PATH)?;
        debug!("requesting token at {url}");

        let resp = self
            .http
            .post(url)
            .basic_auth(
                &self.credentials.username,
                Some(self.credentials.password.expose_secret()),
            )
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("token request failed (HTTP {status}): {body}"),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let issued: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            let preview = &body[..body.len().min(200)];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })?;

        trace!("token issued");
        *self.token.write().expect("token lock poisoned") = Some(issued.token);
        Ok(())
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join an absolute resource path onto the cluster base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        self.base_url.join(path).map_err(Error::InvalidUrl)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let resp = self.dispatch::<()>(Method::GET, url, None, &[]).await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let resp = self.dispatch::<()>(Method::GET, url, None, params).await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        let resp = self
            .dispatch(Method::POST, url, Some(body), &[])
            .await?;
        self.handle_response(resp).await
    }

    #[allow(dead_code)]
    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        let resp = self.dispatch(Method::PUT, url, Some(body), &[]).await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let resp = self.dispatch::<()>(Method::DELETE, url, None, &[]).await?;
        self.handle_response(resp).await
    }

    /// GET returning the raw body, for endpoints that serve plain text
    /// (archived device configurations).
    pub(crate) async fn get_text(&self, url: Url) -> Result<String, Error> {
        let resp = self.dispatch::<()>(Method::GET, url, None, &[]).await?;
        let status = resp.status();
        if !status.is_success() {
            let raw = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: extract_error_message(status, &raw),
            });
        }
        resp.text().await.map_err(Error::Transport)
    }

    // ── Envelope helpers ─────────────────────────────────────────────
    //
    // Intent endpoints wrap their payload as `{"response": ...}`; the v2
    // template-programmer family returns bare JSON. These helpers strip
    // the envelope so endpoint modules never see it.

    pub(crate) async fn get_enveloped<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        Ok(self.get::<Envelope<T>>(url).await?.response)
    }

    pub(crate) async fn get_enveloped_with_params<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        Ok(self
            .get_with_params::<Envelope<T>>(url, params)
            .await?
            .response)
    }

    pub(crate) async fn post_enveloped<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        Ok(self.post::<Envelope<T>, B>(url, body).await?.response)
    }

    pub(crate) async fn delete_enveloped<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        Ok(self.delete::<Envelope<T>>(url).await?.response)
    }

    // ── Dispatch & response handling ─────────────────────────────────

    /// Send one request with the cached token attached.
    async fn send_once<B: Serialize + Sync>(
        &self,
        method: &Method,
        url: &Url,
        body: Option<&B>,
        params: &[(&str, String)],
    ) -> Result<reqwest::Response, Error> {
        let mut builder = self
            .http
            .request(method.clone(), url.clone())
            .header(header::CONTENT_TYPE, "application/json");

        if !params.is_empty() {
            builder = builder.query(params);
        }

        {
            let guard = self.token.read().expect("token lock poisoned");
            if let Some(token) = guard.as_deref() {
                builder = builder.header("X-Auth-Token", token);
            }
        }

        if let Some(body) = body {
            builder = builder.json(body);
        }

        builder.send().await.map_err(Error::Transport)
    }

    /// Issue a request, logging in first if no token is cached and
    /// replaying once after a 401 (expiry-triggered renewal).
    async fn dispatch<B: Serialize + Sync>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        params: &[(&str, String)],
    ) -> Result<reqwest::Response, Error> {
        if !self.has_token() {
            self.login().await?;
        }

        debug!("{method} {url}");
        let resp = self.send_once(&method, &url, body, params).await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            debug!("token rejected, re-authenticating");
            self.login().await?;

            let retry = self.send_once(&method, &url, body, params).await?;
            if retry.status() == StatusCode::UNAUTHORIZED {
                return Err(Error::SessionExpired);
            }
            return Ok(retry);
        }

        Ok(resp)
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        let url = resp.url().clone();

        if !status.is_success() {
            let raw = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: extract_error_message(status, &raw),
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Err(Error::EmptyResponse {
                url: url.to_string(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        if body.is_empty() {
            return Err(Error::EmptyResponse {
                url: url.to_string(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            let preview = &body[..body.len().min(200)];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }
}

/// Pull a human-readable message out of whichever error shape the
/// cluster used, falling back to a body preview.
fn extract_error_message(status: StatusCode, raw: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(raw) {
        if let Some(inner) = parsed.response {
            if let Some(msg) = inner.message.or(inner.detail) {
                return msg;
            }
        }
        if let Some(msg) = parsed.message {
            return msg;
        }
    }
    if raw.is_empty() {
        status.to_string()
    } else {
        raw[..raw.len().min(200)].to_owned()
    }
}
