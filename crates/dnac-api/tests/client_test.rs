#![allow(clippy::unwrap_used)]
// Integration tests for `DnacClient` session handling using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dnac_api::{ClusterVersion, Credentials, DnacClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

fn credentials() -> Credentials {
    Credentials::new("admin", "test-password".to_owned())
}

async fn setup(version: ClusterVersion) -> (MockServer, DnacClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = DnacClient::with_client(reqwest::Client::new(), base_url, version, credentials());
    (server, client)
}

async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/system/v1/auth/token"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Token": token })))
        .mount(server)
        .await;
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success_caches_token() {
    let (server, client) = setup(ClusterVersion::V1_3_1_4).await;
    mount_login(&server, "jwt-token-1").await;

    assert!(!client.has_token());
    client.login().await.unwrap();
    assert!(client.has_token());
}

#[tokio::test]
async fn test_login_failure() {
    let (server, client) = setup(ClusterVersion::V1_3_1_4).await;

    Mock::given(method("POST"))
        .and(path("/api/system/v1/auth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid credentials"))
        .mount(&server)
        .await;

    let result = client.login().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_first_request_logs_in_and_attaches_token() {
    let (server, client) = setup(ClusterVersion::V1_3_1_4).await;
    mount_login(&server, "jwt-token-1").await;

    Mock::given(method("GET"))
        .and(path("/dna/intent/api/v1/network-device"))
        .and(header("X-Auth-Token", "jwt-token-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "response": [{ "id": "dev-1", "hostname": "sw1.example.com" }]
            })),
        )
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].hostname.as_deref(), Some("sw1.example.com"));
}

#[tokio::test]
async fn test_expired_token_triggers_relogin_and_replay() {
    let (server, client) = setup(ClusterVersion::V1_3_1_4).await;
    mount_login(&server, "jwt-token-2").await;

    // First probe with the stale token: 401, consumed once.
    Mock::given(method("GET"))
        .and(path("/dna/intent/api/v1/network-device"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    // Replay after re-login succeeds.
    Mock::given(method("GET"))
        .and(path("/dna/intent/api/v1/network-device"))
        .and(header("X-Auth-Token", "jwt-token-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": [] })))
        .mount(&server)
        .await;

    // Seed a (soon to be stale) token so the 401 path is exercised.
    client.login().await.unwrap();

    let devices = client.list_devices().await.unwrap();
    assert!(devices.is_empty());
}

#[tokio::test]
async fn test_persistent_401_maps_to_session_expired() {
    let (server, client) = setup(ClusterVersion::V1_3_1_4).await;
    mount_login(&server, "jwt-token-3").await;

    Mock::given(method("GET"))
        .and(path("/dna/intent/api/v1/network-device"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.list_devices().await;
    assert!(
        matches!(result, Err(Error::SessionExpired)),
        "expected SessionExpired, got: {result:?}"
    );
}

// ── Error mapping tests ─────────────────────────────────────────────

#[tokio::test]
async fn test_client_error_mapping() {
    let (server, client) = setup(ClusterVersion::V1_3_1_4).await;
    mount_login(&server, "t").await;

    Mock::given(method("GET"))
        .and(path("/dna/intent/api/v1/network-device/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "response": { "errorCode": "1005", "message": "Device not found", "detail": "" }
        })))
        .mount(&server)
        .await;

    let err = client.get_device("nope").await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 404, .. }));
    assert!(err.is_client_error());
    assert!(!err.is_retryable());
    assert!(err.is_not_found());
    assert!(err.to_string().contains("Device not found"));
}

#[tokio::test]
async fn test_server_error_is_retryable() {
    let (server, client) = setup(ClusterVersion::V1_3_1_4).await;
    mount_login(&server, "t").await;

    Mock::given(method("GET"))
        .and(path("/dna/intent/api/v1/network-device"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.list_devices().await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 503, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_empty_body_is_surfaced() {
    let (server, client) = setup(ClusterVersion::V1_3_1_4).await;
    mount_login(&server, "t").await;

    Mock::given(method("GET"))
        .and(path("/dna/intent/api/v1/network-device"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let err = client.list_devices().await.unwrap_err();
    assert!(matches!(err, Error::EmptyResponse { .. }));
}

#[tokio::test]
async fn test_malformed_json_keeps_body_for_debugging() {
    let (server, client) = setup(ClusterVersion::V1_3_1_4).await;
    mount_login(&server, "t").await;

    Mock::given(method("GET"))
        .and(path("/dna/intent/api/v1/network-device"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway error</html>"))
        .mount(&server)
        .await;

    let err = client.list_devices().await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert!(body.contains("gateway error")),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

// ── Version gating ──────────────────────────────────────────────────

#[tokio::test]
async fn test_version_gated_resource_is_rejected_without_http() {
    // 1.2.8 has no site-health resource; no mock is mounted on purpose.
    let (_server, client) = setup(ClusterVersion::V1_2_8).await;

    let err = client.site_health().await.unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedVersion {
            version: ClusterVersion::V1_2_8,
            resource: "site-health"
        }
    ));
}
