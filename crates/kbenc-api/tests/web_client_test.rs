#![allow(clippy::unwrap_used)]
// Integration tests for `WebClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kbenc_api::web::WebCommand;
use kbenc_api::{Error, SessionToken, WebClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, WebClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = WebClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn session() -> SessionToken {
    SessionToken::new("abc123")
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_extracts_session_cookie() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/session"))
        .and(body_json(json!({ "username": "admin", "password": "pw" })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "sessionID=abc123; Path=/")
                .set_body_json(json!({})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "pw".to_string().into();
    let token = client.login("admin", &secret).await.unwrap();
    assert_eq!(token.expose(), "abc123");
}

#[tokio::test]
async fn test_login_forbidden() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/session"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = client.login("admin", &secret).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_login_without_cookie_is_missing_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/session"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "lang=en; Path=/"),
        )
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "pw".to_string().into();
    let result = client.login("admin", &secret).await;

    assert!(matches!(result, Err(Error::MissingSessionToken { .. })));
}

// ── Discovery tests ─────────────────────────────────────────────────

#[tokio::test]
async fn test_get_system_sends_cookie() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/system"))
        .and(header("cookie", "sessionID=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": { "release": "5.3", "build": 1022 },
            "uptime": { "days": 1, "hrs": 2, "mins": 3, "secs": 4 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let info = client.get_system(&session()).await.unwrap();
    assert_eq!(info.version.unwrap().build.as_deref(), Some("1022"));
    assert_eq!(info.uptime.unwrap().hrs, 2);

    let requests = server.received_requests().await.unwrap();
    assert!(
        requests[0].url.query_pairs().any(|(k, _)| k == "_"),
        "GET should carry a cache-busting parameter"
    );
}

#[tokio::test]
async fn test_list_devices() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "dev1", "name": "KB Encoder" }
        ])))
        .mount(&server)
        .await;

    let devices = client.list_devices(&session()).await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].id, "dev1");
    assert_eq!(devices[0].name.as_deref(), Some("KB Encoder"));
}

// ── Encoder tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_list_channels() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/kulabyte/dev1/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "c1", "name": "Cam1", "state": "running" },
            { "_id": "c2", "name": "My%20Channel", "state": "idle", "recording": "active" }
        ])))
        .mount(&server)
        .await;

    let channels = client.list_channels(&session(), "dev1").await.unwrap();
    assert_eq!(channels.len(), 2);
    assert_eq!(channels[1].name, "My%20Channel");
    assert_eq!(channels[1].recording.as_deref(), Some("active"));
}

#[tokio::test]
async fn test_list_channels_rejects_non_array_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/kulabyte/dev1/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "busy" })))
        .mount(&server)
        .await;

    let result = client.list_channels(&session(), "dev1").await;
    assert!(
        matches!(result, Err(Error::UnexpectedShape { .. })),
        "expected UnexpectedShape, got: {result:?}"
    );
}

#[tokio::test]
async fn test_list_channels_skips_null_and_malformed_entries() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/kulabyte/dev1/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            null,
            { "name": "no id" },
            { "_id": 7, "name": "numeric id" },
            { "_id": "c1", "name": "Cam1", "state": "running" }
        ])))
        .mount(&server)
        .await;

    let channels = client.list_channels(&session(), "dev1").await.unwrap();
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].id, "c1");
    assert_eq!(channels[0].state.as_deref(), Some("running"));
}

#[tokio::test]
async fn test_statistics_http_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/kulabyte/dev1/encoder/statistics"))
        .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
        .mount(&server)
        .await;

    let err = client.get_statistics(&session(), "dev1").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(err.is_auth_expired());
}

#[tokio::test]
async fn test_control_channel_posts_without_cache_buster() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/kulabyte/dev1/channels/c1/recording/start"))
        .and(header("cookie", "sessionID=abc123"))
        .and(query_param_is_missing("_"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    client
        .control_channel(&session(), "dev1", "c1", WebCommand::StartRecording)
        .await
        .unwrap();
}
