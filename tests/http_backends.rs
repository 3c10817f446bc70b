use driftscope::backend::{
    Backend, BackendError, BackendKind, BackendRegistry, HttpReader, Options, TfCloudReader,
};
use driftscope::config::SupplierConfig;
use indexmap::IndexMap;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STATE: &str = r#"{"version": 4, "resources": []}"#;

#[tokio::test]
async fn test_http_reader_sends_configured_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/states/prod.tfstate"))
        .and(header("Authorization", "Basic dXNlcjpwYXNz"))
        .and(header("X-Env", "prod"))
        .respond_with(ResponseTemplate::new(200).set_body_string(STATE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let headers = IndexMap::from([
        ("Authorization".to_string(), "Basic dXNlcjpwYXNz".to_string()),
        ("X-Env".to_string(), "prod".to_string()),
    ]);
    let reader = HttpReader::new(
        reqwest::Client::new(),
        format!("{}/states/prod.tfstate", mock_server.uri()),
        &headers,
    )
    .unwrap();

    let body = reader.read(&CancellationToken::new()).await.unwrap();
    assert_eq!(body, STATE.as_bytes());
}

#[tokio::test]
async fn test_http_reader_non_success_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing.tfstate"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let url = format!("{}/missing.tfstate", mock_server.uri());
    let reader = HttpReader::new(reqwest::Client::new(), url.clone(), &IndexMap::new()).unwrap();

    let err = reader.read(&CancellationToken::new()).await.unwrap_err();
    match err {
        BackendError::Status { url: failed, status } => {
            assert_eq!(failed, url);
            assert_eq!(status, 404);
        }
        other => panic!("Expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_registry_builds_http_reader_from_source() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/terraform.tfstate"))
        .respond_with(ResponseTemplate::new(200).set_body_string(STATE))
        .mount(&mock_server)
        .await;

    // mock_server.uri() is "http://127.0.0.1:PORT"
    let source: SupplierConfig = format!("tfstate+{}/terraform.tfstate", mock_server.uri())
        .parse()
        .unwrap();
    assert_eq!(source.backend, BackendKind::Http);

    let registry = BackendRegistry::default();
    assert!(registry.get_enumerator(&source).unwrap().is_none());

    let backend = registry.get_backend(&source, &Options::default()).unwrap();
    let body = backend.read(&CancellationToken::new()).await.unwrap();
    assert_eq!(body, STATE.as_bytes());
}

#[tokio::test]
async fn test_tfcloud_follows_download_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/workspaces/ws-123/current-state-version"))
        .and(header("Authorization", "Bearer tfc_token"))
        .and(header("Content-Type", "application/vnd.api+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "id": "sv-abc",
                "type": "state-versions",
                "attributes": {
                    "hosted-state-download-url": format!("{}/archivist/v1/object/abc", mock_server.uri())
                }
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/archivist/v1/object/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string(STATE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let reader = TfCloudReader::new(
        reqwest::Client::new(),
        "ws-123",
        &format!("{}/api/v2/", mock_server.uri()),
        Some("tfc_token".to_string()),
    );

    let body = reader.read(&CancellationToken::new()).await.unwrap();
    assert_eq!(body, STATE.as_bytes());

    let requests = mock_server.received_requests().await.unwrap();
    let download = requests
        .iter()
        .find(|r| r.url.path() == "/archivist/v1/object/abc")
        .unwrap();
    assert!(!download.headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_tfcloud_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/workspaces/ws-404/current-state-version"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let reader = TfCloudReader::new(
        reqwest::Client::new(),
        "ws-404",
        &format!("{}/api/v2", mock_server.uri()),
        None,
    );

    let err = reader.read(&CancellationToken::new()).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "error requesting terraform cloud backend state: status code: 404"
    );
}

#[tokio::test]
async fn test_tfcloud_unparseable_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/workspaces/ws-1/current-state-version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": {}})))
        .mount(&mock_server)
        .await;

    let reader = TfCloudReader::new(
        reqwest::Client::new(),
        "ws-1",
        &format!("{}/api/v2", mock_server.uri()),
        None,
    );

    let err = reader.read(&CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, BackendError::TfCloud(_)));
}
