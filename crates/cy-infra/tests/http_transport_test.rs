//! HTTP transport against a mock cloud.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cy_core::config::AccountConfig;
use cy_core::ports::{ClipboardTransportPort, TransportError};
use cy_core::RemoteContent;
use cy_infra::ReqwestClipboardTransport;

const KEY: &str = "test-key";

fn transport(server: &MockServer) -> ReqwestClipboardTransport {
    let account = AccountConfig {
        app_key: KEY.to_string(),
        api_base_url: format!("{}/", server.uri()),
    };
    ReqwestClipboardTransport::new(&account, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn upload_text_posts_json_with_app_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/app/copy"))
        .and(header("AppKey", KEY))
        .and(body_json(json!({ "text": "hello" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    transport(&server).upload_text("hello").await.unwrap();
}

#[tokio::test]
async fn server_rejection_carries_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/app/copy"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = transport(&server).upload_text("hello").await.unwrap_err();
    assert_eq!(err, TransportError::Server { status: 401 });
}

#[tokio::test]
async fn upload_file_sends_multipart_file_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/app/copy"))
        .and(header("AppKey", KEY))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, b"file body").unwrap();

    transport(&server).upload_file(&file).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data"));
    assert!(body.contains(r#"name="file""#));
    assert!(body.contains(r#"filename="notes.txt""#));
    assert!(body.contains("text/plain"));
    assert!(body.contains("file body"));
}

#[tokio::test]
async fn upload_missing_file_is_not_sent() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("gone.bin");

    let err = transport(&server).upload_file(&missing).await.unwrap_err();

    assert_eq!(err, TransportError::FileNotFound(missing));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn fetch_latest_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/paste/latest"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "text",
            "content": "from the cloud",
            "timestamp": 1_700_000_000_000i64,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let entry = transport(&server).fetch_latest().await.unwrap().unwrap();

    assert_eq!(entry.content, RemoteContent::Text("from the cloud".into()));
    assert_eq!(entry.timestamp.unwrap().timestamp_millis(), 1_700_000_000_000);
}

#[tokio::test]
async fn fetch_latest_image_uses_second_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/paste/latest"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "type": "image" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/app/paste/latest"))
        .and(header("Accept", "*/*"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(vec![0x89, b'P', b'N', b'G'], "image/png"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let entry = transport(&server).fetch_latest().await.unwrap().unwrap();

    match entry.content {
        RemoteContent::Image { bytes, mime } => {
            assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
            assert_eq!(mime.as_deref(), Some("image/png"));
        }
        other => panic!("expected image, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_latest_file_takes_name_from_disposition() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/paste/latest"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "type": "file" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/app/paste/latest"))
        .and(header("Accept", "*/*"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"%PDF-1.7".to_vec(), "application/pdf")
                .insert_header(
                    "content-disposition",
                    "attachment; filename=\"report.pdf\"; filename*=UTF-8''r%C3%A9sum%C3%A9.pdf",
                ),
        )
        .mount(&server)
        .await;

    let entry = transport(&server).fetch_latest().await.unwrap().unwrap();

    match entry.content {
        RemoteContent::File { name, bytes, .. } => {
            assert_eq!(name, "résumé.pdf");
            assert_eq!(bytes, b"%PDF-1.7".to_vec());
        }
        other => panic!("expected file, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_latest_binary_without_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/paste/latest"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"raw".to_vec(), "application/octet-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let entry = transport(&server).fetch_latest().await.unwrap().unwrap();

    match entry.content {
        RemoteContent::File { name, .. } => assert_eq!(name, "downloaded_file"),
        other => panic!("expected file, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_cloud_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/paste/latest"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert!(transport(&server).fetch_latest().await.unwrap().is_none());
}

#[tokio::test]
async fn metadata_without_type_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/paste/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    assert!(transport(&server).fetch_latest().await.unwrap().is_none());
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let account = AccountConfig {
        app_key: KEY.to_string(),
        api_base_url: "http://127.0.0.1:9".to_string(),
    };
    let transport = ReqwestClipboardTransport::new(&account, Duration::from_secs(2)).unwrap();

    let err = transport.upload_text("x").await.unwrap_err();

    assert!(matches!(err, TransportError::Network(_)), "{err:?}");
}
