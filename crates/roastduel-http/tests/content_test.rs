//! `GatewayContentStore` against a mock upload service and gateway.

use roastduel_core::content::ContentAddress;
use roastduel_core::error::{DuelError, ErrorKind};
use roastduel_core::ports::ContentStore;
use roastduel_http::GatewayContentStore;
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROAST: &str = "I came, I saw, I was unimpressed.";

fn store(server: &MockServer) -> GatewayContentStore {
    GatewayContentStore::new(
        format!("{}/upload", server.uri()),
        format!("{}/ipfs", server.uri()),
        Some("store-token".into()),
    )
}

#[tokio::test]
async fn test_put_uploads_bytes_and_returns_issued_address() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(header("authorization", "Bearer store-token"))
        .and(body_string(ROAST))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cid": "bafyroast"})))
        .expect(1)
        .mount(&server)
        .await;

    // Act
    let address = store(&server).put(ROAST.as_bytes()).await.unwrap();

    // Assert
    assert_eq!(address, ContentAddress::new("bafyroast"));
}

#[tokio::test]
async fn test_unusable_issued_address_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cid": "../etc"})))
        .mount(&server)
        .await;

    let err = store(&server).put(ROAST.as_bytes()).await.unwrap_err();

    assert!(matches!(err, DuelError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_get_reads_through_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ipfs/bafyroast"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ROAST))
        .mount(&server)
        .await;

    let bytes = store(&server)
        .get(&ContentAddress::new("bafyroast"))
        .await
        .unwrap();

    assert_eq!(bytes, ROAST.as_bytes());
}

#[tokio::test]
async fn test_unpropagated_content_is_not_yet_resolvable() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ipfs/bafyfresh"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    // Act
    let err = store(&server)
        .get(&ContentAddress::new("bafyfresh"))
        .await
        .unwrap_err();

    // Assert
    assert!(matches!(err, DuelError::NotYetResolvable(_)));
    assert_eq!(err.kind(), ErrorKind::Transient);
}

#[tokio::test]
async fn test_gone_content_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ipfs/bafyunpinned"))
        .respond_with(ResponseTemplate::new(410))
        .expect(1)
        .mount(&server)
        .await;

    let err = store(&server)
        .get(&ContentAddress::new("bafyunpinned"))
        .await
        .unwrap_err();

    assert!(matches!(err, DuelError::ContentNotFound(_)));
    assert_eq!(err.kind(), ErrorKind::Permanent);
}

#[tokio::test]
async fn test_malformed_address_is_rejected_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = store(&server)
        .get(&ContentAddress::new("bafy/../../secret"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
}
