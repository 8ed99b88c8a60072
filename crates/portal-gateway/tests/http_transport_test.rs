//! HTTP transport against a real local server.
//!
//! Verifies the mapping from HTTP outcomes onto absent/rejected/malformed
//! errors and the request format commands are sent in.

use portal_core::{CommandTransport, Error, ShapeViolation};
use portal_gateway::HttpTransport;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_command_posted_to_invoke_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/invoke/create_task"))
        .and(body_json(json!({"title": "Cambiar UPS"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::new(mock_server.uri(), 5).expect("Failed to create transport");
    let value = transport
        .invoke("create_task", Some(&json!({"title": "Cambiar UPS"})))
        .await
        .expect("Request should succeed");

    // Empty body is an acknowledgement
    assert!(value.is_null());
}

#[tokio::test]
async fn test_missing_payload_sends_empty_object() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/invoke/list_switches"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::new(mock_server.uri(), 5).unwrap();
    let value = transport.invoke("list_switches", None).await.unwrap();
    assert_eq!(value, json!([]));
}

#[tokio::test]
async fn test_unknown_command_is_unavailable() {
    let mock_server = MockServer::start().await;

    let transport = HttpTransport::new(mock_server.uri(), 5).unwrap();
    let err = transport.invoke("list_tasks", None).await.unwrap_err();

    assert!(matches!(err, Error::Unavailable(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_service_unavailable_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::new(mock_server.uri(), 5).unwrap();
    let err = transport.invoke("list_tasks", None).await.unwrap_err();
    assert!(err.is_backend_absent());
}

#[tokio::test]
async fn test_error_status_is_rejection_with_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/invoke/delete_switch"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!("database is locked")))
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::new(mock_server.uri(), 5).unwrap();
    let err = transport
        .invoke("delete_switch", Some(&json!({"id": 1})))
        .await
        .unwrap_err();

    match err {
        Error::Rejected { command, message } => {
            assert_eq!(command, "delete_switch");
            assert_eq!(message, "database is locked");
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_body_is_shape_violation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>portal</html>"))
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::new(mock_server.uri(), 5).unwrap();
    let err = transport.invoke("list_switches", None).await.unwrap_err();
    assert!(matches!(err, Error::Shape(ShapeViolation::NotJson(_))));
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::new(mock_server.uri(), 1).unwrap();
    let err = transport.invoke("list_tasks", None).await.unwrap_err();

    assert!(matches!(err, Error::Timeout { .. }), "got {:?}", err);
    assert!(err.is_backend_absent());
}

#[tokio::test]
async fn test_connection_refused_is_unavailable() {
    // Reserve a port, then release it so nothing is listening there
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let transport = HttpTransport::new(format!("http://127.0.0.1:{}", port), 2).unwrap();
    let err = transport.invoke("list_switches", None).await.unwrap_err();

    assert!(matches!(err, Error::Unavailable(_)), "got {:?}", err);
}
