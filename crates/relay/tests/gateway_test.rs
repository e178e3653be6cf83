use std::time::Duration;

use sms_relay::config::GatewayConfig;
use sms_relay::gateway::{FailureReason, GatewayClient};
use wiremock::matchers::{body_json, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GOOD_REPLY: &str =
    r#"{"result": {"status": {"code": 0, "description": "ok"}, "msg_id": "124343"}}"#;
const BAD_CODE_REPLY: &str =
    r#"{"result": {"status": {"code": 2, "description": "code 2 test reply"}, "msg_id": "124344"}}"#;
const BAD_FORMAT_REPLY: &str =
    r#"{"result": {"status": {"cod": 1, "description": "corrupted code"}, "msge_id": "124345"}}"#;

fn client_for(url: &str) -> GatewayClient {
    GatewayClient::new(GatewayConfig {
        url: url.to_string(),
        from: "VGR ID".to_string(),
        username: "user".to_string(),
        password: "pass".to_string(),
        insecure: false,
        send_timeout: Duration::from_secs(5),
    })
    .expect("Failed to build gateway client")
}

#[tokio::test]
async fn code_zero_reply_is_a_success_with_message_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GOOD_REPLY))
        .mount(&server)
        .await;

    let outcome = client_for(&server.uri())
        .send(79261238212, "firing. alertname:DenyOfService")
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.recipient, 79261238212);
    assert_eq!(outcome.gateway_code, Some(0));
    assert_eq!(outcome.message_id.as_deref(), Some("124343"));
    assert!(outcome.reason.is_none());
}

#[tokio::test]
async fn request_carries_basic_auth_json_body_and_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        // user:pass
        .and(header("Authorization", "Basic dXNlcjpwYXNz"))
        .and(header("Content-type", "application/json"))
        .and(body_json(serde_json::json!({
            "from": "VGR ID",
            "to": 79261238212u64,
            "message": "firing. alertname:DenyOfService"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(GOOD_REPLY))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client_for(&server.uri())
        .send(79261238212, "firing. alertname:DenyOfService")
        .await;
    assert!(outcome.success);
}

#[tokio::test]
async fn nonzero_gateway_code_is_a_failure_with_code_preserved() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BAD_CODE_REPLY))
        .mount(&server)
        .await;

    let outcome = client_for(&server.uri()).send(79261238212, "test").await;

    assert!(!outcome.success);
    assert_eq!(outcome.gateway_code, Some(2));
    assert_eq!(
        outcome.reason,
        Some(FailureReason::GatewayRejected {
            code: Some(2),
            description: "code 2 test reply".to_string(),
        })
    );
}

#[tokio::test]
async fn reply_missing_the_code_field_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BAD_FORMAT_REPLY))
        .mount(&server)
        .await;

    let outcome = client_for(&server.uri()).send(79261238212, "test").await;

    assert!(!outcome.success);
    assert_eq!(outcome.gateway_code, None);
    assert!(matches!(
        outcome.reason,
        Some(FailureReason::GatewayRejected { code: None, .. })
    ));
}

#[tokio::test]
async fn non_json_body_is_a_malformed_reply_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let outcome = client_for(&server.uri()).send(79261238212, "test").await;

    assert!(!outcome.success);
    assert!(matches!(
        outcome.reason,
        Some(FailureReason::MalformedReply(_))
    ));
}

#[tokio::test]
async fn non_200_status_is_a_failure_regardless_of_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string(GOOD_REPLY))
        .mount(&server)
        .await;

    let outcome = client_for(&server.uri()).send(79261238212, "test").await;

    assert!(!outcome.success);
    assert_eq!(outcome.reason, Some(FailureReason::HttpStatus(503)));
}

#[tokio::test]
async fn connection_refused_is_a_transport_failure() {
    // Nothing listens here
    let outcome = client_for("http://127.0.0.1:1").send(79261238212, "test").await;

    assert!(!outcome.success);
    assert!(matches!(outcome.reason, Some(FailureReason::Transport(_))));
}
