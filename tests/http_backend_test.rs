mod common;

use std::time::Duration;
use volunteer_checkout::domain::ports::PaymentBackend;
use volunteer_checkout::domain::transaction::{OrderId, TransactionStatus};
use volunteer_checkout::error::BackendError;
use volunteer_checkout::infrastructure::http::HttpPaymentBackend;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> HttpPaymentBackend {
    HttpPaymentBackend::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_create_payment_posts_camel_case_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/payments/create"))
        .and(body_partial_json(serde_json::json!({
            "orderId": "ORD1",
            "amount": "1500.00",
            "currency": "LKR",
            "payerType": "SPONSOR",
            "payerId": "SP-42",
            "eventId": "EV-7",
            "transactionType": "SPONSORSHIP",
            "firstName": "Ayesha",
            "isAnonymous": false
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"hash": "HASH", "merchantId": "1211149"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let signed = backend(&server)
        .create_payment(&common::sponsorship("ORD1"))
        .await
        .unwrap();

    assert_eq!(signed.hash, "HASH");
    assert_eq!(signed.merchant_id, "1211149");
}

#[tokio::test]
async fn test_create_payment_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/payments/create"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = backend(&server)
        .create_payment(&common::sponsorship("ORD1"))
        .await;

    assert!(matches!(result, Err(BackendError::Malformed(_))));
}

#[tokio::test]
async fn test_status_accepts_bare_and_wrapped_values() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/payments/status/ORD1"))
        .respond_with(ResponseTemplate::new(200).set_body_json("FAILED"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/payments/status/ORD2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "SUCCESS"})))
        .mount(&server)
        .await;

    let backend = backend(&server);

    assert_eq!(
        backend.transaction_status(&OrderId::new("ORD1")).await.unwrap(),
        TransactionStatus::Failed
    );
    assert_eq!(
        backend.transaction_status(&OrderId::new("ORD2")).await.unwrap(),
        TransactionStatus::Success
    );
}

#[tokio::test]
async fn test_status_server_error_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/payments/status/ORD1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let result = backend(&server)
        .transaction_status(&OrderId::new("ORD1"))
        .await;

    match result {
        Err(BackendError::Rejected { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let backend = HttpPaymentBackend::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();

    let result = backend.transaction_status(&OrderId::new("ORD1")).await;

    assert!(matches!(result, Err(BackendError::Transport(_))));
}
