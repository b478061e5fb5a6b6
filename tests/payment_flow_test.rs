//! 결제 서비스 통합 테스트
//!
//! 가짜 주문 서비스/볼트/게이트웨이로 결제 흐름의 순서 계약과 멱등성을
//! 검증합니다: 주문 검증 전에는 볼트/게이트웨이에 접근하지 않고,
//! 같은 주문의 재제출은 새로운 청구를 만들지 않습니다.

mod common;

use std::sync::Arc;

use actix_web::{App, test, web};
use rust_decimal_macros::dec;
use serde_json::{Value, json};

use identity_payment_backend::routes::configure_payment_routes;
use identity_payment_backend::services::payments::idempotency_key;

use common::{
    FailingNotifier, FakeOrderClient, FakeVault, RecordingGateway, RecordingNotifier,
    test_payment_service,
};

const ORDER_ID: &str = "order-1001";

fn payment_payload(order_id: &str, amount: &str, provider: &str) -> Value {
    json!({
        "order_id": order_id,
        "amount": amount,
        "currency": "USD",
        "encrypted_token": "AQIDBAUG",
        "user_email": "alice@example.com",
        "provider": provider,
    })
}

macro_rules! payment_app {
    ($payments:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::from($payments))
                .configure(configure_payment_routes),
        )
        .await
    };
}

macro_rules! submit {
    ($app:expr, $payload:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/v1/payments")
            .set_json($payload)
            .to_request();
        test::call_service(&$app, req).await
    }};
}

#[actix_web::test]
async fn test_successful_payment() {
    let orders = Arc::new(FakeOrderClient::with_order(ORDER_ID, dec!(49.99)));
    let vault = Arc::new(FakeVault::default());
    let gateway = Arc::new(RecordingGateway::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let payments =
        test_payment_service(orders.clone(), vault.clone(), gateway.clone(), notifier.clone());
    let app = payment_app!(payments);

    let resp = submit!(app, payment_payload(ORDER_ID, "49.99", "stripe"));
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["provider"], "stripe");
    assert!(body["payment_id"].as_str().unwrap().starts_with("ch_"));

    // 게이트웨이는 최소 화폐 단위 금액과 결정적 멱등성 키를 받음
    let charges = gateway.charges.lock().unwrap();
    assert_eq!(charges.len(), 1);
    assert_eq!(charges[0].amount_minor, 4999);
    assert_eq!(charges[0].currency, "USD");
    assert_eq!(charges[0].idempotency_key, idempotency_key(ORDER_ID));
    assert_eq!(charges[0].description, format!("Payment for order {}", ORDER_ID));
    // 복호화된 결제 수단이 게이트웨이로 전달됨
    assert!(charges[0].instrument.starts_with("tok_"));
}

#[actix_web::test]
async fn test_retry_of_same_order_does_not_double_charge() {
    let orders = Arc::new(FakeOrderClient::with_order(ORDER_ID, dec!(49.99)));
    let vault = Arc::new(FakeVault::default());
    let gateway = Arc::new(RecordingGateway::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let payments = test_payment_service(orders, vault, gateway.clone(), notifier);
    let app = payment_app!(payments);

    let resp = submit!(app, payment_payload(ORDER_ID, "49.99", "stripe"));
    assert_eq!(resp.status(), 200);
    let first: Value = test::read_body_json(resp).await;

    let resp = submit!(app, payment_payload(ORDER_ID, "49.99", "stripe"));
    assert_eq!(resp.status(), 200);
    let second: Value = test::read_body_json(resp).await;

    // 동일한 멱등성 키 → 게이트웨이는 하나의 청구만 생성
    assert_eq!(first["payment_id"], second["payment_id"]);
    assert_eq!(gateway.call_count(), 2);
    assert_eq!(gateway.distinct_charge_ids(), 1);
}

#[actix_web::test]
async fn test_amount_mismatch_is_rejected_before_vault_and_gateway() {
    let orders = Arc::new(FakeOrderClient::with_order(ORDER_ID, dec!(49.99)));
    let vault = Arc::new(FakeVault::default());
    let gateway = Arc::new(RecordingGateway::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let payments = test_payment_service(orders.clone(), vault.clone(), gateway.clone(), notifier);
    let app = payment_app!(payments);

    // 1센트 차이도 거부
    let resp = submit!(app, payment_payload(ORDER_ID, "50.00", "stripe"));
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Amount mismatch with order");

    // 주문 서비스는 호출되었지만 볼트/게이트웨이는 접근되지 않음
    assert_eq!(orders.call_count(), 1);
    assert_eq!(vault.decrypt_call_count(), 0);
    assert_eq!(gateway.call_count(), 0);
}

#[actix_web::test]
async fn test_unknown_order_is_rejected() {
    let orders = Arc::new(FakeOrderClient::default());
    let vault = Arc::new(FakeVault::default());
    let gateway = Arc::new(RecordingGateway::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let payments = test_payment_service(orders, vault.clone(), gateway.clone(), notifier);
    let app = payment_app!(payments);

    let resp = submit!(app, payment_payload("order-missing", "49.99", "stripe"));
    assert_eq!(resp.status(), 400);

    assert_eq!(vault.decrypt_call_count(), 0);
    assert_eq!(gateway.call_count(), 0);
}

#[actix_web::test]
async fn test_unsupported_provider_contacts_no_collaborator() {
    let orders = Arc::new(FakeOrderClient::with_order(ORDER_ID, dec!(49.99)));
    let vault = Arc::new(FakeVault::default());
    let gateway = Arc::new(RecordingGateway::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let payments = test_payment_service(orders.clone(), vault.clone(), gateway.clone(), notifier);
    let app = payment_app!(payments);

    // 알 수 없는 프로바이더 → 501
    let resp = submit!(app, payment_payload(ORDER_ID, "49.99", "bitcoin"));
    assert_eq!(resp.status(), 501);

    // 미구현 프로바이더(paypal) → 501
    let resp = submit!(app, payment_payload(ORDER_ID, "49.99", "paypal"));
    assert_eq!(resp.status(), 501);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "PayPal support is not yet implemented");

    // 어떤 협력 서비스에도 접근하지 않음
    assert_eq!(orders.call_count(), 0);
    assert_eq!(vault.decrypt_call_count(), 0);
    assert_eq!(gateway.call_count(), 0);
}

#[actix_web::test]
async fn test_vault_rejection_surfaces_as_decryption_error() {
    let orders = Arc::new(FakeOrderClient::with_order(ORDER_ID, dec!(49.99)));
    let vault = Arc::new(FakeVault::rejecting());
    let gateway = Arc::new(RecordingGateway::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let payments = test_payment_service(orders, vault, gateway.clone(), notifier);
    let app = payment_app!(payments);

    let resp = submit!(app, payment_payload(ORDER_ID, "49.99", "stripe"));
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Payment token could not be decrypted");

    // 복호화 실패 시 게이트웨이에 접근하지 않음
    assert_eq!(gateway.call_count(), 0);
}

#[actix_web::test]
async fn test_invalid_base64_never_reaches_vault() {
    let orders = Arc::new(FakeOrderClient::with_order(ORDER_ID, dec!(49.99)));
    let vault = Arc::new(FakeVault::default());
    let gateway = Arc::new(RecordingGateway::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let payments = test_payment_service(orders, vault.clone(), gateway.clone(), notifier);
    let app = payment_app!(payments);

    let payload = json!({
        "order_id": ORDER_ID,
        "amount": "49.99",
        "currency": "USD",
        "encrypted_token": "!!not-base64!!",
        "user_email": "alice@example.com",
        "provider": "stripe",
    });

    let resp = submit!(app, payload);
    assert_eq!(resp.status(), 400);

    assert_eq!(vault.decrypt_call_count(), 0);
    assert_eq!(gateway.call_count(), 0);
}

#[actix_web::test]
async fn test_notifier_failure_does_not_unwind_completed_charge() {
    let orders = Arc::new(FakeOrderClient::with_order(ORDER_ID, dec!(49.99)));
    let vault = Arc::new(FakeVault::default());
    let gateway = Arc::new(RecordingGateway::default());
    let payments =
        test_payment_service(orders, vault, gateway.clone(), Arc::new(FailingNotifier));
    let app = payment_app!(payments);

    let resp = submit!(app, payment_payload(ORDER_ID, "49.99", "stripe"));
    assert_eq!(resp.status(), 200);
    assert_eq!(gateway.call_count(), 1);
}

#[actix_web::test]
async fn test_success_notification_is_delivered() {
    let orders = Arc::new(FakeOrderClient::with_order(ORDER_ID, dec!(49.99)));
    let vault = Arc::new(FakeVault::default());
    let gateway = Arc::new(RecordingGateway::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let payments = test_payment_service(orders, vault, gateway, notifier.clone());
    let app = payment_app!(payments);

    let resp = submit!(app, payment_payload(ORDER_ID, "49.99", "stripe"));
    assert_eq!(resp.status(), 200);

    // 분리된 전달 태스크가 실행될 시간을 줌
    for _ in 0..50 {
        if !notifier.sent.lock().unwrap().is_empty() {
            break;
        }
        actix_web::rt::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "alice@example.com");
    assert_eq!(sent[0].subject, "Payment Confirmation");
    assert!(sent[0].body.contains("49.99"));
}

#[actix_web::test]
async fn test_invalid_amounts_are_rejected_by_validation() {
    let orders = Arc::new(FakeOrderClient::with_order(ORDER_ID, dec!(49.99)));
    let vault = Arc::new(FakeVault::default());
    let gateway = Arc::new(RecordingGateway::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let payments = test_payment_service(orders.clone(), vault, gateway, notifier);
    let app = payment_app!(payments);

    // 0 금액은 스키마 검증에서 거부 — 주문 서비스 호출 없음
    let resp = submit!(app, payment_payload(ORDER_ID, "0", "stripe"));
    assert_eq!(resp.status(), 400);
    assert_eq!(orders.call_count(), 0);
}
