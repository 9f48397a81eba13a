mod common;

use common::{test_client, valid_address_json, MockWidget};
use rental_checkout::address::Address;
use rental_checkout::error::Error;
use rental_checkout::navigation::{enter_confirmation, PaymentHandoff, Route};
use rental_checkout::notification::NotificationKind;
use rental_checkout::order::assemble_order_draft;
use rental_checkout::payment::{GatewaySuccess, PaymentOrchestrator, PaymentScreen, PaymentState};
use rental_checkout::product::ProductLineItem;
use rental_checkout::RentalClient;
use rust_decimal_macros::dec;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn handoff() -> PaymentHandoff {
    let address: Address = serde_json::from_value(valid_address_json("a1", true)).unwrap();
    let products = vec![
        ProductLineItem::from_raw(&json!({ "id": "p1", "name": "Anarkali", "rental_price": 500, "security_deposit": 1000 })),
        ProductLineItem::from_raw(&json!({ "id": "p2", "name": "Dupatta", "rental_price": 300, "security_deposit": 0 })),
    ];
    PaymentHandoff {
        order_payload: assemble_order_draft(&products, &address),
    }
}

fn success_event() -> GatewaySuccess {
    GatewaySuccess {
        gateway_order_id: "order_1".to_string(),
        gateway_payment_id: "pay_1".to_string(),
        gateway_signature: "sig_1".to_string(),
    }
}

async fn mount_config(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/payment/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "key_id": "rzp_test_1",
                "name": "Rent & Wear",
                "description": "Outfit rental",
                "image": "https://cdn.example.com/logo.png"
            }
        })))
        .mount(server)
        .await;
}

async fn mount_create_order(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/payment/create-order"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "id": "order_1", "amount": 180000, "currency": "INR", "receipt": "receipt_1" }
        })))
        .mount(server)
        .await;
}

async fn start(client: &RentalClient, widget: Arc<MockWidget>) -> PaymentOrchestrator {
    match client.start_payment(Some(handoff()), widget).await {
        PaymentScreen::Payment(orchestrator) => orchestrator,
        PaymentScreen::Redirect(route) => panic!("Unexpected redirect to {:?}", route),
    }
}

#[tokio::test]
async fn test_missing_order_redirects_home() {
    let server = MockServer::start().await;
    let client = test_client(&server.uri());

    let screen = client.start_payment(None, Arc::new(MockWidget::default())).await;
    assert!(matches!(screen, PaymentScreen::Redirect(Route::Home)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_successful_payment_hands_off_to_confirmation() {
    let server = MockServer::start().await;
    mount_config(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/payment/create-order"))
        .and(body_partial_json(json!({
            "amount": 1800.0,
            "currency": "INR",
            "notes": { "order_type": "rental", "customer_email": "asha@example.com" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "id": "order_1", "amount": 180000, "currency": "INR" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/payment/verify"))
        .and(body_partial_json(json!({
            "gateway_order_id": "order_1",
            "gateway_payment_id": "pay_1",
            "gateway_signature": "sig_1",
            "orderData": {
                "customerName": "Asha Rao",
                "customerEmail": "asha@example.com",
                "customerPhone": "9876543210",
                "totalPrice": 1800.0
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Payment verified",
            "data": { "orderId": "db-42" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let widget = Arc::new(MockWidget::default());
    let mut payment = start(&client, widget.clone()).await;
    assert_eq!(payment.state(), PaymentState::Ready);
    assert!(payment.can_pay());

    payment.pay().await.unwrap();
    assert_eq!(payment.state(), PaymentState::AwaitingGateway);
    assert!(payment.processing().is_busy());
    assert!(!payment.can_pay());

    let opened = widget.last_opened().unwrap();
    assert_eq!(opened.key, "rzp_test_1");
    assert_eq!(opened.order_id, "order_1");
    assert_eq!(opened.amount, dec!(180000));
    assert_eq!(opened.prefill.name, "Asha Rao");
    assert_eq!(opened.prefill.contact, "9876543210");

    let route = payment.on_success(success_event()).await.unwrap();
    assert_eq!(payment.state(), PaymentState::Succeeded);
    assert!(!payment.processing().is_busy());

    let Route::Confirmation(confirmation) = route else {
        panic!("Expected confirmation route");
    };
    assert_eq!(confirmation.order_payload.total_price, dec!(1800));
    assert_eq!(confirmation.payment_data.gateway_payment_id, "pay_1");
    assert_eq!(confirmation.payment_data.details["orderId"], "db-42");
    assert!(confirmation.payment_data.order_number.starts_with("ORD"));
    assert_eq!(payment.verification(), Some(&confirmation.payment_data));

    let shown = client.notifier().visible().unwrap();
    assert_eq!(shown.kind, NotificationKind::Success);

    assert!(enter_confirmation(Some(confirmation)).is_ok());
    assert_eq!(enter_confirmation(None), Err(Route::Home));
}

#[tokio::test]
async fn test_signature_mismatch_fails_without_navigation() {
    let server = MockServer::start().await;
    mount_config(&server).await;
    mount_create_order(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/payment/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Signature mismatch"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let mut payment = start(&client, Arc::new(MockWidget::default())).await;
    payment.pay().await.unwrap();

    let result = payment.on_success(success_event()).await;
    match result {
        Err(Error::Api(msg)) => assert_eq!(msg, "Signature mismatch"),
        other => panic!("Expected Error::Api, got {:?}", other),
    }
    assert_eq!(payment.state(), PaymentState::Failed);
    assert!(payment.verification().is_none());
    assert!(payment.inline_error().is_none());

    let shown = client.notifier().visible().unwrap();
    assert_eq!(shown.kind, NotificationKind::Error);
    assert_eq!(shown.message, "Signature mismatch");
}

#[tokio::test]
async fn test_verification_without_message_uses_fallback() {
    let server = MockServer::start().await;
    mount_config(&server).await;
    mount_create_order(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/payment/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let mut payment = start(&client, Arc::new(MockWidget::default())).await;
    payment.pay().await.unwrap();

    assert!(payment.on_success(success_event()).await.is_err());
    assert_eq!(client.notifier().current().message, "Payment verification failed");
}

#[tokio::test]
async fn test_dismissal_returns_to_ready_without_error() {
    let server = MockServer::start().await;
    mount_config(&server).await;
    mount_create_order(&server).await;

    let client = test_client(&server.uri());
    let widget = Arc::new(MockWidget::default());
    let mut payment = start(&client, widget.clone()).await;

    payment.pay().await.unwrap();
    payment.on_dismiss();

    assert_eq!(payment.state(), PaymentState::Ready);
    assert!(payment.inline_error().is_none());
    assert!(client.notifier().visible().is_none());
    assert!(payment.can_pay());

    payment.pay().await.unwrap();
    assert_eq!(widget.open_count(), 2);
    assert_eq!(widget.load_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_config_failure_disables_pay_until_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/payment/config"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_config(&server).await;

    let client = test_client(&server.uri());
    let mut payment = start(&client, Arc::new(MockWidget::default())).await;

    assert_eq!(payment.state(), PaymentState::Failed);
    assert!(payment.inline_error().unwrap().starts_with("Payment configuration error"));
    assert!(!payment.can_pay());
    assert!(matches!(payment.pay().await, Err(Error::Config(_))));

    payment.load_config().await;
    assert_eq!(payment.state(), PaymentState::Ready);
    assert!(payment.inline_error().is_none());
    assert!(payment.can_pay());
}

#[tokio::test]
async fn test_create_order_failure_is_inline_and_retryable() {
    let server = MockServer::start().await;
    mount_config(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/payment/create-order"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({
            "success": false,
            "message": "Gateway unavailable"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let mut payment = start(&client, Arc::new(MockWidget::default())).await;

    match payment.pay().await {
        Err(Error::Api(msg)) => assert_eq!(msg, "Gateway unavailable"),
        other => panic!("Expected Error::Api, got {:?}", other),
    }
    assert_eq!(payment.state(), PaymentState::Failed);
    assert_eq!(payment.inline_error(), Some("Gateway unavailable"));
    assert!(client.notifier().visible().is_none());
    assert!(payment.can_pay());
}

#[tokio::test]
async fn test_script_load_failure_fails_attempt() {
    let server = MockServer::start().await;
    mount_config(&server).await;
    mount_create_order(&server).await;

    let client = test_client(&server.uri());
    let widget = Arc::new(MockWidget::failing_load());
    let mut payment = start(&client, widget.clone()).await;

    assert!(matches!(payment.pay().await, Err(Error::Gateway(msg)) if msg == "script blocked"));
    assert_eq!(payment.state(), PaymentState::Failed);
    assert!(payment.inline_error().unwrap().contains("Failed to load payment gateway"));
    assert_eq!(widget.open_count(), 0);

    let create_calls = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/api/payment/create-order")
        .count();
    assert_eq!(create_calls, 0);
}

#[tokio::test]
async fn test_zero_total_cannot_pay() {
    let server = MockServer::start().await;
    mount_config(&server).await;
    let client = test_client(&server.uri());

    let address: Address = serde_json::from_value(valid_address_json("a1", true)).unwrap();
    let free = ProductLineItem::from_raw(&json!({ "id": "p", "price": "free" }));
    let state = PaymentHandoff {
        order_payload: assemble_order_draft(&[free], &address),
    };
    let PaymentScreen::Payment(mut payment) =
        client.start_payment(Some(state), Arc::new(MockWidget::default())).await
    else {
        panic!("Expected payment screen");
    };

    assert!(!payment.can_pay());
    assert!(matches!(payment.pay().await, Err(Error::InvalidState(_))));
    assert_eq!(payment.inline_error(), Some("Invalid order amount"));
    assert_eq!(payment.state(), PaymentState::Ready);
}

#[tokio::test]
async fn test_callback_outside_gateway_is_rejected() {
    let server = MockServer::start().await;
    mount_config(&server).await;
    let client = test_client(&server.uri());
    let mut payment = start(&client, Arc::new(MockWidget::default())).await;

    assert!(matches!(
        payment.on_success(success_event()).await,
        Err(Error::InvalidState(_))
    ));
    payment.on_dismiss();
    assert_eq!(payment.state(), PaymentState::Ready);
}
