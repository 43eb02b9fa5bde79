//! Integration tests for M-Pesa payment confirmation polling.
//!
//! Time is paused, so every interval and timeout below is virtual.

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::time;

use farmart::adapters::{InMemoryTokenStore, MockContactMailer, MockGateway, RecordingNotifier};
use farmart::application::{
    order_path, PollOutcome, PollerConfig, Storefront, StorefrontPorts, ME_PATH, PAYMENT_PATH,
    TOKEN_PATH,
};
use farmart::domain::foundation::OrderId;
use farmart::domain::navigation::{Route, ViewId};
use farmart::ports::{HttpMethod, NoticeLevel};

// =============================================================================
// Test Infrastructure
// =============================================================================

const INTERVAL: Duration = Duration::from_secs(5);
const TIMEOUT: Duration = Duration::from_secs(120);

struct Harness {
    gateway: Arc<MockGateway>,
    notices: Arc<RecordingNotifier>,
    store: Storefront,
}

fn order_json(id: u64, status: &str) -> Value {
    json!({
        "id": id,
        "items": [{"animal": 4, "quantity": 1}],
        "total_price": "8500.00",
        "status": status,
        "created_at": "2024-06-02T10:00:00Z",
    })
}

async fn logged_in() -> Harness {
    let gateway = Arc::new(MockGateway::new());
    let notices = Arc::new(RecordingNotifier::new());
    let store = Storefront::new(
        StorefrontPorts {
            gateway: gateway.clone(),
            token_store: Arc::new(InMemoryTokenStore::new()),
            notifier: notices.clone(),
            mailer: Arc::new(MockContactMailer::new()),
        },
        PollerConfig::default()
            .with_poll_interval(INTERVAL)
            .with_timeout(TIMEOUT),
    );

    gateway.respond(
        HttpMethod::Post,
        TOKEN_PATH,
        MockGateway::ok(json!({"access": "acc-2", "refresh": "ref-2"})),
    );
    gateway.respond(
        HttpMethod::Get,
        ME_PATH,
        MockGateway::ok(json!({"id": 3, "username": "achieng", "user_type": "BUYER"})),
    );
    store
        .session
        .login("achieng", "pw")
        .await
        .expect("login succeeds");

    Harness {
        gateway,
        notices,
        store,
    }
}

fn polls(h: &Harness, id: u64) -> usize {
    h.gateway
        .calls_to(HttpMethod::Get, &order_path(OrderId::new(id)))
        .len()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test(start_paused = true)]
async fn stops_after_third_poll_reports_paid() {
    let h = logged_in().await;
    let path = order_path(OrderId::new(7));
    h.gateway
        .respond(HttpMethod::Get, &path, MockGateway::ok(order_json(7, "CONFIRMED")));
    h.gateway
        .respond(HttpMethod::Get, &path, MockGateway::ok(order_json(7, "CONFIRMED")));
    h.gateway
        .respond(HttpMethod::Get, &path, MockGateway::ok(order_json(7, "PAID")));
    h.gateway
        .respond_always(HttpMethod::Get, &path, MockGateway::ok(order_json(7, "PAID")));
    let mut refresh = h.store.refresh_signal().subscribe();
    let before = h.store.refresh_signal().current();

    assert!(h.store.payments.watch(OrderId::new(7)));
    let handle = h.store.payments.take().expect("poll running");

    let outcome = handle.outcome().await;
    assert!(outcome.is_paid());
    assert_eq!(polls(&h, 7), 3);

    time::sleep(INTERVAL * 6).await;
    assert_eq!(polls(&h, 7), 3);
    assert_eq!(h.store.refresh_signal().current(), before + 1);
    assert!(refresh.has_changed().expect("signal alive"));
    assert_eq!(
        h.notices.last().map(|n| n.message),
        Some("Payment confirmed for order #7.".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn gives_up_at_timeout_and_goes_quiet() {
    let h = logged_in().await;
    let path = order_path(OrderId::new(8));
    h.gateway.respond_always(
        HttpMethod::Get,
        &path,
        MockGateway::ok(order_json(8, "CONFIRMED")),
    );
    let before = h.store.refresh_signal().current();

    h.store.payments.watch(OrderId::new(8));
    let handle = h.store.payments.take().expect("poll running");

    assert!(matches!(handle.outcome().await, PollOutcome::TimedOut));
    let at_timeout = polls(&h, 8);
    assert!(at_timeout > 0);

    time::sleep(TIMEOUT).await;
    assert_eq!(polls(&h, 8), at_timeout);
    assert_eq!(h.store.refresh_signal().current(), before);
    assert_eq!(h.notices.count_of(NoticeLevel::Pending), 1);
}

#[tokio::test(start_paused = true)]
async fn second_watch_replaces_first() {
    let h = logged_in().await;
    for id in [10, 11] {
        h.gateway.respond_always(
            HttpMethod::Get,
            &order_path(OrderId::new(id)),
            MockGateway::ok(order_json(id, "CONFIRMED")),
        );
    }

    h.store.payments.watch(OrderId::new(10));
    time::sleep(Duration::from_millis(7_500)).await;
    assert_eq!(polls(&h, 10), 1);

    h.store.payments.watch(OrderId::new(11));
    assert_eq!(h.store.payments.active_order(), Some(OrderId::new(11)));

    time::sleep(Duration::from_millis(22_500)).await;

    assert_eq!(polls(&h, 10), 1);
    assert_eq!(polls(&h, 11), 4);
}

#[tokio::test(start_paused = true)]
async fn pay_then_navigate_away_stops_polling() {
    let h = logged_in().await;
    let path = order_path(OrderId::new(12));
    h.gateway
        .respond(HttpMethod::Get, &path, MockGateway::ok(order_json(12, "CONFIRMED")));
    h.gateway.respond(
        HttpMethod::Post,
        PAYMENT_PATH,
        MockGateway::ok(json!({"ResponseCode": "0", "CustomerMessage": "Success"})),
    );
    h.gateway.respond_always(
        HttpMethod::Get,
        &path,
        MockGateway::ok(order_json(12, "CONFIRMED")),
    );

    let order = h
        .store
        .orders
        .get_order(OrderId::new(12))
        .await
        .expect("order fetched");
    h.store
        .orders
        .initiate_payment(&order, "254712345678")
        .await
        .expect("payment initiated");
    assert_eq!(
        h.gateway.calls_to(HttpMethod::Post, PAYMENT_PATH)[0].body,
        Some(json!({"order_id": 12, "phone_number": "254712345678"}))
    );

    h.store.payments.watch(order.id);
    assert_eq!(
        h.store.navigate("/my-orders"),
        Route::View(ViewId::BuyerOrders)
    );
    time::sleep(Duration::from_millis(5_500)).await;
    let polled = polls(&h, 12);

    h.store.navigate("/shop");
    time::sleep(Duration::from_secs(60)).await;

    assert_eq!(h.store.payments.active_order(), None);
    assert_eq!(polls(&h, 12), polled);
}
