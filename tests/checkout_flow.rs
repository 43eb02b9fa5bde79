//! Integration tests for the cart-to-order flow.
//!
//! Drives a full `Storefront` over the mock gateway:
//! 1. Session bootstrap and login
//! 2. Cart mutations against catalog stock
//! 3. Checkout request shape, refresh signal, failure handling

use serde_json::{json, Value};
use std::sync::Arc;

use farmart::adapters::{InMemoryTokenStore, MockContactMailer, MockGateway, RecordingNotifier};
use farmart::application::{
    ClientError, PollerConfig, Storefront, StorefrontPorts, ME_PATH, ORDERS_PATH, TOKEN_PATH,
};
use farmart::domain::catalog::Animal;
use farmart::domain::session::TokenPair;
use farmart::ports::{HttpMethod, NoticeLevel, TokenStore};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Harness {
    gateway: Arc<MockGateway>,
    tokens: Arc<InMemoryTokenStore>,
    notices: Arc<RecordingNotifier>,
    store: Storefront,
}

fn harness_with(tokens: InMemoryTokenStore) -> Harness {
    let gateway = Arc::new(MockGateway::new());
    let tokens = Arc::new(tokens);
    let notices = Arc::new(RecordingNotifier::new());
    let store = Storefront::new(
        StorefrontPorts {
            gateway: gateway.clone(),
            token_store: tokens.clone(),
            notifier: notices.clone(),
            mailer: Arc::new(MockContactMailer::new()),
        },
        PollerConfig::default(),
    );
    Harness {
        gateway,
        tokens,
        notices,
        store,
    }
}

fn harness() -> Harness {
    harness_with(InMemoryTokenStore::new())
}

fn buyer_json() -> Value {
    json!({
        "id": 3,
        "username": "wanjiru",
        "email": "wanjiru@example.com",
        "user_type": "BUYER",
        "phone_number": "254712345678",
        "location": "Eldoret",
    })
}

fn animal(id: u64, price: &str, quantity: u32) -> Animal {
    serde_json::from_value(json!({
        "id": id,
        "farmer": 9,
        "name": format!("Animal {}", id),
        "animal_type": "COW",
        "breed": "Friesian",
        "age": 24,
        "price": price,
        "description": "Vaccinated",
        "quantity": quantity,
        "image": null,
    }))
    .expect("valid animal")
}

async fn login(h: &Harness) {
    h.gateway.respond(
        HttpMethod::Post,
        TOKEN_PATH,
        MockGateway::ok(json!({"access": "acc-9", "refresh": "ref-9"})),
    );
    h.gateway
        .respond(HttpMethod::Get, ME_PATH, MockGateway::ok(buyer_json()));
    h.store
        .session
        .login("wanjiru", "secret")
        .await
        .expect("login succeeds");
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn stock_capped_cart_checks_out_as_one_order() {
    let h = harness();
    login(&h).await;
    let calls_after_login = h.gateway.call_count();

    let a = animal(1, "1000", 2);
    h.store.cart.add_to_cart(&a);
    h.store.cart.add_to_cart(&a);
    assert_eq!(h.store.cart.quantity_of(a.id), 2);
    assert_eq!(h.store.cart.total_price().to_string(), "2000");

    let third = h.store.cart.add_to_cart(&a);
    assert!(!third.changed_cart());
    assert_eq!(h.store.cart.quantity_of(a.id), 2);
    assert_eq!(h.notices.count_of(NoticeLevel::Warning), 1);

    h.gateway.respond(
        HttpMethod::Post,
        ORDERS_PATH,
        MockGateway::ok(json!({
            "id": 55,
            "items": [{"animal": 1, "quantity": 2}],
            "total_price": "2000.00",
            "status": "PENDING",
        })),
    );
    let before = h.store.refresh_signal().current();

    let order = h.store.cart.checkout().await.expect("checkout succeeds");

    assert_eq!(order.id.value(), 55);
    let posts = h.gateway.calls_to(HttpMethod::Post, ORDERS_PATH);
    assert_eq!(posts.len(), 1);
    assert_eq!(
        posts[0].body,
        Some(json!({"items": [{"animal": 1, "quantity": 2}]}))
    );
    assert_eq!(posts[0].token.as_deref(), Some("acc-9"));
    assert_eq!(h.gateway.call_count(), calls_after_login + 1);
    assert_eq!(h.store.cart.item_count(), 0);
    assert!(h.store.cart.lines().is_empty());
    assert_eq!(h.store.refresh_signal().current(), before + 1);
    assert_eq!(
        h.notices.last().map(|n| n.message),
        Some("Order placed successfully!".to_string())
    );
}

#[tokio::test]
async fn empty_cart_never_reaches_backend() {
    let h = harness();
    login(&h).await;
    let calls = h.gateway.call_count();

    let err = h.store.cart.checkout().await.unwrap_err();

    assert!(err.is_validation());
    assert_eq!(h.gateway.call_count(), calls);
}

#[tokio::test]
async fn checkout_without_session_never_reaches_backend() {
    let h = harness();
    h.store.session.bootstrap().await;
    h.store.cart.add_to_cart(&animal(1, "500", 3));

    let err = h.store.cart.checkout().await.unwrap_err();

    assert!(err.is_validation());
    assert_eq!(h.gateway.call_count(), 0);
    assert_eq!(h.store.cart.item_count(), 1);
}

#[tokio::test]
async fn rejected_checkout_keeps_cart_and_refresh_counter() {
    let h = harness();
    login(&h).await;
    h.store.cart.add_to_cart(&animal(1, "1000", 2));
    h.store.cart.add_to_cart(&animal(2, "750", 1));
    let lines = h.store.cart.lines();
    let before = h.store.refresh_signal().current();

    h.gateway.respond(
        HttpMethod::Post,
        ORDERS_PATH,
        MockGateway::api_error(400, json!({"items": ["Only 0 left in stock."]})),
    );
    let err = h.store.cart.checkout().await.unwrap_err();

    match &err {
        ClientError::Checkout { message, .. } => {
            assert_eq!(message, "Checkout failed: items: Only 0 left in stock.")
        }
        other => panic!("expected checkout error, got {:?}", other),
    }
    assert_eq!(h.store.cart.lines(), lines);
    assert_eq!(h.store.refresh_signal().current(), before);
}

#[tokio::test]
async fn unreachable_backend_is_reported_as_connection_failure() {
    let h = harness();
    login(&h).await;
    h.store.cart.add_to_cart(&animal(1, "1000", 2));

    h.gateway.respond(
        HttpMethod::Post,
        ORDERS_PATH,
        MockGateway::unreachable(HttpMethod::Post, ORDERS_PATH),
    );
    let err = h.store.cart.checkout().await.unwrap_err();

    assert!(err.is_connection());
    assert_eq!(h.store.cart.item_count(), 1);
}

#[tokio::test]
async fn bootstrap_with_rejected_token_logs_out() {
    let h = harness_with(InMemoryTokenStore::with_tokens(TokenPair::new(
        "expired", "stale",
    )));
    h.gateway.respond(
        HttpMethod::Get,
        ME_PATH,
        MockGateway::api_error(401, json!({"detail": "Given token not valid for any token type"})),
    );
    assert!(h.store.session.is_loading());

    h.store.session.bootstrap().await;

    assert!(!h.store.session.is_loading());
    assert!(h.store.session.user().is_none());
    assert!(h.store.session.access_token().is_none());
    assert!(h.tokens.load().expect("readable").is_none());
    assert_eq!(
        h.gateway.calls_to(HttpMethod::Get, ME_PATH)[0].token.as_deref(),
        Some("expired")
    );
}

#[tokio::test]
async fn bootstrap_restores_valid_session() {
    let h = harness_with(InMemoryTokenStore::with_tokens(TokenPair::new(
        "acc-1", "ref-1",
    )));
    h.gateway
        .respond(HttpMethod::Get, ME_PATH, MockGateway::ok(buyer_json()));

    h.store.session.bootstrap().await;

    assert!(h.store.session.is_authenticated());
    assert_eq!(h.store.session.access_token().as_deref(), Some("acc-1"));
}
