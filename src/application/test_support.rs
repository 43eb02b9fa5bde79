//! Shared fixtures for store and service unit tests.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::adapters::{InMemoryTokenStore, MockGateway};
use crate::domain::catalog::Animal;
use crate::domain::foundation::UserType;
use crate::ports::HttpMethod;

use super::session_store::{ME_PATH, TOKEN_PATH};
use super::SessionStore;

pub fn user_json(id: u64, username: &str, user_type: UserType) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{}@example.com", username),
        "user_type": user_type.as_str(),
        "phone_number": "254712345678",
        "location": "Nakuru",
    })
}

pub fn animal_json(id: u64, name: &str, price: &str, quantity: u32) -> Value {
    json!({
        "id": id,
        "farmer": 9,
        "name": name,
        "animal_type": "GOAT",
        "breed": "Galla",
        "age": 14,
        "price": price,
        "description": "Healthy and dewormed",
        "quantity": quantity,
        "image": null,
    })
}

pub fn animal(id: u64, name: &str, price: &str, quantity: u32) -> Animal {
    serde_json::from_value(animal_json(id, name, price, quantity)).expect("valid animal fixture")
}

pub fn order_json(id: u64, status: &str) -> Value {
    json!({
        "id": id,
        "items": [{"animal": 1, "quantity": 2}],
        "total_price": "2000.00",
        "status": status,
        "created_at": "2024-05-01T08:30:00Z",
    })
}

/// A session store already logged in as `user_type` with access token `acc-1`.
pub async fn logged_in_session(gateway: &Arc<MockGateway>, user_type: UserType) -> Arc<SessionStore> {
    gateway.respond(
        HttpMethod::Post,
        TOKEN_PATH,
        MockGateway::ok(json!({"access": "acc-1", "refresh": "ref-1"})),
    );
    gateway.respond(
        HttpMethod::Get,
        ME_PATH,
        MockGateway::ok(user_json(9, "otieno", user_type)),
    );
    let session = Arc::new(SessionStore::new(
        gateway.clone(),
        Arc::new(InMemoryTokenStore::new()),
    ));
    session
        .login("otieno", "pw")
        .await
        .expect("scripted login succeeds");
    session
}

/// A session store that never logged in.
pub fn anonymous_session(gateway: &Arc<MockGateway>) -> Arc<SessionStore> {
    Arc::new(SessionStore::new(
        gateway.clone(),
        Arc::new(InMemoryTokenStore::new()),
    ))
}
