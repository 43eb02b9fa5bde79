//! Read model of backend-owned orders and the requests the client sends about them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::foundation::{AnimalId, OrderId, OrderStatus, PhoneNumber};

/// One `{animal, quantity}` pair, as sent on creation and echoed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub animal: AnimalId,
    pub quantity: u32,
}

/// Body of `POST /api/orders/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
}

/// An order as served by `/api/orders/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total_price: Decimal,
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `PATCH /api/orders/{id}/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// Body of `POST /api/make-payment/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentRequest {
    pub order_id: OrderId,
    pub phone_number: PhoneNumber,
}

/// Acknowledgment of an STK push. The payment itself is confirmed later
/// through the order status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentAck {
    pub raw: Value,
}

impl PaymentAck {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// Human-readable message, whichever key the backend relayed it under.
    pub fn message(&self) -> Option<&str> {
        ["detail", "message", "CustomerMessage", "ResponseDescription"]
            .iter()
            .find_map(|key| self.raw.get(key).and_then(Value::as_str))
    }

    pub fn checkout_request_id(&self) -> Option<&str> {
        self.raw.get("CheckoutRequestID").and_then(Value::as_str)
    }
}
