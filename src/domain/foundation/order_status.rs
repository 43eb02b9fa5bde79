//! OrderStatus enum as observed from the backend.
//!
//! The client never moves an order between statuses itself. It only uses the
//! status to decide which actions are offered and when polling may stop.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Paid,
    Rejected,
}

impl OrderStatus {
    /// True once the backend has confirmed payment.
    pub fn is_paid(&self) -> bool {
        matches!(self, OrderStatus::Paid)
    }

    /// Payment can only be initiated for a farmer-confirmed order.
    pub fn is_payable(&self) -> bool {
        matches!(self, OrderStatus::Confirmed)
    }

    /// Buyers may cancel until the order is paid or rejected.
    pub fn is_cancellable(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Confirmed)
    }

    /// Statuses a farmer is allowed to request.
    pub fn is_farmer_settable(&self) -> bool {
        matches!(self, OrderStatus::Confirmed | OrderStatus::Rejected)
    }

    /// Wire representation used by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Paid => "PAID",
            OrderStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
