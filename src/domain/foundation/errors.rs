//! Error types for the domain layer.
//!
//! Everything here is raised before a request leaves the client and can be
//! fixed by correcting input.

use thiserror::Error;

use super::{OrderId, OrderStatus, UserType};

/// Local precondition failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Your cart is empty.")]
    EmptyCart,

    #[error("You must be logged in to continue.")]
    NotAuthenticated,

    #[error("Access denied. This portal is for {expected} accounts only.")]
    WrongPortal { expected: UserType, actual: UserType },

    #[error("Order #{order_id} is {status} and cannot be {action}")]
    OrderNotActionable {
        order_id: OrderId,
        status: OrderStatus,
        action: &'static str,
    },

    #[error("Status {status} cannot be set from the farmer portal")]
    StatusNotSettable { status: OrderStatus },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Rejects blank input for a required field.
    pub fn require(field: &str, value: &str) -> Result<(), Self> {
        if value.trim().is_empty() {
            return Err(Self::empty_field(field));
        }
        Ok(())
    }
}
