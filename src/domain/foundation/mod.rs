//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, enums, value objects and the local validation error
//! that form the vocabulary of the storefront domain.

mod errors;
mod ids;
mod order_status;
mod phone_number;
mod user_type;

pub use errors::ValidationError;
pub use ids::{AnimalId, OrderId, UserId};
pub use order_status::OrderStatus;
pub use phone_number::{PhoneNumber, KENYA_PREFIX};
pub use user_type::UserType;
