//! Application layer - the stores and services the views drive.
//!
//! Each store owns its state behind a lock and reaches the outside world
//! only through ports. `Storefront` wires one of each.

mod cart_store;
mod catalog_service;
mod contact_service;
mod dashboard_service;
mod error;
mod order_book;
mod order_poller;
mod order_service;
mod refresh;
mod session_store;
mod storefront;
mod wire;

#[cfg(test)]
pub(crate) mod test_support;

pub use cart_store::{CartStore, ORDERS_PATH};
pub use catalog_service::{animal_path, CatalogService, ANIMALS_PATH};
pub use contact_service::ContactService;
pub use dashboard_service::{DashboardService, PRO_STATS_PATH};
pub use error::ClientError;
pub use order_book::OrderBook;
pub use order_poller::{OrderStatusPoller, PaymentWatcher, PollHandle, PollOutcome, PollerConfig};
pub use order_service::{order_path, OrderService, PAYMENT_PATH};
pub use refresh::RefreshSignal;
pub use session_store::{SessionStore, ME_PATH, REGISTER_PATH, TOKEN_PATH};
pub use storefront::{Storefront, StorefrontPorts};
