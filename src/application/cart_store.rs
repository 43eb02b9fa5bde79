//! CartStore - pending order lines, stock ceilings and checkout.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;

use crate::domain::cart::{AddToCartOutcome, Cart, CartLine};
use crate::domain::catalog::Animal;
use crate::domain::foundation::{AnimalId, ValidationError};
use crate::domain::order::Order;
use crate::ports::{ApiGateway, HttpMethod, Notice, Notifier};

use super::wire::{decode, encode};
use super::{ClientError, RefreshSignal, SessionStore};

pub const ORDERS_PATH: &str = "/api/orders/";

/// Shared cart for the buyer portal.
///
/// The lock is only held for in-memory edits, never across a request.
pub struct CartStore {
    cart: Mutex<Cart>,
    session: Arc<SessionStore>,
    gateway: Arc<dyn ApiGateway>,
    notifier: Arc<dyn Notifier>,
    refresh: RefreshSignal,
}

impl CartStore {
    pub fn new(
        session: Arc<SessionStore>,
        gateway: Arc<dyn ApiGateway>,
        notifier: Arc<dyn Notifier>,
        refresh: RefreshSignal,
    ) -> Self {
        Self {
            cart: Mutex::new(Cart::new()),
            session,
            gateway,
            notifier,
            refresh,
        }
    }

    /// Adds one unit of `animal`. At the stock ceiling nothing changes and a
    /// warning notice is raised.
    pub fn add_to_cart(&self, animal: &Animal) -> AddToCartOutcome {
        let outcome = self.cart().add(animal);
        match outcome {
            AddToCartOutcome::StockExhausted { ceiling } => {
                tracing::debug!(animal_id = %animal.id, ceiling, "Add refused at stock ceiling");
                self.notifier.notify(Notice::warning(format!(
                    "No more stock available for {}. You already have the maximum quantity in your cart.",
                    animal.name
                )));
            }
            AddToCartOutcome::Added | AddToCartOutcome::Incremented { .. } => {
                tracing::debug!(animal_id = %animal.id, ?outcome, "Cart updated");
            }
        }
        outcome
    }

    pub fn remove_from_cart(&self, animal_id: AnimalId) {
        if self.cart().remove(animal_id) {
            tracing::debug!(%animal_id, "Removed from cart");
        }
    }

    pub fn clear_cart(&self) {
        self.cart().clear();
    }

    /// Submits the cart as one order.
    ///
    /// Empty cart and missing session fail locally without a request. On a
    /// gateway failure the cart is left exactly as it was.
    pub async fn checkout(&self) -> Result<Order, ClientError> {
        let request = {
            let cart = self.cart();
            if cart.is_empty() {
                return Err(ValidationError::EmptyCart.into());
            }
            cart.to_order_request()
        };
        let token = self.session.require_token()?;

        let body = encode(ORDERS_PATH, &request)?;
        let response = self
            .gateway
            .request(HttpMethod::Post, ORDERS_PATH, Some(body), Some(&token))
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Checkout failed, cart kept");
                ClientError::checkout(e)
            })?;

        // The backend has accepted the order; the cart is spent either way.
        self.clear_cart();
        self.refresh.trigger();

        let order: Order = decode(ORDERS_PATH, response)?;
        tracing::info!(order_id = %order.id, total = %order.total_price, "Order placed");
        self.notifier.notify(Notice::success("Order placed successfully!"));
        Ok(order)
    }

    /// Tells dependent views to reload their server data.
    pub fn trigger_data_refresh(&self) -> u64 {
        self.refresh.trigger()
    }

    pub fn refresh_signal(&self) -> &RefreshSignal {
        &self.refresh
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Derived reads
    // ════════════════════════════════════════════════════════════════════════════

    pub fn lines(&self) -> Vec<CartLine> {
        self.cart().lines().to_vec()
    }

    pub fn item_count(&self) -> u32 {
        self.cart().item_count()
    }

    pub fn total_price(&self) -> Decimal {
        self.cart().total_price()
    }

    pub fn quantity_of(&self, animal_id: AnimalId) -> u32 {
        self.cart().quantity_of(animal_id)
    }

    /// Whether the add button for `animal` should be enabled.
    pub fn can_add(&self, animal: &Animal) -> bool {
        self.cart().can_add(animal)
    }

    fn cart(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
