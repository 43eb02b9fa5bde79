//! OrderBook - the last order list fetched for the signed-in user.
//!
//! Writers replace the list wholesale after a fetch or patch single entries
//! after a mutation (payment confirmed, status changed, order cancelled).

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::foundation::OrderId;
use crate::domain::order::Order;

#[derive(Debug, Default)]
pub struct OrderBook {
    orders: RwLock<Vec<Order>>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all(&self, orders: Vec<Order>) {
        *self.write() = orders;
    }

    /// Replace the entry with the same id in place, or append it.
    pub fn upsert(&self, order: Order) {
        let mut orders = self.write();
        match orders.iter_mut().find(|o| o.id == order.id) {
            Some(existing) => *existing = order,
            None => orders.push(order),
        }
    }

    /// Drops the entry. Returns whether it was present.
    pub fn remove(&self, id: OrderId) -> bool {
        let mut orders = self.write();
        let before = orders.len();
        orders.retain(|o| o.id != id);
        orders.len() != before
    }

    pub fn get(&self, id: OrderId) -> Option<Order> {
        self.read().iter().find(|o| o.id == id).cloned()
    }

    pub fn all(&self) -> Vec<Order> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Order>> {
        self.orders.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Order>> {
        self.orders.write().unwrap_or_else(PoisonError::into_inner)
    }
}
