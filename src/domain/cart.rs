//! Cart aggregate: pending order lines with a per-item stock ceiling.
//!
//! Derived values (`item_count`, `total_price`) are recomputed from the lines
//! on every read so they can never drift from them.

use rust_decimal::Decimal;
use serde::Serialize;

use super::catalog::Animal;
use super::foundation::AnimalId;
use super::order::{NewOrder, OrderItem};

/// One catalog item pending order placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub animal_id: AnimalId,
    pub name: String,
    pub price: Decimal,
    /// Stock ceiling taken from the catalog snapshot at add time.
    pub available_quantity: u32,
    pub quantity: u32,
}

impl CartLine {
    fn from_animal(animal: &Animal) -> Self {
        Self {
            animal_id: animal.id,
            name: animal.name.clone(),
            price: animal.price,
            available_quantity: animal.quantity,
            quantity: 1,
        }
    }

    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Result of an add attempt. Running out of stock is an expected outcome,
/// not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddToCartOutcome {
    /// A new line was created with quantity 1.
    Added,
    /// An existing line was bumped to `quantity`.
    Incremented { quantity: u32 },
    /// Nothing changed; the line is already at the item's ceiling.
    StockExhausted { ceiling: u32 },
}

impl AddToCartOutcome {
    pub fn changed_cart(&self) -> bool {
        !matches!(self, AddToCartOutcome::StockExhausted { .. })
    }
}

/// Insertion-ordered lines with unique animal ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of `animal`, capped at `animal.quantity`.
    pub fn add(&mut self, animal: &Animal) -> AddToCartOutcome {
        match self.lines.iter_mut().find(|l| l.animal_id == animal.id) {
            Some(line) if line.quantity >= animal.quantity => AddToCartOutcome::StockExhausted {
                ceiling: animal.quantity,
            },
            Some(line) => {
                line.quantity += 1;
                line.available_quantity = animal.quantity;
                line.name.clone_from(&animal.name);
                line.price = animal.price;
                AddToCartOutcome::Incremented {
                    quantity: line.quantity,
                }
            }
            None if animal.is_out_of_stock() => AddToCartOutcome::StockExhausted { ceiling: 0 },
            None => {
                self.lines.push(CartLine::from_animal(animal));
                AddToCartOutcome::Added
            }
        }
    }

    /// Removes the line for `animal_id`. Returns whether a line was removed.
    pub fn remove(&mut self, animal_id: AnimalId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.animal_id != animal_id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn quantity_of(&self, animal_id: AnimalId) -> u32 {
        self.lines
            .iter()
            .find(|l| l.animal_id == animal_id)
            .map_or(0, |l| l.quantity)
    }

    /// Whether another unit of `animal` would fit under its ceiling.
    pub fn can_add(&self, animal: &Animal) -> bool {
        !animal.is_out_of_stock() && self.quantity_of(animal.id) < animal.quantity
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// The order-creation body for the current lines.
    pub fn to_order_request(&self) -> NewOrder {
        NewOrder {
            items: self
                .lines
                .iter()
                .map(|l| OrderItem {
                    animal: l.animal_id,
                    quantity: l.quantity,
                })
                .collect(),
        }
    }
}
