//! Strongly-typed identifier value objects.
//!
//! The backend hands out integer primary keys; these wrappers keep an order id
//! from being passed where an animal id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Identifier of a catalog item (an animal listing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimalId(u64);

impl AnimalId {
    /// Wraps a backend primary key.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw key.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AnimalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AnimalId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Identifier of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    /// Wraps a backend primary key.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw key.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrderId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Identifier of a user account (buyer or farmer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Wraps a backend primary key.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw key.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
