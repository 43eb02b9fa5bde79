//! UserType enum distinguishing the two storefront portals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of an authenticated account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserType {
    Buyer,
    Farmer,
}

impl UserType {
    /// Wire representation used by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Buyer => "BUYER",
            UserType::Farmer => "FARMER",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
