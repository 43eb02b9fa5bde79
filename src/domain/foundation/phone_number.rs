//! M-Pesa phone number value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Country prefix every M-Pesa number must carry.
pub const KENYA_PREFIX: &str = "254";

/// A phone number in international form without the `+`, e.g. `254712345678`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parses and validates a phone number.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let value = raw.as_ref().trim();
        if value.is_empty() {
            return Err(ValidationError::empty_field("phone_number"));
        }
        if !value.starts_with(KENYA_PREFIX) {
            return Err(ValidationError::invalid_format(
                "phone_number",
                "Phone number must start with 254.",
            ));
        }
        if !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::invalid_format(
                "phone_number",
                "Phone number may only contain digits.",
            ));
        }
        if value.len() == KENYA_PREFIX.len() {
            return Err(ValidationError::invalid_format(
                "phone_number",
                "Phone number is incomplete.",
            ));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
