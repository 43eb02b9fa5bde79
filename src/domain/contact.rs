//! Contact form message.

use serde::Serialize;

use super::foundation::ValidationError;

/// Which portal the contact form was opened from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Portal {
    Buyer,
    Seller,
}

impl Portal {
    /// Where the "back" link of the form leads.
    pub fn back_path(&self) -> &'static str {
        match self {
            Portal::Buyer => "/shop",
            Portal::Seller => "/seller/dashboard",
        }
    }

    pub fn back_label(&self) -> &'static str {
        match self {
            Portal::Buyer => "Back to Shop",
            Portal::Seller => "Back to Dashboard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
    pub portal: Portal,
}

impl ContactMessage {
    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::require("name", &self.name)?;
        ValidationError::require("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(ValidationError::invalid_format("email", "missing @ symbol"));
        }
        ValidationError::require("message", &self.message)?;
        Ok(())
    }
}
