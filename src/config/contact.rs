//! Contact form configuration (EmailJS)

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

/// EmailJS account used by the contact form.
///
/// Either all three values are set or none is. Without them the contact form
/// reports that it is not configured.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactConfig {
    pub service_id: Option<String>,
    pub template_id: Option<String>,
    pub public_key: Option<SecretString>,
}

impl ContactConfig {
    pub fn is_configured(&self) -> bool {
        self.service_id.is_some() && self.template_id.is_some() && self.public_key.is_some()
    }

    /// Validate contact configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let any = self.service_id.is_some() || self.template_id.is_some() || self.public_key.is_some();
        if !any {
            return Ok(());
        }
        if self.service_id.is_none() {
            return Err(ValidationError::IncompleteContact("CONTACT__SERVICE_ID"));
        }
        if self.template_id.is_none() {
            return Err(ValidationError::IncompleteContact("CONTACT__TEMPLATE_ID"));
        }
        if self.public_key.is_none() {
            return Err(ValidationError::IncompleteContact("CONTACT__PUBLIC_KEY"));
        }
        Ok(())
    }
}
