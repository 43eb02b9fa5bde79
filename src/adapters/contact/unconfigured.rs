//! Mailer used when no EmailJS account is configured.

use async_trait::async_trait;

use crate::domain::contact::ContactMessage;
use crate::ports::{ContactError, ContactMailer};

/// Fails every send with `NotConfigured`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredMailer;

#[async_trait]
impl ContactMailer for UnconfiguredMailer {
    async fn send(&self, _message: &ContactMessage) -> Result<(), ContactError> {
        Err(ContactError::NotConfigured)
    }
}
