//! Contact mailer port - delivers contact form messages.

use async_trait::async_trait;

use crate::domain::contact::ContactMessage;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactError {
    #[error("Contact form is not configured")]
    NotConfigured,

    #[error("Mail service unreachable: {0}")]
    Network(String),

    #[error("Mail service rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Port for sending a contact message to the storefront team.
#[async_trait]
pub trait ContactMailer: Send + Sync {
    async fn send(&self, message: &ContactMessage) -> Result<(), ContactError>;
}
