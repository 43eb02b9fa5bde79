//! ContactService - the contact form shared by both portals.

use std::sync::Arc;

use crate::domain::contact::ContactMessage;
use crate::ports::{ContactMailer, Notice, Notifier};

use super::ClientError;

pub struct ContactService {
    mailer: Arc<dyn ContactMailer>,
    notifier: Arc<dyn Notifier>,
}

impl ContactService {
    pub fn new(mailer: Arc<dyn ContactMailer>, notifier: Arc<dyn Notifier>) -> Self {
        Self { mailer, notifier }
    }

    pub async fn send(&self, message: &ContactMessage) -> Result<(), ClientError> {
        message.validate()?;
        match self.mailer.send(message).await {
            Ok(()) => {
                self.notifier.notify(Notice::success("Message sent successfully!"));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Contact message not delivered");
                self.notifier
                    .notify(Notice::error("Failed to send message. Please try again."));
                Err(e.into())
            }
        }
    }
}
