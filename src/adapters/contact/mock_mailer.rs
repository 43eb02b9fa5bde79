//! Mock contact mailer for testing.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::contact::ContactMessage;
use crate::ports::{ContactError, ContactMailer};

/// Records sent messages; optionally fails every send.
#[derive(Debug, Default)]
pub struct MockContactMailer {
    sent: Mutex<Vec<ContactMessage>>,
    failure: Option<ContactError>,
}

impl MockContactMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: ContactError) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Some(error),
        }
    }

    pub fn sent(&self) -> Vec<ContactMessage> {
        self.sent.lock().expect("MockContactMailer: lock poisoned").clone()
    }
}

#[async_trait]
impl ContactMailer for MockContactMailer {
    async fn send(&self, message: &ContactMessage) -> Result<(), ContactError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.sent
            .lock()
            .expect("MockContactMailer: lock poisoned")
            .push(message.clone());
        Ok(())
    }
}
