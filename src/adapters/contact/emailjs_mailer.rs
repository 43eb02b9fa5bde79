//! EmailJS contact mailer adapter.
//!
//! Implements the `ContactMailer` port against the EmailJS REST endpoint.
//! The form fields travel as template parameters named the way the
//! storefront's EmailJS template expects them (`user_name`, `user_email`,
//! `message`).
//!
//! # Configuration
//!
//! ```ignore
//! let config = EmailJsConfig::new("service_x", "template_y", public_key);
//! let mailer = EmailJsMailer::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};

use crate::domain::contact::ContactMessage;
use crate::ports::{ContactError, ContactMailer};

pub const EMAILJS_SEND_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// EmailJS account configuration.
#[derive(Clone)]
pub struct EmailJsConfig {
    service_id: String,
    template_id: String,
    /// EmailJS public key, sent as `user_id`.
    public_key: SecretString,
    endpoint: String,
}

impl EmailJsConfig {
    pub fn new(
        service_id: impl Into<String>,
        template_id: impl Into<String>,
        public_key: SecretString,
    ) -> Self {
        Self {
            service_id: service_id.into(),
            template_id: template_id.into(),
            public_key,
            endpoint: EMAILJS_SEND_URL.to_string(),
        }
    }

    /// Override the send endpoint (useful for local testing).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for EmailJsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailJsConfig")
            .field("service_id", &self.service_id)
            .field("template_id", &self.template_id)
            .field("public_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Sends contact messages through EmailJS.
pub struct EmailJsMailer {
    config: EmailJsConfig,
    client: reqwest::Client,
}

impl EmailJsMailer {
    pub fn new(config: EmailJsConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Request body for one message.
    fn payload(&self, message: &ContactMessage) -> Value {
        json!({
            "service_id": self.config.service_id,
            "template_id": self.config.template_id,
            "user_id": self.config.public_key.expose_secret(),
            "template_params": {
                "user_name": message.name,
                "user_email": message.email,
                "message": message.message,
                "portal": message.portal,
            },
        })
    }
}

#[async_trait]
impl ContactMailer for EmailJsMailer {
    async fn send(&self, message: &ContactMessage) -> Result<(), ContactError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&self.payload(message))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "EmailJS send failed");
                ContactError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), error = %text, "EmailJS rejected message");
            return Err(ContactError::Rejected {
                status: status.as_u16(),
                message: text,
            });
        }

        tracing::info!(portal = ?message.portal, "Contact message sent");
        Ok(())
    }
}
