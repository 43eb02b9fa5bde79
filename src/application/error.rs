//! Error type returned by the stores and services.

use thiserror::Error;

use crate::domain::foundation::ValidationError;
use crate::ports::{ContactError, GatewayError, TokenStoreError};

/// Tagged failure of a storefront operation.
///
/// Callers match on the variant to tell a local precondition failure
/// (`Validation`) from an unreachable server (`Gateway(Connection)`) or a
/// server-side rejection (`Gateway(Api)`).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Order submission failed. The cart was left as it was.
    #[error("{message}")]
    Checkout {
        message: String,
        #[source]
        source: GatewayError,
    },

    #[error("Token storage failed: {0}")]
    Storage(#[from] TokenStoreError),

    /// The backend answered with a body the client could not interpret.
    #[error("Unexpected response from {path}: {message}")]
    UnexpectedResponse { path: String, message: String },

    #[error(transparent)]
    Contact(#[from] ContactError),
}

impl ClientError {
    pub fn checkout(source: GatewayError) -> Self {
        ClientError::Checkout {
            message: format!("Checkout failed: {}", source.user_message()),
            source,
        }
    }

    pub fn unexpected(path: impl Into<String>, message: impl ToString) -> Self {
        ClientError::UnexpectedResponse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// True when the server could not be reached at all.
    pub fn is_connection(&self) -> bool {
        match self {
            ClientError::Gateway(e) | ClientError::Checkout { source: e, .. } => e.is_connection(),
            _ => false,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }

    /// Text suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Gateway(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}
