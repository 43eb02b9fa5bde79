//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the stores and the outside world. Adapters implement these ports.
//!
//! - `ApiGateway` - the backend REST API (the only component issuing HTTP calls)
//! - `TokenStore` - persisted bearer credentials
//! - `Notifier` - user-facing notices
//! - `ContactMailer` - contact form delivery

mod api_gateway;
mod contact_mailer;
mod notifier;
mod token_store;

pub use api_gateway::{
    ApiError, ApiGateway, ConnectionError, FilePart, GatewayError, HttpMethod, MultipartForm,
};
pub use contact_mailer::{ContactError, ContactMailer};
pub use notifier::{Notice, NoticeLevel, Notifier};
pub use token_store::{TokenStore, TokenStoreError};
