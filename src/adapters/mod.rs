//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the stores to external systems.
//!
//! - `http` - the backend REST gateway (reqwest) and its scripted mock
//! - `storage` - token persistence (file, in-memory)
//! - `notify` - user-facing notice sinks
//! - `contact` - contact form delivery (EmailJS)

pub mod contact;
pub mod http;
pub mod notify;
pub mod storage;

pub use contact::{EmailJsConfig, EmailJsMailer, MockContactMailer};
pub use http::{GatewayConfig, MockGateway, ReqwestGateway};
pub use notify::{RecordingNotifier, TracingNotifier};
pub use storage::{FileTokenStore, InMemoryTokenStore};
