//! HTTP adapters for the `ApiGateway` port.
//!
//! - **ReqwestGateway** - talks to the real backend
//! - **MockGateway** - scripted responses and call tracking for tests

mod mock_gateway;
mod reqwest_gateway;

pub use mock_gateway::{MockGateway, RecordedCall, Scripted};
pub use reqwest_gateway::{GatewayConfig, ReqwestGateway, DEFAULT_BASE_URL};
