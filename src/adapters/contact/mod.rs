//! Contact mailer adapters.
//!
//! - **EmailJsMailer** - delivers through the EmailJS REST API
//! - **MockContactMailer** - records messages for tests
//! - **UnconfiguredMailer** - stands in when no account is configured

mod emailjs_mailer;
mod mock_mailer;
mod unconfigured;

pub use emailjs_mailer::{EmailJsConfig, EmailJsMailer, EMAILJS_SEND_URL};
pub use mock_mailer::MockContactMailer;
pub use unconfigured::UnconfiguredMailer;
