//! Notifier adapters.
//!
//! - **TracingNotifier** - notices become log events
//! - **RecordingNotifier** - notices are kept in memory for tests

mod recording_notifier;
mod tracing_notifier;

pub use recording_notifier::RecordingNotifier;
pub use tracing_notifier::TracingNotifier;
