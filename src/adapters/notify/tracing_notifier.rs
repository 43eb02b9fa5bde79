//! Notifier that emits each notice as a tracing event.

use crate::ports::{Notice, NoticeLevel, Notifier};

/// Routes notices into the log stream at a level matching their severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        let level = notice.level;
        match level {
            NoticeLevel::Info | NoticeLevel::Success | NoticeLevel::Pending => {
                tracing::info!(%level, message = %notice.message, "notice")
            }
            NoticeLevel::Warning => tracing::warn!(%level, message = %notice.message, "notice"),
            NoticeLevel::Error => tracing::error!(%level, message = %notice.message, "notice"),
        }
    }
}
