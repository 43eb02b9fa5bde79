//! Notifier that records notices for later inspection.

use std::sync::Mutex;

use crate::ports::{Notice, NoticeLevel, Notifier};

/// Keeps every notice in arrival order.
///
/// # Example
///
/// ```ignore
/// let notifier = Arc::new(RecordingNotifier::new());
/// // ... exercise the cart store ...
/// assert_eq!(notifier.count_of(NoticeLevel::Warning), 1);
/// ```
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.log().clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.log().last().cloned()
    }

    pub fn count_of(&self, level: NoticeLevel) -> usize {
        self.log().iter().filter(|n| n.level == level).count()
    }

    /// Drain recorded notices.
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.log())
    }

    fn log(&self) -> std::sync::MutexGuard<'_, Vec<Notice>> {
        self.notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.log().push(notice);
    }
}
