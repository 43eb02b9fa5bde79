//! Notifier port - user-facing notices.
//!
//! Stands in for the blocking alerts of a browser UI: "no more stock",
//! "payment confirmed", "couldn't confirm in time". Notices are not errors;
//! errors still travel through `Result`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    Info,
    Success,
    /// Outcome unknown; the user should check back later.
    Pending,
    Warning,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "success",
            NoticeLevel::Pending => "pending",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn pending(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Pending, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

/// Port for surfacing notices to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}
