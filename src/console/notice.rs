//! Status line notices.
//!
//! One notice is visible at a time. Showing a new one replaces the old one
//! and drops its expiry, so a sticky notice can be replaced by a transient
//! one and vice versa.

use std::time::{Duration, Instant};
use tracing::debug;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Neutral information.
    Info,
    /// A completed action.
    Success,
    /// A failed action.
    Error,
}

impl NoticeLevel {
    /// Marker shown before the text.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Info => "[i]",
            Self::Success => "[ok]",
            Self::Error => "[!]",
        }
    }
}

/// A visible notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Text shown to the operator.
    pub text: String,
    /// When the notice hides itself; `None` keeps it until replaced.
    pub expires_at: Option<Instant>,
}

/// Holder of the current notice.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    current: Option<Notice>,
    timeout: Duration,
}

impl NoticeBoard {
    /// Creates an empty board whose transient notices last `timeout`.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            current: None,
            timeout,
        }
    }

    /// Shows a notice that hides after the board's timeout.
    pub fn transient(&mut self, level: NoticeLevel, text: impl Into<String>, now: Instant) {
        self.show(level, text.into(), Some(now + self.timeout));
    }

    /// Shows a notice that stays until replaced.
    pub fn sticky(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.show(level, text.into(), None);
    }

    fn show(&mut self, level: NoticeLevel, text: String, expires_at: Option<Instant>) {
        debug!(?level, notice = %text, "notice");
        self.current = Some(Notice {
            level,
            text,
            expires_at,
        });
    }

    /// Hides the notice if it has expired. Returns `true` if one was hidden.
    pub fn expire(&mut self, now: Instant) -> bool {
        let expired = self
            .current
            .as_ref()
            .and_then(|notice| notice.expires_at)
            .is_some_and(|at| at <= now);
        if expired {
            self.current = None;
        }
        expired
    }

    /// The visible notice.
    #[must_use]
    pub const fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }
}
