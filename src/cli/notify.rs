//! User-facing notices.
//!
//! Commands report outcomes ("Book saved!", "Book already in library!")
//! through a [`Notifier`] so the presentation can be swapped without
//! touching command logic.

use std::sync::Mutex;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Sink for user-facing notices
pub trait Notifier {
    fn notify(&self, level: NoticeLevel, message: &str);

    fn info(&self, message: &str) {
        self.notify(NoticeLevel::Info, message);
    }

    fn success(&self, message: &str) {
        self.notify(NoticeLevel::Success, message);
    }

    fn warning(&self, message: &str) {
        self.notify(NoticeLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.notify(NoticeLevel::Error, message);
    }
}

/// Writes notices to stderr
#[derive(Debug, Clone, Copy)]
pub struct ConsoleNotifier {
    emoji: bool,
}

impl ConsoleNotifier {
    pub fn new(emoji: bool) -> Self {
        Self { emoji }
    }

    fn format(&self, level: NoticeLevel, message: &str) -> String {
        let prefix = match (self.emoji, level) {
            (true, NoticeLevel::Info) => "ℹ️ ",
            (true, NoticeLevel::Success) => "✅",
            (true, NoticeLevel::Warning) => "⚠️ ",
            (true, NoticeLevel::Error) => "❌",
            (false, NoticeLevel::Info) => "[info]",
            (false, NoticeLevel::Success) => "[ok]",
            (false, NoticeLevel::Warning) => "[warn]",
            (false, NoticeLevel::Error) => "[error]",
        };
        format!("{} {}", prefix, message)
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        eprintln!("{}", self.format(level, message));
    }
}

/// Collects notices in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(NoticeLevel, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far
    pub fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push((level, message.to_string()));
        }
    }
}
