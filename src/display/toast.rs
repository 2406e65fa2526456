//! Toast notifications
//!
//! User-visible messages raised by mutations and forms. The CLI prints them
//! with the command's result.

use super::{BadgeColor, paint};

/// A toast notification message
#[derive(Debug, Clone)]
pub struct Toast {
    /// The message to display
    pub message: String,
    /// The severity level of the toast
    pub level: ToastLevel,
}

/// Severity level for toast notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
    Success,
}

impl Toast {
    /// Create a new toast with the given message and level
    pub fn new(message: String, level: ToastLevel) -> Self {
        Self { message, level }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Error)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Success)
    }

    /// Get the color associated with this toast's level
    pub fn color(&self) -> BadgeColor {
        match self.level {
            ToastLevel::Info => BadgeColor::Teal,
            ToastLevel::Warning => BadgeColor::Yellow,
            ToastLevel::Error => BadgeColor::Red,
            ToastLevel::Success => BadgeColor::Green,
        }
    }

    /// Render as a single colored line
    pub fn render(&self) -> String {
        let prefix = match self.level {
            ToastLevel::Info => "info",
            ToastLevel::Warning => "warning",
            ToastLevel::Error => "error",
            ToastLevel::Success => "ok",
        };
        paint(&format!("{prefix}: {}", self.message), self.color())
    }
}
