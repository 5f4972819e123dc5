//! Clipboard read errors.

use thiserror::Error;

/// Errors returned by a [`ClipboardProvider`](crate::traits::ClipboardProvider).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    /// No clipboard backend could be opened (headless session, no display).
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    /// The clipboard holds no text.
    #[error("clipboard is empty")]
    Empty,

    /// The platform refused access.
    #[error("clipboard access denied: {0}")]
    AccessDenied(String),

    /// The read task did not complete.
    #[error("clipboard read interrupted: {0}")]
    Interrupted(String),
}

impl ClipboardError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClipboardError::Unavailable(_) => "E_CLIPBOARD_UNAVAILABLE",
            ClipboardError::Empty => "E_CLIPBOARD_EMPTY",
            ClipboardError::AccessDenied(_) => "E_CLIPBOARD_DENIED",
            ClipboardError::Interrupted(_) => "E_CLIPBOARD_INTERRUPTED",
        }
    }
}
