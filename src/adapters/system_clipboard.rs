//! System clipboard adapter backed by arboard.

use async_trait::async_trait;
use tracing::debug;

use crate::error::ClipboardError;
use crate::traits::ClipboardProvider;

/// Reads the OS clipboard (NSPasteboard on macOS, X11/Wayland on Linux).
///
/// arboard is synchronous, so each read runs on a blocking task.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

fn map_arboard_error(err: arboard::Error) -> ClipboardError {
    match err {
        arboard::Error::ContentNotAvailable => ClipboardError::Empty,
        arboard::Error::ClipboardNotSupported => {
            ClipboardError::Unavailable("clipboard not supported".to_string())
        }
        arboard::Error::ClipboardOccupied => {
            ClipboardError::AccessDenied("clipboard occupied".to_string())
        }
        other => ClipboardError::Unavailable(other.to_string()),
    }
}

#[async_trait]
impl ClipboardProvider for SystemClipboard {
    async fn read_text(&self) -> Result<String, ClipboardError> {
        let text = tokio::task::spawn_blocking(|| {
            let mut clipboard = arboard::Clipboard::new().map_err(map_arboard_error)?;
            clipboard.get_text().map_err(map_arboard_error)
        })
        .await
        .map_err(|e| ClipboardError::Interrupted(e.to_string()))??;

        debug!(bytes = text.len(), "Read clipboard text");
        Ok(text)
    }
}
