//! In-memory clipboard for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::error::ClipboardError;
use crate::traits::ClipboardProvider;

/// Clipboard double holding either text or the error to return.
///
/// # Example
///
/// ```ignore
/// use formula::adapters::mock::InMemoryClipboard;
///
/// let clipboard = InMemoryClipboard::with_text("a b");
/// assert_eq!(clipboard.read_text().await?, "a b");
///
/// clipboard.set_error(ClipboardError::AccessDenied("denied".into()));
/// assert!(clipboard.read_text().await.is_err());
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryClipboard {
    content: Arc<Mutex<Result<String, ClipboardError>>>,
    reads: Arc<Mutex<usize>>,
}

impl InMemoryClipboard {
    /// An empty clipboard: reads fail with [`ClipboardError::Empty`].
    pub fn new() -> Self {
        Self {
            content: Arc::new(Mutex::new(Err(ClipboardError::Empty))),
            reads: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let clipboard = Self::new();
        clipboard.set_text(text);
        clipboard
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *self.content.lock().unwrap() = Ok(text.into());
    }

    pub fn set_error(&self, error: ClipboardError) {
        *self.content.lock().unwrap() = Err(error);
    }

    /// Number of reads performed so far.
    pub fn read_count(&self) -> usize {
        *self.reads.lock().unwrap()
    }
}

impl Default for InMemoryClipboard {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClipboardProvider for InMemoryClipboard {
    async fn read_text(&self) -> Result<String, ClipboardError> {
        *self.reads.lock().unwrap() += 1;
        self.content.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_by_default() {
        let clipboard = InMemoryClipboard::new();
        assert_eq!(clipboard.read_text().await, Err(ClipboardError::Empty));
        assert_eq!(clipboard.read_count(), 1);
    }

    #[tokio::test]
    async fn test_text_then_error() {
        let clipboard = InMemoryClipboard::with_text("a b");
        assert_eq!(clipboard.read_text().await.unwrap(), "a b");

        clipboard.set_error(ClipboardError::AccessDenied("denied".to_string()));
        assert!(clipboard.read_text().await.is_err());
        assert_eq!(clipboard.read_count(), 2);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let clipboard = InMemoryClipboard::new();
        let other = clipboard.clone();
        other.set_text("shared");
        assert_eq!(clipboard.read_text().await.unwrap(), "shared");
    }
}
