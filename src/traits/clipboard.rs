//! Clipboard provider trait abstraction.
//!
//! Reading the clipboard is the only suspending operation of a formula
//! input. Abstracting it keeps the input model testable without a
//! display server.

use async_trait::async_trait;

use crate::error::ClipboardError;

/// Trait for reading text from a clipboard.
///
/// # Example
///
/// ```ignore
/// use formula::traits::ClipboardProvider;
///
/// async fn paste<C: ClipboardProvider>(clipboard: &C, formula: &mut Formula) {
///     let result = clipboard.read_text().await;
///     formula.complete_paste(result);
/// }
/// ```
#[async_trait]
pub trait ClipboardProvider: Send + Sync {
    /// Read the current clipboard text.
    async fn read_text(&self) -> Result<String, ClipboardError>;
}
