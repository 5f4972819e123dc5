//! Mock implementations for testing.
//!
//! - [`InMemoryClipboard`] - clipboard with configurable text or failure

pub mod clipboard;

pub use clipboard::InMemoryClipboard;
