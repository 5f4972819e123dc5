//! Trait abstractions for dependency injection and testability.
//!
//! - [`ClipboardProvider`] - asynchronous clipboard text reads
//!
//! Field expansion has its own trait next to the field model:
//! [`crate::fields::FieldExpander`].

pub mod clipboard;

pub use clipboard::ClipboardProvider;
