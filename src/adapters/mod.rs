//! Concrete implementations of trait abstractions.
//!
//! - [`SystemClipboard`] - OS clipboard through arboard
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::InMemoryClipboard`] - configurable clipboard contents

pub mod mock;
pub mod system_clipboard;

pub use mock::InMemoryClipboard;
pub use system_clipboard::SystemClipboard;
