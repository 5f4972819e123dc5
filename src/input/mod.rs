//! Keyboard input handling.
//!
//! Keys arrive as [`KeyCombo`]s. Bound combos map to a [`FormulaCommand`]
//! through [`KeybindingConfig`]; everything else is typing, which the
//! formula input interprets against its separators and closers.

pub mod command;
pub mod keybindings;

pub use command::FormulaCommand;
pub use keybindings::{KeyCombo, KeybindingConfig};
