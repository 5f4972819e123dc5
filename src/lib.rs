//! Formula - a tokenizing formula input for the terminal
//!
//! Keystrokes are split into tokens (operators, operands and custom field
//! references) as they are typed. Inputs are mounted on a
//! [`host::FormulaHost`] that routes focus and keys; the `formula` binary
//! renders them with ratatui.
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod fields;
pub mod formula;
pub mod host;
pub mod input;
pub mod logging;
pub mod models;
pub mod prelude;
pub mod terminal;
pub mod tokenizer;
pub mod traits;
pub mod ui;
