//! Error handling for formula inputs.
//!
//! - **Error Categories**: classification used for handling decisions
//! - **Unified Error Type**: `FormulaError` consolidates all failures
//! - **Clipboard Errors**: `ClipboardError` from clipboard providers
//! - **Result Type Alias**: `FormulaResult<T>`
//!
//! | Category | Example | Surfaced as |
//! |----------|---------|-------------|
//! | User | Clipboard permission denied | Alert |
//! | External | Field expansion callback failed | Alert |
//! | Client | Unknown mount selector | `Err` to caller |
//! | Configuration | Malformed config file | Startup failure |
//! | System | Terminal I/O | Startup failure |

mod category;
mod clipboard;
mod formula_error;
mod result;

pub use category::ErrorCategory;
pub use clipboard::ClipboardError;
pub use formula_error::FormulaError;
pub use result::FormulaResult;
