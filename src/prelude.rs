//! Prelude module for convenient imports.
//!
//! ```
//! use formula::prelude::*;
//!
//! let mut host = FormulaHost::new();
//! host.mount("price", FormulaConfig::default()).unwrap().set("a * b");
//! assert_eq!(host.get("price").unwrap().get(), "a * b");
//! ```

pub use crate::config::{ConfigFile, FormulaConfig};
pub use crate::error::{ClipboardError, FormulaError, FormulaResult};
pub use crate::fields::{ExpandRequest, FieldExpander, FieldTree, FnExpander, ToggleOutcome};
pub use crate::formula::{Alert, Formula, InstanceId, KeyOutcome};
pub use crate::host::FormulaHost;
pub use crate::input::{KeyCombo, KeybindingConfig};
pub use crate::models::{FieldMap, FieldNode, Token};
pub use crate::traits::ClipboardProvider;
