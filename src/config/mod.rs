//! Per-instance formula configuration.
//!
//! Use the builder methods to customize an input.
//!
//! # Example
//!
//! ```
//! use formula::config::FormulaConfig;
//!
//! let config = FormulaConfig::default()
//!     .with_separators([" ", ";"])
//!     .with_closers("+-");
//! assert_eq!(config.closers, "+-");
//! ```

mod file;

pub use file::{ConfigFile, InputConfig, StaticExpander, CONFIG_ENV_VAR};

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::fields::{FieldExpander, NoFieldExpander};
use crate::models::FieldMap;
use crate::tokenizer::ENTER;

/// Default closers: arithmetic operators and parentheses.
pub const DEFAULT_CLOSERS: &str = "+-*/()%^";

/// Default label of the custom field button.
pub const DEFAULT_FIELD_LABEL: &str = "Custom Field";

/// Default separators: space and the Enter key.
pub fn default_separators() -> Vec<String> {
    vec![" ".to_string(), ENTER.to_string()]
}

/// User-facing strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lang {
    /// Label of the custom field button.
    #[serde(default = "default_field_label")]
    pub field: String,
}

fn default_field_label() -> String {
    DEFAULT_FIELD_LABEL.to_string()
}

impl Default for Lang {
    fn default() -> Self {
        Self {
            field: default_field_label(),
        }
    }
}

/// Settings of one formula input. Immutable once the input is built.
#[derive(Clone)]
pub struct FormulaConfig {
    /// Strings that commit the caret buffer and are discarded.
    /// `"Enter"` names the Enter key.
    pub separators: Vec<String>,
    /// Characters that commit the caret buffer and become tokens.
    pub closers: String,
    pub lang: Lang,
    /// Root of the custom field tree. The field picker exists only when set.
    pub custom_fields: Option<FieldMap>,
    /// Supplies children of nodes declared with `children: true`.
    pub on_field_expand: Arc<dyn FieldExpander>,
}

impl Default for FormulaConfig {
    fn default() -> Self {
        Self {
            separators: default_separators(),
            closers: DEFAULT_CLOSERS.to_string(),
            lang: Lang::default(),
            custom_fields: None,
            on_field_expand: Arc::new(NoFieldExpander),
        }
    }
}

impl fmt::Debug for FormulaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormulaConfig")
            .field("separators", &self.separators)
            .field("closers", &self.closers)
            .field("lang", &self.lang)
            .field("custom_fields", &self.custom_fields)
            .finish_non_exhaustive()
    }
}

impl FormulaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the separators.
    pub fn with_separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the closers.
    pub fn with_closers(mut self, closers: impl Into<String>) -> Self {
        self.closers = closers.into();
        self
    }

    /// Set the label of the custom field button.
    pub fn with_field_label(mut self, label: impl Into<String>) -> Self {
        self.lang.field = label.into();
        self
    }

    /// Enable the field picker with the given tree.
    pub fn with_custom_fields(mut self, fields: FieldMap) -> Self {
        self.custom_fields = Some(fields);
        self
    }

    /// Set the expansion callback for lazy field nodes.
    pub fn with_field_expander(mut self, expander: Arc<dyn FieldExpander>) -> Self {
        self.on_field_expand = expander;
        self
    }

    /// Whether `key` names a configured separator.
    pub fn is_separator(&self, key: &str) -> bool {
        self.separators.iter().any(|separator| separator == key)
    }
}
