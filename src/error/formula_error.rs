//! Unified error type for the formula crate.

use std::path::PathBuf;

use thiserror::Error;

use super::category::ErrorCategory;
use super::clipboard::ClipboardError;

/// Unified error type for formula inputs and their host.
#[derive(Debug, Error)]
pub enum FormulaError {
    /// Reading the clipboard failed.
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    /// A field expansion callback failed.
    #[error("failed to expand field '{path}': {message}")]
    FieldExpansion { path: String, message: String },

    /// A field id does not exist in the tree.
    #[error("unknown field node {0}")]
    UnknownField(usize),

    /// The host has no input mounted under this selector.
    #[error("no formula mounted at '{0}'")]
    UnknownMount(String),

    /// The separator pattern could not be compiled.
    #[error("invalid separator pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for the expected shape.
    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Terminal I/O failed.
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormulaError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            FormulaError::Clipboard(ClipboardError::Unavailable(_)) => ErrorCategory::System,
            FormulaError::Clipboard(_) => ErrorCategory::User,
            FormulaError::FieldExpansion { .. } => ErrorCategory::External,
            FormulaError::UnknownField(_) | FormulaError::UnknownMount(_) => ErrorCategory::Client,
            FormulaError::Pattern(_)
            | FormulaError::ConfigRead { .. }
            | FormulaError::ConfigParse { .. } => ErrorCategory::Configuration,
            FormulaError::Io(_) => ErrorCategory::System,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// Get a user-friendly error message, as shown in the alert dialog.
    pub fn user_message(&self) -> String {
        match self {
            FormulaError::Clipboard(err) => format!("Error while fetching clipboard: {}", err),
            FormulaError::FieldExpansion { path, message } => {
                format!("Could not load fields of '{}': {}", path, message)
            }
            other => other.to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            FormulaError::Clipboard(err) => err.error_code(),
            FormulaError::FieldExpansion { .. } => "E_FIELD_EXPAND",
            FormulaError::UnknownField(_) => "E_FIELD_UNKNOWN",
            FormulaError::UnknownMount(_) => "E_MOUNT_UNKNOWN",
            FormulaError::Pattern(_) => "E_CONFIG_PATTERN",
            FormulaError::ConfigRead { .. } => "E_CONFIG_READ",
            FormulaError::ConfigParse { .. } => "E_CONFIG_PARSE",
            FormulaError::Io(_) => "E_IO",
        }
    }
}
