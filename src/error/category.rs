//! Error category classification for unified error handling.
//!
//! Categories drive how the host reacts to a failure: user-facing
//! problems become an alert, configuration problems abort startup.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Programming errors (unknown mount, invalid state).
    /// Not retryable.
    Client,

    /// User action required (clipboard permissions, empty clipboard).
    User,

    /// System/OS errors (filesystem, terminal, clipboard backend).
    System,

    /// Configuration errors (unreadable or malformed config file).
    Configuration,

    /// Failures reported by an external collaborator such as a
    /// field expansion callback.
    External,
}

impl ErrorCategory {
    /// Returns true if the operation may succeed when attempted again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::User | ErrorCategory::External)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Client => "client",
            ErrorCategory::User => "user",
            ErrorCategory::System => "system",
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::External => "external",
        }
    }

    /// Returns a user-friendly description of the category.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCategory::Client => "Application error",
            ErrorCategory::User => "User action required",
            ErrorCategory::System => "System error",
            ErrorCategory::Configuration => "Configuration problem",
            ErrorCategory::External => "Field source error",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Client => "This may be a bug. Please report this issue if it persists",
            ErrorCategory::User => "Check clipboard permissions and try again",
            ErrorCategory::System => "Check your terminal and file permissions",
            ErrorCategory::Configuration => "Check your configuration file",
            ErrorCategory::External => "Collapse the field and expand it again to retry",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
