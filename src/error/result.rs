//! Result type alias for formula operations.

use super::formula_error::FormulaError;

/// Type alias for Results using FormulaError.
///
/// # Example
///
/// ```ignore
/// use formula::error::FormulaResult;
///
/// fn load() -> FormulaResult<ConfigFile> {
///     ConfigFile::load(path)
/// }
/// ```
pub type FormulaResult<T> = Result<T, FormulaError>;
