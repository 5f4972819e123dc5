//! Color theme constants for the formula editor.

use ratatui::style::Color;

// ============================================================================
// Frame
// ============================================================================

/// Border of an inactive input
pub const COLOR_BORDER: Color = Color::DarkGray;

/// Border and title of the focused input
pub const COLOR_ACCENT: Color = Color::White;

/// Dim text for hints and placeholders
pub const COLOR_DIM: Color = Color::DarkGray;

// ============================================================================
// Tokens
// ============================================================================

/// Plain operand tokens
pub const COLOR_TOKEN: Color = Color::Gray;

/// Closer (operator) tokens
pub const COLOR_CLOSER: Color = Color::Rgb(0, 122, 204); // blue #007ACC

/// Field reference chip background
pub const COLOR_FIELD_BG: Color = Color::Rgb(40, 44, 52);

/// Field reference chip text
pub const COLOR_FIELD_TEXT: Color = Color::Rgb(4, 181, 117); // green #04B575

/// Caret marker and the uncommitted buffer
pub const COLOR_CARET: Color = Color::LightGreen;

// ============================================================================
// Buttons and field panel
// ============================================================================

/// Operator and field buttons
pub const COLOR_BUTTON: Color = Color::Gray;

/// Hovered button
pub const COLOR_BUTTON_HOVER: Color = Color::White;

/// Highlighted field row background
pub const COLOR_HIGHLIGHT_BG: Color = Color::Rgb(40, 44, 52);

/// Loading indicator on a field row
pub const COLOR_LOADING: Color = Color::Cyan;

// ============================================================================
// Dialog
// ============================================================================

/// Alert dialog background
pub const COLOR_DIALOG_BG: Color = Color::Rgb(10, 15, 35);

/// Alert dialog border
pub const COLOR_ERROR: Color = Color::Red;
