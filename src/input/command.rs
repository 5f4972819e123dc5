//! Commands triggered by bound keys of a formula input.

/// A non-typing action on a formula input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormulaCommand {
    // =========================================================================
    // Editing
    // =========================================================================
    /// Move the caret one token to the left (Left)
    MoveLeft,
    /// Move the caret one token to the right (Right)
    MoveRight,
    /// Delete the last buffer character, or the token before the caret (Backspace)
    Backspace,
    /// Read the clipboard and tokenize it (Ctrl+V, Cmd+V)
    Paste,

    // =========================================================================
    // Field picker
    // =========================================================================
    /// Show or hide the field panel (Ctrl+F)
    ToggleFieldPanel,
    /// Highlight the previous field row (Up)
    FieldCursorUp,
    /// Highlight the next field row (Down)
    FieldCursorDown,
    /// Expand the highlighted field (Alt+Right)
    ExpandField,
    /// Collapse the highlighted field (Alt+Left)
    CollapseField,
    /// Insert the highlighted field as a token (Alt+Enter)
    InsertField,
}

impl FormulaCommand {
    /// Every command, in help order.
    pub const ALL: [FormulaCommand; 10] = [
        FormulaCommand::MoveLeft,
        FormulaCommand::MoveRight,
        FormulaCommand::Backspace,
        FormulaCommand::Paste,
        FormulaCommand::ToggleFieldPanel,
        FormulaCommand::FieldCursorUp,
        FormulaCommand::FieldCursorDown,
        FormulaCommand::ExpandField,
        FormulaCommand::CollapseField,
        FormulaCommand::InsertField,
    ];

    /// Short description for help output.
    pub fn description(&self) -> &'static str {
        match self {
            FormulaCommand::MoveLeft => "Move caret left",
            FormulaCommand::MoveRight => "Move caret right",
            FormulaCommand::Backspace => "Delete backward",
            FormulaCommand::Paste => "Paste from clipboard",
            FormulaCommand::ToggleFieldPanel => "Toggle custom fields",
            FormulaCommand::FieldCursorUp => "Previous field",
            FormulaCommand::FieldCursorDown => "Next field",
            FormulaCommand::ExpandField => "Expand field",
            FormulaCommand::CollapseField => "Collapse field",
            FormulaCommand::InsertField => "Insert field",
        }
    }

    /// Whether the command only applies while the field panel is open.
    pub fn is_field_panel_command(&self) -> bool {
        matches!(
            self,
            FormulaCommand::FieldCursorUp
                | FormulaCommand::FieldCursorDown
                | FormulaCommand::ExpandField
                | FormulaCommand::CollapseField
                | FormulaCommand::InsertField
        )
    }
}
