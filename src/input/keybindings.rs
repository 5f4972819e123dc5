//! Default keybindings of a formula input.
//!
//! Bindings cover the non-typing keys: caret movement, deletion, paste
//! and the field picker. Typed characters and separators are handled by
//! the input itself.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::command::FormulaCommand;

/// Represents a key combination (key code + modifiers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyCombo {
    /// Creates a new key combo with the given code and modifiers.
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Creates a key combo with no modifiers.
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    /// Creates a key combo with Control modifier.
    pub const fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    /// Creates a key combo with Alt modifier.
    pub const fn alt(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::ALT)
    }

    /// Creates a key combo with Super (Cmd on macOS) modifier.
    pub const fn super_key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SUPER)
    }

    /// A typed character. Uppercase letters carry Shift, as terminals report them.
    pub fn char(c: char) -> Self {
        if c.is_uppercase() {
            Self::new(KeyCode::Char(c), KeyModifiers::SHIFT)
        } else {
            Self::plain(KeyCode::Char(c))
        }
    }

    /// Key combo used for binding lookup.
    ///
    /// Shift is dropped for characters since it is already part of the
    /// character itself.
    fn lookup_key(&self) -> Self {
        match self.code {
            KeyCode::Char(c) => Self::new(
                KeyCode::Char(c.to_ascii_lowercase()),
                self.modifiers.difference(KeyModifiers::SHIFT),
            ),
            _ => *self,
        }
    }

    /// The character this combo types, if it is a plain printable key.
    pub fn printable(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c)
                if !c.is_control()
                    && !self
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER) =>
            {
                Some(c)
            }
            _ => None,
        }
    }

    /// Key name matched against configured separators.
    ///
    /// Named keys keep their name whatever the modifiers (`"Enter"`,
    /// `"Tab"`); printable keys are the character itself.
    pub fn key_name(&self) -> Option<Cow<'static, str>> {
        match self.code {
            KeyCode::Enter => Some(Cow::Borrowed("Enter")),
            KeyCode::Tab => Some(Cow::Borrowed("Tab")),
            KeyCode::Esc => Some(Cow::Borrowed("Escape")),
            KeyCode::Delete => Some(Cow::Borrowed("Delete")),
            KeyCode::Char(_) => self.printable().map(|c| Cow::Owned(c.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (modifier, label) in [
            (KeyModifiers::CONTROL, "Ctrl+"),
            (KeyModifiers::ALT, "Alt+"),
            (KeyModifiers::SUPER, "Super+"),
            (KeyModifiers::SHIFT, "Shift+"),
        ] {
            if self.modifiers.contains(modifier) {
                f.write_str(label)?;
            }
        }
        match self.code {
            KeyCode::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            KeyCode::Esc => f.write_str("Esc"),
            other => write!(f, "{:?}", other),
        }
    }
}

impl From<KeyEvent> for KeyCombo {
    fn from(event: KeyEvent) -> Self {
        Self::new(event.code, event.modifiers)
    }
}

impl From<&KeyEvent> for KeyCombo {
    fn from(event: &KeyEvent) -> Self {
        Self::new(event.code, event.modifiers)
    }
}

/// Keybinding configuration for a formula input.
#[derive(Debug, Clone)]
pub struct KeybindingConfig {
    /// Bindings active whenever the input is active.
    pub editing: HashMap<KeyCombo, FormulaCommand>,
    /// Bindings active while the field panel is open. Checked first.
    pub field_panel: HashMap<KeyCombo, FormulaCommand>,
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingConfig {
    /// Creates a new keybinding configuration with default bindings.
    pub fn new() -> Self {
        let mut config = Self {
            editing: HashMap::new(),
            field_panel: HashMap::new(),
        };

        config.setup_editing_bindings();
        config.setup_field_panel_bindings();

        config
    }

    fn setup_editing_bindings(&mut self) {
        self.editing
            .insert(KeyCombo::plain(KeyCode::Left), FormulaCommand::MoveLeft);
        self.editing
            .insert(KeyCombo::plain(KeyCode::Right), FormulaCommand::MoveRight);
        self.editing
            .insert(KeyCombo::plain(KeyCode::Backspace), FormulaCommand::Backspace);

        // Platform paste modifier
        self.editing
            .insert(KeyCombo::ctrl(KeyCode::Char('v')), FormulaCommand::Paste);
        self.editing
            .insert(KeyCombo::super_key(KeyCode::Char('v')), FormulaCommand::Paste);

        // The "Custom Field" button
        self.editing.insert(
            KeyCombo::ctrl(KeyCode::Char('f')),
            FormulaCommand::ToggleFieldPanel,
        );
    }

    fn setup_field_panel_bindings(&mut self) {
        self.field_panel
            .insert(KeyCombo::plain(KeyCode::Up), FormulaCommand::FieldCursorUp);
        self.field_panel
            .insert(KeyCombo::plain(KeyCode::Down), FormulaCommand::FieldCursorDown);
        self.field_panel
            .insert(KeyCombo::alt(KeyCode::Right), FormulaCommand::ExpandField);
        self.field_panel
            .insert(KeyCombo::alt(KeyCode::Left), FormulaCommand::CollapseField);
        self.field_panel
            .insert(KeyCombo::alt(KeyCode::Enter), FormulaCommand::InsertField);
    }

    /// Combos bound to `command`, in display order.
    pub fn combos_for(&self, command: FormulaCommand) -> Vec<KeyCombo> {
        let bindings = if command.is_field_panel_command() {
            &self.field_panel
        } else {
            &self.editing
        };
        let mut combos: Vec<KeyCombo> = bindings
            .iter()
            .filter(|(_, bound)| **bound == command)
            .map(|(combo, _)| *combo)
            .collect();
        combos.sort_by_key(|combo| combo.to_string());
        combos
    }

    /// Look up the command bound to `combo`.
    pub fn lookup(&self, combo: &KeyCombo, field_panel_open: bool) -> Option<FormulaCommand> {
        let key = combo.lookup_key();
        if field_panel_open {
            if let Some(command) = self.field_panel.get(&key) {
                return Some(*command);
            }
        }
        self.editing.get(&key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paste_bindings() {
        let config = KeybindingConfig::new();
        assert_eq!(
            config.lookup(&KeyCombo::ctrl(KeyCode::Char('v')), false),
            Some(FormulaCommand::Paste)
        );
        assert_eq!(
            config.lookup(&KeyCombo::super_key(KeyCode::Char('v')), false),
            Some(FormulaCommand::Paste)
        );
        // Ctrl+Shift+V reports an uppercase V on some terminals
        assert_eq!(
            config.lookup(
                &KeyCombo::new(
                    KeyCode::Char('V'),
                    KeyModifiers::CONTROL | KeyModifiers::SHIFT
                ),
                false
            ),
            Some(FormulaCommand::Paste)
        );
    }

    #[test]
    fn test_field_bindings_only_when_open() {
        let config = KeybindingConfig::new();
        let up = KeyCombo::plain(KeyCode::Up);
        assert_eq!(config.lookup(&up, false), None);
        assert_eq!(config.lookup(&up, true), Some(FormulaCommand::FieldCursorUp));
        assert_eq!(
            config.lookup(&KeyCombo::plain(KeyCode::Left), true),
            Some(FormulaCommand::MoveLeft)
        );
    }

    #[test]
    fn test_plain_chars_unbound() {
        let config = KeybindingConfig::new();
        assert_eq!(config.lookup(&KeyCombo::char('v'), false), None);
        assert_eq!(config.lookup(&KeyCombo::char('V'), false), None);
    }

    #[test]
    fn test_printable() {
        assert_eq!(KeyCombo::char('a').printable(), Some('a'));
        assert_eq!(KeyCombo::char('A').printable(), Some('A'));
        assert_eq!(KeyCombo::ctrl(KeyCode::Char('a')).printable(), None);
        assert_eq!(KeyCombo::alt(KeyCode::Char('a')).printable(), None);
        assert_eq!(KeyCombo::plain(KeyCode::Left).printable(), None);
    }

    #[test]
    fn test_key_names() {
        assert_eq!(KeyCombo::plain(KeyCode::Enter).key_name().as_deref(), Some("Enter"));
        assert_eq!(KeyCombo::alt(KeyCode::Enter).key_name().as_deref(), Some("Enter"));
        assert_eq!(KeyCombo::plain(KeyCode::Tab).key_name().as_deref(), Some("Tab"));
        assert_eq!(KeyCombo::char(' ').key_name().as_deref(), Some(" "));
        assert_eq!(KeyCombo::ctrl(KeyCode::Char('x')).key_name(), None);
        assert_eq!(KeyCombo::plain(KeyCode::F(1)).key_name(), None);
    }

    #[test]
    fn test_combo_labels() {
        assert_eq!(KeyCombo::ctrl(KeyCode::Char('v')).to_string(), "Ctrl+V");
        assert_eq!(KeyCombo::alt(KeyCode::Enter).to_string(), "Alt+Enter");
        assert_eq!(KeyCombo::plain(KeyCode::Backspace).to_string(), "Backspace");
    }

    #[test]
    fn test_combos_for_command() {
        let config = KeybindingConfig::new();
        assert_eq!(
            config.combos_for(FormulaCommand::Paste),
            vec![
                KeyCombo::ctrl(KeyCode::Char('v')),
                KeyCombo::super_key(KeyCode::Char('v'))
            ]
        );
        assert_eq!(
            config.combos_for(FormulaCommand::InsertField),
            vec![KeyCombo::alt(KeyCode::Enter)]
        );
    }
}
