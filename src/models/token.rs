//! Committed tokens and the token sequence with its caret buffer.

use serde::{Deserialize, Serialize};

/// A committed unit of the formula: operator, operand or field reference.
///
/// Tokens are never edited in place. Editing replaces them wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    field_path: Option<String>,
}

impl Token {
    /// Create a plain operator/operand token.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            field_path: None,
        }
    }

    /// Create a token referencing a custom field.
    ///
    /// `label` is what the user sees, `path` is what `get()` serializes.
    pub fn field(path: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: label.into(),
            field_path: Some(path.into()),
        }
    }

    /// Display text.
    pub fn display(&self) -> &str {
        &self.text
    }

    /// Dotted field path, for field references.
    pub fn field_path(&self) -> Option<&str> {
        self.field_path.as_deref()
    }

    /// Whether this token references a custom field.
    pub fn is_field(&self) -> bool {
        self.field_path.is_some()
    }

    /// Serialized value: the field path when present and non-empty,
    /// the display text otherwise.
    pub fn value(&self) -> &str {
        match self.field_path.as_deref() {
            Some(path) if !path.is_empty() => path,
            _ => &self.text,
        }
    }
}

/// Ordered tokens plus the single uncommitted caret buffer.
///
/// The caret sits at an index in `0..=len`; tokens are inserted
/// immediately before it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSequence {
    tokens: Vec<Token>,
    buffer: String,
    caret: usize,
}

impl TokenSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.buffer.is_empty()
    }

    /// Current caret buffer content.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Caret position as a token slot index.
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Append raw text to the caret buffer.
    pub fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Append a single character to the caret buffer.
    pub fn push_char(&mut self, c: char) {
        self.buffer.push(c);
    }

    /// Replace the caret buffer content.
    pub fn set_buffer(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    /// Take the caret buffer content, leaving it empty.
    pub fn take_buffer(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    /// Remove the last buffer character. Returns it, if any.
    pub fn pop_char(&mut self) -> Option<char> {
        self.buffer.pop()
    }

    /// Insert a token before the caret; the caret stays after it.
    pub fn insert_before_caret(&mut self, token: Token) {
        self.tokens.insert(self.caret, token);
        self.caret += 1;
    }

    /// Remove the token immediately before the caret.
    pub fn remove_before_caret(&mut self) -> Option<Token> {
        if self.caret == 0 {
            return None;
        }
        self.caret -= 1;
        Some(self.tokens.remove(self.caret))
    }

    /// Move the caret one slot left. Returns false at the start.
    pub fn move_left(&mut self) -> bool {
        if self.caret == 0 {
            return false;
        }
        self.caret -= 1;
        true
    }

    /// Move the caret one slot right. Returns false at the end.
    pub fn move_right(&mut self) -> bool {
        if self.caret >= self.tokens.len() {
            return false;
        }
        self.caret += 1;
        true
    }

    /// Place the caret directly after the token at `index`.
    pub fn place_caret_after(&mut self, index: usize) -> bool {
        if index >= self.tokens.len() {
            return false;
        }
        self.caret = index + 1;
        true
    }

    /// Remove all tokens and empty the buffer.
    pub fn clear(&mut self) {
        self.tokens.clear();
        self.buffer.clear();
        self.caret = 0;
    }

    /// Serialize as a single space-joined string.
    ///
    /// Non-empty buffer content appears at the caret position.
    pub fn to_formula_string(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(self.tokens.len() + 1);
        for (index, token) in self.tokens.iter().enumerate() {
            if index == self.caret && !self.buffer.is_empty() {
                parts.push(&self.buffer);
            }
            parts.push(token.value());
        }
        if self.caret == self.tokens.len() && !self.buffer.is_empty() {
            parts.push(&self.buffer);
        }
        parts.join(" ")
    }
}
