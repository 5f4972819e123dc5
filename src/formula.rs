//! The formula input: token sequence, caret buffer and key handling.
//!
//! A [`Formula`] is host independent. The host feeds it key combos,
//! clicks and clipboard results, and runs the asynchronous work it asks
//! for ([`KeyOutcome::PasteRequested`], [`KeyOutcome::ExpandRequested`]).
//!
//! # Example
//!
//! ```
//! use formula::config::FormulaConfig;
//! use formula::formula::Formula;
//! use formula::input::KeyCombo;
//!
//! let mut formula = Formula::new(FormulaConfig::default().with_closers("+-")).unwrap();
//! formula.activate();
//! for c in ['1', '+', '2'] {
//!     formula.handle_key(KeyCombo::char(c));
//! }
//! assert_eq!(formula.get(), "1 + 2");
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, warn};

use crate::config::FormulaConfig;
use crate::error::{ClipboardError, ErrorCategory, FormulaError, FormulaResult};
use crate::fields::{ExpandRequest, FieldTree, NodeId, ToggleOutcome};
use crate::input::{FormulaCommand, KeyCombo, KeybindingConfig};
use crate::models::{FieldMap, Token, TokenSequence};
use crate::tokenizer::Tokenizer;
use crate::traits::ClipboardProvider;

/// What the input did with a key press or paste.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// Not for this input (inactive, or an unbound non-printable key).
    Ignored,
    /// State changed or the key was consumed.
    Handled,
    /// A paste is pending; the input will be replayed after it completes.
    Queued,
    /// The host must read the clipboard and call [`Formula::complete_paste`].
    PasteRequested,
    /// The host must run the expansion callback and call
    /// [`Formula::resolve_field`].
    ExpandRequested(ExpandRequest),
}

impl KeyOutcome {
    /// Whether the host has asynchronous work to start.
    pub fn needs_host(&self) -> bool {
        matches!(
            self,
            KeyOutcome::PasteRequested | KeyOutcome::ExpandRequested(_)
        )
    }
}

/// Input received while a clipboard read was pending.
#[derive(Debug, Clone, PartialEq)]
enum QueuedInput {
    Key(KeyCombo),
    Text(String),
}

/// A blocking error dialog held by an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub category: ErrorCategory,
}

impl Alert {
    fn from_error(err: &FormulaError) -> Self {
        Self {
            message: err.user_message(),
            category: err.category(),
        }
    }

    /// Dialog title.
    pub fn title(&self) -> &'static str {
        self.category.description()
    }

    /// What the user can do about it.
    pub fn hint(&self) -> &'static str {
        self.category.recovery_hint()
    }
}

/// Process-unique identity of a [`Formula`].
pub type InstanceId = u64;

fn next_instance_id() -> InstanceId {
    static NEXT_ID: AtomicU64 = AtomicU64::new(1);
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A tokenizing formula input.
#[derive(Debug)]
pub struct Formula {
    id: InstanceId,
    config: FormulaConfig,
    tokenizer: Tokenizer,
    keybindings: KeybindingConfig,
    sequence: TokenSequence,
    fields: Option<FieldTree>,
    field_panel_open: bool,
    active: bool,
    paste_pending: bool,
    queued: VecDeque<QueuedInput>,
    alert: Option<Alert>,
}

impl Formula {
    /// Build an input from its configuration.
    pub fn new(config: FormulaConfig) -> FormulaResult<Self> {
        let tokenizer = Tokenizer::new(&config.separators, &config.closers)?;
        let fields = config.custom_fields.as_ref().map(FieldTree::new);

        Ok(Self {
            id: next_instance_id(),
            config,
            tokenizer,
            keybindings: KeybindingConfig::default(),
            sequence: TokenSequence::new(),
            fields,
            field_panel_open: false,
            active: false,
            paste_pending: false,
            queued: VecDeque::new(),
            alert: None,
        })
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Identity of this instance. Never shared with a later instance
    /// mounted under the same selector.
    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn config(&self) -> &FormulaConfig {
        &self.config
    }

    /// Committed tokens in display order.
    pub fn tokens(&self) -> &[Token] {
        self.sequence.tokens()
    }

    /// Uncommitted caret buffer.
    pub fn buffer(&self) -> &str {
        self.sequence.buffer()
    }

    /// Caret slot index in `0..=tokens().len()`.
    pub fn caret(&self) -> usize {
        self.sequence.caret()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_paste_pending(&self) -> bool {
        self.paste_pending
    }

    /// Message of the blocking alert, if one is shown.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_ref().map(|alert| alert.message.as_str())
    }

    /// The blocking alert with its category.
    pub fn alert_details(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    /// Closers in button order.
    pub fn closers(&self) -> &[char] {
        self.tokenizer.closers()
    }

    /// Field tree, when custom fields are configured.
    pub fn fields(&self) -> Option<&FieldTree> {
        self.fields.as_ref()
    }

    pub fn is_field_panel_open(&self) -> bool {
        self.fields.is_some() && self.field_panel_open
    }

    // ------------------------------------------------------------------
    // Public formula API
    // ------------------------------------------------------------------

    /// The formula as one space-joined string.
    ///
    /// Field tokens contribute their path, other tokens their text.
    /// Uncommitted buffer content appears at the caret position.
    pub fn get(&self) -> String {
        self.sequence.to_formula_string()
    }

    /// Clear the input, then [`add`](Self::add) `text`.
    pub fn set(&mut self, text: &str) -> &mut Self {
        self.clear().add(text)
    }

    /// Append `text` to the caret buffer and tokenize it.
    pub fn add(&mut self, text: &str) -> &mut Self {
        self.sequence.push_str(text);
        self.commit();
        self
    }

    /// Remove all tokens and empty the caret buffer.
    pub fn clear(&mut self) -> &mut Self {
        self.sequence.clear();
        self
    }

    /// Tear the input down.
    pub fn destroy(self) {
        info!(tokens = self.sequence.len(), "Formula input destroyed");
    }

    // ------------------------------------------------------------------
    // Focus and clicks
    // ------------------------------------------------------------------

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Click on a committed token: activate and put the caret after it.
    pub fn click_token(&mut self, index: usize) {
        self.activate();
        self.sequence.place_caret_after(index);
    }

    /// Click on an operator button.
    pub fn click_closer(&mut self, closer: char) {
        let mut text = [0u8; 4];
        self.add(closer.encode_utf8(&mut text));
    }

    /// Close the alert dialog.
    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    // ------------------------------------------------------------------
    // Keys and paste
    // ------------------------------------------------------------------

    /// Handle a key press.
    pub fn handle_key(&mut self, combo: KeyCombo) -> KeyOutcome {
        if !self.active {
            return KeyOutcome::Ignored;
        }
        if self.alert.take().is_some() {
            return KeyOutcome::Handled;
        }
        if self.paste_pending {
            self.queued.push_back(QueuedInput::Key(combo));
            return KeyOutcome::Queued;
        }
        self.apply_key(combo)
    }

    /// Handle text delivered by the terminal (bracketed paste).
    pub fn handle_paste(&mut self, text: &str) -> KeyOutcome {
        if !self.active {
            return KeyOutcome::Ignored;
        }
        self.alert = None;
        if self.paste_pending {
            self.queued.push_back(QueuedInput::Text(text.to_string()));
            return KeyOutcome::Queued;
        }
        self.add(text);
        KeyOutcome::Handled
    }

    /// Apply the result of a clipboard read requested by
    /// [`KeyOutcome::PasteRequested`].
    ///
    /// Input queued while the read was pending is replayed afterwards.
    /// Returned outcomes are the replayed ones that need the host.
    /// Without a pending read the result is dropped.
    pub fn complete_paste(&mut self, result: Result<String, ClipboardError>) -> Vec<KeyOutcome> {
        if !self.paste_pending {
            debug!("Dropping clipboard result with no pending paste");
            return Vec::new();
        }
        self.paste_pending = false;

        match result {
            Ok(text) => {
                debug!(bytes = text.len(), "Pasting clipboard text");
                self.add(&text);
            }
            Err(err) => {
                let err = FormulaError::from(err);
                warn!(code = err.error_code(), "Clipboard read failed: {}", err);
                self.alert = Some(Alert::from_error(&err));
            }
        }

        self.replay_queued()
    }

    /// Read `clipboard` and paste, without going through the key path.
    pub async fn paste_from(&mut self, clipboard: &dyn ClipboardProvider) -> Vec<KeyOutcome> {
        self.paste_pending = true;
        let result = clipboard.read_text().await;
        self.complete_paste(result)
    }

    fn replay_queued(&mut self) -> Vec<KeyOutcome> {
        let mut pending = Vec::new();

        while !self.paste_pending {
            let Some(input) = self.queued.pop_front() else {
                break;
            };
            let outcome = match input {
                QueuedInput::Key(combo) => self.apply_key(combo),
                QueuedInput::Text(text) => {
                    self.add(&text);
                    KeyOutcome::Handled
                }
            };
            if outcome.needs_host() {
                pending.push(outcome);
            }
        }

        pending
    }

    fn apply_key(&mut self, combo: KeyCombo) -> KeyOutcome {
        if let Some(command) = self
            .keybindings
            .lookup(&combo, self.is_field_panel_open())
        {
            return self.run_command(command);
        }

        if let Some(name) = combo.key_name() {
            if self.config.is_separator(&name) {
                self.commit();
                return KeyOutcome::Handled;
            }
        }

        match combo.printable() {
            Some(c) => {
                self.type_char(c);
                KeyOutcome::Handled
            }
            None => KeyOutcome::Ignored,
        }
    }

    fn run_command(&mut self, command: FormulaCommand) -> KeyOutcome {
        match command {
            FormulaCommand::MoveLeft => {
                self.sequence.move_left();
            }
            FormulaCommand::MoveRight => {
                self.sequence.move_right();
            }
            FormulaCommand::Backspace => {
                if self.sequence.pop_char().is_none() {
                    self.sequence.remove_before_caret();
                }
            }
            FormulaCommand::Paste => {
                self.paste_pending = true;
                return KeyOutcome::PasteRequested;
            }
            FormulaCommand::ToggleFieldPanel => {
                if self.fields.is_none() {
                    return KeyOutcome::Ignored;
                }
                self.toggle_field_panel();
            }
            FormulaCommand::FieldCursorUp => {
                if let Some(tree) = self.fields.as_mut() {
                    tree.cursor_up();
                }
            }
            FormulaCommand::FieldCursorDown => {
                if let Some(tree) = self.fields.as_mut() {
                    tree.cursor_down();
                }
            }
            FormulaCommand::ExpandField => return self.expand_highlighted(),
            FormulaCommand::CollapseField => self.collapse_highlighted(),
            FormulaCommand::InsertField => {
                if let Some(id) = self.fields.as_ref().and_then(FieldTree::highlighted) {
                    if let Err(err) = self.insert_field(id) {
                        warn!("Failed to insert field: {}", err);
                    }
                }
            }
        }
        KeyOutcome::Handled
    }

    fn expand_highlighted(&mut self) -> KeyOutcome {
        let Some(tree) = self.fields.as_ref() else {
            return KeyOutcome::Ignored;
        };
        let Some(id) = tree.highlighted() else {
            return KeyOutcome::Handled;
        };
        if tree.get(id).is_some_and(|entry| entry.open) {
            return KeyOutcome::Handled;
        }
        match self.toggle_field(id) {
            Ok(ToggleOutcome::Expand(request)) => KeyOutcome::ExpandRequested(request),
            Ok(_) => KeyOutcome::Handled,
            Err(err) => {
                warn!("Failed to expand field: {}", err);
                KeyOutcome::Handled
            }
        }
    }

    fn collapse_highlighted(&mut self) {
        let Some(tree) = self.fields.as_mut() else {
            return;
        };
        let Some(id) = tree.highlighted() else {
            return;
        };
        let Some(entry) = tree.get(id) else {
            return;
        };

        if entry.open {
            if let Err(err) = tree.collapse(id) {
                warn!("Failed to collapse field: {}", err);
            }
        } else if let Some(parent) = entry.parent {
            tree.highlight(parent);
        }
    }

    /// Append a typed character, splitting on closers.
    fn type_char(&mut self, c: char) {
        if self.tokenizer.is_closer(c) {
            self.commit();
            self.sequence.set_buffer(c.to_string());
            self.commit();
        } else {
            self.sequence.push_char(c);
        }
    }

    /// Tokenize the caret buffer into tokens before the caret.
    fn commit(&mut self) {
        if self.sequence.buffer().is_empty() {
            return;
        }

        let content = self.sequence.take_buffer();
        let pieces = self.tokenizer.split(&content);
        debug!(pieces = pieces.len(), caret = self.sequence.caret(), "Committing caret buffer");

        for piece in pieces {
            self.sequence.insert_before_caret(Token::text(piece));
        }
    }

    // ------------------------------------------------------------------
    // Custom fields
    // ------------------------------------------------------------------

    /// Show or hide the field panel. Hiding collapses every node.
    pub fn toggle_field_panel(&mut self) {
        let Some(tree) = self.fields.as_mut() else {
            return;
        };
        self.field_panel_open = !self.field_panel_open;
        if !self.field_panel_open {
            tree.collapse_all();
        }
        debug!(open = self.field_panel_open, "Toggled field panel");
    }

    /// Toggle a field node open or closed.
    pub fn toggle_field(&mut self, id: NodeId) -> FormulaResult<ToggleOutcome> {
        match self.fields.as_mut() {
            Some(tree) => {
                let outcome = tree.toggle(id)?;
                tree.highlight(id);
                Ok(outcome)
            }
            None => Err(FormulaError::UnknownField(id)),
        }
    }

    /// Apply the result of an expansion callback.
    ///
    /// A failure resets the node so the next expansion retries, and
    /// shows the alert. Results for a node that is not loading are dropped.
    pub fn resolve_field(&mut self, id: NodeId, result: FormulaResult<FieldMap>) -> FormulaResult<()> {
        let tree = self.fields.as_mut().ok_or(FormulaError::UnknownField(id))?;
        if !tree.get(id).ok_or(FormulaError::UnknownField(id))?.is_loading() {
            debug!(node = id, "Dropping expansion result for a node that is not loading");
            return Ok(());
        }
        match result {
            Ok(children) => tree.resolve(id, &children),
            Err(err) => {
                warn!(code = err.error_code(), "Field expansion failed: {}", err);
                tree.fail(id)?;
                self.alert = Some(Alert::from_error(&err));
                Ok(())
            }
        }
    }

    /// Toggle a node and, on first expansion, run the configured
    /// expansion callback inline.
    pub async fn expand_field(&mut self, id: NodeId) -> FormulaResult<ToggleOutcome> {
        let outcome = self.toggle_field(id)?;
        if let ToggleOutcome::Expand(request) = &outcome {
            let expander = self.config.on_field_expand.clone();
            let result = expander.expand(request).await;
            self.resolve_field(id, result)?;
        }
        Ok(outcome)
    }

    /// Insert a field reference token before the caret.
    pub fn insert_field(&mut self, id: NodeId) -> FormulaResult<()> {
        let tree = self.fields.as_ref().ok_or(FormulaError::UnknownField(id))?;
        let token = tree.token_for(id)?;
        debug!(path = ?token.field_path(), "Inserting field token");
        self.sequence.insert_before_caret(token);
        Ok(())
    }
}
