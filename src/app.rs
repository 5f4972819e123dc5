//! Application state and event handling for the formula editor.
//!
//! The app owns the [`FormulaHost`] and turns terminal events into host
//! calls. Clipboard reads and field expansions run as tokio tasks and
//! report back through [`AppMessage`]s.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::{ClipboardError, FormulaResult};
use crate::fields::{ExpandRequest, NodeId, ToggleOutcome};
use crate::formula::{Formula, InstanceId, KeyOutcome};
use crate::host::FormulaHost;
use crate::input::KeyCombo;
use crate::models::FieldMap;
use crate::traits::ClipboardProvider;
use crate::ui::interaction::{ClickAction, HitAreaRegistry};

/// Results of background work, delivered to the event loop.
///
/// `instance` is the [`Formula::id`] of the requester. A result is only
/// applied while that same instance is mounted.
#[derive(Debug)]
pub enum AppMessage {
    /// A clipboard read requested by an input finished
    PasteCompleted {
        mount: String,
        instance: InstanceId,
        result: Result<String, ClipboardError>,
    },
    /// A field expansion callback finished
    FieldsExpanded {
        mount: String,
        instance: InstanceId,
        node: NodeId,
        result: FormulaResult<FieldMap>,
    },
}

/// Main application state.
pub struct App {
    pub host: FormulaHost,
    /// Click targets of the last frame
    pub hit_areas: HitAreaRegistry,
    pub clipboard: Arc<dyn ClipboardProvider>,
    pub message_tx: mpsc::UnboundedSender<AppMessage>,
    /// Taken by the event loop
    pub message_rx: Option<mpsc::UnboundedReceiver<AppMessage>>,
    pub should_quit: bool,
    pub needs_redraw: bool,
}

impl App {
    pub fn new(host: FormulaHost, clipboard: Arc<dyn ClipboardProvider>) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        Self {
            host,
            hit_areas: HitAreaRegistry::new(),
            clipboard,
            message_tx,
            message_rx: Some(message_rx),
            should_quit: false,
            needs_redraw: true,
        }
    }

    pub fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    /// Current value of every input, in mount order.
    pub fn values(&self) -> Vec<(String, String)> {
        self.host
            .iter()
            .map(|(mount, formula)| (mount.to_string(), formula.get()))
            .collect()
    }

    fn focused_has_alert(&self) -> bool {
        self.host
            .focused()
            .and_then(|mount| self.host.get(mount).ok())
            .is_some_and(|formula| formula.alert().is_some())
    }

    // ------------------------------------------------------------------
    // Terminal events
    // ------------------------------------------------------------------

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        self.mark_dirty();

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // An open alert swallows the next key, Esc and Ctrl+N included
        if !self.focused_has_alert() {
            if key.code == KeyCode::Char('n') && key.modifiers == KeyModifiers::CONTROL {
                let focused = self.host.cycle_focus();
                debug!(?focused, "Cycled focus");
                return;
            }
            if key.code == KeyCode::Esc {
                if self.host.focused().is_some() {
                    self.host.blur();
                } else {
                    self.should_quit = true;
                }
                return;
            }
        }

        if let Some((mount, outcome)) = self.host.dispatch_key(KeyCombo::from(key)) {
            self.process_outcome(&mount, outcome);
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        self.mark_dirty();
        if let Some((mount, outcome)) = self.host.dispatch_paste(text) {
            self.process_outcome(&mount, outcome);
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.mark_dirty();
                match self.hit_areas.hit_test(mouse.column, mouse.row) {
                    Some(action) => self.handle_click_action(action),
                    None => self.host.blur(),
                }
            }
            MouseEventKind::Moved => {
                if self.hit_areas.update_pointer(mouse.column, mouse.row) {
                    self.mark_dirty();
                }
            }
            _ => {}
        }
    }

    pub fn handle_click_action(&mut self, action: ClickAction) {
        let mount = action.mount().to_string();

        if let ClickAction::DismissAlert { .. } = action {
            if let Ok(formula) = self.host.get_mut(&mount) {
                formula.dismiss_alert();
            }
            return;
        }

        if let Err(err) = self.host.focus(&mount) {
            warn!("Click on stale target: {}", err);
            return;
        }
        let Ok(formula) = self.host.get_mut(&mount) else {
            return;
        };

        match action {
            ClickAction::Token { index, .. } => formula.click_token(index),
            ClickAction::Closer { closer, .. } => formula.click_closer(closer),
            ClickAction::FieldButton { .. } => formula.toggle_field_panel(),
            ClickAction::FieldLabel { node, .. } => {
                if let Err(err) = formula.insert_field(node) {
                    warn!("Failed to insert field: {}", err);
                }
            }
            ClickAction::FieldChevron { node, .. } => match formula.toggle_field(node) {
                Ok(ToggleOutcome::Expand(request)) => self.spawn_expand(&mount, request),
                Ok(_) => {}
                Err(err) => warn!("Failed to toggle field: {}", err),
            },
            ClickAction::FocusInput { .. } | ClickAction::DismissAlert { .. } => {}
        }
    }

    // ------------------------------------------------------------------
    // Background work
    // ------------------------------------------------------------------

    fn process_outcome(&mut self, mount: &str, outcome: KeyOutcome) {
        match outcome {
            KeyOutcome::PasteRequested => self.spawn_paste(mount),
            KeyOutcome::ExpandRequested(request) => self.spawn_expand(mount, request),
            KeyOutcome::Ignored | KeyOutcome::Handled | KeyOutcome::Queued => {}
        }
    }

    fn spawn_paste(&self, mount: &str) {
        let Ok(formula) = self.host.get(mount) else {
            return;
        };
        let instance = formula.id();
        let clipboard = Arc::clone(&self.clipboard);
        let tx = self.message_tx.clone();
        let mount = mount.to_string();
        debug!(mount = %mount, instance, "Reading clipboard");

        tokio::spawn(async move {
            let result = clipboard.read_text().await;
            let _ = tx.send(AppMessage::PasteCompleted {
                mount,
                instance,
                result,
            });
        });
    }

    fn spawn_expand(&self, mount: &str, request: ExpandRequest) {
        let Ok(formula) = self.host.get(mount) else {
            return;
        };
        let instance = formula.id();
        let expander = Arc::clone(&formula.config().on_field_expand);
        let tx = self.message_tx.clone();
        let mount = mount.to_string();
        debug!(mount = %mount, instance, path = %request.path, "Expanding field");

        tokio::spawn(async move {
            let result = expander.expand(&request).await;
            let _ = tx.send(AppMessage::FieldsExpanded {
                mount,
                instance,
                node: request.node,
                result,
            });
        });
    }

    /// The input mounted on `mount`, if it is still `instance`.
    fn requester_mut(&mut self, mount: &str, instance: InstanceId) -> Option<&mut Formula> {
        match self.host.get_mut(mount) {
            Ok(formula) if formula.id() == instance => Some(formula),
            _ => {
                debug!(mount, instance, "Result for destroyed input dropped");
                None
            }
        }
    }

    pub fn handle_message(&mut self, message: AppMessage) {
        self.mark_dirty();

        match message {
            AppMessage::PasteCompleted {
                mount,
                instance,
                result,
            } => {
                let Some(formula) = self.requester_mut(&mount, instance) else {
                    return;
                };
                for outcome in formula.complete_paste(result) {
                    self.process_outcome(&mount, outcome);
                }
            }
            AppMessage::FieldsExpanded {
                mount,
                instance,
                node,
                result,
            } => {
                let Some(formula) = self.requester_mut(&mount, instance) else {
                    return;
                };
                if let Err(err) = formula.resolve_field(node, result) {
                    warn!("Failed to apply field expansion: {}", err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryClipboard;
    use crate::config::FormulaConfig;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn app_with(clipboard: InMemoryClipboard) -> App {
        let mut host = FormulaHost::new();
        host.mount("total", FormulaConfig::default()).unwrap();
        host.focus("total").unwrap();
        App::new(host, Arc::new(clipboard))
    }

    #[tokio::test]
    async fn test_paste_round_trip() {
        let mut app = app_with(InMemoryClipboard::with_text("1+2"));
        let mut rx = app.message_rx.take().unwrap();

        app.handle_key_event(press(KeyCode::Char('v'), KeyModifiers::CONTROL));
        let message = rx.recv().await.unwrap();
        app.handle_message(message);

        assert_eq!(app.values(), vec![("total".to_string(), "1 + 2".to_string())]);
    }

    #[tokio::test]
    async fn test_paste_failure_alerts() {
        let mut app = app_with(InMemoryClipboard::new());
        let mut rx = app.message_rx.take().unwrap();

        app.handle_key_event(press(KeyCode::Char('v'), KeyModifiers::CONTROL));
        app.handle_message(rx.recv().await.unwrap());
        assert!(app.focused_has_alert());

        // Esc dismisses the alert instead of leaving the input
        app.handle_key_event(press(KeyCode::Esc, KeyModifiers::NONE));
        assert!(!app.focused_has_alert());
        assert_eq!(app.host.focused(), Some("total"));
    }

    #[test]
    fn test_escape_blurs_then_quits() {
        let mut app = app_with(InMemoryClipboard::new());
        app.handle_key_event(press(KeyCode::Esc, KeyModifiers::NONE));
        assert!(app.host.focused().is_none());
        assert!(!app.should_quit);
        app.handle_key_event(press(KeyCode::Esc, KeyModifiers::NONE));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = app_with(InMemoryClipboard::new());
        app.handle_key_event(press(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_click_outside_blurs() {
        let mut app = app_with(InMemoryClipboard::new());
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 3,
            modifiers: KeyModifiers::NONE,
        });
        assert!(app.host.focused().is_none());
        assert!(!app.host.get("total").unwrap().is_active());
    }

    #[test]
    fn test_closer_click_focuses_and_adds() {
        let mut app = app_with(InMemoryClipboard::new());
        app.host.blur();
        app.handle_click_action(ClickAction::Closer {
            mount: "total".to_string(),
            closer: '(',
        });
        assert_eq!(app.host.focused(), Some("total"));
        assert_eq!(app.values()[0].1, "(");
    }
}
