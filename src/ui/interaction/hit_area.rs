//! Hit area registry for mouse interaction.
//!
//! Render code registers clickable regions as it draws. The event loop
//! hit-tests mouse clicks against the regions of the last frame.

use ratatui::layout::Rect;

/// What a click on a registered region does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    /// Anywhere inside an input's frame: focus it, caret unchanged
    FocusInput { mount: String },
    /// A committed token: focus and put the caret after it
    Token { mount: String, index: usize },
    /// An operator button
    Closer { mount: String, closer: char },
    /// The custom field button: show or hide the field panel
    FieldButton { mount: String },
    /// A field row label: insert the field reference
    FieldLabel { mount: String, node: usize },
    /// A field row chevron: expand or collapse the node
    FieldChevron { mount: String, node: usize },
    /// The alert dialog
    DismissAlert { mount: String },
}

impl ClickAction {
    /// Selector of the input the action belongs to.
    pub fn mount(&self) -> &str {
        match self {
            ClickAction::FocusInput { mount }
            | ClickAction::Token { mount, .. }
            | ClickAction::Closer { mount, .. }
            | ClickAction::FieldButton { mount }
            | ClickAction::FieldLabel { mount, .. }
            | ClickAction::FieldChevron { mount, .. }
            | ClickAction::DismissAlert { mount } => mount,
        }
    }
}

/// A clickable region with an associated action.
#[derive(Debug, Clone)]
pub struct HitArea {
    pub rect: Rect,
    pub action: ClickAction,
}

impl HitArea {
    pub fn new(rect: Rect, action: ClickAction) -> Self {
        Self { rect, action }
    }

    /// Check if a point is within this hit area.
    #[inline]
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.rect.x
            && x < self.rect.x + self.rect.width
            && y >= self.rect.y
            && y < self.rect.y + self.rect.height
    }
}

/// Regions registered by the last render, plus the pointer position.
///
/// Areas registered later take priority over earlier ones for overlapping
/// regions (z-order: later = on top).
#[derive(Debug, Default)]
pub struct HitAreaRegistry {
    areas: Vec<HitArea>,
    pointer: Option<(u16, u16)>,
}

impl HitAreaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all regions. Call at the start of each render; the pointer
    /// position is kept.
    pub fn clear(&mut self) {
        self.areas.clear();
    }

    pub fn register(&mut self, rect: Rect, action: ClickAction) {
        self.areas.push(HitArea::new(rect, action));
    }

    /// Action of the topmost region containing the point.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<ClickAction> {
        self.areas
            .iter()
            .rev()
            .find(|area| area.contains(x, y))
            .map(|area| area.action.clone())
    }

    /// Record the pointer position. Returns true if it moved between
    /// regions, requiring a redraw.
    pub fn update_pointer(&mut self, x: u16, y: u16) -> bool {
        let before = self.pointer.and_then(|(px, py)| self.topmost_index(px, py));
        self.pointer = Some((x, y));
        before != self.topmost_index(x, y)
    }

    /// Whether the pointer is over `rect`.
    pub fn is_hovered(&self, rect: Rect) -> bool {
        self.pointer.is_some_and(|(x, y)| {
            x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
        })
    }

    fn topmost_index(&self, x: u16, y: u16) -> Option<usize> {
        self.areas
            .iter()
            .enumerate()
            .rev()
            .find(|(_, area)| area.contains(x, y))
            .map(|(i, _)| i)
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}
