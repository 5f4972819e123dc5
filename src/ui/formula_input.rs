//! Rendering of one formula input.
//!
//! Layout, top to bottom, inside a bordered frame titled with the mount
//! selector:
//! - the token row(s): committed tokens flowed left to right with one
//!   column between them, and the caret buffer at the caret slot
//! - the button row: one button per closer, then the custom field button
//! - the field panel, when open
//!
//! Token text is written cell by cell as plain data; nothing in it is
//! interpreted.

use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::fields::{ChildState, FieldTree};
use crate::formula::Formula;
use crate::models::Token;
use crate::ui::interaction::{ClickAction, HitAreaRegistry};
use crate::ui::theme::{
    COLOR_ACCENT, COLOR_BORDER, COLOR_BUTTON, COLOR_BUTTON_HOVER, COLOR_CARET, COLOR_CLOSER,
    COLOR_DIM, COLOR_FIELD_BG, COLOR_FIELD_TEXT, COLOR_HIGHLIGHT_BG, COLOR_LOADING, COLOR_TOKEN,
};

/// Most field rows shown at once; the panel scrolls to keep the cursor visible.
pub const MAX_PANEL_ROWS: u16 = 8;

/// Stand-in for tokens with empty text, so they stay visible and clickable.
const EMPTY_TOKEN: &str = "·";

const CARET: &str = "▏";

/// One element of the token row.
#[derive(Debug, Clone, PartialEq)]
pub enum Piece<'a> {
    Token { index: usize, token: &'a Token },
    Caret { buffer: &'a str, visible: bool },
}

impl Piece<'_> {
    /// Text drawn for the piece.
    pub fn text(&self) -> String {
        match self {
            Piece::Token { token, .. } if token.is_field() => format!(" {} ", token.display()),
            Piece::Token { token, .. } if token.display().is_empty() => EMPTY_TOKEN.to_string(),
            Piece::Token { token, .. } => token.display().to_string(),
            Piece::Caret { buffer, visible: true } => format!("{buffer}{CARET}"),
            Piece::Caret { buffer, visible: false } => buffer.to_string(),
        }
    }

    pub fn width(&self) -> u16 {
        self.text().width().min(u16::MAX as usize) as u16
    }
}

/// Position of a piece relative to the token area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u16,
    pub y: u16,
    pub width: u16,
}

/// Tokens in order with the caret inserted at its slot.
///
/// An inactive input with an empty buffer has no caret piece.
pub fn pieces(formula: &Formula) -> Vec<Piece<'_>> {
    let mut pieces: Vec<Piece<'_>> = formula
        .tokens()
        .iter()
        .enumerate()
        .map(|(index, token)| Piece::Token { index, token })
        .collect();

    if formula.is_active() || !formula.buffer().is_empty() {
        pieces.insert(
            formula.caret(),
            Piece::Caret {
                buffer: formula.buffer(),
                visible: formula.is_active(),
            },
        );
    }
    pieces
}

/// Flow widths into rows of at most `max_width` columns, one column apart.
///
/// Pieces wider than a row are clipped to it. Zero-width pieces keep
/// their slot without taking space.
pub fn flow(widths: &[u16], max_width: u16) -> Vec<Placement> {
    let max_width = max_width.max(1);
    let mut placements = Vec::with_capacity(widths.len());
    let mut x = 0u16;
    let mut y = 0u16;

    for &width in widths {
        let width = width.min(max_width);
        if x > 0 && x.saturating_add(width) > max_width {
            x = 0;
            y = y.saturating_add(1);
        }
        placements.push(Placement { x, y, width });
        if width > 0 {
            x = x.saturating_add(width).saturating_add(1);
        }
    }
    placements
}

fn token_rows(formula: &Formula, width: u16) -> u16 {
    let widths: Vec<u16> = pieces(formula).iter().map(Piece::width).collect();
    flow(&widths, width)
        .last()
        .map_or(1, |placement| placement.y.saturating_add(1))
}

fn panel_rows(formula: &Formula) -> u16 {
    match formula.fields() {
        Some(tree) if formula.is_field_panel_open() => {
            (tree.visible_rows().len().min(u16::MAX as usize) as u16).clamp(1, MAX_PANEL_ROWS)
        }
        _ => 0,
    }
}

/// Rows the input needs at `width` columns, frame included.
pub fn input_height(formula: &Formula, width: u16) -> u16 {
    let inner = width.saturating_sub(2);
    2 + token_rows(formula, inner) + 1 + panel_rows(formula)
}

/// Draw `formula` into `area` and register its click targets.
pub fn render_formula_input(
    frame: &mut Frame,
    area: Rect,
    mount: &str,
    formula: &Formula,
    hits: &mut HitAreaRegistry,
) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let border_color = if formula.is_active() {
        COLOR_ACCENT
    } else {
        COLOR_BORDER
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {mount} "))
        .title_style(Style::default().fg(border_color).add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    hits.register(
        area,
        ClickAction::FocusInput {
            mount: mount.to_string(),
        },
    );

    let rows = token_rows(formula, inner.width).min(inner.height);
    let tokens_area = Rect { height: rows, ..inner };
    render_tokens(frame, tokens_area, mount, formula, hits);

    let mut y = inner.y + rows;
    if y < inner.bottom() {
        render_buttons(frame, Rect { y, height: 1, ..inner }, mount, formula, hits);
        y += 1;
    }

    if let Some(tree) = formula.fields() {
        if formula.is_field_panel_open() && y < inner.bottom() {
            let height = panel_rows(formula).min(inner.bottom() - y);
            render_field_panel(frame, Rect { y, height, ..inner }, mount, tree, hits);
        }
    }
}

fn render_tokens(
    frame: &mut Frame,
    area: Rect,
    mount: &str,
    formula: &Formula,
    hits: &mut HitAreaRegistry,
) {
    let pieces = pieces(formula);
    let widths: Vec<u16> = pieces.iter().map(Piece::width).collect();
    let placements = flow(&widths, area.width);

    for (piece, placement) in pieces.iter().zip(placements) {
        if placement.y >= area.height {
            break;
        }
        let x = area.x + placement.x;
        let y = area.y + placement.y;
        let rect = Rect::new(x, y, placement.width, 1);
        let text = piece.text();

        match piece {
            Piece::Token { index, token } => {
                let style = token_style(formula, token);
                frame
                    .buffer_mut()
                    .set_stringn(x, y, &text, placement.width as usize, style);
                hits.register(
                    rect,
                    ClickAction::Token {
                        mount: mount.to_string(),
                        index: *index,
                    },
                );
            }
            Piece::Caret { buffer, visible } => {
                let style = Style::default().fg(COLOR_CARET);
                frame
                    .buffer_mut()
                    .set_stringn(x, y, &text, placement.width as usize, style);
                if *visible {
                    let end = x + (buffer.width().min(u16::MAX as usize) as u16).min(placement.width);
                    frame.set_cursor_position(Position::new(end.min(area.right().saturating_sub(1)), y));
                }
            }
        }
    }
}

fn token_style(formula: &Formula, token: &Token) -> Style {
    if token.is_field() {
        return Style::default().fg(COLOR_FIELD_TEXT).bg(COLOR_FIELD_BG);
    }
    let mut chars = token.display().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if formula.closers().contains(&c) => Style::default()
            .fg(COLOR_CLOSER)
            .add_modifier(Modifier::BOLD),
        (None, _) => Style::default().fg(COLOR_DIM),
        _ => Style::default().fg(COLOR_TOKEN),
    }
}

fn render_buttons(
    frame: &mut Frame,
    area: Rect,
    mount: &str,
    formula: &Formula,
    hits: &mut HitAreaRegistry,
) {
    let mut x = area.x;
    let mut buttons: Vec<(String, ClickAction)> = formula
        .closers()
        .iter()
        .map(|&closer| {
            (
                format!("[{closer}]"),
                ClickAction::Closer {
                    mount: mount.to_string(),
                    closer,
                },
            )
        })
        .collect();

    if formula.fields().is_some() {
        buttons.push((
            format!("[{}]", formula.config().lang.field),
            ClickAction::FieldButton {
                mount: mount.to_string(),
            },
        ));
    }

    for (label, action) in buttons {
        let width = label.width().min(u16::MAX as usize) as u16;
        if x.saturating_add(width) > area.right() {
            break;
        }
        let rect = Rect::new(x, area.y, width, 1);
        let mut style = Style::default().fg(COLOR_BUTTON);
        if hits.is_hovered(rect) {
            style = style.fg(COLOR_BUTTON_HOVER).add_modifier(Modifier::BOLD);
        }
        if matches!(action, ClickAction::FieldButton { .. }) && formula.is_field_panel_open() {
            style = style.add_modifier(Modifier::REVERSED);
        }
        frame.buffer_mut().set_string(x, area.y, &label, style);
        hits.register(rect, action);
        x += width + 1;
    }
}

/// Chevron for a field row.
pub fn chevron(children: &ChildState, open: bool) -> &'static str {
    match children {
        ChildState::Leaf => "  ",
        ChildState::Loading => "… ",
        _ if open => "▾ ",
        _ => "▸ ",
    }
}

fn render_field_panel(
    frame: &mut Frame,
    area: Rect,
    mount: &str,
    tree: &FieldTree,
    hits: &mut HitAreaRegistry,
) {
    let rows = tree.visible_rows();
    let height = area.height as usize;
    let offset = tree.cursor().saturating_sub(height.saturating_sub(1));

    for (line, (position, row)) in rows.iter().enumerate().skip(offset).take(height).enumerate() {
        let Some(entry) = tree.get(row.id) else {
            continue;
        };
        let y = area.y + line as u16;
        let highlighted = position == tree.cursor();
        let base = if highlighted {
            Style::default().bg(COLOR_HIGHLIGHT_BG).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        if highlighted {
            frame
                .buffer_mut()
                .set_style(Rect::new(area.x, y, area.width, 1), base);
        }

        let indent = (row.depth as u16).saturating_mul(2).min(area.width);
        let x = area.x + indent;
        let remaining = area.right().saturating_sub(x);

        let chevron_style = if entry.is_loading() {
            base.fg(COLOR_LOADING)
        } else {
            base.fg(COLOR_DIM)
        };
        let (after_chevron, _) = frame.buffer_mut().set_stringn(
            x,
            y,
            chevron(&entry.children, entry.open),
            remaining as usize,
            chevron_style,
        );
        if entry.is_expandable() {
            hits.register(
                Rect::new(x, y, after_chevron - x, 1),
                ClickAction::FieldChevron {
                    mount: mount.to_string(),
                    node: row.id,
                },
            );
        }

        let label_width = area.right().saturating_sub(after_chevron);
        let (end, _) = frame.buffer_mut().set_stringn(
            after_chevron,
            y,
            &entry.name,
            label_width as usize,
            base.fg(COLOR_FIELD_TEXT),
        );
        hits.register(
            Rect::new(after_chevron, y, end - after_chevron, 1),
            ClickAction::FieldLabel {
                mount: mount.to_string(),
                node: row.id,
            },
        );
    }
}
