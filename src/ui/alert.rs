//! Blocking alert dialog.
//!
//! Shown over everything while an input holds an alert; any key or click
//! dismisses it.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::formula::Alert;
use crate::ui::interaction::{ClickAction, HitAreaRegistry};
use crate::ui::theme::{COLOR_ACCENT, COLOR_DIALOG_BG, COLOR_DIM, COLOR_ERROR};

const HINT: &str = "Press any key to continue";
const MIN_WIDTH: u16 = 30;
const MAX_WIDTH: u16 = 60;

/// Centered dialog rect for `alert` within `area`.
pub fn alert_rect(area: Rect, alert: &Alert) -> Rect {
    let widest = alert
        .message
        .width()
        .max(alert.hint().width())
        .max(HINT.width());
    let width = (widest as u16)
        .saturating_add(4)
        .clamp(MIN_WIDTH, MAX_WIDTH)
        .min(area.width.saturating_sub(2));
    let inner_width = width.saturating_sub(4).max(1) as usize;
    let wrapped = |text: &str| text.width().div_ceil(inner_width).max(1) as u16;
    // Borders, message, recovery hint, blank line, key hint
    let height = (wrapped(&alert.message) + wrapped(alert.hint()) + 4).min(area.height);

    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

pub fn render_alert(
    frame: &mut Frame,
    area: Rect,
    mount: &str,
    alert: &Alert,
    hits: &mut HitAreaRegistry,
) {
    let dialog = alert_rect(area, alert);
    frame.render_widget(Clear, dialog);

    let block = Block::default()
        .title(Span::styled(
            format!(" {mount} · {} ", alert.title()),
            Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(COLOR_ERROR))
        .style(Style::default().bg(COLOR_DIALOG_BG));

    let text = vec![
        Line::from(alert.message.clone()),
        Line::from(Span::styled(alert.hint(), Style::default().fg(COLOR_DIM))),
        Line::default(),
        Line::from(Span::styled(HINT, Style::default().fg(COLOR_DIM))),
    ];
    let paragraph = Paragraph::new(text)
        .block(block.padding(ratatui::widgets::Padding::horizontal(1)))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, dialog);

    hits.register(
        area,
        ClickAction::DismissAlert {
            mount: mount.to_string(),
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    fn alert(message: &str) -> Alert {
        Alert {
            message: message.to_string(),
            category: ErrorCategory::User,
        }
    }

    #[test]
    fn test_alert_rect_is_centered() {
        // "Check clipboard permissions and try again" is the widest line
        let rect = alert_rect(
            Rect::new(0, 0, 100, 40),
            &alert("Error while fetching clipboard: empty"),
        );
        assert_eq!(rect.width, 45);
        assert_eq!(rect.x, (100 - 45) / 2);
        assert_eq!(rect.height, 6);
    }

    #[test]
    fn test_alert_rect_fits_small_area() {
        let rect = alert_rect(Rect::new(0, 0, 20, 4), &alert("x"));
        assert!(rect.width <= 18);
        assert!(rect.height <= 4);
    }

    #[test]
    fn test_alert_blocks_every_click() {
        let mut terminal =
            ratatui::Terminal::new(ratatui::backend::TestBackend::new(60, 20)).unwrap();
        let mut hits = HitAreaRegistry::new();
        terminal
            .draw(|frame| render_alert(frame, frame.area(), "total", &alert("boom"), &mut hits))
            .unwrap();
        assert_eq!(
            hits.hit_test(0, 0),
            Some(ClickAction::DismissAlert {
                mount: "total".to_string()
            })
        );
    }

    #[test]
    fn test_alert_shows_category_and_hint() {
        let mut terminal =
            ratatui::Terminal::new(ratatui::backend::TestBackend::new(60, 20)).unwrap();
        let mut hits = HitAreaRegistry::new();
        terminal
            .draw(|frame| render_alert(frame, frame.area(), "total", &alert("boom"), &mut hits))
            .unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("User action required"));
        assert!(screen.contains("Check clipboard permissions"));
    }
}
