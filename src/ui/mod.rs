//! UI rendering for the formula editor.
//!
//! One line of key hints at the top, the mounted inputs stacked in mount
//! order, and the focused input's value at the bottom. An alert dialog,
//! when present, is drawn over everything and captures all clicks.

mod alert;
pub mod formula_input;
pub mod interaction;
mod theme;

pub use alert::{alert_rect, render_alert};
pub use formula_input::{input_height, render_formula_input};
pub use theme::*;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::host::FormulaHost;

const HINTS: &str = "Ctrl+N next input · Ctrl+F fields · Esc leave · Ctrl+C quit";

/// Render the whole screen and rebuild the click targets.
pub fn render(frame: &mut Frame, app: &mut App) {
    app.hit_areas.clear();

    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(HINTS, Style::default().fg(COLOR_DIM)))),
        header,
    );

    let mut y = body.y;
    for (mount, formula) in app.host.iter() {
        if y >= body.bottom() {
            break;
        }
        let height = input_height(formula, body.width).min(body.bottom() - y);
        let area = Rect { y, height, ..body };
        render_formula_input(frame, area, mount, formula, &mut app.hit_areas);
        y += height;
    }

    render_footer(frame, footer, &app.host);

    if let Some((mount, alert)) = app
        .host
        .iter()
        .find_map(|(mount, formula)| formula.alert_details().map(|alert| (mount, alert)))
    {
        render_alert(frame, frame.area(), mount, alert, &mut app.hit_areas);
    }
}

fn render_footer(frame: &mut Frame, area: Rect, host: &FormulaHost) {
    let line = match host.focused().and_then(|mount| host.get(mount).ok().map(|f| (mount, f))) {
        Some((mount, formula)) => Line::from(vec![
            Span::styled(
                format!("{mount} = "),
                Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(formula.get(), Style::default().fg(COLOR_TOKEN)),
        ]),
        None => Line::from(Span::styled(
            "Click an input or press Ctrl+N",
            Style::default().fg(COLOR_DIM),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryClipboard;
    use crate::config::FormulaConfig;
    use crate::ui::interaction::ClickAction;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn test_app() -> App {
        let mut host = FormulaHost::new();
        host.mount("a", FormulaConfig::default()).unwrap().set("1 + 2");
        host.mount("b", FormulaConfig::default()).unwrap();
        App::new(host, Arc::new(InMemoryClipboard::new()))
    }

    #[test]
    fn test_inputs_stack_in_mount_order() {
        let mut app = test_app();
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|frame| render(frame, &mut app)).unwrap();

        // header row 0, input "a" rows 1..=4, input "b" rows 5..=8
        assert_eq!(
            app.hit_areas.hit_test(30, 1),
            Some(ClickAction::FocusInput {
                mount: "a".to_string()
            })
        );
        assert_eq!(
            app.hit_areas.hit_test(30, 5),
            Some(ClickAction::FocusInput {
                mount: "b".to_string()
            })
        );
        assert_eq!(app.hit_areas.hit_test(30, 15), None);
    }

    #[test]
    fn test_footer_shows_focused_value() {
        let mut app = test_app();
        app.host.focus("a").unwrap();
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|frame| render(frame, &mut app)).unwrap();

        let buffer = terminal.backend().buffer();
        let footer: String = (0..60).map(|x| buffer[(x, 19)].symbol().to_string()).collect();
        assert!(footer.starts_with("a = 1 + 2"));
    }
}
