//! Methods pane: service and instance choosers above the method list

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use svcdbg_app::handler::METHOD_HEADER_ROWS;
use svcdbg_app::InvocationSession;

use crate::theme::styles;

use super::scroll_offset;

pub struct MethodsPane<'a> {
    session: Option<&'a InvocationSession>,
    focused: bool,
}

impl<'a> MethodsPane<'a> {
    pub fn new(session: Option<&'a InvocationSession>, focused: bool) -> Self {
        Self { session, focused }
    }
}

/// `Label  ◂ value ▸`, with a count when there is more than one choice
fn chooser_line(label: &str, current: Option<&str>, choices: usize) -> Line<'static> {
    let mut spans = vec![
        Span::styled(format!("{label:<9}"), styles::text_secondary()),
        Span::styled("◂ ", styles::text_muted()),
        Span::styled(current.unwrap_or("—").to_string(), styles::text_primary()),
        Span::styled(" ▸", styles::text_muted()),
    ];
    if choices > 1 {
        spans.push(Span::styled(format!("  ({choices})"), styles::text_muted()));
    }
    Line::from(spans)
}

impl Widget for MethodsPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.session {
            Some(session) => format!(" Methods · {} ", session.module),
            None => " Methods ".to_string(),
        };
        let block = styles::glass_block(self.focused).title(title);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let Some(session) = self.session else {
            Paragraph::new(Line::styled(
                "Open a module from the navigator (Enter)",
                styles::text_muted(),
            ))
            .render(inner, buf);
            return;
        };

        let mut rows = vec![
            chooser_line("Service", session.service.as_deref(), session.services.len()),
            chooser_line("Instance", session.instance.as_deref(), session.instances.len()),
        ];
        for method in &session.methods {
            let selected = session.method.as_ref() == Some(method);
            let (marker, style) = if selected {
                ("● ", styles::accent())
            } else {
                ("  ", styles::text_primary())
            };
            rows.push(Line::from(vec![
                Span::styled(marker, styles::accent()),
                Span::styled(method.clone(), style),
            ]));
        }

        let cursor = session.method_cursor;
        if let Some(row) = rows.get_mut(cursor) {
            *row = row.clone().style(styles::selection(self.focused));
        }

        // Trailing status line for loading and failures
        let status = if session.is_loading() {
            Some(Line::styled("↻ loading…", styles::status_yellow()))
        } else if let Some(error) = &session.last_error {
            Some(Line::styled(format!("✗ {error}"), styles::status_red()))
        } else if session.methods.is_empty() && rows.len() == METHOD_HEADER_ROWS {
            Some(Line::styled("No methods", styles::text_muted()))
        } else {
            None
        };

        let visible = (inner.height as usize).saturating_sub(usize::from(status.is_some()));
        let start = scroll_offset(cursor, rows.len(), visible);
        let mut lines: Vec<Line> = rows.into_iter().skip(start).take(visible).collect();
        lines.extend(status);

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{open_editing_tab, open_listed_tab, run, TestTerminal};
    use svcdbg_app::{AppState, Message};

    fn render(state: &AppState, height: u16) -> TestTerminal {
        let mut term = TestTerminal::new();
        let area = Rect::new(0, 0, 60, height);
        term.render_widget(MethodsPane::new(state.tabs.selected(), true), area);
        term
    }

    #[test]
    fn test_placeholder_without_tab() {
        let state = AppState::new();
        let term = render(&state, 8);
        assert!(term.buffer_contains("Open a module"));
    }

    #[test]
    fn test_choosers_and_methods() {
        let mut state = AppState::new();
        open_listed_tab(&mut state, "users");
        let term = render(&state, 10);
        assert!(term.line_contains(0, "Methods · users"));
        assert!(term.line_contains(1, "Service"));
        assert!(term.line_contains(1, "UserService"));
        assert!(term.line_contains(2, "prod-1"));
        assert!(term.line_contains(3, "Get"));
        assert!(term.line_contains(4, "Put"));
    }

    #[test]
    fn test_selected_method_is_marked() {
        let mut state = AppState::new();
        open_editing_tab(&mut state, "users");
        let term = render(&state, 10);
        assert!(term.line_contains(3, "● Get"));
    }

    #[test]
    fn test_loading_line_while_listing() {
        let mut state = AppState::new();
        run(&mut state, Message::OpenModule {
            module: "users".into(),
        });
        let term = render(&state, 8);
        assert!(term.buffer_contains("loading"));
    }

    #[test]
    fn test_cursor_scrolls_into_view() {
        let mut state = AppState::new();
        open_listed_tab(&mut state, "users");
        for _ in 0..3 {
            run(&mut state, Message::MethodCursorDown);
        }
        // Two inner rows: cursor on "Put" pushes the choosers out
        let term = render(&state, 4);
        assert!(term.buffer_contains("Put"));
        assert!(!term.buffer_contains("UserService"));
    }
}
