//! Read-only tree rendering of a value, used for invocation results

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use svcdbg_app::InvocationSession;
use svcdbg_core::Value;

use crate::theme::{palette, styles};

/// Flatten `value` into one line per node, children indented under their key
pub fn tree_lines(value: &Value) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    match value {
        Value::Map(map) if !map.is_empty() => {
            for (key, child) in map.iter() {
                push_node(&mut lines, Span::styled(key.clone(), key_style()), child, 0);
            }
        }
        Value::List(items) if !items.is_empty() => {
            for (i, child) in items.iter().enumerate() {
                push_node(&mut lines, index_span(i), child, 0);
            }
        }
        scalar => lines.push(Line::from(scalar_span(scalar))),
    }
    lines
}

fn key_style() -> Style {
    Style::default().fg(palette::VALUE_KEY)
}

fn index_span(i: usize) -> Span<'static> {
    Span::styled(format!("[{i}]"), styles::text_muted())
}

fn push_node(lines: &mut Vec<Line<'static>>, label: Span<'static>, value: &Value, depth: usize) {
    let indent = Span::raw("  ".repeat(depth));
    match value {
        Value::Map(map) if !map.is_empty() => {
            lines.push(Line::from(vec![indent, label]));
            for (key, child) in map.iter() {
                push_node(lines, Span::styled(key.clone(), key_style()), child, depth + 1);
            }
        }
        Value::List(items) if !items.is_empty() => {
            lines.push(Line::from(vec![
                indent,
                label,
                Span::styled(format!(" [{}]", items.len()), styles::text_muted()),
            ]));
            for (i, child) in items.iter().enumerate() {
                push_node(lines, index_span(i), child, depth + 1);
            }
        }
        scalar => lines.push(Line::from(vec![
            indent,
            label,
            Span::styled(": ", styles::text_muted()),
            scalar_span(scalar),
        ])),
    }
}

fn scalar_span(value: &Value) -> Span<'static> {
    match value {
        Value::Null => Span::styled("null", Style::default().fg(palette::VALUE_LITERAL)),
        Value::Bool(b) => Span::styled(b.to_string(), Style::default().fg(palette::VALUE_LITERAL)),
        Value::Int(i) => Span::styled(i.to_string(), Style::default().fg(palette::VALUE_NUMBER)),
        Value::Uint(u) => Span::styled(u.to_string(), Style::default().fg(palette::VALUE_NUMBER)),
        Value::Float(f) => Span::styled(f.to_string(), Style::default().fg(palette::VALUE_NUMBER)),
        Value::String(s) => Span::styled(format!("\"{s}\""), Style::default().fg(palette::VALUE_STRING)),
        Value::Map(_) => Span::styled("{}", styles::text_muted()),
        Value::List(_) => Span::styled("[]", styles::text_muted()),
    }
}

/// Response pane: timing in the title, then the result tree
pub struct ResponsePane<'a> {
    session: Option<&'a InvocationSession>,
    focused: bool,
}

impl<'a> ResponsePane<'a> {
    pub fn new(session: Option<&'a InvocationSession>, focused: bool) -> Self {
        Self { session, focused }
    }

    fn title(&self) -> Line<'static> {
        let mut spans = vec![Span::raw(" Response ")];
        if let Some(cost) = self.session.and_then(|s| s.cost()) {
            spans.push(Span::styled(
                format!("· client {} ms · server {} ms ", cost.client_ms, cost.server_ms),
                styles::text_muted(),
            ));
        }
        Line::from(spans)
    }
}

impl Widget for ResponsePane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(self.focused).title(self.title());
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let Some(session) = self.session else {
            return;
        };

        let mut lines = Vec::new();
        if session.phase() == svcdbg_app::SessionPhase::Invoking {
            lines.push(Line::styled("↻ invoking…", styles::status_yellow()));
        }
        match session.result() {
            Some(result) => {
                let tree = tree_lines(result);
                let max_scroll = tree.len().saturating_sub(1);
                let scroll = session.result_scroll.min(max_scroll);
                lines.extend(tree.into_iter().skip(scroll));
            }
            None if lines.is_empty() => {
                let hint = if session.editor().is_some() {
                    "Press i to invoke"
                } else {
                    "No result"
                };
                lines.push(Line::styled(hint, styles::text_muted()));
            }
            None => {}
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{complete_invoke, open_editing_tab, run, TestTerminal};
    use serde_json::json;
    use svcdbg_app::{AppState, Message};

    fn text_of(lines: &[Line]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_nested_tree_lines() {
        let value = Value::from(json!({
            "name": "ada",
            "tags": ["a", "b"],
            "profile": {"age": 36, "admin": true}
        }));
        let lines = text_of(&tree_lines(&value));
        assert_eq!(
            lines,
            vec![
                "name: \"ada\"",
                "tags [2]",
                "  [0]: \"a\"",
                "  [1]: \"b\"",
                "profile",
                "  age: 36",
                "  admin: true",
            ]
        );
    }

    #[test]
    fn test_scalar_and_empty_roots() {
        assert_eq!(text_of(&tree_lines(&Value::Int(7))), vec!["7"]);
        assert_eq!(text_of(&tree_lines(&Value::empty_map())), vec!["{}"]);
    }

    #[test]
    fn test_response_pane_shows_costs_and_result() {
        let mut state = AppState::new();
        open_editing_tab(&mut state, "users");
        complete_invoke(&mut state, json!({"id": 7}), 3);

        let mut term = TestTerminal::new();
        let area = Rect::new(0, 0, 70, 8);
        term.render_widget(ResponsePane::new(state.tabs.selected(), false), area);

        assert!(term.line_contains(0, "client 12 ms · server 3 ms"));
        assert!(term.line_contains(1, "id: 7"));
    }

    #[test]
    fn test_response_pane_scrolls() {
        let mut state = AppState::new();
        open_editing_tab(&mut state, "users");
        complete_invoke(&mut state, json!({"a": 1, "b": 2, "c": 3}), 1);
        run(&mut state, Message::ScrollResultDown);

        let mut term = TestTerminal::new();
        let area = Rect::new(0, 0, 70, 8);
        term.render_widget(ResponsePane::new(state.tabs.selected(), true), area);
        assert!(term.line_contains(1, "b: 2"));
        assert!(!term.buffer_contains("a: 1"));
    }

    #[test]
    fn test_invoke_hint_before_first_call() {
        let mut state = AppState::new();
        open_editing_tab(&mut state, "users");
        let mut term = TestTerminal::new();
        let area = Rect::new(0, 0, 70, 8);
        term.render_widget(ResponsePane::new(state.tabs.selected(), false), area);
        assert!(term.buffer_contains("Press i to invoke"));
    }
}
