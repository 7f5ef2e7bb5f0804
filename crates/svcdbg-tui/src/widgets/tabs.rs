//! Tab bar for open invocation sessions

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Tabs, Widget},
};

use svcdbg_app::tab_manager::TabManager;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::theme::styles;

/// Longest module name shown in a tab before truncation
const MAX_TAB_NAME: usize = 18;

/// One tab per open module, phase icon first
pub struct SessionTabs<'a> {
    tabs: &'a TabManager,
}

impl<'a> SessionTabs<'a> {
    pub fn new(tabs: &'a TabManager) -> Self {
        Self { tabs }
    }

    fn tab_titles(&self) -> Vec<Line<'static>> {
        self.tabs
            .iter()
            .enumerate()
            .map(|(i, session)| {
                let (icon, _label, style) = styles::phase_indicator(session.phase());
                let mut spans = vec![
                    Span::styled(format!("{} ", i + 1), styles::text_muted()),
                    Span::styled(icon, style),
                    Span::raw(format!(" {}", truncate_name(&session.title(), MAX_TAB_NAME))),
                ];
                if let Some(method) = session.method.as_deref() {
                    spans.push(Span::styled(
                        format!(" .{}", truncate_name(method, MAX_TAB_NAME)),
                        styles::text_secondary(),
                    ));
                }
                Line::from(spans)
            })
            .collect()
    }
}

impl Widget for SessionTabs<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.tabs.is_empty() || area.width < 3 {
            return;
        }

        let tabs = Tabs::new(self.tab_titles())
            .select(self.tabs.selected_index())
            .highlight_style(styles::focused_selected())
            .divider("│");

        let padded_area = Rect {
            x: area.x + 1,
            y: area.y,
            width: area.width.saturating_sub(2),
            height: area.height,
        };
        tabs.render(padded_area, buf);
    }
}

/// Truncate a name to `max_width` terminal columns, adding an ellipsis if needed
pub(crate) fn truncate_name(name: &str, max_width: usize) -> String {
    if name.width() <= max_width {
        return name.to_string();
    }
    let budget = max_width.saturating_sub(1);
    let mut used = 0;
    let mut truncated = String::new();
    for c in name.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        truncated.push(c);
    }
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{open_editing_tab, open_listed_tab, TestTerminal};
    use svcdbg_app::AppState;

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("users", 10), "users");
        assert_eq!(truncate_name("user-center-admin", 8), "user-ce…");
        assert_eq!(truncate_name("anything", 1), "…");
        // Wide characters take two columns each
        assert_eq!(truncate_name("用户中心", 5), "用户…");
    }

    #[test]
    fn test_tabs_show_module_and_method() {
        let mut state = AppState::new();
        open_listed_tab(&mut state, "orders");
        open_editing_tab(&mut state, "users");

        let mut term = TestTerminal::new();
        let area = Rect::new(0, 0, 120, 1);
        term.render_widget(SessionTabs::new(&state.tabs), area);

        assert!(term.line_contains(0, "1 ○ orders"));
        assert!(term.line_contains(0, "2 ● users .Get"));
    }

    #[test]
    fn test_no_tabs_renders_nothing() {
        let state = AppState::new();
        let mut term = TestTerminal::new();
        let area = Rect::new(0, 0, 40, 1);
        term.render_widget(SessionTabs::new(&state.tabs), area);
        assert_eq!(term.content().trim(), "");
    }
}
