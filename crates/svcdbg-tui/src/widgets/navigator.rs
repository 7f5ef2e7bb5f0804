//! Catalog navigator: modules, history and saved queries with a shared filter

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use svcdbg_app::state::{NavEntry, NavSection, UiMode};
use svcdbg_app::AppState;

use crate::theme::styles;

use super::{scroll_offset, truncate_name};

const SECTIONS: [NavSection; 3] = [NavSection::Services, NavSection::History, NavSection::Saved];

pub struct Navigator<'a> {
    state: &'a AppState,
    focused: bool,
}

impl<'a> Navigator<'a> {
    pub fn new(state: &'a AppState, focused: bool) -> Self {
        Self { state, focused }
    }

    fn section_line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for (i, section) in SECTIONS.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("│", styles::text_muted()));
            }
            let style = if *section == self.state.navigator.section {
                styles::accent_bold()
            } else {
                styles::text_muted()
            };
            spans.push(Span::styled(format!(" {} ", section.title()), style));
        }
        Line::from(spans)
    }

    fn filter_line(&self) -> Option<Line<'static>> {
        let searching = self.state.ui_mode == UiMode::Search;
        let filter = self.state.navigator.filter_text();
        if !searching && filter.is_empty() {
            return None;
        }
        let mut spans = vec![
            Span::styled("/", styles::keybinding()),
            Span::styled(filter, styles::text_primary()),
        ];
        if searching {
            spans.push(Span::styled("_", styles::keybinding()));
        }
        Some(Line::from(spans))
    }

    fn empty_text(&self) -> &'static str {
        if !self.state.navigator.filter_text().is_empty() {
            return "No matches";
        }
        match self.state.navigator.section {
            NavSection::Services if self.state.catalog.loading => "Listing modules…",
            NavSection::Services => "No modules",
            NavSection::History => "No invocations yet",
            NavSection::Saved => "Nothing saved (S saves a request)",
        }
    }
}

fn entry_line(entry: &NavEntry, width: usize) -> Line<'static> {
    match entry {
        NavEntry::Module(module) => Line::from(Span::raw(truncate_name(module, width))),
        NavEntry::Query(record) => {
            let time = record.time.format("%H:%M ").to_string();
            let label = truncate_name(&record.label(), width.saturating_sub(time.len()));
            Line::from(vec![
                Span::styled(time, styles::text_muted()),
                Span::raw(label),
            ])
        }
    }
}

impl Widget for Navigator<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(self.focused).title(" Navigator ");
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let mut lines = vec![self.section_line()];
        if let Some(filter) = self.filter_line() {
            lines.push(filter);
        }
        let header_rows = lines.len();

        let entries = self.state.navigator_entries();
        if entries.is_empty() {
            lines.push(Line::styled(self.empty_text(), styles::text_muted()));
        } else {
            let visible = (inner.height as usize).saturating_sub(header_rows);
            let cursor = self.state.navigator.cursor;
            let start = scroll_offset(cursor, entries.len(), visible);
            let width = inner.width as usize;
            for (i, entry) in entries.iter().enumerate().skip(start).take(visible) {
                let mut line = entry_line(entry, width);
                if i == cursor {
                    line = line.style(styles::selection(self.focused));
                }
                lines.push(line);
            }
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
