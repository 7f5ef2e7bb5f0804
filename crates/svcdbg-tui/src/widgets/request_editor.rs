//! Request pane: the structured field editor and the raw text view

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use svcdbg_app::request_editor::{EditorRow, RequestEditor, RowWidget};
use svcdbg_app::state::FieldInput;
use svcdbg_app::text_buffer::TextBuffer;

use crate::theme::styles;

use super::{cursor_spans, scroll_offset};

pub struct RequestPane<'a> {
    editor: Option<&'a RequestEditor>,
    /// Inline input open on one of the rows
    field_input: Option<&'a FieldInput>,
    /// The text view takes keystrokes
    text_editing: bool,
    focused: bool,
}

impl<'a> RequestPane<'a> {
    pub fn new(editor: Option<&'a RequestEditor>, focused: bool) -> Self {
        Self {
            editor,
            field_input: None,
            text_editing: false,
            focused,
        }
    }

    pub fn with_field_input(mut self, input: Option<&'a FieldInput>) -> Self {
        self.field_input = input;
        self
    }

    pub fn text_editing(mut self, editing: bool) -> Self {
        self.text_editing = editing;
        self
    }

    fn title(&self) -> String {
        match self.editor {
            Some(editor) if editor.dual().is_text() => {
                let dirty = if editor.dual().is_dirty() { " *" } else { "" };
                format!(" Request · text{dirty} ")
            }
            Some(editor) if editor.has_drafts() => " Request · unsaved field edits ".to_string(),
            Some(_) => " Request ".to_string(),
            None => " Request ".to_string(),
        }
    }

    fn row_line(&self, row: &EditorRow) -> Line<'static> {
        let indent = "  ".repeat(row.depth);
        let mut spans = vec![Span::raw(indent)];

        let input = self.field_input.filter(|input| input.path == row.path);
        if let Some(input) = input {
            spans.push(Span::styled(format!("{}: ", row.label), styles::text_secondary()));
            spans.extend(cursor_spans(&input.buffer.text(), input.buffer.cursor().1, styles::input_field()));
            return Line::from(spans);
        }

        match &row.widget {
            RowWidget::Absent => {
                spans.push(Span::styled("○ ", styles::text_muted()));
                spans.push(Span::styled(row.label.clone(), styles::text_muted()));
            }
            RowWidget::Text { text, error } => {
                spans.push(Span::styled(format!("{}: ", row.label), styles::text_secondary()));
                spans.push(Span::styled(text.clone(), styles::text_primary()));
                if let Some(error) = error {
                    spans.push(Span::styled(format!("  ✗ {error}"), styles::status_red()));
                }
            }
            RowWidget::Toggle(value) => {
                spans.push(Span::styled(format!("{}: ", row.label), styles::text_secondary()));
                let text = match value {
                    Some(true) => "[x] true",
                    Some(false) => "[ ] false",
                    None => "null",
                };
                spans.push(Span::styled(text, styles::text_primary()));
            }
            RowWidget::Choice { selected, .. } => {
                spans.push(Span::styled(format!("{}: ", row.label), styles::text_secondary()));
                spans.push(Span::styled("◂ ", styles::text_muted()));
                spans.push(Span::styled(
                    selected.clone().unwrap_or_else(|| "null".to_string()),
                    styles::text_primary(),
                ));
                spans.push(Span::styled(" ▸", styles::text_muted()));
            }
            RowWidget::Message { null } => {
                spans.push(Span::styled(row.label.clone(), styles::accent()));
                let suffix = if *null { ": null" } else { " {…}" };
                spans.push(Span::styled(suffix, styles::text_muted()));
            }
            RowWidget::Repeated { len } => {
                spans.push(Span::styled(row.label.clone(), styles::accent()));
                spans.push(Span::styled(format!(" [{len}]"), styles::text_muted()));
            }
            RowWidget::Unknown => {
                spans.push(Span::styled(format!("{}: ", row.label), styles::text_secondary()));
                spans.push(Span::styled(
                    "‹unknown type›",
                    styles::text_muted().add_modifier(Modifier::ITALIC),
                ));
            }
        }
        Line::from(spans)
    }

    fn render_structured(&self, editor: &RequestEditor, area: Rect, buf: &mut Buffer) {
        let rows = editor.rows();
        if rows.is_empty() {
            Paragraph::new(Line::styled("No fields", styles::text_muted())).render(area, buf);
            return;
        }

        let cursor = editor.cursor();
        let visible = area.height as usize;
        let start = scroll_offset(cursor, rows.len(), visible);
        let lines: Vec<Line> = rows
            .iter()
            .enumerate()
            .skip(start)
            .take(visible)
            .map(|(i, row)| {
                let line = self.row_line(row);
                if i == cursor {
                    line.style(styles::selection(self.focused))
                } else {
                    line
                }
            })
            .collect();
        Paragraph::new(lines).render(area, buf);
    }

    fn render_text(&self, editor: &RequestEditor, area: Rect, buf: &mut Buffer) {
        let error = editor.dual().error().map(|e| e.to_string());
        let text_height = (area.height as usize).saturating_sub(usize::from(error.is_some()));

        let mut lines = match editor.dual().buffer() {
            Some(buffer) => text_lines(buffer, self.text_editing, text_height),
            None => Vec::new(),
        };
        if let Some(error) = error {
            lines.push(Line::styled(format!("✗ {error}"), styles::status_red()));
        }
        Paragraph::new(lines).render(area, buf);
    }
}

/// Buffer lines around the cursor row, the cursor drawn only while editing
fn text_lines(buffer: &TextBuffer, editing: bool, height: usize) -> Vec<Line<'static>> {
    let (row, col) = buffer.cursor();
    let all = buffer.lines();
    let start = scroll_offset(row, all.len(), height);
    all.iter()
        .enumerate()
        .skip(start)
        .take(height)
        .map(|(i, text)| {
            if editing && i == row {
                Line::from(cursor_spans(text, col, styles::text_primary()))
            } else {
                Line::styled(text.clone(), styles::text_primary())
            }
        })
        .collect()
}

impl Widget for RequestPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(self.focused).title(self.title());
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        match self.editor {
            Some(editor) if editor.dual().is_text() => self.render_text(editor, inner, buf),
            Some(editor) => self.render_structured(editor, inner, buf),
            None => Paragraph::new(Line::styled("Select a method", styles::text_muted()))
                .render(inner, buf),
        }
    }
}
