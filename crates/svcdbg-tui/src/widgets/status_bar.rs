//! Status bar: session phase, editor path hint and key hints for the current mode

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use svcdbg_app::state::{Pane, UiMode};
use svcdbg_app::AppState;

use crate::theme::styles;

pub struct StatusBar<'a> {
    state: &'a AppState,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn phase(&self) -> Span<'static> {
        match self.state.tabs.selected() {
            Some(session) => {
                let (icon, label, style) = styles::phase_indicator(session.phase());
                Span::styled(format!("{icon} {label}"), style)
            }
            None => Span::styled("○ No tab", styles::text_muted()),
        }
    }

    /// Value path of the request row under the cursor
    fn path_hint(&self) -> Option<Span<'static>> {
        if !self.state.settings.ui.show_path_hint || self.state.focus != Pane::Request {
            return None;
        }
        let editor = self.state.tabs.selected()?.editor()?;
        if editor.dual().is_text() {
            return None;
        }
        let row = editor.selected_row()?;
        Some(Span::styled(row.path.to_string(), styles::text_secondary()))
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        match self.state.ui_mode {
            UiMode::FieldInput => &[("Enter", "commit"), ("Esc", "cancel"), ("^Z", "undo")],
            UiMode::TextEditor => &[("^S", "commit"), ("Esc", "discard")],
            UiMode::Search => &[("Enter", "keep filter"), ("Esc", "clear")],
            UiMode::Login => &[("Enter", "submit"), ("Esc", "cancel")],
            UiMode::Notifications => &[("↑↓", "move"), ("d", "dismiss"), ("Esc", "back")],
            UiMode::Normal => match self.state.focus {
                Pane::Navigator => &[
                    ("Enter", "open"),
                    ("←→", "section"),
                    ("/", "filter"),
                    ("r", "refresh"),
                    ("q", "quit"),
                ],
                Pane::Methods => &[
                    ("Enter", "select"),
                    ("←→", "service/instance"),
                    ("r", "reload"),
                    ("w", "close tab"),
                ],
                Pane::Request => &[
                    ("Enter", "edit"),
                    ("Space", "presence"),
                    ("a/d", "add/remove"),
                    ("t", "text view"),
                    ("u", "undo"),
                    ("i", "invoke"),
                    ("S", "save"),
                ],
                Pane::Response => &[
                    ("↑↓", "scroll"),
                    ("PgUp/PgDn", "page"),
                    ("i", "invoke"),
                    ("Tab", "next pane"),
                ],
            },
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        let mut left = vec![Span::raw(" "), self.phase()];
        if let Some(path) = self.path_hint() {
            left.push(Span::styled("  ", styles::text_muted()));
            left.push(path);
        }
        let left = Line::from(left);
        let left_width = left.width() as u16;
        buf.set_line(area.x, area.y, &left, area.width);

        let mut right = Vec::new();
        for (key, action) in self.hints() {
            right.push(Span::styled(*key, styles::keybinding()));
            right.push(Span::styled(format!(" {action}  "), styles::text_muted()));
        }
        let right = Line::from(right);
        let right_width = right.width() as u16;
        if left_width + right_width + 2 <= area.width {
            let x = area.x + area.width - right_width;
            buf.set_line(x, area.y, &right, right_width);
        }
    }
}
