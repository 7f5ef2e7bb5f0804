//! Custom widget components

mod header;
mod login_dialog;
mod methods;
pub mod modal_overlay;
mod navigator;
mod notifications;
mod request_editor;
mod status_bar;
mod tabs;
pub mod value_tree;

pub use header::MainHeader;
pub use login_dialog::LoginDialog;
pub use methods::MethodsPane;
pub use navigator::Navigator;
pub use notifications::NotificationList;
pub use request_editor::RequestPane;
pub use status_bar::StatusBar;
pub use tabs::SessionTabs;
pub use value_tree::ResponsePane;

pub(crate) use tabs::truncate_name;

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

/// First visible row so that `cursor` stays inside a `visible`-row window
pub(crate) fn scroll_offset(cursor: usize, len: usize, visible: usize) -> usize {
    if visible == 0 || len <= visible {
        return 0;
    }
    cursor.saturating_sub(visible - 1).min(len - visible)
}

/// `text` split around a reversed cursor cell at char column `col`
pub(crate) fn cursor_spans(text: &str, col: usize, style: Style) -> Vec<Span<'static>> {
    let before: String = text.chars().take(col).collect();
    let mut rest = text.chars().skip(col);
    let at = rest.next().map_or_else(|| " ".to_string(), |c| c.to_string());
    let after: String = rest.collect();

    vec![
        Span::styled(before, style),
        Span::styled(at, style.add_modifier(Modifier::REVERSED)),
        Span::styled(after, style),
    ]
}
