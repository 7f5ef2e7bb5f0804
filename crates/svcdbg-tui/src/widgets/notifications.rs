//! Notification stack drawn over the bottom-right corner of the workspace

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Clear, Paragraph, Widget, Wrap},
};

use svcdbg_app::notifications::{NotificationId, NotificationItem, NotificationPayload, NotificationQueue};

use crate::theme::styles;

/// Body lines shown under the focused network failure
const FOCUSED_BODY_LINES: usize = 3;

pub struct NotificationList<'a> {
    queue: &'a NotificationQueue,
    focus: Option<NotificationId>,
}

impl<'a> NotificationList<'a> {
    pub fn new(queue: &'a NotificationQueue, focus: Option<NotificationId>) -> Self {
        Self { queue, focus }
    }

    /// Lines for the whole stack, oldest first
    pub fn lines(&self) -> Vec<Line<'static>> {
        self.queue
            .iter()
            .flat_map(|item| item_lines(item, self.focus == Some(item.id)))
            .collect()
    }
}

fn item_lines(item: &NotificationItem, focused: bool) -> Vec<Line<'static>> {
    let pin = if item.is_kept() { "▸ " } else { "  " };
    let mut lines = match &item.payload {
        NotificationPayload::Network(failure) => {
            let mut lines = vec![Line::from(vec![
                Span::styled(pin, styles::accent()),
                Span::styled(format!("✗ {}", failure.summary()), styles::status_red()),
                Span::raw("  "),
                Span::styled(failure.url.clone(), styles::text_secondary()),
            ])];
            if focused {
                lines.extend(
                    failure
                        .body
                        .lines()
                        .filter(|l| !l.trim().is_empty())
                        .take(FOCUSED_BODY_LINES)
                        .map(|l| Line::styled(format!("    {l}"), styles::text_muted())),
                );
            }
            lines
        }
        NotificationPayload::Info(text) => vec![Line::from(vec![
            Span::styled(pin, styles::accent()),
            Span::styled(format!("● {text}"), styles::text_primary()),
        ])],
    };
    if focused {
        if let Some(first) = lines.first_mut() {
            *first = first.clone().style(styles::unfocused_selected());
        }
    }
    lines
}

impl Widget for NotificationList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.queue.is_empty() {
            return;
        }
        let title = if self.focus.is_some() {
            " Notifications (d dismiss, Esc back) "
        } else {
            " Notifications (n) "
        };
        let block = styles::glass_block(self.focus.is_some()).title(title);
        Clear.render(area, buf);
        Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
