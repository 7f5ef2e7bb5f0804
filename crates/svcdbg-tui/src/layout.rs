//! Screen layout for the TUI
//!
//! ```text
//! ╭ header (title + tabs) ───────────────────────────╮
//! ╰──────────────────────────────────────────────────╯
//! ╭ navigator ╮╭ methods ────────────────────────────╮
//! │           │╰─────────────────────────────────────╯
//! │           │╭ request ─────────╮╭ response ───────╮
//! ╰───────────╯╰──────────────────╯╰─────────────────╯
//!  status bar
//! ```

use ratatui::layout::{Constraint, Layout, Rect};

/// Navigator column width on wide terminals
const NAVIGATOR_WIDTH: u16 = 32;

/// Below this width the navigator shrinks to a share of the screen
const NARROW_WIDTH: u16 = 100;

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    /// Title and tab bar (glass container)
    pub header: Rect,

    /// Catalog / history / saved list
    pub navigator: Rect,

    /// Service and instance choosers plus the method list
    pub methods: Rect,

    pub request: Rect,

    pub response: Rect,

    /// Single-line key hints and session status
    pub status: Rect,
}

/// Create the main screen layout.
///
/// The header grows by one row for the tab bar once any tab is open.
pub fn create(area: Rect, has_tabs: bool) -> ScreenAreas {
    let header_height = if has_tabs { 4 } else { 3 };

    let rows = Layout::vertical([
        Constraint::Length(header_height),
        Constraint::Min(6),
        Constraint::Length(1),
    ])
    .split(area);

    let navigator_width = if area.width < NARROW_WIDTH {
        Constraint::Percentage(30)
    } else {
        Constraint::Length(NAVIGATOR_WIDTH)
    };
    let columns = Layout::horizontal([navigator_width, Constraint::Min(20)]).split(rows[1]);

    let workspace = Layout::vertical([Constraint::Percentage(35), Constraint::Min(4)])
        .split(columns[1]);

    let panes = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(workspace[1]);

    ScreenAreas {
        header: rows[0],
        navigator: columns[0],
        methods: workspace[0],
        request: panes[0],
        response: panes[1],
        status: rows[2],
    }
}

/// Area for the notification stack: bottom-right corner of `body`, above the
/// status bar, sized for `count` single-line items
pub fn notifications_area(body: Rect, count: usize) -> Rect {
    let width = 56.min(body.width);
    let height = (count as u16).saturating_add(2).min(body.height);
    Rect::new(
        body.x + body.width.saturating_sub(width),
        body.y + body.height.saturating_sub(height),
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_grows_with_tabs() {
        let area = Rect::new(0, 0, 120, 40);
        assert_eq!(create(area, false).header.height, 3);
        assert_eq!(create(area, true).header.height, 4);
    }

    #[test]
    fn test_status_bar_is_last_row() {
        let area = Rect::new(0, 0, 120, 40);
        let layout = create(area, true);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.status.y, 39);
    }

    #[test]
    fn test_navigator_fixed_width_on_wide_screens() {
        let layout = create(Rect::new(0, 0, 160, 40), false);
        assert_eq!(layout.navigator.width, NAVIGATOR_WIDTH);
        assert_eq!(layout.methods.x, NAVIGATOR_WIDTH);
    }

    #[test]
    fn test_request_and_response_side_by_side() {
        let layout = create(Rect::new(0, 0, 120, 40), false);
        assert_eq!(layout.request.y, layout.response.y);
        assert!(layout.request.x < layout.response.x);
        assert_eq!(layout.request.y, layout.methods.y + layout.methods.height);
    }

    #[test]
    fn test_notifications_area_is_clamped() {
        let body = Rect::new(0, 3, 40, 10);
        let area = notifications_area(body, 20);
        assert_eq!(area.width, 40);
        assert_eq!(area.height, 10);

        let area = notifications_area(Rect::new(0, 0, 120, 30), 2);
        assert_eq!(area, Rect::new(64, 26, 56, 4));
    }
}
