//! Header bar: app title, gateway address, catalog status and the tab bar

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use svcdbg_app::state::CatalogState;
use svcdbg_app::tab_manager::TabManager;

use crate::theme::{palette, styles};

use super::SessionTabs;

pub struct MainHeader<'a> {
    gateway_url: &'a str,
    catalog: &'a CatalogState,
    tabs: Option<&'a TabManager>,
}

impl<'a> MainHeader<'a> {
    pub fn new(gateway_url: &'a str, catalog: &'a CatalogState) -> Self {
        Self {
            gateway_url,
            catalog,
            tabs: None,
        }
    }

    /// Render the tab bar on a second row inside the border
    pub fn with_tabs(mut self, tabs: &'a TabManager) -> Self {
        self.tabs = Some(tabs);
        self
    }

    fn catalog_status(&self) -> Span<'static> {
        if self.catalog.loading {
            Span::styled("↻ listing", styles::status_yellow())
        } else if self.catalog.loaded {
            Span::styled(
                format!("● {} modules", self.catalog.modules.len()),
                styles::status_green(),
            )
        } else {
            Span::styled("○ offline", styles::text_muted())
        }
    }
}

impl Widget for MainHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false).style(Style::default().bg(palette::CARD_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let left = Line::from(vec![
            Span::raw(" "),
            Span::styled("Service Debugger", styles::accent_bold()),
            Span::raw(" "),
            Span::styled("/", styles::text_muted()),
            Span::raw(" "),
            Span::styled(self.gateway_url.to_string(), styles::text_secondary()),
        ]);
        buf.set_line(inner.x, inner.y, &left, inner.width);

        let status = Line::from(vec![self.catalog_status(), Span::raw(" ")]);
        let status_width = status.width() as u16;
        let left_width = left.width() as u16;
        if left_width + status_width + 2 <= inner.width {
            let x = inner.x + inner.width - status_width;
            buf.set_line(x, inner.y, &status, status_width);
        }

        if let Some(tabs) = self.tabs {
            if inner.height >= 2 {
                let tabs_area = Rect::new(inner.x, inner.y + 1, inner.width, 1);
                SessionTabs::new(tabs).render(tabs_area, buf);
            }
        }
    }
}
