//! Modal overlay helpers: centering, backdrop dimming and drop shadow

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Clear, Widget};

use crate::theme::palette;

/// Center a `width` x `height` rect in `area`, clamped to the area
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

/// Restyle every cell of `area` as a dimmed backdrop
pub fn dim_background(buf: &mut Buffer, area: Rect) {
    let dim_style = Style::default()
        .fg(palette::TEXT_MUTED)
        .bg(palette::DEEPEST_BG);
    let area = area.intersection(buf.area);
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            buf[(x, y)].set_style(dim_style);
        }
    }
}

/// One-cell shadow along the right and bottom edges of `modal`
pub fn render_shadow(buf: &mut Buffer, modal: Rect) {
    let shadow_style = Style::default().fg(palette::SHADOW).bg(palette::SHADOW);
    let right = modal.right();
    let bottom = modal.bottom();

    let right_edge = (modal.y + 1..=bottom).map(|y| (right, y));
    let bottom_edge = (modal.x + 1..right).map(|x| (x, bottom));
    for position in right_edge.chain(bottom_edge) {
        if let Some(cell) = buf.cell_mut(position) {
            cell.set_char(' ');
            cell.set_style(shadow_style);
        }
    }
}

/// Dim `screen`, then clear a centered rect with a shadow and return it
pub fn open_modal(buf: &mut Buffer, screen: Rect, width: u16, height: u16) -> Rect {
    dim_background(buf, screen);
    let modal = centered_rect(width, height, screen);
    render_shadow(buf, modal);
    Clear.render(modal, buf);
    modal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_within_area() {
        let area = Rect::new(10, 5, 80, 24);
        assert_eq!(centered_rect(40, 10, area), Rect::new(30, 12, 40, 10));
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 30, 10);
        assert_eq!(centered_rect(40, 12, area), area);
    }

    #[test]
    fn test_dim_background_only_touches_area() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 10));
        dim_background(&mut buf, Rect::new(5, 3, 10, 5));
        assert_eq!(buf[(5, 3)].bg, palette::DEEPEST_BG);
        assert_eq!(buf[(14, 7)].fg, palette::TEXT_MUTED);
        assert_ne!(buf[(4, 3)].fg, palette::TEXT_MUTED);
    }

    #[test]
    fn test_shadow_edges_and_bounds() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 10));
        render_shadow(&mut buf, Rect::new(5, 2, 10, 6));
        assert_eq!(buf[(15, 3)].bg, palette::SHADOW);
        assert_eq!(buf[(6, 8)].bg, palette::SHADOW);

        // Shadow past the buffer edge is skipped
        render_shadow(&mut buf, Rect::new(18, 8, 2, 2));
    }

    #[test]
    fn test_open_modal_clears_its_rect() {
        let area = Rect::new(0, 0, 20, 10);
        let mut buf = Buffer::empty(area);
        for y in 0..10 {
            for x in 0..20 {
                buf[(x, y)].set_char('X');
            }
        }
        let modal = open_modal(&mut buf, area, 8, 4);
        assert_eq!(modal, Rect::new(6, 3, 8, 4));
        assert_eq!(buf[(7, 4)].symbol(), " ");
        assert_eq!(buf[(0, 0)].symbol(), "X");
    }
}
