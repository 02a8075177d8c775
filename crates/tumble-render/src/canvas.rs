use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use tumble_core::raster::{BLANK, CharGrid};

/// Écrit directement une `CharGrid` dans un `ratatui::Buffer`.
///
/// Pas de widget Canvas ratatui — écriture directe pour zéro overhead.
/// The grid is clipped to `area`; blank cells are left untouched so the
/// terminal background shows through. `fg` colors every glyph, `None`
/// keeps the terminal default.
///
/// # Example
/// ```
/// use ratatui::buffer::Buffer;
/// use ratatui::layout::Rect;
/// use tumble_core::raster::CharGrid;
/// use tumble_render::canvas::render_grid;
///
/// let mut grid = CharGrid::new(4, 2);
/// grid.set(1, 0, '#');
/// let mut buf = Buffer::empty(Rect::new(0, 0, 4, 2));
/// render_grid(&mut buf, Rect::new(0, 0, 4, 2), &grid, None);
/// assert_eq!(buf.cell((1, 0)).map(|c| c.symbol()), Some("#"));
/// ```
pub fn render_grid(buf: &mut Buffer, area: Rect, grid: &CharGrid, fg: Option<Color>) {
    for cy in 0..grid.height.min(area.height) {
        for cx in 0..grid.width.min(area.width) {
            let ch = grid.get(cx, cy);
            if ch == BLANK {
                continue;
            }
            if let Some(cell) = buf.cell_mut((area.x + cx, area.y + cy)) {
                cell.set_char(ch);
                if let Some(color) = fg {
                    cell.set_fg(color);
                }
            }
        }
    }
}
