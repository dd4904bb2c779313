use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

use crate::waves::{WaveRenderer, CELL_HEIGHT_PX, CELL_WIDTH_PX};

const HALF_BLOCK: &str = "▀";

/// Rasterises the wave bands into terminal cells. Each cell holds two
/// vertical samples: the upper half is the foreground, the lower the background.
pub struct WaveField<'a> {
    renderer: &'a WaveRenderer,
    background: (u8, u8, u8),
}

impl<'a> WaveField<'a> {
    pub fn new(renderer: &'a WaveRenderer, background: (u8, u8, u8)) -> Self {
        Self {
            renderer,
            background,
        }
    }

    /// Colours of the upper and lower half of the cell at `(col, row)`
    pub fn cell_colors(&self, col: u16, row: u16) -> ((u8, u8, u8), (u8, u8, u8)) {
        let x = (col as f64 + 0.5) * CELL_WIDTH_PX;
        let y = row as f64 * CELL_HEIGHT_PX;
        let upper = self
            .renderer
            .sample(x, y + CELL_HEIGHT_PX * 0.25, self.background);
        let lower = self
            .renderer
            .sample(x, y + CELL_HEIGHT_PX * 0.75, self.background);
        (upper, lower)
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

impl Widget for WaveField<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let (upper, lower) = self.cell_colors(col, row);
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol(HALF_BLOCK);
                    cell.set_fg(rgb(upper));
                    cell.set_bg(rgb(lower));
                }
            }
        }
    }
}
