use std::f64::consts::TAU;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

const FILLED: &str = "●";
const TRACK: &str = "·";

/// Circular progress indicator, sweeping clockwise from twelve o'clock
pub struct ProgressRing {
    progress: f64,
    style: Style,
    track_style: Style,
}

impl ProgressRing {
    pub fn new(progress: f64) -> Self {
        Self {
            progress: progress.clamp(0.0, 1.0),
            style: Style::default().fg(Color::White),
            track_style: Style::default().fg(Color::DarkGray),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn track_style(mut self, style: Style) -> Self {
        self.track_style = style;
        self
    }

    /// Cell positions around the ring with whether each is filled.
    /// Cells are about twice as tall as they are wide, so the x radius doubles.
    pub fn points(&self, area: Rect) -> Vec<(u16, u16, bool)> {
        if area.width < 3 || area.height < 3 {
            return Vec::new();
        }
        let ry = (area.height as f64 - 1.0) / 2.0;
        let rx = (ry * 2.0).min((area.width as f64 - 1.0) / 2.0);
        let cx = area.x as f64 + (area.width as f64 - 1.0) / 2.0;
        let cy = area.y as f64 + ry;

        let steps = ((rx + ry) * 4.0).max(12.0) as usize;
        let mut points: Vec<(u16, u16, bool)> = Vec::with_capacity(steps);
        for i in 0..steps {
            let share = i as f64 / steps as f64;
            let angle = share * TAU;
            let x = (cx + rx * angle.sin()).round() as u16;
            let y = (cy - ry * angle.cos()).round() as u16;
            let filled = share < self.progress;
            match points.iter_mut().find(|(px, py, _)| *px == x && *py == y) {
                Some(existing) => existing.2 |= filled,
                None => points.push((x, y, filled)),
            }
        }
        points
    }
}

impl Widget for ProgressRing {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (x, y, filled) in self.points(area) {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_symbol(if filled { FILLED } else { TRACK });
                cell.set_style(if filled { self.style } else { self.track_style });
            }
        }
    }
}
