pub mod menus;
pub mod progress_ring;
pub mod screen;
pub mod wave_field;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Widget},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::App, format::format_clock, prefs::Theme, ui::progress_ring::ProgressRing,
    ui::wave_field::WaveField,
};

const PANEL_WIDTH: u16 = 34;
const PANEL_HEIGHT: u16 = 19;
const LEGEND: &str = "(space) start/pause  (s)kip  (r)eset  (p)alette  (c)onfig  (t)heme  (q)uit";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeColors {
    pub background: (u8, u8, u8),
    pub panel: Color,
    pub text: Color,
    pub dim: Color,
}

pub fn colors_for(theme: Theme) -> ThemeColors {
    match theme {
        Theme::Dark => ThemeColors {
            background: (18, 18, 24),
            panel: Color::Rgb(28, 28, 36),
            text: Color::Rgb(235, 235, 235),
            dim: Color::Rgb(120, 120, 130),
        },
        Theme::Light => ThemeColors {
            background: (240, 238, 232),
            panel: Color::Rgb(250, 249, 245),
            text: Color::Rgb(30, 30, 36),
            dim: Color::Rgb(140, 140, 150),
        },
    }
}

/// Rect of at most `width` x `height` centred inside `r`
pub fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect::new(
        r.x + (r.width - width) / 2,
        r.y + (r.height - height) / 2,
        width,
        height,
    )
}

pub fn draw(app: &App, f: &mut Frame) {
    screen::current_screen(&app.view).render(app, f);
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = colors_for(self.prefs.theme);
        let palette = self.waves.palette();
        let state = self.timer.state();

        WaveField::new(&self.waves, colors.background).render(area, buf);

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let text_style = Style::default().fg(colors.text);
        let dim_style = Style::default().fg(colors.dim);

        let panel = centered_rect(PANEL_WIDTH, PANEL_HEIGHT, area);
        Clear.render(panel, buf);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(palette.color(1)))
            .style(Style::default().bg(colors.panel));
        let inner = block.inner(panel);
        block.render(panel, buf);

        let chunks = Layout::vertical([
            Constraint::Min(3),    // ring
            Constraint::Length(1), // label
            Constraint::Length(1), // padding
            Constraint::Length(1), // button
        ])
        .split(inner);

        ProgressRing::new(state.progress())
            .style(Style::default().fg(palette.color(0)))
            .track_style(dim_style)
            .render(chunks[0], buf);

        let clock = format_clock(state.display_secs());
        let clock_row = Rect::new(
            chunks[0].x,
            chunks[0].y + chunks[0].height / 2,
            chunks[0].width,
            1.min(chunks[0].height),
        );
        Paragraph::new(Span::styled(clock, text_style.patch(bold_style)))
            .alignment(Alignment::Center)
            .render(clock_row, buf);

        Paragraph::new(Span::styled(state.label(), text_style.patch(bold_style)))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let button = if self.timer.is_running() { "[ Pause ]" } else { "[ Start ]" };
        Paragraph::new(Span::styled(
            button,
            Style::default().fg(palette.color(2)).patch(bold_style),
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

        if area.height > PANEL_HEIGHT + 1 {
            let legend_row = Rect::new(area.x, area.bottom() - 1, area.width, 1);
            let legend = if LEGEND.width() <= area.width as usize {
                LEGEND
            } else {
                "space/s/r/p/c/t/q"
            };
            Paragraph::new(Line::from(Span::styled(
                legend,
                Style::default()
                    .fg(colors.text)
                    .add_modifier(Modifier::ITALIC),
            )))
            .alignment(Alignment::Center)
            .render(legend_row, buf);
        }
    }
}
