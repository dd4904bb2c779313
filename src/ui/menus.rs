use ratatui::{
    layout::{Alignment, Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, SettingsForm, SETTINGS_FIELDS};
use crate::ui::{centered_rect, colors_for};

const SWATCH: &str = "████";

pub fn render_palette_menu(app: &App, selected: usize, f: &mut Frame) {
    let colors = colors_for(app.prefs.theme);
    let area = centered_rect(40, (app.palettes.len() as u16 + 4).min(f.area().height), f.area());
    f.render_widget(Clear, area);

    let items: Vec<ListItem> = app
        .palettes
        .iter()
        .enumerate()
        .map(|(idx, palette)| {
            let marker = if idx == app.prefs.palette_index { "✓ " } else { "  " };
            let mut spans = vec![Span::raw(format!("{marker}{:<12}", palette.name))];
            for i in 0..palette.colors.len() {
                spans.push(Span::styled(SWATCH, Style::default().fg(palette.color(i))));
                spans.push(Span::raw(" "));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .title(" Palettes ")
                .title_bottom(Line::from(" ↑↓ select · enter apply · esc close ").centered()),
        )
        .style(Style::default().fg(colors.text).bg(colors.panel))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default().with_selected(Some(selected));
    f.render_stateful_widget(list, area, &mut state);
}

pub fn render_settings_form(app: &App, form: &SettingsForm, f: &mut Frame) {
    let colors = colors_for(app.prefs.theme);
    let area = centered_rect(40, 13.min(f.area().height), f.area());
    f.render_widget(Clear, area);

    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .title(" Durations ")
        .title_bottom(Line::from(" tab next · enter apply · esc cancel ").centered())
        .style(Style::default().fg(colors.text).bg(colors.panel));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(2)].repeat(3))
        .margin(1)
        .split(inner);

    let field_style = |idx: usize| {
        if idx == form.focus {
            Style::default()
                .fg(colors.panel)
                .bg(colors.text)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::UNDERLINED)
        }
    };

    for (phase, name) in ["Work", "Short break", "Long break"].iter().enumerate() {
        let min_idx = phase * 2;
        let sec_idx = min_idx + 1;
        let line = Line::from(vec![
            Span::raw(format!("{name:<12}")),
            Span::styled(format!("{:>3}", form.fields[min_idx]), field_style(min_idx)),
            Span::raw(" : "),
            Span::styled(format!("{:>2}", form.fields[sec_idx]), field_style(sec_idx)),
        ]);
        if let Some(row) = rows.get(phase * 2) {
            f.render_widget(Paragraph::new(line).alignment(Alignment::Center), *row);
        }
    }

    let hint = Paragraph::new(Span::styled(
        SETTINGS_FIELDS[form.focus],
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    if let Some(row) = rows.last() {
        f.render_widget(hint, *row);
    }
}
