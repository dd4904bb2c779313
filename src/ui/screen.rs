use ratatui::Frame;

use crate::app::{App, View};
use crate::ui::menus::{render_palette_menu, render_settings_form};

/// A UI Screen boundary: responsible for rendering one view
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Countdown over the wave background
pub struct TimerScreen;

impl Screen for TimerScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

/// Palette picker drawn over the timer
pub struct PaletteScreen {
    pub selected: usize,
}

impl Screen for PaletteScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        TimerScreen.render(app, f);
        render_palette_menu(app, self.selected, f);
    }
}

/// Duration settings drawn over the timer
pub struct SettingsScreen;

impl Screen for SettingsScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        TimerScreen.render(app, f);
        if let View::Settings(form) = &app.view {
            render_settings_form(app, form, f);
        }
    }
}

/// Helper to construct the appropriate screen for the current view
pub fn current_screen(view: &View) -> Box<dyn Screen> {
    match view {
        View::Timer => Box::new(TimerScreen),
        View::Palettes { selected } => Box::new(PaletteScreen {
            selected: *selected,
        }),
        View::Settings(_) => Box::new(SettingsScreen),
    }
}
