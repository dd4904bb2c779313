use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::audio::AudioNotifier;
use crate::format::{format_clock, DurationInput};
use crate::palette::PaletteSet;
use crate::prefs::{PreferenceStore, Preferences, StoreError};
use crate::runtime::AppEvent;
use crate::session::{SessionConfig, Transition};
use crate::timer::{Clock, Timer};
use crate::waves::{Viewport, WaveRenderer};

const MINUTE_DIGITS: usize = 3;
const SECOND_DIGITS: usize = 2;

/// The six duration fields, in tab order
pub const SETTINGS_FIELDS: [&str; 6] = [
    "Work min",
    "Work sec",
    "Short break min",
    "Short break sec",
    "Long break min",
    "Long break sec",
];

/// Editable minutes/seconds text for each phase
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsForm {
    pub fields: [String; 6],
    pub focus: usize,
}

impl SettingsForm {
    pub fn new(config: &SessionConfig) -> Self {
        let parts = |secs: u32| {
            let input = DurationInput::from_secs(secs);
            [input.minutes.to_string(), format!("{:02}", input.seconds)]
        };
        let [wm, ws] = parts(config.work_secs);
        let [sm, ss] = parts(config.short_break_secs);
        let [lm, ls] = parts(config.long_break_secs);
        Self {
            fields: [wm, ws, sm, ss, lm, ls],
            focus: 0,
        }
    }

    fn max_len(&self) -> usize {
        if self.focus % 2 == 0 {
            MINUTE_DIGITS
        } else {
            SECOND_DIGITS
        }
    }

    pub fn next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn prev(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    /// Only digits are accepted; a full field starts over from the new digit
    pub fn push_char(&mut self, c: char) {
        if !c.is_ascii_digit() {
            return;
        }
        let max_len = self.max_len();
        let field = &mut self.fields[self.focus];
        if field.len() >= max_len {
            field.clear();
        }
        field.push(c);
    }

    pub fn backspace(&mut self) {
        self.fields[self.focus].pop();
    }

    pub fn input(&self, phase_index: usize) -> DurationInput {
        DurationInput::from_parts(
            &self.fields[phase_index * 2],
            &self.fields[phase_index * 2 + 1],
        )
    }

    pub fn to_config(&self) -> SessionConfig {
        SessionConfig::new(
            self.input(0).total_secs(),
            self.input(1).total_secs(),
            self.input(2).total_secs(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Timer,
    Palettes { selected: usize },
    Settings(SettingsForm),
}

pub struct App {
    pub timer: Timer,
    pub waves: WaveRenderer,
    pub palettes: PaletteSet,
    pub prefs: Preferences,
    pub view: View,
    pub should_quit: bool,
    pub last_transition: Option<Transition>,
    store: Box<dyn PreferenceStore>,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("timer", &self.timer)
            .field("prefs", &self.prefs)
            .field("view", &self.view)
            .field("should_quit", &self.should_quit)
            .finish()
    }
}

impl App {
    pub fn new(
        mut prefs: Preferences,
        palettes: PaletteSet,
        store: Box<dyn PreferenceStore>,
        notifier: Box<dyn AudioNotifier>,
        clock: Box<dyn Clock>,
        viewport: Viewport,
    ) -> Self {
        prefs.palette_index = palettes.resolve_index(prefs.palette_index);
        let timer = Timer::new(prefs.durations, notifier, prefs.volumes);
        let mut waves = WaveRenderer::new(palettes.get(prefs.palette_index).clone(), viewport);
        waves.start(clock.now());

        Self {
            timer,
            waves,
            palettes,
            prefs,
            view: View::Timer,
            should_quit: false,
            last_transition: None,
            store,
            clock,
        }
    }

    fn persist(&self, result: Result<(), StoreError>) {
        if let Err(e) = result {
            tracing::warn!("failed to save preferences: {e}");
        }
    }

    /// Per-frame update: run due timer ticks and advance the waves
    pub fn on_tick(&mut self) {
        let now = self.clock.now();
        if let Some(transition) = self.timer.advance(now) {
            self.last_transition = Some(transition);
        }
        self.waves.on_frame(now);
    }

    /// Dispatch one runtime event. The timer and waves advance after every
    /// event, so a held key cannot starve them.
    pub fn on_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => {}
            AppEvent::Resize(cols, rows) => self.on_resize(cols, rows),
            AppEvent::Key(key) => self.handle_key(key),
        }
        if !self.should_quit {
            self.on_tick();
        }
    }

    pub fn on_resize(&mut self, cols: u16, rows: u16) {
        self.waves.resize(Viewport::from_cells(cols, rows));
    }

    pub fn toggle_timer(&mut self) {
        let now = self.clock.now();
        self.timer.toggle(now);
    }

    pub fn skip(&mut self) {
        self.last_transition = Some(self.timer.skip());
    }

    pub fn reset(&mut self) {
        self.timer.reset();
        self.last_transition = None;
    }

    pub fn apply_palette(&mut self, index: usize) {
        let index = self.palettes.resolve_index(index);
        self.prefs.palette_index = index;
        let palette = self.palettes.get(index).clone();
        tracing::info!(palette = %palette.name, "palette selected");
        let now = self.clock.now();
        self.waves.set_palette(palette, now);
        self.persist(self.prefs.save_palette(self.store.as_ref()));
    }

    pub fn apply_durations(&mut self, config: SessionConfig) {
        self.prefs.durations = config;
        self.timer.reconfigure(config);
        self.last_transition = None;
        self.persist(self.prefs.save_durations(self.store.as_ref()));
    }

    pub fn toggle_theme(&mut self) {
        self.prefs.theme = self.prefs.theme.toggled();
        self.persist(self.prefs.save_theme(self.store.as_ref()));
    }

    /// Terminal title: the countdown while running, the app name otherwise
    pub fn window_title(&self) -> String {
        let state = self.timer.state();
        if self.timer.is_running() {
            format!("{} - {}", format_clock(state.display_secs()), state.phase)
        } else {
            "swell".to_string()
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match std::mem::replace(&mut self.view, View::Timer) {
            View::Timer => self.handle_timer_key(key),
            View::Palettes { selected } => self.handle_palette_key(key, selected),
            View::Settings(form) => self.handle_settings_key(key, form),
        }
    }

    fn handle_timer_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_timer(),
            KeyCode::Char('s') => self.skip(),
            KeyCode::Char('r') => self.reset(),
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('p') => {
                self.view = View::Palettes {
                    selected: self.prefs.palette_index,
                }
            }
            KeyCode::Char('c') => self.view = View::Settings(SettingsForm::new(self.timer.config())),
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_palette_key(&mut self, key: KeyEvent, mut selected: usize) {
        let count = self.palettes.len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('p') | KeyCode::Char('q') => return,
            KeyCode::Up | KeyCode::Char('k') => selected = (selected + count - 1) % count,
            KeyCode::Down | KeyCode::Char('j') => selected = (selected + 1) % count,
            KeyCode::Enter | KeyCode::Char(' ') => self.apply_palette(selected),
            _ => {}
        }
        self.view = View::Palettes { selected };
    }

    fn handle_settings_key(&mut self, key: KeyEvent, mut form: SettingsForm) {
        match key.code {
            KeyCode::Esc => return,
            KeyCode::Enter => {
                let config = form.to_config();
                self.apply_durations(config);
                return;
            }
            KeyCode::Tab | KeyCode::Down | KeyCode::Right => form.next(),
            KeyCode::BackTab | KeyCode::Up | KeyCode::Left => form.prev(),
            KeyCode::Backspace | KeyCode::Delete => form.backspace(),
            KeyCode::Char(c) => form.push_char(c),
            _ => {}
        }
        self.view = View::Settings(form);
    }
}
