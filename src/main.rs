use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Write},
    path::PathBuf,
};

use swell::{
    app::App,
    audio::TerminalNotifier,
    format::clamp_minutes,
    logging,
    palette::PaletteSet,
    prefs::{FilePreferenceStore, PreferenceStore, Preferences, Theme},
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    timer::SystemClock,
    ui,
    waves::Viewport,
};

/// terminal pomodoro timer with animated waves
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A pomodoro timer for the terminal: work and break intervals, a long break every fourth cycle, and layered animated waves in a palette of your choice."
)]
pub struct Cli {
    /// minutes per work session (saved for next time)
    #[clap(short = 'w', long)]
    work: Option<u32>,

    /// minutes per short break (saved for next time)
    #[clap(short = 'b', long)]
    short_break: Option<u32>,

    /// minutes per long break (saved for next time)
    #[clap(short = 'l', long)]
    long_break: Option<u32>,

    /// palette index, see --list-palettes
    #[clap(short = 'p', long)]
    palette: Option<usize>,

    /// colour theme
    #[clap(short = 't', long, value_enum)]
    theme: Option<ThemeArg>,

    /// alarm volume between 0 and 1
    #[clap(long)]
    alarm_volume: Option<f64>,

    /// button click volume between 0 and 1
    #[clap(long)]
    sfx_volume: Option<f64>,

    /// do not raise desktop notifications when a phase ends
    #[clap(long)]
    no_notify: bool,

    /// print the available palettes and exit
    #[clap(long)]
    list_palettes: bool,

    /// preference file to use instead of the default location
    #[clap(long)]
    prefs: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, PartialEq, ValueEnum)]
pub enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Light => Theme::Light,
        }
    }
}

impl Cli {
    /// Fold command line overrides into loaded preferences.
    /// Returns true when anything changed and should be saved.
    fn apply_to(&self, prefs: &mut Preferences) -> bool {
        let before = prefs.clone();
        if let Some(m) = self.work {
            prefs.durations.work_secs = clamp_minutes(m as i64) * 60;
        }
        if let Some(m) = self.short_break {
            prefs.durations.short_break_secs = clamp_minutes(m as i64) * 60;
        }
        if let Some(m) = self.long_break {
            prefs.durations.long_break_secs = clamp_minutes(m as i64) * 60;
        }
        if let Some(p) = self.palette {
            prefs.palette_index = p;
        }
        if let Some(t) = self.theme {
            prefs.theme = t.into();
        }
        if let Some(v) = self.alarm_volume {
            prefs.volumes.alarm = v.clamp(0.0, 1.0);
        }
        if let Some(v) = self.sfx_volume {
            prefs.volumes.sfx = v.clamp(0.0, 1.0);
        }
        *prefs != before
    }

    fn store(&self) -> FilePreferenceStore {
        match &self.prefs {
            Some(path) => FilePreferenceStore::with_path(path),
            None => FilePreferenceStore::new(),
        }
    }
}

fn list_palettes(palettes: &PaletteSet) -> io::Result<()> {
    let mut out = io::stdout().lock();
    for (idx, palette) in palettes.iter().enumerate() {
        writeln!(out, "{idx:>2}  {:<12} {}", palette.name, palette.colors.join(" "))?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let palettes = PaletteSet::builtin();

    if cli.list_palettes {
        list_palettes(&palettes)?;
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    logging::init()?;

    let store = cli.store();
    let mut prefs = Preferences::load(&store);
    if cli.apply_to(&mut prefs) {
        if let Err(e) = prefs.save(&store) {
            tracing::warn!("could not save command line preferences: {e}");
        }
    }
    tracing::info!(?prefs, "starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let mut app = App::new(
        prefs,
        palettes,
        Box::new(store) as Box<dyn PreferenceStore>,
        Box::new(TerminalNotifier::new(!cli.no_notify)),
        Box::new(SystemClock::new()),
        Viewport::from_cells(size.width, size.height),
    );
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, SetTitle(""))?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend + Write>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let mut title = String::new();

    while !app.should_quit {
        terminal.draw(|f| ui::draw(app, f))?;

        let next_title = app.window_title();
        if next_title != title {
            execute!(terminal.backend_mut(), SetTitle(&next_title))?;
            title = next_title;
        }

        app.on_event(runner.step());
    }

    Ok(())
}
