use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use swell::app::App;
use swell::audio::RecordingNotifier;
use swell::palette::PaletteSet;
use swell::prefs::{FilePreferenceStore, Preferences};
use swell::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use swell::session::{Phase, SessionConfig};
use swell::timer::ManualClock;
use swell::waves::Viewport;

fn key(c: char) -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn app_with(
    prefs: Preferences,
    store: FilePreferenceStore,
) -> (App, RecordingNotifier, ManualClock) {
    let notifier = RecordingNotifier::new();
    let clock = ManualClock::new();
    let app = App::new(
        prefs,
        PaletteSet::builtin(),
        Box::new(store),
        Box::new(notifier.clone()),
        Box::new(clock.clone()),
        Viewport::from_cells(80, 24),
    );
    (app, notifier, clock)
}

// Headless run through Runner/TestEventSource with a simulated clock:
// every Tick the runner yields advances the clock by a quarter second.
#[test]
fn headless_full_pomodoro_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let store = FilePreferenceStore::with_path(dir.path().join("prefs.json"));
    let mut prefs = Preferences::default();
    prefs.durations = SessionConfig::new(2, 1, 3);
    let (mut app, notifier, clock) = app_with(prefs, store);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    let mut phases = vec![app.timer.state().phase];
    for _ in 0..4 {
        // Start each work phase and its following break
        for _ in 0..2 {
            tx.send(key(' ')).unwrap();
            let before = app.timer.state().phase;
            for _ in 0..200u32 {
                let event = runner.step();
                if let AppEvent::Tick = event {
                    clock.advance(Duration::from_millis(250));
                }
                app.on_event(event);
                if app.timer.state().phase != before {
                    break;
                }
            }
            phases.push(app.timer.state().phase);
        }
    }

    assert_eq!(
        phases,
        vec![
            Phase::Working,
            Phase::Break,
            Phase::Working,
            Phase::Break,
            Phase::Working,
            Phase::Break,
            Phase::Working,
            Phase::LongBreak,
            Phase::Working,
        ]
    );
    assert_eq!(app.timer.state().cycle_count, 5);
    assert_eq!(notifier.alarms(), 8);
    assert_eq!(notifier.clicks(), 8);
    assert!(!app.timer.is_running());
}

#[test]
fn headless_pause_holds_remaining_time() {
    let dir = tempfile::tempdir().unwrap();
    let store = FilePreferenceStore::with_path(dir.path().join("prefs.json"));
    let (mut app, _, clock) = app_with(Preferences::default(), store);

    app.on_event(key(' '));
    clock.advance(Duration::from_secs(3));
    app.on_event(AppEvent::Tick);
    assert_eq!(app.timer.state().remaining_secs, 1497);

    app.on_event(key(' '));
    clock.advance(Duration::from_secs(60));
    app.on_event(AppEvent::Tick);
    assert_eq!(app.timer.state().remaining_secs, 1497);
    assert_eq!(app.timer.schedule_id(), None);
}

#[test]
fn headless_preferences_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");

    {
        let store = FilePreferenceStore::with_path(&path);
        let (mut app, _, _) = app_with(Preferences::load(&store), store);
        app.on_event(key('p'));
        app.on_event(AppEvent::Key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)));
        app.on_event(AppEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
        app.on_event(AppEvent::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        app.on_event(key('t'));
    }

    let store = FilePreferenceStore::with_path(&path);
    let prefs = Preferences::load(&store);
    assert_eq!(prefs.palette_index, 1);
    assert_eq!(prefs.theme.to_string(), "light");
    assert_eq!(prefs.durations, SessionConfig::default());
}

#[test]
fn headless_resize_reflows_waves() {
    let dir = tempfile::tempdir().unwrap();
    let store = FilePreferenceStore::with_path(dir.path().join("prefs.json"));
    let (mut app, _, _) = app_with(Preferences::default(), store);

    app.on_event(AppEvent::Resize(120, 40));
    assert_eq!(app.waves.viewport(), Viewport::from_cells(120, 40));
}
