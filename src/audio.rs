use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use notify_rust::Notification;

use crate::session::Transition;

/// Fire-and-forget sound triggers. Volumes are in `[0, 1]`.
pub trait AudioNotifier {
    fn play_alarm(&self, volume: f64, transition: &Transition);
    fn play_click(&self, volume: f64);
}

/// Any volume above zero is audible on the terminal bell
pub fn rings_at(volume: f64) -> bool {
    volume > 0.0
}

/// Rings the terminal bell and optionally raises a desktop notification
#[derive(Debug, Clone)]
pub struct TerminalNotifier {
    desktop: bool,
}

impl TerminalNotifier {
    pub fn new(desktop: bool) -> Self {
        Self { desktop }
    }

    fn bell(&self, volume: f64) {
        if !rings_at(volume) {
            return;
        }
        let mut out = io::stdout();
        if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
            tracing::warn!("failed to ring terminal bell: {e}");
        }
    }
}

impl Default for TerminalNotifier {
    fn default() -> Self {
        Self::new(true)
    }
}

impl AudioNotifier for TerminalNotifier {
    fn play_alarm(&self, volume: f64, transition: &Transition) {
        self.bell(volume);
        if !self.desktop {
            return;
        }
        let body = format!("{} finished, {} next", transition.from, transition.to);
        let shown = Notification::new()
            .summary("swell")
            .body(&body)
            .appname("swell")
            .icon("alarm-clock")
            .show();
        if let Err(e) = shown {
            tracing::warn!("desktop notification failed: {e}");
        }
    }

    fn play_click(&self, volume: f64) {
        self.bell(volume);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sound {
    Alarm(f64),
    Click(f64),
}

/// Notifier that remembers what it was asked to play
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    played: Rc<RefCell<Vec<Sound>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<Sound> {
        self.played.borrow().clone()
    }

    pub fn alarms(&self) -> usize {
        self.played
            .borrow()
            .iter()
            .filter(|s| matches!(s, Sound::Alarm(_)))
            .count()
    }

    pub fn clicks(&self) -> usize {
        self.played
            .borrow()
            .iter()
            .filter(|s| matches!(s, Sound::Click(_)))
            .count()
    }
}

impl AudioNotifier for RecordingNotifier {
    fn play_alarm(&self, volume: f64, _transition: &Transition) {
        self.played.borrow_mut().push(Sound::Alarm(volume));
    }

    fn play_click(&self, volume: f64) {
        self.played.borrow_mut().push(Sound::Click(volume));
    }
}
