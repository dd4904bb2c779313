use serde::{Deserialize, Serialize};

/// Every fourth completed work cycle is followed by a long break.
pub const LONG_BREAK_EVERY: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Phase {
    #[strum(to_string = "Working")]
    Working,
    #[strum(to_string = "Break")]
    Break,
    #[strum(to_string = "Long Break")]
    LongBreak,
}

impl Phase {
    pub fn is_break(self) -> bool {
        !matches!(self, Phase::Working)
    }
}

/// Phase durations in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub work_secs: u32,
    pub short_break_secs: u32,
    pub long_break_secs: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            work_secs: 1500,
            short_break_secs: 300,
            long_break_secs: 900,
        }
    }
}

impl SessionConfig {
    pub fn new(work_secs: u32, short_break_secs: u32, long_break_secs: u32) -> Self {
        Self {
            work_secs,
            short_break_secs,
            long_break_secs,
        }
    }

    pub fn duration_for(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Working => self.work_secs,
            Phase::Break => self.short_break_secs,
            Phase::LongBreak => self.long_break_secs,
        }
    }
}

/// A phase change produced by expiry or skip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
    pub cycle_count: u32,
    /// Whether the change should be announced (expiry yes, skip no)
    pub alert: bool,
}

/// Live countdown state. All operations are pure: they take the state by
/// value and hand back the next one, so any scheduler can drive them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub phase: Phase,
    pub cycle_count: u32,
    /// Signed because a tick can briefly take it to -1 before expiry runs.
    pub remaining_secs: i64,
    pub phase_duration_secs: u32,
    pub running: bool,
    pub on_break: bool,
}

impl SessionState {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            phase: Phase::Working,
            cycle_count: 1,
            remaining_secs: config.work_secs as i64,
            phase_duration_secs: config.work_secs,
            running: false,
            on_break: false,
        }
    }

    pub fn tick(mut self) -> Self {
        self.remaining_secs -= 1;
        self
    }

    pub fn needs_expire(&self) -> bool {
        self.running && self.remaining_secs < 0
    }

    /// Phase that follows the current one
    pub fn next_phase(&self) -> Phase {
        match self.phase {
            Phase::Break | Phase::LongBreak => Phase::Working,
            Phase::Working if self.cycle_count % LONG_BREAK_EVERY == 0 => Phase::LongBreak,
            Phase::Working => Phase::Break,
        }
    }

    pub fn expire(self, config: &SessionConfig) -> (Self, Transition) {
        self.advance_phase(config, true)
    }

    pub fn skip(self, config: &SessionConfig) -> (Self, Transition) {
        self.advance_phase(config, false)
    }

    fn advance_phase(mut self, config: &SessionConfig, alert: bool) -> (Self, Transition) {
        let from = self.phase;
        let to = self.next_phase();

        if from.is_break() {
            self.cycle_count += 1;
        }

        self.phase = to;
        self.running = false;
        self.phase_duration_secs = config.duration_for(to);
        self.remaining_secs = self.phase_duration_secs as i64;
        self.on_break = !self.on_break;

        let transition = Transition {
            from,
            to,
            cycle_count: self.cycle_count,
            alert,
        };
        (self, transition)
    }

    pub fn toggle_running(mut self) -> Self {
        self.running = !self.running;
        self
    }

    pub fn reset(self, config: &SessionConfig) -> Self {
        Self::new(config)
    }

    /// Apply new durations; always lands on a fresh, stopped work phase.
    pub fn reconfigure(config: &SessionConfig) -> Self {
        Self::new(config)
    }

    /// Remaining seconds as shown; the transient `-1` never reaches a display
    pub fn display_secs(&self) -> i64 {
        self.remaining_secs.max(0)
    }

    /// Remaining share of the phase in `[0, 1]`
    pub fn completion_fraction(&self) -> f64 {
        if self.phase_duration_secs == 0 {
            return 0.0;
        }
        (self.remaining_secs as f64 / self.phase_duration_secs as f64).clamp(0.0, 1.0)
    }

    /// Elapsed share of the phase, what the progress ring sweeps
    pub fn progress(&self) -> f64 {
        1.0 - self.completion_fraction()
    }

    pub fn label(&self) -> String {
        format!("{} - #{}", self.phase, self.cycle_count)
    }
}
