use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::audio::AudioNotifier;
use crate::session::{SessionConfig, SessionState, Transition};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Monotonic time source, measured from an arbitrary epoch
pub trait Clock {
    fn now(&self) -> Duration;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Hand-driven clock for tests; clones share the same time
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volumes {
    pub alarm: f64,
    pub sfx: f64,
}

impl Default for Volumes {
    fn default() -> Self {
        Self {
            alarm: 0.5,
            sfx: 1.0,
        }
    }
}

/// The one pending per-second interval. Dropping it is cancelling it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSchedule {
    pub id: u64,
    next_due: Duration,
}

/// Drives a `SessionState` from wall-clock time
pub struct Timer {
    config: SessionConfig,
    state: SessionState,
    notifier: Box<dyn AudioNotifier>,
    volumes: Volumes,
    schedule: Option<TickSchedule>,
    next_schedule_id: u64,
}

impl std::fmt::Debug for Timer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timer")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("volumes", &self.volumes)
            .field("schedule", &self.schedule)
            .finish()
    }
}

impl Timer {
    pub fn new(config: SessionConfig, notifier: Box<dyn AudioNotifier>, volumes: Volumes) -> Self {
        Self {
            state: SessionState::new(&config),
            config,
            notifier,
            volumes,
            schedule: None,
            next_schedule_id: 1,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Id of the live interval, if one is scheduled
    pub fn schedule_id(&self) -> Option<u64> {
        self.schedule.map(|s| s.id)
    }

    fn cancel_schedule(&mut self) {
        if let Some(schedule) = self.schedule.take() {
            tracing::trace!(id = schedule.id, "cancelled tick schedule");
        }
    }

    fn schedule_from(&mut self, now: Duration) {
        self.cancel_schedule();
        let id = self.next_schedule_id;
        self.next_schedule_id += 1;
        self.schedule = Some(TickSchedule {
            id,
            next_due: now + TICK_INTERVAL,
        });
        tracing::trace!(id, "scheduled tick");
    }

    /// Start/pause button: click sound, then flip running
    pub fn toggle(&mut self, now: Duration) {
        self.notifier.play_click(self.volumes.sfx);
        self.state = self.state.toggle_running();
        if self.state.running {
            self.schedule_from(now);
        } else {
            self.cancel_schedule();
        }
        tracing::debug!(running = self.state.running, "timer toggled");
    }

    /// Run every tick that has come due by `now`, returning any expiry.
    pub fn advance(&mut self, now: Duration) -> Option<Transition> {
        while self.state.running {
            let Some(schedule) = self.schedule.as_mut() else {
                break;
            };
            if schedule.next_due > now {
                break;
            }
            schedule.next_due += TICK_INTERVAL;
            self.state = self.state.tick();

            if self.state.needs_expire() {
                self.cancel_schedule();
                let (state, transition) = self.state.expire(&self.config);
                self.state = state;
                self.notifier.play_alarm(self.volumes.alarm, &transition);
                tracing::info!(
                    from = %transition.from,
                    to = %transition.to,
                    cycle = transition.cycle_count,
                    "phase complete"
                );
                return Some(transition);
            }
        }
        None
    }

    pub fn skip(&mut self) -> Transition {
        self.cancel_schedule();
        let (state, transition) = self.state.skip(&self.config);
        self.state = state;
        tracing::info!(from = %transition.from, to = %transition.to, "phase skipped");
        transition
    }

    pub fn reset(&mut self) {
        self.cancel_schedule();
        self.state = self.state.reset(&self.config);
        tracing::info!("timer reset");
    }

    pub fn reconfigure(&mut self, config: SessionConfig) {
        self.cancel_schedule();
        self.config = config;
        self.state = SessionState::reconfigure(&config);
        tracing::info!(
            work = config.work_secs,
            short_break = config.short_break_secs,
            long_break = config.long_break_secs,
            "durations updated"
        );
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.cancel_schedule();
    }
}
