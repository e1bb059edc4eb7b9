use std::time::Duration;
use tracing::debug;

/// Reference display-refresh cadence while running
pub const DEFAULT_TICK_MS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum TimerState {
    #[default]
    Idle,
    Ready,
    Running,
    Stopped,
}

/// Identifies one armed periodic tick. Every `start` arms a new generation,
/// so a handle captured before `stop`/`reset` never matches again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickHandle {
    generation: u64,
}

/// Stopwatch state machine.
///
/// All transitions are total: events that make no sense for the current
/// state are ignored.
#[derive(Debug, Clone)]
pub struct Timer {
    state: TimerState,
    elapsed_ms: u64,
    start_epoch_ms: u64,
    tick: Option<TickHandle>,
    generation: u64,
    tick_period: Duration,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_TICK_MS))
    }
}

impl Timer {
    pub fn new(tick_period: Duration) -> Self {
        Self {
            state: TimerState::Idle,
            elapsed_ms: 0,
            start_epoch_ms: 0,
            tick: None,
            generation: 0,
            tick_period,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    /// Currently armed tick, if any
    pub fn tick_handle(&self) -> Option<TickHandle> {
        self.tick
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn start(&mut self, now_ms: u64) {
        if self.is_running() {
            return;
        }
        self.start_epoch_ms = now_ms.saturating_sub(self.elapsed_ms);
        self.generation += 1;
        self.tick = Some(TickHandle {
            generation: self.generation,
        });
        debug!(from = %self.state, elapsed_ms = self.elapsed_ms, "timer started");
        self.state = TimerState::Running;
    }

    /// Periodic refresh; returns the new elapsed time while running
    pub fn tick(&mut self, now_ms: u64) -> Option<u64> {
        let handle = self.tick?;
        self.fire(handle, now_ms)
    }

    /// Run the tick identified by `handle`. Stale handles are ignored.
    pub fn fire(&mut self, handle: TickHandle, now_ms: u64) -> Option<u64> {
        if !self.is_running() || self.tick != Some(handle) {
            return None;
        }
        self.elapsed_ms = now_ms.saturating_sub(self.start_epoch_ms);
        Some(self.elapsed_ms)
    }

    pub fn stop(&mut self, now_ms: u64) {
        if !self.is_running() {
            return;
        }
        self.elapsed_ms = now_ms.saturating_sub(self.start_epoch_ms);
        self.tick.take();
        self.state = TimerState::Stopped;
        debug!(elapsed_ms = self.elapsed_ms, "timer stopped");
    }

    pub fn reset(&mut self) {
        self.tick.take();
        self.elapsed_ms = 0;
        self.start_epoch_ms = 0;
        if self.state != TimerState::Idle {
            debug!(from = %self.state, "timer reset");
        }
        self.state = TimerState::Idle;
    }

    /// Hold gesture began; only meaningful from a clean Idle
    pub fn ready(&mut self) {
        if self.state == TimerState::Idle && self.elapsed_ms == 0 {
            self.state = TimerState::Ready;
        }
    }

    /// Hold gesture released; starts the run when Ready
    pub fn release(&mut self, now_ms: u64) {
        if self.state == TimerState::Ready {
            self.start(now_ms);
        }
    }

    /// True when the current run can be recorded as a solve
    pub fn can_save(&self) -> bool {
        self.state == TimerState::Stopped && self.elapsed_ms > 0
    }
}
