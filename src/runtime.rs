use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Wait between ticks while the stopwatch is not running. Nothing on screen
/// changes then, so only input needs to be noticed promptly.
pub const IDLE_TICK_MS: u64 = 250;

/// What the session loop reacts to
#[derive(Clone, Debug)]
pub enum TimerEvent {
    Key(KeyEvent),
    Resize,
    /// No input arrived within the tick interval
    Tick,
}

/// Source of terminal input
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<TimerEvent, RecvTimeoutError>;
}

/// Reads crossterm events on a dedicated thread. Key press, repeat and
/// release events are all forwarded; the key map decides which matter.
pub struct CrosstermEventSource {
    rx: Receiver<TimerEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        let spawned = thread::Builder::new()
            .name("cubetime-input".to_string())
            .spawn(move || loop {
                let forwarded = match event::read() {
                    Ok(CtEvent::Key(key)) => tx.send(TimerEvent::Key(key)),
                    Ok(CtEvent::Resize(_, _)) => tx.send(TimerEvent::Resize),
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::error!("terminal input reader stopped: {}", e);
                        break;
                    }
                };
                if forwarded.is_err() {
                    break;
                }
            });
        if let Err(e) = spawned {
            tracing::error!("could not start terminal input reader: {}", e);
        }

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TimerEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Decides how long the loop waits for input before ticking
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self, running: bool) -> Duration;
}

/// Same interval whatever the stopwatch is doing
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self, _running: bool) -> Duration {
        self.interval
    }
}

/// Refreshes at the display cadence while a run is live and backs off to
/// [`IDLE_TICK_MS`] otherwise.
#[derive(Clone, Copy, Debug)]
pub struct StopwatchTicker {
    running: Duration,
    idle: Duration,
}

impl StopwatchTicker {
    pub fn new(running: Duration) -> Self {
        Self {
            running,
            idle: Duration::from_millis(IDLE_TICK_MS).max(running),
        }
    }
}

impl Ticker for StopwatchTicker {
    fn interval(&self, running: bool) -> Duration {
        if running {
            self.running
        } else {
            self.idle
        }
    }
}

/// Scripted input for tests
pub struct TestEventSource {
    rx: Receiver<TimerEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<TimerEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TimerEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Single control loop driver.
///
/// Ticks are produced by the same loop that handles input, so a tick never
/// overlaps another tick or a key handler.
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    pub fn interval(&self, running: bool) -> Duration {
        self.ticker.interval(running)
    }

    /// Next input event, or `Tick` once the interval for the current
    /// stopwatch state passes without one
    pub fn step(&self, running: bool) -> TimerEvent {
        let wait = self.ticker.interval(running);
        match self.event_source.recv_timeout(wait) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => TimerEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => {
                thread::sleep(wait);
                TimerEvent::Tick
            }
        }
    }
}
