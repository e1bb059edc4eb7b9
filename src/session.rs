use crate::clock::Clock;
use crate::display::{DisplaySink, HistoryRow, StatsView, DEFAULT_HISTORY_ROWS};
use crate::format::format_time;
use crate::scramble::ScrambleGenerator;
use crate::solve::{Solve, SolveId};
use crate::stats::{chronological_series, StatsSummary};
use crate::storage::KvStore;
use crate::store::{PersistenceStatus, SolveStore};
use crate::timer::{Timer, TimerState, DEFAULT_TICK_MS};
use crate::tips::{random_tip, Tip};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tracing::{debug, info};

/// Yes/no gate consulted before destructive actions
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub tick_period: Duration,
    pub history_rows: usize,
    pub show_tips: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_millis(DEFAULT_TICK_MS),
            history_rows: DEFAULT_HISTORY_ROWS,
            show_tips: true,
        }
    }
}

/// Drives the timer from user input and keeps the display sink in sync with
/// the solve history.
pub struct SessionController<K: KvStore, C: Clock, D: DisplaySink> {
    timer: Timer,
    store: SolveStore<K>,
    clock: C,
    sink: D,
    options: SessionOptions,
    scrambler: ScrambleGenerator<StdRng>,
    tip_rng: StdRng,
    scramble: String,
    tip: Tip,
}

impl<K: KvStore, C: Clock, D: DisplaySink> SessionController<K, C, D> {
    pub fn new(store: SolveStore<K>, clock: C, sink: D, options: SessionOptions) -> Self {
        Self::with_rng(store, clock, sink, options, StdRng::from_entropy())
    }

    /// Construct with a caller-provided RNG so scrambles and tips are
    /// reproducible
    pub fn with_rng(
        store: SolveStore<K>,
        clock: C,
        sink: D,
        options: SessionOptions,
        mut rng: StdRng,
    ) -> Self {
        let scramble_rng = StdRng::from_rng(&mut rng).unwrap_or_else(|_| StdRng::from_entropy());
        let mut scrambler = ScrambleGenerator::with_rng(scramble_rng);
        let scramble = scrambler.generate().to_string();
        let tip = random_tip(&mut rng);

        let mut controller = Self {
            timer: Timer::new(options.tick_period),
            store,
            clock,
            sink,
            options,
            scrambler,
            tip_rng: rng,
            scramble,
            tip,
        };
        controller.refresh();
        controller
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn store(&self) -> &SolveStore<K> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SolveStore<K> {
        &mut self.store
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut D {
        &mut self.sink
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn scramble(&self) -> &str {
        &self.scramble
    }

    pub fn tip(&self) -> Tip {
        self.tip
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Click-equivalent: stop a running timer, otherwise start from zero
    pub fn primary_action(&mut self) {
        let now = self.clock.now_ms();
        if self.timer.is_running() {
            self.timer.stop(now);
        } else {
            self.timer.reset();
            self.timer.start(now);
        }
        self.push_time();
    }

    /// Start of a sustained press
    pub fn press(&mut self) {
        let now = self.clock.now_ms();
        match self.timer.state() {
            TimerState::Running => self.timer.stop(now),
            TimerState::Idle if self.timer.elapsed_ms() == 0 => self.timer.ready(),
            TimerState::Stopped if self.timer.elapsed_ms() > 0 => {
                self.timer.reset();
                self.timer.ready();
            }
            _ => {
                debug!(state = %self.timer.state(), "press ignored");
                return;
            }
        }
        self.push_time();
    }

    /// End of a sustained press; launches the run when Ready
    pub fn release(&mut self) {
        if self.timer.state() != TimerState::Ready {
            return;
        }
        let now = self.clock.now_ms();
        self.timer.release(now);
        self.push_time();
    }

    pub fn reset(&mut self) {
        self.timer.reset();
        self.push_time();
    }

    /// Periodic refresh while running
    pub fn tick(&mut self) -> Option<u64> {
        let now = self.clock.now_ms();
        let elapsed = self.timer.tick(now)?;
        self.push_time();
        Some(elapsed)
    }

    /// Record the stopped run. Ignored unless stopped with a non-zero time.
    pub fn save(&mut self) -> Option<Solve> {
        if !self.timer.can_save() {
            debug!(state = %self.timer.state(), elapsed_ms = self.timer.elapsed_ms(), "save ignored");
            return None;
        }

        let now = self.clock.now_datetime();
        let solve = self
            .store
            .append(self.timer.elapsed_ms(), &self.scramble, now);
        self.timer.reset();

        self.tip = random_tip(&mut self.tip_rng);
        self.scramble = self.scrambler.generate().to_string();
        self.refresh();
        Some(solve)
    }

    pub fn new_scramble(&mut self) {
        self.scramble = self.scrambler.generate().to_string();
        self.sink.show_scramble(&self.scramble);
    }

    /// Confirmation prompt for deleting `id`, if that solve exists
    pub fn delete_prompt(&self, id: SolveId) -> Option<String> {
        self.store
            .get(id)
            .map(|s| format!("Delete solve {}?", format_time(s.duration_ms)))
    }

    /// Remove a solve once `confirm` agrees
    pub fn delete(&mut self, id: SolveId, confirm: &mut dyn Confirm) -> bool {
        let Some(prompt) = self.delete_prompt(id) else {
            return false;
        };
        if !confirm.confirm(&prompt) {
            debug!(%id, "delete declined");
            return false;
        }
        let removed = self.store.remove(id);
        self.refresh();
        removed
    }

    /// Confirmation prompt for wiping the history, if there is any
    pub fn clear_prompt(&self) -> Option<String> {
        (!self.store.is_empty()).then(|| format!("Delete all {} solves?", self.store.len()))
    }

    pub fn clear_history(&mut self, confirm: &mut dyn Confirm) -> bool {
        let Some(prompt) = self.clear_prompt() else {
            return false;
        };
        if !confirm.confirm(&prompt) {
            return false;
        }
        self.store.clear();
        info!("history cleared");
        self.refresh();
        true
    }

    /// Recompute statistics and push everything to the sink
    pub fn refresh(&mut self) {
        let history = self.store.all();
        let summary = StatsSummary::compute(history);
        let rows =
            HistoryRow::from_history(history, summary.personal_best, self.options.history_rows);
        let series = chronological_series(history);

        self.sink.show_history(&rows);
        self.sink.show_stats(&StatsView::from(&summary));
        self.sink.show_chart(&series);
        self.sink.show_scramble(&self.scramble);
        if self.options.show_tips {
            self.sink.show_tip(&self.tip);
        }
        let warning = match self.store.status() {
            PersistenceStatus::Healthy => None,
            PersistenceStatus::Degraded(reason) => Some(format!("history not saved: {reason}")),
        };
        self.sink.show_warning(warning.as_deref());
        self.push_time();
    }

    fn push_time(&mut self) {
        let time = format_time(self.timer.elapsed_ms());
        self.sink.show_time(&time, self.timer.state());
    }
}
