use crate::format::{format_opt, format_time, format_time_f64, PLACEHOLDER};
use crate::solve::{Solve, SolveId};
use crate::stats::{ChartPoint, StatsSummary};
use crate::timer::TimerState;
use crate::tips::Tip;
use chrono::Local;

/// Rows rendered in the history table unless configured otherwise
pub const DEFAULT_HISTORY_ROWS: usize = 50;

/// One rendered line of the history table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    /// Solve number counted from the oldest solve
    pub number: usize,
    pub id: SolveId,
    pub time: String,
    pub is_pb: bool,
    pub date: String,
}

impl HistoryRow {
    /// Build up to `limit` rows from a newest-first history
    pub fn from_history(history: &[Solve], personal_best: Option<u64>, limit: usize) -> Vec<Self> {
        let total = history.len();
        history
            .iter()
            .take(limit)
            .enumerate()
            .map(|(index, solve)| HistoryRow {
                number: total - index,
                id: solve.id,
                time: format_time(solve.duration_ms),
                is_pb: Some(solve.duration_ms) == personal_best,
                date: solve
                    .created_at
                    .with_timezone(&Local)
                    .format("%-d/%-m %H:%M")
                    .to_string(),
            })
            .collect()
    }
}

/// Formatted statistics strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub personal_best: String,
    pub average_of_5: String,
    pub count: String,
}

impl Default for StatsView {
    fn default() -> Self {
        Self {
            personal_best: PLACEHOLDER.to_string(),
            average_of_5: PLACEHOLDER.to_string(),
            count: "0".to_string(),
        }
    }
}

impl From<&StatsSummary> for StatsView {
    fn from(s: &StatsSummary) -> Self {
        Self {
            personal_best: format_opt(s.personal_best),
            average_of_5: s
                .average_of_5
                .map_or_else(|| PLACEHOLDER.to_string(), format_time_f64),
            count: s.count.to_string(),
        }
    }
}

/// Where the session controller pushes everything it wants shown
pub trait DisplaySink {
    fn show_time(&mut self, time: &str, state: TimerState);
    fn show_history(&mut self, rows: &[HistoryRow]);
    fn show_stats(&mut self, stats: &StatsView);
    fn show_chart(&mut self, series: &[ChartPoint]);
    fn show_scramble(&mut self, scramble: &str);
    fn show_tip(&mut self, tip: &Tip);
    fn show_warning(&mut self, warning: Option<&str>);
}

/// Sink that retains the latest pushed values; the TUI renders from it
#[derive(Debug, Clone)]
pub struct ScreenModel {
    pub time: String,
    pub timer_state: TimerState,
    pub history: Vec<HistoryRow>,
    pub stats: StatsView,
    pub chart: Vec<ChartPoint>,
    pub scramble: String,
    pub tip: Option<Tip>,
    pub warning: Option<String>,
    /// Number of `show_time` pushes, used to check refresh behaviour
    pub time_updates: usize,
}

impl Default for ScreenModel {
    fn default() -> Self {
        Self {
            time: format_time(0),
            timer_state: TimerState::Idle,
            history: Vec::new(),
            stats: StatsView::default(),
            chart: Vec::new(),
            scramble: String::new(),
            tip: None,
            warning: None,
            time_updates: 0,
        }
    }
}

impl DisplaySink for ScreenModel {
    fn show_time(&mut self, time: &str, state: TimerState) {
        self.time = time.to_string();
        self.timer_state = state;
        self.time_updates += 1;
    }

    fn show_history(&mut self, rows: &[HistoryRow]) {
        self.history = rows.to_vec();
    }

    fn show_stats(&mut self, stats: &StatsView) {
        self.stats = stats.clone();
    }

    fn show_chart(&mut self, series: &[ChartPoint]) {
        self.chart = series.to_vec();
    }

    fn show_scramble(&mut self, scramble: &str) {
        self.scramble = scramble.to_string();
    }

    fn show_tip(&mut self, tip: &Tip) {
        self.tip = Some(*tip);
    }

    fn show_warning(&mut self, warning: Option<&str>) {
        self.warning = warning.map(str::to_string);
    }
}
