use crate::solve::Solve;
use itertools::{Itertools, MinMaxResult};

/// Number of recent solves the rolling average covers
pub const AVERAGE_WINDOW: usize = 5;

/// One point of the progress chart: solve number (1-based, oldest first)
/// against its duration in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub index: usize,
    pub seconds: f64,
}

impl From<ChartPoint> for (f64, f64) {
    fn from(p: ChartPoint) -> Self {
        (p.index as f64, p.seconds)
    }
}

/// Fastest solve ever recorded
pub fn personal_best(history: &[Solve]) -> Option<u64> {
    history.iter().map(|s| s.duration_ms).min()
}

/// Mean of the five most recent solves after dropping one fastest and one
/// slowest time.
pub fn average_of_5(history: &[Solve]) -> Option<f64> {
    if history.len() < AVERAGE_WINDOW {
        return None;
    }

    let counted: Vec<u64> = history
        .iter()
        .take(AVERAGE_WINDOW)
        .map(|s| s.duration_ms)
        .sorted()
        .skip(1)
        .take(AVERAGE_WINDOW - 2)
        .collect();

    let sum: u64 = counted.iter().sum();
    Some(sum as f64 / counted.len() as f64)
}

/// History reversed to oldest-first, numbered from 1
pub fn chronological_series(history: &[Solve]) -> Vec<ChartPoint> {
    history
        .iter()
        .rev()
        .enumerate()
        .map(|(i, s)| ChartPoint {
            index: i + 1,
            seconds: s.seconds(),
        })
        .collect()
}

/// X and Y axis bounds for the progress chart.
///
/// Y is padded by 10% of the spread (or one second when every point is equal)
/// so the line never sits on the frame.
pub fn chart_bounds(points: &[ChartPoint]) -> ([f64; 2], [f64; 2]) {
    let x_max = (points.len().max(2)) as f64;

    let y = match points.iter().map(|p| p.seconds).minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => [0.0, 1.0],
        MinMaxResult::OneElement(v) => [(v - 1.0).max(0.0), v + 1.0],
        MinMaxResult::MinMax(lo, hi) => {
            let pad = if hi > lo { (hi - lo) * 0.1 } else { 1.0 };
            [(lo - pad).max(0.0), hi + pad]
        }
    };

    ([1.0, x_max], y)
}

/// Values the stats panel shows
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatsSummary {
    pub count: usize,
    pub personal_best: Option<u64>,
    pub average_of_5: Option<f64>,
}

impl StatsSummary {
    pub fn compute(history: &[Solve]) -> Self {
        Self {
            count: history.len(),
            personal_best: personal_best(history),
            average_of_5: average_of_5(history),
        }
    }
}
