/// Rendered wherever a statistic has no value yet
pub const PLACEHOLDER: &str = "--:--.---";

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;

/// Format milliseconds as `MM:SS.mmm`.
///
/// Minutes are padded to two digits but never capped, so a 100 minute solve
/// renders as `100:00.000`.
pub fn format_time(ms: u64) -> String {
    let minutes = ms / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let millis = ms % MS_PER_SECOND;

    format!("{minutes:02}:{seconds:02}.{millis:03}")
}

/// Format a fractional millisecond value (averages), truncating the
/// sub-millisecond part.
pub fn format_time_f64(ms: f64) -> String {
    if !ms.is_finite() || ms < 0.0 {
        return PLACEHOLDER.to_string();
    }
    format_time(ms.trunc() as u64)
}

/// Format an optional value, falling back to [`PLACEHOLDER`]
pub fn format_opt(ms: Option<u64>) -> String {
    ms.map_or_else(|| PLACEHOLDER.to_string(), format_time)
}

/// Parse a `MM:SS.mmm` string back into milliseconds.
///
/// Returns `None` for anything [`format_time`] could not have produced.
pub fn parse_time(s: &str) -> Option<u64> {
    let (minutes, rest) = s.split_once(':')?;
    let (seconds, millis) = rest.split_once('.')?;

    if minutes.len() < 2 || seconds.len() != 2 || millis.len() != 3 {
        return None;
    }
    if ![minutes, seconds, millis]
        .iter()
        .all(|part| part.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    let minutes: u64 = minutes.parse().ok()?;
    let seconds: u64 = seconds.parse().ok()?;
    let millis: u64 = millis.parse().ok()?;

    if seconds >= 60 {
        return None;
    }

    minutes
        .checked_mul(MS_PER_MINUTE)?
        .checked_add(seconds * MS_PER_SECOND + millis)
}
