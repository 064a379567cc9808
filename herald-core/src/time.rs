//! Time utilities: timezone-aware event windows and countdowns.
//!
//! Organizers give start/end as wall-clock strings in whatever zone they think in.
//! Everything displayed afterwards uses one reporting zone, so a window is
//! normalized once, here, and never carries the input zone further.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Timelike};
use chrono_tz::Tz;

use crate::clock::Clock;
use crate::error::WindowError;

/// `YYYY-MM-DD HH:MM:SS`, shared by both endpoints.
pub const TIMESTAMP_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

/// Zone every displayed timestamp is normalized to unless configured otherwise.
pub const DEFAULT_REPORTING_TZ: Tz = chrono_tz::Europe::Paris;

/// Zone assumed for raw timestamps when the caller doesn't name one.
pub const DEFAULT_INPUT_TZ: &str = "Europe/Paris";

/// Validated start/end pair, both expressed in the reporting zone.
///
/// Invariant: `start <= end`. Only [`resolve`] / [`resolve_in`] construct one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
}

impl TimeWindow {
    pub fn start(&self) -> DateTime<Tz> {
        self.start
    }

    pub fn end(&self) -> DateTime<Tz> {
        self.end
    }

    /// Length of the event. Never negative.
    pub fn duration(&self) -> Duration {
        self.end.signed_duration_since(self.start)
    }

    /// Signed time left until the end, as seen by `clock`.
    pub fn remaining(&self, clock: &dyn Clock) -> Duration {
        self.end.signed_duration_since(clock.now())
    }

    /// Countdown string such as `"47h12m3s"`; negative once the event is over.
    pub fn remaining_time(&self, clock: &dyn Clock) -> String {
        format_countdown(self.remaining(clock))
    }
}

/// Resolve a window and normalize it to [`DEFAULT_REPORTING_TZ`].
pub fn resolve(
    timezone_name: &str,
    start_raw: &str,
    end_raw: &str,
    layout: &str,
) -> Result<TimeWindow, WindowError> {
    resolve_in(timezone_name, start_raw, end_raw, layout, DEFAULT_REPORTING_TZ)
}

/// Parse `start_raw`/`end_raw` as wall-clock times in `timezone_name`, check ordering,
/// and convert both into `reporting`.
pub fn resolve_in(
    timezone_name: &str,
    start_raw: &str,
    end_raw: &str,
    layout: &str,
    reporting: Tz,
) -> Result<TimeWindow, WindowError> {
    let input_tz: Tz = timezone_name
        .parse()
        .map_err(|_| WindowError::InvalidTimezone {
            name: timezone_name.to_string(),
        })?;

    let start = parse_in_zone(start_raw, layout, input_tz).map_err(|reason| {
        WindowError::InvalidStartTime {
            input: start_raw.to_string(),
            reason,
        }
    })?;

    let end = parse_in_zone(end_raw, layout, input_tz).map_err(|reason| {
        WindowError::InvalidEndTime {
            input: end_raw.to_string(),
            reason,
        }
    })?;

    if end < start {
        return Err(WindowError::InvalidRange {
            start: start.to_rfc3339(),
            end: end.to_rfc3339(),
        });
    }

    Ok(TimeWindow {
        start: start.with_timezone(&reporting),
        end: end.with_timezone(&reporting),
    })
}

/// Ambiguous local times (DST fall-back) take the earlier instant.
/// Local times inside a DST gap don't exist and are rejected.
fn parse_in_zone(raw: &str, layout: &str, tz: Tz) -> Result<DateTime<Tz>, String> {
    let naive = NaiveDateTime::parse_from_str(raw, layout).map_err(|e| e.to_string())?;
    // chrono tolerates missing padding and extra whitespace; the layout is exact
    if naive.format(layout).to_string() != raw {
        return Err(format!("'{raw}' does not match layout '{layout}'"));
    }
    if naive.nanosecond() >= 1_000_000_000 {
        return Err(format!("'{raw}' is a leap second"));
    }

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => Err(format!("{naive} does not exist in {tz} (DST gap)")),
    }
}

/// Render a duration rounded to the nearest second, e.g. `"1h0m5s"`, `"2m0s"`, `"-45s"`, `"0s"`.
pub fn format_countdown(remaining: Duration) -> String {
    let mut secs = remaining.num_seconds();
    // subsec_nanos carries the same sign as the duration; round half away from zero
    let sub = remaining.subsec_nanos();
    if sub.abs() >= 500_000_000 {
        secs += i64::from(sub.signum());
    }

    if secs == 0 {
        return "0s".to_string();
    }

    let sign = if secs < 0 { "-" } else { "" };
    let total = secs.unsigned_abs();
    let (h, m, s) = (total / 3600, total % 3600 / 60, total % 60);

    if h > 0 {
        format!("{sign}{h}h{m}m{s}s")
    } else if m > 0 {
        format!("{sign}{m}m{s}s")
    } else {
        format!("{sign}{s}s")
    }
}

/// Long, locale-independent form: `"Mon, 01 Jan 2024 01:00:00 CET"`.
pub fn format_instant(dt: &DateTime<Tz>) -> String {
    dt.format("%a, %d %b %Y %H:%M:%S %Z").to_string()
}
