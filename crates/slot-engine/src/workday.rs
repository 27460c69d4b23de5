//! Work-day windows and named day ranges, resolved in a local timezone.

use crate::error::{Result, SlotError};
use crate::interval::Window;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;

/// Parse an IANA timezone name (e.g. "America/New_York").
///
/// # Errors
/// Returns `SlotError::InvalidTimezone` if the name is not a known zone.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| SlotError::InvalidTimezone(name.to_string()))
}

/// Convert a local wall-clock time in `tz` to UTC.
///
/// Repeated local times take the earlier instant; skipped ones are an error.
pub(crate) fn local_to_utc(local: NaiveDateTime, tz: &Tz) -> Result<DateTime<Utc>> {
    tz.from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            SlotError::UnresolvedInstant(format!("{} does not exist in {}", local, tz.name()))
        })
}

/// Daily working hours in local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Default for WorkHours {
    /// 09:00 to 18:00.
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl WorkHours {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// The work window on `date`, as observed in `tz`.
    ///
    /// # Errors
    /// `InvalidWindow` when the hours do not form a forward range on that day
    /// (including `start == end`), `UnresolvedInstant` when a bound falls in a
    /// DST gap.
    pub fn window_on(&self, date: NaiveDate, tz: &Tz) -> Result<Window> {
        let start = local_to_utc(date.and_time(self.start), tz)?;
        let end = local_to_utc(date.and_time(self.end), tz)?;
        Window::new(start, end)
    }
}

/// A named range of days to list events for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayRange {
    /// Local midnight today to local midnight tomorrow.
    Today,
    /// The whole of the next local day.
    Tomorrow,
    /// From now until seven days from now.
    Week,
}

impl DayRange {
    /// The UTC window this range covers, relative to `now` and observed in `tz`.
    pub fn window(&self, now: DateTime<Utc>, tz: &Tz) -> Result<Window> {
        let today = now.with_timezone(tz).date_naive();
        match self {
            DayRange::Today => day_window(today, tz),
            DayRange::Tomorrow => {
                let tomorrow = next_day(today)?;
                day_window(tomorrow, tz)
            }
            DayRange::Week => Window::new(now, now + Duration::days(7)),
        }
    }

    /// Phrase used when talking about the range ("No events scheduled for ...").
    pub fn label(&self) -> &'static str {
        match self {
            DayRange::Today => "today",
            DayRange::Tomorrow => "tomorrow",
            DayRange::Week => "this week",
        }
    }
}

impl fmt::Display for DayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DayRange::Today => "today",
            DayRange::Tomorrow => "tomorrow",
            DayRange::Week => "week",
        };
        f.write_str(name)
    }
}

impl FromStr for DayRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(DayRange::Today),
            "tomorrow" => Ok(DayRange::Tomorrow),
            "week" => Ok(DayRange::Week),
            other => Err(format!(
                "unknown day range '{}': expected today, tomorrow, or week",
                other
            )),
        }
    }
}

fn next_day(date: NaiveDate) -> Result<NaiveDate> {
    date.succ_opt()
        .ok_or_else(|| SlotError::UnresolvedInstant(format!("no day after {}", date)))
}

/// Local midnight on `date` to local midnight on the following day.
fn day_window(date: NaiveDate, tz: &Tz) -> Result<Window> {
    let start = local_to_utc(date.and_time(NaiveTime::MIN), tz)?;
    let end = local_to_utc(next_day(date)?.and_time(NaiveTime::MIN), tz)?;
    Window::new(start, end)
}
