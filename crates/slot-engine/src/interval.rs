//! Busy intervals, search windows, and instant parsing at the input boundary.
//!
//! Everything here works on `DateTime<Utc>`. Offsets carried by input strings are
//! normalized on the way in so that comparisons never mix timezones.

use crate::error::{Result, SlotError};
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// The occupied span of one calendar event.
///
/// No ordering is enforced: an interval whose `start` is after its `end` is
/// treated as a zero-length interval at `start` by the slot finder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The interval with a reversed `end` collapsed onto `start`.
    pub fn normalized(&self) -> Self {
        Self {
            start: self.start,
            end: self.end.max(self.start),
        }
    }
}

/// The bounding range searched for free time. Always satisfies `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Window {
    /// Build a window, rejecting empty or inverted ranges.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidWindow` when `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(SlotError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Clip a busy interval to this window.
    ///
    /// Returns `None` when the (normalized) interval does not reach into the
    /// window: it ends at or before `start`, or begins at or after `end`.
    pub fn clip(&self, interval: &BusyInterval) -> Option<BusyInterval> {
        let interval = interval.normalized();
        if interval.end <= self.start || interval.start >= self.end {
            return None;
        }
        Some(BusyInterval {
            start: interval.start.max(self.start),
            end: interval.end.min(self.end),
        })
    }
}

/// Parse a timestamp into a UTC instant.
///
/// Accepts RFC 3339 with an offset (`2026-03-01T10:00:00Z`,
/// `2026-03-01T10:00:00-05:00`) and naive local datetimes
/// (`2026-03-01T10:00:00`, `2026-03-01T10:00`), which are read as UTC.
///
/// # Errors
/// Returns `SlotError::UnresolvedInstant` for anything else, including bare
/// dates (those belong to all-day events and carry no sub-day instant).
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    parse_instant_in(s, &Tz::UTC)
}

/// Like [`parse_instant`], but naive datetimes are interpreted in `tz`.
///
/// A local time that falls in a DST gap does not exist and is rejected. A local
/// time repeated by a DST fall-back resolves to the earlier of the two instants.
pub fn parse_instant_in(s: &str, tz: &Tz) -> Result<DateTime<Utc>> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(SlotError::UnresolvedInstant("empty timestamp".to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = parse_naive(trimmed)
        .ok_or_else(|| SlotError::UnresolvedInstant(format!("'{}' is not a datetime", trimmed)))?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            SlotError::UnresolvedInstant(format!("'{}' does not exist in {}", trimmed, tz.name()))
        })
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    s.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").ok())
}
