//! Typed calendar event records as delivered by a calendar provider.
//!
//! Field names follow the provider's wire format (`dateTime`, `timeZone`, ...).
//! Every field is optional on the wire and falls back to a default, so a sparse
//! event still deserializes. Validation happens when an event is turned into a
//! [`BusyInterval`].

use crate::error::{Result, SlotError};
use crate::interval::{parse_instant_in, BusyInterval};
use crate::workday::local_to_utc;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

const UNTITLED: &str = "No title";

/// One end of an event: either a timed instant (`dateTime`) or a whole day (`date`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventTime {
    pub fn timed(date_time: impl Into<String>) -> Self {
        Self {
            date_time: Some(date_time.into()),
            ..Self::default()
        }
    }

    pub fn all_day(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            ..Self::default()
        }
    }

    /// Resolve the `dateTime` field to a UTC instant.
    ///
    /// An explicit offset in the timestamp wins. A naive timestamp is read in
    /// the event's `timeZone`, or UTC when none is given.
    pub fn resolve(&self) -> Result<DateTime<Utc>> {
        let raw = self
            .date_time
            .as_deref()
            .ok_or_else(|| SlotError::UnresolvedInstant("missing dateTime".to_string()))?;

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw.trim()) {
            return Ok(dt.with_timezone(&Utc));
        }

        let tz = match self.time_zone.as_deref() {
            Some(name) => name.parse::<Tz>().map_err(|_| {
                SlotError::UnresolvedInstant(format!("unknown timeZone '{}' for '{}'", name, raw))
            })?,
            None => Tz::UTC,
        };
        parse_instant_in(raw, &tz)
    }

    /// The `date` field as a calendar date, if present and well-formed.
    pub fn day(&self) -> Option<NaiveDate> {
        self.date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attendee {
    pub email: String,
}

/// A single calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
    pub location: String,
    pub description: String,
    pub attendees: Vec<Attendee>,
}

impl Default for CalendarEvent {
    fn default() -> Self {
        Self {
            id: String::new(),
            summary: UNTITLED.to_string(),
            start: EventTime::default(),
            end: EventTime::default(),
            location: String::new(),
            description: String::new(),
            attendees: Vec::new(),
        }
    }
}

impl CalendarEvent {
    /// A timed event from two timestamps.
    pub fn timed(summary: impl Into<String>, start: &str, end: &str) -> Self {
        Self {
            summary: summary.into(),
            start: EventTime::timed(start),
            end: EventTime::timed(end),
            ..Self::default()
        }
    }

    /// An all-day event. `end` is exclusive, as providers send it.
    pub fn all_day(summary: impl Into<String>, start: &str, end: &str) -> Self {
        Self {
            summary: summary.into(),
            start: EventTime::all_day(start),
            end: EventTime::all_day(end),
            ..Self::default()
        }
    }

    /// True when the event is a date-only (all-day) event.
    pub fn is_all_day(&self) -> bool {
        self.start.date_time.is_none() && self.start.date.is_some()
    }

    pub fn attendee_emails(&self) -> Vec<&str> {
        self.attendees
            .iter()
            .map(|a| a.email.as_str())
            .filter(|email| !email.is_empty())
            .collect()
    }

    /// The busy interval this event occupies.
    ///
    /// Returns `Ok(None)` for all-day events, which have no sub-day free/busy
    /// meaning.
    ///
    /// # Errors
    /// Returns `SlotError::UnresolvedInstant` when a timed event's start or end
    /// is missing or cannot be resolved to an instant.
    pub fn busy_interval(&self) -> Result<Option<BusyInterval>> {
        if self.is_all_day() {
            return Ok(None);
        }
        let start = self.start.resolve().map_err(|e| self.unresolved("start", e))?;
        let end = self.end.resolve().map_err(|e| self.unresolved("end", e))?;
        Ok(Some(BusyInterval::new(start, end)))
    }

    /// The instants this event covers, with all-day dates read as local days
    /// in `tz`. A missing all-day end means one day; reversed ends collapse
    /// onto the start.
    ///
    /// Returns `None` when the bounds cannot be resolved.
    pub fn span_in(&self, tz: &Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        if self.is_all_day() {
            let first = self.start.day()?;
            let last = match self.end.day() {
                Some(last) => last,
                None => first.succ_opt()?,
            };
            let start = local_to_utc(first.and_time(NaiveTime::MIN), tz).ok()?;
            let end = local_to_utc(last.and_time(NaiveTime::MIN), tz).ok()?;
            return Some((start, end.max(start)));
        }
        let interval = self.busy_interval().ok()??.normalized();
        Some((interval.start, interval.end))
    }

    fn unresolved(&self, which: &str, err: SlotError) -> SlotError {
        let detail = match err {
            SlotError::UnresolvedInstant(msg) => msg,
            other => other.to_string(),
        };
        let label = if self.id.is_empty() { &self.summary } else { &self.id };
        SlotError::UnresolvedInstant(format!("event '{}' {}: {}", label, which, detail))
    }
}

/// Convert events into busy intervals, skipping all-day events.
///
/// All-or-nothing: the first unresolvable timed event fails the whole batch.
pub fn busy_intervals(events: &[CalendarEvent]) -> Result<Vec<BusyInterval>> {
    let mut intervals = Vec::with_capacity(events.len());
    for event in events {
        match event.busy_interval()? {
            Some(interval) => intervals.push(interval),
            None => debug!(summary = %event.summary, "skipping all-day event"),
        }
    }
    Ok(intervals)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EventsDocument {
    List(Vec<CalendarEvent>),
    Response { items: Vec<CalendarEvent> },
}

/// Parse events from JSON: either a bare array of events or a provider list
/// response of the form `{"items": [...]}`.
pub fn parse_events_json(json: &str) -> Result<Vec<CalendarEvent>> {
    let document: EventsDocument = serde_json::from_str(json)?;
    Ok(match document {
        EventsDocument::List(events) => events,
        EventsDocument::Response { items } => items,
    })
}
