//! Sources: where events and inbox messages come from.
//!
//! A [`CalendarSource`] is handed to the [`Scheduler`](crate::scheduler::Scheduler)
//! at construction time, and a [`MailSource`] answers inbox queries. Provider
//! clients implement them; [`InMemoryCalendar`] and [`InMemoryMailbox`] serve
//! data that was already fetched or loaded from disk.

use crate::email::{EmailMessage, MailQuery};
use crate::error::Result;
use crate::event::CalendarEvent;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

/// Read access to a calendar.
pub trait CalendarSource: Send + Sync {
    /// Events overlapping `[start, end)`, ordered by start time.
    fn events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>>;
}

impl<T: CalendarSource + ?Sized> CalendarSource for &T {
    fn events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>> {
        (**self).events_in_range(start, end)
    }
}

impl<T: CalendarSource + ?Sized> CalendarSource for Box<T> {
    fn events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>> {
        (**self).events_in_range(start, end)
    }
}

/// A calendar backed by an in-memory list of events.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCalendar {
    events: Vec<CalendarEvent>,
}

impl InMemoryCalendar {
    pub fn new(events: Vec<CalendarEvent>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }
}

impl CalendarSource for InMemoryCalendar {
    /// Events whose span overlaps the range. All-day events span whole UTC
    /// days here; [`Scheduler`](crate::scheduler::Scheduler) re-reads them in
    /// its own timezone.
    fn events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>> {
        Ok(select_in_range(self.events.iter().cloned(), start, end, &Tz::UTC))
    }
}

/// Keep the events that overlap `[start, end)` as observed in `tz`, ordered
/// by start. Events whose timestamps cannot be resolved are passed through
/// (sorted last) so the caller sees and reports them.
///
/// A zero-length event overlaps when it starts inside the range.
pub fn select_in_range(
    events: impl IntoIterator<Item = CalendarEvent>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    tz: &Tz,
) -> Vec<CalendarEvent> {
    let mut matched: Vec<(Option<DateTime<Utc>>, CalendarEvent)> = Vec::new();

    for event in events {
        match event.span_in(tz) {
            Some((ev_start, ev_end)) => {
                if ev_start < end && (ev_end > start || ev_start >= start) {
                    matched.push((Some(ev_start), event));
                }
            }
            None => {
                warn!(summary = %event.summary, "event has no resolvable span; passing through");
                matched.push((None, event));
            }
        }
    }

    matched.sort_by_key(|(key, _)| (key.is_none(), *key));
    matched.into_iter().map(|(_, e)| e).collect()
}

/// Read access to a mailbox.
pub trait MailSource: Send + Sync {
    /// Messages matching `query`, newest first, at most `query.max_results()`.
    fn search(&self, query: &MailQuery) -> Result<Vec<EmailMessage>>;
}

impl<T: MailSource + ?Sized> MailSource for &T {
    fn search(&self, query: &MailQuery) -> Result<Vec<EmailMessage>> {
        (**self).search(query)
    }
}

impl<T: MailSource + ?Sized> MailSource for Box<T> {
    fn search(&self, query: &MailQuery) -> Result<Vec<EmailMessage>> {
        (**self).search(query)
    }
}

/// A mailbox backed by an in-memory list of messages, kept newest first.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMailbox {
    messages: Vec<EmailMessage>,
}

impl InMemoryMailbox {
    pub fn new(messages: Vec<EmailMessage>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[EmailMessage] {
        &self.messages
    }
}

impl MailSource for InMemoryMailbox {
    fn search(&self, query: &MailQuery) -> Result<Vec<EmailMessage>> {
        let found: Vec<EmailMessage> = self
            .messages
            .iter()
            .filter(|m| query.matches(m))
            .take(query.max_results())
            .cloned()
            .collect();
        debug!(query = %query, found = found.len(), "searched mailbox");
        Ok(found)
    }
}
