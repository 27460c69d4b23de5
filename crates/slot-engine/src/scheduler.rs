//! Answers scheduling questions against an injected calendar source.

use crate::config::SchedulerConfig;
use crate::error::Result;
use crate::event::{busy_intervals, CalendarEvent};
use crate::freebusy::{find_free_slots, FreeSlot, SlotPolicy};
use crate::interval::Window;
use crate::source::{select_in_range, CalendarSource};
use crate::workday::{DayRange, WorkHours};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::debug;

/// Free-slot and event queries over one calendar.
#[derive(Debug, Clone)]
pub struct Scheduler<S> {
    source: S,
    tz: Tz,
    hours: WorkHours,
    policy: SlotPolicy,
}

impl<S: CalendarSource> Scheduler<S> {
    /// # Errors
    /// Returns `SlotError::InvalidTimezone` if the configured timezone is unknown.
    pub fn new(source: S, config: &SchedulerConfig) -> Result<Self> {
        Ok(Self {
            source,
            tz: config.tz()?,
            hours: config.work_hours(),
            policy: config.policy(),
        })
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn policy(&self) -> &SlotPolicy {
        &self.policy
    }

    /// The configured work window on `date`.
    pub fn work_window(&self, date: NaiveDate) -> Result<Window> {
        self.hours.window_on(date, &self.tz)
    }

    /// Free slots within working hours on `date`.
    ///
    /// All-day events do not block time. Any timed event whose bounds cannot be
    /// resolved fails the whole query.
    pub fn free_slots_on(&self, date: NaiveDate) -> Result<Vec<FreeSlot>> {
        let window = self.work_window(date)?;
        let events = self.source.events_in_range(window.start(), window.end())?;
        let busy = busy_intervals(&events)?;
        debug!(%date, events = events.len(), busy = busy.len(), "searching work window");
        Ok(find_free_slots(&busy, &window, &self.policy))
    }

    /// Events in a named day range relative to `now`.
    ///
    /// All-day events belong to the local days they name in the scheduler's
    /// timezone, whatever day boundaries the source uses.
    pub fn events_in(&self, range: DayRange, now: DateTime<Utc>) -> Result<Vec<CalendarEvent>> {
        let window = range.window(now, &self.tz)?;
        // Any fixed offset is under a day, so this catches every local day.
        let margin = Duration::days(1);
        let candidates = self
            .source
            .events_in_range(window.start() - margin, window.end() + margin)?;
        let events = select_in_range(candidates, window.start(), window.end(), &self.tz);
        debug!(%range, events = events.len(), "listed events");
        Ok(events)
    }
}
