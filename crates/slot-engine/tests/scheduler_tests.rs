//! Tests for the scheduler over injected calendar sources.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use slot_engine::config::SchedulerConfig;
use slot_engine::event::CalendarEvent;
use slot_engine::scheduler::Scheduler;
use slot_engine::source::{CalendarSource, InMemoryCalendar};
use slot_engine::workday::DayRange;
use slot_engine::SlotError;

// ── Helpers ─────────────────────────────────────────────────────────────────

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

fn utc(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap()
}

fn calendar() -> InMemoryCalendar {
    InMemoryCalendar::new(vec![
        CalendarEvent::timed("Lunch", "2026-03-02T12:00:00Z", "2026-03-02T13:00:00Z"),
        CalendarEvent::timed("Standup", "2026-03-02T09:00:00Z", "2026-03-02T09:15:00Z"),
        CalendarEvent::all_day("Team offsite", "2026-03-02", "2026-03-03"),
        CalendarEvent::timed("Dinner", "2026-03-02T19:00:00Z", "2026-03-02T21:00:00Z"),
        CalendarEvent::timed("Next day", "2026-03-03T10:00:00Z", "2026-03-03T11:00:00Z"),
    ])
}

/// A source that always fails, standing in for an unreachable provider.
struct Unreachable;

impl CalendarSource for Unreachable {
    fn events_in_range(
        &self,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> slot_engine::error::Result<Vec<CalendarEvent>> {
        Err(SlotError::Source("connection refused".to_string()))
    }
}

/// A source that counts how often it is queried.
#[derive(Default)]
struct Counting {
    calls: AtomicUsize,
}

impl CalendarSource for Counting {
    fn events_in_range(
        &self,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> slot_engine::error::Result<Vec<CalendarEvent>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

// ── Free slots ──────────────────────────────────────────────────────────────

#[test]
fn free_slots_within_default_work_hours() {
    let scheduler = Scheduler::new(calendar(), &SchedulerConfig::default()).unwrap();

    let slots = scheduler.free_slots_on(monday()).unwrap();

    // Standup 09:00-09:15 leaves a sub-threshold gap; the offsite does not block.
    let bounds: Vec<(DateTime<Utc>, DateTime<Utc>, i64)> = slots
        .iter()
        .map(|s| (s.start, s.end, s.duration_minutes))
        .collect();
    assert_eq!(
        bounds,
        vec![
            (utc(9, 15), utc(12, 0), 165),
            (utc(13, 0), utc(18, 0), 300),
        ]
    );
}

#[test]
fn free_slots_respect_configured_hours_and_minimum() {
    let config = SchedulerConfig {
        work_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        work_end: NaiveTime::from_hms_opt(12, 30, 0).unwrap(),
        min_duration_minutes: 60,
        ..SchedulerConfig::default()
    };
    let scheduler = Scheduler::new(calendar(), &config).unwrap();

    let slots = scheduler.free_slots_on(monday()).unwrap();

    // 08:00-09:00 (60) and 09:15-12:00 (165); 12:00-12:30 is lunch.
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].start, utc(8, 0));
    assert_eq!(slots[0].duration_minutes, 60);
    assert_eq!(slots[1].end, utc(12, 0));
}

#[test]
fn free_slots_in_local_timezone() {
    let config = SchedulerConfig {
        timezone: "Europe/Berlin".to_string(),
        ..SchedulerConfig::default()
    };
    let scheduler = Scheduler::new(calendar(), &config).unwrap();

    let window = scheduler.work_window(monday()).unwrap();
    // CET is UTC+1 in March before the switch.
    assert_eq!(window.start(), utc(8, 0));
    assert_eq!(window.end(), utc(17, 0));

    let slots = scheduler.free_slots_on(monday()).unwrap();
    assert_eq!(slots.first().map(|s| s.start), Some(utc(8, 0)));
}

#[test]
fn unresolvable_event_fails_the_whole_query() {
    let source = InMemoryCalendar::new(vec![
        CalendarEvent::timed("Lunch", "2026-03-02T12:00:00Z", "2026-03-02T13:00:00Z"),
        CalendarEvent::timed("Mystery", "sometime", "later"),
    ]);
    let scheduler = Scheduler::new(source, &SchedulerConfig::default()).unwrap();

    let err = scheduler.free_slots_on(monday()).unwrap_err();

    assert!(matches!(err, SlotError::UnresolvedInstant(_)), "got {err:?}");
}

#[test]
fn source_errors_propagate() {
    let scheduler = Scheduler::new(Unreachable, &SchedulerConfig::default()).unwrap();

    assert!(matches!(
        scheduler.free_slots_on(monday()),
        Err(SlotError::Source(_))
    ));
}

#[test]
fn scheduler_borrows_a_shared_source() {
    let source = Counting::default();
    let scheduler = Scheduler::new(&source, &SchedulerConfig::default()).unwrap();

    let slots = scheduler.free_slots_on(monday()).unwrap();
    scheduler.events_in(DayRange::Today, utc(10, 0)).unwrap();

    assert_eq!(slots.len(), 1);
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn invalid_timezone_rejected_at_construction() {
    let config = SchedulerConfig {
        timezone: "Atlantis/Capital".to_string(),
        ..SchedulerConfig::default()
    };

    assert!(matches!(
        Scheduler::new(calendar(), &config),
        Err(SlotError::InvalidTimezone(_))
    ));
}

// ── Event listings ──────────────────────────────────────────────────────────

#[test]
fn events_today_sorted_by_start_including_all_day() {
    let scheduler = Scheduler::new(calendar(), &SchedulerConfig::default()).unwrap();

    let events = scheduler.events_in(DayRange::Today, utc(10, 0)).unwrap();

    let summaries: Vec<&str> = events.iter().map(|e| e.summary.as_str()).collect();
    assert_eq!(
        summaries,
        vec!["Team offsite", "Standup", "Lunch", "Dinner"]
    );
}

#[test]
fn events_tomorrow_only_next_day() {
    let scheduler = Scheduler::new(calendar(), &SchedulerConfig::default()).unwrap();

    let events = scheduler.events_in(DayRange::Tomorrow, utc(10, 0)).unwrap();

    let summaries: Vec<&str> = events.iter().map(|e| e.summary.as_str()).collect();
    assert_eq!(summaries, vec!["Next day"]);
}

#[test]
fn events_this_week_start_from_now() {
    let scheduler = Scheduler::new(calendar(), &SchedulerConfig::default()).unwrap();

    let events = scheduler.events_in(DayRange::Week, utc(12, 30)).unwrap();

    // Lunch is still in progress at 12:30; the standup is over.
    let summaries: Vec<&str> = events.iter().map(|e| e.summary.as_str()).collect();
    assert_eq!(
        summaries,
        vec!["Team offsite", "Lunch", "Dinner", "Next day"]
    );
}

#[test]
fn all_day_events_follow_local_days() {
    // 20:00 UTC on March 2 is still March 2 in New York.
    let source = InMemoryCalendar::new(vec![CalendarEvent::all_day(
        "Offsite",
        "2026-03-03",
        "2026-03-04",
    )]);
    let config = SchedulerConfig {
        timezone: "America/New_York".to_string(),
        ..SchedulerConfig::default()
    };
    let scheduler = Scheduler::new(source, &config).unwrap();

    let today = scheduler.events_in(DayRange::Today, utc(20, 0)).unwrap();
    let tomorrow = scheduler.events_in(DayRange::Tomorrow, utc(20, 0)).unwrap();

    assert!(today.is_empty(), "got {today:?}");
    let summaries: Vec<&str> = tomorrow.iter().map(|e| e.summary.as_str()).collect();
    assert_eq!(summaries, vec!["Offsite"]);
}

#[test]
fn all_day_events_east_of_utc_stay_on_their_day() {
    // 23:30 UTC on March 2 is already March 3 in Tokyo.
    let source = InMemoryCalendar::new(vec![
        CalendarEvent::all_day("Holiday", "2026-03-03", "2026-03-04"),
        CalendarEvent::timed("Late call", "2026-03-02T23:45:00Z", "2026-03-03T00:15:00Z"),
        CalendarEvent::timed("Yesterday", "2026-03-02T12:00:00Z", "2026-03-02T13:00:00Z"),
    ]);
    let config = SchedulerConfig {
        timezone: "Asia/Tokyo".to_string(),
        ..SchedulerConfig::default()
    };
    let scheduler = Scheduler::new(source, &config).unwrap();

    let events = scheduler.events_in(DayRange::Today, utc(23, 30)).unwrap();

    let summaries: Vec<&str> = events.iter().map(|e| e.summary.as_str()).collect();
    assert_eq!(summaries, vec!["Holiday", "Late call"]);
}
