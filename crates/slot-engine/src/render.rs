//! Presentation: human-readable text and JSON tool payloads.
//!
//! This is the only place errors turn into text. Payloads are what an LLM tool
//! call returns: a JSON array on success, `{"message": ...}` when there is
//! nothing to report, `{"error": ...}` on failure.

use crate::email::{EmailMessage, MailQuery};
use crate::error::{Result, SlotError};
use crate::event::CalendarEvent;
use crate::freebusy::FreeSlot;
use crate::workday::DayRange;
use chrono_tz::Tz;
use serde::Serialize;
use serde_json::json;

/// `"Free from 14:00 to 15:30 (90 min)"`, with times shown in `tz`.
pub fn describe_slot(slot: &FreeSlot, tz: &Tz) -> String {
    format!(
        "Free from {} to {} ({} min)",
        slot.start.with_timezone(tz).format("%H:%M"),
        slot.end.with_timezone(tz).format("%H:%M"),
        slot.duration_minutes
    )
}

/// One line per slot, or a note that nothing was found.
pub fn describe_free_slots(slots: &[FreeSlot], tz: &Tz) -> String {
    if slots.is_empty() {
        return "No free slots found".to_string();
    }
    slots
        .iter()
        .map(|slot| describe_slot(slot, tz))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Display label for when an event starts.
///
/// Day ranges show the clock time (`02:00 PM`); the week range adds the day
/// (`Tue Mar 03, 02:00 PM`). All-day events show `All day`, or
/// `2026-03-03 (All day)` in the week range.
pub fn event_time_label(event: &CalendarEvent, range: DayRange, tz: &Tz) -> String {
    if event.is_all_day() {
        let date = event.start.date.as_deref().unwrap_or_default();
        return match range {
            DayRange::Week => format!("{} (All day)", date),
            DayRange::Today | DayRange::Tomorrow => "All day".to_string(),
        };
    }
    let pattern = match range {
        DayRange::Week => "%a %b %d, %I:%M %p",
        DayRange::Today | DayRange::Tomorrow => "%I:%M %p",
    };
    match event.start.resolve() {
        Ok(start) => start.with_timezone(tz).format(pattern).to_string(),
        Err(_) => event.start.date_time.clone().unwrap_or_default(),
    }
}

#[derive(Serialize)]
struct EventEntry<'a> {
    summary: &'a str,
    time: String,
    location: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attendees: Vec<&'a str>,
}

#[derive(Serialize)]
struct EmailEntry<'a> {
    from: &'a str,
    subject: &'a str,
    date: &'a str,
    snippet: &'a str,
}

#[derive(Serialize)]
struct SlotEntry {
    start: String,
    end: String,
    duration_minutes: i64,
}

/// JSON payload for an event listing.
pub fn events_payload(range: DayRange, result: &Result<Vec<CalendarEvent>>, tz: &Tz) -> String {
    let events = match result {
        Ok(events) => events,
        Err(err) => return error_payload(err),
    };
    if events.is_empty() {
        return to_pretty(&json!({
            "message": format!("No events scheduled for {}", range.label())
        }));
    }
    let entries: Vec<EventEntry<'_>> = events
        .iter()
        .map(|event| EventEntry {
            summary: &event.summary,
            time: event_time_label(event, range, tz),
            location: &event.location,
            description: (range == DayRange::Today).then_some(event.description.as_str()),
            attendees: event.attendee_emails(),
        })
        .collect();
    to_pretty(&entries)
}

/// JSON payload for free slots, with RFC 3339 bounds in `tz`.
pub fn free_slots_payload(result: &Result<Vec<FreeSlot>>, tz: &Tz) -> String {
    let slots = match result {
        Ok(slots) => slots,
        Err(err) => return error_payload(err),
    };
    let entries: Vec<SlotEntry> = slots
        .iter()
        .map(|slot| SlotEntry {
            start: slot.start.with_timezone(tz).to_rfc3339(),
            end: slot.end.with_timezone(tz).to_rfc3339(),
            duration_minutes: slot.duration_minutes,
        })
        .collect();
    to_pretty(&entries)
}

/// JSON payload for an inbox search.
pub fn emails_payload(query: &MailQuery, result: &Result<Vec<EmailMessage>>) -> String {
    let messages = match result {
        Ok(messages) => messages,
        Err(err) => return error_payload(err),
    };
    if messages.is_empty() {
        let message = if query.is_unread_only() {
            "No unread emails".to_string()
        } else {
            format!("No emails found for '{}'", query)
        };
        return to_pretty(&json!({ "message": message }));
    }
    let entries: Vec<EmailEntry<'_>> = messages
        .iter()
        .map(|m| EmailEntry {
            from: &m.from,
            subject: &m.subject,
            date: &m.date,
            snippet: &m.snippet,
        })
        .collect();
    to_pretty(&entries)
}

/// `{"error": "<message>"}`.
pub fn error_payload(err: &SlotError) -> String {
    to_pretty(&json!({ "error": err.to_string() }))
}

fn to_pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize payload: {}\"}}", e))
}
