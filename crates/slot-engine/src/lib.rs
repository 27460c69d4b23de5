//! # slot-engine
//!
//! Deterministic free-slot computation for AI calendar assistants.
//!
//! Answering "when am I free?" means finding gaps between events inside a work
//! day. An LLM cannot do that reliably by inference, so the assistant hands the
//! events to this crate and narrates the result. The same assistant also reads
//! the inbox, so unread mail and search results are shaped here too.
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use slot_engine::{find_free_slots, BusyInterval, SlotPolicy, Window};
//!
//! let at = |h| Utc.with_ymd_and_hms(2026, 3, 2, h, 0, 0).unwrap();
//! let window = Window::new(at(9), at(18)).unwrap();
//! let busy = [BusyInterval::new(at(10), at(11))];
//!
//! let slots = find_free_slots(&busy, &window, &SlotPolicy::default());
//! assert_eq!(slots.len(), 2);
//! assert_eq!(slots[1].duration_minutes, 420);
//! ```
//!
//! ## Modules
//!
//! - [`freebusy`] - Free slots from busy intervals (the core sweep)
//! - [`interval`] - `BusyInterval`, `Window`, timestamp parsing
//! - [`event`] - Provider-shaped calendar event records
//! - [`email`] - Inbox messages and search queries
//! - [`workday`] - Work-hour windows and named day ranges in a timezone
//! - [`source`] - `CalendarSource` and `MailSource` traits with in-memory impls
//! - [`scheduler`] - Queries over an injected calendar source
//! - [`render`] - Text and JSON payloads for the presentation layer
//! - [`config`] - Scheduler configuration
//! - [`error`] - Error types

pub mod config;
pub mod email;
pub mod error;
pub mod event;
pub mod freebusy;
pub mod interval;
pub mod render;
pub mod scheduler;
pub mod source;
pub mod workday;

pub use config::SchedulerConfig;
pub use email::{parse_messages_json, EmailMessage, MailQuery};
pub use error::SlotError;
pub use event::{busy_intervals, parse_events_json, CalendarEvent, EventTime};
pub use freebusy::{find_first_free_slot, find_free_slots, FreeSlot, SlotPolicy};
pub use interval::{parse_instant, BusyInterval, Window};
pub use scheduler::Scheduler;
pub use source::{CalendarSource, InMemoryCalendar, InMemoryMailbox, MailSource};
pub use workday::{parse_timezone, DayRange, WorkHours};
