//! Scheduler configuration.
//!
//! Every field has a default, so a config file only needs the keys it changes:
//!
//! ```json
//! { "timezone": "Europe/Berlin", "work_start": "08:30", "min_duration_minutes": 45 }
//! ```

use crate::error::Result;
use crate::freebusy::{SlotPolicy, DEFAULT_MIN_DURATION_MINUTES};
use crate::workday::{parse_timezone, WorkHours};
use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// IANA timezone that work hours and day ranges are observed in.
    pub timezone: String,
    #[serde(with = "clock")]
    pub work_start: NaiveTime,
    #[serde(with = "clock")]
    pub work_end: NaiveTime,
    pub min_duration_minutes: u32,
    pub include_zero_length: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        let hours = WorkHours::default();
        Self {
            timezone: "UTC".to_string(),
            work_start: hours.start,
            work_end: hours.end,
            min_duration_minutes: DEFAULT_MIN_DURATION_MINUTES,
            include_zero_length: false,
        }
    }
}

impl SchedulerConfig {
    /// Load a config from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn tz(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }

    pub fn work_hours(&self) -> WorkHours {
        WorkHours::new(self.work_start, self.work_end)
    }

    pub fn policy(&self) -> SlotPolicy {
        SlotPolicy {
            min_duration_minutes: self.min_duration_minutes,
            include_zero_length: self.include_zero_length,
        }
    }
}

/// Parse a wall-clock time written as `HH:MM` or `HH:MM:SS`.
pub fn parse_clock_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

/// Serde adapter for `HH:MM` wall-clock times.
mod clock {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_clock_time(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid time '{}', expected HH:MM", raw)))
    }
}
