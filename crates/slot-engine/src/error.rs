//! Error types for slot-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Invalid window: start {start} is not before end {end}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Unresolved instant: {0}")]
    UnresolvedInstant(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Calendar source error: {0}")]
    Source(String),

    #[error("Mail source error: {0}")]
    Mail(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SlotError>;
