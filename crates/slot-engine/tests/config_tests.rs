//! Tests for scheduler configuration loading.

use chrono::NaiveTime;
use slot_engine::config::{parse_clock_time, SchedulerConfig};
use slot_engine::freebusy::SlotPolicy;
use slot_engine::SlotError;

#[test]
fn defaults_match_the_standard_work_day() {
    let config = SchedulerConfig::default();

    assert_eq!(config.timezone, "UTC");
    assert_eq!(config.work_start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    assert_eq!(config.work_end, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
    assert_eq!(config.policy(), SlotPolicy::default());
    assert_eq!(config.policy().min_duration_minutes, 30);
}

#[test]
fn partial_json_keeps_remaining_defaults() {
    let config = SchedulerConfig::from_json(
        r#"{"timezone": "Europe/Berlin", "work_start": "08:30", "min_duration_minutes": 45}"#,
    )
    .unwrap();

    assert_eq!(config.timezone, "Europe/Berlin");
    assert_eq!(config.work_start, NaiveTime::from_hms_opt(8, 30, 0).unwrap());
    assert_eq!(config.work_end, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
    assert_eq!(config.min_duration_minutes, 45);
    assert!(!config.include_zero_length);
    assert!(config.tz().is_ok());
}

#[test]
fn config_serializes_clock_times_as_hh_mm() {
    let json = serde_json::to_value(SchedulerConfig::default()).unwrap();

    assert_eq!(json["work_start"], "09:00");
    assert_eq!(json["work_end"], "18:00");
}

#[test]
fn bad_clock_time_is_a_json_error() {
    let err = SchedulerConfig::from_json(r#"{"work_end": "six pm"}"#).unwrap_err();
    assert!(matches!(err, SlotError::Json(_)), "got {err:?}");
}

#[test]
fn clock_time_accepts_optional_seconds() {
    assert_eq!(
        parse_clock_time("17:45"),
        NaiveTime::from_hms_opt(17, 45, 0)
    );
    assert_eq!(
        parse_clock_time("07:05:30"),
        NaiveTime::from_hms_opt(7, 5, 30)
    );
    assert_eq!(parse_clock_time("25:00"), None);
}
