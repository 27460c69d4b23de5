//! Compute free time slots from busy intervals.
//!
//! Clips busy intervals to the search window, sorts them by start time, then
//! sweeps a monotonic cursor across them. Overlapping intervals are not merged
//! up front: the cursor only ever moves forward, so a nested or overlapping
//! interval can never open a gap inside an earlier one.

use crate::interval::{BusyInterval, Window};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Minimum slot length applied when the caller does not override it.
pub const DEFAULT_MIN_DURATION_MINUTES: u32 = 30;

/// A free time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Whole minutes between `start` and `end`, truncated.
    pub duration_minutes: i64,
}

/// Which gaps count as free slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotPolicy {
    /// Gaps shorter than this many minutes are dropped.
    pub min_duration_minutes: u32,
    /// Emit zero-length gaps (e.g. between back-to-back events). Only takes
    /// effect when `min_duration_minutes` is 0.
    pub include_zero_length: bool,
}

impl Default for SlotPolicy {
    fn default() -> Self {
        Self {
            min_duration_minutes: DEFAULT_MIN_DURATION_MINUTES,
            include_zero_length: false,
        }
    }
}

impl SlotPolicy {
    pub fn with_min_duration(min_duration_minutes: u32) -> Self {
        Self {
            min_duration_minutes,
            ..Self::default()
        }
    }

    fn accepts(&self, gap: Duration) -> bool {
        if gap < Duration::minutes(i64::from(self.min_duration_minutes)) {
            return false;
        }
        gap > Duration::zero() || self.include_zero_length
    }
}

/// Clip busy intervals to the window and sort them by (start, end).
///
/// Intervals that do not reach into the window are dropped. Overlaps are kept.
fn clip_and_sort(busy: &[BusyInterval], window: &Window) -> Vec<BusyInterval> {
    let mut intervals: Vec<BusyInterval> = busy.iter().filter_map(|b| window.clip(b)).collect();
    intervals.sort_by_key(|b| (b.start, b.end));
    intervals
}

/// Find free time slots within `window`, given a list of busy intervals.
///
/// Intervals may be unsorted, overlapping, reversed, or lie partly or wholly
/// outside the window. Returns slots sorted by start time, each contained in
/// the window and at least `policy.min_duration_minutes` long.
pub fn find_free_slots(
    busy: &[BusyInterval],
    window: &Window,
    policy: &SlotPolicy,
) -> Vec<FreeSlot> {
    let intervals = clip_and_sort(busy, window);

    let mut free_slots: Vec<FreeSlot> = Vec::new();
    let mut cursor = window.start();

    for interval in &intervals {
        push_gap(&mut free_slots, cursor, interval.start, policy);
        cursor = cursor.max(interval.end);
    }

    // Trailing gap after the last busy interval.
    push_gap(&mut free_slots, cursor, window.end(), policy);

    debug!(
        busy = busy.len(),
        in_window = intervals.len(),
        free = free_slots.len(),
        min_duration_minutes = policy.min_duration_minutes,
        "computed free slots"
    );

    free_slots
}

fn push_gap(
    slots: &mut Vec<FreeSlot>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    policy: &SlotPolicy,
) {
    let gap = to - from;
    if !policy.accepts(gap) {
        return;
    }
    // Slot starts must stay strictly increasing. A zero-length gap never
    // repeats a start, and a real gap replaces a zero-length slot at its start.
    if let Some(last) = slots.last() {
        if last.start >= from {
            if gap.is_zero() {
                return;
            }
            if last.start == last.end {
                slots.pop();
            }
        }
    }
    slots.push(FreeSlot {
        start: from,
        end: to,
        duration_minutes: gap.num_minutes(),
    });
}

/// Find the first free slot within the window that satisfies `policy`.
///
/// Delegates to [`find_free_slots`] and returns its earliest slot.
pub fn find_first_free_slot(
    busy: &[BusyInterval],
    window: &Window,
    policy: &SlotPolicy,
) -> Option<FreeSlot> {
    find_free_slots(busy, window, policy).into_iter().next()
}
