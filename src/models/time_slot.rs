//! Time slot model.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// A concrete date and start time at which an exam may be held.
///
/// Identity is `(date, start)`: two slots with the same date and start
/// are equal even if their nominal durations differ.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Exam date.
    pub date: NaiveDate,
    /// Start time of day.
    pub start: NaiveTime,
    /// Nominal length (minutes) used for slot spacing.
    pub duration_minutes: u32,
}

impl TimeSlot {
    /// Creates a slot.
    pub fn new(date: NaiveDate, start: NaiveTime, duration_minutes: u32) -> Self {
        Self {
            date,
            start,
            duration_minutes,
        }
    }

    /// Start as a date-time.
    #[inline]
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start)
    }

    /// End of an exam of `minutes` starting in this slot.
    #[inline]
    pub fn ends_at(&self, minutes: u32) -> NaiveDateTime {
        self.starts_at() + Duration::minutes(minutes.into())
    }
}

impl PartialEq for TimeSlot {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date && self.start == other.start
    }
}

impl Eq for TimeSlot {}

impl Hash for TimeSlot {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.date.hash(state);
        self.start.hash(state);
    }
}

impl PartialOrd for TimeSlot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeSlot {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.date, self.start).cmp(&(other.date, other.start))
    }
}

/// Whether `[a_start, a_end)` and `[b_start, b_end)` intersect.
#[inline]
pub fn intervals_overlap(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    a_start < b_end && b_start < a_end
}
