//! Exam calendar and daily time windows.
//!
//! [`ExamCalendar`] decides which dates may host exams; [`DailyWindow`]
//! models time-of-day intervals such as the lunch break.
//!
//! # Precedence
//! Blocked dates override weekdays. A date is an exam day iff:
//! - It lies within `[start_date, end_date]` (inclusive), AND
//! - Its weekday is in `allowed_weekdays`, AND
//! - It is NOT listed in `blocked_dates`.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// A time-of-day interval [start, end).
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyWindow {
    /// Interval start (inclusive).
    pub start: NaiveTime,
    /// Interval end (exclusive).
    pub end: NaiveTime,
}

impl DailyWindow {
    /// Creates a new window.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Length of the window in minutes (0 if inverted).
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes().max(0)
    }

    /// Whether a time falls within this window.
    #[inline]
    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time < self.end
    }

    /// Whether `[start, start + minutes)` intersects this window.
    pub fn overlaps(&self, start: NaiveTime, minutes: u32) -> bool {
        let (end, wrapped) = start.overflowing_add_signed(chrono::Duration::minutes(minutes.into()));
        // An interval running past midnight covers the rest of the day.
        let end_in_day = wrapped != 0;
        start < self.end && (end_in_day || self.start < end)
    }
}

/// Dates on which exams may be held.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamCalendar {
    /// First exam date (inclusive).
    pub start_date: NaiveDate,
    /// Last exam date (inclusive).
    pub end_date: NaiveDate,
    /// Weekdays on which exams may take place.
    pub allowed_weekdays: Vec<Weekday>,
    /// Dates excluded regardless of weekday (holidays).
    pub blocked_dates: Vec<NaiveDate>,
}

impl ExamCalendar {
    /// Creates a Monday–Friday calendar over the given range.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            allowed_weekdays: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            blocked_dates: Vec::new(),
        }
    }

    /// Replaces the allowed weekdays.
    pub fn with_weekdays(mut self, weekdays: Vec<Weekday>) -> Self {
        self.allowed_weekdays = weekdays;
        self
    }

    /// Adds a blocked date.
    pub fn with_blocked(mut self, date: NaiveDate) -> Self {
        self.blocked_dates.push(date);
        self
    }

    /// Whether exams may be held on `date`.
    pub fn is_exam_day(&self, date: NaiveDate) -> bool {
        if date < self.start_date || date > self.end_date {
            return false;
        }
        if self.blocked_dates.contains(&date) {
            return false;
        }
        self.allowed_weekdays.contains(&date.weekday())
    }

    /// All exam days in ascending order.
    pub fn exam_days(&self) -> Vec<NaiveDate> {
        self.start_date
            .iter_days()
            .take_while(|d| *d <= self.end_date)
            .filter(|d| self.is_exam_day(*d))
            .collect()
    }
}
