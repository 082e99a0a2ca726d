//! Time slot generation.
//!
//! # Algorithm
//!
//! 1. Enumerate exam days from the [`ExamCalendar`] (date range, weekdays,
//!    blocked dates).
//! 2. For each day, emit one slot per daily start time, up to the per-day cap.
//!
//! Daily start times are either given explicitly or derived from the daily
//! window by [`DayTemplate::from_window`]: starting at the first exam time,
//! each slot advances by `duration + break`, hopping over the lunch break,
//! until the last allowed start time.

use chrono::{Duration, NaiveTime};
use std::collections::BTreeSet;

use crate::config::PlanningParams;
use crate::error::PlanningError;
use crate::models::{DailyWindow, ExamCalendar, TimeSlot};

/// Ordered start times used on every exam day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayTemplate {
    /// Start times, ascending and de-duplicated.
    pub start_times: Vec<NaiveTime>,
}

impl DayTemplate {
    /// Creates a template from explicit start times.
    pub fn new(mut start_times: Vec<NaiveTime>) -> Self {
        start_times.sort();
        start_times.dedup();
        Self { start_times }
    }

    /// Derives start times from a daily window.
    ///
    /// * `first` / `last` - earliest and latest allowed start.
    /// * `duration_minutes` - nominal exam length.
    /// * `break_minutes` - gap after each exam.
    /// * `lunch` - no exam may start in, or run into, this window.
    ///
    /// A start whose nominal exam would cross into lunch moves to the end of
    /// lunch, not only a start that falls inside it. With lunch 12:00-13:30
    /// and 75-minute exams, an 11:30 start becomes 13:30. An exam ending
    /// exactly when lunch begins keeps its start.
    pub fn from_window(
        first: NaiveTime,
        last: NaiveTime,
        duration_minutes: u32,
        break_minutes: u32,
        lunch: Option<DailyWindow>,
    ) -> Self {
        let step = Duration::minutes(i64::from(duration_minutes + break_minutes).max(1));
        let mut start_times = Vec::new();
        let mut current = first;

        loop {
            if let Some(lunch) = lunch {
                if lunch.duration_minutes() > 0 && lunch.overlaps(current, duration_minutes) {
                    current = current.max(lunch.end);
                }
            }
            if current > last {
                break;
            }
            start_times.push(current);

            let (next, wrapped) = current.overflowing_add_signed(step);
            if wrapped != 0 || next <= current {
                break;
            }
            current = next;
        }

        Self { start_times }
    }

    /// Template implied by the planning parameters.
    pub fn from_params(params: &PlanningParams) -> Self {
        if params.daily_start_times.is_empty() {
            Self::from_window(
                params.first_exam_time,
                params.last_exam_time,
                params.default_duration_minutes,
                params.break_minutes,
                Some(params.lunch_window()),
            )
        } else {
            Self::new(params.daily_start_times.clone())
        }
    }
}

/// Enumerates candidate exam slots.
#[derive(Debug, Clone)]
pub struct TimeSlotGenerator {
    calendar: ExamCalendar,
    template: DayTemplate,
    slot_minutes: u32,
    slots_per_day: usize,
}

impl TimeSlotGenerator {
    /// Creates a generator.
    pub fn new(calendar: ExamCalendar, template: DayTemplate, slot_minutes: u32) -> Self {
        let slots_per_day = template.start_times.len();
        Self {
            calendar,
            template,
            slot_minutes,
            slots_per_day,
        }
    }

    /// Builds the generator described by the planning parameters.
    ///
    /// The per-day cap is `exams_per_day`, further limited by
    /// `daily_exam_limit` when only one exam may run at a time.
    pub fn from_params(params: &PlanningParams) -> Self {
        let mut cap = params.exams_per_day;
        if params.no_parallel_exams {
            if let Some(limit) = params.daily_exam_limit {
                cap = cap.min(limit);
            }
        }
        Self::new(
            params.calendar(),
            DayTemplate::from_params(params),
            params.default_duration_minutes,
        )
        .with_slots_per_day(cap as usize)
    }

    /// Caps the slots used per day.
    pub fn with_slots_per_day(mut self, cap: usize) -> Self {
        self.slots_per_day = cap;
        self
    }

    /// Generates slots in chronological order.
    pub fn generate(&self) -> Vec<TimeSlot> {
        let mut seen = BTreeSet::new();
        for day in self.calendar.exam_days() {
            for &start in self.template.start_times.iter().take(self.slots_per_day) {
                seen.insert(TimeSlot::new(day, start, self.slot_minutes));
            }
        }
        seen.into_iter().collect()
    }
}

/// Fails when there are fewer slots than courses.
///
/// # Errors
/// [`PlanningError::InsufficientSlots`] with both counts.
pub fn ensure_capacity(slots: &[TimeSlot], course_count: usize) -> Result<(), PlanningError> {
    if slots.len() < course_count {
        return Err(PlanningError::InsufficientSlots {
            available: slots.len(),
            required: course_count,
        });
    }
    Ok(())
}
