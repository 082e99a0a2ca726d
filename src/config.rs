//! Planning configuration.
//!
//! [`PlanningParams`] is what a host passes to
//! [`ExamPlanner::plan_exam_schedule`](crate::planner::ExamPlanner::plan_exam_schedule).
//! Every field has a default, so a host can deserialize a sparse JSON
//! document and only state what differs.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::PlanningError;
use crate::models::{DailyWindow, ExamCalendar};

/// How the builder picks among classrooms large enough for a course.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomSelection {
    /// Rotate through the fitting rooms, starting at a random offset per attempt.
    #[default]
    RoundRobin,
    /// Always take the smallest fitting room.
    BestFit,
}

/// Weights of the schedule score components.
///
/// The total is `conflict·conflicts + load·variance + overflow·overflow
/// + waste·wasted − utilization·avg_utilization`; lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Per (student, slot) conflict.
    pub conflict: f64,
    /// Per unit of daily exam-count variance.
    pub load_balance: f64,
    /// Per student beyond room capacity.
    pub overflow: f64,
    /// Per unused seat.
    pub waste: f64,
    /// Bonus for average utilization in `[0, 1]`.
    pub utilization: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            conflict: 1000.0,
            load_balance: 10.0,
            overflow: 100.0,
            waste: 0.1,
            utilization: 50.0,
        }
    }
}

/// Parameters of one exam scheduling run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningParams {
    /// Department whose courses are scheduled.
    pub department_id: String,
    /// Exam type label copied into every assignment.
    pub exam_type: String,
    /// First exam date (inclusive).
    pub start_date: NaiveDate,
    /// Last exam date (inclusive).
    pub end_date: NaiveDate,
    /// Weekdays on which exams may be held.
    pub allowed_weekdays: Vec<Weekday>,
    /// Dates excluded regardless of weekday.
    pub blocked_dates: Vec<NaiveDate>,
    /// Maximum slots used per day.
    pub exams_per_day: u32,
    /// Exam length when no override exists (minutes).
    pub default_duration_minutes: u32,
    /// Gap between consecutive slots (minutes).
    pub break_minutes: u32,
    /// Exam length per course ID (minutes).
    pub duration_overrides: HashMap<String, u32>,
    /// Earliest exam start of the day.
    pub first_exam_time: NaiveTime,
    /// Latest exam start of the day.
    pub last_exam_time: NaiveTime,
    /// Lunch break start.
    pub lunch_start: NaiveTime,
    /// Lunch break end.
    pub lunch_end: NaiveTime,
    /// Explicit daily start times; derived from the daily window when empty.
    pub daily_start_times: Vec<NaiveTime>,
    /// At most one exam at any moment when true.
    pub no_parallel_exams: bool,
    /// Maximum exams per day (parallel mode counts every exam).
    pub daily_exam_limit: Option<u32>,
    /// Restrict the run to these course IDs.
    pub selected_course_ids: Option<Vec<String>>,
    /// Maximum randomized attempts.
    pub max_attempts: u32,
    /// Base seed; drawn at random when absent.
    pub seed: Option<u64>,
    /// Classroom choice among fitting rooms.
    pub room_selection: RoomSelection,
    /// Combine several rooms when no single room fits a course.
    pub split_across_rooms: bool,
    /// Score weights.
    pub weights: ScoreWeights,
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

impl Default for PlanningParams {
    fn default() -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            department_id: String::new(),
            exam_type: "Final".to_string(),
            start_date: today,
            end_date: today + chrono::Days::new(13),
            allowed_weekdays: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            blocked_dates: Vec::new(),
            exams_per_day: 3,
            default_duration_minutes: 75,
            break_minutes: 15,
            duration_overrides: HashMap::new(),
            first_exam_time: hm(10, 0),
            last_exam_time: hm(19, 15),
            lunch_start: hm(12, 0),
            lunch_end: hm(13, 30),
            daily_start_times: Vec::new(),
            no_parallel_exams: true,
            daily_exam_limit: None,
            selected_course_ids: None,
            max_attempts: 50,
            seed: None,
            room_selection: RoomSelection::default(),
            split_across_rooms: false,
            weights: ScoreWeights::default(),
        }
    }
}

impl PlanningParams {
    /// Creates parameters for a department over a date range.
    pub fn new(department_id: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            department_id: department_id.into(),
            start_date,
            end_date,
            ..Self::default()
        }
    }

    /// Sets the exam type label.
    pub fn with_exam_type(mut self, exam_type: impl Into<String>) -> Self {
        self.exam_type = exam_type.into();
        self
    }

    /// Sets the slots used per day.
    pub fn with_exams_per_day(mut self, n: u32) -> Self {
        self.exams_per_day = n;
        self
    }

    /// Sets explicit daily start times.
    pub fn with_daily_start_times(mut self, times: Vec<NaiveTime>) -> Self {
        self.daily_start_times = times;
        self
    }

    /// Sets the allowed weekdays.
    pub fn with_weekdays(mut self, weekdays: Vec<Weekday>) -> Self {
        self.allowed_weekdays = weekdays;
        self
    }

    /// Overrides one course's exam length.
    pub fn with_duration_override(mut self, course_id: impl Into<String>, minutes: u32) -> Self {
        self.duration_overrides.insert(course_id.into(), minutes);
        self
    }

    /// Enables or disables parallel exams.
    pub fn with_parallel_exams(mut self, allowed: bool) -> Self {
        self.no_parallel_exams = !allowed;
        self
    }

    /// Sets the daily exam limit.
    pub fn with_daily_exam_limit(mut self, limit: u32) -> Self {
        self.daily_exam_limit = Some(limit);
        self
    }

    /// Sets the attempt budget.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Fixes the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the room selection policy.
    pub fn with_room_selection(mut self, selection: RoomSelection) -> Self {
        self.room_selection = selection;
        self
    }

    /// Enables splitting large exams over several rooms.
    pub fn with_room_splitting(mut self, enabled: bool) -> Self {
        self.split_across_rooms = enabled;
        self
    }

    /// Restricts the run to the given courses.
    pub fn with_selected_courses(mut self, course_ids: Vec<String>) -> Self {
        self.selected_course_ids = Some(course_ids);
        self
    }

    /// Exam length for a course.
    pub fn duration_for(&self, course_id: &str) -> u32 {
        self.duration_overrides
            .get(course_id)
            .copied()
            .unwrap_or(self.default_duration_minutes)
    }

    /// Calendar of eligible exam days.
    pub fn calendar(&self) -> ExamCalendar {
        ExamCalendar {
            start_date: self.start_date,
            end_date: self.end_date,
            allowed_weekdays: self.allowed_weekdays.clone(),
            blocked_dates: self.blocked_dates.clone(),
        }
    }

    /// Lunch break window.
    pub fn lunch_window(&self) -> DailyWindow {
        DailyWindow::new(self.lunch_start, self.lunch_end)
    }

    /// Checks internal consistency.
    ///
    /// # Errors
    /// [`PlanningError::InvalidParams`] naming the first inconsistent field.
    pub fn validate(&self) -> Result<(), PlanningError> {
        let invalid = |msg: &str| Err(PlanningError::InvalidParams(msg.to_string()));

        if self.department_id.is_empty() {
            return invalid("department_id is empty");
        }
        if self.end_date < self.start_date {
            return invalid("end_date is before start_date");
        }
        if self.allowed_weekdays.is_empty() {
            return invalid("allowed_weekdays is empty");
        }
        if self.exams_per_day == 0 {
            return invalid("exams_per_day must be at least 1");
        }
        if self.default_duration_minutes == 0 {
            return invalid("default_duration_minutes must be positive");
        }
        if self.duration_overrides.values().any(|&m| m == 0) {
            return invalid("duration_overrides contains a zero duration");
        }
        if self.last_exam_time < self.first_exam_time {
            return invalid("last_exam_time is before first_exam_time");
        }
        if self.lunch_end < self.lunch_start {
            return invalid("lunch_end is before lunch_start");
        }
        if self.daily_exam_limit == Some(0) {
            return invalid("daily_exam_limit must be at least 1");
        }
        if self.max_attempts == 0 {
            return invalid("max_attempts must be at least 1");
        }
        Ok(())
    }
}
