//! Exam timetable search.
//!
//! Turns courses, classrooms and a calendar into a scored timetable.
//!
//! # Pipeline
//!
//! 1. [`TimeSlotGenerator`] enumerates candidate slots.
//! 2. [`ExamAssignmentBuilder`] maps every course to a slot and classrooms
//!    using one seeded random order.
//! 3. [`ScheduleScorer`] folds soft-constraint violations into a scalar
//!    (lower is better).
//! 4. [`AttemptManager`] repeats 2–3 with successive seeds and keeps the best.
//!
//! # References
//!
//! - Welsh & Powell (1967), "An upper bound for the chromatic number of a graph"
//! - Carter, Laporte & Lee (1996), "Examination timetabling: Algorithmic
//!   strategies and applications"

mod attempts;
mod builder;
mod score;
pub mod time_slots;

use std::collections::{HashMap, HashSet};

pub use attempts::{AttemptManager, SearchReport};
pub use builder::{ExamAssignmentBuilder, PlanningInput};
pub use score::{ScheduleScorer, ScoreResult};
pub use time_slots::{ensure_capacity, DayTemplate, TimeSlotGenerator};

use crate::models::Student;

/// Course ID → IDs of the students enrolled in it.
pub type EnrollmentIndex = HashMap<String, HashSet<String>>;

/// Records the students of one course in an enrollment index.
pub fn index_enrollments(index: &mut EnrollmentIndex, course_id: &str, students: &[Student]) {
    index
        .entry(course_id.to_string())
        .or_default()
        .extend(students.iter().map(|s| s.id.clone()));
}
