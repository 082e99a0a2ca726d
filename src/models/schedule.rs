//! Exam schedule (solution) model.
//!
//! A candidate schedule binds every course to one time slot and a
//! non-empty set of classrooms. Classroom double booking is excluded by
//! construction; student conflicts and capacity overflow are allowed
//! and left to the scorer.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::TimeSlot;

/// One course's exam: when, where and for how many students.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamAssignment {
    /// Examined course ID.
    pub course_id: String,
    /// Course code (denormalized for display).
    pub course_code: String,
    /// Course name (denormalized for display).
    pub course_name: String,
    /// Lecturer in charge of the course, if known.
    pub instructor: Option<String>,
    /// Exam type label (e.g., "Midterm", "Final").
    pub exam_type: String,
    /// Time slot the exam starts in.
    pub slot: TimeSlot,
    /// Exam length in minutes (may exceed the slot's nominal length).
    pub duration_minutes: u32,
    /// Assigned classroom IDs, never empty.
    pub classroom_ids: Vec<String>,
    /// Enrolled students.
    pub enrolled: u32,
    /// Sum of the assigned classrooms' capacities.
    pub assigned_capacity: u32,
}

impl ExamAssignment {
    /// Creates an assignment in a single classroom.
    pub fn new(
        course_id: impl Into<String>,
        slot: TimeSlot,
        classroom_id: impl Into<String>,
        enrolled: u32,
        assigned_capacity: u32,
    ) -> Self {
        Self {
            course_id: course_id.into(),
            course_code: String::new(),
            course_name: String::new(),
            instructor: None,
            exam_type: String::new(),
            duration_minutes: slot.duration_minutes,
            slot,
            classroom_ids: vec![classroom_id.into()],
            enrolled,
            assigned_capacity,
        }
    }

    /// Sets the display code and name.
    pub fn with_course_labels(mut self, code: impl Into<String>, name: impl Into<String>) -> Self {
        self.course_code = code.into();
        self.course_name = name.into();
        self
    }

    /// Sets the lecturer in charge.
    pub fn with_instructor(mut self, instructor: Option<String>) -> Self {
        self.instructor = instructor;
        self
    }

    /// Sets the exam type label.
    pub fn with_exam_type(mut self, exam_type: impl Into<String>) -> Self {
        self.exam_type = exam_type.into();
        self
    }

    /// Sets the exam duration.
    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    /// Replaces the classroom set.
    pub fn with_classrooms(mut self, classroom_ids: Vec<String>) -> Self {
        self.classroom_ids = classroom_ids;
        self
    }

    /// Exam start.
    #[inline]
    pub fn starts_at(&self) -> NaiveDateTime {
        self.slot.starts_at()
    }

    /// Exam end.
    #[inline]
    pub fn ends_at(&self) -> NaiveDateTime {
        self.slot.ends_at(self.duration_minutes)
    }

    /// Students beyond the assigned capacity.
    #[inline]
    pub fn overflow(&self) -> u32 {
        self.enrolled.saturating_sub(self.assigned_capacity)
    }

    /// Seats assigned but not needed.
    #[inline]
    pub fn wasted_capacity(&self) -> u32 {
        self.assigned_capacity.saturating_sub(self.enrolled)
    }

    /// Whether the exam uses the classroom.
    pub fn uses_classroom(&self, classroom_id: &str) -> bool {
        self.classroom_ids.iter().any(|c| c == classroom_id)
    }
}

/// A complete proposal mapping every course to a slot and classrooms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateSchedule {
    /// Exam assignments in placement order.
    pub assignments: Vec<ExamAssignment>,
    /// Every day the slot set offered, used ones or not.
    pub exam_days: Vec<NaiveDate>,
    /// Seed of the attempt that produced this schedule.
    pub seed: u64,
}

impl CandidateSchedule {
    /// Creates an empty schedule spanning the given exam days.
    pub fn new(exam_days: Vec<NaiveDate>, seed: u64) -> Self {
        Self {
            assignments: Vec::new(),
            exam_days,
            seed,
        }
    }

    /// Adds an assignment.
    pub fn add_assignment(&mut self, assignment: ExamAssignment) {
        self.assignments.push(assignment);
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the schedule has no assignments.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Finds the assignment for a course.
    pub fn assignment_for_course(&self, course_id: &str) -> Option<&ExamAssignment> {
        self.assignments.iter().find(|a| a.course_id == course_id)
    }

    /// All assignments starting in a slot.
    pub fn assignments_in_slot(&self, slot: &TimeSlot) -> Vec<&ExamAssignment> {
        self.assignments.iter().filter(|a| &a.slot == slot).collect()
    }

    /// All assignments using a classroom.
    pub fn assignments_for_classroom(&self, classroom_id: &str) -> Vec<&ExamAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.uses_classroom(classroom_id))
            .collect()
    }

    /// Exam count per exam day, including days without exams.
    pub fn exams_per_day(&self) -> BTreeMap<NaiveDate, usize> {
        let mut counts: BTreeMap<NaiveDate, usize> =
            self.exam_days.iter().map(|d| (*d, 0)).collect();
        for a in &self.assignments {
            *counts.entry(a.slot.date).or_insert(0) += 1;
        }
        counts
    }

    /// Assignments grouped by slot, in slot order.
    pub fn by_slot(&self) -> BTreeMap<TimeSlot, Vec<&ExamAssignment>> {
        let mut groups: BTreeMap<TimeSlot, Vec<&ExamAssignment>> = BTreeMap::new();
        for a in &self.assignments {
            groups.entry(a.slot).or_default().push(a);
        }
        groups
    }

    /// Number of distinct days that hold at least one exam.
    pub fn days_used(&self) -> usize {
        self.exams_per_day().values().filter(|&&n| n > 0).count()
    }

    /// Classroom usage count over the whole schedule.
    pub fn classroom_usage(&self) -> HashMap<String, usize> {
        let mut usage: HashMap<String, usize> = HashMap::new();
        for a in &self.assignments {
            for c in &a.classroom_ids {
                *usage.entry(c.clone()).or_insert(0) += 1;
            }
        }
        usage
    }
}
