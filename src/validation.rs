//! Integrity checks for planning inputs, schedules and seating plans.
//!
//! Detects:
//! - Duplicate course or classroom IDs
//! - Classrooms whose capacity exceeds their seating grid
//! - Classrooms booked for two overlapping exams
//! - Students sitting two overlapping exams
//! - Seats held by two students, students seated twice
//! - Seats outside the grid or on inactive checkerboard cells
//!
//! Violations are reported, never corrected.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{
    intervals_overlap, CandidateSchedule, Classroom, Course, ExamAssignment, SeatPosition,
    SeatingAssignment,
};
use crate::scheduler::EnrollmentIndex;

/// Validation result.
pub type ValidationResult = Result<(), Vec<Conflict>>;

/// A detected integrity violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// Violation category.
    pub kind: ConflictKind,
    /// Human-readable description.
    pub message: String,
    /// IDs of the entities involved (students, courses, classrooms).
    pub entity_ids: Vec<String>,
}

/// Categories of integrity violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A classroom declares more capacity than its grid has desks.
    CapacityExceedsGrid,
    /// A classroom has no rows or no columns.
    EmptyGrid,
    /// A classroom hosts two exams at overlapping times.
    ClassroomDoubleBooked,
    /// A student sits two exams at overlapping times.
    StudentConflict,
    /// Two students hold the same seat.
    DuplicateSeat,
    /// A student is seated more than once.
    DuplicateStudent,
    /// A seat lies outside its classroom grid.
    SeatOutOfGrid,
    /// A seat violates checkerboard spacing.
    InactiveSeat,
    /// A seat references a classroom that is not known.
    UnknownClassroom,
}

impl Conflict {
    fn new<I, S>(kind: ConflictKind, message: impl Into<String>, entity_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            message: message.into(),
            entity_ids: entity_ids.into_iter().map(Into::into).collect(),
        }
    }
}

fn finish(conflicts: Vec<Conflict>) -> ValidationResult {
    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(conflicts)
    }
}

/// Validates planning input.
///
/// Checks:
/// 1. No duplicate course IDs
/// 2. No duplicate classroom IDs
/// 3. Every classroom has a non-empty grid
/// 4. Every classroom's capacity fits its grid
pub fn validate_input(courses: &[Course], classrooms: &[Classroom]) -> ValidationResult {
    let mut conflicts = Vec::new();

    let mut course_ids = HashSet::new();
    for c in courses {
        if !course_ids.insert(c.id.as_str()) {
            conflicts.push(Conflict::new(
                ConflictKind::DuplicateId,
                format!("Duplicate course ID: {}", c.id),
                [c.id.as_str()],
            ));
        }
    }

    let mut classroom_ids = HashSet::new();
    for r in classrooms {
        if !classroom_ids.insert(r.id.as_str()) {
            conflicts.push(Conflict::new(
                ConflictKind::DuplicateId,
                format!("Duplicate classroom ID: {}", r.id),
                [r.id.as_str()],
            ));
        }
        if r.rows == 0 || r.columns == 0 {
            conflicts.push(Conflict::new(
                ConflictKind::EmptyGrid,
                format!("Classroom '{}' has a {}x{} grid", r.id, r.rows, r.columns),
                [r.id.as_str()],
            ));
        } else if r.capacity > r.grid_size() {
            conflicts.push(Conflict::new(
                ConflictKind::CapacityExceedsGrid,
                format!(
                    "Classroom '{}' capacity {} exceeds its {} desks",
                    r.id,
                    r.capacity,
                    r.grid_size()
                ),
                [r.id.as_str()],
            ));
        }
    }

    finish(conflicts)
}

/// Checks that no classroom hosts two exams at overlapping times.
///
/// Rooms are checked in ID order; exams within a room in schedule order.
pub fn validate_exam_schedule(schedule: &CandidateSchedule) -> ValidationResult {
    let mut conflicts = Vec::new();
    let mut rooms: Vec<(String, usize)> = schedule.classroom_usage().into_iter().collect();
    rooms.sort();

    for (room, uses) in rooms {
        if uses < 2 {
            continue;
        }
        let exams = schedule.assignments_for_classroom(&room);
        for (i, a) in exams.iter().enumerate() {
            for b in exams[i + 1..].iter().filter(|b| overlaps(a, b)) {
                conflicts.push(Conflict::new(
                    ConflictKind::ClassroomDoubleBooked,
                    format!(
                        "Classroom '{}' hosts '{}' and '{}' at {}",
                        room,
                        a.course_id,
                        b.course_id,
                        a.starts_at()
                    ),
                    [room.as_str(), a.course_id.as_str(), b.course_id.as_str()],
                ));
            }
        }
    }

    finish(conflicts)
}

/// Checks that no student sits two exams at overlapping times.
///
/// Reports one conflict per student and pair of clashing exams.
pub fn validate_student_conflicts(
    schedule: &CandidateSchedule,
    enrollments: &EnrollmentIndex,
) -> ValidationResult {
    let mut conflicts = Vec::new();
    let exams = &schedule.assignments;

    for (i, a) in exams.iter().enumerate() {
        let Some(students_a) = enrollments.get(&a.course_id) else {
            continue;
        };
        for b in &exams[i + 1..] {
            if !overlaps(a, b) {
                continue;
            }
            let Some(students_b) = enrollments.get(&b.course_id) else {
                continue;
            };
            let mut shared: Vec<&String> = students_a.intersection(students_b).collect();
            shared.sort();
            for student in shared {
                conflicts.push(Conflict::new(
                    ConflictKind::StudentConflict,
                    format!(
                        "Student '{}' sits '{}' and '{}' at {}",
                        student,
                        a.course_id,
                        b.course_id,
                        a.starts_at()
                    ),
                    [student.as_str(), a.course_id.as_str(), b.course_id.as_str()],
                ));
            }
        }
    }

    finish(conflicts)
}

fn overlaps(a: &ExamAssignment, b: &ExamAssignment) -> bool {
    intervals_overlap(a.starts_at(), a.ends_at(), b.starts_at(), b.ends_at())
}

/// Checks that no seat is held twice and no student is seated twice.
pub fn validate_seating(plan: &SeatingAssignment) -> ValidationResult {
    let mut conflicts = Vec::new();

    let mut by_seat: BTreeMap<&SeatPosition, Vec<&str>> = BTreeMap::new();
    let mut by_student: BTreeMap<&str, usize> = BTreeMap::new();
    for a in &plan.allocations {
        by_seat.entry(&a.seat).or_default().push(a.student_id.as_str());
        *by_student.entry(a.student_id.as_str()).or_insert(0) += 1;
    }

    for (seat, students) in by_seat.into_iter().filter(|(_, s)| s.len() > 1) {
        conflicts.push(Conflict::new(
            ConflictKind::DuplicateSeat,
            format!(
                "Seat row {} column {} in '{}' is held by {} students",
                seat.row,
                seat.column,
                seat.classroom_id,
                students.len()
            ),
            std::iter::once(seat.classroom_id.as_str()).chain(students),
        ));
    }

    for (student, times) in by_student.into_iter().filter(|&(_, n)| n > 1) {
        conflicts.push(Conflict::new(
            ConflictKind::DuplicateStudent,
            format!("Student '{student}' is seated {times} times"),
            [student],
        ));
    }

    finish(conflicts)
}

/// [`validate_seating`] plus checks against the classroom grids.
pub fn validate_seating_layout(plan: &SeatingAssignment, classrooms: &[Classroom]) -> ValidationResult {
    let mut conflicts = validate_seating(plan).err().unwrap_or_default();
    let rooms: HashMap<&str, &Classroom> = classrooms.iter().map(|r| (r.id.as_str(), r)).collect();

    for a in &plan.allocations {
        let seat = &a.seat;
        let Some(room) = rooms.get(seat.classroom_id.as_str()) else {
            conflicts.push(Conflict::new(
                ConflictKind::UnknownClassroom,
                format!("Student '{}' is seated in unknown classroom '{}'", a.student_id, seat.classroom_id),
                [a.student_id.as_str(), seat.classroom_id.as_str()],
            ));
            continue;
        };
        if !room.contains_seat(seat.row, seat.column) {
            conflicts.push(Conflict::new(
                ConflictKind::SeatOutOfGrid,
                format!(
                    "Seat row {} column {} lies outside the {}x{} grid of '{}'",
                    seat.row, seat.column, room.rows, room.columns, room.id
                ),
                [a.student_id.as_str(), room.id.as_str()],
            ));
        } else if !Classroom::is_active_seat(seat.row, seat.column) {
            conflicts.push(Conflict::new(
                ConflictKind::InactiveSeat,
                format!(
                    "Student '{}' sits on inactive seat row {} column {} in '{}'",
                    a.student_id, seat.row, seat.column, room.id
                ),
                [a.student_id.as_str(), room.id.as_str()],
            ));
        }
    }

    finish(conflicts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeSlot;
    use chrono::{NaiveDate, NaiveTime};

    fn slot(h: u32, m: u32) -> TimeSlot {
        TimeSlot::new(
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            NaiveTime::from_hms_opt(h, m, 0).unwrap(),
            75,
        )
    }

    fn kinds(result: ValidationResult) -> Vec<ConflictKind> {
        result.err().unwrap_or_default().into_iter().map(|c| c.kind).collect()
    }

    #[test]
    fn test_valid_input() {
        let courses = vec![Course::new("C1"), Course::new("C2")];
        let rooms = vec![
            Classroom::new("R1").with_capacity(30).with_grid(10, 6),
            Classroom::new("R2").with_capacity(60).with_grid(10, 6),
        ];
        assert!(validate_input(&courses, &rooms).is_ok());
    }

    #[test]
    fn test_invalid_input() {
        let courses = vec![Course::new("C1"), Course::new("C1")];
        let rooms = vec![
            Classroom::new("R1").with_capacity(70).with_grid(10, 6),
            Classroom::new("R2").with_capacity(10),
        ];
        let found = kinds(validate_input(&courses, &rooms));
        assert_eq!(
            found,
            vec![
                ConflictKind::DuplicateId,
                ConflictKind::CapacityExceedsGrid,
                ConflictKind::EmptyGrid
            ]
        );
    }

    #[test]
    fn test_same_slot_same_room_is_double_booking() {
        let mut s = CandidateSchedule::default();
        s.add_assignment(ExamAssignment::new("C1", slot(10, 0), "R1", 20, 40));
        s.add_assignment(ExamAssignment::new("C2", slot(10, 0), "R1", 20, 40));
        s.add_assignment(ExamAssignment::new("C3", slot(10, 0), "R2", 20, 40));

        let conflicts = validate_exam_schedule(&s).unwrap_err();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::ClassroomDoubleBooked);
        assert_eq!(conflicts[0].entity_ids, vec!["R1", "C1", "C2"]);
    }

    #[test]
    fn test_split_exam_clashes_reported_per_room() {
        let mut s = CandidateSchedule::default();
        s.add_assignment(
            ExamAssignment::new("C1", slot(10, 0), "R2", 90, 100)
                .with_classrooms(vec!["R2".into(), "R1".into()]),
        );
        s.add_assignment(ExamAssignment::new("C2", slot(10, 0), "R1", 20, 40));
        s.add_assignment(ExamAssignment::new("C3", slot(10, 0), "R2", 20, 40));
        s.add_assignment(ExamAssignment::new("C4", slot(14, 0), "R1", 20, 40));

        let conflicts = validate_exam_schedule(&s).unwrap_err();
        let ids: Vec<&Vec<String>> = conflicts.iter().map(|c| &c.entity_ids).collect();
        assert_eq!(ids, vec![&vec!["R1", "C1", "C2"], &vec!["R2", "C1", "C3"]]);
    }

    #[test]
    fn test_long_exam_overlapping_next_slot() {
        let mut s = CandidateSchedule::default();
        s.add_assignment(ExamAssignment::new("C1", slot(10, 0), "R1", 20, 40).with_duration(120));
        s.add_assignment(ExamAssignment::new("C2", slot(11, 30), "R1", 20, 40));
        assert_eq!(kinds(validate_exam_schedule(&s)), vec![ConflictKind::ClassroomDoubleBooked]);

        // Back-to-back exams do not overlap.
        let mut t = CandidateSchedule::default();
        t.add_assignment(ExamAssignment::new("C1", slot(10, 0), "R1", 20, 40).with_duration(90));
        t.add_assignment(ExamAssignment::new("C2", slot(11, 30), "R1", 20, 40));
        assert!(validate_exam_schedule(&t).is_ok());
    }

    #[test]
    fn test_student_conflicts() {
        let mut enrollments = EnrollmentIndex::new();
        enrollments.insert("C1".into(), ["s1", "s2"].iter().map(|s| s.to_string()).collect());
        enrollments.insert("C2".into(), ["s2", "s3"].iter().map(|s| s.to_string()).collect());
        enrollments.insert("C3".into(), ["s1"].iter().map(|s| s.to_string()).collect());

        let mut s = CandidateSchedule::default();
        s.add_assignment(ExamAssignment::new("C1", slot(10, 0), "R1", 2, 40));
        s.add_assignment(ExamAssignment::new("C2", slot(10, 0), "R2", 2, 40));
        s.add_assignment(ExamAssignment::new("C3", slot(13, 30), "R1", 1, 40));

        let conflicts = validate_student_conflicts(&s, &enrollments).unwrap_err();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::StudentConflict);
        assert_eq!(conflicts[0].entity_ids, vec!["s2", "C1", "C2"]);
    }

    #[test]
    fn test_seating_duplicates() {
        let mut plan = SeatingAssignment::new("E1");
        plan.assign("S1", "Ali", SeatPosition::new("R1", 1, 1));
        plan.assign("S2", "Veli", SeatPosition::new("R1", 1, 1));
        plan.assign("S3", "Can", SeatPosition::new("R1", 1, 3));
        plan.assign("S3", "Can", SeatPosition::new("R1", 2, 2));

        let conflicts = validate_seating(&plan).unwrap_err();
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].kind, ConflictKind::DuplicateSeat);
        assert_eq!(conflicts[0].entity_ids, vec!["R1", "S1", "S2"]);
        assert_eq!(conflicts[1].kind, ConflictKind::DuplicateStudent);
        assert_eq!(conflicts[1].entity_ids, vec!["S3"]);
    }

    #[test]
    fn test_seating_layout() {
        let rooms = vec![Classroom::new("R1").with_capacity(10).with_grid(4, 5)];
        let mut plan = SeatingAssignment::new("E1");
        plan.assign("S1", "Ali", SeatPosition::new("R1", 1, 1));
        plan.assign("S2", "Veli", SeatPosition::new("R1", 1, 2)); // inactive
        plan.assign("S3", "Can", SeatPosition::new("R1", 5, 1)); // outside
        plan.assign("S4", "Ece", SeatPosition::new("R9", 1, 1)); // unknown room

        assert_eq!(
            kinds(validate_seating_layout(&plan, &rooms)),
            vec![
                ConflictKind::InactiveSeat,
                ConflictKind::SeatOutOfGrid,
                ConflictKind::UnknownClassroom
            ]
        );
    }

    #[test]
    fn test_empty_plan_is_valid() {
        assert!(validate_seating(&SeatingAssignment::new("E1")).is_ok());
        assert!(validate_exam_schedule(&CandidateSchedule::default()).is_ok());
    }
}
