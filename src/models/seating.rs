//! Seating plan model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A desk in a classroom grid (1-based row and column).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeatPosition {
    /// Classroom holding the desk.
    pub classroom_id: String,
    /// Row number, starting at 1.
    pub row: u32,
    /// Column number, starting at 1.
    pub column: u32,
}

impl SeatPosition {
    /// Creates a seat position.
    pub fn new(classroom_id: impl Into<String>, row: u32, column: u32) -> Self {
        Self {
            classroom_id: classroom_id.into(),
            row,
            column,
        }
    }

    /// Whether two seats in the same room share an edge.
    pub fn is_adjacent(&self, other: &Self) -> bool {
        self.classroom_id == other.classroom_id
            && self.row.abs_diff(other.row) + self.column.abs_diff(other.column) == 1
    }
}

/// One student's seat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatAllocation {
    /// Student number.
    pub student_id: String,
    /// Student display name.
    pub student_name: String,
    /// Assigned desk.
    pub seat: SeatPosition,
}

/// Seating of one exam across one or more classrooms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeatingAssignment {
    /// Exam being seated.
    pub exam_id: String,
    /// Allocations in placement order.
    pub allocations: Vec<SeatAllocation>,
}

impl SeatingAssignment {
    /// Creates an empty plan for an exam.
    pub fn new(exam_id: impl Into<String>) -> Self {
        Self {
            exam_id: exam_id.into(),
            allocations: Vec::new(),
        }
    }

    /// Seats a student.
    pub fn assign(
        &mut self,
        student_id: impl Into<String>,
        student_name: impl Into<String>,
        seat: SeatPosition,
    ) {
        self.allocations.push(SeatAllocation {
            student_id: student_id.into(),
            student_name: student_name.into(),
            seat,
        });
    }

    /// Number of seated students.
    pub fn len(&self) -> usize {
        self.allocations.len()
    }

    /// Whether nobody is seated.
    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }

    /// Allocations in one classroom.
    pub fn in_classroom(&self, classroom_id: &str) -> Vec<&SeatAllocation> {
        self.allocations
            .iter()
            .filter(|a| a.seat.classroom_id == classroom_id)
            .collect()
    }

    /// Seated students per classroom.
    pub fn count_by_classroom(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for a in &self.allocations {
            *counts.entry(a.seat.classroom_id.clone()).or_insert(0) += 1;
        }
        counts
    }
}
