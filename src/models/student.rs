//! Student model.

use serde::{Deserialize, Serialize};

/// An enrolled student. Supplied by the host, read-only to the planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Student number.
    pub id: String,
    /// Display name.
    pub name: String,
    /// IDs of the courses the student takes.
    pub course_ids: Vec<String>,
}

impl Student {
    /// Creates a student with no enrollments.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            course_ids: Vec::new(),
        }
    }

    /// Adds a course enrollment.
    pub fn with_course(mut self, course_id: impl Into<String>) -> Self {
        self.course_ids.push(course_id.into());
        self
    }

    /// Whether the student takes the given course.
    pub fn takes(&self, course_id: &str) -> bool {
        self.course_ids.iter().any(|c| c == course_id)
    }
}
