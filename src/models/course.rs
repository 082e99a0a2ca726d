//! Course model.
//!
//! A course is the unit being examined: one course yields exactly one
//! exam per schedule.

use serde::{Deserialize, Serialize};

/// A course whose exam must be scheduled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier.
    pub id: String,
    /// Short course code (e.g., "CS101").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Owning department.
    pub department_id: String,
    /// Lecturer in charge, if known.
    pub instructor: Option<String>,
    /// Study year of the course (1-based).
    pub class_year: u8,
    /// Number of enrolled students.
    pub enrolled_count: u32,
}

impl Course {
    /// Creates a course with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: String::new(),
            name: String::new(),
            department_id: String::new(),
            instructor: None,
            class_year: 1,
            enrolled_count: 0,
        }
    }

    /// Sets the course code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the course name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the owning department.
    pub fn with_department(mut self, department_id: impl Into<String>) -> Self {
        self.department_id = department_id.into();
        self
    }

    /// Sets the lecturer.
    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = Some(instructor.into());
        self
    }

    /// Sets the study year.
    pub fn with_class_year(mut self, class_year: u8) -> Self {
        self.class_year = class_year;
        self
    }

    /// Sets the enrolled-student count.
    pub fn with_enrolled(mut self, count: u32) -> Self {
        self.enrolled_count = count;
        self
    }

    /// Label used in logs and conflict messages: the code, or the ID if no code is set.
    pub fn label(&self) -> &str {
        if self.code.is_empty() {
            &self.id
        } else {
            &self.code
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_builder() {
        let c = Course::new("C1")
            .with_code("CS101")
            .with_name("Programming I")
            .with_department("CENG")
            .with_instructor("Dr. Kaya")
            .with_class_year(2)
            .with_enrolled(85);

        assert_eq!(c.id, "C1");
        assert_eq!(c.department_id, "CENG");
        assert_eq!(c.instructor.as_deref(), Some("Dr. Kaya"));
        assert_eq!(c.class_year, 2);
        assert_eq!(c.enrolled_count, 85);
    }

    #[test]
    fn test_course_label_falls_back_to_id() {
        assert_eq!(Course::new("C1").label(), "C1");
        assert_eq!(Course::new("C1").with_code("MAT201").label(), "MAT201");
    }
}
