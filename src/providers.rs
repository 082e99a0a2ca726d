//! Data providers.
//!
//! The host application owns courses, classrooms and students. The planner
//! reads them through these traits and never writes back.

use std::collections::HashMap;

use crate::error::ProviderError;
use crate::models::{Classroom, Course, Student};

/// Supplies courses.
pub trait CourseProvider {
    /// Courses offered by a department.
    fn list_courses_for_department(&self, department_id: &str) -> Result<Vec<Course>, ProviderError>;

    /// Course examined by an exam, if the exam exists.
    fn course_for_exam(&self, exam_id: &str) -> Result<Option<Course>, ProviderError>;
}

/// Supplies classrooms.
pub trait ClassroomProvider {
    /// Classrooms assigned to an exam.
    fn list_classrooms_for_exam(&self, exam_id: &str) -> Result<Vec<Classroom>, ProviderError>;

    /// Classrooms owned by a department.
    fn list_classrooms_for_department(
        &self,
        department_id: &str,
    ) -> Result<Vec<Classroom>, ProviderError>;
}

/// Supplies students.
pub trait StudentProvider {
    /// Students enrolled in a course.
    fn list_enrolled_students(&self, course_id: &str) -> Result<Vec<Student>, ProviderError>;
}

#[derive(Debug, Clone)]
struct ExamRecord {
    course_id: String,
    classroom_ids: Vec<String>,
}

/// In-memory implementation of every provider trait.
///
/// Enrollment is read from [`Student::course_ids`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    courses: Vec<Course>,
    classrooms: Vec<Classroom>,
    students: Vec<Student>,
    exams: HashMap<String, ExamRecord>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a course.
    pub fn add_course(&mut self, course: Course) -> &mut Self {
        self.courses.push(course);
        self
    }

    /// Adds a classroom.
    pub fn add_classroom(&mut self, classroom: Classroom) -> &mut Self {
        self.classrooms.push(classroom);
        self
    }

    /// Adds a student.
    pub fn add_student(&mut self, student: Student) -> &mut Self {
        self.students.push(student);
        self
    }

    /// Records a persisted exam: the course it examines and its classrooms.
    pub fn add_exam(
        &mut self,
        exam_id: impl Into<String>,
        course_id: impl Into<String>,
        classroom_ids: Vec<String>,
    ) -> &mut Self {
        self.exams.insert(
            exam_id.into(),
            ExamRecord {
                course_id: course_id.into(),
                classroom_ids,
            },
        );
        self
    }

    /// All courses.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// All classrooms.
    pub fn classrooms(&self) -> &[Classroom] {
        &self.classrooms
    }

    fn exam(&self, exam_id: &str) -> Result<&ExamRecord, ProviderError> {
        self.exams
            .get(exam_id)
            .ok_or_else(|| ProviderError::new(format!("unknown exam '{exam_id}'")))
    }
}

impl CourseProvider for InMemoryCatalog {
    fn list_courses_for_department(&self, department_id: &str) -> Result<Vec<Course>, ProviderError> {
        Ok(self
            .courses
            .iter()
            .filter(|c| c.department_id == department_id)
            .cloned()
            .collect())
    }

    fn course_for_exam(&self, exam_id: &str) -> Result<Option<Course>, ProviderError> {
        let Some(exam) = self.exams.get(exam_id) else {
            return Ok(None);
        };
        Ok(self.courses.iter().find(|c| c.id == exam.course_id).cloned())
    }
}

impl ClassroomProvider for InMemoryCatalog {
    fn list_classrooms_for_exam(&self, exam_id: &str) -> Result<Vec<Classroom>, ProviderError> {
        let exam = self.exam(exam_id)?;
        Ok(exam
            .classroom_ids
            .iter()
            .filter_map(|id| self.classrooms.iter().find(|r| &r.id == id))
            .cloned()
            .collect())
    }

    fn list_classrooms_for_department(
        &self,
        department_id: &str,
    ) -> Result<Vec<Classroom>, ProviderError> {
        Ok(self
            .classrooms
            .iter()
            .filter(|r| r.department_id == department_id)
            .cloned()
            .collect())
    }
}

impl StudentProvider for InMemoryCatalog {
    fn list_enrolled_students(&self, course_id: &str) -> Result<Vec<Student>, ProviderError> {
        Ok(self
            .students
            .iter()
            .filter(|s| s.takes(course_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> InMemoryCatalog {
        let mut c = InMemoryCatalog::new();
        c.add_course(Course::new("C1").with_department("CENG"))
            .add_course(Course::new("C2").with_department("EEE"))
            .add_classroom(Classroom::new("R1").with_department("CENG").with_capacity(40))
            .add_classroom(Classroom::new("R2").with_department("EEE").with_capacity(60))
            .add_student(Student::new("S1", "Ali").with_course("C1"))
            .add_student(Student::new("S2", "Ayşe").with_course("C1").with_course("C2"))
            .add_exam("E1", "C1", vec!["R2".into(), "R1".into()]);
        c
    }

    #[test]
    fn test_department_filters() {
        let c = catalog();
        let courses = c.list_courses_for_department("CENG").unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].id, "C1");

        let rooms = c.list_classrooms_for_department("EEE").unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].id, "R2");
    }

    #[test]
    fn test_exam_lookups() {
        let c = catalog();
        assert_eq!(c.course_for_exam("E1").unwrap().map(|c| c.id), Some("C1".to_string()));
        assert!(c.course_for_exam("E9").unwrap().is_none());

        let rooms: Vec<String> = c
            .list_classrooms_for_exam("E1")
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(rooms, vec!["R2", "R1"]);
        assert!(c.list_classrooms_for_exam("E9").is_err());
    }

    #[test]
    fn test_enrollment() {
        let c = catalog();
        assert_eq!(c.list_enrolled_students("C1").unwrap().len(), 2);
        assert_eq!(c.list_enrolled_students("C2").unwrap().len(), 1);
        assert!(c.list_enrolled_students("C3").unwrap().is_empty());
    }
}
