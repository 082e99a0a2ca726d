//! Error types.
//!
//! [`PlanningError`] covers structural infeasibility: conditions under which
//! no usable schedule or seating plan can be produced. Soft problems
//! (student conflicts, capacity overflow, unseated students) are never
//! errors; they travel inside scores and outcome counts.

use thiserror::Error;

/// Failure reported by an external data provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("data provider failed: {message}")]
pub struct ProviderError {
    /// Provider-supplied description.
    pub message: String,
}

impl ProviderError {
    /// Creates a provider error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Structural failure of a planning or seating operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanningError {
    #[error("insufficient time slots: {available} slots generated for {required} courses")]
    InsufficientSlots { available: usize, required: usize },

    #[error("no courses found for department '{department_id}'")]
    NoCourses { department_id: String },

    #[error("none of the selected courses belong to department '{department_id}'")]
    NoSelectedCourses { department_id: String },

    #[error("no classrooms available for {scope}")]
    NoClassrooms { scope: String },

    #[error("no students enrolled in course '{course_id}'")]
    NoStudents { course_id: String },

    #[error("exam '{exam_id}' not found")]
    ExamNotFound { exam_id: String },

    #[error("ran out of time slots while placing course '{course_id}'")]
    SlotsExhausted { course_id: String },

    #[error("invalid planning parameters: {0}")]
    InvalidParams(String),

    #[error("planning cancelled before any attempt completed")]
    Cancelled,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}
