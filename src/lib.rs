//! Exam timetabling and seating.
//!
//! Schedules university course exams into time slots and classrooms, then
//! seats each exam's students with checkerboard spacing.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Course`, `Classroom`, `Student`, `TimeSlot`,
//!   `ExamCalendar`, `CandidateSchedule`, `SeatingAssignment`
//! - **`scheduler`**: Slot generation, randomized assignment, scoring and
//!   multi-attempt search
//! - **`seating`**: Checkerboard seat allocation across classrooms
//! - **`validation`**: Integrity checks for inputs, schedules and seating plans
//! - **`planner`**: Host-facing entry points returning outcome values
//! - **`job`**: Background planning with progress events and cancellation
//! - **`providers`**: Traits through which the host supplies data
//!
//! # Architecture
//!
//! The crate holds no storage. Courses, classrooms and students come in
//! through [`providers`]; schedules and seating plans go back out as values
//! for the host to persist.
//!
//! # References
//!
//! - Carter, Laporte & Lee (1996), "Examination timetabling: Algorithmic
//!   strategies and applications"
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"

pub mod config;
pub mod error;
pub mod job;
pub mod logging;
pub mod models;
pub mod planner;
pub mod progress;
pub mod providers;
pub mod scheduler;
pub mod seating;
pub mod validation;

pub use config::{PlanningParams, RoomSelection, ScoreWeights};
pub use error::{PlanningError, ProviderError};
pub use planner::{ExamPlanner, PlanOutcome, SeatingOutcome, ValidationOutcome};
