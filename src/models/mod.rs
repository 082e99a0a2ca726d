//! Exam planning domain models.
//!
//! Provides the data types for the inputs (courses, classrooms, students,
//! calendar) and the outputs (candidate schedules, seating plans) of the
//! planner.
//!
//! # Domain Mappings
//!
//! | u-exam | Scheduling term | Host record |
//! |--------|-----------------|-------------|
//! | Course | Task | Course row + enrollment count |
//! | Classroom | Resource (capacity + grid) | Room row |
//! | TimeSlot | Start time | Exam date/time |
//! | CandidateSchedule | Schedule | Exam programme |
//! | SeatingAssignment | Assignment plan | Seating table |

mod calendar;
mod classroom;
mod course;
mod schedule;
mod seating;
mod student;
mod time_slot;

pub use calendar::{DailyWindow, ExamCalendar};
pub use classroom::Classroom;
pub use course::Course;
pub use schedule::{CandidateSchedule, ExamAssignment};
pub use seating::{SeatAllocation, SeatPosition, SeatingAssignment};
pub use student::Student;
pub use time_slot::{intervals_overlap, TimeSlot};
