//! Planner entry points.
//!
//! [`ExamPlanner`] is what a host calls. It loads data through the provider
//! traits, runs the scheduler or seating planner and folds every result,
//! including failures, into an outcome value. Nothing here returns `Err`.

use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::PlanningParams;
use crate::error::PlanningError;
use crate::models::{CandidateSchedule, Course, SeatingAssignment, Student};
use crate::progress::{CancelFlag, ProgressSink};
use crate::providers::{ClassroomProvider, CourseProvider, StudentProvider};
use crate::scheduler::{
    ensure_capacity, index_enrollments, AttemptManager, EnrollmentIndex, PlanningInput,
    ScoreResult, SearchReport, TimeSlotGenerator,
};
use crate::seating::{SeatingPlanner, SeatingResult};
use crate::validation::{self, Conflict, ValidationResult};

/// Result of [`ExamPlanner::plan_exam_schedule`].
#[derive(Debug, Clone, Serialize)]
pub struct PlanOutcome {
    /// Whether a schedule was produced.
    pub success: bool,
    /// Best schedule; `None` on failure.
    pub schedule: Option<CandidateSchedule>,
    /// Score of the best schedule.
    pub score: Option<ScoreResult>,
    /// Summary or error text.
    pub message: String,
    /// Attempts that ran.
    pub attempts_run: u32,
    /// Whether the search was cut short by cancellation.
    pub cancelled: bool,
}

impl PlanOutcome {
    fn from_report(report: SearchReport) -> Self {
        let SearchReport {
            schedule,
            score,
            attempts_run,
            cancelled,
            ..
        } = report;
        let mut message = format!(
            "{} exams scheduled over {} days, {}",
            schedule.assignment_count(),
            schedule.days_used(),
            score.summary()
        );
        if cancelled {
            message = format!("Cancelled after {attempts_run} attempts; best so far: {message}");
        }
        Self {
            success: true,
            schedule: Some(schedule),
            score: Some(score),
            message,
            attempts_run,
            cancelled,
        }
    }

    fn failed(err: &PlanningError) -> Self {
        Self {
            success: false,
            schedule: None,
            score: None,
            message: err.to_string(),
            attempts_run: 0,
            cancelled: matches!(err, PlanningError::Cancelled),
        }
    }
}

/// Result of [`ExamPlanner::generate_seating_plan`].
#[derive(Debug, Clone, Serialize)]
pub struct SeatingOutcome {
    /// Whether a plan was produced.
    pub success: bool,
    /// Seating plan; `None` on failure.
    pub plan: Option<SeatingAssignment>,
    /// Seated students.
    pub placed_count: usize,
    /// Students without a seat.
    pub unplaced_count: usize,
    /// The students without a seat.
    pub unplaced_students: Vec<Student>,
    /// Summary or error text.
    pub message: String,
}

impl SeatingOutcome {
    fn from_result(result: SeatingResult) -> Self {
        let unplaced_count = result.unplaced_students.len();
        let message = if unplaced_count == 0 {
            format!("{} students seated", result.placed)
        } else {
            format!(
                "{} students seated, {} could not be seated",
                result.placed, unplaced_count
            )
        };
        Self {
            success: true,
            placed_count: result.placed,
            plan: Some(result.assignment),
            unplaced_count,
            unplaced_students: result.unplaced_students,
            message,
        }
    }

    fn failed(err: &PlanningError) -> Self {
        Self {
            success: false,
            plan: None,
            placed_count: 0,
            unplaced_count: 0,
            unplaced_students: Vec::new(),
            message: err.to_string(),
        }
    }
}

/// Result of the validation entry points.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    /// `true` when no conflict was found.
    pub success: bool,
    /// Conflicts found.
    pub conflicts: Vec<Conflict>,
    /// Summary or error text.
    pub message: String,
}

impl ValidationOutcome {
    fn from_result(result: ValidationResult) -> Self {
        match result {
            Ok(()) => Self {
                success: true,
                conflicts: Vec::new(),
                message: "No conflicts found".to_string(),
            },
            Err(conflicts) => Self {
                success: false,
                message: format!("{} conflicts found", conflicts.len()),
                conflicts,
            },
        }
    }

    fn failed(err: &PlanningError) -> Self {
        Self {
            success: false,
            conflicts: Vec::new(),
            message: err.to_string(),
        }
    }
}

/// Exam scheduling and seating over host-supplied data.
pub struct ExamPlanner<'a> {
    courses: &'a dyn CourseProvider,
    classrooms: &'a dyn ClassroomProvider,
    students: &'a dyn StudentProvider,
    seating_seed: Option<u64>,
}

impl<'a> ExamPlanner<'a> {
    /// Creates a planner over separate providers.
    pub fn new(
        courses: &'a dyn CourseProvider,
        classrooms: &'a dyn ClassroomProvider,
        students: &'a dyn StudentProvider,
    ) -> Self {
        Self {
            courses,
            classrooms,
            students,
            seating_seed: None,
        }
    }

    /// Creates a planner over one value implementing every provider.
    pub fn from_catalog<C>(catalog: &'a C) -> Self
    where
        C: CourseProvider + ClassroomProvider + StudentProvider,
    {
        Self::new(catalog, catalog, catalog)
    }

    /// Fixes the seating shuffle seed.
    pub fn with_seating_seed(mut self, seed: u64) -> Self {
        self.seating_seed = Some(seed);
        self
    }

    /// Builds the best exam schedule for a department.
    pub fn plan_exam_schedule(
        &self,
        params: &PlanningParams,
        progress: &mut dyn ProgressSink,
    ) -> PlanOutcome {
        self.plan_exam_schedule_with_cancel(params, progress, &CancelFlag::new())
    }

    /// [`Self::plan_exam_schedule`] that stops when `cancel` is raised.
    pub fn plan_exam_schedule_with_cancel(
        &self,
        params: &PlanningParams,
        progress: &mut dyn ProgressSink,
        cancel: &CancelFlag,
    ) -> PlanOutcome {
        match self.search(params, progress, cancel) {
            Ok(report) => {
                let outcome = PlanOutcome::from_report(report);
                progress.report(100, "Planning finished");
                info!(department = %params.department_id, "{}", outcome.message);
                outcome
            }
            Err(err) => {
                warn!(department = %params.department_id, error = %err, "exam planning failed");
                PlanOutcome::failed(&err)
            }
        }
    }

    fn search(
        &self,
        params: &PlanningParams,
        progress: &mut dyn ProgressSink,
        cancel: &CancelFlag,
    ) -> Result<SearchReport, PlanningError> {
        progress.report(0, "Checking parameters");
        params.validate()?;

        progress.report(10, "Loading courses");
        let courses = self.load_courses(params)?;

        progress.report(15, "Loading classrooms");
        let classrooms = self
            .classrooms
            .list_classrooms_for_department(&params.department_id)?;
        if classrooms.is_empty() {
            return Err(PlanningError::NoClassrooms {
                scope: format!("department '{}'", params.department_id),
            });
        }
        if let Err(conflicts) = validation::validate_input(&courses, &classrooms) {
            for c in &conflicts {
                warn!(kind = ?c.kind, "{}", c.message);
            }
        }

        progress.report(20, "Loading enrollments");
        let (courses, enrollments) = self.load_enrollments(courses)?;

        progress.report(30, "Generating time slots");
        let slots = TimeSlotGenerator::from_params(params).generate();
        info!(
            slots = slots.len(),
            courses = courses.len(),
            classrooms = classrooms.len(),
            "planning input loaded"
        );
        ensure_capacity(&slots, courses.len())?;

        let seed = params.seed.unwrap_or_else(|| rand::rng().random());
        info!(seed, max_attempts = params.max_attempts, "starting schedule search");

        let input = PlanningInput::new(courses, classrooms, slots, enrollments);
        AttemptManager::new(&input, params, seed)
            .with_cancel_flag(cancel.clone())
            .with_progress_band(35, 95)
            .run(progress)
    }

    fn load_courses(&self, params: &PlanningParams) -> Result<Vec<Course>, PlanningError> {
        let mut courses = self.courses.list_courses_for_department(&params.department_id)?;
        if courses.is_empty() {
            return Err(PlanningError::NoCourses {
                department_id: params.department_id.clone(),
            });
        }

        if let Some(selected) = &params.selected_course_ids {
            courses.retain(|c| selected.contains(&c.id));
            if courses.len() < selected.len() {
                warn!(
                    selected = selected.len(),
                    found = courses.len(),
                    "some selected courses are not offered by the department"
                );
            }
            if courses.is_empty() {
                return Err(PlanningError::NoSelectedCourses {
                    department_id: params.department_id.clone(),
                });
            }
        }
        Ok(courses)
    }

    /// Indexes enrollments; a course's enrolled count is raised to its roster size.
    fn load_enrollments(
        &self,
        mut courses: Vec<Course>,
    ) -> Result<(Vec<Course>, EnrollmentIndex), PlanningError> {
        let mut index = EnrollmentIndex::new();
        for course in &mut courses {
            let students = self.students.list_enrolled_students(&course.id)?;
            course.enrolled_count = course.enrolled_count.max(students.len() as u32);
            index_enrollments(&mut index, &course.id, &students);
        }
        Ok((courses, index))
    }

    /// Seats the students of one exam in its classrooms.
    pub fn generate_seating_plan(
        &self,
        exam_id: &str,
        progress: &mut dyn ProgressSink,
    ) -> SeatingOutcome {
        match self.seat(exam_id, progress) {
            Ok(result) => {
                let outcome = SeatingOutcome::from_result(result);
                progress.report(100, "Seating finished");
                info!(exam = exam_id, "{}", outcome.message);
                outcome
            }
            Err(err) => {
                warn!(exam = exam_id, error = %err, "seating failed");
                SeatingOutcome::failed(&err)
            }
        }
    }

    fn seat(&self, exam_id: &str, progress: &mut dyn ProgressSink) -> Result<SeatingResult, PlanningError> {
        progress.report(10, "Loading exam");
        let course = self
            .courses
            .course_for_exam(exam_id)?
            .ok_or_else(|| PlanningError::ExamNotFound {
                exam_id: exam_id.to_string(),
            })?;

        progress.report(20, "Loading students");
        let students = self.students.list_enrolled_students(&course.id)?;
        if students.is_empty() {
            return Err(PlanningError::NoStudents {
                course_id: course.id,
            });
        }

        progress.report(30, "Loading classrooms");
        let classrooms = self.classrooms.list_classrooms_for_exam(exam_id)?;
        if classrooms.is_empty() {
            return Err(PlanningError::NoClassrooms {
                scope: format!("exam '{exam_id}'"),
            });
        }

        progress.report(50, "Placing students");
        let seed = self.seating_seed.unwrap_or_else(|| rand::rng().random());
        let result = SeatingPlanner::new(seed).plan(exam_id, &classrooms, &students);

        if let Err(conflicts) = validation::validate_seating_layout(&result.assignment, &classrooms) {
            warn!(exam = exam_id, conflicts = conflicts.len(), "seating plan failed validation");
        }
        Ok(result)
    }

    /// Checks a seating plan for duplicate seats and students.
    ///
    /// Seats are also checked against the exam's classroom grids when the
    /// exam's classrooms can be loaded.
    pub fn validate_seating_plan(&self, plan: &SeatingAssignment) -> ValidationOutcome {
        let result = match self.classrooms.list_classrooms_for_exam(&plan.exam_id) {
            Ok(rooms) if !rooms.is_empty() => validation::validate_seating_layout(plan, &rooms),
            Ok(_) => validation::validate_seating(plan),
            Err(err) => {
                warn!(exam = %plan.exam_id, error = %err, "classrooms unavailable, skipping layout checks");
                validation::validate_seating(plan)
            }
        };
        ValidationOutcome::from_result(result)
    }

    /// Checks a schedule for classroom double booking and student conflicts.
    pub fn validate_exam_schedule(&self, schedule: &CandidateSchedule) -> ValidationOutcome {
        let mut index = EnrollmentIndex::new();
        for a in &schedule.assignments {
            match self.students.list_enrolled_students(&a.course_id) {
                Ok(students) => index_enrollments(&mut index, &a.course_id, &students),
                Err(err) => return ValidationOutcome::failed(&PlanningError::from(err)),
            }
        }

        let mut conflicts = validation::validate_exam_schedule(schedule)
            .err()
            .unwrap_or_default();
        conflicts.extend(
            validation::validate_student_conflicts(schedule, &index)
                .err()
                .unwrap_or_default(),
        );
        ValidationOutcome::from_result(if conflicts.is_empty() {
            Ok(())
        } else {
            Err(conflicts)
        })
    }
}
