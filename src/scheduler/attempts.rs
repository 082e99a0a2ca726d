//! Multi-attempt search over randomized schedules.
//!
//! # Algorithm
//!
//! Restart-based search: attempt `i` builds a schedule with seed
//! `base_seed + i`, scores it, and keeps it if it beats the best so far.
//! The loop stops early once a schedule has neither student conflicts nor
//! capacity overflow, or when the cancel flag is raised (polled once per
//! attempt).
//!
//! Attempts share nothing but the best-so-far slot, so they could be
//! distributed across workers with a final min-reduction on the score.

use tracing::{debug, info, warn};

use super::builder::{ExamAssignmentBuilder, PlanningInput};
use super::score::{ScheduleScorer, ScoreResult};
use crate::config::PlanningParams;
use crate::error::PlanningError;
use crate::models::CandidateSchedule;
use crate::progress::{scaled_percent, CancelFlag, ProgressSink};

/// Outcome of a search.
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// Best schedule found.
    pub schedule: CandidateSchedule,
    /// Its score.
    pub score: ScoreResult,
    /// Attempts actually run.
    pub attempts_run: u32,
    /// Attempts that left a course without a slot.
    pub failed_attempts: u32,
    /// Best total after each attempt since the first success (non-increasing).
    pub best_history: Vec<f64>,
    /// Whether the search stopped on the cancel flag.
    pub cancelled: bool,
    /// Seed of attempt 0.
    pub base_seed: u64,
}

/// Runs repeated builder attempts and keeps the best-scoring schedule.
#[derive(Debug)]
pub struct AttemptManager<'a> {
    input: &'a PlanningInput,
    params: &'a PlanningParams,
    scorer: ScheduleScorer,
    base_seed: u64,
    cancel: CancelFlag,
    progress_band: (u8, u8),
}

impl<'a> AttemptManager<'a> {
    /// Creates a manager using the parameters' attempt budget and weights.
    pub fn new(input: &'a PlanningInput, params: &'a PlanningParams, base_seed: u64) -> Self {
        Self {
            input,
            params,
            scorer: ScheduleScorer::new(params.weights),
            base_seed,
            cancel: CancelFlag::new(),
            progress_band: (0, 100),
        }
    }

    /// Uses a shared cancel flag.
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Maps attempt progress onto `[from, to]` percent.
    pub fn with_progress_band(mut self, from: u8, to: u8) -> Self {
        self.progress_band = (from.min(to), to.max(from));
        self
    }

    /// Runs the search.
    ///
    /// An attempt whose course order leaves some course without a slot
    /// ([`PlanningError::SlotsExhausted`]) is counted as failed and the
    /// search moves on to the next seed.
    ///
    /// # Errors
    /// - Any other [`PlanningError`] from the builder, immediately.
    /// - [`PlanningError::SlotsExhausted`] if every attempt failed that way.
    /// - [`PlanningError::Cancelled`] if cancelled before any attempt succeeded.
    pub fn run(&self, progress: &mut dyn ProgressSink) -> Result<SearchReport, PlanningError> {
        let max_attempts = self.params.max_attempts.max(1);
        let builder = ExamAssignmentBuilder::new(self.input, self.params);
        let (from, to) = self.progress_band;

        let mut best: Option<(CandidateSchedule, ScoreResult)> = None;
        let mut best_history = Vec::with_capacity(max_attempts as usize);
        let mut attempts_run = 0u32;
        let mut failed_attempts = 0u32;
        let mut last_failure: Option<PlanningError> = None;
        let mut cancelled = false;

        for attempt in 0..max_attempts {
            if self.cancel.is_cancelled() {
                info!(attempt, "search cancelled");
                cancelled = true;
                break;
            }

            let seed = self.base_seed.wrapping_add(u64::from(attempt));
            attempts_run += 1;
            match builder.build(seed) {
                Ok(candidate) => {
                    let score = self.scorer.score(&candidate, &self.input.enrollments);
                    let improved = match &best {
                        None => true,
                        Some((_, current)) => score.is_better_than(current),
                    };
                    if improved {
                        debug!(attempt, seed, total = score.total, "new best schedule");
                        best = Some((candidate, score));
                    }
                }
                Err(err @ PlanningError::SlotsExhausted { .. }) => {
                    debug!(attempt, seed, error = %err, "attempt failed");
                    failed_attempts += 1;
                    last_failure = Some(err);
                }
                Err(err) => return Err(err),
            }

            let percent = scaled_percent(from, to, attempt as usize + 1, max_attempts as usize);
            let Some((_, best_score)) = &best else {
                progress.report(
                    percent,
                    &format!("Attempt {}/{}: no complete schedule yet", attempt + 1, max_attempts),
                );
                continue;
            };
            best_history.push(best_score.total);
            progress.report(
                percent,
                &format!(
                    "Attempt {}/{}: best {}",
                    attempt + 1,
                    max_attempts,
                    best_score.summary()
                ),
            );

            if best_score.is_ideal() {
                info!(attempt, "conflict-free schedule without overflow found, stopping early");
                break;
            }
        }

        let Some((schedule, score)) = best else {
            return Err(match last_failure {
                Some(err) if !cancelled => err,
                _ => PlanningError::Cancelled,
            });
        };
        if failed_attempts > 0 {
            warn!(failed_attempts, attempts_run, "some attempts left a course without a slot");
        }
        info!(
            attempts = attempts_run,
            total = score.total,
            conflicts = score.student_conflicts,
            overflow = score.capacity_overflow,
            "search finished"
        );

        Ok(SearchReport {
            schedule,
            score,
            attempts_run,
            failed_attempts,
            best_history,
            cancelled,
            base_seed: self.base_seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Classroom, Course, ExamCalendar, TimeSlot};
    use crate::progress::NoProgress;
    use crate::scheduler::time_slots::{DayTemplate, TimeSlotGenerator};
    use crate::scheduler::EnrollmentIndex;
    use chrono::{NaiveDate, NaiveTime};
    use std::collections::HashSet;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn slots(days: u32, per_day: &[u32]) -> Vec<TimeSlot> {
        let times = per_day
            .iter()
            .map(|&h| NaiveTime::from_hms_opt(h, 0, 0).unwrap())
            .collect();
        TimeSlotGenerator::new(
            ExamCalendar::new(date(6), date(6 + days - 1)),
            DayTemplate::new(times),
            75,
        )
        .generate()
    }

    fn set(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    /// Parallel-mode input where student conflicts are possible.
    fn conflicting_input() -> PlanningInput {
        let mut enrollments = EnrollmentIndex::new();
        enrollments.insert("C0".into(), set(&["a", "b"]));
        enrollments.insert("C1".into(), set(&["b", "c"]));
        enrollments.insert("C2".into(), set(&["c", "d"]));
        enrollments.insert("C3".into(), set(&["d", "e"]));
        PlanningInput::new(
            (0..4)
                .map(|i| Course::new(format!("C{i}")).with_enrolled(2))
                .collect(),
            vec![
                Classroom::new("R1").with_capacity(5),
                Classroom::new("R2").with_capacity(40),
                Classroom::new("R3").with_capacity(3),
            ],
            slots(2, &[10, 14]),
            enrollments,
        )
    }

    fn params(attempts: u32) -> PlanningParams {
        PlanningParams::new("D", date(6), date(7))
            .with_parallel_exams(true)
            .with_max_attempts(attempts)
    }

    #[test]
    fn test_best_history_never_regresses() {
        let input = conflicting_input();
        let p = params(30);
        let report = AttemptManager::new(&input, &p, 100).run(&mut NoProgress).unwrap();

        assert_eq!(report.best_history.len() as u32, report.attempts_run);
        assert_eq!(report.failed_attempts, 0);
        assert!(report.best_history.windows(2).all(|w| w[1] <= w[0]));
        assert!((report.best_history.last().copied().unwrap() - report.score.total).abs() < 1e-10);
    }

    #[test]
    fn test_best_schedule_matches_reported_score() {
        let input = conflicting_input();
        let p = params(10);
        let report = AttemptManager::new(&input, &p, 7).run(&mut NoProgress).unwrap();
        let rescored = ScheduleScorer::new(p.weights).score(&report.schedule, &input.enrollments);
        assert_eq!(rescored, report.score);
    }

    #[test]
    fn test_stops_early_on_ideal_schedule() {
        // Sequential mode with ample rooms: the first attempt is already ideal.
        let input = PlanningInput::new(
            (0..3).map(|i| Course::new(format!("C{i}")).with_enrolled(10)).collect(),
            vec![Classroom::new("R1").with_capacity(50)],
            slots(2, &[10, 14]),
            EnrollmentIndex::new(),
        );
        let p = PlanningParams::new("D", date(6), date(7)).with_max_attempts(25);
        let report = AttemptManager::new(&input, &p, 1).run(&mut NoProgress).unwrap();
        assert_eq!(report.attempts_run, 1);
        assert!(report.score.is_ideal());
        assert!(!report.cancelled);
    }

    #[test]
    fn test_progress_reported_per_attempt() {
        let input = conflicting_input();
        let mut p = params(5);
        p.weights.load_balance = 1.0;
        let mut updates: Vec<(u8, String)> = Vec::new();
        let mut sink = |pct: u8, msg: &str| updates.push((pct, msg.to_string()));
        let report = AttemptManager::new(&input, &p, 3)
            .with_progress_band(40, 90)
            .run(&mut sink)
            .unwrap();

        assert_eq!(updates.len() as u32, report.attempts_run);
        assert!(updates.iter().all(|(pct, _)| (40..=90).contains(pct)));
        assert!(updates.windows(2).all(|w| w[0].0 <= w[1].0));
        assert!(updates[0].1.starts_with("Attempt 1/5"));
    }

    #[test]
    fn test_cancel_before_first_attempt() {
        let input = conflicting_input();
        let p = params(10);
        let flag = CancelFlag::new();
        flag.cancel();
        let err = AttemptManager::new(&input, &p, 0)
            .with_cancel_flag(flag)
            .run(&mut NoProgress)
            .unwrap_err();
        assert_eq!(err, PlanningError::Cancelled);
    }

    #[test]
    fn test_cancel_mid_search_keeps_best() {
        let input = conflicting_input();
        let mut p = params(50);
        p.weights.load_balance = 1.0;
        let flag = CancelFlag::new();
        let trigger = flag.clone();
        let mut seen = 0;
        let mut sink = |_: u8, _: &str| {
            seen += 1;
            if seen == 2 {
                trigger.cancel();
            }
        };
        let report = AttemptManager::new(&input, &p, 0)
            .with_cancel_flag(flag)
            .run(&mut sink)
            .unwrap();
        // Unless an ideal schedule ended the run first, it stops after two attempts.
        assert!(report.attempts_run <= 2);
        assert!(report.cancelled || report.score.is_ideal());
    }

    /// One day with 10:00, 11:00 and 12:00 starts. `C0` runs two hours, so a
    /// schedule is complete only when `C0` is placed last. `C1` overflows its
    /// room, so no attempt is ideal.
    fn order_sensitive_input() -> (PlanningInput, PlanningParams) {
        let input = PlanningInput::new(
            vec![
                Course::new("C0").with_enrolled(10),
                Course::new("C1").with_enrolled(200),
                Course::new("C2").with_enrolled(10),
            ],
            vec![Classroom::new("R1").with_capacity(50)],
            slots(1, &[10, 11, 12]),
            EnrollmentIndex::new(),
        );
        let mut p = PlanningParams::new("D", date(6), date(6))
            .with_duration_override("C0", 120)
            .with_max_attempts(20);
        p.default_duration_minutes = 60;
        (input, p)
    }

    #[test]
    fn test_failed_attempts_do_not_abort_search() {
        let (input, p) = order_sensitive_input();
        let builder = ExamAssignmentBuilder::new(&input, &p);
        // A base seed whose first attempt fails and whose second succeeds.
        let base = (0..500u64)
            .find(|&s| builder.build(s).is_err() && builder.build(s + 1).is_ok())
            .unwrap();

        let mut updates = 0u32;
        let mut sink = |_: u8, _: &str| updates += 1;
        let report = AttemptManager::new(&input, &p, base).run(&mut sink).unwrap();

        assert_eq!(report.attempts_run, 20);
        assert!(report.failed_attempts >= 1);
        assert!(report.failed_attempts < report.attempts_run);
        assert_eq!(updates, report.attempts_run);
        assert_eq!(
            report.best_history.len() as u32,
            report.attempts_run - 1,
            "history starts at the first complete schedule"
        );
        assert_eq!(report.schedule.assignment_count(), 3);
        assert_eq!(report.score.student_conflicts, 0);
        assert_eq!(report.score.capacity_overflow, 150);
    }

    #[test]
    fn test_every_attempt_failing_reports_slots_exhausted() {
        // Two two-hour exams cannot share a morning with 10:00 and 11:00 starts.
        let input = PlanningInput::new(
            vec![Course::new("C0").with_enrolled(5), Course::new("C1").with_enrolled(5)],
            vec![Classroom::new("R1").with_capacity(50)],
            slots(1, &[10, 11]),
            EnrollmentIndex::new(),
        );
        let p = PlanningParams::new("D", date(6), date(6))
            .with_duration_override("C0", 120)
            .with_duration_override("C1", 120)
            .with_max_attempts(6);
        let mut updates: Vec<String> = Vec::new();
        let mut sink = |_: u8, msg: &str| updates.push(msg.to_string());
        let err = AttemptManager::new(&input, &p, 0).run(&mut sink).unwrap_err();

        assert!(matches!(err, PlanningError::SlotsExhausted { .. }));
        assert_eq!(updates.len(), 6);
        assert!(updates.iter().all(|m| m.ends_with("no complete schedule yet")));
    }

    #[test]
    fn test_structural_failure_propagates() {
        let input = PlanningInput::new(
            vec![Course::new("C0").with_enrolled(1)],
            vec![],
            slots(1, &[10]),
            EnrollmentIndex::new(),
        );
        let p = params(10);
        let err = AttemptManager::new(&input, &p, 0).run(&mut NoProgress).unwrap_err();
        assert!(matches!(err, PlanningError::NoClassrooms { .. }));
    }
}
