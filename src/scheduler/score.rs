//! Schedule quality scoring.
//!
//! Evaluates a candidate schedule against the soft constraints and folds
//! the components into one scalar. **Lower total = better schedule.**
//!
//! # Components
//!
//! | Component | Definition |
//! |-----------|-----------|
//! | Student conflicts | (student, slot) pairs with ≥ 2 exams in the slot |
//! | Load variance | Population variance of exam counts over all exam days |
//! | Capacity overflow | Σ max(0, enrolled − assigned capacity) |
//! | Wasted capacity | Σ max(0, assigned capacity − enrolled) |
//! | Avg utilization | Mean of min(1, enrolled / assigned capacity) |
//!
//! `total = w_c·conflicts + w_l·variance + w_o·overflow + w_w·wasted − w_u·utilization`

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::EnrollmentIndex;
use crate::config::ScoreWeights;
use crate::models::CandidateSchedule;

/// Score of one candidate schedule with its itemized components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Weighted total (lower = better).
    pub total: f64,
    /// (student, slot) pairs with two or more simultaneous exams.
    pub student_conflicts: usize,
    /// Variance of exams per day.
    pub load_variance: f64,
    /// Students beyond assigned capacity, summed over exams.
    pub capacity_overflow: u32,
    /// Unused assigned seats, summed over exams.
    pub wasted_capacity: u32,
    /// Mean room utilization (0.0..1.0).
    pub avg_utilization: f64,
    /// Weighted conflict term.
    pub conflict_penalty: f64,
    /// Weighted load-balance term.
    pub load_penalty: f64,
    /// Weighted overflow term.
    pub overflow_penalty: f64,
    /// Weighted waste term.
    pub waste_penalty: f64,
    /// Weighted utilization bonus (subtracted).
    pub utilization_bonus: f64,
}

impl ScoreResult {
    /// No student conflicts and no overflow: nothing left worth searching for.
    pub fn is_ideal(&self) -> bool {
        self.student_conflicts == 0 && self.capacity_overflow == 0
    }

    /// Whether this score beats `other`.
    #[inline]
    pub fn is_better_than(&self, other: &Self) -> bool {
        self.total < other.total
    }

    /// One-line summary for logs and progress messages.
    pub fn summary(&self) -> String {
        format!(
            "score {:.2} (conflicts {}, overflow {}, load variance {:.2}, utilization {:.0}%)",
            self.total,
            self.student_conflicts,
            self.capacity_overflow,
            self.load_variance,
            self.avg_utilization * 100.0
        )
    }
}

/// Scores candidate schedules with fixed weights.
#[derive(Debug, Clone, Default)]
pub struct ScheduleScorer {
    weights: ScoreWeights,
}

impl ScheduleScorer {
    /// Creates a scorer.
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Scores a schedule.
    ///
    /// Pure: the same schedule and enrollments always give the same result.
    pub fn score(&self, schedule: &CandidateSchedule, enrollments: &EnrollmentIndex) -> ScoreResult {
        let student_conflicts = count_student_conflicts(schedule, enrollments);
        let load_variance = daily_load_variance(schedule);

        let mut capacity_overflow = 0u32;
        let mut wasted_capacity = 0u32;
        let mut utilization_sum = 0.0;
        for a in &schedule.assignments {
            capacity_overflow += a.overflow();
            wasted_capacity += a.wasted_capacity();
            utilization_sum += if a.assigned_capacity == 0 {
                0.0
            } else {
                (f64::from(a.enrolled) / f64::from(a.assigned_capacity)).min(1.0)
            };
        }
        let avg_utilization = if schedule.is_empty() {
            0.0
        } else {
            utilization_sum / schedule.assignment_count() as f64
        };

        let w = &self.weights;
        let conflict_penalty = w.conflict * student_conflicts as f64;
        let load_penalty = w.load_balance * load_variance;
        let overflow_penalty = w.overflow * f64::from(capacity_overflow);
        let waste_penalty = w.waste * f64::from(wasted_capacity);
        let utilization_bonus = w.utilization * avg_utilization;

        ScoreResult {
            total: conflict_penalty + load_penalty + overflow_penalty + waste_penalty
                - utilization_bonus,
            student_conflicts,
            load_variance,
            capacity_overflow,
            wasted_capacity,
            avg_utilization,
            conflict_penalty,
            load_penalty,
            overflow_penalty,
            waste_penalty,
            utilization_bonus,
        }
    }
}

/// Counts (student, slot) pairs where the student has two or more exams.
fn count_student_conflicts(schedule: &CandidateSchedule, enrollments: &EnrollmentIndex) -> usize {
    schedule
        .by_slot()
        .values()
        .map(|exams| {
            let mut per_student: HashMap<&str, usize> = HashMap::new();
            for exam in exams {
                if let Some(students) = enrollments.get(&exam.course_id) {
                    for s in students {
                        *per_student.entry(s.as_str()).or_insert(0) += 1;
                    }
                }
            }
            per_student.values().filter(|&&n| n >= 2).count()
        })
        .sum()
}

/// Population variance of exams per exam day.
fn daily_load_variance(schedule: &CandidateSchedule) -> f64 {
    let counts: Vec<f64> = schedule
        .exams_per_day()
        .values()
        .map(|&n| n as f64)
        .collect();
    if counts.is_empty() {
        return 0.0;
    }
    let n = counts.len() as f64;
    let mean = counts.iter().sum::<f64>() / n;
    counts.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n
}
