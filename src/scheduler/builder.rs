//! Randomized exam assignment builder.
//!
//! # Algorithm
//!
//! 1. Shuffle the course order with the attempt's seeded RNG.
//! 2. Sort classrooms ascending by capacity; draw a rotation offset.
//! 3. For each course pick a slot:
//!    - sequential mode: the next unused slot that overlaps no placed exam;
//!    - parallel mode: first fit, preferring slots where a room fits, no
//!      enrolled student sits another exam, no other exam of the same class
//!      year runs, and the daily limit holds.
//! 4. Pick classrooms among those free at that time: a fitting room
//!    (round-robin or best fit), several rooms when splitting is enabled,
//!    otherwise the largest free room (overflow is scored, not rejected).
//!
//! Classroom double booking is impossible by construction.
//!
//! # Complexity
//! O(n · s · b) where n=courses, s=slots, b=bookings overlapping a slot.

use chrono::{NaiveDate, NaiveDateTime};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use super::EnrollmentIndex;
use crate::config::{PlanningParams, RoomSelection};
use crate::error::PlanningError;
use crate::models::{
    intervals_overlap, CandidateSchedule, Classroom, Course, ExamAssignment, TimeSlot,
};

/// Everything a scheduling run needs, loaded once and shared by all attempts.
#[derive(Debug, Clone)]
pub struct PlanningInput {
    /// Courses to schedule.
    pub courses: Vec<Course>,
    /// Candidate classrooms.
    pub classrooms: Vec<Classroom>,
    /// Generated time slots, chronological.
    pub slots: Vec<TimeSlot>,
    /// Course ID → enrolled student IDs.
    pub enrollments: EnrollmentIndex,
}

impl PlanningInput {
    /// Creates an input container.
    pub fn new(
        courses: Vec<Course>,
        classrooms: Vec<Classroom>,
        slots: Vec<TimeSlot>,
        enrollments: EnrollmentIndex,
    ) -> Self {
        Self {
            courses,
            classrooms,
            slots,
            enrollments,
        }
    }

    /// Distinct exam days covered by the slots.
    pub fn exam_days(&self) -> Vec<NaiveDate> {
        let days: BTreeSet<NaiveDate> = self.slots.iter().map(|s| s.date).collect();
        days.into_iter().collect()
    }
}

#[derive(Debug)]
struct Booking {
    course_idx: usize,
    start: NaiveDateTime,
    end: NaiveDateTime,
    rooms: Vec<usize>,
}

/// Requirements a parallel-mode slot must meet, strictest first.
#[derive(Debug, Clone, Copy)]
struct SlotRequirements {
    room_fits: bool,
    no_student_conflict: bool,
    no_same_year: bool,
    within_daily_limit: bool,
}

impl SlotRequirements {
    const fn new(room_fits: bool, no_student_conflict: bool, no_same_year: bool) -> Self {
        Self {
            room_fits,
            no_student_conflict,
            no_same_year,
            within_daily_limit: true,
        }
    }
}

/// Class-year separation is the first preference dropped, then room fit,
/// then student conflicts. The last pass accepts any slot with a free room.
const PARALLEL_PASSES: [SlotRequirements; 5] = [
    SlotRequirements::new(true, true, true),
    SlotRequirements::new(true, true, false),
    SlotRequirements::new(false, true, false),
    SlotRequirements::new(false, false, false),
    SlotRequirements {
        room_fits: false,
        no_student_conflict: false,
        no_same_year: false,
        within_daily_limit: false,
    },
];

/// Builds one candidate schedule per seed.
///
/// Deterministic for a fixed seed; different seeds give different
/// course orders and room rotations.
#[derive(Debug)]
pub struct ExamAssignmentBuilder<'a> {
    input: &'a PlanningInput,
    params: &'a PlanningParams,
    /// Classroom indices sorted ascending by (capacity, id).
    rooms_by_capacity: Vec<usize>,
}

impl<'a> ExamAssignmentBuilder<'a> {
    /// Creates a builder over prepared input.
    pub fn new(input: &'a PlanningInput, params: &'a PlanningParams) -> Self {
        let mut rooms_by_capacity: Vec<usize> = (0..input.classrooms.len()).collect();
        rooms_by_capacity.sort_by(|&a, &b| {
            let (ra, rb) = (&input.classrooms[a], &input.classrooms[b]);
            ra.capacity.cmp(&rb.capacity).then_with(|| ra.id.cmp(&rb.id))
        });
        Self {
            input,
            params,
            rooms_by_capacity,
        }
    }

    /// Builds a schedule using `seed` for every random choice.
    ///
    /// # Errors
    /// - [`PlanningError::NoClassrooms`] if the input has no classrooms.
    /// - [`PlanningError::SlotsExhausted`] if a course fits in no slot.
    pub fn build(&self, seed: u64) -> Result<CandidateSchedule, PlanningError> {
        if self.rooms_by_capacity.is_empty() {
            return Err(PlanningError::NoClassrooms {
                scope: format!("department '{}'", self.params.department_id),
            });
        }

        let mut rng = SmallRng::seed_from_u64(seed);
        let mut order: Vec<usize> = (0..self.input.courses.len()).collect();
        order.shuffle(&mut rng);
        let rotation = rng.random_range(0..self.rooms_by_capacity.len());

        let mut schedule = CandidateSchedule::new(self.input.exam_days(), seed);
        let mut bookings: Vec<Booking> = Vec::with_capacity(order.len());
        let mut slot_used = vec![false; self.input.slots.len()];
        let mut day_counts: HashMap<NaiveDate, u32> = HashMap::new();

        for (turn, &course_idx) in order.iter().enumerate() {
            let course = &self.input.courses[course_idx];
            let duration = self.params.duration_for(&course.id);

            let found = if self.params.no_parallel_exams {
                self.next_sequential_slot(&slot_used, &bookings, duration)
            } else {
                self.first_parallel_slot(course_idx, &bookings, &day_counts, duration)
            };
            let slot_idx = found.ok_or_else(|| PlanningError::SlotsExhausted {
                course_id: course.id.clone(),
            })?;

            let slot = self.input.slots[slot_idx];
            let (start, end) = (slot.starts_at(), slot.ends_at(duration));
            let free = self.free_rooms(&bookings, start, end);
            let rooms = self.choose_rooms(course.enrolled_count, &free, rotation + turn);

            let capacity: u32 = rooms.iter().map(|&r| self.input.classrooms[r].capacity).sum();
            let room_ids: Vec<String> = rooms
                .iter()
                .map(|&r| self.input.classrooms[r].id.clone())
                .collect();

            debug!(
                course = course.label(),
                slot = %slot.starts_at(),
                rooms = ?room_ids,
                enrolled = course.enrolled_count,
                capacity,
                "exam placed"
            );

            schedule.add_assignment(
                ExamAssignment::new(&course.id, slot, room_ids[0].clone(), course.enrolled_count, capacity)
                    .with_classrooms(room_ids)
                    .with_course_labels(&course.code, &course.name)
                    .with_instructor(course.instructor.clone())
                    .with_exam_type(&self.params.exam_type)
                    .with_duration(duration),
            );

            slot_used[slot_idx] = true;
            *day_counts.entry(slot.date).or_insert(0) += 1;
            bookings.push(Booking {
                course_idx,
                start,
                end,
                rooms,
            });
        }

        Ok(schedule)
    }

    /// Next unused slot whose exam interval is clear of every booking.
    fn next_sequential_slot(
        &self,
        slot_used: &[bool],
        bookings: &[Booking],
        duration: u32,
    ) -> Option<usize> {
        self.input.slots.iter().enumerate().position(|(idx, slot)| {
            let (start, end) = (slot.starts_at(), slot.ends_at(duration));
            !slot_used[idx]
                && !bookings
                    .iter()
                    .any(|b| intervals_overlap(start, end, b.start, b.end))
        })
    }

    /// First slot meeting the strictest satisfiable set of requirements.
    fn first_parallel_slot(
        &self,
        course_idx: usize,
        bookings: &[Booking],
        day_counts: &HashMap<NaiveDate, u32>,
        duration: u32,
    ) -> Option<usize> {
        let enrolled = self.input.courses[course_idx].enrolled_count;

        PARALLEL_PASSES.iter().find_map(|req| {
            self.input.slots.iter().position(|slot| {
                let (start, end) = (slot.starts_at(), slot.ends_at(duration));
                let free = self.free_rooms(bookings, start, end);
                if free.is_empty() {
                    return false;
                }
                if req.within_daily_limit {
                    if let Some(limit) = self.params.daily_exam_limit {
                        if day_counts.get(&slot.date).copied().unwrap_or(0) >= limit {
                            return false;
                        }
                    }
                }
                if req.room_fits && !self.rooms_can_hold(&free, enrolled) {
                    return false;
                }
                if req.no_student_conflict
                    && self.has_student_conflict(course_idx, bookings, start, end)
                {
                    return false;
                }
                if req.no_same_year && self.has_same_year(course_idx, bookings, start, end) {
                    return false;
                }
                true
            })
        })
    }

    /// Classroom indices (ascending capacity) with no booking overlapping `[start, end)`.
    fn free_rooms(&self, bookings: &[Booking], start: NaiveDateTime, end: NaiveDateTime) -> Vec<usize> {
        self.rooms_by_capacity
            .iter()
            .copied()
            .filter(|room| {
                !bookings.iter().any(|b| {
                    b.rooms.contains(room) && intervals_overlap(start, end, b.start, b.end)
                })
            })
            .collect()
    }

    fn rooms_can_hold(&self, free: &[usize], enrolled: u32) -> bool {
        let capacity = |r: &usize| self.input.classrooms[*r].capacity;
        if self.params.split_across_rooms {
            free.iter().map(capacity).sum::<u32>() >= enrolled
        } else {
            free.iter().map(capacity).any(|c| c >= enrolled)
        }
    }

    fn has_student_conflict(
        &self,
        course_idx: usize,
        bookings: &[Booking],
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> bool {
        let Some(students) = self.input.enrollments.get(&self.input.courses[course_idx].id) else {
            return false;
        };
        bookings
            .iter()
            .filter(|b| intervals_overlap(start, end, b.start, b.end))
            .filter_map(|b| self.input.enrollments.get(&self.input.courses[b.course_idx].id))
            .any(|other| !students.is_disjoint(other))
    }

    /// Whether an overlapping booking belongs to the same class year.
    fn has_same_year(
        &self,
        course_idx: usize,
        bookings: &[Booking],
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> bool {
        let year = self.input.courses[course_idx].class_year;
        bookings
            .iter()
            .filter(|b| intervals_overlap(start, end, b.start, b.end))
            .any(|b| self.input.courses[b.course_idx].class_year == year)
    }

    /// Picks classrooms from `free` (ascending capacity, non-empty).
    fn choose_rooms(&self, enrolled: u32, free: &[usize], turn: usize) -> Vec<usize> {
        let capacity = |r: usize| self.input.classrooms[r].capacity;
        let fitting: Vec<usize> = free.iter().copied().filter(|&r| capacity(r) >= enrolled).collect();

        if !fitting.is_empty() {
            let pick = match self.params.room_selection {
                RoomSelection::BestFit => fitting[0],
                RoomSelection::RoundRobin => fitting[turn % fitting.len()],
            };
            return vec![pick];
        }

        if self.params.split_across_rooms {
            let mut chosen = Vec::new();
            let mut covered = 0u32;
            for &r in free {
                if covered >= enrolled {
                    break;
                }
                chosen.push(r);
                covered += capacity(r);
            }
            return chosen;
        }

        // Largest free room; the shortfall is penalised by the scorer.
        free.last().map(|&r| vec![r]).unwrap_or_default()
    }
}
