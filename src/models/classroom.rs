//! Classroom model.
//!
//! A classroom is both a bookable resource (capacity, one exam at a time)
//! and a seating grid (`rows × columns` desks, numbered from 1).
//!
//! # Checkerboard Spacing
//! A seat `(row, column)` is *active* iff `(row + column) mod 2 == 0`.
//! No two active seats are horizontally or vertically adjacent, so an
//! active-only seating plan leaves an empty desk between neighbours.

use serde::{Deserialize, Serialize};

/// An exam room with a rectangular seating grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classroom {
    /// Unique classroom identifier.
    pub id: String,
    /// Short code (e.g., "A-301").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Owning department.
    pub department_id: String,
    /// Exam capacity (students). Must not exceed `rows * columns`.
    pub capacity: u32,
    /// Number of seat rows.
    pub rows: u32,
    /// Number of seat columns.
    pub columns: u32,
}

impl Classroom {
    /// Creates a classroom with the given ID and an empty grid.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: String::new(),
            name: String::new(),
            department_id: String::new(),
            capacity: 0,
            rows: 0,
            columns: 0,
        }
    }

    /// Sets the code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the owning department.
    pub fn with_department(mut self, department_id: impl Into<String>) -> Self {
        self.department_id = department_id.into();
        self
    }

    /// Sets the exam capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the grid shape.
    pub fn with_grid(mut self, rows: u32, columns: u32) -> Self {
        self.rows = rows;
        self.columns = columns;
        self
    }

    /// Total desks in the grid.
    #[inline]
    pub fn grid_size(&self) -> u32 {
        self.rows * self.columns
    }

    /// Whether `(row, column)` lies inside the grid (1-based).
    #[inline]
    pub fn contains_seat(&self, row: u32, column: u32) -> bool {
        (1..=self.rows).contains(&row) && (1..=self.columns).contains(&column)
    }

    /// Whether the seat is usable under checkerboard spacing.
    #[inline]
    pub fn is_active_seat(row: u32, column: u32) -> bool {
        (row + column) % 2 == 0
    }

    /// All active seats in row-major order.
    pub fn active_seats(&self) -> Vec<(u32, u32)> {
        (1..=self.rows)
            .flat_map(|row| (1..=self.columns).map(move |column| (row, column)))
            .filter(|&(row, column)| Self::is_active_seat(row, column))
            .collect()
    }

    /// Students this room can seat under checkerboard spacing.
    ///
    /// The smaller of the active-seat count and the declared capacity.
    pub fn spaced_capacity(&self) -> u32 {
        let active = (self.grid_size() + 1) / 2;
        // (1,1) is active, so odd-sized grids get the extra seat.
        active.min(self.capacity)
    }
}
