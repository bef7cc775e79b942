use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{DomainError, DomainResult, Shift};

use super::ProblemInstance;

/// One cell of the roster grid in wire form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssignmentCell {
    pub nurse_id: String,
    pub date: NaiveDate,
    pub shift: Shift,
}

/// Dense roster grid: one shift per (nurse, day), nurse-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    nurses: usize,
    days: usize,
    cells: Vec<Shift>,
}

impl Assignment {
    /// Grid with every cell set to `Off`.
    pub fn new_off(nurses: usize, days: usize) -> Self {
        Self {
            nurses,
            days,
            cells: vec![Shift::Off; nurses * days],
        }
    }

    pub fn nurse_count(&self) -> usize {
        self.nurses
    }

    pub fn day_count(&self) -> usize {
        self.days
    }

    pub fn get(&self, nurse: usize, day: usize) -> Shift {
        self.cells[nurse * self.days + day]
    }

    pub fn set(&mut self, nurse: usize, day: usize, shift: Shift) {
        self.cells[nurse * self.days + day] = shift;
    }

    /// Number of (nurse, day) cells on which the two grids disagree.
    pub fn hamming_distance(&self, other: &Assignment) -> usize {
        self.cells
            .iter()
            .zip(other.cells.iter())
            .filter(|(a, b)| a != b)
            .count()
    }

    /// Builds a grid from a flat cell list, enforcing that every
    /// (nurse, date) of the instance appears exactly once.
    pub fn from_cells(cells: &[AssignmentCell], instance: &ProblemInstance) -> DomainResult<Self> {
        let nurses = instance.nurse_count();
        let days = instance.day_count();
        let mut seen: Vec<Option<Shift>> = vec![None; nurses * days];

        for cell in cells {
            let nurse = instance.nurse_position(&cell.nurse_id).ok_or_else(|| {
                DomainError::Validation(format!("assignments: unknown nurse id {}", cell.nurse_id))
            })?;
            let day = instance.day_offset(cell.date).ok_or_else(|| {
                DomainError::Validation(format!(
                    "assignments: date {} is outside {}-{:02}",
                    cell.date, instance.year, instance.month
                ))
            })?;
            let slot = &mut seen[nurse * days + day];
            if slot.is_some() {
                return Err(DomainError::Validation(format!(
                    "assignments: duplicate cell for nurse {} on {}",
                    cell.nurse_id, cell.date
                )));
            }
            *slot = Some(cell.shift);
        }

        let mut grid = Assignment::new_off(nurses, days);
        for nurse in 0..nurses {
            for day in 0..days {
                match seen[nurse * days + day] {
                    Some(shift) => grid.set(nurse, day, shift),
                    None => {
                        return Err(DomainError::Validation(format!(
                            "assignments: missing cell for nurse {} on {}",
                            instance.nurses[nurse].id, instance.dates[day]
                        )))
                    }
                }
            }
        }
        Ok(grid)
    }

    /// Flattens the grid back into wire cells, nurse-major then by date.
    pub fn to_cells(&self, instance: &ProblemInstance) -> Vec<AssignmentCell> {
        let mut cells = Vec::with_capacity(self.nurses * self.days);
        for nurse in 0..self.nurses {
            for day in 0..self.days {
                cells.push(AssignmentCell {
                    nurse_id: instance.nurses[nurse].id.clone(),
                    date: instance.dates[day],
                    shift: self.get(nurse, day),
                });
            }
        }
        cells
    }
}
