//! Storage layer for Planr.
//!
//! Assignments are persisted as rows in a SQLite table, addressed by integer id.
//! The scheduler only sees the `AssignmentRepository` trait, so a run can be
//! driven from the SQLite store or from any other record source.
//!
//! # Example
//!
//! ```ignore
//! use planr::domain::Assignment;
//! use planr::store::AssignmentStore;
//!
//! let mut store = AssignmentStore::open(Path::new("assignments.db"))?;
//! let id = store.insert(&Assignment::solo("Math", "Problem set 3", 5, 6, 10.0, 2))?;
//! let by_deadline = store.list_by_deadline()?;
//! ```

mod assignment_store;
mod json_file;

use crate::domain::Assignment;
use crate::error::Result;

pub use assignment_store::{AssignmentStore, SortOrder};
pub use json_file::{parse_assignments, read_assignments, to_json_string, write_assignments};

/// What the scheduler needs from a record store.
pub trait AssignmentRepository {
    /// Every stored assignment, with remaining effort as last persisted.
    fn load_all(&self) -> Result<Vec<Assignment>>;

    /// Persist the remaining effort after an allocated hour.
    fn update_remaining_effort(&mut self, id: i64, remaining: i32) -> Result<()>;

    /// Remove a completed or missed assignment.
    fn delete(&mut self, id: i64) -> Result<()>;
}
