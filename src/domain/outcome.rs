//! Scheduling run outcome types.
//!
//! This module defines what a scheduling run reports back: the hour-by-hour
//! allocations, which assignments were completed or missed, and any
//! non-fatal warnings raised by collaborators along the way.

use serde::Serialize;
use thiserror::Error;

/// One simulated hour given to one assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Allocation {
    /// Store id of the assignment (0 if never persisted)
    pub assignment_id: i64,
    /// Assignment name, used as the calendar event title
    pub title: String,
    /// Days since the run started (day 1 is offset 0)
    pub day_offset: u32,
    /// Hour index within the day, starting at 0
    pub hour: u32,
}

/// How an assignment left the working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// Remaining effort reached zero
    Completed,
    /// Deadline reached zero first
    Missed,
}

/// An assignment that left the working set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub assignment_id: i64,
    pub name: String,
    pub resolution: Resolution,
    /// Simulated day it was resolved on; 0 means before the first day
    pub day: u32,
    /// Remaining effort at that point (positive for missed work)
    pub remaining: i32,
}

/// A collaborator failure that did not stop the run.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum RunWarning {
    #[error("failed to record remaining effort {remaining}h for assignment {id}: {message}")]
    StorageUpdate { id: i64, remaining: i32, message: String },

    #[error("failed to delete assignment {id} from storage: {message}")]
    StorageDelete { id: i64, message: String },

    #[error("failed to export '{title}' (day {day_offset}, hour {hour}) to calendar: {message}")]
    CalendarWrite {
        title: String,
        day_offset: u32,
        hour: u32,
        message: String,
    },
}

/// Per-day slice of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayPlan {
    /// Simulated day, starting at 1
    pub day: u32,
    /// Hour budget that applied to this day
    pub budget: u32,
    pub allocations: Vec<Allocation>,
    pub completed: Vec<Resolved>,
    pub missed: Vec<Resolved>,
}

impl DayPlan {
    /// Hours actually used (can be below budget when work runs out).
    pub fn hours_used(&self) -> usize {
        self.allocations.len()
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleSummary {
    pub days: Vec<DayPlan>,
    /// Resolutions decided before day 1 (already finished or already overdue)
    pub preresolved: Vec<Resolved>,
    pub warnings: Vec<RunWarning>,
}

impl ScheduleSummary {
    /// All allocations in order.
    pub fn allocations(&self) -> impl Iterator<Item = &Allocation> {
        self.days.iter().flat_map(|d| d.allocations.iter())
    }

    pub fn total_hours(&self) -> usize {
        self.days.iter().map(DayPlan::hours_used).sum()
    }

    /// Every assignment that finished.
    pub fn completed(&self) -> impl Iterator<Item = &Resolved> {
        self.resolved().filter(|r| r.resolution == Resolution::Completed)
    }

    /// Every assignment whose deadline passed.
    pub fn missed(&self) -> impl Iterator<Item = &Resolved> {
        self.resolved().filter(|r| r.resolution == Resolution::Missed)
    }

    fn resolved(&self) -> impl Iterator<Item = &Resolved> {
        self.preresolved
            .iter()
            .chain(self.days.iter().flat_map(|d| d.completed.iter().chain(d.missed.iter())))
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
