//! Scheduler module for study-hour allocation.
//!
//! This module provides:
//! - **Priority calculation**: scores an assignment from its deadline, slack,
//!   grade weight and size against the day's hour budget.
//! - **Budgets**: weekday/weekend hour budgets over the simulation day counter.
//! - **ScheduleRun / Planner**: the greedy day-by-day allocation loop.
//!
//! # Architecture
//!
//! The run owns every assignment in a single arena:
//! 1. Priorities for the whole working set are recomputed at the start of each day
//! 2. A fresh max-priority queue of arena indices hands out that day's hours
//! 3. Each hour is forwarded to the calendar sink and to storage
//! 4. At the end of the day every remaining deadline drops by one
//!
//! # Example
//!
//! ```ignore
//! use planr::calendar::NullCalendar;
//! use planr::scheduler::{Planner, StudyBudget};
//! use planr::store::AssignmentStore;
//!
//! let mut store = AssignmentStore::open(Path::new("assignments.db"))?;
//! let summary = Planner::new(StudyBudget::new(3, 6)).run_from_store(&mut store, &mut NullCalendar)?;
//! ```

mod budget;
mod priority;
mod run;

pub use budget::{StudyBudget, is_weekend_day};
pub use priority::{
    DEADLINE_BANDS, SIZE_LARGE_SCORE, SIZE_MEDIUM_SCORE, SIZE_SMALL_SCORE, SLACK_BANDS, WEIGHT_BANDS,
    calculate_priority, deadline_score, size_score, slack, slack_score, weight_score,
};
pub use run::{Planner, RunState, ScheduleRun};
