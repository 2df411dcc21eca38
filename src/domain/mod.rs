//! Domain types for Planr
//!
//! This module contains the core domain types:
//! - Assignment: one unit of academic work with its countdown state
//! - Allocation / DayPlan / ScheduleSummary: what a scheduling run produces
//! - RunWarning: non-fatal collaborator failures surfaced with the summary

pub mod assignment;
pub mod outcome;

pub use assignment::{Assignment, SIZE_LARGE, SIZE_MEDIUM, SIZE_SMALL};
pub use outcome::{Allocation, DayPlan, Resolution, Resolved, RunWarning, ScheduleSummary};
