//! Priority calculation for study scheduling.
//!
//! An assignment's score is the sum of four independent bands:
//! - Deadline urgency (fewer days left scores higher)
//! - Slack: study hours available before the deadline minus remaining effort
//! - Grade weight
//! - Size (large > medium > small)
//!
//! Each band contributes only its highest matching tier. Thresholds are strict.

use crate::domain::{Assignment, SIZE_LARGE, SIZE_MEDIUM, SIZE_SMALL};

/// Deadline band: (days strictly below, score).
pub const DEADLINE_BANDS: [(i32, i32); 4] = [(2, 10), (4, 8), (6, 6), (8, 4)];

/// Slack band: (slack hours strictly below, score).
pub const SLACK_BANDS: [(i32, i32); 3] = [(2, 20), (4, 15), (6, 10)];

/// Weight band: (weight strictly above, score).
pub const WEIGHT_BANDS: [(f64, i32); 3] = [(20.0, 6), (15.0, 4), (10.0, 2)];

pub const SIZE_LARGE_SCORE: i32 = 3;
pub const SIZE_MEDIUM_SCORE: i32 = 2;
pub const SIZE_SMALL_SCORE: i32 = 1;

/// Study hours left before the deadline minus the remaining effort.
///
/// Computed in `i64` and clamped to the `i32` range.
pub fn slack(assignment: &Assignment, study_hours_per_day: i32) -> i32 {
    let hours = i64::from(assignment.deadline) * i64::from(study_hours_per_day) - i64::from(assignment.real_duration);
    hours.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

pub fn deadline_score(deadline: i32) -> i32 {
    DEADLINE_BANDS
        .iter()
        .find(|(below, _)| deadline < *below)
        .map_or(0, |(_, score)| *score)
}

pub fn slack_score(slack: i32) -> i32 {
    SLACK_BANDS
        .iter()
        .find(|(below, _)| slack < *below)
        .map_or(0, |(_, score)| *score)
}

pub fn weight_score(weight: f64) -> i32 {
    WEIGHT_BANDS
        .iter()
        .find(|(above, _)| weight > *above)
        .map_or(0, |(_, score)| *score)
}

pub fn size_score(size: i32) -> i32 {
    match size {
        SIZE_LARGE => SIZE_LARGE_SCORE,
        SIZE_MEDIUM => SIZE_MEDIUM_SCORE,
        SIZE_SMALL => SIZE_SMALL_SCORE,
        _ => 0,
    }
}

/// Calculate the priority score for an assignment given today's hour budget.
///
/// Higher scores are scheduled first. Pure: depends only on the deadline,
/// remaining effort, weight and size of the assignment plus the budget.
pub fn calculate_priority(assignment: &Assignment, study_hours_per_day: i32) -> i32 {
    deadline_score(assignment.deadline)
        + slack_score(slack(assignment, study_hours_per_day))
        + weight_score(assignment.weight)
        + size_score(assignment.size)
}
