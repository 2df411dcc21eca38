//! Assignment record and related types
//!
//! An Assignment is one unit of academic work. Static attributes (subject, name,
//! weight, size, group settings) never change after creation; `deadline` and
//! `real_duration` count down while a schedule runs.

use serde::{Deserialize, Serialize};

/// Size code for a large assignment.
pub const SIZE_LARGE: i32 = 1;
/// Size code for a medium assignment.
pub const SIZE_MEDIUM: i32 = 2;
/// Size code for a small assignment.
pub const SIZE_SMALL: i32 = 3;

/// One unit of academic work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    //=== Identity ===
    /// Row id assigned by the store; 0 until persisted
    pub id: i64,

    //=== Static attributes ===
    pub subject: String,
    pub name: String,

    /// Days remaining until the assignment is due
    pub deadline: i32,

    /// Total hours as originally authored
    pub duration: i32,

    /// Grade weight as a percentage
    pub weight: f64,

    /// 1 = large, 2 = medium, 3 = small
    pub size: i32,

    pub group_work: bool,

    /// Members sharing the work; values below 1 are treated as 1
    pub group_size: i32,

    //=== Runtime State ===
    /// Remaining effort in hours
    pub real_duration: i32,

    /// Scheduling score, only meaningful inside a scheduling pass
    #[serde(skip)]
    pub priority: i32,
}

impl Assignment {
    /// Create a new, not-yet-persisted assignment.
    ///
    /// Remaining effort is derived as `duration / group_size` (integer division).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        subject: &str,
        name: &str,
        deadline: i32,
        duration: i32,
        weight: f64,
        size: i32,
        group_work: bool,
        group_size: i32,
    ) -> Self {
        let mut assignment = Self {
            id: 0,
            subject: subject.to_string(),
            name: name.to_string(),
            deadline,
            duration,
            weight,
            size,
            group_work,
            group_size,
            real_duration: 0,
            priority: 0,
        };
        assignment.real_duration = assignment.derived_duration();
        assignment
    }

    /// Solo assignment with a group size of one.
    pub fn solo(subject: &str, name: &str, deadline: i32, duration: i32, weight: f64, size: i32) -> Self {
        Self::new(subject, name, deadline, duration, weight, size, false, 1)
    }

    /// Set the row id (builder style, used when rehydrating from storage).
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Override remaining effort with a persisted value.
    pub fn with_remaining(mut self, remaining: i32) -> Self {
        self.real_duration = remaining;
        self
    }

    /// Group size used for effort division.
    pub fn effective_group_size(&self) -> i32 {
        self.group_size.max(1)
    }

    /// Remaining effort as derived from the authored duration.
    pub fn derived_duration(&self) -> i32 {
        self.duration / self.effective_group_size()
    }

    /// True once the assignment has an id from storage.
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    /// Reduce remaining effort. May go negative.
    pub fn decrease_duration(&mut self, hours: i32) {
        self.real_duration -= hours;
    }

    /// Reduce days remaining. May go negative.
    pub fn decrease_deadline(&mut self, days: i32) {
        self.deadline -= days;
    }

    /// No effort left.
    pub fn is_complete(&self) -> bool {
        self.real_duration <= 0
    }

    /// Deadline has passed.
    pub fn is_overdue(&self) -> bool {
        self.deadline <= 0
    }

    /// Human readable size label.
    pub fn size_label(&self) -> &'static str {
        match self.size {
            SIZE_LARGE => "Large",
            SIZE_MEDIUM => "Medium",
            SIZE_SMALL => "Small",
            _ => "Unknown",
        }
    }

    /// Check the fields a user can get wrong at entry time.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.name.trim().is_empty() {
            return Err(crate::error::PlanrError::InvalidAssignment("name is empty".to_string()));
        }
        if self.duration < 0 {
            return Err(crate::error::PlanrError::InvalidAssignment(format!(
                "duration must not be negative (got {})",
                self.duration
            )));
        }
        if !self.weight.is_finite() {
            return Err(crate::error::PlanrError::InvalidAssignment("weight must be a number".to_string()));
        }
        Ok(())
    }
}

impl Default for Assignment {
    fn default() -> Self {
        Self::new("N/A", "N/A", 0, 1, 0.0, SIZE_SMALL, false, 1)
    }
}
