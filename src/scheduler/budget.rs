//! Daily study-hour budgets.

use serde::{Deserialize, Serialize};

/// Hours available per simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyBudget {
    pub weekday_hours: u32,
    pub weekend_hours: u32,
}

impl StudyBudget {
    pub fn new(weekday_hours: u32, weekend_hours: u32) -> Self {
        Self {
            weekday_hours,
            weekend_hours,
        }
    }

    /// Hour budget for a simulated day (first day is 1).
    pub fn hours_for_day(&self, day: u32) -> u32 {
        if is_weekend_day(day) {
            self.weekend_hours
        } else {
            self.weekday_hours
        }
    }
}

/// Weekend rule over the simulation day counter.
///
/// Days divisible by 6 or by 7 use the weekend budget. This is not a calendar
/// week: it yields weekend days 6, 7, 12, 14, 18, 21, 24, ...
pub fn is_weekend_day(day: u32) -> bool {
    day % 6 == 0 || day % 7 == 0
}
