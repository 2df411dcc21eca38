//! Planr - a priority-based study scheduler
//!
//! Planr spreads the remaining work on school assignments over daily study
//! hours, always working on the most urgent assignment first, and exports
//! every scheduled hour to a calendar.

pub mod calendar;
pub mod display;
pub mod domain;
pub mod error;
pub mod scheduler;
pub mod store;

pub use error::{PlanrError, Result};
