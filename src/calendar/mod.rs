//! Calendar export for scheduled study hours.
//!
//! Every allocated hour becomes exactly one calendar event. The scheduler talks
//! to a `CalendarSink`; `IcsCalendar` writes an iCalendar file and
//! `NullCalendar` drops events when no calendar is wanted.

mod ics;

use crate::domain::Allocation;
use crate::error::Result;

pub use ics::{DEFAULT_ANCHOR_HOUR, IcsCalendar, escape_text, event_uid, fold_line, format_event};

/// Receives one call per allocated hour.
pub trait CalendarSink {
    fn add_event(&mut self, allocation: &Allocation) -> Result<()>;
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCalendar;

impl CalendarSink for NullCalendar {
    fn add_event(&mut self, _allocation: &Allocation) -> Result<()> {
        Ok(())
    }
}
