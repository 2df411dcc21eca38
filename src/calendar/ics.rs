//! iCalendar (.ics) file writer.
//!
//! Each allocation becomes a one-hour VEVENT starting at
//! `start_date + day_offset` at the anchor hour, plus the hour index.
//! Times are written as floating local times.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use sha2::{Digest, Sha256};

use crate::calendar::CalendarSink;
use crate::domain::Allocation;
use crate::error::{PlanrError, Result};

/// Hour of day the first study hour starts at.
pub const DEFAULT_ANCHOR_HOUR: u32 = 9;

const LOCAL_FORMAT: &str = "%Y%m%dT%H%M%S";
const UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const MAX_LINE_OCTETS: usize = 75;

/// Writes study hours to an .ics file as they are scheduled.
pub struct IcsCalendar {
    path: PathBuf,
    writer: BufWriter<File>,
    /// Start of hour 0 on day offset 0
    origin: NaiveDateTime,
    /// DTSTAMP shared by every event in the file
    stamp: String,
    events: usize,
}

impl IcsCalendar {
    /// Create (or truncate) the calendar file and write its header.
    ///
    /// Fails if the file cannot be opened; nothing should be scheduled then.
    pub fn create(path: &Path, start_date: NaiveDate, anchor_hour: u32) -> Result<Self> {
        let origin = start_date
            .and_hms_opt(anchor_hour, 0, 0)
            .ok_or_else(|| PlanrError::Calendar(format!("anchor hour {} is not a valid hour", anchor_hour)))?;

        let open_err = |e: std::io::Error| PlanrError::Calendar(format!("cannot open {}: {}", path.display(), e));
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(open_err)?;
        }
        let file = File::create(path).map_err(open_err)?;

        let mut calendar = Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            origin,
            stamp: Utc::now().format(UTC_FORMAT).to_string(),
            events: 0,
        };
        calendar
            .writer
            .write_all(b"BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Planr//Study Schedule//EN\r\nCALSCALE:GREGORIAN\r\n")?;
        log::info!("Writing calendar to {}", path.display());
        Ok(calendar)
    }

    /// Start time of the event for an allocation, `None` if out of the calendar range.
    pub fn event_start(&self, allocation: &Allocation) -> Option<NaiveDateTime> {
        event_start(self.origin, allocation)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Events written so far.
    pub fn events_written(&self) -> usize {
        self.events
    }

    /// Write the footer and flush. Returns the file path.
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer.write_all(b"END:VCALENDAR\r\n")?;
        self.writer.flush()?;
        log::info!("Wrote {} events to {}", self.events, self.path.display());
        Ok(self.path)
    }
}

impl CalendarSink for IcsCalendar {
    fn add_event(&mut self, allocation: &Allocation) -> Result<()> {
        let start = self.event_start(allocation).ok_or_else(|| {
            PlanrError::Calendar(format!(
                "day {} hour {} is outside the calendar range",
                allocation.day_offset, allocation.hour
            ))
        })?;
        let event = format_event(allocation, start, &self.stamp);
        self.writer.write_all(event.as_bytes())?;
        self.events += 1;
        Ok(())
    }
}

fn event_start(origin: NaiveDateTime, allocation: &Allocation) -> Option<NaiveDateTime> {
    origin
        .checked_add_signed(Duration::try_days(i64::from(allocation.day_offset))?)?
        .checked_add_signed(Duration::try_hours(i64::from(allocation.hour))?)
        .filter(|start| start.checked_add_signed(Duration::hours(1)).is_some())
}

/// Render one VEVENT block (CRLF line endings, folded) lasting one hour.
pub fn format_event(allocation: &Allocation, start: NaiveDateTime, stamp: &str) -> String {
    let end = start.checked_add_signed(Duration::hours(1)).unwrap_or(start);
    [
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}", event_uid(allocation)),
        format!("DTSTAMP:{}", stamp),
        format!("DTSTART:{}", start.format(LOCAL_FORMAT)),
        format!("DTEND:{}", end.format(LOCAL_FORMAT)),
        format!("SUMMARY:{}", escape_text(&allocation.title)),
        "END:VEVENT".to_string(),
    ]
    .iter()
    .map(|line| fold_line(line))
    .collect()
}

/// Fold a content line at 75 octets with CRLF + space, never splitting a
/// UTF-8 character. The result ends with CRLF.
pub fn fold_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + line.len() / 74 * 3 + 2);
    let mut width = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if width + len > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(c);
        width += len;
    }
    out.push_str("\r\n");
    out
}

/// Stable UID derived from the title and slot.
pub fn event_uid(allocation: &Allocation) -> String {
    let mut hasher = Sha256::new();
    hasher.update(allocation.title.as_bytes());
    hasher.update(allocation.day_offset.to_be_bytes());
    hasher.update(allocation.hour.to_be_bytes());
    let digest = hasher.finalize();
    format!("{}@planr", hex::encode(&digest[..8]))
}

/// Escape TEXT values per RFC 5545.
pub fn escape_text(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn allocation(title: &str, day_offset: u32, hour: u32) -> Allocation {
        Allocation {
            assignment_id: 1,
            title: title.to_string(),
            day_offset,
            hour,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_event_times() {
        let origin = date(2026, 10, 19).and_hms_opt(9, 0, 0).unwrap();
        let start = event_start(origin, &allocation("Essay", 1, 2));
        assert_eq!(start, date(2026, 10, 20).and_hms_opt(11, 0, 0));
    }

    #[test]
    fn test_event_rolls_past_midnight() {
        let origin = date(2026, 12, 31).and_hms_opt(23, 0, 0).unwrap();
        let start = event_start(origin, &allocation("Essay", 0, 2));
        assert_eq!(start, date(2027, 1, 1).and_hms_opt(1, 0, 0));
    }

    #[test]
    fn test_event_out_of_range_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut calendar = IcsCalendar::create(&temp_dir.path().join("s.ics"), date(2026, 10, 19), 9).unwrap();

        let result = calendar.add_event(&allocation("Thesis", u32::MAX, 0));
        assert!(matches!(result, Err(PlanrError::Calendar(_))));
        assert_eq!(calendar.events_written(), 0);
    }

    #[test]
    fn test_fold_line_short_lines_untouched() {
        assert_eq!(fold_line("SUMMARY:Essay"), "SUMMARY:Essay\r\n");
        let exact = "X".repeat(75);
        assert_eq!(fold_line(&exact), format!("{}\r\n", exact));
    }

    #[test]
    fn test_fold_line_long_summary() {
        let line = format!("SUMMARY:{}", "a".repeat(200));
        let folded = fold_line(&line);

        let physical: Vec<&str> = folded.trim_end_matches("\r\n").split("\r\n").collect();
        assert!(physical.len() > 1);
        assert!(physical.iter().all(|l| l.len() <= 75));
        assert!(physical[1..].iter().all(|l| l.starts_with(' ')));

        let unfolded: String = physical
            .iter()
            .enumerate()
            .map(|(i, l)| if i == 0 { *l } else { &l[1..] })
            .collect();
        assert_eq!(unfolded, line);
    }

    #[test]
    fn test_fold_line_keeps_multibyte_chars_whole() {
        let line = format!("SUMMARY:{}", "é".repeat(60));
        let folded = fold_line(&line);
        for physical in folded.split("\r\n") {
            assert!(physical.len() <= 75);
        }
        assert_eq!(folded.replace("\r\n ", ""), format!("{}\r\n", line));
    }

    #[test]
    fn test_format_event_folds_long_titles() {
        let start = date(2026, 10, 19).and_hms_opt(9, 0, 0).unwrap();
        let title = "Comparative literature essay on narrative voice in twentieth century novels";
        let event = format_event(&allocation(title, 0, 0), start, "20261017T120000Z");

        assert!(event.split("\r\n").all(|l| l.len() <= 75));
        assert!(event.replace("\r\n ", "").contains(&format!("SUMMARY:{}\r\n", title)));
    }

    #[test]
    fn test_format_event() {
        let start = date(2026, 10, 19).and_hms_opt(9, 0, 0).unwrap();
        let event = format_event(&allocation("Essay", 0, 0), start, "20261017T120000Z");

        assert!(event.starts_with("BEGIN:VEVENT\r\n"));
        assert!(event.contains("DTSTART:20261019T090000\r\n"));
        assert!(event.contains("DTEND:20261019T100000\r\n"));
        assert!(event.contains("DTSTAMP:20261017T120000Z\r\n"));
        assert!(event.contains("SUMMARY:Essay\r\n"));
        assert!(event.ends_with("END:VEVENT\r\n"));
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("Read ch. 1, 2; notes\\draft"), "Read ch. 1\\, 2\\; notes\\\\draft");
        assert_eq!(escape_text("two\nlines"), "two\\nlines");
    }

    #[test]
    fn test_event_uid_is_stable_and_slot_specific() {
        let a = event_uid(&allocation("Essay", 0, 0));
        assert_eq!(a, event_uid(&allocation("Essay", 0, 0)));
        assert_ne!(a, event_uid(&allocation("Essay", 0, 1)));
        assert_ne!(a, event_uid(&allocation("Essay", 1, 0)));
        assert!(a.ends_with("@planr"));
        assert_eq!(a.len(), 16 + "@planr".len());
    }

    #[test]
    fn test_write_calendar_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("student_schedule.ics");

        let mut calendar = IcsCalendar::create(&path, date(2026, 10, 19), 9).unwrap();
        calendar.add_event(&allocation("Essay", 0, 0)).unwrap();
        calendar.add_event(&allocation("Lab", 0, 1)).unwrap();
        calendar.add_event(&allocation("Essay", 1, 0)).unwrap();
        assert_eq!(calendar.events_written(), 3);
        let written = calendar.finish().unwrap();

        let content = fs::read_to_string(&written).unwrap();
        assert!(content.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(content.ends_with("END:VCALENDAR\r\n"));
        assert_eq!(content.matches("BEGIN:VEVENT").count(), 3);
        assert!(content.contains("DTSTART:20261019T100000"));
        assert!(content.contains("DTSTART:20261020T090000"));
    }

    #[test]
    fn test_create_fails_when_path_unusable() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let result = IcsCalendar::create(&blocker.join("schedule.ics"), date(2026, 10, 19), 9);
        assert!(matches!(result, Err(PlanrError::Calendar(_))));
    }

    #[test]
    fn test_create_rejects_bad_anchor_hour() {
        let temp_dir = TempDir::new().unwrap();
        let result = IcsCalendar::create(&temp_dir.path().join("s.ics"), date(2026, 10, 19), 24);
        assert!(matches!(result, Err(PlanrError::Calendar(_))));
    }
}
