//! Plain-text rendering of assignment listings and schedules.

use crate::domain::{Assignment, ScheduleSummary};

const HEADERS: [&str; 10] = [
    "ID",
    "Subject",
    "Name",
    "Deadline",
    "Duration",
    "Remaining",
    "Weight",
    "Size",
    "Group Work",
    "Group Size",
];

fn row(a: &Assignment) -> [String; 10] {
    [
        a.id.to_string(),
        a.subject.clone(),
        a.name.clone(),
        a.deadline.to_string(),
        a.duration.to_string(),
        a.real_duration.to_string(),
        format!("{}%", a.weight),
        a.size_label().to_string(),
        if a.group_work { "Yes" } else { "No" }.to_string(),
        a.group_size.to_string(),
    ]
}

/// Render assignments as an aligned table.
pub fn assignment_table(assignments: &[Assignment]) -> String {
    let rows: Vec<[String; 10]> = assignments.iter().map(row).collect();

    let mut widths = HEADERS.map(str::len);
    for r in &rows {
        for (width, cell) in widths.iter_mut().zip(r.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let header = line(&HEADERS.map(String::from));
    let rule = "-".repeat(header.len());

    let mut lines = vec![header, rule];
    lines.extend(rows.iter().map(|r| line(r)));
    lines.into_iter().map(|l| l + "\n").collect()
}

/// Render a finished schedule day by day.
pub fn schedule_report(summary: &ScheduleSummary) -> String {
    let mut lines = Vec::new();

    for resolved in &summary.preresolved {
        lines.push(format!("Already {:?}: {}", resolved.resolution, resolved.name));
    }

    for day in &summary.days {
        lines.push(format!("Day {} ({}h):", day.day, day.budget));
        if day.allocations.is_empty() {
            lines.push("  (no study hours)".to_string());
        }
        for allocation in &day.allocations {
            lines.push(format!("  Hour {}: {}", allocation.hour + 1, allocation.title));
        }
        for done in &day.completed {
            lines.push(format!("  Completed: {}", done.name));
        }
        for missed in &day.missed {
            lines.push(format!(
                "  Missed deadline for assignment: {} ({}h left)",
                missed.name, missed.remaining
            ));
        }
    }

    if summary.has_warnings() {
        lines.push("Warnings:".to_string());
        lines.extend(summary.warnings.iter().map(|w| format!("  {}", w)));
    }
    lines.into_iter().map(|l| l + "\n").collect()
}
