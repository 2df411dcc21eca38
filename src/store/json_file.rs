//! JSON import/export of assignments.
//!
//! The file is an array of objects:
//!
//! ```json
//! [{"subject": "Math", "name": "HW 3", "deadline": 4, "duration": 6,
//!   "weight": 10.0, "size": 2, "group_work": false, "group_size": 1}]
//! ```
//!
//! `remaining` is optional; when absent the remaining effort is derived from
//! `duration / group_size`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::Assignment;
use crate::error::Result;

fn default_group_size() -> i32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AssignmentDoc {
    subject: String,
    name: String,
    deadline: i32,
    duration: i32,
    weight: f64,
    size: i32,
    #[serde(default)]
    group_work: bool,
    #[serde(default = "default_group_size")]
    group_size: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    remaining: Option<i32>,
}

impl From<AssignmentDoc> for Assignment {
    fn from(doc: AssignmentDoc) -> Self {
        let assignment = Assignment::new(
            &doc.subject,
            &doc.name,
            doc.deadline,
            doc.duration,
            doc.weight,
            doc.size,
            doc.group_work,
            doc.group_size,
        );
        match doc.remaining {
            Some(remaining) => assignment.with_remaining(remaining),
            None => assignment,
        }
    }
}

impl From<&Assignment> for AssignmentDoc {
    fn from(a: &Assignment) -> Self {
        Self {
            subject: a.subject.clone(),
            name: a.name.clone(),
            deadline: a.deadline,
            duration: a.duration,
            weight: a.weight,
            size: a.size,
            group_work: a.group_work,
            group_size: a.group_size,
            remaining: (a.real_duration != a.derived_duration()).then_some(a.real_duration),
        }
    }
}

/// Parse assignments from a JSON string. Ids are left at 0.
pub fn parse_assignments(json: &str) -> Result<Vec<Assignment>> {
    let docs: Vec<AssignmentDoc> = serde_json::from_str(json)?;
    Ok(docs.into_iter().map(Assignment::from).collect())
}

/// Render assignments as pretty-printed JSON.
pub fn to_json_string(assignments: &[Assignment]) -> Result<String> {
    let docs: Vec<AssignmentDoc> = assignments.iter().map(AssignmentDoc::from).collect();
    Ok(serde_json::to_string_pretty(&docs)?)
}

/// Read assignments from a JSON file.
pub fn read_assignments(path: &Path) -> Result<Vec<Assignment>> {
    let content = fs::read_to_string(path)?;
    let assignments = parse_assignments(&content)?;
    log::info!("Read {} assignments from {}", assignments.len(), path.display());
    Ok(assignments)
}

/// Write assignments to a JSON file, replacing its contents.
pub fn write_assignments(path: &Path, assignments: &[Assignment]) -> Result<()> {
    fs::write(path, to_json_string(assignments)?)?;
    log::info!("Wrote {} assignments to {}", assignments.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SIZE_MEDIUM, SIZE_SMALL};
    use tempfile::TempDir;

    #[test]
    fn test_parse_derives_remaining() {
        let json = r#"[
            {"subject": "Math", "name": "HW 3", "deadline": 4, "duration": 6,
             "weight": 10.0, "size": 2, "group_work": true, "group_size": 2}
        ]"#;
        let assignments = parse_assignments(json).unwrap();
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].real_duration, 3);
        assert_eq!(assignments[0].id, 0);
        assert_eq!(assignments[0].size, SIZE_MEDIUM);
    }

    #[test]
    fn test_parse_defaults_group_fields() {
        let json = r#"[{"subject": "Art", "name": "Sketch", "deadline": 2, "duration": 3, "weight": 0, "size": 3}]"#;
        let assignments = parse_assignments(json).unwrap();
        assert!(!assignments[0].group_work);
        assert_eq!(assignments[0].group_size, 1);
        assert_eq!(assignments[0].real_duration, 3);
    }

    #[test]
    fn test_parse_keeps_explicit_remaining() {
        let json = r#"[{"subject": "Art", "name": "Sketch", "deadline": 2, "duration": 8,
                        "weight": 0, "size": 3, "remaining": 1}]"#;
        let assignments = parse_assignments(json).unwrap();
        assert_eq!(assignments[0].duration, 8);
        assert_eq!(assignments[0].real_duration, 1);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_assignments("{not json").is_err());
        assert!(parse_assignments(r#"[{"subject": "Art"}]"#).is_err());
    }

    #[test]
    fn test_export_omits_untouched_remaining() {
        let a = Assignment::solo("Math", "HW", 3, 4, 5.0, SIZE_SMALL);
        let json = to_json_string(&[a.clone()]).unwrap();
        assert!(!json.contains("remaining"));

        let worked = a.with_remaining(1);
        let json = to_json_string(&[worked]).unwrap();
        assert!(json.contains("\"remaining\": 1"));
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("assignments.json");
        let assignments = vec![
            Assignment::new("Bio", "Poster", 7, 9, 22.0, SIZE_MEDIUM, true, 3),
            Assignment::solo("Math", "HW", 3, 4, 5.0, SIZE_SMALL).with_remaining(2),
        ];

        write_assignments(&path, &assignments).unwrap();
        let loaded = read_assignments(&path).unwrap();

        assert_eq!(loaded, assignments);
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(read_assignments(&temp_dir.path().join("missing.json")).is_err());
    }
}
