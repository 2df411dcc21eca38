//! SQLite-backed assignment store.
//!
//! One `assignments` table holds every assignment. The authored `duration`
//! and the live `remaining` effort are separate columns so a reload never
//! recomputes remaining effort from the original duration.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, Params, Row, params};

use crate::domain::Assignment;
use crate::error::{PlanrError, Result};
use crate::store::AssignmentRepository;

/// Row orderings offered for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Insertion order
    #[default]
    Id,
    /// Shortest deadline first
    Deadline,
    /// Most remaining effort first
    Duration,
}

impl SortOrder {
    fn order_by(&self) -> &'static str {
        match self {
            SortOrder::Id => "id ASC",
            SortOrder::Deadline => "deadline ASC, id ASC",
            SortOrder::Duration => "remaining DESC, id ASC",
        }
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, subject, name, deadline, duration, remaining, weight, size, group_work, group_size FROM assignments";

/// AssignmentStore manages assignment rows in SQLite.
pub struct AssignmentStore {
    /// Database file, None for in-memory stores
    path: Option<PathBuf>,

    db: Connection,
}

impl AssignmentStore {
    /// Open or create the store at the given database path.
    ///
    /// Parent directories are created as needed.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let db = Connection::open(db_path)
            .map_err(|e| PlanrError::Storage(format!("failed to open {}: {}", db_path.display(), e)))?;
        Self::init_schema(&db)?;
        log::debug!("Opened assignment store at {}", db_path.display());

        Ok(Self {
            path: Some(db_path.to_path_buf()),
            db,
        })
    }

    /// Open a throwaway in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory()?;
        Self::init_schema(&db)?;
        Ok(Self { path: None, db })
    }

    /// Initialize the SQLite schema.
    fn init_schema(db: &Connection) -> Result<()> {
        db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS assignments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                subject TEXT NOT NULL,
                name TEXT NOT NULL,
                deadline INTEGER NOT NULL,
                duration INTEGER NOT NULL,
                remaining INTEGER NOT NULL,
                weight REAL NOT NULL,
                size INTEGER NOT NULL,
                group_work BOOLEAN NOT NULL,
                group_size INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_assignments_subject ON assignments(subject);
            CREATE INDEX IF NOT EXISTS idx_assignments_deadline ON assignments(deadline);
            "#,
        )?;
        Ok(())
    }

    fn row_to_assignment(row: &Row<'_>) -> rusqlite::Result<Assignment> {
        Ok(Assignment {
            id: row.get(0)?,
            subject: row.get(1)?,
            name: row.get(2)?,
            deadline: row.get(3)?,
            duration: row.get(4)?,
            real_duration: row.get(5)?,
            weight: row.get(6)?,
            size: row.get(7)?,
            group_work: row.get(8)?,
            group_size: row.get(9)?,
            priority: 0,
        })
    }

    fn query_assignments<P: Params>(&self, sql: &str, params: P) -> Result<Vec<Assignment>> {
        let mut stmt = self.db.prepare(sql)?;
        let rows = stmt.query_map(params, Self::row_to_assignment)?;

        let mut assignments = Vec::new();
        for row in rows {
            assignments.push(row?);
        }
        Ok(assignments)
    }

    /// Insert a new assignment and return its id.
    ///
    /// The stored remaining effort is the assignment's current `real_duration`.
    pub fn insert(&mut self, assignment: &Assignment) -> Result<i64> {
        assignment.validate()?;
        self.db.execute(
            r#"
            INSERT INTO assignments
            (subject, name, deadline, duration, remaining, weight, size, group_work, group_size)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                assignment.subject,
                assignment.name,
                assignment.deadline,
                assignment.duration,
                assignment.real_duration,
                assignment.weight,
                assignment.size,
                assignment.group_work,
                assignment.group_size,
            ],
        )?;
        let id = self.db.last_insert_rowid();
        log::info!("Inserted assignment {} ('{}')", id, assignment.name);
        Ok(id)
    }

    /// Get an assignment by id.
    pub fn get(&self, id: i64) -> Result<Option<Assignment>> {
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let result = self.db.query_row(&sql, [id], Self::row_to_assignment);

        match result {
            Ok(assignment) => Ok(Some(assignment)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all assignments in insertion order.
    pub fn list_all(&self) -> Result<Vec<Assignment>> {
        self.list_sorted(SortOrder::Id)
    }

    /// List all assignments in the given order.
    pub fn list_sorted(&self, order: SortOrder) -> Result<Vec<Assignment>> {
        let sql = format!("{} ORDER BY {}", SELECT_COLUMNS, order.order_by());
        self.query_assignments(&sql, params![])
    }

    /// List assignments for one subject in insertion order.
    pub fn list_by_subject(&self, subject: &str) -> Result<Vec<Assignment>> {
        self.list_subject_sorted(subject, SortOrder::Id)
    }

    /// List assignments for one subject in the given order.
    pub fn list_subject_sorted(&self, subject: &str, order: SortOrder) -> Result<Vec<Assignment>> {
        let sql = format!("{} WHERE subject = ?1 ORDER BY {}", SELECT_COLUMNS, order.order_by());
        self.query_assignments(&sql, [subject])
    }

    /// List assignments with the shortest deadline first.
    pub fn list_by_deadline(&self) -> Result<Vec<Assignment>> {
        self.list_sorted(SortOrder::Deadline)
    }

    /// List assignments with the most remaining effort first.
    pub fn list_by_duration(&self) -> Result<Vec<Assignment>> {
        self.list_sorted(SortOrder::Duration)
    }

    /// Set the remaining effort of an assignment.
    pub fn update_remaining(&mut self, id: i64, remaining: i32) -> Result<()> {
        let changed = self
            .db
            .execute("UPDATE assignments SET remaining = ?1 WHERE id = ?2", params![remaining, id])?;
        if changed == 0 {
            return Err(PlanrError::AssignmentNotFound(id));
        }
        log::debug!("Assignment {} now has {}h remaining", id, remaining);
        Ok(())
    }

    /// Delete an assignment by id.
    pub fn delete(&mut self, id: i64) -> Result<()> {
        let changed = self.db.execute("DELETE FROM assignments WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(PlanrError::AssignmentNotFound(id));
        }
        log::info!("Deleted assignment {}", id);
        Ok(())
    }

    /// Count stored assignments.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self.db.query_row("SELECT COUNT(*) FROM assignments", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Database file backing this store.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl AssignmentRepository for AssignmentStore {
    fn load_all(&self) -> Result<Vec<Assignment>> {
        self.list_all()
    }

    fn update_remaining_effort(&mut self, id: i64, remaining: i32) -> Result<()> {
        self.update_remaining(id, remaining)
    }

    fn delete(&mut self, id: i64) -> Result<()> {
        AssignmentStore::delete(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SIZE_LARGE, SIZE_MEDIUM, SIZE_SMALL};
    use tempfile::TempDir;

    fn create_temp_store() -> (AssignmentStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = AssignmentStore::open(&temp_dir.path().join("assignments.db")).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_open_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("planr").join("assignments.db");
        let store = AssignmentStore::open(&db_path).unwrap();

        assert!(db_path.exists());
        assert_eq!(store.path(), Some(db_path.as_path()));
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let (mut store, _temp) = create_temp_store();

        let first = store.insert(&Assignment::solo("Math", "HW 1", 3, 2, 5.0, SIZE_SMALL)).unwrap();
        let second = store.insert(&Assignment::solo("Math", "HW 2", 4, 2, 5.0, SIZE_SMALL)).unwrap();

        assert!(first > 0);
        assert!(second > first);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_insert_rejects_invalid() {
        let (mut store, _temp) = create_temp_store();
        let result = store.insert(&Assignment::solo("Math", "", 3, 2, 5.0, SIZE_SMALL));
        assert!(matches!(result, Err(PlanrError::InvalidAssignment(_))));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_round_trip_preserves_static_attributes() {
        let (mut store, _temp) = create_temp_store();
        let original = Assignment::new("History", "Group essay", 9, 12, 17.5, SIZE_LARGE, true, 4);

        let id = store.insert(&original).unwrap();
        let loaded = store.get(id).unwrap().unwrap();

        assert_eq!(loaded, original.clone().with_id(id));
        assert_eq!(loaded.real_duration, 3);
        assert!(loaded.group_work);
    }

    #[test]
    fn test_reload_uses_persisted_remaining_effort() {
        let (mut store, _temp) = create_temp_store();
        let id = store
            .insert(&Assignment::solo("Physics", "Lab", 6, 10, 12.0, SIZE_MEDIUM))
            .unwrap();

        store.update_remaining(id, 4).unwrap();
        let loaded = store.get(id).unwrap().unwrap();

        assert_eq!(loaded.duration, 10);
        assert_eq!(loaded.real_duration, 4);
    }

    #[test]
    fn test_get_nonexistent() {
        let (store, _temp) = create_temp_store();
        assert!(store.get(999).unwrap().is_none());
    }

    #[test]
    fn test_update_nonexistent() {
        let (mut store, _temp) = create_temp_store();
        let result = store.update_remaining(999, 1);
        assert!(matches!(result, Err(PlanrError::AssignmentNotFound(999))));
    }

    #[test]
    fn test_delete() {
        let (mut store, _temp) = create_temp_store();
        let id = store.insert(&Assignment::solo("Art", "Sketch", 2, 1, 0.0, SIZE_SMALL)).unwrap();

        store.delete(id).unwrap();
        assert!(store.get(id).unwrap().is_none());
        assert!(matches!(store.delete(id), Err(PlanrError::AssignmentNotFound(_))));
    }

    #[test]
    fn test_list_by_subject() {
        let (mut store, _temp) = create_temp_store();
        store.insert(&Assignment::solo("Math", "HW 1", 3, 2, 5.0, SIZE_SMALL)).unwrap();
        store.insert(&Assignment::solo("Art", "Sketch", 2, 1, 0.0, SIZE_SMALL)).unwrap();
        store.insert(&Assignment::solo("Math", "HW 2", 5, 2, 5.0, SIZE_SMALL)).unwrap();

        let math = store.list_by_subject("Math").unwrap();
        assert_eq!(math.len(), 2);
        assert!(math.iter().all(|a| a.subject == "Math"));
        assert!(store.list_by_subject("Chemistry").unwrap().is_empty());
    }

    #[test]
    fn test_list_subject_sorted() {
        let (mut store, _temp) = create_temp_store();
        store.insert(&Assignment::solo("Math", "Later", 9, 2, 0.0, SIZE_SMALL)).unwrap();
        store.insert(&Assignment::solo("Art", "Sketch", 1, 9, 0.0, SIZE_SMALL)).unwrap();
        store.insert(&Assignment::solo("Math", "Soon", 1, 5, 0.0, SIZE_SMALL)).unwrap();

        let names = |list: Vec<Assignment>| list.into_iter().map(|a| a.name).collect::<Vec<_>>();

        assert_eq!(names(store.list_subject_sorted("Math", SortOrder::Id).unwrap()), vec!["Later", "Soon"]);
        assert_eq!(names(store.list_subject_sorted("Math", SortOrder::Deadline).unwrap()), vec!["Soon", "Later"]);
        assert_eq!(names(store.list_subject_sorted("Math", SortOrder::Duration).unwrap()), vec!["Soon", "Later"]);
    }

    #[test]
    fn test_list_orderings() {
        let (mut store, _temp) = create_temp_store();
        store.insert(&Assignment::solo("S", "Later", 9, 2, 0.0, SIZE_SMALL)).unwrap();
        store.insert(&Assignment::solo("S", "Soon", 1, 5, 0.0, SIZE_SMALL)).unwrap();
        store.insert(&Assignment::solo("S", "Middle", 4, 8, 0.0, SIZE_SMALL)).unwrap();

        let names = |list: Vec<Assignment>| list.into_iter().map(|a| a.name).collect::<Vec<_>>();

        assert_eq!(names(store.list_all().unwrap()), vec!["Later", "Soon", "Middle"]);
        assert_eq!(names(store.list_by_deadline().unwrap()), vec!["Soon", "Middle", "Later"]);
        assert_eq!(names(store.list_by_duration().unwrap()), vec!["Middle", "Soon", "Later"]);
    }

    #[test]
    fn test_persistence_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("assignments.db");

        {
            let mut store = AssignmentStore::open(&db_path).unwrap();
            store.insert(&Assignment::solo("Math", "Persistent", 3, 2, 5.0, SIZE_SMALL)).unwrap();
        }

        {
            let store = AssignmentStore::open(&db_path).unwrap();
            let all = store.list_all().unwrap();
            assert_eq!(all.len(), 1);
            assert_eq!(all[0].name, "Persistent");
        }
    }

    #[test]
    fn test_in_memory_store_implements_repository() {
        let mut store = AssignmentStore::open_in_memory().unwrap();
        let id = store.insert(&Assignment::solo("Math", "HW", 3, 4, 5.0, SIZE_SMALL)).unwrap();

        let repo: &mut dyn AssignmentRepository = &mut store;
        repo.update_remaining_effort(id, 2).unwrap();
        assert_eq!(repo.load_all().unwrap()[0].real_duration, 2);
        repo.delete(id).unwrap();
        assert!(repo.load_all().unwrap().is_empty());
        assert!(store.path().is_none());
    }
}
