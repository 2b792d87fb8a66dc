use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::config::DatabaseConfig;
use crate::db::connection;
use crate::db::store::{TaskEdit, TaskStore};
use crate::db::task_repo;
use crate::error::MatrixError;
use crate::models::{Quadrant, Task, TaskDraft, UrgencyChange};

/// Durable store over a single SQLite connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Open the configured database; it must already be initialized.
    pub fn open(config: &DatabaseConfig) -> Result<Self, MatrixError> {
        Ok(Self::new(connection::open_db(config)?))
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, MatrixError> {
        self.conn
            .lock()
            .map_err(|_| MatrixError::database("sqlite connection mutex poisoned"))
    }

    /// Run `f` inside `BEGIN IMMEDIATE`, rolling back on any error.
    fn in_transaction<T>(
        conn: &Connection,
        f: impl FnOnce(&Connection) -> Result<T, MatrixError>,
    ) -> Result<T, MatrixError> {
        conn.execute_batch("BEGIN IMMEDIATE")?;
        match f(conn) {
            Ok(value) => {
                if let Err(e) = conn.execute_batch("COMMIT") {
                    let _ = conn.execute_batch("ROLLBACK");
                    return Err(e.into());
                }
                Ok(value)
            }
            Err(e) => {
                let _ = conn.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }
}

impl TaskStore for SqliteStore {
    fn list(&self) -> Result<Vec<Task>, MatrixError> {
        task_repo::list_tasks(&*self.conn()?)
    }

    fn list_incomplete(&self) -> Result<Vec<Task>, MatrixError> {
        task_repo::list_incomplete_tasks(&*self.conn()?)
    }

    fn list_by_quadrant(&self, quadrant: Quadrant) -> Result<Vec<Task>, MatrixError> {
        task_repo::list_tasks_by_quadrant(&*self.conn()?, quadrant)
    }

    fn list_by_completion(&self, completed: bool) -> Result<Vec<Task>, MatrixError> {
        task_repo::list_tasks_by_completion(&*self.conn()?, completed)
    }

    fn get(&self, id: i64) -> Result<Task, MatrixError> {
        task_repo::get_task_by_id(&*self.conn()?, id)
    }

    fn insert(&self, draft: TaskDraft) -> Result<Task, MatrixError> {
        task_repo::insert_task(&*self.conn()?, &draft)
    }

    fn modify(&self, id: i64, edit: &mut TaskEdit<'_>) -> Result<Task, MatrixError> {
        let conn = self.conn()?;
        Self::in_transaction(&conn, |conn| {
            let mut task = task_repo::get_task_by_id(conn, id)?;
            edit(&mut task)?;
            task_repo::update_task(conn, &task)?;
            Ok(task)
        })
    }

    fn delete(&self, id: i64) -> Result<(), MatrixError> {
        task_repo::delete_task(&*self.conn()?, id)
    }

    fn commit_batch(&self, changes: &[UrgencyChange]) -> Result<usize, MatrixError> {
        if changes.is_empty() {
            return Ok(0);
        }
        let conn = self.conn()?;
        Self::in_transaction(&conn, |conn| {
            let mut applied = 0;
            for change in changes {
                if task_repo::apply_urgency_change(conn, change)? {
                    applied += 1;
                }
            }
            Ok(applied)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::{NaiveDate, Utc};
    use tempfile::TempDir;

    fn open_store() -> (TempDir, SqliteStore) {
        let dir = TempDir::new().unwrap();
        let config = DatabaseConfig {
            path: dir.path().join("tasks.db").to_string_lossy().into_owned(),
            busy_timeout_ms: 1000,
        };
        connection::init_db(&config).unwrap();
        let conn = connection::open_db(&config).unwrap();
        (dir, SqliteStore::new(conn))
    }

    fn draft(title: &str, important: bool, deadline: Option<NaiveDate>) -> TaskDraft {
        TaskDraft {
            title: title.into(),
            description: Some("details".into()),
            is_important: important,
            is_urgent: false,
            deadline_at: deadline,
            quadrant: if important { Quadrant::Q2 } else { Quadrant::Q4 },
            created_at: Utc::now(),
        }
    }

    #[test]
    fn open_requires_init() {
        let dir = TempDir::new().unwrap();
        let config = DatabaseConfig {
            path: dir.path().join("missing.db").to_string_lossy().into_owned(),
            busy_timeout_ms: 1000,
        };
        let err = connection::open_db(&config).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotInitialized);
    }

    #[test]
    fn insert_assigns_ids_and_round_trips_dates() {
        let (_dir, store) = open_store();
        let deadline = NaiveDate::from_ymd_opt(2026, 5, 4);
        let first = store.insert(draft("Pay taxes", true, deadline)).unwrap();
        let second = store.insert(draft("Water plants", false, None)).unwrap();

        assert!(second.id > first.id);
        let loaded = store.get(first.id).unwrap();
        assert_eq!(loaded.deadline_at, deadline);
        assert_eq!(loaded.quadrant, Quadrant::Q2);
        assert!(!loaded.completed);
        assert_eq!(loaded.created_at, first.created_at);
    }

    #[test]
    fn missing_rows_are_not_found() {
        let (_dir, store) = open_store();
        assert_eq!(store.get(42).unwrap_err().code, ErrorCode::TaskNotFound);
        assert_eq!(store.delete(42).unwrap_err().code, ErrorCode::TaskNotFound);
        let err = store.modify(42, &mut |_| Ok(())).unwrap_err();
        assert_eq!(err.code, ErrorCode::TaskNotFound);
    }

    #[test]
    fn failed_edit_rolls_back() {
        let (_dir, store) = open_store();
        let task = store.insert(draft("Review budget", true, None)).unwrap();

        let result = store.modify(task.id, &mut |t| {
            t.title = "Changed".into();
            Err(MatrixError::validation("nope"))
        });
        assert!(result.is_err());
        assert_eq!(store.get(task.id).unwrap().title, "Review budget");
    }

    #[test]
    fn filters_by_quadrant_completion_and_query() {
        let (_dir, store) = open_store();
        let a = store.insert(draft("Important thing", true, None)).unwrap();
        store.insert(draft("Trivial thing", false, None)).unwrap();
        store
            .modify(a.id, &mut |t| {
                t.mark_completed(Utc::now());
                Ok(())
            })
            .unwrap();

        assert_eq!(store.list_by_quadrant(Quadrant::Q2).unwrap().len(), 1);
        assert_eq!(store.list_by_completion(true).unwrap()[0].id, a.id);
        assert_eq!(store.list_incomplete().unwrap().len(), 1);
        assert_eq!(store.search("TRIVIAL").unwrap().len(), 1);
        assert_eq!(store.search("DETAILS").unwrap().len(), 2);
    }

    #[test]
    fn commit_batch_skips_stale_rows() {
        let (_dir, store) = open_store();
        let deadline = NaiveDate::from_ymd_opt(2026, 1, 2);
        let fresh = store.insert(draft("Ship release", true, deadline)).unwrap();
        let edited = store.insert(draft("Call vendor", true, deadline)).unwrap();
        let done = store.insert(draft("File report", true, deadline)).unwrap();

        store
            .modify(edited.id, &mut |t| {
                t.is_important = false;
                t.quadrant = Quadrant::Q4;
                Ok(())
            })
            .unwrap();
        store
            .modify(done.id, &mut |t| {
                t.mark_completed(Utc::now());
                Ok(())
            })
            .unwrap();

        let changes: Vec<_> = [fresh.id, edited.id, done.id]
            .into_iter()
            .map(|id| UrgencyChange {
                id,
                is_urgent: true,
                quadrant: Quadrant::Q1,
                expected_important: true,
                expected_deadline: deadline,
                expected_urgent: false,
                expected_quadrant: Quadrant::Q2,
            })
            .collect();

        assert_eq!(store.commit_batch(&changes).unwrap(), 1);
        assert_eq!(store.get(fresh.id).unwrap().quadrant, Quadrant::Q1);
        assert_eq!(store.get(edited.id).unwrap().quadrant, Quadrant::Q4);
        assert_eq!(store.get(done.id).unwrap().quadrant, Quadrant::Q2);
    }

    #[test]
    fn commit_batch_matches_rows_without_deadline() {
        let (_dir, store) = open_store();
        let task = store.insert(draft("Someday idea", false, None)).unwrap();
        let change = UrgencyChange {
            id: task.id,
            is_urgent: false,
            quadrant: Quadrant::Q4,
            expected_important: false,
            expected_deadline: None,
            expected_urgent: false,
            expected_quadrant: Quadrant::Q4,
        };
        assert_eq!(store.commit_batch(&[change]).unwrap(), 1);
    }

    #[test]
    fn overlapping_passes_write_each_row_once() {
        let (_dir, store) = open_store();
        let deadline = NaiveDate::from_ymd_opt(2026, 1, 3);
        let task = store.insert(draft("Renew permit", true, deadline)).unwrap();
        let reference = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();

        let first_scan = crate::reconcile::plan_changes(&store.list_incomplete().unwrap(), reference);
        let second_scan = crate::reconcile::plan_changes(&store.list_incomplete().unwrap(), reference);
        assert_eq!(first_scan.len(), 1);

        assert_eq!(store.commit_batch(&first_scan).unwrap(), 1);
        assert_eq!(store.commit_batch(&second_scan).unwrap(), 0);
        assert_eq!(store.get(task.id).unwrap().quadrant, Quadrant::Q1);
    }

    #[test]
    fn schema_rejects_inconsistent_completion() {
        let (_dir, store) = open_store();
        let task = store.insert(draft("Check constraint", true, None)).unwrap();
        let result = store.modify(task.id, &mut |t| {
            t.completed_at = Some(Utc::now());
            Ok(())
        });
        assert_eq!(result.unwrap_err().code, ErrorCode::DatabaseError);
    }
}
