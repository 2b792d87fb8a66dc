use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::db::store::{TaskEdit, TaskStore};
use crate::error::MatrixError;
use crate::models::{Quadrant, Task, TaskDraft, UrgencyChange};

/// Process-local store, used by tests and throwaway runs.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    last_id: i64,
    tasks: BTreeMap<i64, Task>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>, MatrixError> {
        self.inner
            .lock()
            .map_err(|_| MatrixError::database("memory store mutex poisoned"))
    }

    fn filtered(&self, keep: impl Fn(&Task) -> bool) -> Result<Vec<Task>, MatrixError> {
        Ok(self
            .state()?
            .tasks
            .values()
            .filter(|t| keep(t))
            .cloned()
            .collect())
    }
}

impl TaskStore for MemoryStore {
    fn list(&self) -> Result<Vec<Task>, MatrixError> {
        self.filtered(|_| true)
    }

    fn list_incomplete(&self) -> Result<Vec<Task>, MatrixError> {
        self.filtered(|t| !t.completed)
    }

    fn list_by_quadrant(&self, quadrant: Quadrant) -> Result<Vec<Task>, MatrixError> {
        self.filtered(|t| t.quadrant == quadrant)
    }

    fn list_by_completion(&self, completed: bool) -> Result<Vec<Task>, MatrixError> {
        self.filtered(|t| t.completed == completed)
    }

    fn get(&self, id: i64) -> Result<Task, MatrixError> {
        self.state()?
            .tasks
            .get(&id)
            .cloned()
            .ok_or_else(|| MatrixError::task_not_found(id))
    }

    fn insert(&self, draft: TaskDraft) -> Result<Task, MatrixError> {
        let mut state = self.state()?;
        state.last_id += 1;
        let task = draft.into_task(state.last_id);
        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    fn modify(&self, id: i64, edit: &mut TaskEdit<'_>) -> Result<Task, MatrixError> {
        let mut state = self.state()?;
        let stored = state
            .tasks
            .get_mut(&id)
            .ok_or_else(|| MatrixError::task_not_found(id))?;
        // Edit a copy so a failing edit leaves the row untouched.
        let mut task = stored.clone();
        edit(&mut task)?;
        *stored = task.clone();
        Ok(task)
    }

    fn delete(&self, id: i64) -> Result<(), MatrixError> {
        self.state()?
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| MatrixError::task_not_found(id))
    }

    fn commit_batch(&self, changes: &[UrgencyChange]) -> Result<usize, MatrixError> {
        let mut state = self.state()?;
        let mut applied = 0;
        for change in changes {
            if let Some(task) = state.tasks.get_mut(&change.id) {
                if change.applies_to(task) {
                    task.is_urgent = change.is_urgent;
                    task.quadrant = change.quadrant;
                    applied += 1;
                }
            }
        }
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::{NaiveDate, Utc};

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.into(),
            description: None,
            is_important: true,
            is_urgent: false,
            deadline_at: None,
            quadrant: Quadrant::Q2,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = MemoryStore::new();
        let first = store.insert(draft("First task")).unwrap();
        store.delete(first.id).unwrap();
        let second = store.insert(draft("Second task")).unwrap();
        assert!(second.id > first.id);
        assert_eq!(store.get(first.id).unwrap_err().code, ErrorCode::TaskNotFound);
    }

    #[test]
    fn failed_edit_leaves_row_untouched() {
        let store = MemoryStore::new();
        let task = store.insert(draft("Keep me")).unwrap();
        let result = store.modify(task.id, &mut |t| {
            t.title = "Mutated".into();
            Err(MatrixError::validation("rejected"))
        });
        assert!(result.is_err());
        assert_eq!(store.get(task.id).unwrap().title, "Keep me");
    }

    #[test]
    fn commit_batch_ignores_completed_and_deleted_rows() {
        let store = MemoryStore::new();
        let open = store.insert(draft("Open task")).unwrap();
        let done = store.insert(draft("Done task")).unwrap();
        let gone = store.insert(draft("Gone task")).unwrap();
        store
            .modify(done.id, &mut |t| {
                t.mark_completed(Utc::now());
                Ok(())
            })
            .unwrap();
        store.delete(gone.id).unwrap();

        let changes: Vec<_> = [open.id, done.id, gone.id]
            .into_iter()
            .map(|id| UrgencyChange {
                id,
                is_urgent: true,
                quadrant: Quadrant::Q1,
                expected_important: true,
                expected_deadline: None,
                expected_urgent: false,
                expected_quadrant: Quadrant::Q2,
            })
            .collect();
        assert_eq!(store.commit_batch(&changes).unwrap(), 1);
        assert_eq!(store.get(open.id).unwrap().quadrant, Quadrant::Q1);
        assert_eq!(store.get(done.id).unwrap().quadrant, Quadrant::Q2);
    }

    #[test]
    fn same_plan_committed_twice_applies_once() {
        let store = MemoryStore::new();
        let task = store
            .insert(TaskDraft {
                deadline_at: NaiveDate::from_ymd_opt(2026, 1, 3),
                ..draft("Book venue")
            })
            .unwrap();
        let reference = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let plan = crate::reconcile::plan_changes(&store.list_incomplete().unwrap(), reference);

        assert_eq!(store.commit_batch(&plan).unwrap(), 1);
        assert_eq!(store.commit_batch(&plan).unwrap(), 0);
        assert!(store.get(task.id).unwrap().is_urgent);
    }
}
