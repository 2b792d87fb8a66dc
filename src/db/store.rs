use crate::error::MatrixError;
use crate::models::{Quadrant, Task, TaskDraft, UrgencyChange};

/// Edit applied inside [`TaskStore::modify`]. Returning an error aborts the write.
pub type TaskEdit<'a> = dyn FnMut(&mut Task) -> Result<(), MatrixError> + 'a;

/// Canonical owner of task records.
///
/// Implementations serialize conflicting writes: `modify` is an atomic
/// read-modify-write of one row and `commit_batch` is all-or-nothing.
pub trait TaskStore: Send + Sync {
    fn list(&self) -> Result<Vec<Task>, MatrixError>;

    fn list_incomplete(&self) -> Result<Vec<Task>, MatrixError>;

    fn list_by_quadrant(&self, quadrant: Quadrant) -> Result<Vec<Task>, MatrixError>;

    fn list_by_completion(&self, completed: bool) -> Result<Vec<Task>, MatrixError>;

    fn get(&self, id: i64) -> Result<Task, MatrixError>;

    /// Persist a new task and return it with its assigned ID.
    fn insert(&self, draft: TaskDraft) -> Result<Task, MatrixError>;

    fn modify(&self, id: i64, edit: &mut TaskEdit<'_>) -> Result<Task, MatrixError>;

    fn delete(&self, id: i64) -> Result<(), MatrixError>;

    /// Apply reconciler changes atomically.
    ///
    /// Changes whose row was completed, deleted, or had its importance or
    /// deadline edited since the scan are skipped. Returns the number applied.
    fn commit_batch(&self, changes: &[UrgencyChange]) -> Result<usize, MatrixError>;

    /// Case-insensitive substring search over title and description.
    fn search(&self, query: &str) -> Result<Vec<Task>, MatrixError> {
        let needle = query.to_lowercase();
        Ok(self
            .list()?
            .into_iter()
            .filter(|t| t.matches_query(&needle))
            .collect())
    }
}
