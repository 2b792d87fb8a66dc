//! Task CRUD use cases.
//!
//! Every write computes `is_urgent`/`quadrant` synchronously through
//! [`crate::classify`], so a row is consistent the moment it is stored.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::debug;

use crate::classify::{classify, classify_flagged, Classification};
use crate::db::TaskStore;
use crate::error::MatrixError;
use crate::models::{
    CompletionStatus, CreateTask, Quadrant, Task, TaskDraft, TaskStats, UpdateTask,
};

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<Task>, MatrixError> {
        self.store.list()
    }

    pub fn get(&self, id: i64) -> Result<Task, MatrixError> {
        self.store.get(id)
    }

    /// Create a task classified against `reference`.
    pub fn create(&self, req: CreateTask, reference: NaiveDate) -> Result<Task, MatrixError> {
        validate_title(&req.title)?;
        validate_description(req.description.as_deref())?;

        let Classification {
            is_urgent,
            quadrant,
        } = classify_write(
            req.is_important,
            Some(req.is_urgent),
            req.deadline_at,
            reference,
        );

        let task = self.store.insert(TaskDraft {
            title: req.title,
            description: req.description,
            is_important: req.is_important,
            is_urgent,
            deadline_at: req.deadline_at,
            quadrant,
            created_at: Utc::now(),
        })?;
        debug!(id = task.id, quadrant = %task.quadrant, "task created");
        Ok(task)
    }

    /// Apply a partial update; reclassifies when importance, urgency or the
    /// deadline is part of the update.
    pub fn update(
        &self,
        id: i64,
        req: UpdateTask,
        reference: NaiveDate,
    ) -> Result<Task, MatrixError> {
        if let Some(title) = req.title.as_deref() {
            validate_title(title)?;
        }
        if let Some(description) = &req.description {
            validate_description(description.as_deref())?;
        }

        let now = Utc::now();
        let task = self.store.modify(id, &mut |task| {
            apply_update(task, &req, reference, now);
            Ok(())
        })?;
        debug!(id = task.id, quadrant = %task.quadrant, "task updated");
        Ok(task)
    }

    /// Mark a task completed. Completing twice keeps the first timestamp.
    pub fn complete(&self, id: i64) -> Result<Task, MatrixError> {
        let now = Utc::now();
        self.store.modify(id, &mut |task| {
            task.mark_completed(now);
            Ok(())
        })
    }

    pub fn delete(&self, id: i64) -> Result<(), MatrixError> {
        self.store.delete(id)?;
        debug!(id, "task deleted");
        Ok(())
    }

    pub fn by_quadrant(&self, raw: &str) -> Result<Vec<Task>, MatrixError> {
        let quadrant = Quadrant::from_str(raw).ok_or_else(|| MatrixError::invalid_quadrant(raw))?;
        self.store.list_by_quadrant(quadrant)
    }

    pub fn by_status(&self, raw: &str) -> Result<Vec<Task>, MatrixError> {
        let status =
            CompletionStatus::from_str(raw).ok_or_else(|| MatrixError::invalid_status(raw))?;
        self.store.list_by_completion(status.is_completed())
    }

    /// Search titles and descriptions; no match is a not-found error.
    pub fn search(&self, query: &str) -> Result<Vec<Task>, MatrixError> {
        if query.is_empty() {
            return Err(MatrixError::validation("Search query must not be empty"));
        }
        let found = self.store.search(query)?;
        if found.is_empty() {
            return Err(MatrixError::no_search_matches(query));
        }
        Ok(found)
    }

    pub fn stats(&self) -> Result<TaskStats, MatrixError> {
        Ok(TaskStats::from_tasks(&self.store.list()?))
    }
}

/// Urgency on write paths: a deadline always wins; without one the caller's
/// explicit flag is used, and with neither the task is not urgent.
fn classify_write(
    is_important: bool,
    explicit_urgent: Option<bool>,
    deadline: Option<NaiveDate>,
    reference: NaiveDate,
) -> Classification {
    match (deadline, explicit_urgent) {
        (Some(_), _) => classify(is_important, deadline, reference),
        (None, Some(flag)) => classify_flagged(is_important, flag),
        (None, None) => classify(is_important, None, reference),
    }
}

fn apply_update(task: &mut Task, req: &UpdateTask, reference: NaiveDate, now: chrono::DateTime<Utc>) {
    if let Some(title) = &req.title {
        task.title = title.clone();
    }
    if let Some(description) = &req.description {
        task.description = description.clone();
    }
    if let Some(important) = req.is_important {
        task.is_important = important;
    }
    if let Some(deadline) = req.deadline_at {
        task.deadline_at = deadline;
    }

    if req.affects_classification() {
        // A manual flag on a deadline-less task survives unrelated edits.
        let explicit = req.is_urgent.or(if req.deadline_at.is_some() {
            None
        } else {
            Some(task.is_urgent)
        });
        let c = classify_write(task.is_important, explicit, task.deadline_at, reference);
        task.is_urgent = c.is_urgent;
        task.quadrant = c.quadrant;
    }

    match req.completed {
        Some(true) => task.mark_completed(now),
        Some(false) => task.mark_pending(),
        None => {}
    }
}

fn validate_title(title: &str) -> Result<(), MatrixError> {
    let chars = title.chars().count();
    if title.trim().is_empty() || !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&chars) {
        return Err(MatrixError::validation(format!(
            "Title must be {TITLE_MIN_CHARS}-{TITLE_MAX_CHARS} characters, got {chars}"
        )));
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> Result<(), MatrixError> {
    if let Some(d) = description {
        let chars = d.chars().count();
        if chars > DESCRIPTION_MAX_CHARS {
            return Err(MatrixError::validation(format!(
                "Description must be at most {DESCRIPTION_MAX_CHARS} characters, got {chars}"
            )));
        }
    }
    Ok(())
}
