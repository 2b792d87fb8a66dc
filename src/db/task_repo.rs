use rusqlite::types::Type;
use rusqlite::{params, Connection};

use crate::error::MatrixError;
use crate::models::{Quadrant, Task, TaskDraft, UrgencyChange};

const TASK_COLUMNS: &str = "id, title, description, is_important, is_urgent, deadline_at,
                quadrant, completed, created_at, completed_at";

pub fn insert_task(conn: &Connection, draft: &TaskDraft) -> Result<Task, MatrixError> {
    conn.execute(
        "INSERT INTO tasks (title, description, is_important, is_urgent, deadline_at, quadrant, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            draft.title,
            draft.description,
            draft.is_important,
            draft.is_urgent,
            draft.deadline_at,
            draft.quadrant.as_str(),
            draft.created_at,
        ],
    )?;
    get_task_by_id(conn, conn.last_insert_rowid())
}

pub fn get_task_by_id(conn: &Connection, id: i64) -> Result<Task, MatrixError> {
    conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
        params![id],
        row_to_task,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => MatrixError::task_not_found(id),
        _ => MatrixError::from(e),
    })
}

pub fn list_tasks(conn: &Connection) -> Result<Vec<Task>, MatrixError> {
    let mut stmt = conn.prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id ASC"))?;
    let tasks = stmt
        .query_map([], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

/// All tasks the reconciler is allowed to touch.
pub fn list_incomplete_tasks(conn: &Connection) -> Result<Vec<Task>, MatrixError> {
    list_tasks_by_completion(conn, false)
}

pub fn list_tasks_by_completion(conn: &Connection, completed: bool) -> Result<Vec<Task>, MatrixError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE completed = ?1 ORDER BY id ASC"
    ))?;
    let tasks = stmt
        .query_map(params![completed], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

pub fn list_tasks_by_quadrant(conn: &Connection, quadrant: Quadrant) -> Result<Vec<Task>, MatrixError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE quadrant = ?1 ORDER BY id ASC"
    ))?;
    let tasks = stmt
        .query_map(params![quadrant.as_str()], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

/// Overwrite every mutable column of an existing row.
pub fn update_task(conn: &Connection, task: &Task) -> Result<(), MatrixError> {
    let changed = conn.execute(
        "UPDATE tasks SET title = ?1, description = ?2, is_important = ?3, is_urgent = ?4,
                deadline_at = ?5, quadrant = ?6, completed = ?7, completed_at = ?8
         WHERE id = ?9",
        params![
            task.title,
            task.description,
            task.is_important,
            task.is_urgent,
            task.deadline_at,
            task.quadrant.as_str(),
            task.completed,
            task.completed_at,
            task.id,
        ],
    )?;
    if changed == 0 {
        return Err(MatrixError::task_not_found(task.id));
    }
    Ok(())
}

pub fn delete_task(conn: &Connection, id: i64) -> Result<(), MatrixError> {
    let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(MatrixError::task_not_found(id));
    }
    Ok(())
}

/// Apply one reconciler change if the row still matches the inputs it was
/// computed from. Returns whether a row was written.
pub fn apply_urgency_change(conn: &Connection, change: &UrgencyChange) -> Result<bool, MatrixError> {
    let changed = conn.execute(
        "UPDATE tasks SET is_urgent = ?1, quadrant = ?2
         WHERE id = ?3 AND completed = 0 AND is_important = ?4 AND deadline_at IS ?5
           AND is_urgent = ?6 AND quadrant = ?7",
        params![
            change.is_urgent,
            change.quadrant.as_str(),
            change.id,
            change.expected_important,
            change.expected_deadline,
            change.expected_urgent,
            change.expected_quadrant.as_str(),
        ],
    )?;
    Ok(changed == 1)
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    let quadrant: String = row.get(6)?;
    let quadrant = Quadrant::from_str(&quadrant).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            Type::Text,
            format!("unknown quadrant '{quadrant}'").into(),
        )
    })?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        is_important: row.get(3)?,
        is_urgent: row.get(4)?,
        deadline_at: row.get(5)?,
        quadrant,
        completed: row.get(7)?,
        created_at: row.get(8)?,
        completed_at: row.get(9)?,
    })
}
