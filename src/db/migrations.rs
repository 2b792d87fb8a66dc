use rusqlite::Connection;

use crate::error::MatrixError;

pub fn run_migrations(conn: &Connection) -> Result<(), MatrixError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL CHECK (length(title) BETWEEN 3 AND 100),
            description TEXT CHECK (description IS NULL OR length(description) <= 500),
            is_important INTEGER NOT NULL DEFAULT 0,
            is_urgent INTEGER NOT NULL DEFAULT 0,
            deadline_at TEXT,
            quadrant TEXT NOT NULL
                CHECK (quadrant IN ('Q1', 'Q2', 'Q3', 'Q4')),
            completed INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            completed_at TEXT,
            CHECK (completed = 1 OR completed_at IS NULL)
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_completed_quadrant ON tasks(completed, quadrant);
        ",
    )?;
    Ok(())
}
