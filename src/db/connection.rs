use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::config::DatabaseConfig;
use crate::error::MatrixError;

use super::migrations;

/// Open an existing database. Returns error if not initialized.
pub fn open_db(config: &DatabaseConfig) -> Result<Connection, MatrixError> {
    let path = Path::new(&config.path);
    if !path.exists() {
        return Err(MatrixError::not_initialized(&config.path));
    }
    let conn = Connection::open(path)?;
    configure_connection(&conn, config.busy_timeout_ms)?;
    // Idempotent; also applies indexes added after `init`.
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// Initialize the database: create directories, database, and run migrations.
pub fn init_db(config: &DatabaseConfig) -> Result<PathBuf, MatrixError> {
    let path = PathBuf::from(&config.path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| MatrixError::database(e.to_string()))?;
    }
    let conn = Connection::open(&path)?;
    configure_connection(&conn, config.busy_timeout_ms)?;
    migrations::run_migrations(&conn)?;
    Ok(path)
}

fn configure_connection(conn: &Connection, busy_timeout_ms: u64) -> Result<(), MatrixError> {
    conn.execute_batch(&format!(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout={busy_timeout_ms};
         PRAGMA foreign_keys=ON;"
    ))?;
    Ok(())
}
