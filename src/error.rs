use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotInitialized,
    TaskNotFound,
    NoSearchMatches,
    InvalidQuadrant,
    InvalidStatus,
    ValidationError,
    DatabaseError,
    StoreBusy,
    ConfigError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::NoSearchMatches => "NO_SEARCH_MATCHES",
            Self::InvalidQuadrant => "INVALID_QUADRANT",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::StoreBusy => "STORE_BUSY",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    /// Client-side mistakes that never touch stored state.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::TaskNotFound
                | Self::NoSearchMatches
                | Self::InvalidQuadrant
                | Self::InvalidStatus
                | Self::ValidationError
        )
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct MatrixError {
    pub code: ErrorCode,
    pub message: String,
}

impl MatrixError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_initialized(path: &str) -> Self {
        Self::new(
            ErrorCode::NotInitialized,
            format!("No database at {path}. Run `todo-matrix init` first."),
        )
    }

    pub fn task_not_found(id: i64) -> Self {
        Self::new(ErrorCode::TaskNotFound, format!("Task with ID {id} not found"))
    }

    pub fn no_search_matches(query: &str) -> Self {
        Self::new(
            ErrorCode::NoSearchMatches,
            format!("No tasks found matching '{query}'"),
        )
    }

    pub fn invalid_quadrant(value: &str) -> Self {
        Self::new(
            ErrorCode::InvalidQuadrant,
            format!("Invalid quadrant '{value}'. Use one of: Q1, Q2, Q3, Q4"),
        )
    }

    pub fn invalid_status(value: &str) -> Self {
        Self::new(
            ErrorCode::InvalidStatus,
            format!("Invalid status '{value}'. Use: completed or pending"),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    pub fn store_busy(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreBusy, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }
}

impl From<rusqlite::Error> for MatrixError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::SqliteFailure(ref failure, _)
                if matches!(
                    failure.code,
                    rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
                ) =>
            {
                Self::store_busy(e.to_string())
            }
            _ => Self::database(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_sqlite_failures_map_to_store_busy() {
        let busy = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            Some("database is locked".into()),
        );
        assert_eq!(MatrixError::from(busy).code, ErrorCode::StoreBusy);

        let other = rusqlite::Error::InvalidQuery;
        assert_eq!(MatrixError::from(other).code, ErrorCode::DatabaseError);
    }

    #[test]
    fn client_errors_are_classified() {
        assert!(MatrixError::task_not_found(7).code.is_client_error());
        assert!(MatrixError::invalid_quadrant("Q5").code.is_client_error());
        assert!(!MatrixError::database("boom").code.is_client_error());
        assert!(!MatrixError::store_busy("locked").code.is_client_error());
    }
}
