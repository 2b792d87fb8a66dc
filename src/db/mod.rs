pub mod connection;
pub mod memory_store;
pub mod migrations;
pub mod sqlite_store;
pub mod store;
pub mod task_repo;

pub use connection::*;
pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;
pub use store::{TaskEdit, TaskStore};
