//! Task use cases shared by the HTTP API and the CLI.

pub mod task_service;

pub use task_service::TaskService;
