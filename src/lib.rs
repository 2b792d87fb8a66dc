pub mod classify;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod logging;
pub mod models;
pub mod output;
pub mod reconcile;
pub mod service;

/// Version string baked in by `build.rs`.
pub const VERSION: &str = env!("MATRIX_BUILD_VERSION");
