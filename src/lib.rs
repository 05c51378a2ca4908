//! Planner - a small personal task planner.
//!
//! The library holds everything that is not presentation: the persisted
//! task collection ([`store`]), field validation ([`validation`]), dashboard
//! aggregation ([`dashboard`]), search and display preferences. The `planner`
//! binary layers a CLI and a terminal dashboard on top.

pub mod config;
pub mod dashboard;
pub mod preferences;
pub mod search;
pub mod storage;
pub mod store;
pub mod task;
pub mod validation;

pub use store::{ImportMode, TaskStore};
pub use task::{NewTask, Task, TaskDraft, TaskPatch};

/// Library-level error type for planner operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("{}", .0.join("\n"))]
    Validation(Vec<String>),

    #[error("Import failed: {0}")]
    Import(String),

    #[error("Task id counter exhausted")]
    IdsExhausted,

    #[error("Invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for planner operations.
pub type Result<T> = std::result::Result<T, Error>;
