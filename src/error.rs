//! Error types and result aliases for the activities crate.
//!
//! The recorder facade never fails: tracing must be switchable off without any
//! behavioural change to the scheduler. [`ActivitiesError`] only surfaces from the
//! edges that parse external input, namely identifier strings and configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActivitiesError {
    #[error("Invalid node id: {0}")]
    InvalidNodeId(String),

    #[error("Invalid application id: {0}")]
    InvalidApplicationId(String),

    #[error("Invalid container id: {0}")]
    InvalidContainerId(String),

    #[error("Unknown activity state: {0}")]
    UnknownState(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ActivitiesError>;
