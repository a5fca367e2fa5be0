//! Error type for the orchestration layer

use crate::graph::GraphError;
use mlg_walker_core::WalkError;
use thiserror::Error;

/// Errors surfaced by [`crate::random_walks`], [`crate::corrupt`] and config loading
#[derive(Error, Debug)]
pub enum WalkerError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Walk(#[from] WalkError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type WalkerResult<T> = Result<T, WalkerError>;
