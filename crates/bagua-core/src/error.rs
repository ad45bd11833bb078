//! Error types for the scene engine.

use crate::oracle::OracleFailure;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Asset error: {0}")]
    Asset(String),

    #[error("Oracle error: {0:?}")]
    Oracle(OracleFailure),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SceneError>;
