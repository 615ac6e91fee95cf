use std::io;
use thiserror::Error;
use tracing::{debug, error};

/// Errors raised by the in-memory store and its seed loader.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Integrity violation: {0}")]
    Integrity(String),

    #[error("Record did not serialize to a row: {0}")]
    NotARow(String),
}

impl StoreError {
    pub fn dangling(table: &str, column: &str, value: i64) -> Self {
        StoreError::Integrity(format!(
            "{}.{} = {} references a missing row",
            table, column, value
        ))
    }

    pub fn log_error(&self) {
        match self {
            StoreError::Io(e) => {
                error!("Store I/O error: {}", e);
                debug!("Store I/O error details: {:?}", e);
            }
            StoreError::Json(e) => {
                error!("Store JSON error: {}", e);
                debug!("Store JSON error details: {:?}", e);
            }
            StoreError::Integrity(e) => {
                error!("Integrity violation: {}", e);
            }
            StoreError::NotARow(e) => {
                error!("Record did not serialize to a row: {}", e);
            }
        }
    }
}
