//! Error types for the savings predictor
//!
//! Nothing in the prediction path propagates these to the host: callers log
//! and degrade (empty entity directory, skipped records, dropped writes).

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a third-party entity list
#[derive(Error, Debug)]
pub enum EntityLoadError {
    #[error("Cannot parse the third-party entities list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Third-party entities list must be a JSON array, found {0}")]
    NotAList(&'static str),

    #[error("Failed to read entities file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by file-backed preference storage
#[derive(Error, Debug)]
pub enum PrefStoreError {
    #[error("Preference file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid preference file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Short JSON kind name used in error messages
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
