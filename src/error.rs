//! @ai:module:intent Define error types for analysis and storage
//! @ai:module:layer domain
//! @ai:module:public_api AnalysisError, StoreError
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Errors raised while turning metric rows into a comparison report
///
/// Every variant except `MalformedRecord` is recoverable: the aggregator
/// records it in `AnalysisReport::issues` and keeps going with a partial report.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisError {
    #[error("no data available for analysis")]
    NoData,

    #[error("expected method {method} is absent from the data")]
    MissingMethod { method: String },

    #[error("{factor} is undefined: {denominator} is zero")]
    UndefinedRatio { factor: String, denominator: String },

    #[error("at least two methods are needed for a ranked comparison, found {found}")]
    InsufficientMethods { found: usize },

    #[error("malformed record #{row} (method {method}): field `{field}` {reason}")]
    MalformedRecord {
        row: usize,
        method: String,
        field: String,
        reason: String,
    },
}

impl AnalysisError {
    /// @ai:intent Build an UndefinedRatio error
    /// @ai:effects pure
    pub fn undefined_ratio(factor: &str, denominator: &str) -> Self {
        Self::UndefinedRatio {
            factor: factor.to_string(),
            denominator: denominator.to_string(),
        }
    }

    /// @ai:intent Whether the caller can continue with a partial report
    /// @ai:effects pure
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::MalformedRecord { .. })
    }
}

/// @ai:intent Unified error type for the data-access layer
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to execute script {}", .path.display())]
    Script {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Invalid SQL identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Blocking task failed: {0}")]
    Join(String),
}
