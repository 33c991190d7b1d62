//! Error types for pkgraph operations.
//!
//! Errors fall into three groups:
//!
//! - **Store problems**: the external store failed or does not have the shape
//!   the metrics expect (`Database`, `MissingRelation`, `MissingColumn`,
//!   `InvalidValue`). These are never retried here.
//! - **Caller problems**: bad configuration or an unknown metric name.
//! - **Run control**: the host cancelled a closure computation.
//!
//! Empty relations and lookups that match nothing are not errors; they produce
//! empty result sets.

use thiserror::Error;

/// Result type for pkgraph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for pkgraph operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),

    /// A relation the metrics read is not present in the store
    #[error("relation `{relation}` not found in store")]
    MissingRelation {
        /// Name of the missing relation
        relation: String,
    },

    /// A relation exists but lacks a column the metrics reference
    #[error("relation `{relation}` is missing required column `{column}`")]
    MissingColumn {
        /// Name of the relation
        relation: String,
        /// Name of the missing column
        column: String,
    },

    /// A stored value could not be decoded into its record type
    #[error("invalid value {value:?} in `{relation}.{column}`: {reason}")]
    InvalidValue {
        /// Name of the relation
        relation: String,
        /// Name of the column
        column: String,
        /// The offending value, rendered as text
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// The requested metric is not part of the catalogue
    #[error("unknown metric `{0}`")]
    UnknownMetric(String),

    /// The closure computation was cancelled before reaching a fixed point
    #[error("closure computation cancelled after {rounds} completed rounds")]
    Cancelled {
        /// Rounds fully completed before the cancellation was observed
        rounds: u32,
    },

    /// Internal invariant violated (poisoned lock, invalid built-in pattern)
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Build an `InvalidValue` error.
    pub(crate) fn invalid_value(
        relation: &str,
        column: &str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            relation: relation.to_string(),
            column: column.to_string(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if the error describes a store whose shape does not match
    /// what the metrics reference.
    #[must_use]
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::MissingRelation { .. } | Self::MissingColumn { .. } | Self::InvalidValue { .. }
        )
    }
}
