//! Error and result types for the core crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Structural errors raised while building or evaluating a star query.
///
/// A bound term that never appeared in the data is not an error: it resolves
/// to an empty binding set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unsupported pattern {pattern}: {reason}")]
    UnsupportedPattern { pattern: String, reason: String },

    #[error("query has no triple patterns")]
    EmptyQuery,

    #[error("patterns bind different variables: expected ?{expected}, found ?{found}")]
    MixedVariables { expected: String, found: String },

    #[error("projection {projected:?} does not match the star variable ?{variable}")]
    ProjectionMismatch {
        variable: String,
        projected: Vec<String>,
    },
}

impl Error {
    pub fn unsupported_pattern(pattern: impl ToString, reason: impl Into<String>) -> Self {
        Self::UnsupportedPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}
