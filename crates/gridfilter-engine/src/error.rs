//! Error types for the filter engine.

use gridfilter_model::models::SearchType;
use thiserror::Error;

/// A specialized Result type for evaluation.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors raised while evaluating a single value against a condition.
///
/// These never escape [`SearchEngine::evaluate_condition`](crate::SearchEngine::evaluate_condition);
/// they are converted to "no match" there.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// Two values could not be ordered.
    #[error("invalid search: cannot compare '{left}' with '{right}'")]
    InvalidSearch {
        /// Display form of the column value.
        left: String,
        /// Display form of the operand.
        right: String,
    },

    /// A collection-aware predicate was evaluated without a collection context.
    #[error("{search_type} needs a collection context")]
    MissingContext {
        /// The predicate that needed it.
        search_type: SearchType,
    },

    /// A wildcard pattern could not be compiled.
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The source pattern.
        pattern: String,
        /// The regex compiler's message.
        message: String,
    },

    /// An operand could not be converted for the comparison.
    #[error("cannot use '{value}' as {expected}")]
    ConversionFailed {
        /// Display form of the operand.
        value: String,
        /// What the operand was needed as.
        expected: &'static str,
    },
}

impl FilterError {
    /// Creates an invalid search error.
    pub fn invalid_search(left: impl ToString, right: impl ToString) -> Self {
        FilterError::InvalidSearch {
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    /// Creates a conversion error.
    pub fn conversion(value: impl ToString, expected: &'static str) -> Self {
        FilterError::ConversionFailed {
            value: value.to_string(),
            expected,
        }
    }
}

/// Errors raised while constructing a value cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The value source failed mid-iteration; no partial cache is kept.
    #[error("value source failed after {read} values: {source}")]
    Source {
        /// Values read before the failure.
        read: usize,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
