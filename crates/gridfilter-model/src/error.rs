//! Error types for the filter data model.

use thiserror::Error;

use crate::models::{ColumnDataType, SearchType};

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised while reading or checking filter configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ModelError {
    /// A value could not be represented in the column's data type.
    #[error("cannot convert '{value}' to {data_type}")]
    Conversion {
        /// Display form of the offending value.
        value: String,
        /// The requested data type.
        data_type: ColumnDataType,
    },

    /// A template failed validation.
    #[error("invalid {search_type} filter: {message}")]
    Validation {
        /// The template's search type.
        search_type: SearchType,
        /// What is wrong with it.
        message: String,
    },
}

impl ModelError {
    /// Creates a conversion error.
    pub fn conversion(value: impl ToString, data_type: ColumnDataType) -> Self {
        ModelError::Conversion {
            value: value.to_string(),
            data_type,
        }
    }

    /// Creates a validation error.
    pub fn validation(search_type: SearchType, message: impl Into<String>) -> Self {
        ModelError::Validation {
            search_type,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_display() {
        let e = ModelError::conversion("abc", ColumnDataType::Number);
        assert_eq!(e.to_string(), "cannot convert 'abc' to number");
    }

    #[test]
    fn test_validation_display() {
        let e = ModelError::validation(SearchType::Between, "missing upper bound");
        assert_eq!(e.to_string(), "invalid Between filter: missing upper bound");
    }

    #[test]
    fn test_implements_std_error() {
        let e: Box<dyn std::error::Error> =
            Box::new(ModelError::conversion("x", ColumnDataType::DateTime));
        assert!(e.to_string().contains("date_time"));
    }
}
