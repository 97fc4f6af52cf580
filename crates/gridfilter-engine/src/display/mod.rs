//! Filter chip display text.
//!
//! A configured template is shown in a filter chip as its search type's
//! display name followed by its operands:
//!
//! - no operands: `Is blank`
//! - one operand: `Contains 'abc'`
//! - a range: `Between '5' and '10'`
//! - a list: `Is any of [open, pending]`
//!
//! [`format_template_text`] produces that text and [`parse_display_text`]
//! reads it back, so a chip edited as plain text can update its template.
//!
//! # Example
//!
//! ```
//! use gridfilter_engine::display::{format_template_text, parse_display_text};
//! use gridfilter_model::models::{ColumnDataType, SearchTemplate, SearchType};
//!
//! let template = SearchTemplate::new(SearchType::Between).range(5, 10);
//! let text = format_template_text(&template, ColumnDataType::Number);
//! assert_eq!(text, "Between '5' and '10'");
//!
//! let parsed = parse_display_text(&text, SearchType::Between).unwrap();
//! assert_eq!(parsed.primary.as_deref(), Some("5"));
//! assert_eq!(parsed.secondary.as_deref(), Some("10"));
//! ```

mod format;
mod lexer;
mod parser;

pub use format::format_template_text;
pub(crate) use format::{display_list_item, display_operand};
pub use lexer::{DisplayToken, Lexer, PositionedToken};
pub use parser::{parse_display_text, ParsedDisplayText};

use thiserror::Error;

/// Errors raised while reading chip display text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DisplayTextError {
    /// The text is empty.
    #[error("display text is empty")]
    Empty,

    /// The text does not start with the search type's display name.
    #[error("display text does not start with '{expected}'")]
    PrefixMismatch {
        /// The display name that was expected.
        expected: &'static str,
    },

    /// A quoted value was never closed.
    #[error("unterminated quote starting at position {position}")]
    UnterminatedQuote {
        /// Byte offset of the opening quote.
        position: usize,
    },

    /// A token appeared where it is not allowed.
    #[error("unexpected token: {token}")]
    UnexpectedToken {
        /// The offending token.
        token: String,
    },

    /// The text ended before every operand was read.
    #[error("unexpected end of display text")]
    UnexpectedEnd,

    /// A date interval name was not recognized.
    #[error("unknown date interval: {name}")]
    UnknownInterval {
        /// The unrecognized name.
        name: String,
    },
}

impl DisplayTextError {
    /// Creates an unexpected token error.
    pub fn unexpected_token(token: impl ToString) -> Self {
        DisplayTextError::UnexpectedToken {
            token: token.to_string(),
        }
    }
}
