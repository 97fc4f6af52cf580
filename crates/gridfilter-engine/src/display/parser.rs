//! Parser for chip display text.
//!
//! # Grammar
//!
//! ```text
//! text   ::= display_name operands
//! single ::= value
//! dual   ::= value "and" value
//! list   ::= "[" [item ("," item)*] "]" | item ("," item)*
//! value  ::= quoted | word+
//! item   ::= quoted | word+
//! ```
//!
//! Which operand rule applies is decided by the search type's
//! [`InputTemplate`]. Unquoted words are joined by single spaces.

use gridfilter_model::models::{CellValue, ColumnDataType, DateInterval, SearchTemplate, SearchType};
use serde::Serialize;

use super::lexer::{DisplayToken, Lexer, PositionedToken};
use super::DisplayTextError;
use crate::metadata::BLANK_DISPLAY_TEXT;
use crate::registry::InputTemplate;

/// Operand text read back from a chip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedDisplayText {
    /// The single operand, or the lower bound of a range.
    pub primary: Option<String>,
    /// The upper bound of a range.
    pub secondary: Option<String>,
    /// The items of a list.
    pub values: Vec<String>,
}

impl ParsedDisplayText {
    /// Builds a template for a column of `data_type` from the parsed operands.
    ///
    /// Operands that cannot be converted to `data_type` are kept as text. A
    /// `(blank)` list item stands for null.
    pub fn to_template(
        &self,
        search_type: SearchType,
        data_type: ColumnDataType,
    ) -> Result<SearchTemplate, DisplayTextError> {
        let convert = |s: &str| {
            let text = CellValue::text(s);
            text.convert_to(data_type).unwrap_or(text)
        };

        let mut template = SearchTemplate::new(search_type);
        if let Some(primary) = &self.primary {
            template.selected_value = convert(primary);
        }
        if let Some(secondary) = &self.secondary {
            template.selected_secondary_value = convert(secondary);
        }
        if search_type == SearchType::DateInterval {
            template.date_intervals = self
                .values
                .iter()
                .map(|name| interval_by_name(name))
                .collect::<Result<_, _>>()?;
        } else {
            template.selected_values = self
                .values
                .iter()
                .map(|v| {
                    if v.trim().eq_ignore_ascii_case(BLANK_DISPLAY_TEXT) {
                        CellValue::Null
                    } else {
                        convert(v)
                    }
                })
                .collect();
        }
        Ok(template)
    }
}

fn interval_by_name(name: &str) -> Result<DateInterval, DisplayTextError> {
    DateInterval::ALL
        .iter()
        .copied()
        .find(|i| i.display_name().eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| DisplayTextError::UnknownInterval {
            name: name.to_string(),
        })
}

/// Reads the operands out of chip text for `search_type`.
///
/// The text must start with the search type's display name, ignoring case.
///
/// # Errors
///
/// Returns [`DisplayTextError::Empty`] for blank text,
/// [`DisplayTextError::PrefixMismatch`] when the display name is missing, and
/// a token error when the operands do not have the expected shape.
pub fn parse_display_text(
    text: &str,
    search_type: SearchType,
) -> Result<ParsedDisplayText, DisplayTextError> {
    let trimmed = text.trim_start();
    if trimmed.trim_end().is_empty() {
        return Err(DisplayTextError::Empty);
    }
    let leading = text.len() - trimmed.len();

    let name = search_type.display_name();
    let rest = trimmed
        .split_at_checked(name.len())
        .filter(|(head, _)| head.eq_ignore_ascii_case(name))
        .map(|(_, rest)| rest)
        .filter(|rest| {
            rest.chars()
                .next()
                .is_none_or(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '['))
        })
        .ok_or(DisplayTextError::PrefixMismatch { expected: name })?;

    let tokens = Lexer::new(rest, leading + name.len()).tokenize()?;
    let mut parser = Parser { tokens, position: 0 };
    let parsed = parser.parse_operands(InputTemplate::for_search_type(search_type))?;

    if let Some(extra) = parser.peek() {
        return Err(DisplayTextError::unexpected_token(extra));
    }
    Ok(parsed)
}

struct Parser {
    tokens: Vec<PositionedToken>,
    position: usize,
}

impl Parser {
    fn peek(&self) -> Option<&DisplayToken> {
        self.tokens.get(self.position).map(|t| &t.token)
    }

    fn advance(&mut self) -> Option<&DisplayToken> {
        let token = self.tokens.get(self.position).map(|t| &t.token);
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn check(&self, expected: &DisplayToken) -> bool {
        self.peek() == Some(expected)
    }

    fn parse_operands(&mut self, input: InputTemplate) -> Result<ParsedDisplayText, DisplayTextError> {
        let mut parsed = ParsedDisplayText::default();
        match input {
            InputTemplate::NoInput => {}
            InputTemplate::SingleValue => {
                parsed.primary = Some(self.parse_value(false)?);
            }
            InputTemplate::DualValue => {
                parsed.primary = Some(self.parse_value(true)?);
                match self.advance() {
                    Some(token) if token.is_and() => {}
                    Some(token) => return Err(DisplayTextError::unexpected_token(token)),
                    None => return Err(DisplayTextError::UnexpectedEnd),
                }
                parsed.secondary = Some(self.parse_value(true)?);
            }
            InputTemplate::ValueList => {
                parsed.values = self.parse_list()?;
            }
        }
        Ok(parsed)
    }

    /// Parses a quoted value or a run of words, stopping at `and` when
    /// `stop_at_and` is set.
    fn parse_value(&mut self, stop_at_and: bool) -> Result<String, DisplayTextError> {
        match self.peek() {
            Some(DisplayToken::Quoted(s)) => {
                let value = s.clone();
                self.position += 1;
                Ok(value)
            }
            Some(DisplayToken::Word(_)) => {
                let mut words = Vec::new();
                while let Some(DisplayToken::Word(w)) = self.peek() {
                    if stop_at_and && w.eq_ignore_ascii_case("and") {
                        break;
                    }
                    words.push(w.clone());
                    self.position += 1;
                }
                if words.is_empty() {
                    return Err(DisplayTextError::unexpected_token("and"));
                }
                Ok(words.join(" "))
            }
            Some(other) => Err(DisplayTextError::unexpected_token(other)),
            None => Err(DisplayTextError::UnexpectedEnd),
        }
    }

    fn parse_list(&mut self) -> Result<Vec<String>, DisplayTextError> {
        let bracketed = self.check(&DisplayToken::OpenBracket);
        if bracketed {
            self.advance();
            if self.check(&DisplayToken::CloseBracket) {
                self.advance();
                return Ok(Vec::new());
            }
        }

        let mut items = vec![self.parse_value(false)?];
        while self.check(&DisplayToken::Comma) {
            self.advance();
            items.push(self.parse_value(false)?);
        }

        if bracketed {
            match self.advance() {
                Some(DisplayToken::CloseBracket) => {}
                Some(token) => return Err(DisplayTextError::unexpected_token(token)),
                None => return Err(DisplayTextError::UnexpectedEnd),
            }
        }
        Ok(items)
    }
}
