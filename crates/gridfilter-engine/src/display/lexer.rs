//! Tokenizer for chip operand text.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use super::DisplayTextError;

/// A token in the operand part of chip text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayToken {
    /// A value in single or double quotes, escapes resolved.
    Quoted(String),

    /// A bare word.
    Word(String),

    /// `[`
    OpenBracket,

    /// `]`
    CloseBracket,

    /// `,`
    Comma,
}

impl DisplayToken {
    /// Returns true for the bare word `and`, in any case.
    pub fn is_and(&self) -> bool {
        matches!(self, DisplayToken::Word(w) if w.eq_ignore_ascii_case("and"))
    }
}

impl fmt::Display for DisplayToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayToken::Quoted(s) => write!(f, "'{s}'"),
            DisplayToken::Word(s) => f.write_str(s),
            DisplayToken::OpenBracket => f.write_str("["),
            DisplayToken::CloseBracket => f.write_str("]"),
            DisplayToken::Comma => f.write_str(","),
        }
    }
}

/// A token with its byte offset in the full display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken {
    pub token: DisplayToken,
    pub position: usize,
}

/// Lexer over the operand part of chip text.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer; `offset` is where `input` starts in the full text.
    pub fn new(input: &'a str, offset: usize) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: offset,
        }
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.next();
        if let Some(ch) = c {
            self.position += ch.len_utf8();
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.next_char();
        }
    }

    /// Reads a quoted value. Backslash escapes the next character.
    fn read_quoted(&mut self, quote: char) -> Result<String, DisplayTextError> {
        let start = self.position;
        self.next_char();

        let mut result = String::new();
        while let Some(c) = self.next_char() {
            if c == quote {
                return Ok(result);
            }
            if c == '\\' {
                match self.next_char() {
                    Some(escaped) => result.push(escaped),
                    None => break,
                }
            } else {
                result.push(c);
            }
        }
        Err(DisplayTextError::UnterminatedQuote { position: start })
    }

    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(&c) = self.peek() {
            if c.is_whitespace() || matches!(c, ',' | '[' | ']' | '\'' | '"') {
                break;
            }
            word.push(c);
            self.next_char();
        }
        word
    }

    /// Returns the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<PositionedToken>, DisplayTextError> {
        self.skip_whitespace();

        let Some(&c) = self.peek() else {
            return Ok(None);
        };
        let position = self.position;

        let token = match c {
            '[' => {
                self.next_char();
                DisplayToken::OpenBracket
            }
            ']' => {
                self.next_char();
                DisplayToken::CloseBracket
            }
            ',' => {
                self.next_char();
                DisplayToken::Comma
            }
            '\'' | '"' => DisplayToken::Quoted(self.read_quoted(c)?),
            _ => DisplayToken::Word(self.read_word()),
        };
        Ok(Some(PositionedToken { token, position }))
    }

    /// Tokenizes the whole input.
    pub fn tokenize(mut self) -> Result<Vec<PositionedToken>, DisplayTextError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }
}
