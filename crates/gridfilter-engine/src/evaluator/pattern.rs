//! SQL-style wildcard patterns.

use regex::{Regex, RegexBuilder};

use crate::error::{FilterError, FilterResult};

/// Compiles a `LIKE` pattern into an anchored, case-insensitive regex.
///
/// `%` matches any run of characters and `_` exactly one. A backslash makes
/// the next character literal. Everything else is matched literally.
///
/// ```
/// use gridfilter_engine::evaluator::like_to_regex;
///
/// let re = like_to_regex("a%c_").unwrap();
/// assert!(re.is_match("ABBBcd"));
/// assert!(!re.is_match("abc"));
/// ```
pub fn like_to_regex(pattern: &str) -> FilterResult<Regex> {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push_str("^(?s:");

    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => source.push_str(".*"),
            '_' => source.push('.'),
            '\\' => match chars.next() {
                Some(escaped) => source.push_str(&regex::escape(escaped.encode_utf8(&mut [0; 4]))),
                None => source.push_str(&regex::escape("\\")),
            },
            other => source.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    source.push_str(")$");

    RegexBuilder::new(&source)
        .case_insensitive(true)
        .build()
        .map_err(|e| FilterError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_and_underscore() {
        let re = like_to_regex("%son").unwrap();
        assert!(re.is_match("Johnson"));
        assert!(!re.is_match("Johnsonn"));

        let re = like_to_regex("b_t").unwrap();
        assert!(re.is_match("bat"));
        assert!(re.is_match("BIT"));
        assert!(!re.is_match("boat"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let re = like_to_regex("a.b(c)").unwrap();
        assert!(re.is_match("a.b(c)"));
        assert!(!re.is_match("axb(c)"));
    }

    #[test]
    fn test_escaped_wildcards() {
        let re = like_to_regex(r"100\%").unwrap();
        assert!(re.is_match("100%"));
        assert!(!re.is_match("1000"));
    }

    #[test]
    fn test_matches_across_newlines() {
        let re = like_to_regex("a%b").unwrap();
        assert!(re.is_match("a\nb"));
    }
}
