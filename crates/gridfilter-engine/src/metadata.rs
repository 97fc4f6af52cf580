//! Value categorization and normalized keys.
//!
//! [`ValueMetadata`] classifies a raw cell value as null, empty, whitespace or
//! normal and carries its display text. [`ValueKey`] is the hashable,
//! normalized form used wherever values are deduplicated or counted.

use std::hash::{Hash, Hasher};

use chrono::NaiveDateTime;
use gridfilter_model::models::CellValue;
use serde::{Deserialize, Serialize};

/// Display text shown for null, empty and whitespace values.
pub const BLANK_DISPLAY_TEXT: &str = "(blank)";

/// Category of an observed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueCategory {
    /// No value at all.
    Null,
    /// Empty text.
    Empty,
    /// Text made only of whitespace.
    Whitespace,
    /// Anything else.
    Normal,
}

impl ValueCategory {
    /// Returns true for every category except `Normal`.
    pub fn is_blank(&self) -> bool {
        !matches!(self, ValueCategory::Normal)
    }
}

/// Whether null, empty and whitespace values count as the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlankPolicy {
    /// Each blank category is its own value.
    #[default]
    Distinct,
    /// All blank categories are one value.
    Equivalent,
}

/// One observed value with its category and display text.
///
/// Equality requires matching categories. Null instances are always equal,
/// as are whitespace instances (their normalized content is empty).
///
/// # Example
///
/// ```
/// use gridfilter_engine::metadata::{ValueCategory, ValueMetadata};
/// use gridfilter_model::models::CellValue;
///
/// let m = ValueMetadata::new(CellValue::text("   "));
/// assert_eq!(m.category(), ValueCategory::Whitespace);
/// assert_eq!(m.display_text(), "(blank)");
/// ```
#[derive(Debug, Clone)]
pub struct ValueMetadata {
    value: CellValue,
    category: ValueCategory,
    display_text: String,
}

impl ValueMetadata {
    /// Classifies a value.
    pub fn new(value: CellValue) -> Self {
        let category = categorize(&value);
        let display_text = if category.is_blank() {
            BLANK_DISPLAY_TEXT.to_string()
        } else {
            value.to_string()
        };
        Self {
            value,
            category,
            display_text,
        }
    }

    /// The original value.
    pub fn value(&self) -> &CellValue {
        &self.value
    }

    /// The value's category.
    pub fn category(&self) -> ValueCategory {
        self.category
    }

    /// Text to show in value lists.
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    /// Returns true for null, empty and whitespace values.
    pub fn is_blank(&self) -> bool {
        self.category.is_blank()
    }

    /// Compares under an explicit blank policy.
    pub fn equals_with(&self, other: &ValueMetadata, policy: BlankPolicy) -> bool {
        if policy == BlankPolicy::Equivalent && self.is_blank() && other.is_blank() {
            return true;
        }
        self == other
    }
}

impl PartialEq for ValueMetadata {
    fn eq(&self, other: &Self) -> bool {
        if self.category != other.category {
            return false;
        }
        match self.category {
            ValueCategory::Normal => ValueKey::new(&self.value) == ValueKey::new(&other.value),
            _ => true,
        }
    }
}

impl Eq for ValueMetadata {}

impl Hash for ValueMetadata {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.category.hash(state);
        if self.category == ValueCategory::Normal {
            ValueKey::new(&self.value).hash(state);
        }
    }
}

/// Classifies a raw value.
pub fn categorize(value: &CellValue) -> ValueCategory {
    match value {
        CellValue::Null => ValueCategory::Null,
        CellValue::Text(s) if s.is_empty() => ValueCategory::Empty,
        CellValue::Text(s) if s.trim().is_empty() => ValueCategory::Whitespace,
        _ => ValueCategory::Normal,
    }
}

/// A normalized, hashable form of a cell value.
///
/// Numbers compare by bit pattern after folding `-0.0` into `0.0`, so equal
/// numbers always hash alike.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKey {
    Null,
    Text(String),
    Number(u64),
    Boolean(bool),
    DateTime(NaiveDateTime),
    Enum(String),
}

impl ValueKey {
    /// Normalizes a value.
    pub fn new(value: &CellValue) -> Self {
        match value {
            CellValue::Null => ValueKey::Null,
            CellValue::Text(s) => ValueKey::Text(s.clone()),
            CellValue::Number(n) => {
                let n = if *n == 0.0 { 0.0 } else { *n };
                ValueKey::Number(n.to_bits())
            }
            CellValue::Boolean(b) => ValueKey::Boolean(*b),
            CellValue::DateTime(dt) => ValueKey::DateTime(*dt),
            CellValue::Enum(s) => ValueKey::Enum(s.clone()),
        }
    }

    /// Rebuilds the cell value this key was made from.
    pub fn to_value(&self) -> CellValue {
        match self {
            ValueKey::Null => CellValue::Null,
            ValueKey::Text(s) => CellValue::Text(s.clone()),
            ValueKey::Number(bits) => CellValue::Number(f64::from_bits(*bits)),
            ValueKey::Boolean(b) => CellValue::Boolean(*b),
            ValueKey::DateTime(dt) => CellValue::DateTime(*dt),
            ValueKey::Enum(s) => CellValue::Enum(s.clone()),
        }
    }
}

impl From<&CellValue> for ValueKey {
    fn from(value: &CellValue) -> Self {
        ValueKey::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_categorize() {
        assert_eq!(categorize(&CellValue::Null), ValueCategory::Null);
        assert_eq!(categorize(&CellValue::text("")), ValueCategory::Empty);
        assert_eq!(categorize(&CellValue::text(" \n")), ValueCategory::Whitespace);
        assert_eq!(categorize(&CellValue::text("a")), ValueCategory::Normal);
        assert_eq!(categorize(&CellValue::Number(0.0)), ValueCategory::Normal);
    }

    #[test]
    fn test_display_text() {
        assert_eq!(ValueMetadata::new(CellValue::Null).display_text(), "(blank)");
        assert_eq!(ValueMetadata::new(CellValue::text("")).display_text(), "(blank)");
        assert_eq!(ValueMetadata::new(CellValue::Number(3.0)).display_text(), "3");
    }

    #[test]
    fn test_equality_requires_category_match() {
        let null = ValueMetadata::new(CellValue::Null);
        let empty = ValueMetadata::new(CellValue::text(""));
        assert_ne!(null, empty);
        assert_eq!(null, ValueMetadata::new(CellValue::Null));
        assert_eq!(
            ValueMetadata::new(CellValue::text(" ")),
            ValueMetadata::new(CellValue::text("   "))
        );
        assert_ne!(
            ValueMetadata::new(CellValue::text("a")),
            ValueMetadata::new(CellValue::text("b"))
        );
    }

    #[test]
    fn test_equivalent_blank_policy() {
        let null = ValueMetadata::new(CellValue::Null);
        let ws = ValueMetadata::new(CellValue::text("  "));
        assert!(!null.equals_with(&ws, BlankPolicy::Distinct));
        assert!(null.equals_with(&ws, BlankPolicy::Equivalent));
        let a = ValueMetadata::new(CellValue::text("a"));
        assert!(!null.equals_with(&a, BlankPolicy::Equivalent));
    }

    #[test]
    fn test_hash_consistent_with_eq() {
        let mut set = HashSet::new();
        set.insert(ValueMetadata::new(CellValue::text(" ")));
        set.insert(ValueMetadata::new(CellValue::text("  ")));
        set.insert(ValueMetadata::new(CellValue::Number(1.0)));
        set.insert(ValueMetadata::new(CellValue::Number(1.0)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_value_key_folds_negative_zero() {
        assert_eq!(
            ValueKey::new(&CellValue::Number(-0.0)),
            ValueKey::new(&CellValue::Number(0.0))
        );
        assert_eq!(
            ValueKey::new(&CellValue::Number(2.5)).to_value(),
            CellValue::Number(2.5)
        );
    }
}
