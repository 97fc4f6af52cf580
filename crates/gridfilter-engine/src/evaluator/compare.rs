//! Type-aware ordering of a column value against an operand.

use std::cmp::Ordering;

use gridfilter_model::models::{CellValue, SearchCondition};

use crate::error::{FilterError, FilterResult};
use crate::value_cache::compare_text_ci;

/// Orders `a` relative to `b` under the condition's column data type.
///
/// Null equals null and sorts before everything else. Datetime and number
/// columns compare converted values; when either side does not convert the
/// comparison falls back to case-insensitive text, as it does for every other
/// column type.
///
/// # Errors
///
/// Returns [`FilterError::InvalidSearch`] if two numbers cannot be ordered.
pub fn compare_values(
    a: &CellValue,
    condition: &SearchCondition,
    b: &CellValue,
) -> FilterResult<Ordering> {
    match (a.is_null(), b.is_null()) {
        (true, true) => return Ok(Ordering::Equal),
        (true, false) => return Ok(Ordering::Less),
        (false, true) => return Ok(Ordering::Greater),
        (false, false) => {}
    }

    if condition.is_datetime() {
        if let (Some(x), Some(y)) = (a.as_datetime(), b.as_datetime()) {
            return Ok(x.cmp(&y));
        }
    } else if condition.is_numeric() {
        if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
            return x
                .partial_cmp(&y)
                .ok_or_else(|| FilterError::invalid_search(a, b));
        }
    }

    Ok(compare_text_ci(&a.to_string(), &b.to_string()))
}

/// Returns true if `compare_values` finds the two values equal.
pub fn values_equal(a: &CellValue, condition: &SearchCondition, b: &CellValue) -> FilterResult<bool> {
    compare_values(a, condition, b).map(Ordering::is_eq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridfilter_model::models::{ColumnDataType, SearchType};

    fn condition(data_type: ColumnDataType) -> SearchCondition {
        SearchCondition::without_operands(SearchType::Equals, data_type)
    }

    #[test]
    fn test_nulls_first() {
        let c = condition(ColumnDataType::Number);
        assert_eq!(
            compare_values(&CellValue::Null, &c, &CellValue::Null),
            Ok(Ordering::Equal)
        );
        assert_eq!(
            compare_values(&CellValue::Null, &c, &CellValue::Number(1.0)),
            Ok(Ordering::Less)
        );
        assert_eq!(
            compare_values(&CellValue::Number(1.0), &c, &CellValue::Null),
            Ok(Ordering::Greater)
        );
    }

    #[test]
    fn test_numeric_compares_numbers_not_text() {
        let c = condition(ColumnDataType::Number);
        assert_eq!(
            compare_values(&CellValue::Number(9.0), &c, &CellValue::text("10")),
            Ok(Ordering::Less)
        );
    }

    #[test]
    fn test_numeric_falls_back_to_text() {
        let c = condition(ColumnDataType::Number);
        assert_eq!(
            compare_values(&CellValue::text("abc"), &c, &CellValue::Number(1.0)),
            Ok(Ordering::Greater)
        );
    }

    #[test]
    fn test_datetime() {
        let c = condition(ColumnDataType::DateTime);
        assert_eq!(
            compare_values(&CellValue::text("2024-01-02"), &c, &CellValue::text("2023-12-31")),
            Ok(Ordering::Greater)
        );
    }

    #[test]
    fn test_string_is_case_insensitive() {
        let c = condition(ColumnDataType::String);
        assert!(values_equal(&CellValue::text("Apple"), &c, &CellValue::text("apple")).unwrap());
        assert_eq!(
            compare_values(&CellValue::text("10"), &c, &CellValue::text("9")),
            Ok(Ordering::Less)
        );
    }
}
