//! Search conditions: one predicate instance with typed operands.

use serde::{Deserialize, Serialize};

use super::search_type::{DateInterval, SearchType};
use super::template::SearchTemplate;
use super::value::{CellValue, ColumnDataType};

/// A predicate instance evaluated against column values.
///
/// Operands are converted to the column's data type when the condition is
/// built. Operands that cannot be converted are kept as given, so evaluation
/// degrades to a text comparison instead of failing.
///
/// # Example
///
/// ```
/// use gridfilter_model::models::{CellValue, ColumnDataType, SearchCondition, SearchType};
///
/// let condition = SearchCondition::new(
///     SearchType::Between,
///     ColumnDataType::Number,
///     CellValue::text("5"),
///     CellValue::text("10"),
/// );
/// assert_eq!(condition.primary_value, CellValue::Number(5.0));
/// assert!(condition.is_numeric());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCondition {
    /// The predicate kind.
    pub search_type: SearchType,

    /// Data type of the column being searched.
    pub column_data_type: ColumnDataType,

    /// First operand, converted to the column data type when possible.
    #[serde(default)]
    pub primary_value: CellValue,

    /// Second operand (upper bound of ranges).
    #[serde(default)]
    pub secondary_value: CellValue,

    /// List operands for `IsAnyOf`, `IsNoneOf` and `IsOnAnyOfDates`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub raw_values: Vec<CellValue>,

    /// The primary operand as text, used by text and pattern predicates.
    #[serde(default)]
    pub string_value: String,

    /// Selected intervals for `DateInterval`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub date_intervals: Vec<DateInterval>,
}

impl SearchCondition {
    /// Creates a condition, converting both operands to `data_type`.
    pub fn new(
        search_type: SearchType,
        data_type: ColumnDataType,
        primary: CellValue,
        secondary: CellValue,
    ) -> Self {
        let string_value = primary.to_string();
        Self {
            search_type,
            column_data_type: data_type,
            primary_value: convert_operand(&primary, data_type),
            secondary_value: convert_operand(&secondary, data_type),
            raw_values: Vec::new(),
            string_value,
            date_intervals: Vec::new(),
        }
    }

    /// Creates a condition without operands (null checks, averages, uniqueness).
    pub fn without_operands(search_type: SearchType, data_type: ColumnDataType) -> Self {
        Self::new(search_type, data_type, CellValue::Null, CellValue::Null)
    }

    /// Creates a list condition, converting every operand to `data_type`.
    pub fn with_values(
        search_type: SearchType,
        data_type: ColumnDataType,
        values: impl IntoIterator<Item = CellValue>,
    ) -> Self {
        let mut condition = Self::without_operands(search_type, data_type);
        condition.raw_values = values
            .into_iter()
            .map(|v| convert_operand(&v, data_type))
            .collect();
        condition
    }

    /// Creates a `DateInterval` condition.
    pub fn with_intervals(intervals: impl IntoIterator<Item = DateInterval>) -> Self {
        let mut condition =
            Self::without_operands(SearchType::DateInterval, ColumnDataType::DateTime);
        condition.date_intervals = intervals.into_iter().collect();
        condition
    }

    /// Builds the condition described by a template for a column of `data_type`.
    pub fn from_template(template: &SearchTemplate, data_type: ColumnDataType) -> Self {
        let mut condition = Self::new(
            template.search_type,
            data_type,
            template.selected_value.clone(),
            template.selected_secondary_value.clone(),
        );
        condition.raw_values = template
            .selected_values
            .iter()
            .map(|v| convert_operand(v, data_type))
            .collect();
        condition.date_intervals = template.date_intervals.clone();
        condition
    }

    /// Returns true when comparisons use text semantics.
    pub fn is_string(&self) -> bool {
        !self.is_numeric() && !self.is_datetime()
    }

    /// Returns true when comparisons convert operands to numbers.
    pub fn is_numeric(&self) -> bool {
        self.column_data_type == ColumnDataType::Number
    }

    /// Returns true when comparisons convert operands to datetimes.
    pub fn is_datetime(&self) -> bool {
        self.column_data_type == ColumnDataType::DateTime
    }
}

/// Converts an operand, keeping the original when conversion is impossible.
fn convert_operand(value: &CellValue, data_type: ColumnDataType) -> CellValue {
    value
        .convert_to(data_type)
        .unwrap_or_else(|| value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_converts_numeric_operands() {
        let c = SearchCondition::new(
            SearchType::LessThan,
            ColumnDataType::Number,
            CellValue::text("12"),
            CellValue::Null,
        );
        assert_eq!(c.primary_value, CellValue::Number(12.0));
        assert_eq!(c.secondary_value, CellValue::Null);
        assert_eq!(c.string_value, "12");
    }

    #[test]
    fn test_new_keeps_unconvertible_operand() {
        let c = SearchCondition::new(
            SearchType::Equals,
            ColumnDataType::Number,
            CellValue::text("twelve"),
            CellValue::Null,
        );
        assert_eq!(c.primary_value, CellValue::text("twelve"));
    }

    #[test]
    fn test_flags_follow_data_type() {
        let n = SearchCondition::without_operands(SearchType::IsNull, ColumnDataType::Number);
        assert!(n.is_numeric() && !n.is_string() && !n.is_datetime());

        let d = SearchCondition::without_operands(SearchType::IsNull, ColumnDataType::DateTime);
        assert!(d.is_datetime() && !d.is_string());

        let s = SearchCondition::without_operands(SearchType::IsNull, ColumnDataType::Enum);
        assert!(s.is_string());
    }

    #[test]
    fn test_with_values_converts_list() {
        let c = SearchCondition::with_values(
            SearchType::IsAnyOf,
            ColumnDataType::Number,
            vec![CellValue::text("1"), CellValue::Number(2.0)],
        );
        assert_eq!(
            c.raw_values,
            vec![CellValue::Number(1.0), CellValue::Number(2.0)]
        );
    }

    #[test]
    fn test_from_template() {
        let template = SearchTemplate::new(SearchType::IsAnyOf)
            .values(vec![CellValue::text("3"), CellValue::text("4")]);
        let c = SearchCondition::from_template(&template, ColumnDataType::Number);
        assert_eq!(c.search_type, SearchType::IsAnyOf);
        assert_eq!(c.raw_values.len(), 2);
        assert_eq!(c.raw_values[0], CellValue::Number(3.0));
    }
}
