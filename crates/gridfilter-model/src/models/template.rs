//! Search templates: the editable filter configuration behind a column filter.
//!
//! A [`ColumnFilter`] holds ordered [`SearchTemplateGroup`]s, and each group
//! holds ordered [`SearchTemplate`]s. Templates and groups carry the logical
//! operator that joins them to their predecessor.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::search_type::{DateInterval, LogicalOperator, SearchType};
use super::value::{CellValue, ColumnDataType};

/// One predicate as configured by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchTemplate {
    /// Stable identifier, used to tag filter tokens.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// The predicate kind.
    pub search_type: SearchType,

    /// First operand.
    #[serde(default, skip_serializing_if = "CellValue::is_null")]
    pub selected_value: CellValue,

    /// Second operand for range predicates.
    #[serde(default, skip_serializing_if = "CellValue::is_null")]
    pub selected_secondary_value: CellValue,

    /// Operands of list predicates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected_values: Vec<CellValue>,

    /// Intervals of `DateInterval` predicates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub date_intervals: Vec<DateInterval>,

    /// Operator joining this template to the previous one in its group.
    #[serde(default)]
    pub operator: LogicalOperator,
}

impl SearchTemplate {
    /// Creates a template without operands.
    pub fn new(search_type: SearchType) -> Self {
        Self {
            id: Uuid::new_v4(),
            search_type,
            selected_value: CellValue::Null,
            selected_secondary_value: CellValue::Null,
            selected_values: Vec::new(),
            date_intervals: Vec::new(),
            operator: LogicalOperator::And,
        }
    }

    /// Sets the first operand.
    pub fn value(mut self, value: impl Into<CellValue>) -> Self {
        self.selected_value = value.into();
        self
    }

    /// Sets both range bounds.
    pub fn range(mut self, low: impl Into<CellValue>, high: impl Into<CellValue>) -> Self {
        self.selected_value = low.into();
        self.selected_secondary_value = high.into();
        self
    }

    /// Sets the list operands.
    pub fn values(mut self, values: impl IntoIterator<Item = CellValue>) -> Self {
        self.selected_values = values.into_iter().collect();
        self
    }

    /// Sets the date intervals.
    pub fn intervals(mut self, intervals: impl IntoIterator<Item = DateInterval>) -> Self {
        self.date_intervals = intervals.into_iter().collect();
        self
    }

    /// Sets the operator joining this template to its predecessor.
    pub fn operator(mut self, operator: LogicalOperator) -> Self {
        self.operator = operator;
        self
    }

    /// Checks that the operands match the shape the search type needs.
    ///
    /// Runs when the filter is configured; evaluation assumes valid templates.
    pub fn validate(&self) -> ValidationResult {
        let t = self.search_type;
        if t.takes_range() {
            if self.selected_value.is_blank() || self.selected_secondary_value.is_blank() {
                return ValidationResult::invalid(format!("{t} requires both a lower and an upper value"));
            }
        } else if t.takes_value_list() {
            if self.selected_values.is_empty() {
                return ValidationResult::invalid(format!("{t} requires at least one value"));
            }
        } else if matches!(t, SearchType::TopN | SearchType::BottomN) {
            match self.selected_value.as_f64() {
                Some(n) if n >= 1.0 && n.fract() == 0.0 => {}
                _ => {
                    return ValidationResult::invalid(format!(
                        "{t} requires a positive whole count, got '{}'",
                        self.selected_value
                    ))
                }
            }
        } else if t == SearchType::DateInterval {
            if self.date_intervals.is_empty() {
                return ValidationResult::invalid("DateInterval requires at least one interval");
            }
        } else if needs_single_value(t) && self.selected_value.is_null() {
            return ValidationResult::invalid(format!("{t} requires a value"));
        }
        ValidationResult::valid()
    }
}

fn needs_single_value(t: SearchType) -> bool {
    !t.is_null_check()
        && !matches!(
            t,
            SearchType::AboveAverage
                | SearchType::BelowAverage
                | SearchType::Unique
                | SearchType::Duplicate
        )
}

/// Outcome of validating a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the configuration can be evaluated.
    pub is_valid: bool,
    /// Why not, when invalid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ValidationResult {
    /// A passing result.
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error_message: None,
        }
    }

    /// A failing result with a message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error_message: Some(message.into()),
        }
    }
}

/// An ordered group of templates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchTemplateGroup {
    /// Templates, each joined to its predecessor by its own operator.
    #[serde(default)]
    pub templates: Vec<SearchTemplate>,

    /// Operator joining this group to the previous group; AND when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<LogicalOperator>,
}

impl SearchTemplateGroup {
    /// Creates a group from templates.
    pub fn new(templates: impl IntoIterator<Item = SearchTemplate>) -> Self {
        Self {
            templates: templates.into_iter().collect(),
            operator: None,
        }
    }

    /// Sets the operator joining this group to the previous one.
    pub fn operator(mut self, operator: LogicalOperator) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Returns the effective group operator.
    pub fn effective_operator(&self) -> LogicalOperator {
        self.operator.unwrap_or_default()
    }
}

/// All filter configuration for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    /// Stable identifier, used to tag filter tokens.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Header text shown in filter chips.
    pub column_name: String,

    /// Binding path resolved against each row.
    pub column_path: String,

    /// Data type used to convert operands and choose comparison semantics.
    pub data_type: ColumnDataType,

    /// Template groups, combined in order.
    #[serde(default)]
    pub groups: Vec<SearchTemplateGroup>,
}

impl ColumnFilter {
    /// Creates an empty column filter.
    pub fn new(
        column_name: impl Into<String>,
        column_path: impl Into<String>,
        data_type: ColumnDataType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            column_name: column_name.into(),
            column_path: column_path.into(),
            data_type,
            groups: Vec::new(),
        }
    }

    /// Appends a group.
    pub fn group(mut self, group: SearchTemplateGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Iterates over every template of every group.
    pub fn templates(&self) -> impl Iterator<Item = &SearchTemplate> {
        self.groups.iter().flat_map(|g| g.templates.iter())
    }

    /// Returns true if no group holds a template.
    pub fn is_empty(&self) -> bool {
        self.templates().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_between_requires_both_bounds() {
        let t = SearchTemplate::new(SearchType::Between).value(5);
        let result = t.validate();
        assert!(!result.is_valid);
        assert!(result.error_message.unwrap().contains("upper"));

        assert!(SearchTemplate::new(SearchType::Between)
            .range(5, 10)
            .validate()
            .is_valid);
    }

    #[test]
    fn test_validate_top_n_requires_positive_count() {
        assert!(!SearchTemplate::new(SearchType::TopN).value(0).validate().is_valid);
        assert!(!SearchTemplate::new(SearchType::TopN).value(-3).validate().is_valid);
        assert!(!SearchTemplate::new(SearchType::TopN).value(2.5).validate().is_valid);
        assert!(!SearchTemplate::new(SearchType::BottomN).validate().is_valid);
        assert!(SearchTemplate::new(SearchType::TopN).value(3).validate().is_valid);
    }

    #[test]
    fn test_validate_lists_and_intervals() {
        assert!(!SearchTemplate::new(SearchType::IsAnyOf).validate().is_valid);
        assert!(SearchTemplate::new(SearchType::IsAnyOf)
            .values(vec![CellValue::text("a")])
            .validate()
            .is_valid);
        assert!(!SearchTemplate::new(SearchType::DateInterval).validate().is_valid);
        assert!(SearchTemplate::new(SearchType::DateInterval)
            .intervals(vec![DateInterval::Today])
            .validate()
            .is_valid);
    }

    #[test]
    fn test_validate_no_input_types() {
        assert!(SearchTemplate::new(SearchType::IsNull).validate().is_valid);
        assert!(SearchTemplate::new(SearchType::Unique).validate().is_valid);
        assert!(SearchTemplate::new(SearchType::AboveAverage).validate().is_valid);
        assert!(!SearchTemplate::new(SearchType::Contains).validate().is_valid);
    }

    #[test]
    fn test_group_operator_defaults_to_and() {
        let g = SearchTemplateGroup::new(vec![]);
        assert_eq!(g.effective_operator(), LogicalOperator::And);
        assert_eq!(
            g.operator(LogicalOperator::Or).effective_operator(),
            LogicalOperator::Or
        );
    }

    #[test]
    fn test_column_filter_deserializes_from_json() {
        let json = r#"{
            "column_name": "Age",
            "column_path": "person.age",
            "data_type": "number",
            "groups": [
                { "templates": [
                    { "search_type": "between", "selected_value": 18, "selected_secondary_value": 65 },
                    { "search_type": "is_null", "operator": "or" }
                ] }
            ]
        }"#;
        let filter: ColumnFilter = serde_json::from_str(json).unwrap();
        assert_eq!(filter.column_path, "person.age");
        assert_eq!(filter.templates().count(), 2);
        let second = &filter.groups[0].templates[1];
        assert_eq!(second.operator, LogicalOperator::Or);
        assert_eq!(second.search_type, SearchType::IsNull);
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_column_filter_deserializes_from_toml() {
        let text = r#"
            column_name = "Status"
            column_path = "status"
            data_type = "string"

            [[groups]]
            [[groups.templates]]
            search_type = "is_any_of"
            selected_values = ["open", "pending"]
        "#;
        let filter: ColumnFilter = toml::from_str(text).unwrap();
        let t = &filter.groups[0].templates[0];
        assert_eq!(t.search_type, SearchType::IsAnyOf);
        assert_eq!(
            t.selected_values,
            vec![CellValue::text("open"), CellValue::text("pending")]
        );
    }
}
