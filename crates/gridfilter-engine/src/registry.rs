//! Catalog of search types and the column data types they apply to.
//!
//! The registry is built explicitly with [`SearchTypeRegistry::standard`] and
//! passed by reference to whatever needs it.

use std::collections::HashMap;

use gridfilter_model::error::ModelError;
use gridfilter_model::models::{ColumnDataType, SearchTemplate, SearchType, ValidationResult};
use serde::Serialize;

/// Minimum similarity for a name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.7;

/// The operand shape a search type asks the user for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputTemplate {
    NoInput,
    SingleValue,
    DualValue,
    ValueList,
}

impl InputTemplate {
    /// The operand shape of `search_type`.
    pub fn for_search_type(search_type: SearchType) -> Self {
        match search_type {
            t if t.takes_range() => InputTemplate::DualValue,
            t if t.takes_value_list() => InputTemplate::ValueList,
            SearchType::DateInterval => InputTemplate::ValueList,
            SearchType::IsNull
            | SearchType::IsNotNull
            | SearchType::AboveAverage
            | SearchType::BelowAverage
            | SearchType::Unique
            | SearchType::Duplicate => InputTemplate::NoInput,
            _ => InputTemplate::SingleValue,
        }
    }
}

/// Everything the UI needs to know about one search type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchTypeMetadata {
    pub search_type: SearchType,
    pub display_name: &'static str,
    pub input_template: InputTemplate,
    pub supported_data_types: Vec<ColumnDataType>,
    pub requires_collection: bool,
    pub is_null_check: bool,
}

impl SearchTypeMetadata {
    /// Returns true if the search type applies to columns of `data_type`.
    pub fn supports(&self, data_type: ColumnDataType) -> bool {
        self.supported_data_types.contains(&data_type)
    }
}

/// Immutable catalog of every [`SearchType`].
#[derive(Debug, Clone)]
pub struct SearchTypeRegistry {
    entries: HashMap<SearchType, SearchTypeMetadata>,
}

impl SearchTypeRegistry {
    /// Builds the standard catalog.
    pub fn standard() -> Self {
        use ColumnDataType::{Boolean, DateTime, Enum, Number};
        use SearchType as S;

        const TEXT: &[ColumnDataType] = &[ColumnDataType::String, Enum];
        const ORDERED: &[ColumnDataType] = &[ColumnDataType::String, Number, DateTime];
        const RANGED: &[ColumnDataType] = &[Number, DateTime];
        const DATES: &[ColumnDataType] = &[DateTime];
        const NUMBERS: &[ColumnDataType] = &[Number];
        const ALL: &[ColumnDataType] = &[ColumnDataType::String, Number, DateTime, Boolean, Enum];

        let rows: [(SearchType, &[ColumnDataType]); 27] = [
            (S::Contains, TEXT),
            (S::DoesNotContain, TEXT),
            (S::StartsWith, TEXT),
            (S::EndsWith, TEXT),
            (S::Equals, ALL),
            (S::NotEquals, ALL),
            (S::LessThan, ORDERED),
            (S::LessThanOrEqualTo, ORDERED),
            (S::GreaterThan, ORDERED),
            (S::GreaterThanOrEqualTo, ORDERED),
            (S::Between, RANGED),
            (S::NotBetween, RANGED),
            (S::BetweenDates, DATES),
            (S::IsAnyOf, ALL),
            (S::IsNoneOf, ALL),
            (S::IsOnAnyOfDates, DATES),
            (S::IsLike, TEXT),
            (S::IsNotLike, TEXT),
            (S::IsNull, ALL),
            (S::IsNotNull, ALL),
            (S::DateInterval, DATES),
            (S::TopN, RANGED),
            (S::BottomN, RANGED),
            (S::AboveAverage, NUMBERS),
            (S::BelowAverage, NUMBERS),
            (S::Unique, ALL),
            (S::Duplicate, ALL),
        ];

        let entries = rows
            .into_iter()
            .map(|(search_type, types)| {
                let metadata = SearchTypeMetadata {
                    search_type,
                    display_name: search_type.display_name(),
                    input_template: InputTemplate::for_search_type(search_type),
                    supported_data_types: types.to_vec(),
                    requires_collection: search_type.requires_collection(),
                    is_null_check: search_type.is_null_check(),
                };
                (search_type, metadata)
            })
            .collect();

        Self { entries }
    }

    /// Metadata for `search_type`, if registered.
    pub fn metadata(&self, search_type: SearchType) -> Option<&SearchTypeMetadata> {
        self.entries.get(&search_type)
    }

    /// Search types offered for a column, in declaration order.
    ///
    /// Null checks are left out for columns that cannot hold blanks.
    pub fn filters_for_data_type(
        &self,
        data_type: ColumnDataType,
        is_nullable: bool,
    ) -> Vec<&SearchTypeMetadata> {
        SearchType::ALL
            .iter()
            .filter_map(|t| self.metadata(*t))
            .filter(|m| m.supports(data_type))
            .filter(|m| is_nullable || !m.is_null_check)
            .collect()
    }

    /// Returns true if `search_type` is registered and applies to `data_type`.
    pub fn is_valid_for_data_type(&self, search_type: SearchType, data_type: ColumnDataType) -> bool {
        self.metadata(search_type)
            .is_some_and(|m| m.supports(data_type))
    }

    /// Looks up a search type by display name or variant name, ignoring case.
    pub fn lookup_by_name(&self, name: &str) -> Option<SearchType> {
        let name = name.trim();
        SearchType::ALL.iter().copied().find(|t| {
            t.name().eq_ignore_ascii_case(name)
                || self
                    .metadata(*t)
                    .is_some_and(|m| m.display_name.eq_ignore_ascii_case(name))
        })
    }

    /// Suggests the closest known name for a misspelled one.
    pub fn suggest(&self, name: &str) -> Option<&'static str> {
        let needle = name.trim().to_lowercase();
        self.entries
            .values()
            .flat_map(|m| [m.display_name, m.search_type.name()])
            .map(|candidate| {
                let score = strsim::jaro_winkler(&needle, &candidate.to_lowercase());
                (candidate, score)
            })
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(candidate, _)| candidate)
    }

    /// Validates a template for a column of `data_type`.
    ///
    /// Adds the applicability check to [`SearchTemplate::validate`].
    pub fn validate_template(
        &self,
        template: &SearchTemplate,
        data_type: ColumnDataType,
    ) -> ValidationResult {
        if !self.is_valid_for_data_type(template.search_type, data_type) {
            return ValidationResult::invalid(format!(
                "{} does not apply to {} columns",
                template.search_type.display_name(),
                data_type
            ));
        }
        template.validate()
    }

    /// Like [`validate_template`](Self::validate_template), as a `Result`.
    pub fn check_template(
        &self,
        template: &SearchTemplate,
        data_type: ColumnDataType,
    ) -> Result<(), ModelError> {
        let result = self.validate_template(template, data_type);
        match result.error_message {
            Some(message) if !result.is_valid => {
                Err(ModelError::validation(template.search_type, message))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridfilter_model::models::CellValue;

    #[test]
    fn test_every_search_type_is_registered() {
        let registry = SearchTypeRegistry::standard();
        for t in SearchType::ALL {
            let m = registry.metadata(t).unwrap();
            assert_eq!(m.search_type, t);
            assert_eq!(m.requires_collection, t.requires_collection());
        }
    }

    #[test]
    fn test_input_templates() {
        let registry = SearchTypeRegistry::standard();
        let input = |t| registry.metadata(t).unwrap().input_template;
        assert_eq!(input(SearchType::Contains), InputTemplate::SingleValue);
        assert_eq!(input(SearchType::Between), InputTemplate::DualValue);
        assert_eq!(input(SearchType::IsNoneOf), InputTemplate::ValueList);
        assert_eq!(input(SearchType::DateInterval), InputTemplate::ValueList);
        assert_eq!(input(SearchType::Unique), InputTemplate::NoInput);
        assert_eq!(input(SearchType::TopN), InputTemplate::SingleValue);
    }

    #[test]
    fn test_filters_for_number_column() {
        let registry = SearchTypeRegistry::standard();
        let types: Vec<SearchType> = registry
            .filters_for_data_type(ColumnDataType::Number, true)
            .into_iter()
            .map(|m| m.search_type)
            .collect();
        assert!(types.contains(&SearchType::Between));
        assert!(types.contains(&SearchType::AboveAverage));
        assert!(types.contains(&SearchType::IsNull));
        assert!(!types.contains(&SearchType::Contains));
        assert!(!types.contains(&SearchType::DateInterval));
    }

    #[test]
    fn test_non_nullable_drops_null_checks() {
        let registry = SearchTypeRegistry::standard();
        let metas = registry.filters_for_data_type(ColumnDataType::String, false);
        assert!(metas.iter().all(|m| !m.is_null_check));
        assert!(metas.iter().any(|m| m.search_type == SearchType::Contains));
    }

    #[test]
    fn test_is_valid_for_data_type() {
        let registry = SearchTypeRegistry::standard();
        assert!(registry.is_valid_for_data_type(SearchType::BetweenDates, ColumnDataType::DateTime));
        assert!(!registry.is_valid_for_data_type(SearchType::BetweenDates, ColumnDataType::Number));
        assert!(registry.is_valid_for_data_type(SearchType::Unique, ColumnDataType::Boolean));
    }

    #[test]
    fn test_lookup_by_name() {
        let registry = SearchTypeRegistry::standard();
        assert_eq!(registry.lookup_by_name("is any of"), Some(SearchType::IsAnyOf));
        assert_eq!(registry.lookup_by_name("ISANYOF"), Some(SearchType::IsAnyOf));
        assert_eq!(registry.lookup_by_name("Is blank"), Some(SearchType::IsNull));
        assert_eq!(registry.lookup_by_name("whatever"), None);
    }

    #[test]
    fn test_suggest() {
        let registry = SearchTypeRegistry::standard();
        assert_eq!(registry.suggest("Containz"), Some("Contains"));
        assert_eq!(registry.suggest("qqqqqqqqqqqqqqqqqqqq"), None);
    }

    #[test]
    fn test_validate_template_checks_applicability() {
        let registry = SearchTypeRegistry::standard();
        let t = SearchTemplate::new(SearchType::Contains).value("x");
        assert!(registry.validate_template(&t, ColumnDataType::String).is_valid);

        let result = registry.validate_template(&t, ColumnDataType::Number);
        assert!(!result.is_valid);
        assert!(result.error_message.unwrap().contains("number"));
    }

    #[test]
    fn test_check_template_reports_model_error() {
        let registry = SearchTypeRegistry::standard();
        let t = SearchTemplate::new(SearchType::Between).value(CellValue::Number(1.0));
        let err = registry
            .check_template(&t, ColumnDataType::Number)
            .unwrap_err();
        assert!(matches!(err, ModelError::Validation { .. }));
        assert!(err.to_string().starts_with("invalid Between filter"));
    }
}
