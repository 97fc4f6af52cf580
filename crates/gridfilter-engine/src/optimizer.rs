//! Choosing between inclusion and exclusion for large value selections.
//!
//! When a user ticks most values of a long list, "is none of the few
//! unticked values" is a much smaller filter than "is any of the many ticked
//! ones". The optimizer picks the smaller form once the selection ratio
//! passes a threshold that tightens as the list grows.

use std::collections::HashSet;

use gridfilter_model::models::{CellValue, ColumnDataType, SearchTemplate, SearchType};
use serde::{Deserialize, Serialize};

use crate::metadata::ValueKey;
use crate::value_cache::infer_data_type;

/// Smallest number of distinct values for which exclusion is considered.
pub const DEFAULT_MIN_DATASET_SIZE: usize = 10;

/// The filter chosen for a selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizedFilterResult {
    /// `IsAnyOf`, `IsNoneOf` or `NotEquals`.
    pub search_type: SearchType,
    /// Operands of the chosen filter.
    pub values: Vec<CellValue>,
    /// True when `values` lists the unselected values.
    pub uses_exclusion: bool,
    /// Why this form was chosen.
    pub rationale: String,
    /// How many fewer operands the exclusion form needs; 0 for inclusion.
    pub values_saved: usize,
}

impl OptimizedFilterResult {
    fn inclusion(selected: &[CellValue], rationale: impl Into<String>) -> Self {
        Self {
            search_type: SearchType::IsAnyOf,
            values: selected.to_vec(),
            uses_exclusion: false,
            rationale: rationale.into(),
            values_saved: 0,
        }
    }

    /// Builds the template that applies this filter.
    pub fn to_template(&self) -> SearchTemplate {
        let template = SearchTemplate::new(self.search_type);
        match self.search_type {
            SearchType::NotEquals => match self.values.first() {
                Some(value) => template.value(value.clone()),
                None => template,
            },
            _ => template.values(self.values.iter().cloned()),
        }
    }
}

/// Decides how a multi-value selection is expressed as a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSelectionOptimizer {
    /// When false, every selection becomes `IsAnyOf`.
    pub enabled: bool,
    /// Lists shorter than this are never optimized.
    pub min_dataset_size: usize,
}

impl Default for FilterSelectionOptimizer {
    fn default() -> Self {
        Self {
            enabled: true,
            min_dataset_size: DEFAULT_MIN_DATASET_SIZE,
        }
    }
}

impl FilterSelectionOptimizer {
    /// Selection ratio above which exclusion is used, by list size.
    pub fn threshold_for(total: usize) -> f64 {
        match total {
            0..=50 => 0.80,
            51..=200 => 0.75,
            201..=1000 => 0.70,
            _ => 0.65,
        }
    }

    /// Chooses a filter for `selected` out of the distinct values `all`.
    ///
    /// The column type is inferred from `all`; use [`optimize_for`] when it
    /// is already known.
    ///
    /// ```
    /// use gridfilter_engine::optimizer::FilterSelectionOptimizer;
    /// use gridfilter_model::models::{CellValue, SearchType};
    ///
    /// let all: Vec<CellValue> = (0..100).map(CellValue::from).collect();
    /// let selected = all[..96].to_vec();
    ///
    /// let result = FilterSelectionOptimizer::default().optimize(&all, &selected);
    /// assert_eq!(result.search_type, SearchType::IsNoneOf);
    /// assert_eq!(result.values.len(), 4);
    /// assert_eq!(result.values_saved, 92);
    /// ```
    ///
    /// [`optimize_for`]: FilterSelectionOptimizer::optimize_for
    pub fn optimize(&self, all: &[CellValue], selected: &[CellValue]) -> OptimizedFilterResult {
        let keys: Vec<ValueKey> = all
            .iter()
            .filter(|v| !v.is_blank())
            .map(ValueKey::new)
            .collect();
        self.optimize_for(infer_data_type(&keys), all, selected)
    }

    /// Chooses a filter for `selected` out of `all` in a column of `data_type`.
    ///
    /// A value counts as selected when the evaluator would find it equal to
    /// some selected value, so the exclusion form matches exactly the rows
    /// the inclusion form matches.
    pub fn optimize_for(
        &self,
        data_type: ColumnDataType,
        all: &[CellValue],
        selected: &[CellValue],
    ) -> OptimizedFilterResult {
        if !self.enabled {
            return OptimizedFilterResult::inclusion(selected, "optimization disabled");
        }
        if all.is_empty() || selected.is_empty() {
            return OptimizedFilterResult::inclusion(selected, "nothing to optimize");
        }

        let chosen: HashSet<ValueKey> = selected.iter().map(|v| match_key(v, data_type)).collect();
        let excluded: Vec<CellValue> = all
            .iter()
            .filter(|v| !chosen.contains(&match_key(v, data_type)))
            .cloned()
            .collect();

        if blanks_partly_selected(all, selected) {
            return OptimizedFilterResult::inclusion(selected, "blank values are only partly selected");
        }
        if excluded.is_empty() {
            return OptimizedFilterResult::inclusion(selected, "all values selected");
        }
        let total = all.len();
        if total < self.min_dataset_size {
            return OptimizedFilterResult::inclusion(
                selected,
                format!(
                    "{total} values is below the minimum of {} for optimization",
                    self.min_dataset_size
                ),
            );
        }

        let ratio = selected.len() as f64 / total as f64;
        let threshold = Self::threshold_for(total);
        if ratio <= threshold {
            return OptimizedFilterResult::inclusion(
                selected,
                format!(
                    "{:.0}% selected does not exceed the {:.0}% exclusion threshold",
                    ratio * 100.0,
                    threshold * 100.0
                ),
            );
        }

        let values_saved = selected.len().saturating_sub(excluded.len());
        // `NotEquals` against null lets empty text through; `IsNoneOf` does not.
        let search_type = if excluded.len() == 1 && !excluded[0].is_blank() {
            SearchType::NotEquals
        } else {
            SearchType::IsNoneOf
        };
        tracing::debug!(
            total,
            selected = selected.len(),
            excluded = excluded.len(),
            "selection expressed as exclusion"
        );
        OptimizedFilterResult {
            search_type,
            rationale: format!(
                "{:.0}% selected exceeds the {:.0}% threshold; excluding {} values instead of including {}",
                ratio * 100.0,
                threshold * 100.0,
                excluded.len(),
                selected.len()
            ),
            values: excluded,
            uses_exclusion: true,
            values_saved,
        }
    }
}

/// Key under which two values are equal exactly when the evaluator finds
/// them equal in a column of `data_type`.
///
/// All blanks share one key since a null operand matches every blank.
fn match_key(value: &CellValue, data_type: ColumnDataType) -> ValueKey {
    if value.is_blank() {
        return ValueKey::Null;
    }
    match data_type {
        ColumnDataType::Number => {
            if let Some(n) = value.as_f64() {
                return ValueKey::new(&CellValue::Number(n));
            }
        }
        ColumnDataType::DateTime => {
            if let Some(dt) = value.as_datetime() {
                return ValueKey::DateTime(dt);
            }
        }
        _ => {}
    }
    ValueKey::Text(value.to_string().chars().flat_map(char::to_lowercase).collect())
}

/// True when some blank text is selected without the null entry while another
/// blank is left out. Only null operands match every blank, so no exclusion
/// list reproduces such a selection.
fn blanks_partly_selected(all: &[CellValue], selected: &[CellValue]) -> bool {
    let blanks: Vec<&CellValue> = selected.iter().filter(|v| v.is_blank()).collect();
    if blanks.is_empty() || blanks.iter().any(|v| v.is_null()) {
        return false;
    }
    all.iter()
        .any(|v| v.is_blank() && !blanks.iter().any(|b| *b == v))
}
