//! Evaluation of column values against search conditions.
//!
//! Each [`SearchType`] is handled by a [`SearchEvaluator`]. The
//! [`SearchEvaluatorFactory`] maps search types to evaluators and the
//! [`SearchEngine`] is the safe entry point: it turns every failure into
//! "no match".
//!
//! # Example
//!
//! ```
//! use gridfilter_engine::evaluator::SearchEngine;
//! use gridfilter_model::models::{CellValue, ColumnDataType, SearchCondition, SearchType};
//!
//! let engine = SearchEngine::standard();
//! let between = SearchCondition::new(
//!     SearchType::Between,
//!     ColumnDataType::Number,
//!     CellValue::Number(5.0),
//!     CellValue::Number(10.0),
//! );
//!
//! assert!(engine.evaluate_condition(&CellValue::Number(10.0), &between));
//! assert!(!engine.evaluate_condition(&CellValue::Number(10.0001), &between));
//! ```

mod compare;
mod evaluators;
mod factory;
mod pattern;

pub use compare::{compare_values, values_equal};
pub use evaluators::{
    CollectionEvaluator, ComparisonEvaluator, DateIntervalEvaluator, ListEvaluator,
    NullCheckEvaluator, PatternEvaluator, RangeEvaluator, TextEvaluator,
};
pub use factory::SearchEvaluatorFactory;
pub use pattern::like_to_regex;

use chrono::NaiveDate;
use gridfilter_model::models::{CellValue, SearchCondition, SearchType};

use crate::collection::CollectionStats;
use crate::error::FilterResult;

/// Strategy for one search type.
pub trait SearchEvaluator: Send + Sync {
    /// The search type this evaluator handles.
    fn search_type(&self) -> SearchType;

    /// Tests a single value against the condition.
    fn evaluate(&self, value: &CellValue, condition: &SearchCondition) -> FilterResult<bool>;

    /// Returns true if evaluation needs whole-column statistics.
    fn requires_collection_context(&self) -> bool {
        false
    }

    /// Tests a value with access to whole-column statistics.
    fn evaluate_in(
        &self,
        value: &CellValue,
        condition: &SearchCondition,
        stats: &dyn CollectionStats,
    ) -> FilterResult<bool> {
        let _ = stats;
        self.evaluate(value, condition)
    }
}

/// Evaluates conditions through a factory, never failing.
#[derive(Debug)]
pub struct SearchEngine {
    factory: SearchEvaluatorFactory,
}

impl SearchEngine {
    /// Creates an engine over `factory`.
    pub fn new(factory: SearchEvaluatorFactory) -> Self {
        Self { factory }
    }

    /// Creates an engine with every standard evaluator.
    pub fn standard() -> Self {
        Self::new(SearchEvaluatorFactory::standard())
    }

    /// Creates a standard engine whose date intervals are relative to `today`.
    pub fn standard_at(today: NaiveDate) -> Self {
        Self::new(SearchEvaluatorFactory::standard_at(today))
    }

    /// The evaluators this engine dispatches to.
    pub fn factory(&self) -> &SearchEvaluatorFactory {
        &self.factory
    }

    /// Returns true if `value` satisfies `condition`.
    ///
    /// Missing evaluators and evaluation errors yield `false`.
    pub fn evaluate_condition(&self, value: &CellValue, condition: &SearchCondition) -> bool {
        let Some(evaluator) = self.factory.get(condition.search_type) else {
            tracing::warn!(search_type = ?condition.search_type, "no evaluator registered");
            return false;
        };
        settle(condition.search_type, evaluator.evaluate(value, condition))
    }

    /// Like [`evaluate_condition`](Self::evaluate_condition), with column statistics.
    pub fn evaluate_condition_in(
        &self,
        value: &CellValue,
        condition: &SearchCondition,
        stats: &dyn CollectionStats,
    ) -> bool {
        let Some(evaluator) = self.factory.get(condition.search_type) else {
            tracing::warn!(search_type = ?condition.search_type, "no evaluator registered");
            return false;
        };
        settle(
            condition.search_type,
            evaluator.evaluate_in(value, condition, stats),
        )
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::standard()
    }
}

fn settle(search_type: SearchType, result: FilterResult<bool>) -> bool {
    match result {
        Ok(matched) => matched,
        Err(e) => {
            tracing::debug!(search_type = ?search_type, error = %e, "evaluation failed; treating as no match");
            false
        }
    }
}
