//! Lookup table from search type to evaluator.

use std::collections::HashMap;

use chrono::NaiveDate;
use gridfilter_model::models::SearchType;

use super::evaluators::{
    CollectionEvaluator, ComparisonEvaluator, DateIntervalEvaluator, ListEvaluator,
    NullCheckEvaluator, PatternEvaluator, RangeEvaluator, TextEvaluator,
};
use super::SearchEvaluator;

/// Holds one evaluator per registered search type.
#[derive(Default)]
pub struct SearchEvaluatorFactory {
    evaluators: HashMap<SearchType, Box<dyn SearchEvaluator>>,
}

impl SearchEvaluatorFactory {
    /// Creates a factory with no evaluators.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registers every standard evaluator; date intervals use the local date.
    pub fn standard() -> Self {
        Self::build(DateIntervalEvaluator::new())
    }

    /// Like [`standard`](Self::standard), with date intervals relative to `today`.
    pub fn standard_at(today: NaiveDate) -> Self {
        Self::build(DateIntervalEvaluator::at(today))
    }

    fn build(date_interval: DateIntervalEvaluator) -> Self {
        let mut factory = Self::empty();
        for t in SearchType::ALL {
            let evaluator: Box<dyn SearchEvaluator> = match t {
                SearchType::Contains
                | SearchType::DoesNotContain
                | SearchType::StartsWith
                | SearchType::EndsWith => Box::new(TextEvaluator::new(t)),
                SearchType::Equals
                | SearchType::NotEquals
                | SearchType::LessThan
                | SearchType::LessThanOrEqualTo
                | SearchType::GreaterThan
                | SearchType::GreaterThanOrEqualTo => Box::new(ComparisonEvaluator::new(t)),
                SearchType::Between | SearchType::NotBetween | SearchType::BetweenDates => {
                    Box::new(RangeEvaluator::new(t))
                }
                SearchType::IsAnyOf | SearchType::IsNoneOf | SearchType::IsOnAnyOfDates => {
                    Box::new(ListEvaluator::new(t))
                }
                SearchType::IsLike | SearchType::IsNotLike => Box::new(PatternEvaluator::new(t)),
                SearchType::IsNull | SearchType::IsNotNull => Box::new(NullCheckEvaluator::new(t)),
                SearchType::DateInterval => Box::new(date_interval),
                SearchType::TopN
                | SearchType::BottomN
                | SearchType::AboveAverage
                | SearchType::BelowAverage
                | SearchType::Unique
                | SearchType::Duplicate => Box::new(CollectionEvaluator::new(t)),
            };
            factory.register(evaluator);
        }
        factory
    }

    /// Adds or replaces the evaluator for its search type.
    pub fn register(&mut self, evaluator: Box<dyn SearchEvaluator>) {
        self.evaluators.insert(evaluator.search_type(), evaluator);
    }

    /// Removes the evaluator for `search_type`.
    pub fn unregister(&mut self, search_type: SearchType) -> Option<Box<dyn SearchEvaluator>> {
        self.evaluators.remove(&search_type)
    }

    /// The evaluator for `search_type`, if registered.
    pub fn get(&self, search_type: SearchType) -> Option<&dyn SearchEvaluator> {
        self.evaluators.get(&search_type).map(Box::as_ref)
    }

    /// Number of registered evaluators.
    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }
}

impl std::fmt::Debug for SearchEvaluatorFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<_> = self.evaluators.keys().collect();
        types.sort();
        f.debug_struct("SearchEvaluatorFactory")
            .field("search_types", &types)
            .finish()
    }
}
