//! Compiling column filters into row predicates.
//!
//! [`FilterExpressionBuilder`] turns the groups and templates of a
//! [`ColumnFilter`] into one boxed closure. Templates that need whole-column
//! statistics cannot be decided row by row; they are set aside on the
//! [`CompiledFilter`] and applied by [`CollectionFilterPass`].

use gridfilter_model::models::{
    CellValue, ColumnFilter, LogicalOperator, SearchCondition, SearchTemplate, SearchType,
};

use crate::accessor::ValueAccessor;
use crate::collection::CollectionContext;
use crate::error::{FilterError, FilterResult};
use crate::evaluator::{like_to_regex, SearchEngine};

/// A compiled row test.
pub type Predicate<'a, T> = Box<dyn Fn(&T) -> bool + 'a>;

/// Joins two predicates with AND.
pub fn and<'a, T: 'a>(left: Predicate<'a, T>, right: Predicate<'a, T>) -> Predicate<'a, T> {
    Box::new(move |item: &T| left(item) && right(item))
}

/// Joins two predicates with OR.
pub fn or<'a, T: 'a>(left: Predicate<'a, T>, right: Predicate<'a, T>) -> Predicate<'a, T> {
    Box::new(move |item: &T| left(item) || right(item))
}

fn combine<'a, T: 'a>(
    left: Option<Predicate<'a, T>>,
    right: Predicate<'a, T>,
    operator: LogicalOperator,
) -> Predicate<'a, T> {
    match (left, operator) {
        (None, _) => right,
        (Some(left), LogicalOperator::And) => and(left, right),
        (Some(left), LogicalOperator::Or) => or(left, right),
    }
}

/// The result of compiling one column filter.
pub struct CompiledFilter<'a, T> {
    /// Row test for every row-local template; `None` if there were none.
    pub predicate: Option<Predicate<'a, T>>,
    /// True if some templates were left for a collection pass.
    pub has_collection_context_filters: bool,
    /// True for multi-group filters and filters with collection templates.
    pub has_custom_expression: bool,
    /// Conditions of the collection-aware templates, in template order.
    pub collection_conditions: Vec<SearchCondition>,
}

impl<T> CompiledFilter<'_, T> {
    /// Applies the row-local predicate; rows pass when there is none.
    pub fn matches(&self, item: &T) -> bool {
        self.predicate.as_ref().map_or(true, |p| p(item))
    }
}

impl<T> std::fmt::Debug for CompiledFilter<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledFilter")
            .field("has_predicate", &self.predicate.is_some())
            .field("has_collection_context_filters", &self.has_collection_context_filters)
            .field("has_custom_expression", &self.has_custom_expression)
            .field("collection_conditions", &self.collection_conditions.len())
            .finish()
    }
}

/// Builds predicates for column filters.
pub struct FilterExpressionBuilder<'a, T> {
    engine: &'a SearchEngine,
    accessor: &'a dyn ValueAccessor<T>,
}

impl<'a, T: 'a> FilterExpressionBuilder<'a, T> {
    /// Creates a builder that reads values through `accessor`.
    pub fn new(engine: &'a SearchEngine, accessor: &'a dyn ValueAccessor<T>) -> Self {
        Self { engine, accessor }
    }

    /// Compiles every group and template of `filter`.
    ///
    /// Templates are joined to their predecessor by their own operator, and
    /// groups likewise by the group operator, left to right. Collection-aware
    /// templates ignore their operator; see [`CollectionFilterPass`].
    pub fn build(&self, filter: &'a ColumnFilter) -> CompiledFilter<'a, T> {
        let path = filter.column_path.as_str();
        let mut collection_conditions = Vec::new();
        let mut predicate: Option<Predicate<'a, T>> = None;

        for group in &filter.groups {
            let mut group_predicate: Option<Predicate<'a, T>> = None;
            for template in &group.templates {
                let condition = SearchCondition::from_template(template, filter.data_type);
                if template.search_type.requires_collection() {
                    if template.operator == LogicalOperator::Or {
                        tracing::debug!(
                            column = %filter.column_name,
                            search_type = ?template.search_type,
                            "collection template is AND-ed despite its Or operator"
                        );
                    }
                    collection_conditions.push(condition);
                    continue;
                }
                let compiled = self.compile(template, condition, path);
                group_predicate = Some(combine(group_predicate, compiled, template.operator));
            }
            if let Some(group_predicate) = group_predicate {
                predicate = Some(combine(predicate, group_predicate, group.effective_operator()));
            }
        }

        let has_collection_context_filters = !collection_conditions.is_empty();
        tracing::debug!(
            column = %filter.column_name,
            groups = filter.groups.len(),
            deferred = collection_conditions.len(),
            "compiled column filter"
        );
        CompiledFilter {
            predicate,
            has_collection_context_filters,
            has_custom_expression: filter.groups.len() > 1 || has_collection_context_filters,
            collection_conditions,
        }
    }

    fn compile(
        &self,
        template: &SearchTemplate,
        condition: SearchCondition,
        path: &'a str,
    ) -> Predicate<'a, T> {
        match self.specialize(&condition, path) {
            Ok(Some(predicate)) => predicate,
            Ok(None) => self.generic(condition, path),
            Err(e) => {
                tracing::warn!(
                    search_type = ?template.search_type,
                    error = %e,
                    "falling back to generic evaluation"
                );
                self.generic(condition, path)
            }
        }
    }

    /// Evaluates the condition through the engine for every row.
    fn generic(&self, condition: SearchCondition, path: &'a str) -> Predicate<'a, T> {
        let engine = self.engine;
        let accessor = self.accessor;
        Box::new(move |item: &T| engine.evaluate_condition(&accessor.value(item, path), &condition))
    }

    /// Builds a direct closure for search types with precomputable operands.
    ///
    /// Returns `Ok(None)` for search types that always go through the engine.
    fn specialize(
        &self,
        condition: &SearchCondition,
        path: &'a str,
    ) -> FilterResult<Option<Predicate<'a, T>>> {
        let accessor = self.accessor;
        let search_type = condition.search_type;
        match search_type {
            SearchType::Contains
            | SearchType::DoesNotContain
            | SearchType::StartsWith
            | SearchType::EndsWith => {
                let needle = condition.string_value.to_lowercase();
                Ok(Some(Box::new(move |item: &T| {
                    let text = accessor.value(item, path).to_string().to_lowercase();
                    match search_type {
                        SearchType::Contains => text.contains(&needle),
                        SearchType::DoesNotContain => !text.contains(&needle),
                        SearchType::StartsWith => text.starts_with(&needle),
                        _ => text.ends_with(&needle),
                    }
                })))
            }
            SearchType::IsLike | SearchType::IsNotLike => {
                let regex = like_to_regex(&condition.string_value)?;
                let expected = search_type == SearchType::IsLike;
                Ok(Some(Box::new(move |item: &T| {
                    regex.is_match(&accessor.value(item, path).to_string()) == expected
                })))
            }
            SearchType::Equals
            | SearchType::NotEquals
            | SearchType::LessThan
            | SearchType::LessThanOrEqualTo
            | SearchType::GreaterThan
            | SearchType::GreaterThanOrEqualTo
            | SearchType::Between
            | SearchType::NotBetween
                if condition.is_numeric() =>
            {
                self.specialize_numeric(condition, path).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Numeric comparisons on `f64`; non-numeric cells go through the engine.
    fn specialize_numeric(
        &self,
        condition: &SearchCondition,
        path: &'a str,
    ) -> FilterResult<Predicate<'a, T>> {
        let number = |value: &CellValue| match value {
            CellValue::Number(n) if n.is_finite() => Ok(*n),
            other => Err(FilterError::conversion(other, "a number")),
        };
        let search_type = condition.search_type;
        let low = number(&condition.primary_value)?;
        let high = if search_type.takes_range() {
            number(&condition.secondary_value)?
        } else {
            low
        };
        let (low, high) = if low > high { (high, low) } else { (low, high) };

        let test = move |n: f64| match search_type {
            SearchType::Equals => n == low,
            SearchType::NotEquals => n != low,
            SearchType::LessThan => n < low,
            SearchType::LessThanOrEqualTo => n <= low,
            SearchType::GreaterThan => n > low,
            SearchType::GreaterThanOrEqualTo => n >= low,
            SearchType::Between => low <= n && n <= high,
            _ => !(low <= n && n <= high),
        };

        let engine = self.engine;
        let accessor = self.accessor;
        let fallback = condition.clone();
        Ok(Box::new(move |item: &T| {
            let value = accessor.value(item, path);
            match value.as_f64() {
                Some(n) if !value.is_null() => test(n),
                _ => engine.evaluate_condition(&value, &fallback),
            }
        }))
    }
}

/// Applies column filters to a slice, collection-aware templates included.
///
/// Row-local templates run through the compiled predicates. Collection-aware
/// templates are then evaluated against statistics of the full slice and
/// AND-ed with the row result.
///
/// The operator of a collection-aware template is not applied: a row must
/// pass the row-local expression and every collection condition, whether
/// the template says And or Or.
pub struct CollectionFilterPass<'a, T> {
    engine: &'a SearchEngine,
    accessor: &'a dyn ValueAccessor<T>,
}

impl<'a, T: 'a> CollectionFilterPass<'a, T> {
    /// Creates a pass that reads values through `accessor`.
    pub fn new(engine: &'a SearchEngine, accessor: &'a dyn ValueAccessor<T>) -> Self {
        Self { engine, accessor }
    }

    /// Returns the indices of the items that pass every filter.
    pub fn apply(&self, items: &'a [T], filters: &'a [ColumnFilter]) -> Vec<usize> {
        let builder = FilterExpressionBuilder::new(self.engine, self.accessor);
        let compiled: Vec<(&ColumnFilter, CompiledFilter<'a, T>)> =
            filters.iter().map(|f| (f, builder.build(f))).collect();

        let contexts: Vec<Option<CollectionContext<'a, T>>> = compiled
            .iter()
            .map(|(filter, c)| {
                c.has_collection_context_filters.then(|| {
                    CollectionContext::new(items, filter.column_path.as_str(), self.accessor)
                        .with_data_type(filter.data_type)
                })
            })
            .collect();

        let passed: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                compiled.iter().zip(&contexts).all(|((filter, c), ctx)| {
                    if !c.matches(item) {
                        return false;
                    }
                    let Some(ctx) = ctx else {
                        return true;
                    };
                    let value = self.accessor.value(item, &filter.column_path);
                    c.collection_conditions
                        .iter()
                        .all(|condition| self.engine.evaluate_condition_in(&value, condition, ctx))
                })
            })
            .map(|(i, _)| i)
            .collect();

        tracing::debug!(
            items = items.len(),
            filters = filters.len(),
            passed = passed.len(),
            "collection filter pass"
        );
        passed
    }
}
