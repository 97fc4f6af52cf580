//! Property-based tests for the value cache, optimizer and evaluators.
//!
//! These check invariants that hold for any input:
//! - caches do not depend on input order and never list blanks
//! - incremental updates agree with building from scratch
//! - an optimized selection matches the same rows as the plain selection
//! - comparisons are total and antisymmetric
//! - evaluation never fails, it only answers false

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::NaiveDate;
use gridfilter_engine::evaluator::{compare_values, SearchEngine};
use gridfilter_engine::metadata::ValueKey;
use gridfilter_engine::optimizer::FilterSelectionOptimizer;
use gridfilter_engine::value_cache::{CacheUpdate, ColumnValueCache};
use gridfilter_model::models::{
    CellValue, ColumnDataType, SearchCondition, SearchTemplate, SearchType,
};
use proptest::prelude::*;

fn arb_cell_value() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        1 => Just(CellValue::Null),
        3 => "[a-cA-C ]{0,3}".prop_map(CellValue::Text),
        3 => (-50i32..50).prop_map(CellValue::from),
        1 => any::<bool>().prop_map(CellValue::Boolean),
        2 => (0i64..40).prop_map(|days| {
            let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            CellValue::date(base + chrono::Duration::days(days))
        }),
    ]
}

fn arb_data_type() -> impl Strategy<Value = ColumnDataType> {
    prop::sample::select(ColumnDataType::ALL.to_vec())
}

fn arb_search_type() -> impl Strategy<Value = SearchType> {
    prop::sample::select(SearchType::ALL.to_vec())
}

fn assert_same_cache(a: &ColumnValueCache, b: &ColumnValueCache) -> Result<(), TestCaseError> {
    prop_assert_eq!(a.values(), b.values());
    prop_assert_eq!(a.value_counts(), b.value_counts());
    prop_assert_eq!(a.null_count(), b.null_count());
    prop_assert_eq!(a.data_type(), b.data_type());
    Ok(())
}

mod cache_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn cache_is_independent_of_input_order(
            (values, shuffled) in prop::collection::vec(arb_cell_value(), 0..60)
                .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
        ) {
            let a = ColumnValueCache::new(values);
            let b = ColumnValueCache::new(shuffled);
            assert_same_cache(&a, &b)?;
        }

        #[test]
        fn cache_never_lists_blanks(values in prop::collection::vec(arb_cell_value(), 0..60)) {
            let blanks = values.iter().filter(|v| v.is_blank()).count();
            let cache = ColumnValueCache::new(values.clone());

            prop_assert!(cache.values().iter().all(|v| !v.is_blank()));
            prop_assert_eq!(cache.contains_null_values(), blanks > 0);
            prop_assert_eq!(cache.null_count(), blanks);

            let distinct: HashSet<ValueKey> = values
                .iter()
                .filter(|v| !v.is_blank())
                .map(ValueKey::new)
                .collect();
            prop_assert_eq!(cache.len(), distinct.len());
        }

        #[test]
        fn add_values_matches_full_build(
            a in prop::collection::vec(arb_cell_value(), 0..40),
            b in prop::collection::vec(arb_cell_value(), 0..40),
        ) {
            let full = ColumnValueCache::new(a.iter().chain(&b).cloned());
            match ColumnValueCache::new(a.clone()).add_values(b.clone()) {
                CacheUpdate::Updated(incremental) => assert_same_cache(&incremental, &full)?,
                CacheUpdate::Unchanged => {
                    prop_assert!(b.is_empty());
                    assert_same_cache(&ColumnValueCache::new(a), &full)?;
                }
                CacheUpdate::NeedsFullRebuild => prop_assert!(false, "unexpected rebuild"),
            }
        }

        #[test]
        fn remove_values_undoes_add(
            a in prop::collection::vec(arb_cell_value(), 0..40),
            b in prop::collection::vec(arb_cell_value(), 1..40),
        ) {
            let combined = ColumnValueCache::new(a.iter().chain(&b).cloned());
            let removed = combined.remove_values(b).into_updated();
            prop_assert!(removed.is_some());
            if let Some(removed) = removed {
                assert_same_cache(&removed, &ColumnValueCache::new(a))?;
            }
        }
    }
}

mod optimizer_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn optimized_filter_matches_exactly_the_selection(
            (rows, picks) in prop::collection::vec(arb_cell_value(), 1..120)
                .prop_flat_map(|rows| {
                    let n = rows.len() + 1;
                    (Just(rows), prop::collection::vec(any::<bool>(), n))
                }),
            min_dataset_size in 0usize..20,
        ) {
            // the picker's list: one blank entry first, then the distinct values
            let cache = ColumnValueCache::new(rows.clone());
            let data_type = cache.data_type();
            let all: Vec<CellValue> = cache
                .contains_null_values()
                .then_some(CellValue::Null)
                .into_iter()
                .chain(cache.values().iter().cloned())
                .collect();
            let selected: Vec<CellValue> = all
                .iter()
                .zip(&picks)
                .filter(|(_, picked)| **picked)
                .map(|(v, _)| v.clone())
                .collect();

            let optimizer = FilterSelectionOptimizer { enabled: true, min_dataset_size };
            let result = optimizer.optimize(&all, &selected);
            prop_assert!(!result.rationale.is_empty());

            let engine = SearchEngine::standard();
            let optimized = SearchCondition::from_template(&result.to_template(), data_type);
            let inclusion = SearchCondition::from_template(
                &SearchTemplate::new(SearchType::IsAnyOf).values(selected.iter().cloned()),
                data_type,
            );
            for row in &rows {
                prop_assert_eq!(
                    engine.evaluate_condition(row, &optimized),
                    engine.evaluate_condition(row, &inclusion),
                    "row {:?} under {:?}",
                    row,
                    result.search_type
                );
            }

            if result.uses_exclusion {
                prop_assert_eq!(result.values_saved, selected.len() - result.values.len());
                prop_assert!(result.values.len() < selected.len());
                if result.search_type == SearchType::NotEquals {
                    prop_assert!(!result.values[0].is_blank());
                }
            } else {
                prop_assert_eq!(result.values_saved, 0);
                prop_assert_eq!(result.search_type, SearchType::IsAnyOf);
            }
        }

        #[test]
        fn optimized_filter_matches_numeric_selection(
            picks in prop::collection::vec(any::<bool>(), 1..300),
            min_dataset_size in 0usize..20,
        ) {
            let all: Vec<CellValue> = (0..picks.len()).map(|i| CellValue::Number(i as f64)).collect();
            let selected: Vec<CellValue> = all
                .iter()
                .zip(&picks)
                .filter(|(_, picked)| **picked)
                .map(|(v, _)| v.clone())
                .collect();

            let optimizer = FilterSelectionOptimizer { enabled: true, min_dataset_size };
            let result = optimizer.optimize(&all, &selected);

            let engine = SearchEngine::standard();
            let condition = SearchCondition::from_template(&result.to_template(), ColumnDataType::Number);
            let matched: Vec<CellValue> = all
                .iter()
                .filter(|v| engine.evaluate_condition(v, &condition))
                .cloned()
                .collect();
            prop_assert_eq!(&matched, &selected);
        }
    }
}

mod evaluator_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn comparison_is_total_and_antisymmetric(
            a in arb_cell_value(),
            b in arb_cell_value(),
            data_type in arb_data_type(),
        ) {
            let condition = SearchCondition::without_operands(SearchType::Equals, data_type);
            let ab = compare_values(&a, &condition, &b);
            let ba = compare_values(&b, &condition, &a);
            prop_assert!(ab.is_ok() && ba.is_ok());
            if let (Ok(ab), Ok(ba)) = (ab, ba) {
                prop_assert_eq!(ab, ba.reverse());
            }
            prop_assert_eq!(compare_values(&a, &condition, &a), Ok(Ordering::Equal));
        }

        #[test]
        fn evaluation_never_fails(
            value in arb_cell_value(),
            primary in arb_cell_value(),
            secondary in arb_cell_value(),
            list in prop::collection::vec(arb_cell_value(), 0..4),
            search_type in arb_search_type(),
            data_type in arb_data_type(),
        ) {
            let engine = SearchEngine::standard();
            let mut condition = SearchCondition::new(search_type, data_type, primary, secondary);
            condition.raw_values = list;

            let matched = engine.evaluate_condition(&value, &condition);
            if search_type.requires_collection() {
                prop_assert!(!matched, "collection-aware types need a context");
            }
        }
    }
}
