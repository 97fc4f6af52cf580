//! Whole-column statistics for collection-aware search types.

use std::cell::OnceCell;
use std::collections::HashMap;

use gridfilter_model::models::{CellValue, ColumnDataType};

use crate::accessor::ValueAccessor;
use crate::metadata::ValueKey;
use crate::value_cache::{compare_for_type, infer_data_type};

/// Read-only view of column statistics used by evaluators.
pub trait CollectionStats {
    /// Data type the sequences were ordered by.
    fn data_type(&self) -> ColumnDataType;

    /// Mean of the numeric values, or `None` when there are none.
    fn average(&self) -> Option<f64>;

    /// Non-blank values in ascending order, one entry per item.
    fn sorted_ascending(&self) -> &[CellValue];

    /// Non-blank values in descending order, one entry per item.
    fn sorted_descending(&self) -> &[CellValue];

    /// Number of items holding `value`; 0 for blanks.
    fn frequency(&self, value: &CellValue) -> usize;
}

/// Lazily computed statistics over one column of a set of items.
///
/// Values are extracted once through the accessor; each aggregate is built
/// on first request and reused afterwards. A context belongs to a single
/// filtering pass.
pub struct CollectionContext<'a, T> {
    items: &'a [T],
    path: &'a str,
    accessor: &'a dyn ValueAccessor<T>,
    data_type: OnceCell<ColumnDataType>,
    extracted: OnceCell<Vec<(usize, CellValue)>>,
    average: OnceCell<Option<f64>>,
    ascending: OnceCell<Vec<CellValue>>,
    descending: OnceCell<Vec<CellValue>>,
    groups: OnceCell<HashMap<ValueKey, Vec<usize>>>,
}

impl<'a, T> CollectionContext<'a, T> {
    /// Creates a context; nothing is extracted until a statistic is needed.
    pub fn new(items: &'a [T], path: &'a str, accessor: &'a dyn ValueAccessor<T>) -> Self {
        Self {
            items,
            path,
            accessor,
            data_type: OnceCell::new(),
            extracted: OnceCell::new(),
            average: OnceCell::new(),
            ascending: OnceCell::new(),
            descending: OnceCell::new(),
            groups: OnceCell::new(),
        }
    }

    /// Fixes the data type instead of inferring it from the values.
    pub fn with_data_type(self, data_type: ColumnDataType) -> Self {
        let _ = self.data_type.set(data_type);
        self
    }

    /// The binding path this context reads.
    pub fn path(&self) -> &str {
        self.path
    }

    /// Number of items in the collection.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// `(item index, value)` for every item whose value is not blank.
    pub fn values(&self) -> &[(usize, CellValue)] {
        self.extracted.get_or_init(|| {
            let extracted: Vec<_> = self
                .items
                .iter()
                .enumerate()
                .map(|(i, item)| (i, self.accessor.value(item, self.path)))
                .filter(|(_, value)| !value.is_blank())
                .collect();
            tracing::trace!(path = %self.path, values = extracted.len(), "extracted column values");
            extracted
        })
    }

    /// Indices of the items holding `value`.
    pub fn item_indices(&self, value: &CellValue) -> &[usize] {
        self.groups()
            .get(&ValueKey::new(value))
            .map_or(&[][..], Vec::as_slice)
    }

    fn groups(&self) -> &HashMap<ValueKey, Vec<usize>> {
        self.groups.get_or_init(|| {
            let mut groups: HashMap<ValueKey, Vec<usize>> = HashMap::new();
            for (index, value) in self.values() {
                groups.entry(ValueKey::new(value)).or_default().push(*index);
            }
            groups
        })
    }

    /// Values the ordering can rank: for typed columns, only convertible ones.
    fn rankable(&self) -> Vec<CellValue> {
        let data_type = self.data_type();
        self.values()
            .iter()
            .map(|(_, value)| value)
            .filter(|value| match data_type {
                ColumnDataType::Number => value.as_f64().is_some(),
                ColumnDataType::DateTime => value.as_datetime().is_some(),
                ColumnDataType::Boolean => value.as_bool().is_some(),
                ColumnDataType::String | ColumnDataType::Enum => true,
            })
            .cloned()
            .collect()
    }
}

impl<T> CollectionStats for CollectionContext<'_, T> {
    fn data_type(&self) -> ColumnDataType {
        *self
            .data_type
            .get_or_init(|| infer_data_type(self.groups().keys()))
    }

    fn average(&self) -> Option<f64> {
        *self.average.get_or_init(|| {
            let (sum, count) = self
                .values()
                .iter()
                .filter_map(|(_, value)| match value {
                    CellValue::Boolean(_) => None,
                    other => other.as_f64(),
                })
                .fold((0.0, 0usize), |(sum, count), n| (sum + n, count + 1));
            (count > 0).then(|| sum / count as f64)
        })
    }

    fn sorted_ascending(&self) -> &[CellValue] {
        self.ascending.get_or_init(|| {
            let data_type = self.data_type();
            let mut values = self.rankable();
            values.sort_by(|a, b| compare_for_type(data_type, a, b));
            values
        })
    }

    fn sorted_descending(&self) -> &[CellValue] {
        self.descending.get_or_init(|| {
            let data_type = self.data_type();
            let mut values = self.rankable();
            values.sort_by(|a, b| compare_for_type(data_type, b, a));
            values
        })
    }

    fn frequency(&self, value: &CellValue) -> usize {
        if value.is_blank() {
            return 0;
        }
        self.item_indices(value).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::JsonPathAccessor;
    use serde_json::{json, Value};

    fn rows() -> Vec<Value> {
        vec![
            json!({ "n": 10 }),
            json!({ "n": 2 }),
            json!({ "n": null }),
            json!({ "n": 7 }),
            json!({ "n": 10 }),
            json!({ "n": "n/a" }),
        ]
    }

    #[test]
    fn test_values_skip_blanks() {
        let rows = rows();
        let ctx = CollectionContext::new(&rows, "n", &JsonPathAccessor);
        assert_eq!(ctx.values().len(), 5);
        assert_eq!(ctx.item_count(), 6);
    }

    #[test]
    fn test_average_ignores_non_numeric() {
        let rows = rows();
        let ctx = CollectionContext::new(&rows, "n", &JsonPathAccessor);
        assert_eq!(ctx.average(), Some(29.0 / 4.0));
    }

    #[test]
    fn test_sorted_sequences_typed() {
        let rows = rows();
        let ctx = CollectionContext::new(&rows, "n", &JsonPathAccessor)
            .with_data_type(ColumnDataType::Number);
        assert_eq!(
            ctx.sorted_ascending(),
            &[
                CellValue::Number(2.0),
                CellValue::Number(7.0),
                CellValue::Number(10.0),
                CellValue::Number(10.0)
            ]
        );
        assert_eq!(ctx.sorted_descending()[0], CellValue::Number(10.0));
        assert_eq!(ctx.sorted_descending().len(), 4);
    }

    #[test]
    fn test_inferred_type_of_mixed_column_is_string() {
        let rows = rows();
        let ctx = CollectionContext::new(&rows, "n", &JsonPathAccessor);
        assert_eq!(ctx.data_type(), ColumnDataType::String);
        assert_eq!(ctx.sorted_ascending().len(), 5);
    }

    #[test]
    fn test_frequency_groups() {
        let rows = rows();
        let ctx = CollectionContext::new(&rows, "n", &JsonPathAccessor);
        assert_eq!(ctx.frequency(&CellValue::Number(10.0)), 2);
        assert_eq!(ctx.frequency(&CellValue::Number(7.0)), 1);
        assert_eq!(ctx.frequency(&CellValue::Null), 0);
        assert_eq!(ctx.item_indices(&CellValue::Number(10.0)), &[0, 4]);
    }

    #[test]
    fn test_empty_collection() {
        let rows: Vec<Value> = Vec::new();
        let ctx = CollectionContext::new(&rows, "n", &JsonPathAccessor);
        assert_eq!(ctx.average(), None);
        assert!(ctx.sorted_descending().is_empty());
    }

    #[test]
    fn test_usable_as_trait_object() {
        let rows = rows();
        let ctx = CollectionContext::new(&rows, "n", &JsonPathAccessor);
        let stats: &dyn CollectionStats = &ctx;
        assert_eq!(stats.frequency(&CellValue::Number(2.0)), 1);
    }
}
