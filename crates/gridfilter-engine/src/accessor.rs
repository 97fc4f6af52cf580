//! Resolving a column's binding path against a row.

use gridfilter_model::models::CellValue;
use serde_json::Value;

/// Reads the value a binding path points to in an item.
///
/// Resolution failures yield [`CellValue::Null`]; they are never errors.
pub trait ValueAccessor<T: ?Sized> {
    /// Returns the value at `path` in `item`.
    fn value(&self, item: &T, path: &str) -> CellValue;
}

impl<T: ?Sized, F> ValueAccessor<T> for F
where
    F: Fn(&T, &str) -> CellValue,
{
    fn value(&self, item: &T, path: &str) -> CellValue {
        self(item, path)
    }
}

/// Resolves dotted paths such as `customer.address.city` or `lines.0.qty`
/// over JSON rows.
///
/// Numeric segments index into arrays. An empty path returns the row itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPathAccessor;

impl JsonPathAccessor {
    /// Walks `path` and returns the JSON node it names, if any.
    pub fn resolve<'v>(&self, item: &'v Value, path: &str) -> Option<&'v Value> {
        let path = path.trim();
        if path.is_empty() {
            return Some(item);
        }
        path.split('.').try_fold(item, |node, segment| match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }
}

impl ValueAccessor<Value> for JsonPathAccessor {
    fn value(&self, item: &Value, path: &str) -> CellValue {
        match self.resolve(item, path) {
            Some(node) => CellValue::from_json(node),
            None => {
                tracing::trace!(path = %path, "binding path did not resolve");
                CellValue::Null
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolves_nested_paths() {
        let row = json!({ "customer": { "name": "Ada", "orders": [ { "total": 12.5 } ] } });
        let accessor = JsonPathAccessor;
        assert_eq!(accessor.value(&row, "customer.name"), CellValue::text("Ada"));
        assert_eq!(
            accessor.value(&row, "customer.orders.0.total"),
            CellValue::Number(12.5)
        );
    }

    #[test]
    fn test_missing_segments_are_null() {
        let row = json!({ "a": { "b": 1 } });
        let accessor = JsonPathAccessor;
        assert_eq!(accessor.value(&row, "a.c"), CellValue::Null);
        assert_eq!(accessor.value(&row, "a.b.c"), CellValue::Null);
        assert_eq!(accessor.value(&row, "x.0"), CellValue::Null);
    }

    #[test]
    fn test_dates_upgrade() {
        let row = json!({ "due": "2024-05-01" });
        let value = JsonPathAccessor.value(&row, "due");
        assert!(matches!(value, CellValue::DateTime(_)));
    }

    #[test]
    fn test_closure_accessor() {
        struct Row {
            age: i64,
        }
        let accessor = |row: &Row, _path: &str| CellValue::from(row.age);
        assert_eq!(accessor.value(&Row { age: 7 }, "age"), CellValue::Number(7.0));
    }
}
