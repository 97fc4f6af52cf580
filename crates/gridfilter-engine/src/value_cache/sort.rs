//! Data type inference and type-aware ordering of distinct values.

use std::cmp::Ordering;

use gridfilter_model::models::{CellValue, ColumnDataType};

use crate::metadata::ValueKey;

/// Number of distinct values inspected when inferring a column's data type.
pub const INFERENCE_SAMPLE_SIZE: usize = 100;

/// Infers the data type of a set of distinct, non-blank values.
///
/// The sample is the whole set when it has at most
/// [`INFERENCE_SAMPLE_SIZE`] values, otherwise the first values in key order,
/// so the result never depends on insertion order. Types are tried in
/// priority order DateTime, Boolean, Number, Enum; a type wins when every
/// sampled value is of that type or is text convertible to it. Anything else
/// is a String column.
pub fn infer_data_type<'a, I>(keys: I) -> ColumnDataType
where
    I: IntoIterator<Item = &'a ValueKey>,
{
    let mut sample: Vec<&ValueKey> = keys.into_iter().collect();
    if sample.len() > INFERENCE_SAMPLE_SIZE {
        sample.sort_unstable();
        sample.truncate(INFERENCE_SAMPLE_SIZE);
    }
    if sample.is_empty() {
        return ColumnDataType::String;
    }

    let all = |pred: fn(&ValueKey) -> bool| sample.iter().all(|k| pred(k));

    if all(|k| match k {
        ValueKey::DateTime(_) => true,
        ValueKey::Text(s) => CellValue::text(s.as_str()).as_datetime().is_some(),
        _ => false,
    }) {
        ColumnDataType::DateTime
    } else if all(|k| match k {
        ValueKey::Boolean(_) => true,
        ValueKey::Text(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "false"),
        _ => false,
    }) {
        ColumnDataType::Boolean
    } else if all(|k| match k {
        ValueKey::Number(_) => true,
        ValueKey::Text(s) => CellValue::text(s.as_str()).as_f64().is_some(),
        _ => false,
    }) {
        ColumnDataType::Number
    } else if all(|k| matches!(k, ValueKey::Enum(_))) {
        ColumnDataType::Enum
    } else {
        ColumnDataType::String
    }
}

/// Orders two values for a column of `data_type`.
///
/// Values convertible to the column type sort first, in their natural order;
/// the rest follow in case-insensitive text order. Ties fall back to ordinal
/// text comparison and finally to the normalized key, which makes the order
/// total and independent of input order.
pub fn compare_for_type(data_type: ColumnDataType, a: &CellValue, b: &CellValue) -> Ordering {
    let typed = match data_type {
        ColumnDataType::Number => compare_converted(a.as_f64(), b.as_f64(), |x, y| x.total_cmp(y)),
        ColumnDataType::DateTime => compare_converted(a.as_datetime(), b.as_datetime(), Ord::cmp),
        ColumnDataType::Boolean => compare_converted(a.as_bool(), b.as_bool(), Ord::cmp),
        ColumnDataType::String | ColumnDataType::Enum => Some(Ordering::Equal),
    };

    typed
        .unwrap_or(Ordering::Equal)
        .then_with(|| compare_text_ci(&a.to_string(), &b.to_string()))
        .then_with(|| a.to_string().cmp(&b.to_string()))
        .then_with(|| ValueKey::new(a).cmp(&ValueKey::new(b)))
}

/// Compares two optional converted values: converted before unconverted.
///
/// Returns `None` when neither side converted, leaving the text comparison
/// to decide.
fn compare_converted<T>(
    a: Option<T>,
    b: Option<T>,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Option<Ordering> {
    match (a, b) {
        (Some(x), Some(y)) => Some(cmp(&x, &y)),
        (Some(_), None) => Some(Ordering::Less),
        (None, Some(_)) => Some(Ordering::Greater),
        (None, None) => None,
    }
}

/// Ordinal case-insensitive text comparison.
pub fn compare_text_ci(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
