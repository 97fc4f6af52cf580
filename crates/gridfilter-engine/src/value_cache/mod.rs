//! Deduplicated, sorted caches of the distinct values of a column.
//!
//! A [`ColumnValueCache`] feeds filter dropdowns: it holds every distinct
//! non-blank value once, how often each occurred, and whether blanks were
//! seen. Caches are immutable; incremental updates return a new cache (or a
//! signal that the caller must rebuild) through [`CacheUpdate`].

mod manager;
mod sort;

pub use manager::ValueCacheManager;
pub use sort::{compare_for_type, compare_text_ci, infer_data_type, INFERENCE_SAMPLE_SIZE};

use std::collections::{HashMap, HashSet};

use gridfilter_model::models::{CellValue, ColumnDataType};
use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::metadata::ValueKey;

/// Largest number of distinct values that will be sorted by default.
pub const DEFAULT_SORT_CEILING: usize = 100_000;

/// Tuning for cache construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheOptions {
    /// Distinct values beyond this count are left unsorted.
    pub sort_ceiling: usize,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            sort_ceiling: DEFAULT_SORT_CEILING,
        }
    }
}

/// Outcome of an incremental cache update.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheUpdate {
    /// The delta changed the cache; this is the new one.
    Updated(ColumnValueCache),
    /// The delta was empty; keep using the current cache.
    Unchanged,
    /// The cache could not be updated consistently; rebuild from all values.
    NeedsFullRebuild,
}

impl CacheUpdate {
    /// Returns true if the caller must rebuild the cache from scratch.
    pub fn needs_full_rebuild(&self) -> bool {
        matches!(self, CacheUpdate::NeedsFullRebuild)
    }

    /// Returns the new cache, if the update produced one.
    pub fn into_updated(self) -> Option<ColumnValueCache> {
        match self {
            CacheUpdate::Updated(cache) => Some(cache),
            _ => None,
        }
    }
}

/// The distinct values observed in one column.
///
/// # Example
///
/// ```
/// use gridfilter_engine::value_cache::ColumnValueCache;
/// use gridfilter_model::models::CellValue;
///
/// let cache = ColumnValueCache::new(vec![
///     CellValue::text("b"),
///     CellValue::Null,
///     CellValue::text(""),
///     CellValue::text("a"),
///     CellValue::text("a"),
///     CellValue::text("  "),
/// ]);
///
/// assert_eq!(cache.values(), &[CellValue::text("a"), CellValue::text("b")]);
/// assert!(cache.contains_null_values());
/// assert_eq!(cache.count_of(&CellValue::text("a")), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnValueCache {
    values: Vec<CellValue>,
    unique_values: HashSet<ValueKey>,
    value_counts: HashMap<ValueKey, usize>,
    null_count: usize,
    data_type: ColumnDataType,
    sorted: bool,
    options: CacheOptions,
}

impl ColumnValueCache {
    /// Builds a cache with default options.
    pub fn new(values: impl IntoIterator<Item = CellValue>) -> Self {
        Self::with_options(values, CacheOptions::default())
    }

    /// Builds a cache in one pass over `values`.
    pub fn with_options(values: impl IntoIterator<Item = CellValue>, options: CacheOptions) -> Self {
        let mut tally = Tally::default();
        for value in values {
            tally.add(value);
        }
        tally.finish(options)
    }

    /// Builds a cache from a fallible source.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Source`] as soon as the source yields an error;
    /// no partial cache is produced.
    pub fn try_from_results<I, E>(values: I, options: CacheOptions) -> Result<Self, CacheError>
    where
        I: IntoIterator<Item = Result<CellValue, E>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let mut tally = Tally::default();
        for (read, value) in values.into_iter().enumerate() {
            let value = value.map_err(|e| CacheError::Source {
                read,
                source: Box::new(e),
            })?;
            tally.add(value);
        }
        Ok(tally.finish(options))
    }

    /// Distinct non-blank values, sorted when [`is_sorted`](Self::is_sorted).
    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    /// Returns true if `value` is one of the distinct values.
    pub fn contains(&self, value: &CellValue) -> bool {
        self.unique_values.contains(&ValueKey::new(value))
    }

    /// Number of occurrences of `value` (0 for blanks; see [`null_count`](Self::null_count)).
    pub fn count_of(&self, value: &CellValue) -> usize {
        self.value_counts
            .get(&ValueKey::new(value))
            .copied()
            .unwrap_or(0)
    }

    /// Per-value occurrence counts.
    pub fn value_counts(&self) -> &HashMap<ValueKey, usize> {
        &self.value_counts
    }

    /// Returns true if any null, empty or whitespace value was observed.
    pub fn contains_null_values(&self) -> bool {
        self.null_count > 0
    }

    /// Number of null, empty and whitespace occurrences.
    pub fn null_count(&self) -> usize {
        self.null_count
    }

    /// The inferred data type, which also fixed the sort order.
    pub fn data_type(&self) -> ColumnDataType {
        self.data_type
    }

    /// False when the distinct count exceeded the sort ceiling.
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Number of distinct non-blank values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no non-blank value was observed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Options the cache was built with.
    pub fn options(&self) -> CacheOptions {
        self.options
    }

    /// Distinct upper-cased first characters of the values, in value order.
    ///
    /// Drives alphabetic quick-jump in value pickers; empty for unsorted
    /// caches, where the letters would not follow the list.
    pub fn first_letters(&self) -> Vec<char> {
        if !self.sorted {
            return Vec::new();
        }
        let mut letters: Vec<char> = Vec::new();
        for value in &self.values {
            let Some(c) = value.to_string().chars().next() else {
                continue;
            };
            let upper = c.to_uppercase().next().unwrap_or(c);
            if !letters.contains(&upper) {
                letters.push(upper);
            }
        }
        letters
    }

    /// Returns a cache that also includes `delta`.
    ///
    /// The receiver is left untouched. Returns [`CacheUpdate::Unchanged`]
    /// for an empty delta and [`CacheUpdate::NeedsFullRebuild`] if the
    /// cache's own bookkeeping is found inconsistent.
    pub fn add_values(&self, delta: impl IntoIterator<Item = CellValue>) -> CacheUpdate {
        let mut delta = delta.into_iter().peekable();
        if delta.peek().is_none() {
            return CacheUpdate::Unchanged;
        }
        let Some(mut tally) = self.to_tally() else {
            tracing::warn!(values = self.values.len(), "value cache bookkeeping inconsistent on add");
            return CacheUpdate::NeedsFullRebuild;
        };
        for value in delta {
            tally.add(value);
        }
        CacheUpdate::Updated(tally.finish(self.options))
    }

    /// Returns a cache without one occurrence of each value in `delta`.
    ///
    /// Values whose count reaches zero are dropped; the blank flag is
    /// recomputed from the remaining blank occurrences. Removing a value the
    /// cache never counted yields [`CacheUpdate::NeedsFullRebuild`].
    pub fn remove_values(&self, delta: impl IntoIterator<Item = CellValue>) -> CacheUpdate {
        let mut delta = delta.into_iter().peekable();
        if delta.peek().is_none() {
            return CacheUpdate::Unchanged;
        }
        let Some(mut tally) = self.to_tally() else {
            tracing::warn!(values = self.values.len(), "value cache bookkeeping inconsistent on remove");
            return CacheUpdate::NeedsFullRebuild;
        };
        for value in delta {
            if !tally.remove(&value) {
                tracing::warn!(value = %value, "removed value was never counted; cache needs rebuild");
                return CacheUpdate::NeedsFullRebuild;
            }
        }
        CacheUpdate::Updated(tally.finish(self.options))
    }

    /// Reconstructs the mutable tally behind this cache.
    fn to_tally(&self) -> Option<Tally> {
        if self.values.len() != self.value_counts.len()
            || self.values.len() != self.unique_values.len()
        {
            return None;
        }
        let mut order = Vec::with_capacity(self.values.len());
        for value in &self.values {
            let key = ValueKey::new(value);
            match self.value_counts.get(&key) {
                Some(count) if *count > 0 => order.push(key),
                _ => return None,
            }
        }
        Some(Tally {
            order,
            counts: self.value_counts.clone(),
            null_count: self.null_count,
        })
    }
}

/// Mutable accumulation of counts in first-seen order.
#[derive(Debug, Default)]
struct Tally {
    order: Vec<ValueKey>,
    counts: HashMap<ValueKey, usize>,
    null_count: usize,
}

impl Tally {
    fn add(&mut self, value: CellValue) {
        if value.is_blank() {
            self.null_count += 1;
            return;
        }
        let key = ValueKey::new(&value);
        let count = self.counts.entry(key.clone()).or_insert(0);
        if *count == 0 {
            self.order.push(key);
        }
        *count += 1;
    }

    /// Removes one occurrence; false if there was none to remove.
    fn remove(&mut self, value: &CellValue) -> bool {
        if value.is_blank() {
            if self.null_count == 0 {
                return false;
            }
            self.null_count -= 1;
            return true;
        }
        let key = ValueKey::new(value);
        match self.counts.get_mut(&key) {
            Some(count) if *count > 0 => {
                *count -= 1;
                if *count == 0 {
                    self.counts.remove(&key);
                    self.order.retain(|k| k != &key);
                }
                true
            }
            _ => false,
        }
    }

    fn finish(self, options: CacheOptions) -> ColumnValueCache {
        let data_type = infer_data_type(&self.order);
        let mut values: Vec<CellValue> = self.order.iter().map(ValueKey::to_value).collect();
        let sorted = values.len() <= options.sort_ceiling;
        if sorted {
            values.sort_by(|a, b| compare_for_type(data_type, a, b));
        } else {
            tracing::debug!(
                distinct = values.len(),
                ceiling = options.sort_ceiling,
                "value cache left unsorted"
            );
        }
        let unique_values = self.order.into_iter().collect();
        ColumnValueCache {
            values,
            unique_values,
            value_counts: self.counts,
            null_count: self.null_count,
            data_type,
            sorted,
            options,
        }
    }
}
