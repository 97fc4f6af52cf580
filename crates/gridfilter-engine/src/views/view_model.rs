//! Value picker state for one column.
//!
//! A [`FilterValueViewModel`] turns a [`ColumnValueCache`] into a selectable
//! list (or a date hierarchy), tracks a search box, and converts the final
//! selection into a filter template through the
//! [`FilterSelectionOptimizer`].

use chrono::{Datelike, NaiveDate, NaiveTime};
use gridfilter_model::models::{CellValue, ColumnDataType, DateInterval, SearchTemplate};

use super::tree::{FilterValueGroup, FilterValueItem};
use crate::metadata::BLANK_DISPLAY_TEXT;
use crate::optimizer::{FilterSelectionOptimizer, OptimizedFilterResult};
use crate::value_cache::ColumnValueCache;

/// How date values are arranged in the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateGrouping {
    /// Year, then month, then day.
    Calendar,
    /// One group per [`DateInterval`] relative to the given day.
    Interval(NaiveDate),
}

/// Selection state of a column's value picker.
#[derive(Debug, Clone)]
pub struct FilterValueViewModel {
    data_type: ColumnDataType,
    root: FilterValueGroup,
    all_values: Vec<CellValue>,
    search_text: String,
    optimizer: FilterSelectionOptimizer,
}

impl FilterValueViewModel {
    /// Builds a flat list: a blank entry first when blanks were seen, then
    /// every distinct value in cache order.
    pub fn from_cache(cache: &ColumnValueCache) -> Self {
        let mut root = FilterValueGroup::new("(all)");
        {
            let mut bulk = root.bulk_update();
            if let Some(blank) = blank_item(cache) {
                bulk.push_item(blank);
            }
            for value in cache.values() {
                bulk.push_item(value_item(cache, value, value.to_string()));
            }
        }
        Self::with_root(cache, root)
    }

    /// Builds a date hierarchy for a date column.
    ///
    /// Values that are not dates are listed after the groups.
    pub fn from_cache_by_date(cache: &ColumnValueCache, grouping: DateGrouping) -> Self {
        let mut root = FilterValueGroup::new("(all)");
        {
            let mut bulk = root.bulk_update();
            if let Some(blank) = blank_item(cache) {
                bulk.push_item(blank);
            }
            let (dates, others): (Vec<&CellValue>, Vec<&CellValue>) =
                cache.values().iter().partition(|v| v.as_datetime().is_some());

            let groups = match grouping {
                DateGrouping::Calendar => calendar_groups(cache, &dates),
                DateGrouping::Interval(today) => interval_groups(cache, &dates, today),
            };
            for group in groups {
                bulk.push_group(group);
            }
            for value in others {
                bulk.push_item(value_item(cache, value, value.to_string()));
            }
        }
        Self::with_root(cache, root)
    }

    fn with_root(cache: &ColumnValueCache, root: FilterValueGroup) -> Self {
        let mut all_values = Vec::with_capacity(cache.len() + 1);
        if cache.contains_null_values() {
            all_values.push(CellValue::Null);
        }
        all_values.extend(cache.values().iter().cloned());
        Self {
            data_type: cache.data_type(),
            root,
            all_values,
            search_text: String::new(),
            optimizer: FilterSelectionOptimizer::default(),
        }
    }

    /// Replaces the optimizer used by [`optimize`](Self::optimize).
    pub fn with_optimizer(mut self, optimizer: FilterSelectionOptimizer) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn data_type(&self) -> ColumnDataType {
        self.data_type
    }

    pub fn root(&self) -> &FilterValueGroup {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut FilterValueGroup {
        &mut self.root
    }

    /// Every value the picker offers, blank (as null) first.
    pub fn all_values(&self) -> &[CellValue] {
        &self.all_values
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    fn is_visible(&self, item: &FilterValueItem) -> bool {
        matches_search(&self.search_text, item)
    }

    /// Items whose display text contains the search text, ignoring case.
    pub fn visible_items(&self) -> Vec<&FilterValueItem> {
        self.root
            .items()
            .into_iter()
            .filter(|item| self.is_visible(item))
            .collect()
    }

    /// Sets every visible item at once. Returns how many were set.
    pub fn select_visible(&mut self, selected: bool) -> usize {
        let search = self.search_text.to_lowercase();
        let mut bulk = self.root.bulk_update();
        bulk.set_matching(&|item: &FilterValueItem| matches_search(&search, item), selected)
    }

    /// Selects or clears everything, ignoring the search text.
    pub fn select_all(&mut self, selected: bool) {
        self.root.set_selected(selected);
    }

    pub fn set_value_selected(&mut self, value: &CellValue, selected: bool) -> usize {
        self.root.set_value_selected(value, selected)
    }

    /// Values of the selected items.
    pub fn selected_values(&self) -> Vec<CellValue> {
        self.root.selected_values()
    }

    /// The tri-state of the whole picker.
    pub fn is_all_selected(&self) -> Option<bool> {
        self.root.is_selected()
    }

    /// Chooses between including the selection and excluding the rest.
    pub fn optimize(&self) -> OptimizedFilterResult {
        self.optimizer
            .optimize_for(self.data_type, &self.all_values, &self.selected_values())
    }

    /// The template for the current selection, or `None` when everything is
    /// selected and no filter is needed.
    pub fn to_template(&self) -> Option<SearchTemplate> {
        if self.root.is_selected() == Some(true) {
            return None;
        }
        Some(self.optimize().to_template())
    }
}

fn matches_search(search: &str, item: &FilterValueItem) -> bool {
    search.is_empty()
        || item
            .display_text
            .to_lowercase()
            .contains(&search.to_lowercase())
}

fn blank_item(cache: &ColumnValueCache) -> Option<FilterValueItem> {
    cache
        .contains_null_values()
        .then(|| FilterValueItem::new(CellValue::Null, BLANK_DISPLAY_TEXT, cache.null_count()))
}

fn value_item(cache: &ColumnValueCache, value: &CellValue, display_text: String) -> FilterValueItem {
    FilterValueItem::new(value.clone(), display_text, cache.count_of(value))
}

/// Day label: the day of month, with the time when it is not midnight.
fn day_label(value: &CellValue) -> String {
    match value.as_datetime() {
        Some(dt) if dt.time() == NaiveTime::MIN => format!("{:02}", dt.day()),
        Some(dt) => dt.format("%d %H:%M:%S").to_string(),
        None => value.to_string(),
    }
}

fn calendar_groups(cache: &ColumnValueCache, dates: &[&CellValue]) -> Vec<FilterValueGroup> {
    let mut years: Vec<FilterValueGroup> = Vec::new();
    // (year, month) of the group currently being filled; dates arrive sorted
    let mut current: Option<(i32, u32)> = None;
    for value in dates {
        let Some(dt) = value.as_datetime() else {
            continue;
        };
        let (year, month) = (dt.year(), dt.month());
        if current.map(|(y, _)| y) != Some(year) {
            years.push(FilterValueGroup::new(year.to_string()));
        }
        let Some(year_group) = years.last_mut() else {
            continue;
        };
        if current != Some((year, month)) {
            year_group.push_group(FilterValueGroup::new(dt.format("%B").to_string()));
        }
        let month_index = year_group.children().len().saturating_sub(1);
        year_group.update_group(month_index, |month_group| {
            month_group.push_item(value_item(cache, value, day_label(value)));
        });
        current = Some((year, month));
    }
    years
}

fn interval_groups(
    cache: &ColumnValueCache,
    dates: &[&CellValue],
    today: NaiveDate,
) -> Vec<FilterValueGroup> {
    let mut groups: Vec<(DateInterval, FilterValueGroup)> = Vec::new();
    for value in dates {
        let Some(dt) = value.as_datetime() else {
            continue;
        };
        let interval = DateInterval::classify(dt.date(), today);
        let index = match groups.iter().position(|(i, _)| *i == interval) {
            Some(index) => index,
            None => {
                groups.push((interval, FilterValueGroup::new(interval.display_name())));
                groups.len() - 1
            }
        };
        groups[index]
            .1
            .push_item(value_item(cache, value, value.to_string()));
    }
    groups.sort_by_key(|(interval, _)| *interval);
    groups.into_iter().map(|(_, group)| group).collect()
}
