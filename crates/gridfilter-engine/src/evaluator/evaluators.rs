//! The standard evaluator families.
//!
//! Each family handles a related group of search types; the factory creates
//! one instance per search type.

use std::cmp::Ordering;

use chrono::{Local, NaiveDate};
use gridfilter_model::models::{CellValue, SearchCondition, SearchType};

use super::compare::{compare_values, values_equal};
use super::pattern::like_to_regex;
use super::SearchEvaluator;
use crate::collection::CollectionStats;
use crate::error::{FilterError, FilterResult};
use crate::metadata::ValueMetadata;

// ==================== Text ====================

/// Contains, DoesNotContain, StartsWith and EndsWith on display text.
#[derive(Debug, Clone, Copy)]
pub struct TextEvaluator {
    search_type: SearchType,
}

impl TextEvaluator {
    pub fn new(search_type: SearchType) -> Self {
        Self { search_type }
    }
}

impl SearchEvaluator for TextEvaluator {
    fn search_type(&self) -> SearchType {
        self.search_type
    }

    fn evaluate(&self, value: &CellValue, condition: &SearchCondition) -> FilterResult<bool> {
        let haystack = value.to_string().to_lowercase();
        let needle = condition.string_value.to_lowercase();
        Ok(match self.search_type {
            SearchType::Contains => haystack.contains(&needle),
            SearchType::DoesNotContain => !haystack.contains(&needle),
            SearchType::StartsWith => haystack.starts_with(&needle),
            SearchType::EndsWith => haystack.ends_with(&needle),
            other => return Err(FilterError::invalid_search(other, &condition.string_value)),
        })
    }
}

// ==================== Comparison ====================

/// Equality and ordering against the primary operand.
///
/// Blank column values never satisfy an ordering predicate.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonEvaluator {
    search_type: SearchType,
}

impl ComparisonEvaluator {
    pub fn new(search_type: SearchType) -> Self {
        Self { search_type }
    }
}

impl SearchEvaluator for ComparisonEvaluator {
    fn search_type(&self) -> SearchType {
        self.search_type
    }

    fn evaluate(&self, value: &CellValue, condition: &SearchCondition) -> FilterResult<bool> {
        let operand = &condition.primary_value;
        match self.search_type {
            SearchType::Equals => values_equal(value, condition, operand),
            SearchType::NotEquals => values_equal(value, condition, operand).map(|eq| !eq),
            _ if value.is_null() => Ok(false),
            SearchType::LessThan => Ok(compare_values(value, condition, operand)?.is_lt()),
            SearchType::LessThanOrEqualTo => Ok(compare_values(value, condition, operand)?.is_le()),
            SearchType::GreaterThan => Ok(compare_values(value, condition, operand)?.is_gt()),
            SearchType::GreaterThanOrEqualTo => {
                Ok(compare_values(value, condition, operand)?.is_ge())
            }
            other => Err(FilterError::invalid_search(other, operand)),
        }
    }
}

// ==================== Ranges ====================

/// Between, NotBetween and BetweenDates, inclusive on both bounds.
///
/// The bounds may be given in either order. Null column values fall in no
/// range and outside none.
#[derive(Debug, Clone, Copy)]
pub struct RangeEvaluator {
    search_type: SearchType,
}

impl RangeEvaluator {
    pub fn new(search_type: SearchType) -> Self {
        Self { search_type }
    }

    fn within(&self, value: &CellValue, condition: &SearchCondition) -> FilterResult<bool> {
        let (low, high) = (&condition.primary_value, &condition.secondary_value);
        let (low, high) = if compare_values(low, condition, high)? == Ordering::Greater {
            (high, low)
        } else {
            (low, high)
        };
        Ok(compare_values(value, condition, low)?.is_ge()
            && compare_values(value, condition, high)?.is_le())
    }

    fn within_dates(&self, value: &CellValue, condition: &SearchCondition) -> FilterResult<bool> {
        let date = as_date(value)?;
        let low = as_date(&condition.primary_value)?;
        let high = as_date(&condition.secondary_value)?;
        let (low, high) = if low > high { (high, low) } else { (low, high) };
        Ok(low <= date && date <= high)
    }
}

impl SearchEvaluator for RangeEvaluator {
    fn search_type(&self) -> SearchType {
        self.search_type
    }

    fn evaluate(&self, value: &CellValue, condition: &SearchCondition) -> FilterResult<bool> {
        if value.is_null() {
            return Ok(false);
        }
        match self.search_type {
            SearchType::Between => self.within(value, condition),
            SearchType::NotBetween => self.within(value, condition).map(|inside| !inside),
            SearchType::BetweenDates => self.within_dates(value, condition),
            other => Err(FilterError::invalid_search(other, &condition.primary_value)),
        }
    }
}

// ==================== Lists ====================

/// IsAnyOf, IsNoneOf and IsOnAnyOfDates over the list operands.
#[derive(Debug, Clone, Copy)]
pub struct ListEvaluator {
    search_type: SearchType,
}

impl ListEvaluator {
    pub fn new(search_type: SearchType) -> Self {
        Self { search_type }
    }

    /// A null operand stands for the "(blank)" picker entry and matches every blank value.
    fn any_equal(&self, value: &CellValue, condition: &SearchCondition) -> FilterResult<bool> {
        let blank = value.is_blank();
        for candidate in &condition.raw_values {
            if blank && candidate.is_null() {
                return Ok(true);
            }
            if values_equal(value, condition, candidate)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl SearchEvaluator for ListEvaluator {
    fn search_type(&self) -> SearchType {
        self.search_type
    }

    fn evaluate(&self, value: &CellValue, condition: &SearchCondition) -> FilterResult<bool> {
        match self.search_type {
            SearchType::IsAnyOf => self.any_equal(value, condition),
            SearchType::IsNoneOf => self.any_equal(value, condition).map(|any| !any),
            SearchType::IsOnAnyOfDates => {
                if value.is_blank() {
                    return Ok(false);
                }
                let date = as_date(value)?;
                Ok(condition
                    .raw_values
                    .iter()
                    .filter_map(CellValue::as_date)
                    .any(|d| d == date))
            }
            other => Err(FilterError::invalid_search(other, value)),
        }
    }
}

// ==================== Patterns ====================

/// IsLike and IsNotLike with `%`/`_` wildcards.
#[derive(Debug, Clone, Copy)]
pub struct PatternEvaluator {
    search_type: SearchType,
}

impl PatternEvaluator {
    pub fn new(search_type: SearchType) -> Self {
        Self { search_type }
    }
}

impl SearchEvaluator for PatternEvaluator {
    fn search_type(&self) -> SearchType {
        self.search_type
    }

    fn evaluate(&self, value: &CellValue, condition: &SearchCondition) -> FilterResult<bool> {
        let matched = like_to_regex(&condition.string_value)?.is_match(&value.to_string());
        Ok(match self.search_type {
            SearchType::IsLike => matched,
            SearchType::IsNotLike => !matched,
            other => return Err(FilterError::invalid_search(other, &condition.string_value)),
        })
    }
}

// ==================== Null checks ====================

/// IsNull and IsNotNull; empty and whitespace text count as null.
#[derive(Debug, Clone, Copy)]
pub struct NullCheckEvaluator {
    search_type: SearchType,
}

impl NullCheckEvaluator {
    pub fn new(search_type: SearchType) -> Self {
        Self { search_type }
    }
}

impl SearchEvaluator for NullCheckEvaluator {
    fn search_type(&self) -> SearchType {
        self.search_type
    }

    fn evaluate(&self, value: &CellValue, _condition: &SearchCondition) -> FilterResult<bool> {
        let blank = ValueMetadata::new(value.clone()).is_blank();
        Ok(match self.search_type {
            SearchType::IsNull => blank,
            _ => !blank,
        })
    }
}

// ==================== Relative dates ====================

/// DateInterval membership relative to today.
///
/// The day is fixed when the evaluator is built and every row is judged
/// against it.
#[derive(Debug, Clone, Copy)]
pub struct DateIntervalEvaluator {
    today: NaiveDate,
}

impl DateIntervalEvaluator {
    /// Evaluates against the local date at construction.
    pub fn new() -> Self {
        Self::at(Local::now().date_naive())
    }

    /// Evaluates against a fixed date.
    pub fn at(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }
}

impl Default for DateIntervalEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchEvaluator for DateIntervalEvaluator {
    fn search_type(&self) -> SearchType {
        SearchType::DateInterval
    }

    fn evaluate(&self, value: &CellValue, condition: &SearchCondition) -> FilterResult<bool> {
        if value.is_blank() {
            return Ok(false);
        }
        let date = as_date(value)?;
        Ok(condition
            .date_intervals
            .iter()
            .any(|interval| interval.contains(date, self.today)))
    }
}

// ==================== Collection statistics ====================

/// TopN, BottomN, AboveAverage, BelowAverage, Unique and Duplicate.
#[derive(Debug, Clone, Copy)]
pub struct CollectionEvaluator {
    search_type: SearchType,
}

impl CollectionEvaluator {
    pub fn new(search_type: SearchType) -> Self {
        Self { search_type }
    }

    fn ranked(
        &self,
        value: &CellValue,
        condition: &SearchCondition,
        sequence: &[CellValue],
    ) -> FilterResult<bool> {
        let n = top_count(&condition.primary_value)?;
        for candidate in sequence.iter().take(n) {
            if values_equal(value, condition, candidate)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl SearchEvaluator for CollectionEvaluator {
    fn search_type(&self) -> SearchType {
        self.search_type
    }

    fn evaluate(&self, _value: &CellValue, _condition: &SearchCondition) -> FilterResult<bool> {
        Err(FilterError::MissingContext {
            search_type: self.search_type,
        })
    }

    fn requires_collection_context(&self) -> bool {
        true
    }

    fn evaluate_in(
        &self,
        value: &CellValue,
        condition: &SearchCondition,
        stats: &dyn CollectionStats,
    ) -> FilterResult<bool> {
        if value.is_blank() {
            return Ok(false);
        }
        match self.search_type {
            SearchType::TopN => self.ranked(value, condition, stats.sorted_descending()),
            SearchType::BottomN => self.ranked(value, condition, stats.sorted_ascending()),
            SearchType::AboveAverage | SearchType::BelowAverage => {
                let Some(average) = stats.average() else {
                    return Ok(false);
                };
                let n = value
                    .as_f64()
                    .ok_or_else(|| FilterError::conversion(value, "a number"))?;
                Ok(if self.search_type == SearchType::AboveAverage {
                    n > average
                } else {
                    n < average
                })
            }
            SearchType::Unique => Ok(stats.frequency(value) == 1),
            SearchType::Duplicate => Ok(stats.frequency(value) > 1),
            other => Err(FilterError::invalid_search(other, value)),
        }
    }
}

fn as_date(value: &CellValue) -> FilterResult<NaiveDate> {
    value
        .as_date()
        .ok_or_else(|| FilterError::conversion(value, "a date"))
}

/// Reads a TopN/BottomN count: a positive whole number.
fn top_count(value: &CellValue) -> FilterResult<usize> {
    match value.as_f64() {
        Some(n) if n >= 1.0 && n.fract() == 0.0 => Ok(n as usize),
        _ => Err(FilterError::conversion(value, "a positive count")),
    }
}
