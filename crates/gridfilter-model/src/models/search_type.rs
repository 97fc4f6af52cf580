//! Search types, date intervals and logical connectors.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// The closed set of filter predicates a column can be searched with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    // ==================== Text ====================
    /// Display text contains the operand.
    Contains,
    /// Display text does not contain the operand.
    DoesNotContain,
    /// Display text starts with the operand.
    StartsWith,
    /// Display text ends with the operand.
    EndsWith,

    // ==================== Comparison ====================
    /// Value equals the operand.
    Equals,
    /// Value differs from the operand.
    NotEquals,
    /// Value is less than the operand.
    LessThan,
    /// Value is less than or equal to the operand.
    LessThanOrEqualTo,
    /// Value is greater than the operand.
    GreaterThan,
    /// Value is greater than or equal to the operand.
    GreaterThanOrEqualTo,

    // ==================== Ranges ====================
    /// Value lies within the inclusive range.
    Between,
    /// Value lies outside the inclusive range.
    NotBetween,
    /// Date part lies within the inclusive date range.
    BetweenDates,

    // ==================== Lists ====================
    /// Value equals one of the listed operands.
    IsAnyOf,
    /// Value equals none of the listed operands.
    IsNoneOf,
    /// Date part equals one of the listed dates.
    IsOnAnyOfDates,

    // ==================== Patterns ====================
    /// Display text matches a `%`/`_` wildcard pattern.
    IsLike,
    /// Display text does not match a `%`/`_` wildcard pattern.
    IsNotLike,

    // ==================== Null checks ====================
    /// Value is null or blank.
    IsNull,
    /// Value is neither null nor blank.
    IsNotNull,

    // ==================== Relative dates ====================
    /// Date falls in one of the selected [`DateInterval`]s.
    DateInterval,

    // ==================== Collection statistics ====================
    /// Value is among the N largest values of the column.
    TopN,
    /// Value is among the N smallest values of the column.
    BottomN,
    /// Value is above the column average.
    AboveAverage,
    /// Value is below the column average.
    BelowAverage,
    /// Value occurs exactly once in the column.
    Unique,
    /// Value occurs more than once in the column.
    Duplicate,
}

impl SearchType {
    /// Every search type, in declaration order.
    pub const ALL: [SearchType; 27] = [
        SearchType::Contains,
        SearchType::DoesNotContain,
        SearchType::StartsWith,
        SearchType::EndsWith,
        SearchType::Equals,
        SearchType::NotEquals,
        SearchType::LessThan,
        SearchType::LessThanOrEqualTo,
        SearchType::GreaterThan,
        SearchType::GreaterThanOrEqualTo,
        SearchType::Between,
        SearchType::NotBetween,
        SearchType::BetweenDates,
        SearchType::IsAnyOf,
        SearchType::IsNoneOf,
        SearchType::IsOnAnyOfDates,
        SearchType::IsLike,
        SearchType::IsNotLike,
        SearchType::IsNull,
        SearchType::IsNotNull,
        SearchType::DateInterval,
        SearchType::TopN,
        SearchType::BottomN,
        SearchType::AboveAverage,
        SearchType::BelowAverage,
        SearchType::Unique,
        SearchType::Duplicate,
    ];

    /// Returns true for predicates that need whole-column statistics.
    pub fn requires_collection(&self) -> bool {
        matches!(
            self,
            SearchType::TopN
                | SearchType::BottomN
                | SearchType::AboveAverage
                | SearchType::BelowAverage
                | SearchType::Unique
                | SearchType::Duplicate
        )
    }

    /// Returns true for the null-check predicates.
    pub fn is_null_check(&self) -> bool {
        matches!(self, SearchType::IsNull | SearchType::IsNotNull)
    }

    /// Returns true for predicates whose operand is a list of values.
    pub fn takes_value_list(&self) -> bool {
        matches!(
            self,
            SearchType::IsAnyOf | SearchType::IsNoneOf | SearchType::IsOnAnyOfDates
        )
    }

    /// Returns true for predicates with a lower and an upper bound.
    pub fn takes_range(&self) -> bool {
        matches!(
            self,
            SearchType::Between | SearchType::NotBetween | SearchType::BetweenDates
        )
    }

    /// Returns the variant name (e.g. `"IsAnyOf"`).
    pub fn name(&self) -> &'static str {
        match self {
            SearchType::Contains => "Contains",
            SearchType::DoesNotContain => "DoesNotContain",
            SearchType::StartsWith => "StartsWith",
            SearchType::EndsWith => "EndsWith",
            SearchType::Equals => "Equals",
            SearchType::NotEquals => "NotEquals",
            SearchType::LessThan => "LessThan",
            SearchType::LessThanOrEqualTo => "LessThanOrEqualTo",
            SearchType::GreaterThan => "GreaterThan",
            SearchType::GreaterThanOrEqualTo => "GreaterThanOrEqualTo",
            SearchType::Between => "Between",
            SearchType::NotBetween => "NotBetween",
            SearchType::BetweenDates => "BetweenDates",
            SearchType::IsAnyOf => "IsAnyOf",
            SearchType::IsNoneOf => "IsNoneOf",
            SearchType::IsOnAnyOfDates => "IsOnAnyOfDates",
            SearchType::IsLike => "IsLike",
            SearchType::IsNotLike => "IsNotLike",
            SearchType::IsNull => "IsNull",
            SearchType::IsNotNull => "IsNotNull",
            SearchType::DateInterval => "DateInterval",
            SearchType::TopN => "TopN",
            SearchType::BottomN => "BottomN",
            SearchType::AboveAverage => "AboveAverage",
            SearchType::BelowAverage => "BelowAverage",
            SearchType::Unique => "Unique",
            SearchType::Duplicate => "Duplicate",
        }
    }

    /// Label shown in filter pickers and chips (e.g. `"Is any of"`).
    pub fn display_name(&self) -> &'static str {
        match self {
            SearchType::Contains => "Contains",
            SearchType::DoesNotContain => "Does not contain",
            SearchType::StartsWith => "Starts with",
            SearchType::EndsWith => "Ends with",
            SearchType::Equals => "Equals",
            SearchType::NotEquals => "Does not equal",
            SearchType::LessThan => "Is less than",
            SearchType::LessThanOrEqualTo => "Is less than or equal to",
            SearchType::GreaterThan => "Is greater than",
            SearchType::GreaterThanOrEqualTo => "Is greater than or equal to",
            SearchType::Between => "Between",
            SearchType::NotBetween => "Not between",
            SearchType::BetweenDates => "Between dates",
            SearchType::IsAnyOf => "Is any of",
            SearchType::IsNoneOf => "Is none of",
            SearchType::IsOnAnyOfDates => "Is on any of dates",
            SearchType::IsLike => "Is like",
            SearchType::IsNotLike => "Is not like",
            SearchType::IsNull => "Is blank",
            SearchType::IsNotNull => "Is not blank",
            SearchType::DateInterval => "Date interval",
            SearchType::TopN => "Top N",
            SearchType::BottomN => "Bottom N",
            SearchType::AboveAverage => "Above average",
            SearchType::BelowAverage => "Below average",
            SearchType::Unique => "Unique",
            SearchType::Duplicate => "Duplicate",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Logical connector between two templates or two template groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    /// Both sides must match.
    #[default]
    And,
    /// Either side may match.
    Or,
}

impl LogicalOperator {
    /// Upper-case connector text used in filter chips.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A period relative to today, used by [`SearchType::DateInterval`].
///
/// Weeks start on Sunday. Intervals are half-open around today: for example
/// `EarlierThisYear` covers `[start of year, today)` and `LaterThisYear`
/// covers `(today, start of next year)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateInterval {
    PriorThisYear,
    EarlierThisYear,
    LaterThisYear,
    BeyondThisYear,
    EarlierThisMonth,
    LaterThisMonth,
    EarlierThisWeek,
    LaterThisWeek,
    LastWeek,
    NextWeek,
    Yesterday,
    Today,
    Tomorrow,
}

impl DateInterval {
    /// Every interval, from least to most specific.
    pub const ALL: [DateInterval; 13] = [
        DateInterval::PriorThisYear,
        DateInterval::EarlierThisYear,
        DateInterval::LaterThisYear,
        DateInterval::BeyondThisYear,
        DateInterval::EarlierThisMonth,
        DateInterval::LaterThisMonth,
        DateInterval::EarlierThisWeek,
        DateInterval::LaterThisWeek,
        DateInterval::LastWeek,
        DateInterval::NextWeek,
        DateInterval::Yesterday,
        DateInterval::Today,
        DateInterval::Tomorrow,
    ];

    /// Returns true if `date` falls inside this interval relative to `today`.
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        let b = IntervalBounds::new(today);
        match self {
            DateInterval::PriorThisYear => date < b.start_of_year,
            DateInterval::EarlierThisYear => date >= b.start_of_year && date < today,
            DateInterval::LaterThisYear => date > today && date < b.start_of_next_year,
            DateInterval::BeyondThisYear => date >= b.start_of_next_year,
            DateInterval::EarlierThisMonth => date >= b.start_of_month && date < today,
            DateInterval::LaterThisMonth => date > today && date < b.start_of_next_month,
            DateInterval::EarlierThisWeek => date >= b.start_of_week && date < today,
            DateInterval::LaterThisWeek => {
                date > today && date < b.start_of_week + Duration::days(7)
            }
            DateInterval::LastWeek => {
                date >= b.start_of_week - Duration::days(7) && date < b.start_of_week
            }
            DateInterval::NextWeek => {
                date >= b.start_of_week + Duration::days(7)
                    && date < b.start_of_week + Duration::days(14)
            }
            DateInterval::Yesterday => date == today - Duration::days(1),
            DateInterval::Today => date == today,
            DateInterval::Tomorrow => date == today + Duration::days(1),
        }
    }

    /// Returns the most specific interval containing `date`.
    ///
    /// Days win over weeks, weeks over months and months over years, so
    /// yesterday classifies as `Yesterday` rather than `EarlierThisWeek`.
    pub fn classify(date: NaiveDate, today: NaiveDate) -> DateInterval {
        DateInterval::ALL
            .iter()
            .rev()
            .copied()
            .find(|interval| interval.contains(date, today))
            .unwrap_or(DateInterval::PriorThisYear)
    }

    /// Human-readable label.
    pub fn display_name(&self) -> &'static str {
        match self {
            DateInterval::PriorThisYear => "Prior to this year",
            DateInterval::EarlierThisYear => "Earlier this year",
            DateInterval::LaterThisYear => "Later this year",
            DateInterval::BeyondThisYear => "Beyond this year",
            DateInterval::EarlierThisMonth => "Earlier this month",
            DateInterval::LaterThisMonth => "Later this month",
            DateInterval::EarlierThisWeek => "Earlier this week",
            DateInterval::LaterThisWeek => "Later this week",
            DateInterval::LastWeek => "Last week",
            DateInterval::NextWeek => "Next week",
            DateInterval::Yesterday => "Yesterday",
            DateInterval::Today => "Today",
            DateInterval::Tomorrow => "Tomorrow",
        }
    }
}

impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Calendar boundaries derived once from "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalBounds {
    pub start_of_week: NaiveDate,
    pub start_of_month: NaiveDate,
    pub start_of_next_month: NaiveDate,
    pub start_of_year: NaiveDate,
    pub start_of_next_year: NaiveDate,
}

impl IntervalBounds {
    /// Computes the week (Sunday-based), month and year boundaries around `today`.
    pub fn new(today: NaiveDate) -> Self {
        let start_of_week =
            today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
        let start_of_month = today.with_day(1).unwrap_or(today);
        let start_of_next_month = if today.month() == 12 {
            NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
        }
        .unwrap_or(NaiveDate::MAX);
        let start_of_year = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
        let start_of_next_year =
            NaiveDate::from_ymd_opt(today.year() + 1, 1, 1).unwrap_or(NaiveDate::MAX);

        Self {
            start_of_week,
            start_of_month,
            start_of_next_month,
            start_of_year,
            start_of_next_year,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_collection_flags() {
        assert!(SearchType::TopN.requires_collection());
        assert!(SearchType::Unique.requires_collection());
        assert!(!SearchType::Equals.requires_collection());
        assert!(SearchType::IsNull.is_null_check());
        assert!(!SearchType::IsAnyOf.is_null_check());
    }

    #[test]
    fn test_all_contains_every_variant_once() {
        let mut names: Vec<&str> = SearchType::ALL.iter().map(|t| t.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), SearchType::ALL.len());
    }

    #[test]
    fn test_display_names_are_distinct() {
        let mut names: Vec<&str> = SearchType::ALL.iter().map(|t| t.display_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SearchType::ALL.len());
        assert_eq!(SearchType::IsNull.display_name(), "Is blank");
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&SearchType::GreaterThanOrEqualTo).unwrap();
        assert_eq!(json, "\"greater_than_or_equal_to\"");
        let op: LogicalOperator = serde_json::from_str("\"or\"").unwrap();
        assert_eq!(op, LogicalOperator::Or);
    }

    #[test]
    fn test_bounds_week_starts_sunday() {
        // 2024-05-15 is a Wednesday.
        let b = IntervalBounds::new(d(2024, 5, 15));
        assert_eq!(b.start_of_week, d(2024, 5, 12));
        assert_eq!(b.start_of_month, d(2024, 5, 1));
        assert_eq!(b.start_of_next_month, d(2024, 6, 1));
        assert_eq!(b.start_of_year, d(2024, 1, 1));
        assert_eq!(b.start_of_next_year, d(2025, 1, 1));
    }

    #[test]
    fn test_bounds_december_rolls_year() {
        let b = IntervalBounds::new(d(2023, 12, 31));
        assert_eq!(b.start_of_next_month, d(2024, 1, 1));
        // 2023-12-31 is a Sunday.
        assert_eq!(b.start_of_week, d(2023, 12, 31));
    }

    #[test]
    fn test_contains_day_intervals() {
        let today = d(2024, 5, 15);
        assert!(DateInterval::Today.contains(today, today));
        assert!(!DateInterval::Today.contains(d(2024, 5, 16), today));
        assert!(DateInterval::Tomorrow.contains(d(2024, 5, 16), today));
        assert!(DateInterval::Yesterday.contains(d(2024, 5, 14), today));
    }

    #[test]
    fn test_contains_half_open_year() {
        let today = d(2024, 5, 15);
        assert!(DateInterval::EarlierThisYear.contains(d(2024, 1, 1), today));
        assert!(!DateInterval::EarlierThisYear.contains(today, today));
        assert!(DateInterval::LaterThisYear.contains(d(2024, 12, 31), today));
        assert!(!DateInterval::LaterThisYear.contains(today, today));
        assert!(DateInterval::PriorThisYear.contains(d(2023, 12, 31), today));
        assert!(DateInterval::BeyondThisYear.contains(d(2025, 1, 1), today));
    }

    #[test]
    fn test_contains_weeks() {
        let today = d(2024, 5, 15);
        assert!(DateInterval::EarlierThisWeek.contains(d(2024, 5, 12), today));
        assert!(DateInterval::LaterThisWeek.contains(d(2024, 5, 18), today));
        assert!(!DateInterval::LaterThisWeek.contains(d(2024, 5, 19), today));
        assert!(DateInterval::LastWeek.contains(d(2024, 5, 5), today));
        assert!(DateInterval::LastWeek.contains(d(2024, 5, 11), today));
        assert!(DateInterval::NextWeek.contains(d(2024, 5, 19), today));
        assert!(DateInterval::NextWeek.contains(d(2024, 5, 25), today));
        assert!(!DateInterval::NextWeek.contains(d(2024, 5, 26), today));
    }

    #[test]
    fn test_classify_prefers_most_specific() {
        let today = d(2024, 5, 15);
        assert_eq!(DateInterval::classify(today, today), DateInterval::Today);
        assert_eq!(DateInterval::classify(d(2024, 5, 16), today), DateInterval::Tomorrow);
        assert_eq!(DateInterval::classify(d(2024, 5, 14), today), DateInterval::Yesterday);
        assert_eq!(DateInterval::classify(d(2024, 5, 13), today), DateInterval::EarlierThisWeek);
        assert_eq!(DateInterval::classify(d(2024, 5, 8), today), DateInterval::LastWeek);
        assert_eq!(DateInterval::classify(d(2024, 5, 2), today), DateInterval::EarlierThisMonth);
        assert_eq!(DateInterval::classify(d(2024, 2, 2), today), DateInterval::EarlierThisYear);
        assert_eq!(DateInterval::classify(d(2020, 2, 2), today), DateInterval::PriorThisYear);
        assert_eq!(DateInterval::classify(d(2030, 2, 2), today), DateInterval::BeyondThisYear);
    }
}
