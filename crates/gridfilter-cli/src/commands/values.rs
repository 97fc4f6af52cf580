//! Values command implementation.
//!
//! Lists the distinct values of one column, the way a filter picker shows them.

use std::path::PathBuf;

use gridfilter_engine::metadata::{BlankPolicy, ValueCategory, ValueMetadata, BLANK_DISPLAY_TEXT};
use gridfilter_engine::value_cache::ColumnValueCache;
use gridfilter_engine::views::{DateGrouping, FilterValueViewModel};
use gridfilter_model::models::{CellValue, ColumnDataType};
use serde::Serialize;

use super::input::{column_values, load_rows};
use super::{CommandContext, CommandError, Result};
use crate::output::{format_values_json, format_values_table, format_value_tree};

/// Options for the values command.
#[derive(Debug)]
pub struct ValuesOptions {
    /// JSON rows file.
    pub rows: PathBuf,
    /// Binding path of the column.
    pub column: String,
    /// Group dates into years, months and days.
    pub by_date: bool,
}

/// One distinct value and how many rows hold it.
#[derive(Debug, Serialize)]
pub struct ValueCount {
    pub value: CellValue,
    pub display_text: String,
    pub count: usize,
}

/// Rows holding blank values, grouped under the configured blank policy.
#[derive(Debug, Serialize)]
pub struct BlankCount {
    /// `null`, `empty` and `whitespace` when distinct; `(blank)` when equivalent.
    pub label: String,
    pub count: usize,
}

/// Result of the values command.
#[derive(Debug, Serialize)]
pub struct ValuesReport {
    pub column: String,
    pub data_type: ColumnDataType,
    pub sorted: bool,
    pub total_rows: usize,
    pub values: Vec<ValueCount>,
    pub blanks: Vec<BlankCount>,
}

/// Executes the values command.
///
/// # Errors
///
/// Returns an error if the rows file cannot be read, or if `--by-date` is
/// used on a column that does not hold dates.
pub fn execute(ctx: &CommandContext, opts: &ValuesOptions) -> Result<()> {
    let rows = load_rows(&opts.rows)?;
    let values = column_values(&rows, &opts.column);
    let blanks = count_blanks(&values, ctx.config.blank_policy());
    let cache = ColumnValueCache::with_options(values, ctx.config.cache_options());
    tracing::debug!(
        column = %opts.column,
        distinct = cache.len(),
        data_type = %cache.data_type(),
        "built value cache"
    );

    if opts.by_date {
        if cache.data_type() != ColumnDataType::DateTime {
            return Err(CommandError::Input(format!(
                "column '{}' holds {} values, not dates",
                opts.column,
                cache.data_type()
            )));
        }
        let picker = FilterValueViewModel::from_cache_by_date(&cache, DateGrouping::Calendar);
        if ctx.json_output {
            println!("{}", serde_json::to_string_pretty(picker.root())?);
        } else if !ctx.quiet {
            print!("{}", format_value_tree(picker.root(), ctx.use_colors));
        }
        return Ok(());
    }

    let report = ValuesReport {
        column: opts.column.clone(),
        data_type: cache.data_type(),
        sorted: cache.is_sorted(),
        total_rows: rows.len(),
        values: cache
            .values()
            .iter()
            .map(|value| ValueCount {
                value: value.clone(),
                display_text: value.to_string(),
                count: cache.count_of(value),
            })
            .collect(),
        blanks,
    };

    if ctx.json_output {
        println!("{}", format_values_json(&report)?);
    } else if !ctx.quiet {
        print!("{}", format_values_table(&report, ctx.use_colors));
    }
    Ok(())
}

/// Counts blank values, merging categories the policy treats as equal.
fn count_blanks(values: &[CellValue], policy: BlankPolicy) -> Vec<BlankCount> {
    let mut groups: Vec<(ValueMetadata, usize)> = Vec::new();
    for value in values.iter().filter(|v| v.is_blank()) {
        let metadata = ValueMetadata::new(value.clone());
        match groups.iter_mut().find(|(m, _)| m.equals_with(&metadata, policy)) {
            Some((_, count)) => *count += 1,
            None => groups.push((metadata, 1)),
        }
    }
    groups.sort_by_key(|(m, _)| m.category());

    groups
        .into_iter()
        .map(|(metadata, count)| BlankCount {
            label: match policy {
                BlankPolicy::Equivalent => BLANK_DISPLAY_TEXT.to_string(),
                BlankPolicy::Distinct => category_label(metadata.category()).to_string(),
            },
            count,
        })
        .collect()
}

fn category_label(category: ValueCategory) -> &'static str {
    match category {
        ValueCategory::Null => "null",
        ValueCategory::Empty => "empty",
        ValueCategory::Whitespace => "whitespace",
        ValueCategory::Normal => "value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed() -> Vec<CellValue> {
        vec![
            CellValue::Null,
            CellValue::text("a"),
            CellValue::text(""),
            CellValue::Null,
            CellValue::text("  "),
            CellValue::text("\t"),
        ]
    }

    #[test]
    fn test_count_blanks_distinct() {
        let blanks = count_blanks(&mixed(), BlankPolicy::Distinct);
        let pairs: Vec<(&str, usize)> = blanks.iter().map(|b| (b.label.as_str(), b.count)).collect();
        assert_eq!(pairs, vec![("null", 2), ("empty", 1), ("whitespace", 2)]);
    }

    #[test]
    fn test_count_blanks_equivalent() {
        let blanks = count_blanks(&mixed(), BlankPolicy::Equivalent);
        assert_eq!(blanks.len(), 1);
        assert_eq!(blanks[0].label, "(blank)");
        assert_eq!(blanks[0].count, 5);
    }

    #[test]
    fn test_count_blanks_none() {
        assert!(count_blanks(&[CellValue::text("x")], BlankPolicy::Distinct).is_empty());
    }
}
