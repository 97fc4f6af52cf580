//! Optimize command implementation.
//!
//! Selects values in a column's picker and shows the filter the selection
//! becomes: an inclusion list, or an exclusion of the unselected values.

use std::path::PathBuf;

use gridfilter_engine::display::format_template_text;
use gridfilter_engine::optimizer::OptimizedFilterResult;
use gridfilter_engine::value_cache::ColumnValueCache;
use gridfilter_engine::views::FilterValueViewModel;
use gridfilter_model::models::ColumnDataType;
use serde::Serialize;

use super::input::{column_values, load_rows, parse_value};
use super::{CommandContext, CommandError, Result};
use crate::output::{format_optimize_json, format_optimize_table};

/// Options for the optimize command.
#[derive(Debug)]
pub struct OptimizeOptions {
    /// JSON rows file.
    pub rows: PathBuf,
    /// Binding path of the column.
    pub column: String,
    /// Selected values as typed.
    pub select: Vec<String>,
}

/// Result of the optimize command.
#[derive(Debug, Serialize)]
pub struct OptimizeReport {
    pub column: String,
    pub data_type: ColumnDataType,
    /// Picker entries, the "(blank)" entry included.
    pub total_values: usize,
    pub selected_values: usize,
    /// True when every value is selected and no filter is needed.
    pub all_selected: bool,
    pub result: OptimizedFilterResult,
    /// Chip text of the resulting filter; absent when no filter is needed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chip: Option<String>,
}

/// Executes the optimize command.
///
/// # Errors
///
/// Returns an error if the rows file cannot be read or a selected value does
/// not occur in the column.
pub fn execute(ctx: &CommandContext, opts: &OptimizeOptions) -> Result<()> {
    let rows = load_rows(&opts.rows)?;
    let cache = ColumnValueCache::with_options(
        column_values(&rows, &opts.column),
        ctx.config.cache_options(),
    );
    let report = optimize_selection(ctx, &cache, opts)?;

    if ctx.json_output {
        println!("{}", format_optimize_json(&report)?);
    } else if !ctx.quiet {
        print!("{}", format_optimize_table(&report, ctx.use_colors));
    }
    Ok(())
}

fn optimize_selection(
    ctx: &CommandContext,
    cache: &ColumnValueCache,
    opts: &OptimizeOptions,
) -> Result<OptimizeReport> {
    let data_type = cache.data_type();
    let mut picker = FilterValueViewModel::from_cache(cache).with_optimizer(ctx.config.optimizer());

    {
        let mut root = picker.root_mut().bulk_update();
        for word in &opts.select {
            let value = parse_value(word, data_type);
            if root.set_value_selected(&value, true) == 0 {
                return Err(CommandError::Input(format!(
                    "'{}' does not occur in column '{}'",
                    word.trim(),
                    opts.column
                )));
            }
        }
    }

    let result = picker.optimize();
    tracing::debug!(
        search_type = ?result.search_type,
        saved = result.values_saved,
        "optimized selection"
    );
    let chip = picker
        .to_template()
        .map(|template| format_template_text(&template, data_type));

    Ok(OptimizeReport {
        column: opts.column.clone(),
        data_type,
        total_values: picker.all_values().len(),
        selected_values: picker.selected_values().len(),
        all_selected: picker.is_all_selected() == Some(true),
        result,
        chip,
    })
}
