//! Filter command implementation.
//!
//! Applies the column filters of a definition file to a rows file.

use std::path::PathBuf;

use gridfilter_engine::accessor::JsonPathAccessor;
use gridfilter_engine::expression::CollectionFilterPass;
use gridfilter_engine::registry::SearchTypeRegistry;
use gridfilter_engine::SearchEngine;
use gridfilter_model::models::ColumnFilter;
use serde_json::Value;

use super::input::{load_definition, load_rows, validate_filters};
use super::{CommandContext, Result};
use crate::output::{format_count, format_matches_json, format_matches_table};

/// Options for the filter command.
#[derive(Debug)]
pub struct FilterOptions {
    /// JSON rows file.
    pub rows: PathBuf,
    /// Definition file.
    pub definition: PathBuf,
    /// Print only the number of matches.
    pub count: bool,
}

/// Executes the filter command.
///
/// # Errors
///
/// Returns an error if either file cannot be read, or if a template does not
/// validate for its column.
pub fn execute(ctx: &CommandContext, opts: &FilterOptions) -> Result<()> {
    let rows = load_rows(&opts.rows)?;
    let filters = load_definition(&opts.definition)?;
    validate_filters(&SearchTypeRegistry::standard(), &filters)?;

    let matched = apply_filters(&rows, &filters);
    tracing::debug!(total = rows.len(), matched = matched.len(), "applied filters");

    if opts.count {
        if ctx.json_output {
            let output = serde_json::json!({ "total": rows.len(), "count": matched.len() });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else if !ctx.quiet {
            println!("{}", format_count(matched.len(), rows.len(), ctx.use_colors));
        }
        return Ok(());
    }

    if ctx.json_output {
        println!("{}", format_matches_json(&rows, &matched)?);
    } else if !ctx.quiet {
        print!("{}", format_matches_table(&rows, &matched, ctx.use_colors)?);
    }
    Ok(())
}

/// Indices of the rows matching every filter.
pub fn apply_filters(rows: &[Value], filters: &[ColumnFilter]) -> Vec<usize> {
    let engine = SearchEngine::standard();
    CollectionFilterPass::<Value>::new(&engine, &JsonPathAccessor).apply(rows, filters)
}
