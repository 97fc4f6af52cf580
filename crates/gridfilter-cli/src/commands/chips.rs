//! Chips command implementation.
//!
//! Renders the column filters of a definition file the way a filter bar shows them.

use std::path::PathBuf;

use gridfilter_engine::display::format_template_text;
use gridfilter_engine::tokens::{build_filter_tokens, render_tokens, FilterToken};
use gridfilter_model::models::ColumnFilter;
use serde::Serialize;
use uuid::Uuid;

use super::input::load_definition;
use super::{CommandContext, Result};
use crate::output::{format_chips_json, format_chips_table, format_tokens_table};

/// Options for the chips command.
#[derive(Debug)]
pub struct ChipsOptions {
    /// Definition file.
    pub definition: PathBuf,
    /// Print the raw token stream.
    pub tokens: bool,
}

/// Display text of one template.
#[derive(Debug, Serialize)]
pub struct TemplateChip {
    pub id: Uuid,
    pub text: String,
}

/// One column filter rendered as a chip.
#[derive(Debug, Serialize)]
pub struct FilterChip {
    pub id: Uuid,
    pub column: String,
    pub text: String,
    pub templates: Vec<TemplateChip>,
    pub tokens: Vec<FilterToken>,
}

/// Executes the chips command.
pub fn execute(ctx: &CommandContext, opts: &ChipsOptions) -> Result<()> {
    let filters = load_definition(&opts.definition)?;

    if opts.tokens {
        let tokens = build_filter_tokens(&filters);
        if ctx.json_output {
            println!("{}", serde_json::to_string_pretty(&tokens)?);
        } else if !ctx.quiet {
            print!("{}", format_tokens_table(&tokens, ctx.use_colors));
        }
        return Ok(());
    }

    let chips = build_chips(&filters);
    if ctx.json_output {
        println!("{}", format_chips_json(&chips)?);
    } else if !ctx.quiet {
        print!("{}", format_chips_table(&chips, ctx.use_colors));
    }
    Ok(())
}

/// Builds one chip per column filter that holds templates.
pub fn build_chips(filters: &[ColumnFilter]) -> Vec<FilterChip> {
    filters
        .iter()
        .filter(|filter| !filter.is_empty())
        .map(|filter| {
            let tokens = build_filter_tokens(std::slice::from_ref(filter));
            FilterChip {
                id: filter.id,
                column: filter.column_name.clone(),
                text: render_tokens(&tokens),
                templates: filter
                    .templates()
                    .map(|template| TemplateChip {
                        id: template.id,
                        text: format_template_text(template, filter.data_type),
                    })
                    .collect(),
                tokens,
            }
        })
        .collect()
}
