//! Types command implementation.
//!
//! Lists the search types of the registry, optionally for one column data type.

use gridfilter_engine::registry::{SearchTypeMetadata, SearchTypeRegistry};
use gridfilter_model::models::{ColumnDataType, SearchType};

use super::{CommandContext, Result};
use crate::output::{format_types_json, format_types_table};

/// Options for the types command.
#[derive(Debug)]
pub struct TypesOptions {
    /// Only types offered for this data type.
    pub data_type: Option<ColumnDataType>,
    /// Whether the column can hold blanks.
    pub nullable: bool,
}

/// Executes the types command.
pub fn execute(ctx: &CommandContext, opts: &TypesOptions) -> Result<()> {
    let registry = SearchTypeRegistry::standard();
    let types = select_types(&registry, opts);

    if ctx.json_output {
        println!("{}", format_types_json(&types)?);
    } else if !ctx.quiet {
        print!("{}", format_types_table(&types, ctx.use_colors));
    }
    Ok(())
}

fn select_types<'r>(registry: &'r SearchTypeRegistry, opts: &TypesOptions) -> Vec<&'r SearchTypeMetadata> {
    match opts.data_type {
        Some(data_type) => registry.filters_for_data_type(data_type, opts.nullable),
        None => SearchType::ALL
            .iter()
            .filter_map(|t| registry.metadata(*t))
            .collect(),
    }
}
