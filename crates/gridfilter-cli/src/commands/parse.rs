//! Parse command implementation.
//!
//! Reads chip text back into a search template.

use gridfilter_engine::display::{parse_display_text, ParsedDisplayText};
use gridfilter_engine::registry::SearchTypeRegistry;
use gridfilter_model::models::{ColumnDataType, SearchTemplate, SearchType};
use serde::Serialize;

use super::{CommandContext, CommandError, Result};
use crate::output::{format_parse_json, format_parse_table};

/// Options for the parse command.
#[derive(Debug)]
pub struct ParseOptions {
    /// Search type name as typed by the user.
    pub search_type: String,
    /// Chip text.
    pub text: String,
    /// Column data type for operand conversion.
    pub data_type: ColumnDataType,
}

/// Result of the parse command.
#[derive(Debug, Serialize)]
pub struct ParseReport {
    pub search_type: SearchType,
    pub data_type: ColumnDataType,
    pub parsed: ParsedDisplayText,
    pub template: SearchTemplate,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Executes the parse command.
///
/// # Errors
///
/// Returns an error for unknown search type names and for text that does not
/// parse. A template that parses but does not validate is reported, not
/// returned as an error.
pub fn execute(ctx: &CommandContext, opts: &ParseOptions) -> Result<()> {
    let registry = SearchTypeRegistry::standard();
    let search_type = resolve_search_type(&registry, &opts.search_type)?;

    let parsed = parse_display_text(&opts.text, search_type)?;
    let template = parsed.to_template(search_type, opts.data_type)?;
    let validation = registry.validate_template(&template, opts.data_type);

    let report = ParseReport {
        search_type,
        data_type: opts.data_type,
        parsed,
        template,
        valid: validation.is_valid,
        error: validation.error_message,
    };

    if ctx.json_output {
        println!("{}", format_parse_json(&report)?);
    } else if !ctx.quiet {
        print!("{}", format_parse_table(&report, ctx.use_colors));
    }
    Ok(())
}

/// Finds a search type by display name, variant name or snake_case name.
pub fn resolve_search_type(registry: &SearchTypeRegistry, name: &str) -> Result<SearchType> {
    registry
        .lookup_by_name(name)
        .or_else(|| registry.lookup_by_name(&name.replace(['_', '-'], "")))
        .ok_or_else(|| {
            let hint = registry
                .suggest(name)
                .map(|s| format!(" (did you mean '{s}'?)"))
                .unwrap_or_default();
            CommandError::Input(format!("unknown search type '{name}'{hint}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_search_type() {
        let registry = SearchTypeRegistry::standard();
        assert_eq!(resolve_search_type(&registry, "Is any of").unwrap(), SearchType::IsAnyOf);
        assert_eq!(resolve_search_type(&registry, "is_any_of").unwrap(), SearchType::IsAnyOf);
        assert_eq!(resolve_search_type(&registry, "top-n").unwrap(), SearchType::TopN);
        assert_eq!(resolve_search_type(&registry, "BETWEEN").unwrap(), SearchType::Between);
    }

    #[test]
    fn test_resolve_search_type_suggests() {
        let registry = SearchTypeRegistry::standard();
        let err = resolve_search_type(&registry, "Betwen").unwrap_err();
        assert!(err.to_string().contains("did you mean 'Between'?"));
    }
}
