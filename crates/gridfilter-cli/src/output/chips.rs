//! Filter chip output formatting.

use gridfilter_engine::tokens::{FilterToken, FilterTokenKind};
use owo_colors::OwoColorize;

use crate::commands::chips::FilterChip;

use super::helpers::header;

/// Formats chips as JSON.
pub fn format_chips_json(chips: &[FilterChip]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({ "filters": chips }))
}

/// Formats chips, one column filter per line followed by its templates.
pub fn format_chips_table(chips: &[FilterChip], use_colors: bool) -> String {
    if chips.is_empty() {
        return "No filters defined.\n".to_string();
    }

    let mut output = String::new();
    for chip in chips {
        output.push_str(&paint_tokens(&chip.tokens, &chip.text, use_colors));
        output.push('\n');
        for template in &chip.templates {
            output.push_str(&format!("    {}\n", template.text));
        }
    }
    output
}

/// Formats a token stream as a table.
pub fn format_tokens_table(tokens: &[FilterToken], use_colors: bool) -> String {
    if tokens.is_empty() {
        return "No tokens.\n".to_string();
    }

    let mut output = header(
        &format!("{:>5}  {:<18} {:<8} {}", "Order", "Kind", "Filter", "Text"),
        use_colors,
    );
    for token in tokens {
        let filter_id = token.filter_id.simple().to_string();
        output.push_str(&format!(
            "{:>5}  {:<18} {:<8} {}\n",
            token.order,
            kind_name(token.kind),
            &filter_id[..8],
            token.text
        ));
    }
    output
}

/// Colors each token by kind; falls back to the plain chip text without colors.
fn paint_tokens(tokens: &[FilterToken], plain: &str, use_colors: bool) -> String {
    if !use_colors {
        return plain.to_string();
    }

    let mut line = String::new();
    let mut previous: Option<FilterTokenKind> = None;
    for token in tokens {
        if token.kind == FilterTokenKind::RemoveAction {
            continue;
        }
        let glued = matches!(previous, Some(FilterTokenKind::OpenBracket))
            || token.kind == FilterTokenKind::CloseBracket;
        if previous.is_some() && !glued {
            line.push(' ');
        }
        let text = match token.kind {
            FilterTokenKind::ColumnName => token.text.bold().to_string(),
            FilterTokenKind::SearchType => token.text.cyan().to_string(),
            FilterTokenKind::Value => format!("'{}'", token.text).yellow().to_string(),
            FilterTokenKind::GroupConnector | FilterTokenKind::TemplateConnector => {
                token.text.magenta().to_string()
            }
            _ => token.text.dimmed().to_string(),
        };
        line.push_str(&text);
        previous = Some(token.kind);
    }
    line
}

fn kind_name(kind: FilterTokenKind) -> &'static str {
    match kind {
        FilterTokenKind::OpenBracket => "open_bracket",
        FilterTokenKind::ColumnName => "column_name",
        FilterTokenKind::SearchType => "search_type",
        FilterTokenKind::Value => "value",
        FilterTokenKind::Operator => "operator",
        FilterTokenKind::CloseBracket => "close_bracket",
        FilterTokenKind::GroupConnector => "group_connector",
        FilterTokenKind::TemplateConnector => "template_connector",
        FilterTokenKind::RemoveAction => "remove_action",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::chips::build_chips;
    use gridfilter_engine::tokens::build_filter_tokens;
    use gridfilter_model::models::{
        ColumnDataType, ColumnFilter, SearchTemplate, SearchTemplateGroup, SearchType,
    };

    fn filters() -> Vec<ColumnFilter> {
        vec![ColumnFilter::new("Age", "age", ColumnDataType::Number).group(
            SearchTemplateGroup::new(vec![SearchTemplate::new(SearchType::GreaterThan).value(30)]),
        )]
    }

    #[test]
    fn test_chips_table_plain() {
        let table = format_chips_table(&build_chips(&filters()), false);
        assert_eq!(table, "[Age Is greater than '30']\n    Is greater than '30'\n");
    }

    #[test]
    fn test_chips_table_colored_keeps_text() {
        let table = format_chips_table(&build_chips(&filters()), true);
        assert!(table.contains("Age"));
        assert!(table.contains("'30'"));
        assert!(table.contains('\u{1b}'));
    }

    #[test]
    fn test_chips_json() {
        let json = format_chips_json(&build_chips(&filters())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["filters"][0]["column"], "Age");
        assert_eq!(value["filters"][0]["tokens"][0]["kind"], "open_bracket");
    }

    #[test]
    fn test_tokens_table() {
        let tokens = build_filter_tokens(&filters());
        let table = format_tokens_table(&tokens, false);
        assert!(table.contains("    1  column_name"));
        assert!(table.contains("remove_action"));
        assert_eq!(table.lines().count(), tokens.len() + 1);
    }

    #[test]
    fn test_empty_outputs() {
        assert_eq!(format_chips_table(&[], false), "No filters defined.\n");
        assert_eq!(format_tokens_table(&[], false), "No tokens.\n");
    }
}
