//! Parsed chip text output formatting.

use owo_colors::OwoColorize;

use crate::commands::parse::ParseReport;

use super::helpers::title;

/// Formats a parse report as JSON.
pub fn format_parse_json(report: &ParseReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Formats a parse report as labelled lines.
pub fn format_parse_table(report: &ParseReport, use_colors: bool) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{} {} ({})\n",
        title("Search type:", use_colors),
        report.search_type.display_name(),
        report.data_type
    ));

    let template = &report.template;
    if !template.selected_value.is_null() {
        output.push_str(&format!("  value: {}\n", template.selected_value));
    }
    if !template.selected_secondary_value.is_null() {
        output.push_str(&format!("  and:   {}\n", template.selected_secondary_value));
    }
    if !template.selected_values.is_empty() {
        let items: Vec<String> = template.selected_values.iter().map(ToString::to_string).collect();
        output.push_str(&format!("  values: {}\n", items.join(", ")));
    }
    if !template.date_intervals.is_empty() {
        let names: Vec<&str> = template
            .date_intervals
            .iter()
            .map(|interval| interval.display_name())
            .collect();
        output.push_str(&format!("  intervals: {}\n", names.join(", ")));
    }

    match (&report.error, use_colors) {
        (None, true) => output.push_str(&format!("{}\n", "valid".green())),
        (None, false) => output.push_str("valid\n"),
        (Some(message), true) => output.push_str(&format!("{} {}\n", "invalid:".red(), message)),
        (Some(message), false) => output.push_str(&format!("invalid: {message}\n")),
    }
    output
}
