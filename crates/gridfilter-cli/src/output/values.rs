//! Value list output formatting.

use gridfilter_engine::views::{FilterValueGroup, FilterValueNode};

use crate::commands::values::ValuesReport;

use super::helpers::{blank_marker, checkbox, header, title, truncate_str};

/// Longest value text shown in a table row.
const MAX_VALUE_WIDTH: usize = 60;

/// Formats a values report as JSON.
pub fn format_values_json(report: &ValuesReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Formats a values report as a table.
pub fn format_values_table(report: &ValuesReport, use_colors: bool) -> String {
    let mut output = String::new();

    let sorted = if report.sorted { "sorted" } else { "unsorted" };
    output.push_str(&format!(
        "{} {} ({}, {} distinct, {}, {} rows)\n\n",
        title("Column", use_colors),
        report.column,
        report.data_type,
        report.values.len(),
        sorted,
        report.total_rows,
    ));

    if report.values.is_empty() && report.blanks.is_empty() {
        output.push_str("No values found.\n");
        return output;
    }

    output.push_str(&header(&format!("{:>7}  {}", "Count", "Value"), use_colors));
    for value in &report.values {
        output.push_str(&format!(
            "{:>7}  {}\n",
            value.count,
            truncate_str(&value.display_text, MAX_VALUE_WIDTH)
        ));
    }
    for blank in &report.blanks {
        let label = if blank.label.starts_with('(') {
            blank.label.clone()
        } else {
            format!("({})", blank.label)
        };
        output.push_str(&format!(
            "{:>7}  {}\n",
            blank.count,
            blank_marker(&label, use_colors)
        ));
    }

    output
}

/// Formats a grouped value tree with counts, one node per line.
pub fn format_value_tree(root: &FilterValueGroup, use_colors: bool) -> String {
    let mut output = String::new();
    write_group(&mut output, root, 0, use_colors);
    if root.children().is_empty() {
        output.push_str("No values found.\n");
    }
    output
}

fn write_group(output: &mut String, group: &FilterValueGroup, depth: usize, use_colors: bool) {
    for child in group.children() {
        let indent = "  ".repeat(depth);
        match child {
            FilterValueNode::Item(item) => {
                output.push_str(&format!(
                    "{indent}{} {} ({})\n",
                    checkbox(Some(item.selected)),
                    item.display_text,
                    item.count
                ));
            }
            FilterValueNode::Group(nested) => {
                let count: usize = nested.items().iter().map(|item| item.count).sum();
                output.push_str(&format!(
                    "{indent}{} {} ({})\n",
                    checkbox(nested.is_selected()),
                    title(&nested.display_text, use_colors),
                    count
                ));
                write_group(output, nested, depth + 1, use_colors);
            }
        }
    }
}
