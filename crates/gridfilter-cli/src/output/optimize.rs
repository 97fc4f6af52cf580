//! Selection optimizer output formatting.

use owo_colors::OwoColorize;

use crate::commands::optimize::OptimizeReport;

use super::helpers::title;

/// Formats an optimize report as JSON.
pub fn format_optimize_json(report: &OptimizeReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Formats an optimize report as labelled lines.
pub fn format_optimize_table(report: &OptimizeReport, use_colors: bool) -> String {
    let mut output = format!(
        "{} {} ({})\n",
        title("Column", use_colors),
        report.column,
        report.data_type
    );
    output.push_str(&format!(
        "Selected {} of {} values\n\n",
        report.selected_values, report.total_values
    ));

    let Some(chip) = &report.chip else {
        output.push_str("Every value is selected; no filter is needed.\n");
        return output;
    };

    let result = &report.result;
    let mode = if result.uses_exclusion { "exclusion" } else { "inclusion" };
    let mode = if use_colors {
        if result.uses_exclusion {
            mode.green().to_string()
        } else {
            mode.yellow().to_string()
        }
    } else {
        mode.to_string()
    };

    output.push_str(&format!("Filter:   {chip}\n"));
    output.push_str(&format!(
        "Mode:     {mode} ({} operand{})\n",
        result.values.len(),
        if result.values.len() == 1 { "" } else { "s" }
    ));
    if result.values_saved > 0 {
        output.push_str(&format!("Saved:    {} operands\n", result.values_saved));
    }
    output.push_str(&format!("Reason:   {}\n", result.rationale));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridfilter_engine::optimizer::FilterSelectionOptimizer;
    use gridfilter_model::models::{CellValue, ColumnDataType};

    fn report(selected: usize, chip: Option<&str>) -> OptimizeReport {
        let all: Vec<CellValue> = (0..100).map(CellValue::from).collect();
        let result = FilterSelectionOptimizer::default().optimize(&all, &all[..selected]);
        OptimizeReport {
            column: "n".to_string(),
            data_type: ColumnDataType::Number,
            total_values: 100,
            selected_values: selected,
            all_selected: selected == 100,
            result,
            chip: chip.map(str::to_string),
        }
    }

    #[test]
    fn test_exclusion_table() {
        let table = format_optimize_table(&report(96, Some("Is none of [96, 97, 98, 99]")), false);
        assert!(table.contains("Selected 96 of 100 values\n"));
        assert!(table.contains("Filter:   Is none of [96, 97, 98, 99]\n"));
        assert!(table.contains("Mode:     exclusion (4 operands)\n"));
        assert!(table.contains("Saved:    92 operands\n"));
    }

    #[test]
    fn test_inclusion_table() {
        let table = format_optimize_table(&report(1, Some("Is any of [0]")), false);
        assert!(table.contains("Mode:     inclusion (1 operand)\n"));
        assert!(!table.contains("Saved:"));
    }

    #[test]
    fn test_everything_selected() {
        let table = format_optimize_table(&report(100, None), false);
        assert!(table.ends_with("Every value is selected; no filter is needed.\n"));
    }

    #[test]
    fn test_optimize_json() {
        let json = format_optimize_json(&report(96, Some("x"))).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["result"]["search_type"], "is_none_of");
        assert_eq!(value["result"]["values_saved"], 92);
    }
}
