//! Filtered row output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;

use super::helpers::header;

/// JSON output structure for the filter command.
#[derive(Serialize)]
pub struct MatchesOutput<'a> {
    pub total: usize,
    pub count: usize,
    pub rows: Vec<MatchedRow<'a>>,
}

/// One matching row with its position in the input.
#[derive(Serialize)]
pub struct MatchedRow<'a> {
    pub index: usize,
    pub row: &'a Value,
}

/// Formats matching rows as JSON.
pub fn format_matches_json(rows: &[Value], matched: &[usize]) -> Result<String, serde_json::Error> {
    let output = MatchesOutput {
        total: rows.len(),
        count: matched.len(),
        rows: matched
            .iter()
            .map(|&index| MatchedRow {
                index,
                row: &rows[index],
            })
            .collect(),
    };
    serde_json::to_string_pretty(&output)
}

/// Formats matching rows as one compact JSON line each.
pub fn format_matches_table(
    rows: &[Value],
    matched: &[usize],
    use_colors: bool,
) -> Result<String, serde_json::Error> {
    if matched.is_empty() {
        return Ok(format!("No rows match ({} rows checked).\n", rows.len()));
    }

    let mut output = header(&format!("{:>6}  {}", "Row", "Data"), use_colors);
    for &index in matched {
        output.push_str(&format!("{:>6}  {}\n", index, serde_json::to_string(&rows[index])?));
    }
    output.push('\n');
    output.push_str(&format_count(matched.len(), rows.len(), use_colors));
    output.push('\n');
    Ok(output)
}

/// Formats "N of M rows match".
pub fn format_count(count: usize, total: usize, use_colors: bool) -> String {
    let count_text = if use_colors {
        count.green().bold().to_string()
    } else {
        count.to_string()
    };
    let noun = if total == 1 { "row" } else { "rows" };
    format!("{count_text} of {total} {noun} match")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_matches_json() {
        let rows = vec![json!({ "a": 1 }), json!({ "a": 2 })];
        let json = format_matches_json(&rows, &[1]).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total"], 2);
        assert_eq!(value["count"], 1);
        assert_eq!(value["rows"][0]["index"], 1);
        assert_eq!(value["rows"][0]["row"]["a"], 2);
    }

    #[test]
    fn test_matches_table() {
        let rows = vec![json!({ "a": 1 }), json!({ "a": 2 })];
        let table = format_matches_table(&rows, &[0, 1], false).unwrap();
        assert!(table.contains("     0  {\"a\":1}\n"));
        assert!(table.ends_with("2 of 2 rows match\n"));
    }

    #[test]
    fn test_matches_table_empty() {
        let rows = vec![json!({ "a": 1 })];
        assert_eq!(
            format_matches_table(&rows, &[], false).unwrap(),
            "No rows match (1 rows checked).\n"
        );
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0, 1, false), "0 of 1 row match");
        assert_eq!(format_count(3, 10, false), "3 of 10 rows match");
    }
}
