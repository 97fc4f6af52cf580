//! Reading row files and filter definition files.

use std::fs;
use std::path::Path;

use gridfilter_engine::accessor::{JsonPathAccessor, ValueAccessor};
use gridfilter_engine::metadata::BLANK_DISPLAY_TEXT;
use gridfilter_engine::registry::SearchTypeRegistry;
use gridfilter_model::models::{CellValue, ColumnDataType, ColumnFilter};
use serde::Deserialize;
use serde_json::Value;

use super::{CommandError, Result};

/// A definition file: a list of column filters.
///
/// JSON files may hold the bare array; TOML files use `[[filters]]` tables.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DefinitionFile {
    Table { filters: Vec<ColumnFilter> },
    List(Vec<ColumnFilter>),
}

/// Reads a JSON file holding an array of rows.
pub fn load_rows(path: &Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path)?;
    match serde_json::from_str(&content)? {
        Value::Array(rows) => {
            tracing::debug!(path = %path.display(), rows = rows.len(), "loaded rows");
            Ok(rows)
        }
        other => Err(CommandError::Input(format!(
            "{} must hold a JSON array of rows, found {}",
            path.display(),
            json_kind(&other)
        ))),
    }
}

/// Reads column filters from a `.toml` or `.json` file.
pub fn load_definition(path: &Path) -> Result<Vec<ColumnFilter>> {
    let content = fs::read_to_string(path)?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let file: DefinitionFile = if is_toml {
        toml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };
    let filters = match file {
        DefinitionFile::Table { filters } | DefinitionFile::List(filters) => filters,
    };
    tracing::debug!(path = %path.display(), filters = filters.len(), "loaded filter definition");
    Ok(filters)
}

/// Checks every template against its column's data type.
pub fn validate_filters(registry: &SearchTypeRegistry, filters: &[ColumnFilter]) -> Result<()> {
    for filter in filters {
        for template in filter.templates() {
            registry
                .check_template(template, filter.data_type)
                .inspect_err(|e| {
                    tracing::debug!(column = %filter.column_name, error = %e, "rejected template");
                })?;
        }
    }
    Ok(())
}

/// Reads one column from every row.
pub fn column_values(rows: &[Value], path: &str) -> Vec<CellValue> {
    rows.iter()
        .map(|row| JsonPathAccessor.value(row, path))
        .collect()
}

/// Turns a command-line word into a value of the column's type.
///
/// `(blank)` selects blanks. Words that do not convert stay text.
pub fn parse_value(word: &str, data_type: ColumnDataType) -> CellValue {
    let word = word.trim();
    if word.eq_ignore_ascii_case(BLANK_DISPLAY_TEXT) {
        return CellValue::Null;
    }
    let text = CellValue::text(word);
    text.convert_to(data_type).unwrap_or(text)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
