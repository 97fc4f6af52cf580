//! Rendering templates as chip text.

use gridfilter_model::models::{CellValue, ColumnDataType, SearchTemplate, SearchType};

use crate::metadata::BLANK_DISPLAY_TEXT;
use crate::registry::InputTemplate;

/// Renders `template` as chip text for a column of `data_type`.
///
/// Single and range operands are always quoted. List items are quoted only
/// when they would not read back as the same bare words; a null item is the
/// bare `(blank)` entry of the value picker.
pub fn format_template_text(template: &SearchTemplate, data_type: ColumnDataType) -> String {
    let t = template.search_type;
    let name = t.display_name();
    let operand = |v: &CellValue| display_operand(v, data_type);

    match InputTemplate::for_search_type(t) {
        InputTemplate::NoInput => name.to_string(),
        InputTemplate::SingleValue => {
            format!("{name} {}", quote(&operand(&template.selected_value)))
        }
        InputTemplate::DualValue => format!(
            "{name} {} and {}",
            quote(&operand(&template.selected_value)),
            quote(&operand(&template.selected_secondary_value))
        ),
        InputTemplate::ValueList => {
            let items: Vec<String> = if t == SearchType::DateInterval {
                template
                    .date_intervals
                    .iter()
                    .map(|i| i.display_name().to_string())
                    .collect()
            } else {
                template
                    .selected_values
                    .iter()
                    .map(|v| match v {
                        CellValue::Null => BLANK_DISPLAY_TEXT.to_string(),
                        v => list_item(&operand(v)),
                    })
                    .collect()
            };
            format!("{name} [{}]", items.join(", "))
        }
    }
}

/// Operands are shown as the column would show them when they convert.
pub(crate) fn display_operand(value: &CellValue, data_type: ColumnDataType) -> String {
    value
        .convert_to(data_type)
        .unwrap_or_else(|| value.clone())
        .to_string()
}

/// A list item as the picker shows it: null reads as `(blank)`.
pub(crate) fn display_list_item(value: &CellValue, data_type: ColumnDataType) -> String {
    if value.is_null() {
        BLANK_DISPLAY_TEXT.to_string()
    } else {
        display_operand(value, data_type)
    }
}

fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for c in s.chars() {
        if matches!(c, '\'' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

fn list_item(s: &str) -> String {
    let bare = !s.is_empty()
        && !s.contains(|c: char| matches!(c, ',' | '[' | ']' | '\'' | '"' | '\\'))
        && s.split_whitespace().collect::<Vec<_>>().join(" ") == s;
    if bare {
        s.to_string()
    } else {
        quote(s)
    }
}
