//! Search type listing output formatting.

use gridfilter_engine::registry::{InputTemplate, SearchTypeMetadata};
use owo_colors::OwoColorize;

use super::helpers::header;

/// Formats search types as JSON.
pub fn format_types_json(types: &[&SearchTypeMetadata]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({ "search_types": types }))
}

/// Formats search types as a table.
pub fn format_types_table(types: &[&SearchTypeMetadata], use_colors: bool) -> String {
    if types.is_empty() {
        return "No search types apply.\n".to_string();
    }

    let mut output = header(
        &format!("{:<22} {:<28} {:<7} {}", "Name", "Display", "Input", "Data types"),
        use_colors,
    );
    for metadata in types {
        let name = format!("{:<22}", metadata.search_type.name());
        let name = if use_colors && metadata.requires_collection {
            name.cyan().to_string()
        } else {
            name
        };
        let data_types: Vec<&str> = metadata
            .supported_data_types
            .iter()
            .map(|t| t.as_str())
            .collect();
        output.push_str(&format!(
            "{} {:<28} {:<7} {}\n",
            name,
            metadata.display_name,
            input_name(metadata.input_template),
            data_types.join(", ")
        ));
    }
    output
}

fn input_name(input: InputTemplate) -> &'static str {
    match input {
        InputTemplate::NoInput => "none",
        InputTemplate::SingleValue => "value",
        InputTemplate::DualValue => "range",
        InputTemplate::ValueList => "list",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridfilter_engine::registry::SearchTypeRegistry;
    use gridfilter_model::models::SearchType;

    #[test]
    fn test_types_table() {
        let registry = SearchTypeRegistry::standard();
        let types: Vec<&SearchTypeMetadata> = [SearchType::Between, SearchType::IsNull]
            .iter()
            .filter_map(|t| registry.metadata(*t))
            .collect();
        let table = format_types_table(&types, false);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Between "));
        assert!(lines[1].contains("range"));
        assert!(lines[1].ends_with("number, date_time"));
        assert!(lines[2].contains("Is blank"));
        assert!(lines[2].contains("none"));
    }

    #[test]
    fn test_types_json() {
        let registry = SearchTypeRegistry::standard();
        let types: Vec<&SearchTypeMetadata> = registry.metadata(SearchType::TopN).into_iter().collect();
        let json = format_types_json(&types).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["search_types"][0]["search_type"], "top_n");
        assert_eq!(value["search_types"][0]["requires_collection"], true);
        assert_eq!(value["search_types"][0]["input_template"], "single_value");
    }

    #[test]
    fn test_empty_types() {
        assert_eq!(format_types_table(&[], false), "No search types apply.\n");
    }
}
