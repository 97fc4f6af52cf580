//! Flat token stream for rendering active filters as chips.
//!
//! Each column filter becomes
//! `[ Column  SearchType Value ... (connector SearchType Value ...)* ] ×`,
//! with template connectors between templates of a group and group
//! connectors between groups. Every token records the column filter it
//! belongs to so a UI can route clicks (for example on the remove action)
//! back to the right filter.

use gridfilter_model::models::{CellValue, ColumnFilter, SearchTemplate, SearchType};
use serde::Serialize;
use uuid::Uuid;

use crate::display::{display_list_item, display_operand};
use crate::registry::InputTemplate;

/// Text of the token that removes a column filter.
pub const REMOVE_ACTION_TEXT: &str = "×";

/// What a token represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterTokenKind {
    OpenBracket,
    ColumnName,
    SearchType,
    Value,
    Operator,
    CloseBracket,
    GroupConnector,
    TemplateConnector,
    RemoveAction,
}

/// One renderable piece of a filter chip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterToken {
    pub kind: FilterTokenKind,
    pub text: String,
    /// The column filter this token belongs to.
    pub filter_id: Uuid,
    /// The template this token belongs to, for template-level tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<Uuid>,
    /// Position in the whole stream, starting at 0.
    pub order: usize,
}

struct TokenWriter {
    tokens: Vec<FilterToken>,
    filter_id: Uuid,
    template_id: Option<Uuid>,
}

impl TokenWriter {
    fn push(&mut self, kind: FilterTokenKind, text: impl Into<String>) {
        let order = self.tokens.len();
        self.tokens.push(FilterToken {
            kind,
            text: text.into(),
            filter_id: self.filter_id,
            template_id: self.template_id,
            order,
        });
    }

    fn template(&mut self, filter: &ColumnFilter, template: &SearchTemplate) {
        self.template_id = Some(template.id);
        let t = template.search_type;
        self.push(FilterTokenKind::SearchType, t.display_name());

        let operand = |v: &CellValue| display_operand(v, filter.data_type);
        match InputTemplate::for_search_type(t) {
            InputTemplate::NoInput => {}
            InputTemplate::SingleValue => {
                self.push(FilterTokenKind::Value, operand(&template.selected_value));
            }
            InputTemplate::DualValue => {
                self.push(FilterTokenKind::Value, operand(&template.selected_value));
                self.push(FilterTokenKind::Operator, "and");
                self.push(
                    FilterTokenKind::Value,
                    operand(&template.selected_secondary_value),
                );
            }
            InputTemplate::ValueList if t == SearchType::DateInterval => {
                for interval in &template.date_intervals {
                    self.push(FilterTokenKind::Value, interval.display_name());
                }
            }
            InputTemplate::ValueList => {
                for value in &template.selected_values {
                    self.push(
                        FilterTokenKind::Value,
                        display_list_item(value, filter.data_type),
                    );
                }
            }
        }
        self.template_id = None;
    }
}

/// Builds the token stream for `filters`, skipping filters without templates.
pub fn build_filter_tokens(filters: &[ColumnFilter]) -> Vec<FilterToken> {
    let mut writer = TokenWriter {
        tokens: Vec::new(),
        filter_id: Uuid::nil(),
        template_id: None,
    };

    for filter in filters.iter().filter(|f| !f.is_empty()) {
        writer.filter_id = filter.id;
        writer.push(FilterTokenKind::OpenBracket, "[");
        writer.push(FilterTokenKind::ColumnName, filter.column_name.as_str());

        let groups = filter.groups.iter().filter(|g| !g.templates.is_empty());
        for (gi, group) in groups.enumerate() {
            if gi > 0 {
                writer.push(
                    FilterTokenKind::GroupConnector,
                    group.effective_operator().as_str(),
                );
            }
            for (ti, template) in group.templates.iter().enumerate() {
                if ti > 0 {
                    writer.push(FilterTokenKind::TemplateConnector, template.operator.as_str());
                }
                writer.template(filter, template);
            }
        }

        writer.push(FilterTokenKind::CloseBracket, "]");
        writer.push(FilterTokenKind::RemoveAction, REMOVE_ACTION_TEXT);
    }
    writer.tokens
}

/// Joins token texts into a single line, leaving out remove actions.
pub fn render_tokens(tokens: &[FilterToken]) -> String {
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
        if token.kind == FilterTokenKind::Value {
            line.push('\'');
            line.push_str(&token.text);
            line.push('\'');
        } else {
            line.push_str(&token.text);
        }
        previous = Some(token.kind);
    }
    line
}
