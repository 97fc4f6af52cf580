//! Prelude module for convenient imports.
//!
//! ```
//! use gridfilter_model::prelude::*;
//!
//! let template = SearchTemplate::new(SearchType::Equals).value("open");
//! let condition = SearchCondition::from_template(&template, ColumnDataType::String);
//! assert_eq!(condition.primary_value, CellValue::text("open"));
//! ```

pub use crate::error::{ModelError, Result};

pub use crate::models::{
    CellValue, ColumnDataType, ColumnFilter, DateInterval, IntervalBounds, LogicalOperator,
    SearchCondition, SearchTemplate, SearchTemplateGroup, SearchType, ValidationResult,
};
