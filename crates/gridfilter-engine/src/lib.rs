//! Evaluation engine for data-grid column filters.
//!
//! # Quick Start
//!
//! ```
//! use gridfilter_engine::prelude::*;
//! use gridfilter_model::prelude::*;
//! use serde_json::{json, Value};
//!
//! let rows = vec![json!({ "age": 36 }), json!({ "age": 85 }), json!({ "age": null })];
//! let filter = ColumnFilter::new("Age", "age", ColumnDataType::Number).group(
//!     SearchTemplateGroup::new(vec![SearchTemplate::new(SearchType::Between).range(30, 40)]),
//! );
//!
//! let engine = SearchEngine::standard();
//! let pass = CollectionFilterPass::<Value>::new(&engine, &JsonPathAccessor);
//! let filters = [filter];
//! assert_eq!(pass.apply(&rows, &filters), vec![0]);
//! ```
//!
//! The pieces, bottom-up:
//!
//! - [`metadata`]: blank detection and hashable value keys
//! - [`value_cache`]: distinct-value caches for value pickers
//! - [`registry`]: which search types apply to which column types
//! - [`evaluator`]: one evaluator per search type behind [`SearchEngine`]
//! - [`collection`]: whole-column statistics for TopN, averages and uniqueness
//! - [`expression`]: compiling column filters into row predicates
//! - [`optimizer`]: inclusion versus exclusion for large selections
//! - [`display`], [`tokens`] and [`views`]: what a filter UI renders

pub mod accessor;
pub mod collection;
pub mod display;
pub mod error;
pub mod evaluator;
pub mod expression;
pub mod metadata;
pub mod optimizer;
pub mod prelude;
pub mod registry;
pub mod tokens;
pub mod value_cache;
pub mod views;

pub use display::DisplayTextError;
pub use error::{CacheError, FilterError, FilterResult};
pub use evaluator::SearchEngine;
