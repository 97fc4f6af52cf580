//! Prelude module for convenient imports.
//!
//! ```
//! use gridfilter_engine::prelude::*;
//!
//! let registry = SearchTypeRegistry::standard();
//! let engine = SearchEngine::standard();
//! assert!(!engine.factory().is_empty());
//! # let _ = registry;
//! ```

pub use crate::accessor::{JsonPathAccessor, ValueAccessor};
pub use crate::collection::{CollectionContext, CollectionStats};
pub use crate::display::{format_template_text, parse_display_text, DisplayTextError};
pub use crate::error::{CacheError, FilterError, FilterResult};
pub use crate::evaluator::{SearchEngine, SearchEvaluator, SearchEvaluatorFactory};
pub use crate::expression::{CollectionFilterPass, CompiledFilter, FilterExpressionBuilder};
pub use crate::metadata::{BlankPolicy, ValueMetadata};
pub use crate::optimizer::{FilterSelectionOptimizer, OptimizedFilterResult};
pub use crate::registry::{InputTemplate, SearchTypeRegistry, SearchTypeMetadata};
pub use crate::tokens::{build_filter_tokens, FilterToken, FilterTokenKind};
pub use crate::value_cache::{CacheOptions, CacheUpdate, ColumnValueCache, ValueCacheManager};
pub use crate::views::{FilterValueGroup, FilterValueItem, FilterValueViewModel};
