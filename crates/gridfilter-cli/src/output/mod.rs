//! Output formatting utilities for the gf CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules by command:
//!
//! - [`values`] - Distinct values, blank counts and date trees
//! - [`rows`] - Matching rows and match counts
//! - [`chips`] - Filter chips and token streams
//! - [`parse`] - Parsed chip text
//! - [`optimize`] - Selection optimizer results
//! - [`types`] - Search type listings
//! - [`helpers`] - Common formatting utilities (truncation, headers, checkboxes)

mod chips;
pub mod helpers;
mod optimize;
mod parse;
mod rows;
mod types;
mod values;

// Values
pub use values::{format_value_tree, format_values_json, format_values_table};

// Rows
pub use rows::{format_count, format_matches_json, format_matches_table};

// Chips
pub use chips::{format_chips_json, format_chips_table, format_tokens_table};

// Parse
pub use parse::{format_parse_json, format_parse_table};

// Optimize
pub use optimize::{format_optimize_json, format_optimize_table};

// Types
pub use types::{format_types_json, format_types_table};
