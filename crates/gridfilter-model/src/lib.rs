//! Data model for data-grid column filters.
//!
//! # Quick Start
//!
//! ```
//! use gridfilter_model::prelude::*;
//! ```
//!
//! This re-exports cell values, search types, conditions, templates and the
//! error type.

pub mod error;
pub mod models;
pub mod prelude;
