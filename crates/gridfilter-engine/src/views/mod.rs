//! Selection state behind value pickers.

mod tree;
mod view_model;

pub use tree::{BulkUpdate, FilterValueGroup, FilterValueItem, FilterValueNode};
pub use view_model::{DateGrouping, FilterValueViewModel};
