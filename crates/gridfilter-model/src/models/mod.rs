//! Data types shared by the filter engine and its front ends.
//!
//! Values, search types and conditions are evaluated by the engine; templates
//! and column filters are the editable configuration a UI or a definition
//! file produces.

mod condition;
mod search_type;
mod template;
mod value;

pub use condition::*;
pub use search_type::*;
pub use template::*;
pub use value::*;
