//! Loading field options documents.

mod format;
mod input;

pub use format::DocumentFormat;
pub use input::{load_field_options, load_strings, parse_field_options, parse_strings};
