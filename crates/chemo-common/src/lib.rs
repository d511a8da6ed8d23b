//! Shared utilities for the curation crates.

pub mod polars;
pub mod text;

pub use polars::{any_to_string, any_to_text, format_numeric, parse_f64, parse_i64};
pub use text::collapse_whitespace;
