//! Order transformation: the cleaning rules and the pipeline around them.
//!
//! - [`cleaner`] - the core grid transformation (clear-set, protection rule,
//!   West-column removal)
//! - [`pipeline`] - bytes-in/bytes-out orchestration

pub mod cleaner;
pub mod pipeline;

pub use cleaner::{clean_grid, CleanOptions, Cleaned};
pub use pipeline::{clean_order_bytes, clean_order_file};
