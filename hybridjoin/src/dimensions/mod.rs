//! Dimension data needed to turn enriched records into fact rows.

pub mod date;
pub mod keys;

pub use date::{DateDimension, DateRow, Season};
pub use keys::{DimensionKeys, KeyMap};
