//! Stream sources feeding the join engine.
//!
//! A [`StreamSource`] yields finite, ordered batches of stream records and is exhausted once.

mod base;
pub mod memory;

pub use base::StreamSource;
