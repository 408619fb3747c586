//! Reference datasets the stream is enriched with.
//!
//! The [`ReferenceIndex`] maps join keys to reference records and backs the join's partition
//! loads. The [`SecondaryIndex`] maps secondary keys to the attributes merged in after the join.
//! Both are populated before a run starts and are never mutated by the engine.

mod base;
pub mod memory;

pub use base::{ReferenceIndex, SecondaryIndex};
