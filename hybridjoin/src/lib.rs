//! Bounded-memory enrichment of a transaction stream with reference data.
//!
//! A [`join::JoinEngine`] joins stream records against a keyed reference store one admission
//! window at a time, [`join::PostJoinEnricher`] adds secondary attributes to the output and
//! [`loader::load_facts`] turns the enriched records into fact rows. [`pipeline::Pipeline`]
//! composes the three.

pub mod concurrency;
pub mod dimensions;
pub mod error;
pub mod join;
pub mod loader;
mod macros;
pub mod metrics;
pub mod pipeline;
pub mod reference;
pub mod source;
pub mod types;
