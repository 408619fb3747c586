//! The stream-to-reference hash join.
//!
//! [`engine::JoinEngine`] admits stream records into a [`window::WindowedHashIndex`] in
//! capacity-bounded rounds, probes them in [`queue::ProbeQueue`] order through a
//! [`partition::PartitionLoader`] and emits enriched records. [`enrich::PostJoinEnricher`] then adds
//! secondary attributes to the output.

pub mod engine;
pub mod enrich;
pub mod partition;
pub mod queue;
mod run;
pub mod stats;
pub mod window;

pub use engine::{BatchOutcome, EngineState, JoinEngine};
pub use enrich::{EnrichmentStats, PostJoinEnricher};
pub use partition::{IndexPartitionLoader, PartitionLoader};
pub use run::JoinOutput;
pub use stats::JoinStats;
