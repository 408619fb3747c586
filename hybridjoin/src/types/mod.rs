//! Record types flowing through a join run.
//!
//! Stream records enter the engine, reference and secondary records come from the external
//! indexes, and enriched records leave it. Fact rows are what the fact loader persists.

mod enriched;
mod fact;
mod record;

pub use enriched::*;
pub use fact::*;
pub use record::*;
