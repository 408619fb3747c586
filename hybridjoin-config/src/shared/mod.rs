//! Shared configuration types for join pipelines.

mod base;
mod batch;
mod dates;
mod join;
mod pipeline;

pub use base::ValidationError;
pub use batch::BatchConfig;
pub use dates::DateRangeConfig;
pub use join::JoinConfig;
pub use pipeline::PipelineConfig;
