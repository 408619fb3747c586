use serde::{Deserialize, Serialize};

use crate::Config;
use crate::shared::{BatchConfig, DateRangeConfig, JoinConfig, ValidationError};

/// Configuration for a complete enrichment run.
///
/// Every section falls back to its defaults when omitted, so an empty configuration file yields
/// the sizing the warehouse load was tuned for.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Hash table, window and partition sizing.
    #[serde(default)]
    pub join: JoinConfig,
    /// Stream and fact batching.
    #[serde(default)]
    pub batch: BatchConfig,
    /// Range of the generated date dimension.
    #[serde(default)]
    pub dates: DateRangeConfig,
}

impl PipelineConfig {
    /// Validates every section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.join.validate()?;
        self.batch.validate()?;

        Ok(())
    }
}

impl Config for PipelineConfig {
    const LIST_PARSE_KEYS: &'static [&'static str] = &[];
}
