use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Batching of the incoming stream and of fact persistence.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct BatchConfig {
    /// Maximum number of stream records pulled from the source per batch.
    #[serde(default = "default_stream_batch_size")]
    pub stream_batch_size: usize,
    /// Maximum number of fact rows persisted per write.
    #[serde(default = "default_fact_insert_size")]
    pub fact_insert_size: usize,
    /// Number of processed stream records between two progress log lines.
    #[serde(default = "default_progress_log_interval")]
    pub progress_log_interval: usize,
}

impl BatchConfig {
    pub const DEFAULT_STREAM_BATCH_SIZE: usize = 20_000;

    pub const DEFAULT_FACT_INSERT_SIZE: usize = 5_000;

    pub const DEFAULT_PROGRESS_LOG_INTERVAL: usize = 100_000;

    /// Validates batch configuration settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stream_batch_size == 0 {
            return Err(ValidationError::ZeroValue {
                field: "batch.stream_batch_size",
            });
        }

        if self.fact_insert_size == 0 {
            return Err(ValidationError::ZeroValue {
                field: "batch.fact_insert_size",
            });
        }

        if self.progress_log_interval == 0 {
            return Err(ValidationError::ZeroValue {
                field: "batch.progress_log_interval",
            });
        }

        Ok(())
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            stream_batch_size: default_stream_batch_size(),
            fact_insert_size: default_fact_insert_size(),
            progress_log_interval: default_progress_log_interval(),
        }
    }
}

fn default_stream_batch_size() -> usize {
    BatchConfig::DEFAULT_STREAM_BATCH_SIZE
}

fn default_fact_insert_size() -> usize {
    BatchConfig::DEFAULT_FACT_INSERT_SIZE
}

fn default_progress_log_interval() -> usize {
    BatchConfig::DEFAULT_PROGRESS_LOG_INTERVAL
}
