use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Sizing of the hybrid join's in-memory structures.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct JoinConfig {
    /// Number of hash slots that resident stream records are bucketed into.
    #[serde(default = "default_hash_table_size")]
    pub hash_table_size: usize,
    /// Number of stream records admitted in the first admission round.
    #[serde(default = "default_window_capacity")]
    pub window_capacity: usize,
    /// Nominal number of reference tuples read per partition load.
    #[serde(default = "default_partition_size")]
    pub partition_size: usize,
}

impl JoinConfig {
    pub const DEFAULT_HASH_TABLE_SIZE: usize = 10_000;

    pub const DEFAULT_WINDOW_CAPACITY: usize = 10_000;

    pub const DEFAULT_PARTITION_SIZE: usize = 500;

    /// Ensures every size is non-zero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.hash_table_size == 0 {
            return Err(ValidationError::ZeroValue {
                field: "join.hash_table_size",
            });
        }

        if self.window_capacity == 0 {
            return Err(ValidationError::ZeroValue {
                field: "join.window_capacity",
            });
        }

        if self.partition_size == 0 {
            return Err(ValidationError::ZeroValue {
                field: "join.partition_size",
            });
        }

        Ok(())
    }
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            hash_table_size: default_hash_table_size(),
            window_capacity: default_window_capacity(),
            partition_size: default_partition_size(),
        }
    }
}

fn default_hash_table_size() -> usize {
    JoinConfig::DEFAULT_HASH_TABLE_SIZE
}

fn default_window_capacity() -> usize {
    JoinConfig::DEFAULT_WINDOW_CAPACITY
}

fn default_partition_size() -> usize {
    JoinConfig::DEFAULT_PARTITION_SIZE
}
