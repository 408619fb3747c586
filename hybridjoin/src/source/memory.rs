use std::collections::VecDeque;

use crate::error::JoinResult;
use crate::source::StreamSource;
use crate::types::StreamRecord;

/// Vector-backed [`StreamSource`] for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct MemoryStreamSource {
    records: VecDeque<StreamRecord>,
    batches_served: u64,
}

impl MemoryStreamSource {
    pub fn new(records: impl IntoIterator<Item = StreamRecord>) -> Self {
        Self {
            records: records.into_iter().collect(),
            batches_served: 0,
        }
    }

    /// Returns the number of records not yet handed out.
    pub fn remaining(&self) -> usize {
        self.records.len()
    }

    /// Returns the number of non-empty batches handed out so far.
    pub fn batches_served(&self) -> u64 {
        self.batches_served
    }
}

impl FromIterator<StreamRecord> for MemoryStreamSource {
    fn from_iter<I: IntoIterator<Item = StreamRecord>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl StreamSource for MemoryStreamSource {
    fn name() -> &'static str {
        "memory"
    }

    async fn next_batch(&mut self, max_size: usize) -> JoinResult<Vec<StreamRecord>> {
        let size = max_size.min(self.records.len());
        let batch: Vec<_> = self.records.drain(..size).collect();

        if !batch.is_empty() {
            self.batches_served += 1;
        }

        Ok(batch)
    }
}
