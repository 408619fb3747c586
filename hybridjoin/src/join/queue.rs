use std::collections::VecDeque;

use crate::join::window::BucketId;
use crate::types::JoinKey;

/// A join key waiting for its partition load, with the bucket its stream record was admitted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeEntry {
    pub join_key: JoinKey,
    pub bucket_id: BucketId,
}

/// FIFO of probe entries, one per admitted stream record, in admission order.
///
/// The order is the probe order and therefore the order in which partitions are loaded.
#[derive(Debug, Default)]
pub struct ProbeQueue {
    entries: VecDeque<ProbeEntry>,
}

impl ProbeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, join_key: impl Into<JoinKey>, bucket_id: BucketId) {
        self.entries.push_back(ProbeEntry {
            join_key: join_key.into(),
            bucket_id,
        });
    }

    /// Pops the oldest entry, or returns [`None`] when the queue is empty.
    pub fn dequeue(&mut self) -> Option<ProbeEntry> {
        self.entries.pop_front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
