use crate::error::JoinResult;
use crate::reference::ReferenceIndex;
use crate::types::ReferenceRecord;

/// Resolves a join key against the reference store, one partition load per call.
///
/// The engine depends only on this trait, so a paged or disk-backed store can replace the
/// in-memory index without changing the join logic.
pub trait PartitionLoader {
    /// Loads the reference records for `join_key`.
    ///
    /// Returns zero or one record for a keyed store. An empty result means "no match" and is not
    /// an error. Every call counts as one partition load, hit or miss.
    fn load(&mut self, join_key: &str) -> JoinResult<Vec<ReferenceRecord>>;

    /// Returns the number of partition loads performed so far.
    fn partitions_loaded(&self) -> u64;

    /// Fails with [`crate::error::ErrorKind::UpstreamUnavailable`] when the backing store is not
    /// ready.
    fn ensure_ready(&self) -> JoinResult<()> {
        Ok(())
    }
}

/// [`PartitionLoader`] over any [`ReferenceIndex`].
#[derive(Debug)]
pub struct IndexPartitionLoader<R> {
    index: R,
    partitions_loaded: u64,
}

impl<R> IndexPartitionLoader<R> {
    pub fn new(index: R) -> Self {
        Self {
            index,
            partitions_loaded: 0,
        }
    }

    pub fn index(&self) -> &R {
        &self.index
    }
}

impl<R: ReferenceIndex> PartitionLoader for IndexPartitionLoader<R> {
    fn load(&mut self, join_key: &str) -> JoinResult<Vec<ReferenceRecord>> {
        self.partitions_loaded += 1;

        Ok(self.index.lookup(join_key).cloned().into_iter().collect())
    }

    fn partitions_loaded(&self) -> u64 {
        self.partitions_loaded
    }

    fn ensure_ready(&self) -> JoinResult<()> {
        self.index.ensure_ready()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::memory::MemoryReferenceIndex;

    #[test]
    fn counts_hits_and_misses() {
        let index: MemoryReferenceIndex = [ReferenceRecord::new("P1")].into_iter().collect();
        let mut loader = IndexPartitionLoader::new(&index);

        assert_eq!(loader.load("P1").unwrap().len(), 1);
        assert!(loader.load("P9").unwrap().is_empty());
        assert_eq!(loader.load("P1").unwrap()[0].product_id, "P1");
        assert_eq!(loader.partitions_loaded(), 3);
    }
}
