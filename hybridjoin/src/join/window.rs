use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};

use crate::types::StreamRecord;

/// Identifier of a hash slot.
pub type BucketId = u64;

/// Stream records sharing one hash slot, in admission order.
///
/// Different join keys may share a bucket, so membership never implies a key match.
#[derive(Debug, Default, Clone)]
pub struct Bucket {
    records: Vec<StreamRecord>,
}

impl Bucket {
    pub fn records(&self) -> &[StreamRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Stream records currently resident in memory, bucketed by a hash of their join key.
///
/// Records only leave the index through [`WindowedHashIndex::remove`], which the engine calls on a
/// successful match. There is no eviction policy: records that never match stay resident.
#[derive(Debug)]
pub struct WindowedHashIndex {
    table_size: u64,
    buckets: HashMap<BucketId, Bucket>,
    resident: usize,
}

impl WindowedHashIndex {
    /// Creates an empty index with `table_size` hash slots.
    ///
    /// A size of zero is treated as a single slot.
    pub fn new(table_size: usize) -> Self {
        Self {
            table_size: (table_size as u64).max(1),
            buckets: HashMap::new(),
            resident: 0,
        }
    }

    /// Returns the bucket a join key hashes to.
    pub fn bucket_for(&self, join_key: &str) -> BucketId {
        let mut hasher = DefaultHasher::new();
        join_key.hash(&mut hasher);

        hasher.finish() % self.table_size
    }

    /// Appends `record` to the bucket of its join key and returns that bucket.
    pub fn admit(&mut self, record: StreamRecord) -> BucketId {
        let bucket_id = self.bucket_for(record.join_key());
        self.buckets
            .entry(bucket_id)
            .or_default()
            .records
            .push(record);
        self.resident += 1;

        bucket_id
    }

    /// Removes the record at `position` in `bucket_id`, deleting the bucket once it is empty.
    pub fn remove(&mut self, bucket_id: BucketId, position: usize) -> Option<StreamRecord> {
        let bucket = self.buckets.get_mut(&bucket_id)?;
        if position >= bucket.records.len() {
            return None;
        }

        let record = bucket.records.remove(position);
        if bucket.records.is_empty() {
            self.buckets.remove(&bucket_id);
        }
        self.resident -= 1;

        Some(record)
    }

    /// Removes every record of `bucket_id` whose join key equals `join_key`, in bucket order.
    ///
    /// Records of other keys sharing the bucket are left in place.
    pub fn take_matching(&mut self, bucket_id: BucketId, join_key: &str) -> Vec<StreamRecord> {
        let mut matched = Vec::new();
        let mut position = 0;

        while let Some(bucket) = self.buckets.get(&bucket_id) {
            let Some(record) = bucket.records.get(position) else {
                break;
            };

            if record.join_key() != join_key {
                position += 1;
                continue;
            }

            if let Some(record) = self.remove(bucket_id, position) {
                matched.push(record);
            }
        }

        matched
    }

    pub fn bucket(&self, bucket_id: BucketId) -> Option<&Bucket> {
        self.buckets.get(&bucket_id)
    }

    /// Returns the number of non-empty buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the number of resident records across all buckets.
    pub fn resident_count(&self) -> usize {
        self.resident
    }

    pub fn is_empty(&self) -> bool {
        self.resident == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(order_id: i64, product_id: &str) -> StreamRecord {
        StreamRecord::new(order_id, 1, product_id, 1, "2020-01-01")
    }

    #[test]
    fn same_key_always_lands_in_same_bucket() {
        let mut index = WindowedHashIndex::new(16);

        let first = index.admit(record(1, "P1"));
        let second = index.admit(record(2, "P1"));

        assert_eq!(first, second);
        assert_eq!(first, index.bucket_for("P1"));
        assert!(first < 16);
        assert_eq!(index.bucket(first).map(Bucket::len), Some(2));
        assert_eq!(index.resident_count(), 2);
    }

    #[test]
    fn removing_last_record_deletes_bucket() {
        let mut index = WindowedHashIndex::new(16);
        let bucket_id = index.admit(record(1, "P1"));

        assert!(index.remove(bucket_id, 1).is_none());
        assert_eq!(index.remove(bucket_id, 0).map(|r| r.order_id), Some(1));
        assert!(index.bucket(bucket_id).is_none());
        assert_eq!(index.bucket_count(), 0);
        assert!(index.is_empty());
    }

    #[test]
    fn take_matching_skips_colliding_keys() {
        // A single slot forces every key into the same bucket.
        let mut index = WindowedHashIndex::new(1);
        index.admit(record(1, "P1"));
        index.admit(record(2, "P2"));
        index.admit(record(3, "P1"));
        index.admit(record(4, "P2"));

        let matched = index.take_matching(0, "P1");

        assert_eq!(
            matched.iter().map(|r| r.order_id).collect::<Vec<_>>(),
            vec![1, 3]
        );
        let remaining = index.bucket(0).unwrap().records();
        assert_eq!(
            remaining.iter().map(|r| r.order_id).collect::<Vec<_>>(),
            vec![2, 4]
        );
        assert_eq!(index.resident_count(), 2);
    }

    #[test]
    fn take_matching_on_missing_bucket_is_empty() {
        let mut index = WindowedHashIndex::new(4);

        assert!(index.take_matching(3, "P1").is_empty());
    }
}
