use std::collections::HashMap;

use crate::reference::{ReferenceIndex, SecondaryIndex};
use crate::types::{ReferenceRecord, SecondaryKey, SecondaryRecord};

/// In-memory [`ReferenceIndex`] built from master data.
///
/// Records are kept in first-seen key order so that surrogate keys derived from the index are
/// stable. Inserting a key twice replaces the earlier record in place.
#[derive(Debug, Clone, Default)]
pub struct MemoryReferenceIndex {
    records: Vec<ReferenceRecord>,
    positions: HashMap<String, usize>,
}

impl MemoryReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `record`, returning the record it replaced, if any.
    pub fn insert(&mut self, record: ReferenceRecord) -> Option<ReferenceRecord> {
        match self.positions.get(record.join_key()) {
            Some(&position) => Some(std::mem::replace(&mut self.records[position], record)),
            None => {
                self.positions
                    .insert(record.product_id.clone(), self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    /// Returns the records in first-seen key order.
    pub fn records(&self) -> &[ReferenceRecord] {
        &self.records
    }
}

impl FromIterator<ReferenceRecord> for MemoryReferenceIndex {
    fn from_iter<I: IntoIterator<Item = ReferenceRecord>>(iter: I) -> Self {
        let mut index = Self::new();
        for record in iter {
            index.insert(record);
        }

        index
    }
}

impl ReferenceIndex for MemoryReferenceIndex {
    fn lookup(&self, key: &str) -> Option<&ReferenceRecord> {
        self.positions
            .get(key)
            .and_then(|&position| self.records.get(position))
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

/// In-memory [`SecondaryIndex`] built from master data.
///
/// Shares the ordering and replacement rules of [`MemoryReferenceIndex`].
#[derive(Debug, Clone, Default)]
pub struct MemorySecondaryIndex {
    records: Vec<SecondaryRecord>,
    positions: HashMap<SecondaryKey, usize>,
}

impl MemorySecondaryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `record`, returning the record it replaced, if any.
    pub fn insert(&mut self, record: SecondaryRecord) -> Option<SecondaryRecord> {
        match self.positions.get(&record.customer_id) {
            Some(&position) => Some(std::mem::replace(&mut self.records[position], record)),
            None => {
                self.positions.insert(record.customer_id, self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    /// Returns the records in first-seen key order.
    pub fn records(&self) -> &[SecondaryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<SecondaryRecord> for MemorySecondaryIndex {
    fn from_iter<I: IntoIterator<Item = SecondaryRecord>>(iter: I) -> Self {
        let mut index = Self::new();
        for record in iter {
            index.insert(record);
        }

        index
    }
}

impl SecondaryIndex for MemorySecondaryIndex {
    fn lookup(&self, key: SecondaryKey) -> Option<&SecondaryRecord> {
        self.positions
            .get(&key)
            .and_then(|&position| self.records.get(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_replaces_record_but_keeps_position() {
        let index: MemoryReferenceIndex = [
            ReferenceRecord::new("P1"),
            ReferenceRecord::new("P2"),
            ReferenceRecord {
                price: Some(4.0),
                ..ReferenceRecord::new("P1")
            },
        ]
        .into_iter()
        .collect();

        assert_eq!(index.len(), 2);
        assert_eq!(index.records()[0].price, Some(4.0));
        assert_eq!(index.lookup("P1").and_then(|r| r.price), Some(4.0));
        assert!(index.lookup("P3").is_none());
    }

    #[test]
    fn secondary_lookup_miss_returns_none() {
        let index: MemorySecondaryIndex = [SecondaryRecord::new(1)].into_iter().collect();

        assert!(index.lookup(1).is_some());
        assert!(index.lookup(2).is_none());
    }
}
