use tracing::debug;

use crate::reference::SecondaryIndex;
use crate::types::EnrichedRecord;

/// Counts produced by [`PostJoinEnricher::enrich`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentStats {
    /// Records merged with a secondary record.
    pub enriched: u64,
    /// Records whose secondary key was absent and which kept no secondary attributes.
    pub missed: u64,
}

/// Merges secondary attributes into joined records by direct lookup.
///
/// The secondary dataset is small, so there is no windowing. A miss leaves the record untouched.
#[derive(Debug)]
pub struct PostJoinEnricher<X> {
    secondary: X,
}

impl<X> PostJoinEnricher<X>
where
    X: SecondaryIndex,
{
    pub fn new(secondary: X) -> Self {
        Self { secondary }
    }

    pub fn enrich(&self, records: &mut [EnrichedRecord]) -> EnrichmentStats {
        let mut stats = EnrichmentStats::default();

        for record in records.iter_mut() {
            match self.secondary.lookup(record.secondary_key()) {
                Some(secondary) => {
                    record.merge_secondary(secondary);
                    stats.enriched += 1;
                }
                None => stats.missed += 1,
            }
        }

        debug!(
            enriched = stats.enriched,
            missed = stats.missed,
            "post-join enrichment complete"
        );

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::memory::MemorySecondaryIndex;
    use crate::types::{SecondaryRecord, StreamRecord};

    #[test]
    fn misses_keep_record_without_secondary_attributes() {
        let secondary: MemorySecondaryIndex = [SecondaryRecord {
            gender: Some("M".to_string()),
            age: Some("26-35".to_string()),
            ..SecondaryRecord::new(10)
        }]
        .into_iter()
        .collect();
        let enricher = PostJoinEnricher::new(&secondary);

        let mut records = vec![
            EnrichedRecord::from(StreamRecord::new(1, 10, "P1", 1, "2020-01-01")),
            EnrichedRecord::from(StreamRecord::new(2, 11, "P1", 1, "2020-01-01")),
        ];
        let stats = enricher.enrich(&mut records);

        assert_eq!(stats, EnrichmentStats { enriched: 1, missed: 1 });
        assert_eq!(records[0].gender.as_deref(), Some("M"));
        assert_eq!(records[0].age.as_deref(), Some("26-35"));
        assert_eq!(records[1].gender, None);
        assert_eq!(records[1].customer_id, 11);
    }
}
