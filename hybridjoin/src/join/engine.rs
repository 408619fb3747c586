use std::collections::VecDeque;

use hybridjoin_config::shared::JoinConfig;
use metrics::{counter, gauge};
use tracing::{debug, trace, warn};

use crate::error::JoinResult;
use crate::join::partition::PartitionLoader;
use crate::join::queue::ProbeQueue;
use crate::join::stats::JoinStats;
use crate::join::window::WindowedHashIndex;
use crate::metrics::{
    HJ_JOIN_MATCHES_TOTAL, HJ_PARTITION_LOADS_TOTAL, HJ_RESIDENT_TUPLES,
    HJ_TUPLES_ADMITTED_TOTAL, HJ_WINDOW_CAPACITY,
};
use crate::types::{EnrichedRecord, StreamRecord};

/// Phase of the engine within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Waiting for a batch.
    Idle,
    /// Moving staged records into the hash index.
    Admitting,
    /// Resolving queued keys and emitting matches.
    Probing,
    /// Queue drained, deciding between another admission round and finishing the batch.
    Draining,
    /// Batch complete.
    Done,
}

/// What one call to [`JoinEngine::process_batch`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Records admitted into the hash index during the batch.
    pub admitted: usize,
    /// Enriched records emitted during the batch.
    pub matched: usize,
    /// Whether admission stalled with records still staged.
    pub stalled: bool,
}

/// Bounded-admission hash join between a stream and a keyed reference store.
///
/// Each admission round moves at most `window capacity` staged records into the hash index and
/// then spends the whole capacity. Each probe round drains the probe queue, loading one partition
/// per entry; every match emits an enriched record, removes the resident from its bucket and
/// gives one unit of capacity back. The window therefore grows and shrinks with the match rate.
///
/// Records that never match stay resident. When no capacity is left and nothing is queued, the
/// engine cannot admit anything else: staged records wait, and the batch ends with
/// [`BatchOutcome::stalled`] set.
#[derive(Debug)]
pub struct JoinEngine<P> {
    index: WindowedHashIndex,
    queue: ProbeQueue,
    staging: VecDeque<StreamRecord>,
    loader: P,
    initial_capacity: usize,
    capacity: usize,
    state: EngineState,
    stats: JoinStats,
}

impl<P> JoinEngine<P>
where
    P: PartitionLoader,
{
    /// Creates an engine for a single run.
    ///
    /// Fails with [`crate::error::ErrorKind::ConfigError`] when any size in `config` is zero.
    pub fn new(config: &JoinConfig, loader: P) -> JoinResult<Self> {
        config.validate()?;

        Ok(Self {
            index: WindowedHashIndex::new(config.hash_table_size),
            queue: ProbeQueue::new(),
            staging: VecDeque::new(),
            loader,
            initial_capacity: config.window_capacity,
            capacity: config.window_capacity,
            state: EngineState::Idle,
            stats: JoinStats::default(),
        })
    }

    /// Appends a batch to the staging buffer.
    pub fn stage(&mut self, batch: Vec<StreamRecord>) {
        self.staging.extend(batch);
        self.state = EngineState::Idle;
    }

    /// Runs one admission round and returns the number of admitted records.
    ///
    /// Admits `min(capacity, staged)` records in staging order, enqueuing one probe entry each,
    /// then sets the capacity to zero.
    pub fn admit(&mut self) -> usize {
        self.state = EngineState::Admitting;

        let admitted = self.capacity.min(self.staging.len());
        for record in self.staging.drain(..admitted) {
            let join_key = record.join_key().to_owned();
            let bucket_id = self.index.admit(record);
            self.queue.enqueue(join_key, bucket_id);
        }

        self.capacity = 0;
        self.stats.tuples_admitted += admitted as u64;
        self.stats.admission_rounds += 1;

        counter!(HJ_TUPLES_ADMITTED_TOTAL).increment(admitted as u64);
        gauge!(HJ_WINDOW_CAPACITY).set(0.0);
        gauge!(HJ_RESIDENT_TUPLES).set(self.index.resident_count() as f64);

        debug!(
            admitted,
            staged = self.staging.len(),
            resident = self.index.resident_count(),
            "admission round complete"
        );

        admitted
    }

    /// Probes the oldest queued entry.
    ///
    /// Returns the number of enriched records emitted, or [`None`] when the queue is empty. A key
    /// without reference records only consumes its queue entry.
    pub fn probe_next(&mut self, output: &mut Vec<EnrichedRecord>) -> JoinResult<Option<usize>> {
        let Some(entry) = self.queue.dequeue() else {
            return Ok(None);
        };

        let partition = self.loader.load(&entry.join_key)?;
        self.stats.partitions_loaded += 1;
        counter!(HJ_PARTITION_LOADS_TOTAL).increment(1);

        if partition.is_empty() {
            trace!(join_key = %entry.join_key, "no reference records for key");
            return Ok(Some(0));
        }

        // Bucket membership alone is not a match, `take_matching` re-checks the key.
        let residents = self.index.take_matching(entry.bucket_id, &entry.join_key);

        let mut matches = 0;
        for resident in &residents {
            for reference in &partition {
                output.push(EnrichedRecord::joined(resident, reference));
                matches += 1;
            }
        }

        self.capacity += matches;
        self.stats.join_matches += matches as u64;
        counter!(HJ_JOIN_MATCHES_TOTAL).increment(matches as u64);

        trace!(
            join_key = %entry.join_key,
            bucket_id = entry.bucket_id,
            matches,
            "probed key"
        );

        Ok(Some(matches))
    }

    /// Runs one probe round, draining the queue, and returns the number of emitted records.
    pub fn probe_all(&mut self, output: &mut Vec<EnrichedRecord>) -> JoinResult<usize> {
        self.state = EngineState::Probing;

        let mut matched = 0;
        while let Some(matches) = self.probe_next(output)? {
            matched += matches;
        }

        self.stats.probe_rounds += 1;
        self.state = EngineState::Draining;

        gauge!(HJ_WINDOW_CAPACITY).set(self.capacity as f64);
        gauge!(HJ_RESIDENT_TUPLES).set(self.index.resident_count() as f64);

        debug!(
            matched,
            capacity = self.capacity,
            resident = self.index.resident_count(),
            "probe round complete"
        );

        Ok(matched)
    }

    /// Stages `batch` and alternates admission and probe rounds until the staging buffer is empty
    /// or admission stalls. Enriched records are appended to `output` in emission order.
    pub fn process_batch(
        &mut self,
        batch: Vec<StreamRecord>,
        output: &mut Vec<EnrichedRecord>,
    ) -> JoinResult<BatchOutcome> {
        self.stage(batch);

        let mut outcome = BatchOutcome::default();
        loop {
            if !self.staging.is_empty() {
                // The queue is always drained here, so no capacity means no progress is possible.
                if self.capacity == 0 {
                    self.stats.stalled_rounds += 1;
                    outcome.stalled = true;

                    warn!(
                        staged = self.staging.len(),
                        resident = self.index.resident_count(),
                        "admission stalled: window capacity exhausted by unmatched residents"
                    );

                    break;
                }

                outcome.admitted += self.admit();
            }

            outcome.matched += self.probe_all(output)?;

            if self.staging.is_empty() {
                break;
            }
        }

        self.state = EngineState::Done;

        Ok(outcome)
    }

    /// Returns the capacity available to the next admission round.
    pub fn window_capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the configured initial capacity.
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Returns the phase the engine is in.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Returns a snapshot of the counters accumulated so far.
    pub fn stats(&self) -> JoinStats {
        self.stats
    }

    /// Returns the hash index holding resident records.
    pub fn index(&self) -> &WindowedHashIndex {
        &self.index
    }

    /// Returns the partition loader.
    pub fn loader(&self) -> &P {
        &self.loader
    }

    /// Returns the number of records admitted but never matched.
    pub fn resident_count(&self) -> usize {
        self.index.resident_count()
    }

    /// Returns the number of records waiting in the staging buffer.
    pub fn staged_count(&self) -> usize {
        self.staging.len()
    }

    /// Returns the number of probe entries not yet resolved.
    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::join::partition::IndexPartitionLoader;
    use crate::reference::memory::MemoryReferenceIndex;
    use crate::bail;
    use crate::error::ErrorKind;
    use crate::types::ReferenceRecord;

    /// Loader whose backing store fails on every read.
    #[derive(Debug, Default)]
    struct BrokenPartitionLoader {
        attempts: u64,
    }

    impl PartitionLoader for BrokenPartitionLoader {
        fn load(&mut self, join_key: &str) -> JoinResult<Vec<ReferenceRecord>> {
            self.attempts += 1;
            bail!(
                ErrorKind::ReferenceLoadFailed,
                "Reference partition could not be read",
                join_key
            );
        }

        fn partitions_loaded(&self) -> u64 {
            self.attempts
        }
    }

    fn config(hash_table_size: usize, window_capacity: usize) -> JoinConfig {
        JoinConfig {
            hash_table_size,
            window_capacity,
            ..JoinConfig::default()
        }
    }

    fn reference(keys: &[&str]) -> MemoryReferenceIndex {
        keys.iter()
            .map(|key| ReferenceRecord {
                price: Some(1.5),
                ..ReferenceRecord::new(*key)
            })
            .collect()
    }

    fn stream(keys: &[&str]) -> Vec<StreamRecord> {
        keys.iter()
            .enumerate()
            .map(|(i, key)| StreamRecord::new(i as i64 + 1, 100, *key, 1, "2020-01-01"))
            .collect()
    }

    fn order_ids(records: &[EnrichedRecord]) -> Vec<i64> {
        records.iter().map(|r| r.order_id).collect()
    }

    #[test]
    fn scenario_a_second_round_admits_remaining_record() {
        let index = reference(&["P1", "P2"]);
        let mut engine =
            JoinEngine::new(&config(64, 2), IndexPartitionLoader::new(&index)).unwrap();
        let mut output = Vec::new();

        let outcome = engine
            .process_batch(stream(&["P1", "P2", "P3"]), &mut output)
            .unwrap();

        assert_eq!(
            output.iter().map(|r| r.product_id.as_str()).collect::<Vec<_>>(),
            vec!["P1", "P2"]
        );
        assert_eq!(output[0].unit_price, Some(1.5));
        assert_eq!(outcome.admitted, 3);
        assert_eq!(outcome.matched, 2);
        assert!(!outcome.stalled);
        assert_eq!(engine.resident_count(), 1);
        assert_eq!(engine.staged_count(), 0);
        // The P3 round spent the capacity returned by the first round and matched nothing.
        assert_eq!(engine.window_capacity(), 0);
        assert_eq!(engine.stats().admission_rounds, 2);
        assert_eq!(engine.stats().partitions_loaded, 3);
        assert_eq!(engine.state(), EngineState::Done);
    }

    #[test]
    fn scenario_b_colliding_absent_key_stays_resident() {
        let index = reference(&["P1"]);
        let mut engine =
            JoinEngine::new(&config(1, 10), IndexPartitionLoader::new(&index)).unwrap();
        let mut output = Vec::new();

        engine
            .process_batch(stream(&["P1", "P9"]), &mut output)
            .unwrap();

        assert_eq!(order_ids(&output), vec![1]);
        let bucket = engine.index().bucket(0).unwrap();
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket.records()[0].product_id, "P9");
    }

    #[test]
    fn scenario_c_empty_reference_stalls_admission() {
        let index = MemoryReferenceIndex::new();
        let mut engine =
            JoinEngine::new(&config(64, 2), IndexPartitionLoader::new(&index)).unwrap();
        let mut output = Vec::new();

        let first = engine
            .process_batch(stream(&["P1", "P2", "P3"]), &mut output)
            .unwrap();
        assert_eq!(first.admitted, 2);
        assert!(first.stalled);
        assert_eq!(engine.window_capacity(), 0);

        // Later batches make no progress at all.
        let second = engine
            .process_batch(stream(&["P4", "P5"]), &mut output)
            .unwrap();
        assert_eq!(second.admitted, 0);
        assert_eq!(second.matched, 0);
        assert!(second.stalled);

        assert!(output.is_empty());
        assert_eq!(engine.window_capacity(), 0);
        assert_eq!(engine.resident_count(), 2);
        assert_eq!(engine.staged_count(), 3);
        assert_eq!(engine.stats().tuples_admitted, 2);
        assert_eq!(engine.stats().stalled_rounds, 2);
        assert_eq!(engine.stats().partitions_loaded, 2);
    }

    #[test]
    fn capacity_after_probe_round_equals_matches_of_that_round() {
        let index = reference(&["P1", "P3"]);
        let mut engine =
            JoinEngine::new(&config(64, 4), IndexPartitionLoader::new(&index)).unwrap();
        let mut output = Vec::new();

        engine.stage(stream(&["P1", "P2", "P3", "P4"]));
        assert_eq!(engine.admit(), 4);
        assert_eq!(engine.window_capacity(), 0);

        let matched = engine.probe_all(&mut output).unwrap();
        assert_eq!(matched, 2);
        assert_eq!(engine.window_capacity(), matched);

        // Admissions minus evictions equals residents.
        let stats = engine.stats();
        assert_eq!(
            stats.tuples_admitted - stats.join_matches,
            engine.resident_count() as u64
        );
    }

    #[test]
    fn repeated_key_matches_every_resident_and_deletes_bucket() {
        let index = reference(&["P1"]);
        let mut engine =
            JoinEngine::new(&config(64, 10), IndexPartitionLoader::new(&index)).unwrap();
        let mut output = Vec::new();

        engine.stage(stream(&["P1", "P1", "P1"]));
        engine.admit();
        let bucket_id = engine.index().bucket_for("P1");
        assert_eq!(engine.index().bucket(bucket_id).map(|b| b.len()), Some(3));

        // The first entry matches all three residents; the two later entries find nothing.
        assert_eq!(engine.probe_next(&mut output).unwrap(), Some(3));
        assert_eq!(engine.probe_next(&mut output).unwrap(), Some(0));
        assert_eq!(engine.probe_next(&mut output).unwrap(), Some(0));
        assert_eq!(engine.probe_next(&mut output).unwrap(), None);

        assert_eq!(order_ids(&output), vec![1, 2, 3]);
        assert!(engine.index().bucket(bucket_id).is_none());
        assert_eq!(engine.window_capacity(), 3);
        assert_eq!(engine.loader().partitions_loaded(), 3);
    }

    #[test]
    fn absent_key_only_consumes_queue_entry() {
        let index = reference(&["P1"]);
        let mut engine =
            JoinEngine::new(&config(64, 1), IndexPartitionLoader::new(&index)).unwrap();
        let mut output = Vec::new();

        engine.stage(stream(&["P7"]));
        engine.admit();
        let resident_before = engine.resident_count();
        let capacity_before = engine.window_capacity();
        let queued_before = engine.queued_count();

        assert_eq!(engine.probe_next(&mut output).unwrap(), Some(0));

        assert_eq!(engine.resident_count(), resident_before);
        assert_eq!(engine.window_capacity(), capacity_before);
        assert_eq!(engine.queued_count(), queued_before - 1);
        assert!(output.is_empty());
    }

    #[test]
    fn output_follows_admission_rounds_then_queue_order() {
        let index = reference(&["A", "B", "C", "D", "E"]);
        let mut engine =
            JoinEngine::new(&config(3, 2), IndexPartitionLoader::new(&index)).unwrap();
        let mut output = Vec::new();

        engine
            .process_batch(stream(&["B", "A", "D", "C", "E"]), &mut output)
            .unwrap();

        assert_eq!(
            output.iter().map(|r| r.product_id.as_str()).collect::<Vec<_>>(),
            vec!["B", "A", "D", "C", "E"]
        );
        assert_eq!(engine.stats().admission_rounds, 3);
    }

    #[test]
    fn unmatched_resident_blocks_later_staged_records() {
        let index = reference(&["P1"]);
        let mut engine =
            JoinEngine::new(&config(64, 1), IndexPartitionLoader::new(&index)).unwrap();
        let mut output = Vec::new();

        // P9 never matches, so the window closes with P1 still staged.
        let first = engine
            .process_batch(stream(&["P9", "P1"]), &mut output)
            .unwrap();
        assert!(first.stalled);
        assert_eq!(engine.staged_count(), 1);
        assert!(output.is_empty());
        assert_eq!(engine.state(), EngineState::Done);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let index = reference(&["P1"]);
        let mut engine =
            JoinEngine::new(&config(64, 2), IndexPartitionLoader::new(&index)).unwrap();
        let mut output = Vec::new();

        let outcome = engine.process_batch(Vec::new(), &mut output).unwrap();

        assert_eq!(outcome, BatchOutcome::default());
        assert_eq!(engine.window_capacity(), 2);
        assert_eq!(engine.initial_capacity(), 2);
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let index = reference(&["P1"]);

        for config in [config(64, 0), config(0, 2)] {
            let err = JoinEngine::new(&config, IndexPartitionLoader::new(&index)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ConfigError);
        }
    }

    #[test]
    fn failed_partition_load_aborts_the_batch() {
        let mut engine = JoinEngine::new(&config(64, 2), BrokenPartitionLoader::default()).unwrap();
        let mut output = Vec::new();

        let err = engine
            .process_batch(stream(&["P1", "P2"]), &mut output)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ReferenceLoadFailed);
        assert_eq!(err.detail(), Some("P1"));
        assert!(output.is_empty());
        // The failing entry is consumed; the second one is still queued.
        assert_eq!(engine.queued_count(), 1);
        assert_eq!(engine.stats().partitions_loaded, 0);
        assert_eq!(engine.loader().partitions_loaded(), 1);
    }
}
