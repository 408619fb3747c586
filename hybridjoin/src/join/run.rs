use std::time::Instant;

use hybridjoin_config::shared::BatchConfig;
use tracing::{info, warn};

use crate::concurrency::shutdown::{ShutdownRx, is_shutdown_requested};
use crate::error::JoinResult;
use crate::join::engine::JoinEngine;
use crate::join::enrich::{EnrichmentStats, PostJoinEnricher};
use crate::join::partition::PartitionLoader;
use crate::join::stats::JoinStats;
use crate::reference::SecondaryIndex;
use crate::source::StreamSource;
use crate::types::EnrichedRecord;

/// Result of a complete join run.
#[derive(Debug, Clone, Default)]
pub struct JoinOutput {
    /// Enriched records in match-emission order.
    pub records: Vec<EnrichedRecord>,
    pub stats: JoinStats,
    pub enrichment: EnrichmentStats,
    /// Records admitted but never matched. They are not part of `records`.
    pub unmatched_residents: usize,
    /// Records still staged when the run ended because admission stalled.
    pub staged_remaining: usize,
    /// Window capacity when the run ended.
    pub window_capacity: usize,
    /// Whether the run stopped early on a shutdown signal.
    pub canceled: bool,
}

impl<P> JoinEngine<P>
where
    P: PartitionLoader,
{
    /// Joins every batch of `source` and enriches the output against `secondary`.
    ///
    /// `batch_config` is validated first. Readiness of the source, the reference store and the
    /// secondary index is checked before the first batch; any failure there aborts the run.
    /// Shutdown is only observed between batches. A canceled run still enriches and returns what
    /// it emitted so far.
    pub async fn run<S, X>(
        mut self,
        source: &mut S,
        secondary: &X,
        batch_config: &BatchConfig,
        shutdown_rx: ShutdownRx,
    ) -> JoinResult<JoinOutput>
    where
        S: StreamSource,
        X: SecondaryIndex,
    {
        batch_config.validate()?;

        source.ensure_ready().await?;
        self.loader().ensure_ready()?;
        secondary.ensure_ready()?;

        info!(
            source = S::name(),
            window_capacity = self.initial_capacity(),
            stream_batch_size = batch_config.stream_batch_size,
            "starting hybrid join"
        );

        let started = Instant::now();
        let mut records = Vec::new();
        let mut processed: u64 = 0;
        let mut next_progress = batch_config.progress_log_interval as u64;
        let mut canceled = false;

        loop {
            if is_shutdown_requested(&shutdown_rx) {
                warn!(processed, "shutdown requested, stopping hybrid join");
                canceled = true;
                break;
            }

            let batch = source.next_batch(batch_config.stream_batch_size).await?;
            if batch.is_empty() {
                break;
            }

            processed += batch.len() as u64;
            self.process_batch(batch, &mut records)?;

            if processed >= next_progress {
                log_progress(processed, records.len(), started);
                while next_progress <= processed {
                    next_progress += batch_config.progress_log_interval as u64;
                }
            }
        }

        log_progress(processed, records.len(), started);

        let enrichment = PostJoinEnricher::new(secondary).enrich(&mut records);

        let output = JoinOutput {
            records,
            stats: self.stats(),
            enrichment,
            unmatched_residents: self.resident_count(),
            staged_remaining: self.staged_count(),
            window_capacity: self.window_capacity(),
            canceled,
        };

        info!(
            emitted = output.records.len(),
            tuples_admitted = output.stats.tuples_admitted,
            partitions_loaded = output.stats.partitions_loaded,
            stalled_rounds = output.stats.stalled_rounds,
            unmatched_residents = output.unmatched_residents,
            staged_remaining = output.staged_remaining,
            canceled,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "hybrid join finished"
        );

        Ok(output)
    }
}

fn log_progress(processed: u64, emitted: usize, started: Instant) {
    let elapsed = started.elapsed().as_secs_f64();
    let rate = if elapsed > 0.0 {
        processed as f64 / elapsed
    } else {
        0.0
    };

    info!(
        processed,
        emitted,
        tuples_per_sec = rate.round() as u64,
        "hybrid join progress"
    );
}
