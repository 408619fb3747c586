//! Fact persistence.
//!
//! [`load_facts`] resolves enriched records into fact rows, skips the ones that cannot be
//! resolved and hands the rest to a [`FactLoader`] in fixed-size batches.

mod base;
pub mod memory;

use std::time::Instant;

use metrics::counter;
use tracing::{debug, info, warn};

pub use base::FactLoader;

use crate::dimensions::DimensionKeys;
use crate::error::{ErrorKind, JoinResult};
use crate::metrics::{
    HJ_FACT_ROWS_INSERTED_TOTAL, HJ_FACT_ROWS_SKIPPED_TOTAL, LOADER_LABEL, REASON_LABEL,
};
use crate::types::EnrichedRecord;

/// Outcome of [`load_facts`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Fact rows persisted.
    pub inserted: u64,
    /// Records skipped because a required value was absent or not a finite number.
    pub skipped_malformed: u64,
    /// Records skipped because a natural key had no surrogate key.
    pub skipped_missing_key: u64,
    /// Number of writes issued to the loader.
    pub batches: u64,
}

impl LoadReport {
    pub fn skipped(&self) -> u64 {
        self.skipped_malformed + self.skipped_missing_key
    }
}

/// Resolves `records` against `keys` and persists the valid fact rows in batches of at most
/// `insert_size` rows.
///
/// Unresolvable records are counted and skipped. A failed write stops loading and is returned;
/// batches written before it stay persisted.
pub async fn load_facts<F>(
    loader: &F,
    keys: &DimensionKeys,
    records: &[EnrichedRecord],
    insert_size: usize,
) -> JoinResult<LoadReport>
where
    F: FactLoader,
{
    let mut report = LoadReport::default();
    let mut facts = Vec::with_capacity(records.len());

    for record in records {
        match keys.resolve(record) {
            Ok(fact) => facts.push(fact),
            Err(err) => match err.kind() {
                ErrorKind::MalformedRecord => report.skipped_malformed += 1,
                ErrorKind::MissingDimensionKey => report.skipped_missing_key += 1,
                _ => return Err(err),
            },
        }
    }

    if report.skipped() > 0 {
        warn!(
            skipped_malformed = report.skipped_malformed,
            skipped_missing_key = report.skipped_missing_key,
            "skipping records that cannot be resolved into fact rows"
        );
        counter!(HJ_FACT_ROWS_SKIPPED_TOTAL, REASON_LABEL => "malformed")
            .increment(report.skipped_malformed);
        counter!(HJ_FACT_ROWS_SKIPPED_TOTAL, REASON_LABEL => "missing_key")
            .increment(report.skipped_missing_key);
    }

    info!(
        loader = F::name(),
        valid = facts.len(),
        skipped = report.skipped(),
        insert_size,
        "loading fact rows"
    );

    let started = Instant::now();
    let total = facts.len();
    let mut remaining = facts.into_iter();

    loop {
        let batch: Vec<_> = remaining.by_ref().take(insert_size.max(1)).collect();
        if batch.is_empty() {
            break;
        }

        let batch_len = batch.len() as u64;
        loader.write_facts(batch).await?;

        report.inserted += batch_len;
        report.batches += 1;
        counter!(HJ_FACT_ROWS_INSERTED_TOTAL, LOADER_LABEL => F::name()).increment(batch_len);

        debug!(inserted = report.inserted, total, "fact batch written");
    }

    let elapsed = started.elapsed().as_secs_f64();
    let rows_per_sec = if elapsed > 0.0 {
        (report.inserted as f64 / elapsed).round() as u64
    } else {
        0
    };

    info!(
        inserted = report.inserted,
        batches = report.batches,
        rows_per_sec,
        "fact rows loaded"
    );

    Ok(report)
}
