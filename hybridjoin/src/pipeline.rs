use std::sync::Arc;

use hybridjoin_config::shared::PipelineConfig;
use tracing::info;

use crate::concurrency::shutdown::{ShutdownTx, create_shutdown_channel};
use crate::dimensions::DimensionKeys;
use crate::error::JoinResult;
use crate::join::{EnrichmentStats, IndexPartitionLoader, JoinEngine, JoinStats};
use crate::loader::{FactLoader, LoadReport, load_facts};
use crate::reference::{ReferenceIndex, SecondaryIndex};
use crate::source::StreamSource;

/// Summary of a pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub join: JoinStats,
    pub enrichment: EnrichmentStats,
    pub load: LoadReport,
    /// Enriched records produced by the join.
    pub emitted: usize,
    pub unmatched_residents: usize,
    pub staged_remaining: usize,
    pub canceled: bool,
}

/// Joins a stream against its reference data, enriches it and loads the result as fact rows.
///
/// The reference index, secondary index and dimension keys must be materialized before the
/// pipeline is built; the pipeline never mutates them.
#[derive(Debug)]
pub struct Pipeline<R, X, F> {
    config: Arc<PipelineConfig>,
    reference: R,
    secondary: X,
    keys: DimensionKeys,
    fact_loader: F,
    shutdown_tx: ShutdownTx,
}

impl<R, X, F> Pipeline<R, X, F>
where
    R: ReferenceIndex,
    X: SecondaryIndex,
    F: FactLoader,
{
    /// Validates `config` and builds a pipeline.
    pub fn new(
        config: PipelineConfig,
        reference: R,
        secondary: X,
        keys: DimensionKeys,
        fact_loader: F,
    ) -> JoinResult<Self> {
        config.validate()?;

        let (shutdown_tx, _) = create_shutdown_channel();

        Ok(Self {
            config: Arc::new(config),
            reference,
            secondary,
            keys,
            fact_loader,
            shutdown_tx,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Returns a handle that cancels the run at its next batch boundary.
    pub fn shutdown_tx(&self) -> ShutdownTx {
        self.shutdown_tx.clone()
    }

    /// Runs the join over `source`, then persists the enriched records and shuts the fact loader
    /// down.
    ///
    /// A canceled run still loads whatever the join emitted before it stopped.
    pub async fn run<S>(self, source: &mut S) -> JoinResult<PipelineReport>
    where
        S: StreamSource,
    {
        info!(
            reference_keys = self.reference.len(),
            hash_table_size = self.config.join.hash_table_size,
            window_capacity = self.config.join.window_capacity,
            partition_size = self.config.join.partition_size,
            "starting pipeline"
        );

        let engine = JoinEngine::new(
            &self.config.join,
            IndexPartitionLoader::new(&self.reference),
        )?;
        let output = engine
            .run(
                source,
                &self.secondary,
                &self.config.batch,
                self.shutdown_tx.subscribe(),
            )
            .await?;

        let load = load_facts(
            &self.fact_loader,
            &self.keys,
            &output.records,
            self.config.batch.fact_insert_size,
        )
        .await?;

        self.fact_loader.shutdown().await?;

        let report = PipelineReport {
            join: output.stats,
            enrichment: output.enrichment,
            load,
            emitted: output.records.len(),
            unmatched_residents: output.unmatched_residents,
            staged_remaining: output.staged_remaining,
            canceled: output.canceled,
        };

        info!(
            emitted = report.emitted,
            inserted = report.load.inserted,
            skipped = report.load.skipped(),
            canceled = report.canceled,
            "pipeline finished"
        );

        Ok(report)
    }
}
