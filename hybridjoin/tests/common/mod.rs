#![allow(dead_code)]

use hybridjoin::bail;
use hybridjoin::concurrency::shutdown::ShutdownTx;
use hybridjoin::dimensions::{DateDimension, DimensionKeys};
use hybridjoin::error::{ErrorKind, JoinResult};
use hybridjoin::loader::FactLoader;
use hybridjoin::reference::ReferenceIndex;
use hybridjoin::reference::memory::{MemoryReferenceIndex, MemorySecondaryIndex};
use hybridjoin::source::StreamSource;
use hybridjoin::source::memory::MemoryStreamSource;
use hybridjoin::types::{FactRow, ReferenceRecord, SecondaryRecord, StreamRecord};
use hybridjoin_config::shared::{BatchConfig, DateRangeConfig, JoinConfig, PipelineConfig};

pub fn product(
    product_id: &str,
    price: Option<f64>,
    store_id: i64,
    supplier_id: i64,
) -> ReferenceRecord {
    ReferenceRecord {
        category: Some("Electronics".to_string()),
        price,
        store_id: Some(store_id),
        supplier_id: Some(supplier_id),
        store_name: Some(format!("Store {store_id}")),
        supplier_name: Some(format!("Supplier {supplier_id}")),
        ..ReferenceRecord::new(product_id)
    }
}

/// P3 has no price, so its matches cannot become fact rows.
pub fn products() -> MemoryReferenceIndex {
    [
        product("P1", Some(10.0), 1, 11),
        product("P2", Some(2.5), 1, 12),
        product("P3", None, 2, 12),
    ]
    .into_iter()
    .collect()
}

/// Customer 300 is deliberately absent.
pub fn customers() -> MemorySecondaryIndex {
    [
        SecondaryRecord {
            gender: Some("F".to_string()),
            age: Some("26-35".to_string()),
            occupation: Some(4),
            city_category: Some("A".to_string()),
            stay_in_current_city_years: Some(2),
            marital_status: Some(0),
            ..SecondaryRecord::new(100)
        },
        SecondaryRecord {
            gender: Some("M".to_string()),
            age: Some("36-45".to_string()),
            ..SecondaryRecord::new(200)
        },
    ]
    .into_iter()
    .collect()
}

/// Seven orders covering a clean match, a secondary miss, a malformed reference, an absent join
/// key and a date outside the date dimension.
pub fn transactions() -> Vec<StreamRecord> {
    vec![
        StreamRecord::new(1, 100, "P1", 2, "2019-03-01"),
        StreamRecord::new(2, 200, "P2", 4, "2019-03-02"),
        StreamRecord::new(3, 300, "P1", 1, "2019-03-03"),
        StreamRecord::new(4, 100, "P3", 1, "2019-03-04"),
        StreamRecord::new(5, 100, "P9", 1, "2019-03-05"),
        StreamRecord::new(6, 200, "P1", 3, "2015-01-01"),
        StreamRecord::new(7, 100, "P2", 1, "2030-01-01"),
    ]
}

pub fn dimension_keys(
    products: &MemoryReferenceIndex,
    customers: &MemorySecondaryIndex,
) -> DimensionKeys {
    let dates = DateDimension::from_config(&DateRangeConfig::default()).unwrap();

    DimensionKeys::assign(products.records(), customers.records(), &dates)
}

pub fn join_config(hash_table_size: usize, window_capacity: usize) -> JoinConfig {
    JoinConfig {
        hash_table_size,
        window_capacity,
        ..JoinConfig::default()
    }
}

pub fn batch_config(stream_batch_size: usize, fact_insert_size: usize) -> BatchConfig {
    BatchConfig {
        stream_batch_size,
        fact_insert_size,
        progress_log_interval: 3,
    }
}

pub fn pipeline_config() -> PipelineConfig {
    PipelineConfig {
        join: join_config(8, 3),
        batch: batch_config(2, 2),
        dates: DateRangeConfig::default(),
    }
}

/// Source that is never ready.
#[derive(Debug, Default)]
pub struct UnavailableSource;

impl StreamSource for UnavailableSource {
    fn name() -> &'static str {
        "unavailable"
    }

    async fn ensure_ready(&self) -> JoinResult<()> {
        bail!(
            ErrorKind::UpstreamUnavailable,
            "Stream source is not ready",
            "transactions file is missing"
        );
    }

    async fn next_batch(&mut self, _max_size: usize) -> JoinResult<Vec<StreamRecord>> {
        bail!(ErrorKind::InvalidState, "Unavailable source was read");
    }
}

/// Reference index whose backing store is not materialized yet.
#[derive(Debug, Default)]
pub struct UnavailableReference;

impl ReferenceIndex for UnavailableReference {
    fn lookup(&self, _key: &str) -> Option<&ReferenceRecord> {
        None
    }

    fn len(&self) -> usize {
        0
    }

    fn ensure_ready(&self) -> JoinResult<()> {
        bail!(
            ErrorKind::UpstreamUnavailable,
            "Reference index is not ready"
        );
    }
}

/// Source that requests shutdown once it has served `after_batches` batches.
#[derive(Debug)]
pub struct CancelingSource {
    pub inner: MemoryStreamSource,
    pub shutdown_tx: ShutdownTx,
    pub after_batches: u64,
}

impl StreamSource for CancelingSource {
    fn name() -> &'static str {
        "canceling"
    }

    async fn next_batch(&mut self, max_size: usize) -> JoinResult<Vec<StreamRecord>> {
        let batch = self.inner.next_batch(max_size).await?;
        if self.inner.batches_served() >= self.after_batches {
            self.shutdown_tx.shutdown();
        }

        Ok(batch)
    }
}

/// Fact loader that rejects every write.
#[derive(Debug, Default, Clone)]
pub struct FailingFactLoader;

impl FactLoader for FailingFactLoader {
    fn name() -> &'static str {
        "failing"
    }

    async fn write_facts(&self, _facts: Vec<FactRow>) -> JoinResult<()> {
        bail!(
            ErrorKind::DestinationError,
            "Fact batch was rejected",
            "connection reset"
        );
    }
}
