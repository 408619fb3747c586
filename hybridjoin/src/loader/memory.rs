use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::error::JoinResult;
use crate::loader::FactLoader;
use crate::types::FactRow;

#[derive(Debug, Default)]
struct Inner {
    batches: Vec<Vec<FactRow>>,
    shut_down: bool,
}

/// In-memory [`FactLoader`] that keeps every written batch.
///
/// Clones share the same storage, so a clone can be handed to a pipeline and the original
/// inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryFactLoader {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryFactLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the written batches in write order.
    pub async fn batches(&self) -> Vec<Vec<FactRow>> {
        let inner = self.inner.lock().await;
        inner.batches.clone()
    }

    /// Returns every written fact row in write order.
    pub async fn facts(&self) -> Vec<FactRow> {
        let inner = self.inner.lock().await;
        inner.batches.iter().flatten().cloned().collect()
    }

    pub async fn is_shut_down(&self) -> bool {
        self.inner.lock().await.shut_down
    }
}

impl FactLoader for MemoryFactLoader {
    fn name() -> &'static str {
        "memory"
    }

    async fn shutdown(&self) -> JoinResult<()> {
        let mut inner = self.inner.lock().await;
        inner.shut_down = true;

        Ok(())
    }

    async fn write_facts(&self, facts: Vec<FactRow>) -> JoinResult<()> {
        info!(rows = facts.len(), "writing fact batch to memory");

        let mut inner = self.inner.lock().await;
        inner.batches.push(facts);

        Ok(())
    }
}
