use std::future::Future;

use crate::error::JoinResult;
use crate::types::FactRow;

/// Persists resolved fact rows into an analytical store.
///
/// Each call to [`FactLoader::write_facts`] is one batch. Implementations decide how a batch is
/// committed; a failed batch is reported as an error and not retried by the caller.
pub trait FactLoader {
    /// Returns the name of the loader.
    fn name() -> &'static str;

    /// Flushes and releases resources once loading is over. The default implementation is a
    /// no-op.
    fn shutdown(&self) -> impl Future<Output = JoinResult<()>> + Send {
        async { Ok(()) }
    }

    /// Writes one batch of fact rows.
    fn write_facts(&self, facts: Vec<FactRow>) -> impl Future<Output = JoinResult<()>> + Send;
}
