use std::future::Future;

use crate::error::JoinResult;
use crate::types::StreamRecord;

/// Produces the ordered sequence of stream records to be enriched.
///
/// Sources are finite and read once. [`StreamSource::next_batch`] returns an empty batch once the
/// source is exhausted and on every call after that.
pub trait StreamSource {
    /// Returns the name of the source.
    fn name() -> &'static str;

    /// Fails with [`crate::error::ErrorKind::UpstreamUnavailable`] when the source cannot be
    /// read. Checked once before the first batch is requested.
    fn ensure_ready(&self) -> impl Future<Output = JoinResult<()>> + Send {
        async { Ok(()) }
    }

    /// Returns the next batch of at most `max_size` records, in stream order.
    fn next_batch(
        &mut self,
        max_size: usize,
    ) -> impl Future<Output = JoinResult<Vec<StreamRecord>>> + Send;
}
