//! Concurrency utilities for join runs.
//!
//! A run is single-threaded: admission, probing and capacity updates never overlap. The only
//! coordination needed is cancellation, which the [`shutdown`] module provides as a broadcast
//! signal observed at batch boundaries.

pub mod shutdown;
