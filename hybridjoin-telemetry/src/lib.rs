//! Logging and metrics setup shared by HybridJoin binaries and tests.

pub mod metrics;
pub mod tracing;
