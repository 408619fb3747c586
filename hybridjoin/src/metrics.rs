//! Metric names emitted during join runs.

/// Label for the reason a fact row was skipped.
pub const REASON_LABEL: &str = "reason";

// Join metrics

/// Counter for stream records admitted into the hash index.
pub const HJ_TUPLES_ADMITTED_TOTAL: &str = "hybridjoin_tuples_admitted_total";

/// Counter for enriched records emitted by probe rounds.
pub const HJ_JOIN_MATCHES_TOTAL: &str = "hybridjoin_join_matches_total";

/// Counter for partition loads against the reference store.
pub const HJ_PARTITION_LOADS_TOTAL: &str = "hybridjoin_partition_loads_total";

/// Gauge for the capacity available to the next admission round.
pub const HJ_WINDOW_CAPACITY: &str = "hybridjoin_window_capacity";

/// Gauge for stream records resident in the hash index.
pub const HJ_RESIDENT_TUPLES: &str = "hybridjoin_resident_tuples";

// Fact loading metrics

/// Counter for fact rows persisted by the fact loader.
pub const HJ_FACT_ROWS_INSERTED_TOTAL: &str = "hybridjoin_fact_rows_inserted_total";

/// Counter for enriched records that could not be turned into fact rows.
pub const HJ_FACT_ROWS_SKIPPED_TOTAL: &str = "hybridjoin_fact_rows_skipped_total";

/// Label for the fact loader a row was written to.
pub const LOADER_LABEL: &str = "loader";
