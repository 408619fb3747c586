/// Observability counters of one join run.
///
/// Counters only grow and start at zero when the engine is constructed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinStats {
    /// Stream records moved from the staging buffer into the hash index.
    pub tuples_admitted: u64,
    /// Enriched records emitted by probe rounds.
    pub join_matches: u64,
    /// Partition loads performed against the reference store.
    pub partitions_loaded: u64,
    pub admission_rounds: u64,
    pub probe_rounds: u64,
    /// Admission attempts that found no capacity and nothing left to probe.
    pub stalled_rounds: u64,
}
