use std::time::Duration;

/// Metrics collected by the peer store.
///
/// The swarm gauges are sampled periodically by the statistics task; the
/// garbage collection fields are updated after every sweep.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Metrics {
    /// Total number of swarms currently tracked.
    pub torrents: u64,

    /// Total number of seeders across all swarms.
    pub seeders: u64,

    /// Total number of leechers across all swarms.
    pub leechers: u64,

    /// Number of garbage collection sweeps completed since startup.
    pub gc_sweeps: u64,

    /// Wall-clock duration of the most recent garbage collection sweep.
    pub last_gc_duration: Duration,
}
