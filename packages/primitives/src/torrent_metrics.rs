//! Aggregate gauges over every swarm in the peer store.
use std::ops::AddAssign;

/// Aggregate counters summed across all storage shards.
///
/// Each shard is self-consistent, but the global sums are collected under
/// sequential per-shard locks, so they may reflect a combination of moments
/// that never existed instantaneously. That is acceptable for reporting.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TorrentsMetrics {
    /// Total number of swarms currently tracked.
    pub torrents: u64,

    /// Total number of seeders across all swarms.
    pub seeders: u64,

    /// Total number of leechers across all swarms.
    pub leechers: u64,
}

impl AddAssign for TorrentsMetrics {
    fn add_assign(&mut self, rhs: Self) {
        self.torrents += rhs.torrents;
        self.seeders += rhs.seeders;
        self.leechers += rhs.leechers;
    }
}
