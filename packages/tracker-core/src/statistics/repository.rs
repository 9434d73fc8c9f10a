use std::sync::Arc;
use std::time::Duration;

use swarm_tracker_primitives::torrent_metrics::TorrentsMetrics;
use tokio::sync::{RwLock, RwLockReadGuard};

use super::metrics::Metrics;

/// A repository for the peer store metrics.
#[derive(Clone)]
pub struct Repository {
    pub stats: Arc<RwLock<Metrics>>,
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stats: Arc::new(RwLock::new(Metrics::default())),
        }
    }

    pub async fn get_stats(&self) -> RwLockReadGuard<'_, Metrics> {
        self.stats.read().await
    }

    /// Publishes a fresh sample of the swarm gauges.
    pub async fn update_torrents_metrics(&self, metrics: &TorrentsMetrics) {
        let mut stats_lock = self.stats.write().await;
        stats_lock.torrents = metrics.torrents;
        stats_lock.seeders = metrics.seeders;
        stats_lock.leechers = metrics.leechers;
        drop(stats_lock);
    }

    /// Records a completed garbage collection sweep.
    pub async fn record_gc_sweep(&self, duration: Duration) {
        let mut stats_lock = self.stats.write().await;
        stats_lock.gc_sweeps += 1;
        stats_lock.last_gc_duration = duration;
        drop(stats_lock);
    }
}
