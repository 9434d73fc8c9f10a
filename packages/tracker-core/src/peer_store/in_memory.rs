//! The in-memory peer store.
use std::collections::HashMap;
use std::panic::Location;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use swarm_tracker_clock::clock::Time;
use swarm_tracker_configuration::PeerStoreConfig;
use swarm_tracker_primitives::info_hash::InfoHash;
use swarm_tracker_primitives::peer::{Peer, PeerId, PeerKey};
use swarm_tracker_primitives::swarm_metadata::SwarmMetadata;
use swarm_tracker_primitives::torrent_metrics::TorrentsMetrics;
use swarm_tracker_primitives::DurationSinceUnixEpoch;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::Error;
use crate::statistics;
use crate::CurrentClock;

/// One stored peer: the ID it last announced with and when it was last seen.
///
/// The ID lives in the record rather than in the map key, so a given
/// endpoint appears at most once per swarm while announce replies can still
/// carry full peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PeerRecord {
    peer_id: PeerId,
    updated: DurationSinceUnixEpoch,
}

impl PeerRecord {
    fn to_peer(self, key: &PeerKey) -> Peer {
        Peer::new(self.peer_id, key.to_socket_addr())
    }
}

/// All peers currently associated with one torrent.
///
/// A peer is in exactly one of the two sides. Empty swarms are never kept:
/// the store removes a swarm as soon as both sides drain.
#[derive(Debug, Default)]
struct Swarm {
    seeders: HashMap<PeerKey, PeerRecord>,
    leechers: HashMap<PeerKey, PeerRecord>,
}

impl Swarm {
    fn is_empty(&self) -> bool {
        self.seeders.is_empty() && self.leechers.is_empty()
    }
}

/// One locked partition of the swarm map.
///
/// The counters cache the sums of the swarm sides across the shard; they are
/// maintained under the same exclusive lock as the swarms themselves, so at
/// any quiescent point `num_seeders` equals the sum of `seeders.len()` over
/// the shard, and likewise for leechers.
#[derive(Debug, Default)]
struct Shard {
    swarms: HashMap<InfoHash, Swarm>,
    num_seeders: u64,
    num_leechers: u64,
}

/// The in-memory peer store.
///
/// Peer data is volatile: it lives for as long as the process does and is
/// dropped on [`stop`](InMemoryPeerStore::stop).
///
/// All operations are safe to call concurrently. Mutations take the owning
/// shard's exclusive lock for the whole update, so partial writes are never
/// observable; reads take the shared lock. Operations on the same shard are
/// linearizable, operations on different shards are independent.
pub struct InMemoryPeerStore {
    /// `2 * shard_count` shards; the first half serves IPv4 peers and the
    /// second half IPv6 peers.
    shards: Vec<RwLock<Shard>>,

    /// Where the statistics task and the garbage collector publish metrics.
    stats_repository: Arc<statistics::repository::Repository>,

    /// Set once by [`stop`](InMemoryPeerStore::stop); sampled on every
    /// operation entry.
    closed: AtomicBool,

    /// Shutdown signal observed by the background tasks.
    shutdown: watch::Sender<bool>,

    /// Handles of the scheduled background tasks, joined on stop.
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl InMemoryPeerStore {
    /// Creates a store with `2 * shard_count` empty shards.
    ///
    /// The configuration is sanity checked first; invalid values fall back
    /// to defaults with a warning (see [`PeerStoreConfig::validate`]).
    #[must_use]
    pub fn new(config: &PeerStoreConfig) -> Self {
        let config = config.validate();

        let mut shards = Vec::with_capacity(config.shard_count * 2);
        shards.resize_with(config.shard_count * 2, RwLock::default);

        let (shutdown, _) = watch::channel(false);

        Self {
            shards,
            stats_repository: Arc::new(statistics::repository::Repository::new()),
            closed: AtomicBool::new(false),
            shutdown,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// The repository where this store publishes its metrics.
    #[must_use]
    pub fn statistics_repository(&self) -> Arc<statistics::repository::Repository> {
        self.stats_repository.clone()
    }

    fn shard_count(&self) -> usize {
        self.shards.len() / 2
    }

    /// Shard selection is a pure function of the info-hash prefix and the
    /// peer's address family: the big-endian `u32` made of the first four
    /// info-hash bytes, modulo the shard count, offset into the second half
    /// of the shard vector for IPv6 peers.
    fn shard_index(&self, info_hash: &InfoHash, is_ipv6: bool) -> usize {
        let prefix = u32::from_be_bytes([info_hash.0[0], info_hash.0[1], info_hash.0[2], info_hash.0[3]]);

        let mut index = (prefix as usize) % self.shard_count();
        if is_ipv6 {
            index += self.shard_count();
        }
        index
    }

    fn assert_open(&self) {
        assert!(
            !self.closed.load(Ordering::SeqCst),
            "attempted to interact with a stopped peer store"
        );
    }

    /// Upserts the peer into the swarm's seeders, creating the swarm if
    /// needed, and stamps it with the current time.
    ///
    /// A peer is in exactly one side of a swarm: if the endpoint was stored
    /// as a leecher it is moved, not duplicated.
    ///
    /// # Panics
    ///
    /// Panics if the store has been stopped.
    pub fn put_seeder(&self, info_hash: &InfoHash, peer: &Peer) {
        self.assert_open();

        let key = peer.key();
        let record = PeerRecord {
            peer_id: peer.peer_id,
            updated: CurrentClock::now(),
        };

        let mut guard = self.shards[self.shard_index(info_hash, key.is_ipv6())].write();
        let shard = &mut *guard;

        let swarm = shard.swarms.entry(*info_hash).or_default();

        if swarm.leechers.remove(&key).is_some() {
            shard.num_leechers -= 1;
        }

        if swarm.seeders.insert(key, record).is_none() {
            shard.num_seeders += 1;
        }
    }

    /// Removes the peer from the swarm's seeders, dropping the swarm if both
    /// sides become empty.
    ///
    /// # Errors
    ///
    /// Will return [`Error::ResourceDoesNotExist`] if the swarm or the peer
    /// is not stored.
    ///
    /// # Panics
    ///
    /// Panics if the store has been stopped.
    pub fn delete_seeder(&self, info_hash: &InfoHash, peer: &Peer) -> Result<(), Error> {
        self.assert_open();

        let key = peer.key();

        let mut guard = self.shards[self.shard_index(info_hash, key.is_ipv6())].write();
        let shard = &mut *guard;

        let Some(swarm) = shard.swarms.get_mut(info_hash) else {
            return Err(Error::ResourceDoesNotExist {
                info_hash: *info_hash,
                location: Location::caller(),
            });
        };

        if swarm.seeders.remove(&key).is_none() {
            return Err(Error::ResourceDoesNotExist {
                info_hash: *info_hash,
                location: Location::caller(),
            });
        }

        shard.num_seeders -= 1;

        if swarm.is_empty() {
            shard.swarms.remove(info_hash);
        }

        Ok(())
    }

    /// Upserts the peer into the swarm's leechers, creating the swarm if
    /// needed, and stamps it with the current time.
    ///
    /// A peer is in exactly one side of a swarm: if the endpoint was stored
    /// as a seeder it is moved, not duplicated.
    ///
    /// # Panics
    ///
    /// Panics if the store has been stopped.
    pub fn put_leecher(&self, info_hash: &InfoHash, peer: &Peer) {
        self.assert_open();

        let key = peer.key();
        let record = PeerRecord {
            peer_id: peer.peer_id,
            updated: CurrentClock::now(),
        };

        let mut guard = self.shards[self.shard_index(info_hash, key.is_ipv6())].write();
        let shard = &mut *guard;

        let swarm = shard.swarms.entry(*info_hash).or_default();

        if swarm.seeders.remove(&key).is_some() {
            shard.num_seeders -= 1;
        }

        if swarm.leechers.insert(key, record).is_none() {
            shard.num_leechers += 1;
        }
    }

    /// Removes the peer from the swarm's leechers, dropping the swarm if
    /// both sides become empty.
    ///
    /// # Errors
    ///
    /// Will return [`Error::ResourceDoesNotExist`] if the swarm or the peer
    /// is not stored.
    ///
    /// # Panics
    ///
    /// Panics if the store has been stopped.
    pub fn delete_leecher(&self, info_hash: &InfoHash, peer: &Peer) -> Result<(), Error> {
        self.assert_open();

        let key = peer.key();

        let mut guard = self.shards[self.shard_index(info_hash, key.is_ipv6())].write();
        let shard = &mut *guard;

        let Some(swarm) = shard.swarms.get_mut(info_hash) else {
            return Err(Error::ResourceDoesNotExist {
                info_hash: *info_hash,
                location: Location::caller(),
            });
        };

        if swarm.leechers.remove(&key).is_none() {
            return Err(Error::ResourceDoesNotExist {
                info_hash: *info_hash,
                location: Location::caller(),
            });
        }

        shard.num_leechers -= 1;

        if swarm.is_empty() {
            shard.swarms.remove(info_hash);
        }

        Ok(())
    }

    /// Moves the peer from the leechers to the seeders, creating the swarm
    /// if needed. The peer ends up a seeder regardless of its prior state.
    ///
    /// # Panics
    ///
    /// Panics if the store has been stopped.
    pub fn graduate_leecher(&self, info_hash: &InfoHash, peer: &Peer) {
        self.put_seeder(info_hash, peer);
    }

    /// Selects up to `num_want` peers to return to the announcer.
    ///
    /// Seeders get leechers (seeders don't need other seeders). Leechers get
    /// seeders first and, if those don't reach `num_want`, other leechers --
    /// never the announcer itself. Selection order reflects map iteration
    /// order and carries no guarantee.
    ///
    /// # Errors
    ///
    /// Will return [`Error::ResourceDoesNotExist`] if the swarm is not
    /// stored.
    ///
    /// # Panics
    ///
    /// Panics if the store has been stopped.
    pub fn announce_peers(
        &self,
        info_hash: &InfoHash,
        seeder: bool,
        num_want: usize,
        announcer: &Peer,
    ) -> Result<Vec<Peer>, Error> {
        self.assert_open();

        let announcer_key = announcer.key();

        let guard = self.shards[self.shard_index(info_hash, announcer_key.is_ipv6())].read();

        let Some(swarm) = guard.swarms.get(info_hash) else {
            return Err(Error::ResourceDoesNotExist {
                info_hash: *info_hash,
                location: Location::caller(),
            });
        };

        let mut peers = Vec::with_capacity(num_want.min(swarm.seeders.len() + swarm.leechers.len()));

        if seeder {
            peers.extend(
                swarm
                    .leechers
                    .iter()
                    .take(num_want)
                    .map(|(key, record)| record.to_peer(key)),
            );
        } else {
            peers.extend(
                swarm
                    .seeders
                    .iter()
                    .take(num_want)
                    .map(|(key, record)| record.to_peer(key)),
            );

            if peers.len() < num_want {
                let remaining = num_want - peers.len();
                peers.extend(
                    swarm
                        .leechers
                        .iter()
                        .filter(|(key, _)| **key != announcer_key)
                        .take(remaining)
                        .map(|(key, record)| record.to_peer(key)),
                );
            }
        }

        Ok(peers)
    }

    /// Returns the swarm metadata for a `scrape` response, or zeroed
    /// metadata if the torrent is not stored.
    ///
    /// # Panics
    ///
    /// Panics if the store has been stopped.
    #[must_use]
    pub fn scrape_swarm(&self, info_hash: &InfoHash, announcer: &Peer) -> SwarmMetadata {
        self.assert_open();

        let key = announcer.key();

        let guard = self.shards[self.shard_index(info_hash, key.is_ipv6())].read();

        match guard.swarms.get(info_hash) {
            Some(swarm) => SwarmMetadata {
                complete: u32::try_from(swarm.seeders.len()).unwrap_or(u32::MAX),
                incomplete: u32::try_from(swarm.leechers.len()).unwrap_or(u32::MAX),
            },
            None => SwarmMetadata::zeroed(),
        }
    }

    /// Aggregates the swarm gauges across all shards.
    ///
    /// Each shard's shared lock is taken in turn, never two at once, so the
    /// result may mix moments. Each shard's contribution is self-consistent.
    #[must_use]
    pub fn torrents_metrics(&self) -> TorrentsMetrics {
        let mut metrics = TorrentsMetrics::default();

        for locked_shard in &self.shards {
            let shard = locked_shard.read();
            metrics += TorrentsMetrics {
                torrents: shard.swarms.len() as u64,
                seeders: shard.num_seeders,
                leechers: shard.num_leechers,
            };
        }

        metrics
    }

    /// Removes every peer whose last announce is at or before `cutoff`, and
    /// every swarm that drains empty as a result.
    ///
    /// The sweep visits one shard at a time in two passes: first it
    /// snapshots the shard's info-hashes under the shared lock, then it
    /// expires each swarm under a short exclusive lock, re-checking that the
    /// swarm still exists (a concurrent delete may have removed it). The
    /// task yields between passes so the sweep never starves foreground
    /// traffic.
    pub async fn purge_expired_peers(&self, cutoff: DurationSinceUnixEpoch) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }

        for locked_shard in &self.shards {
            let info_hashes: Vec<InfoHash> = locked_shard.read().swarms.keys().copied().collect();
            tokio::task::yield_now().await;

            for info_hash in info_hashes {
                {
                    let mut guard = locked_shard.write();
                    let shard = &mut *guard;

                    if let Some(swarm) = shard.swarms.get_mut(&info_hash) {
                        let before = swarm.seeders.len();
                        swarm.seeders.retain(|_, record| record.updated > cutoff);
                        shard.num_seeders -= (before - swarm.seeders.len()) as u64;

                        let before = swarm.leechers.len();
                        swarm.leechers.retain(|_, record| record.updated > cutoff);
                        shard.num_leechers -= (before - swarm.leechers.len()) as u64;

                        if swarm.is_empty() {
                            shard.swarms.remove(&info_hash);
                        }
                    }
                }

                tokio::task::yield_now().await;
            }

            tokio::task::yield_now().await;
        }
    }

    /// Starts the garbage collection task: every `gc_interval` it removes
    /// peers that have not announced for `peer_lifetime`, then records the
    /// sweep duration to the statistics repository.
    ///
    /// The task stops when [`stop`](InMemoryPeerStore::stop) is called or
    /// the store is dropped.
    pub fn schedule_gc(store: &Arc<Self>, gc_interval: Duration, peer_lifetime: Duration) {
        let weak_store = Arc::downgrade(store);
        let mut shutdown = store.shutdown.subscribe();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(gc_interval);
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = shutdown.changed() => break,
                    _ = interval.tick() => {
                        let Some(store) = weak_store.upgrade() else { break };

                        let Some(cutoff) = CurrentClock::now_sub(&peer_lifetime) else { continue };
                        tracing::debug!(?cutoff, "purging peers with no announces since the cutoff");

                        let start = Instant::now();
                        store.purge_expired_peers(cutoff).await;
                        let elapsed = start.elapsed();

                        store.stats_repository.record_gc_sweep(elapsed).await;
                        tracing::debug!(duration = ?elapsed, "garbage collection sweep finished");
                    }
                }
            }
        });

        store.tasks.lock().push(handle);
    }

    /// Starts the statistics task: every `report_interval` it sums the swarm
    /// gauges across all shards and publishes them to the statistics
    /// repository.
    ///
    /// The task stops when [`stop`](InMemoryPeerStore::stop) is called or
    /// the store is dropped.
    pub fn schedule_statistics_collection(store: &Arc<Self>, report_interval: Duration) {
        let weak_store = Arc::downgrade(store);
        let mut shutdown = store.shutdown.subscribe();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(report_interval);
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = shutdown.changed() => break,
                    _ = interval.tick() => {
                        let Some(store) = weak_store.upgrade() else { break };

                        let metrics = store.torrents_metrics();
                        store.stats_repository.update_torrents_metrics(&metrics).await;

                        tracing::debug!(
                            torrents = metrics.torrents,
                            seeders = metrics.seeders,
                            leechers = metrics.leechers,
                            "published swarm statistics"
                        );
                    }
                }
            }
        });

        store.tasks.lock().push(handle);
    }

    /// Stops the store: marks it closed, signals the background tasks,
    /// waits for their completion, and then drops every swarm to release
    /// the memory.
    ///
    /// Every operation after `stop` returns is a programmer error and
    /// panics.
    pub async fn stop(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.shutdown.send_replace(true);

        let tasks: Vec<JoinHandle<()>> = self.tasks.lock().drain(..).collect();
        for task in tasks {
            let _ = task.await;
        }

        for locked_shard in &self.shards {
            let mut shard = locked_shard.write();
            *shard = Shard::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    use std::sync::Arc;
    use std::time::Duration;

    use swarm_tracker_clock::clock::{self, StoppedTime, Time};
    use swarm_tracker_configuration::PeerStoreConfig;
    use swarm_tracker_primitives::peer::{Peer, PeerId};
    use swarm_tracker_primitives::swarm_metadata::SwarmMetadata;
    use swarm_tracker_primitives::torrent_metrics::TorrentsMetrics;

    use super::InMemoryPeerStore;
    use crate::error::Error;
    use crate::test_helpers::{sample_info_hash, sample_ipv4_peer, sample_ipv6_peer, sample_peer};

    fn sample_store() -> Arc<InMemoryPeerStore> {
        Arc::new(InMemoryPeerStore::new(&PeerStoreConfig { shard_count: 4 }))
    }

    impl InMemoryPeerStore {
        /// Checks the structural invariants on every shard: cached counters
        /// match the swarm sums, no swarm is empty, and no peer is on both
        /// sides of a swarm.
        fn assert_consistent(&self) {
            for locked_shard in &self.shards {
                let shard = locked_shard.read();

                let seeders: u64 = shard.swarms.values().map(|swarm| swarm.seeders.len() as u64).sum();
                let leechers: u64 = shard.swarms.values().map(|swarm| swarm.leechers.len() as u64).sum();

                assert_eq!(shard.num_seeders, seeders, "cached seeder counter diverged");
                assert_eq!(shard.num_leechers, leechers, "cached leecher counter diverged");

                for (info_hash, swarm) in &shard.swarms {
                    assert!(!swarm.is_empty(), "empty swarm kept for {info_hash}");

                    for key in swarm.seeders.keys() {
                        assert!(
                            !swarm.leechers.contains_key(key),
                            "peer is both seeder and leecher in {info_hash}"
                        );
                    }
                }
            }
        }
    }

    mod handling_membership {
        use super::*;

        #[test]
        fn it_should_store_a_seeder_and_report_it_in_the_scrape() {
            let store = sample_store();
            let info_hash = sample_info_hash();
            let peer = sample_peer();

            store.put_seeder(&info_hash, &peer);

            assert_eq!(
                store.scrape_swarm(&info_hash, &peer),
                SwarmMetadata {
                    complete: 1,
                    incomplete: 0
                }
            );
            store.assert_consistent();
        }

        #[test]
        fn it_should_not_count_a_reannouncing_seeder_twice() {
            let store = sample_store();
            let info_hash = sample_info_hash();
            let peer = sample_peer();

            store.put_seeder(&info_hash, &peer);
            store.put_seeder(&info_hash, &peer);

            assert_eq!(store.scrape_swarm(&info_hash, &peer).complete, 1);
            store.assert_consistent();
        }

        #[test]
        fn it_should_treat_the_same_endpoint_with_a_new_peer_id_as_one_peer() {
            let store = sample_store();
            let info_hash = sample_info_hash();
            let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(126, 0, 0, 1)), 8080);

            store.put_seeder(&info_hash, &Peer::new(PeerId(*b"-qB00000000000000001"), addr));
            store.put_seeder(&info_hash, &Peer::new(PeerId(*b"-TR00000000000000002"), addr));

            assert_eq!(store.scrape_swarm(&info_hash, &sample_peer()).complete, 1);
            store.assert_consistent();
        }

        #[test]
        fn it_should_move_a_stored_leecher_to_the_seeders_when_it_is_put_as_a_seeder() {
            let store = sample_store();
            let info_hash = sample_info_hash();
            let peer = sample_peer();

            store.put_leecher(&info_hash, &peer);
            store.put_seeder(&info_hash, &peer);

            assert_eq!(
                store.scrape_swarm(&info_hash, &peer),
                SwarmMetadata {
                    complete: 1,
                    incomplete: 0
                }
            );
            store.assert_consistent();
        }

        #[test]
        fn it_should_move_a_stored_seeder_to_the_leechers_when_it_is_put_as_a_leecher() {
            let store = sample_store();
            let info_hash = sample_info_hash();
            let peer = sample_peer();

            store.put_seeder(&info_hash, &peer);
            store.put_leecher(&info_hash, &peer);

            assert_eq!(
                store.scrape_swarm(&info_hash, &peer),
                SwarmMetadata {
                    complete: 0,
                    incomplete: 1
                }
            );
            store.assert_consistent();
        }

        #[test]
        fn it_should_remove_the_swarm_when_its_last_peer_is_deleted() {
            let store = sample_store();
            let info_hash = sample_info_hash();
            let peer = sample_peer();

            store.put_seeder(&info_hash, &peer);
            store.delete_seeder(&info_hash, &peer).unwrap();

            assert_eq!(store.scrape_swarm(&info_hash, &peer), SwarmMetadata::zeroed());
            assert_eq!(store.torrents_metrics(), TorrentsMetrics::default());
            store.assert_consistent();
        }

        #[test]
        fn it_should_fail_to_delete_from_an_unknown_swarm() {
            let store = sample_store();
            let peer = sample_peer();

            let result = store.delete_seeder(&sample_info_hash(), &peer);

            assert!(matches!(result, Err(Error::ResourceDoesNotExist { .. })));
        }

        #[test]
        fn it_should_fail_to_delete_a_peer_that_is_not_in_the_swarm() {
            let store = sample_store();
            let info_hash = sample_info_hash();

            store.put_seeder(&info_hash, &sample_ipv4_peer(1));

            let result = store.delete_seeder(&info_hash, &sample_ipv4_peer(2));

            assert!(matches!(result, Err(Error::ResourceDoesNotExist { .. })));
            store.assert_consistent();
        }

        #[test]
        fn it_should_fail_to_delete_a_leecher_that_is_stored_as_a_seeder() {
            let store = sample_store();
            let info_hash = sample_info_hash();
            let peer = sample_peer();

            store.put_seeder(&info_hash, &peer);

            assert!(matches!(
                store.delete_leecher(&info_hash, &peer),
                Err(Error::ResourceDoesNotExist { .. })
            ));
            store.assert_consistent();
        }
    }

    mod handling_graduation {
        use super::*;

        #[test]
        fn it_should_move_a_leecher_to_the_seeders() {
            let store = sample_store();
            let info_hash = sample_info_hash();
            let peer = sample_peer();

            store.put_leecher(&info_hash, &peer);
            store.graduate_leecher(&info_hash, &peer);

            assert_eq!(
                store.scrape_swarm(&info_hash, &peer),
                SwarmMetadata {
                    complete: 1,
                    incomplete: 0
                }
            );
            assert_eq!(
                store.torrents_metrics(),
                TorrentsMetrics {
                    torrents: 1,
                    seeders: 1,
                    leechers: 0
                }
            );
            store.assert_consistent();
        }

        #[test]
        fn it_should_graduate_a_peer_that_was_never_a_leecher() {
            let store = sample_store();
            let info_hash = sample_info_hash();
            let peer = sample_peer();

            store.graduate_leecher(&info_hash, &peer);

            assert_eq!(store.scrape_swarm(&info_hash, &peer).complete, 1);
            store.assert_consistent();
        }

        #[test]
        fn it_should_leave_a_graduated_peer_a_seeder_when_graduated_again() {
            let store = sample_store();
            let info_hash = sample_info_hash();
            let peer = sample_peer();

            store.put_leecher(&info_hash, &peer);
            store.graduate_leecher(&info_hash, &peer);
            store.graduate_leecher(&info_hash, &peer);

            assert_eq!(
                store.scrape_swarm(&info_hash, &peer),
                SwarmMetadata {
                    complete: 1,
                    incomplete: 0
                }
            );
            store.assert_consistent();
        }
    }

    mod handling_announces {
        use super::*;

        #[test]
        fn it_should_return_seeders_and_other_leechers_to_a_leecher() {
            let store = sample_store();
            let info_hash = sample_info_hash();

            let announcer = sample_ipv4_peer(1);
            let other_leecher = sample_ipv4_peer(2);
            let seeder = sample_ipv4_peer(3);

            store.put_leecher(&info_hash, &announcer);
            store.put_leecher(&info_hash, &other_leecher);
            store.put_seeder(&info_hash, &seeder);

            assert_eq!(
                store.scrape_swarm(&info_hash, &announcer),
                SwarmMetadata {
                    complete: 1,
                    incomplete: 2
                }
            );

            let peers = store.announce_peers(&info_hash, false, 10, &announcer).unwrap();

            assert_eq!(peers.len(), 2);
            assert!(peers.contains(&seeder));
            assert!(peers.contains(&other_leecher));
            assert!(!peers.contains(&announcer));
        }

        #[test]
        fn it_should_return_only_leechers_to_a_seeder() {
            let store = sample_store();
            let info_hash = sample_info_hash();

            let announcer = sample_ipv4_peer(1);
            let other_seeder = sample_ipv4_peer(2);
            let leecher = sample_ipv4_peer(3);

            store.put_seeder(&info_hash, &announcer);
            store.put_seeder(&info_hash, &other_seeder);
            store.put_leecher(&info_hash, &leecher);

            let peers = store.announce_peers(&info_hash, true, 10, &announcer).unwrap();

            assert_eq!(peers, vec![leecher]);
        }

        #[test]
        fn it_should_honor_the_requested_number_of_peers() {
            let store = sample_store();
            let info_hash = sample_info_hash();
            let announcer = sample_ipv4_peer(1);

            store.put_leecher(&info_hash, &announcer);
            for n in 2..=12 {
                store.put_seeder(&info_hash, &sample_ipv4_peer(n));
            }

            let peers = store.announce_peers(&info_hash, false, 5, &announcer).unwrap();

            assert_eq!(peers.len(), 5);
        }

        #[test]
        fn it_should_fail_to_announce_on_an_unknown_swarm() {
            let store = sample_store();

            let result = store.announce_peers(&sample_info_hash(), false, 10, &sample_peer());

            assert!(matches!(result, Err(Error::ResourceDoesNotExist { .. })));
        }
    }

    mod sharding {
        use super::*;

        #[test]
        fn it_should_assign_shards_as_a_pure_function_of_hash_prefix_and_address_family() {
            let store = sample_store();
            let info_hash = sample_info_hash();

            let first = store.shard_index(&info_hash, false);
            let second = store.shard_index(&info_hash, false);

            assert_eq!(first, second);
            assert_eq!(store.shard_index(&info_hash, true), first + store.shard_count());
        }

        #[test]
        fn it_should_keep_address_families_in_disjoint_shards() {
            let store = sample_store();
            let info_hash = sample_info_hash();

            let v4_peer = sample_ipv4_peer(1);
            let v6_peer = sample_ipv6_peer(2);

            store.put_seeder(&info_hash, &v4_peer);
            store.put_seeder(&info_hash, &v6_peer);

            // Both stored, but in different buckets: a v4 scrape only sees
            // the v4 side of the swarm.
            assert_eq!(store.scrape_swarm(&info_hash, &v4_peer).complete, 1);
            assert_eq!(store.scrape_swarm(&info_hash, &v6_peer).complete, 1);
            assert_eq!(store.torrents_metrics().seeders, 2);
            store.assert_consistent();
        }

        #[test]
        fn it_should_never_return_peers_of_the_other_address_family() {
            let store = sample_store();
            let info_hash = sample_info_hash();

            let v4_announcer = sample_ipv4_peer(1);
            let v6_seeder = sample_ipv6_peer(2);

            store.put_seeder(&info_hash, &v6_seeder);
            store.put_leecher(&info_hash, &v4_announcer);

            let peers = store.announce_peers(&info_hash, false, 10, &v4_announcer).unwrap();

            assert!(peers.is_empty());
        }
    }

    mod garbage_collection {
        use super::*;

        const PEER_LIFETIME: Duration = Duration::from_secs(120);

        #[tokio::test]
        async fn it_should_remove_expired_peers_and_their_swarms() {
            let store = sample_store();
            let info_hash = sample_info_hash();
            let peer = sample_peer();

            clock::Stopped::local_set(&Duration::from_secs(0));
            store.put_seeder(&info_hash, &peer);

            clock::Stopped::local_set(&Duration::from_secs(121));
            let cutoff = clock::Stopped::now().checked_sub(PEER_LIFETIME).unwrap();

            store.purge_expired_peers(cutoff).await;

            assert_eq!(store.scrape_swarm(&info_hash, &peer), SwarmMetadata::zeroed());
            assert_eq!(store.torrents_metrics(), TorrentsMetrics::default());
            store.assert_consistent();
        }

        #[tokio::test]
        async fn it_should_keep_peers_that_announced_within_the_lifetime() {
            let store = sample_store();
            let info_hash = sample_info_hash();

            clock::Stopped::local_set(&Duration::from_secs(0));
            let stale_peer = sample_ipv4_peer(1);
            store.put_leecher(&info_hash, &stale_peer);

            clock::Stopped::local_set(&Duration::from_secs(100));
            let fresh_peer = sample_ipv4_peer(2);
            store.put_leecher(&info_hash, &fresh_peer);

            clock::Stopped::local_set(&Duration::from_secs(121));
            let cutoff = clock::Stopped::now().checked_sub(PEER_LIFETIME).unwrap();

            store.purge_expired_peers(cutoff).await;

            assert_eq!(store.scrape_swarm(&info_hash, &fresh_peer).incomplete, 1);
            store.assert_consistent();
        }

        #[tokio::test]
        async fn it_should_be_idempotent_for_the_same_cutoff() {
            let store = sample_store();
            let info_hash = sample_info_hash();

            clock::Stopped::local_set(&Duration::from_secs(0));
            store.put_leecher(&info_hash, &sample_ipv4_peer(1));

            clock::Stopped::local_set(&Duration::from_secs(60));
            store.put_seeder(&info_hash, &sample_ipv4_peer(2));

            clock::Stopped::local_set(&Duration::from_secs(121));
            let cutoff = clock::Stopped::now().checked_sub(PEER_LIFETIME).unwrap();

            store.purge_expired_peers(cutoff).await;
            let after_first = store.torrents_metrics();

            store.purge_expired_peers(cutoff).await;
            let after_second = store.torrents_metrics();

            assert_eq!(after_first, after_second);
            store.assert_consistent();
        }
    }

    mod stopping {
        use super::*;

        #[tokio::test]
        async fn it_should_join_the_scheduled_tasks_promptly() {
            let store = sample_store();

            InMemoryPeerStore::schedule_gc(&store, Duration::from_secs(600), Duration::from_secs(120));
            InMemoryPeerStore::schedule_statistics_collection(&store, Duration::from_secs(600));

            tokio::time::timeout(Duration::from_secs(5), store.stop())
                .await
                .expect("stop should not wait for the next timer tick");
        }

        #[tokio::test]
        #[should_panic(expected = "attempted to interact with a stopped peer store")]
        async fn it_should_panic_when_a_stopped_store_is_used() {
            let store = sample_store();

            store.stop().await;

            store.put_seeder(&sample_info_hash(), &sample_peer());
        }
    }

    mod randomized_operations {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        use super::*;

        #[tokio::test]
        async fn it_should_keep_the_shard_counters_consistent_under_random_operations() {
            let store = sample_store();
            let mut rng = StdRng::seed_from_u64(42);

            let info_hashes: Vec<swarm_tracker_primitives::info_hash::InfoHash> =
                (0u8..4).map(|n| [n; 20].into()).collect();
            let peers: Vec<_> = (1u8..=8)
                .map(|n| {
                    if n % 2 == 0 {
                        sample_ipv4_peer(n)
                    } else {
                        sample_ipv6_peer(n)
                    }
                })
                .collect();

            for step in 0u64..2_000 {
                clock::Stopped::local_set(&Duration::from_secs(step));

                let info_hash = &info_hashes[rng.gen_range(0..info_hashes.len())];
                let peer = &peers[rng.gen_range(0..peers.len())];

                match rng.gen_range(0..6) {
                    0 => store.put_seeder(info_hash, peer),
                    1 => store.put_leecher(info_hash, peer),
                    2 => {
                        let _ = store.delete_seeder(info_hash, peer);
                    }
                    3 => {
                        let _ = store.delete_leecher(info_hash, peer);
                    }
                    4 => store.graduate_leecher(info_hash, peer),
                    _ => {
                        let lifetime = Duration::from_secs(rng.gen_range(1..300));
                        if let Some(cutoff) = clock::Stopped::now().checked_sub(lifetime) {
                            store.purge_expired_peers(cutoff).await;
                        }
                    }
                }

                store.assert_consistent();
            }
        }
    }
}
