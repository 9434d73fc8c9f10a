//! The core tracker logic, independent of the delivery layer.
//!
//! This crate contains the domain services a `BitTorrent` tracker frontend
//! builds on. It does not know how peers connect to the tracker; HTTP and
//! UDP frontends decode their wire formats into the typed requests from
//! [`swarm_tracker_primitives::core`] and drive the services here:
//!
//! ```text
//! Delivery layer     Domain layer
//!
//!     HTTP tracker |
//!      UDP tracker |> approval hooks -> peer store
//! ```
//!
//! # Handling an announce
//!
//! A frontend first runs the configured [`approval`] hooks. A rejection
//! short-circuits the request and is translated into a `BitTorrent` failure
//! response; no state is touched. An admitted announce then mutates the
//! [`peer_store`]: `started` announces become leechers, `completed`
//! announces graduate the peer to a seeder, `stopped` announces delete it.
//! The reply peers come from
//! [`peer_store::in_memory::InMemoryPeerStore::announce_peers`], which never
//! returns the announcing peer itself.
//!
//! # Handling a scrape
//!
//! Scrapes are never rejected by the hooks. The frontend reads one
//! [`swarm_tracker_primitives::swarm_metadata::SwarmMetadata`] per requested
//! torrent via
//! [`peer_store::in_memory::InMemoryPeerStore::scrape_swarm`]; unknown
//! torrents yield zeroed metadata.
//!
//! # Background maintenance
//!
//! The peer store owns two optional background tasks: a garbage collector
//! sweeping out peers that stopped announcing, and a statistics reporter
//! publishing aggregate gauges to the [`statistics`] repository. Both stop
//! promptly when the store is stopped.
//!
//! Peer data is volatile by design: nothing in this crate persists across
//! process restarts.
pub mod approval;
pub mod error;
pub mod peer_store;
pub mod statistics;
pub mod test_helpers;

use swarm_tracker_clock::clock;

/// This code needs to be copied into each crate.
/// Working version, for production.
#[cfg(not(test))]
#[allow(dead_code)]
pub(crate) type CurrentClock = clock::Working;

/// Stopped version, for testing.
#[cfg(test)]
#[allow(dead_code)]
pub(crate) type CurrentClock = clock::Stopped;
