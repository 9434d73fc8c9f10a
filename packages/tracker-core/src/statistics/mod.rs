//! Peer store statistics.
//!
//! The peer store publishes aggregate gauges into a [`repository::Repository`]
//! on a fixed interval (see
//! [`crate::peer_store::in_memory::InMemoryPeerStore::schedule_statistics_collection`]),
//! and the garbage collector records its sweep durations there. API layers
//! read the repository to serve tracker metrics.
pub mod metrics;
pub mod repository;
