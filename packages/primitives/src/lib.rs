//! Primitive types for the Swarm Tracker.
//!
//! This crate contains the basic data structures shared by the tracker
//! packages: torrent identifiers, peers and their compact serialization,
//! swarm aggregates, and the typed requests that frontends feed into the
//! tracker core.
pub mod core;
pub mod info_hash;
pub mod peer;
pub mod swarm_metadata;
pub mod torrent_metrics;

use std::time::Duration;

/// Duration since the Unix Epoch.
///
/// Used as the last-seen timestamp attached to every stored peer.
pub type DurationSinceUnixEpoch = Duration;
