//! Swarm membership storage.
//!
//! The peer store maintains, per torrent, which endpoints are seeding and
//! which are leeching, with a last-seen timestamp per peer. It is the only
//! shared mutable state in the tracker core.
//!
//! The swarm map is split into `2 * shard_count` shards, each guarded by its
//! own readers-writer lock. The first half of the shard vector serves IPv4
//! peers and the second half IPv6 peers, so dual-stack tracking never
//! contends on the same bucket and announce replies stay within one address
//! family.
pub mod in_memory;
