//! Errors surfaced across the tracker core boundary.
//!
//! These are the non-fatal errors frontends translate into `BitTorrent`
//! failure responses. Configuration errors live with the component that
//! validates them and abort startup instead.
use std::panic::Location;

use swarm_tracker_primitives::info_hash::InfoHash;
use swarm_tracker_primitives::peer::ClientId;

/// Errors returned by the peer store and the approval hooks.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The swarm, or the peer within it, addressed by the operation is not
    /// stored.
    #[error("resource does not exist for torrent {info_hash}, {location}")]
    ResourceDoesNotExist {
        info_hash: InfoHash,
        location: &'static Location<'static>,
    },

    /// The announcing client implementation is not admitted by the client
    /// approval hook.
    #[error("unapproved client {client_id}, {location}")]
    ClientUnapproved {
        client_id: ClientId,
        location: &'static Location<'static>,
    },

    /// The announced torrent is not admitted by the torrent approval hook.
    #[error("unapproved torrent {info_hash}, {location}")]
    TorrentUnapproved {
        info_hash: InfoHash,
        location: &'static Location<'static>,
    },
}
