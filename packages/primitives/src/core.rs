//! Typed requests fed into the tracker core by the frontends.
//!
//! Frontends decode the HTTP or UDP wire format into these structures before
//! invoking the approval hooks and the peer store. Wire framing itself stays
//! on the frontend side.
use derive_more::derive::Constructor;

use crate::info_hash::InfoHash;
use crate::peer::{ClientId, Peer};

/// An `announce` request, after wire decoding and IP resolution.
#[derive(Clone, Debug, PartialEq, Eq, Constructor)]
pub struct AnnounceRequest {
    /// The torrent the peer announces itself for.
    pub info_hash: InfoHash,

    /// The announcing peer, with its address as resolved by the frontend.
    pub peer: Peer,

    /// How many peers the client wants in the reply.
    pub num_want: u32,

    /// Number of bytes the client still has to download.
    pub left: u64,
}

impl AnnounceRequest {
    /// Whether the announcing peer has completed the download.
    #[must_use]
    pub fn is_seeder(&self) -> bool {
        self.left == 0
    }

    /// The client ID prefix of the announcing peer.
    #[must_use]
    pub fn client_id(&self) -> ClientId {
        self.peer.peer_id.client_id()
    }
}

/// A `scrape` request for the aggregate state of one or more swarms.
#[derive(Clone, Debug, Default, PartialEq, Eq, Constructor)]
pub struct ScrapeRequest {
    /// The torrents whose swarm metadata is requested.
    pub info_hashes: Vec<InfoHash>,
}
