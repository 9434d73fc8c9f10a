//! Sample values shared by the crate tests and the integration tests.
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use swarm_tracker_primitives::core::AnnounceRequest;
use swarm_tracker_primitives::info_hash::InfoHash;
use swarm_tracker_primitives::peer::{Peer, PeerId};

/// # Panics
///
/// Will panic if the string representation of the info hash is not a valid
/// info hash.
#[must_use]
pub fn sample_info_hash() -> InfoHash {
    "3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0"
        .parse::<InfoHash>()
        .expect("string should be a valid info hash")
}

/// Sample peer whose state is not relevant for the tests.
#[must_use]
pub fn sample_peer() -> Peer {
    Peer::new(
        PeerId(*b"-qB00000000000000001"),
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(126, 0, 0, 1)), 8080),
    )
}

/// An IPv4 peer whose address, port and ID are derived from `n`, so
/// different `n` values give distinct endpoints.
#[must_use]
pub fn sample_ipv4_peer(n: u8) -> Peer {
    let mut peer_id = *b"-qB00000000000000000";
    peer_id[19] = n;

    Peer::new(
        PeerId(peer_id),
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(126, 0, 0, n)), 8000 + u16::from(n)),
    )
}

/// An IPv6 peer whose address, port and ID are derived from `n`.
#[must_use]
pub fn sample_ipv6_peer(n: u8) -> Peer {
    let mut peer_id = *b"-qB00000000000000000";
    peer_id[19] = n;

    Peer::new(
        PeerId(peer_id),
        SocketAddr::new(
            IpAddr::V6(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, u16::from(n))),
            8000 + u16::from(n),
        ),
    )
}

/// An announce request for [`sample_info_hash`] from [`sample_peer`].
#[must_use]
pub fn sample_announce_request() -> AnnounceRequest {
    AnnounceRequest::new(sample_info_hash(), sample_peer(), 50, 0)
}

/// An announce request from a peer with the given peer ID.
#[must_use]
pub fn sample_announce_request_with_peer_id(peer_id: [u8; 20]) -> AnnounceRequest {
    AnnounceRequest::new(
        sample_info_hash(),
        Peer::new(PeerId(peer_id), sample_peer().peer_addr),
        50,
        0,
    )
}
