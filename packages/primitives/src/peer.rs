//! Peers, peer IDs and the compact endpoint key used for swarm membership.
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

/// Number of bytes in a peer ID.
pub const PEER_ID_BYTES_LEN: usize = 20;

/// Number of bytes in a client ID, the peer ID prefix that identifies the
/// implementing `BitTorrent` client.
pub const CLIENT_ID_BYTES_LEN: usize = 6;

/// The 20-byte ID a peer advertises about itself in announce requests.
///
/// Most clients follow the Azureus convention, where the leading bytes encode
/// the client implementation and version (for example `-qB4500-`).
#[derive(PartialEq, Eq, Hash, Clone, Copy)]
pub struct PeerId(pub [u8; PEER_ID_BYTES_LEN]);

impl PeerId {
    /// The [`ClientId`] prefix of this peer ID.
    #[must_use]
    pub fn client_id(&self) -> ClientId {
        let mut bytes = [0u8; CLIENT_ID_BYTES_LEN];
        bytes.copy_from_slice(&self.0[..CLIENT_ID_BYTES_LEN]);
        ClientId(bytes)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.escape_ascii())
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({self})")
    }
}

/// The 6-byte peer ID prefix identifying a `BitTorrent` client implementation.
#[derive(PartialEq, Eq, Hash, Clone, Copy)]
pub struct ClientId(pub [u8; CLIENT_ID_BYTES_LEN]);

impl TryFrom<&[u8]> for ClientId {
    type Error = InvalidClientIdError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; CLIENT_ID_BYTES_LEN] = bytes
            .try_into()
            .map_err(|_| InvalidClientIdError { len: bytes.len() })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.escape_ascii())
    }
}

impl fmt::Debug for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClientId({self})")
    }
}

/// Error returned when a client ID is not exactly 6 bytes.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("client ID must be exactly 6 bytes, got {len}")]
pub struct InvalidClientIdError {
    pub len: usize,
}

/// A peer participating in a swarm.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct Peer {
    /// The ID the peer advertised about itself.
    pub peer_id: PeerId,

    /// The peer's socket address, as resolved by the frontend.
    pub peer_addr: SocketAddr,
}

impl Peer {
    #[must_use]
    pub fn new(peer_id: PeerId, peer_addr: SocketAddr) -> Self {
        Self { peer_id, peer_addr }
    }

    /// The compact membership key for this peer's endpoint.
    #[must_use]
    pub fn key(&self) -> PeerKey {
        PeerKey::from_socket_addr(&self.peer_addr)
    }
}

/// Maximum serialized length of a [`PeerKey`] (an IPv6 endpoint).
const COMPACT_V6_LEN: usize = 18;

/// Serialized length of an IPv4 endpoint.
const COMPACT_V4_LEN: usize = 6;

/// The canonical compact serialization of a peer's endpoint, used as the
/// swarm membership key.
///
/// The encoding is the address bytes followed by the big-endian port: 6 bytes
/// for IPv4 and 18 bytes for IPv6, the same layout compact announce responses
/// use on the wire. The key is injective over `(IP, port)` and deliberately
/// excludes the peer ID, so a given endpoint appears at most once in a swarm.
///
/// IPv4-mapped IPv6 addresses are canonicalized to IPv4 before serializing,
/// so the same endpoint always produces the same key regardless of how the
/// frontend socket reported it.
#[derive(PartialEq, Eq, Hash, Clone, Copy)]
pub struct PeerKey {
    len: u8,
    bytes: [u8; COMPACT_V6_LEN],
}

impl PeerKey {
    #[must_use]
    pub fn from_socket_addr(addr: &SocketAddr) -> Self {
        let mut bytes = [0u8; COMPACT_V6_LEN];
        let port = addr.port().to_be_bytes();

        let len = match addr.ip().to_canonical() {
            IpAddr::V4(ip) => {
                bytes[..4].copy_from_slice(&ip.octets());
                bytes[4..6].copy_from_slice(&port);
                COMPACT_V4_LEN
            }
            IpAddr::V6(ip) => {
                bytes[..16].copy_from_slice(&ip.octets());
                bytes[16..18].copy_from_slice(&port);
                COMPACT_V6_LEN
            }
        };

        Self {
            len: len as u8,
            bytes,
        }
    }

    /// Whether the key serializes an IPv6 endpoint.
    #[must_use]
    pub fn is_ipv6(&self) -> bool {
        self.len as usize == COMPACT_V6_LEN
    }

    /// The serialized key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Recovers the endpoint the key was built from.
    #[must_use]
    pub fn to_socket_addr(&self) -> SocketAddr {
        if self.is_ipv6() {
            let mut ip = [0u8; 16];
            ip.copy_from_slice(&self.bytes[..16]);
            let port = u16::from_be_bytes([self.bytes[16], self.bytes[17]]);
            SocketAddr::new(IpAddr::V6(Ipv6Addr::from(ip)), port)
        } else {
            let ip = Ipv4Addr::new(self.bytes[0], self.bytes[1], self.bytes[2], self.bytes[3]);
            let port = u16::from_be_bytes([self.bytes[4], self.bytes[5]]);
            SocketAddr::new(IpAddr::V4(ip), port)
        }
    }
}

impl From<&Peer> for PeerKey {
    fn from(peer: &Peer) -> Self {
        peer.key()
    }
}

impl fmt::Debug for PeerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerKey({})", self.to_socket_addr())
    }
}
