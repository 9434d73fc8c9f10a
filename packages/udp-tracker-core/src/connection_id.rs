//! Generating and validating connection IDs as described in BEP 15.
//!
//! **Connection ID layout (8 bytes):**
//!
//! - Bytes `0..4`: the issuance time as a big-endian 32-bit unix timestamp.
//! - Bytes `4..8`: the first 4 bytes of `HMAC-SHA256(key, timestamp ∥ ip)`,
//!   where `ip` is the canonical binary form of the client address (4 bytes
//!   for IPv4, 16 bytes for IPv6).
//!
//! Embedding the timestamp in the clear lets validation reject stale IDs
//! before touching the MAC; binding the truncated MAC to the source address
//! is what defeats IP spoofing.
//!
//! **Security:** truncated HMAC is safe up to a forgery probability of
//! `2^-n` where `n` is the truncated tag size in bits. The 32-bit tag used
//! here bounds a forgery at about 1 in 4 billion per guess, which is
//! adequate for a volatile, rate-limited UDP handshake. The tag comparison
//! is constant-time.
use std::net::IpAddr;
use std::time::Duration;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use swarm_tracker_primitives::DurationSinceUnixEpoch;

use crate::error::Error;

/// How long a connection ID stays valid, per BEP 15.
pub const CONNECTION_ID_LIFETIME: Duration = Duration::from_secs(120);

/// Size of a connection ID on the wire.
pub const CONNECTION_ID_BYTES_LEN: usize = 8;

type HmacSha256 = Hmac<Sha256>;

/// A reusable generator and validator for connection IDs.
///
/// The generator is keyed once at construction. It is not safe for
/// concurrent use, but it is cheap to pool and reuse across handlers: the
/// keyed MAC state is never consumed in place, every call hashes on a fresh
/// copy of it, so an instance taken from a pool requires no cleanup. See
/// [`crate::pool::GeneratorPool`].
pub struct ConnectionIdGenerator {
    /// The keyed MAC; cloned for every generation and validation.
    mac: HmacSha256,

    /// Holds the generated connection ID after a call to
    /// [`generate`](Self::generate). Overwritten by subsequent calls.
    connection_id: [u8; CONNECTION_ID_BYTES_LEN],
}

impl ConnectionIdGenerator {
    #[must_use]
    pub fn new(key: &str) -> Self {
        Self {
            mac: HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC can take a key of any size"),
            connection_id: [0u8; CONNECTION_ID_BYTES_LEN],
        }
    }

    /// Generates the 8-byte connection ID for the given client address and
    /// the current time.
    ///
    /// The ID is written into an internal buffer and returned as a borrow;
    /// it will be overwritten by the next call, so callers must copy it
    /// before returning the generator to a pool.
    pub fn generate(&mut self, ip: IpAddr, now: DurationSinceUnixEpoch) -> &[u8; CONNECTION_ID_BYTES_LEN] {
        let timestamp = now.as_secs() as u32;
        self.connection_id[..4].copy_from_slice(&timestamp.to_be_bytes());

        let mut mac = self.mac.clone();
        mac.update(&self.connection_id[..4]);
        update_with_ip(&mut mac, ip);

        let tag = mac.finalize().into_bytes();
        self.connection_id[4..].copy_from_slice(&tag[..4]);

        &self.connection_id
    }

    /// Validates a connection ID received from the given client address.
    ///
    /// The embedded timestamp must be at most [`CONNECTION_ID_LIFETIME`] old
    /// and at most `max_clock_skew` in the future; the truncated tag must
    /// match, compared in constant time.
    ///
    /// # Errors
    ///
    /// Will return an error describing why the connection ID is not
    /// acceptable.
    pub fn validate(
        &mut self,
        connection_id: &[u8; CONNECTION_ID_BYTES_LEN],
        ip: IpAddr,
        now: DurationSinceUnixEpoch,
        max_clock_skew: Duration,
    ) -> Result<(), Error> {
        let timestamp = u32::from_be_bytes([connection_id[0], connection_id[1], connection_id[2], connection_id[3]]);
        let issued_at = Duration::from_secs(u64::from(timestamp));

        if now > issued_at + CONNECTION_ID_LIFETIME {
            return Err(Error::ConnectionIdExpired { issued_at, now });
        }

        if issued_at > now + max_clock_skew {
            return Err(Error::ConnectionIdFromFuture { issued_at, now });
        }

        let mut mac = self.mac.clone();
        mac.update(&connection_id[..4]);
        update_with_ip(&mut mac, ip);

        mac.verify_truncated_left(&connection_id[4..])
            .map_err(|_| Error::ConnectionIdMismatch)
    }
}

/// Feeds the canonical binary form of the address into the MAC: 4 bytes for
/// IPv4 (including IPv4-mapped IPv6 addresses), 16 bytes for IPv6.
fn update_with_ip(mac: &mut HmacSha256, ip: IpAddr) {
    match ip.to_canonical() {
        IpAddr::V4(addr) => mac.update(&addr.octets()),
        IpAddr::V6(addr) => mac.update(&addr.octets()),
    }
}
