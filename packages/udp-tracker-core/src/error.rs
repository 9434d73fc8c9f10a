//! Error types for the UDP tracker core.
use swarm_tracker_primitives::DurationSinceUnixEpoch;
use thiserror::Error;

/// Error returned when a connection ID fails validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The embedded timestamp is older than the connection ID lifetime.
    #[error("connection id expired: issued at {issued_at:?}, checked at {now:?}")]
    ConnectionIdExpired {
        issued_at: DurationSinceUnixEpoch,
        now: DurationSinceUnixEpoch,
    },

    /// The embedded timestamp lies further in the future than the allowed
    /// clock skew.
    #[error("connection id issued in the future: issued at {issued_at:?}, checked at {now:?}")]
    ConnectionIdFromFuture {
        issued_at: DurationSinceUnixEpoch,
        now: DurationSinceUnixEpoch,
    },

    /// The truncated tag does not match the request's source address.
    #[error("connection id does not match the source address")]
    ConnectionIdMismatch,
}
