//! Announce approval hooks.
//!
//! Hooks run before any frontend state mutation. Each hook inspects the
//! typed request and either admits it or rejects it with a
//! [`crate::error::Error`] variant the frontend turns into a `BitTorrent`
//! failure response. A rejection returns early: the peer store is never
//! touched for a rejected announce.
//!
//! Two hooks are provided: [`client::ClientApproval`] gates on the 6-byte
//! client ID prefix of the announcing peer ID, and
//! [`torrent::TorrentApproval`] gates on the announced info-hash.
pub mod client;
pub mod torrent;

use swarm_tracker_primitives::core::{AnnounceRequest, ScrapeRequest};

use crate::error::Error;

/// A pre-storage approval hook.
///
/// Hooks are cheap, synchronous checks; they perform no I/O. Frontends keep
/// them in a `Vec<Box<dyn Hook>>` and run them in configuration order.
pub trait Hook: Send + Sync {
    /// Decides whether the announce may proceed.
    ///
    /// # Errors
    ///
    /// Will return an error when the request is rejected; the variant says
    /// why.
    fn handle_announce(&self, request: &AnnounceRequest) -> Result<(), Error>;

    /// Decides whether the scrape may proceed.
    ///
    /// Scrapes don't require any protection by default.
    fn handle_scrape(&self, _request: &ScrapeRequest) -> Result<(), Error> {
        Ok(())
    }
}
