//! Aggregate counts for a single swarm.
use derive_more::derive::Constructor;

/// The aggregate state of one swarm, as reported in a `scrape` response.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Constructor)]
pub struct SwarmMetadata {
    /// The number of active peers that have completed downloading (seeders).
    pub complete: u32,

    /// The number of active peers that have not completed downloading
    /// (leechers).
    pub incomplete: u32,
}

impl SwarmMetadata {
    /// Zeroed metadata, the response for a torrent the tracker does not know.
    #[must_use]
    pub fn zeroed() -> Self {
        Self::default()
    }
}
