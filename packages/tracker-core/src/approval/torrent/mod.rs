//! Hook that fails an announce based on a container of approved torrent
//! info-hashes.
pub mod container;

use std::panic::Location;

use swarm_tracker_configuration::TorrentApprovalConfig;
use swarm_tracker_primitives::core::AnnounceRequest;

use self::container::Container;
use super::Hook;
use crate::error::Error;

/// Torrent approval hook.
///
/// An announce is admitted iff the configured [`Container`] contains the
/// announced info-hash. Scrapes are always admitted.
pub struct TorrentApproval {
    hash_container: Box<dyn Container>,
}

impl TorrentApproval {
    /// Builds the hook with the container selected by the configuration.
    ///
    /// # Errors
    ///
    /// Will return an error if the container cannot be built; container
    /// construction failures are configuration errors and abort startup.
    pub fn new(config: &TorrentApprovalConfig) -> Result<Self, container::BuildError> {
        Ok(Self {
            hash_container: container::build(config)?,
        })
    }

    /// Builds the hook around an existing container.
    #[must_use]
    pub fn with_container(hash_container: Box<dyn Container>) -> Self {
        Self { hash_container }
    }
}

impl Hook for TorrentApproval {
    fn handle_announce(&self, request: &AnnounceRequest) -> Result<(), Error> {
        if self.hash_container.contains(&request.info_hash) {
            return Ok(());
        }

        Err(Error::TorrentUnapproved {
            info_hash: request.info_hash,
            location: Location::caller(),
        })
    }
}
