//! Containers holding the set of approved torrents.
//!
//! A container answers one question: is this info-hash approved? The
//! available containers are enumerated at compile time by
//! [`TorrentApprovalConfig`]: the `initial_source` key selects the variant
//! and [`build`] constructs it. There is no process-global driver table.
pub mod directory;
pub mod list;

use std::path::PathBuf;

use swarm_tracker_configuration::TorrentApprovalConfig;
use swarm_tracker_primitives::info_hash::{InfoHash, ParseInfoHashError};

/// A set of approved torrents.
///
/// Implementations may update the set asynchronously over the process
/// lifetime; updates are atomic from a reader's perspective.
pub trait Container: Send + Sync {
    /// Whether announces for this torrent are approved.
    fn contains(&self, info_hash: &InfoHash) -> bool;
}

/// Builds the container selected by the configuration.
///
/// # Errors
///
/// Will return an error if the container's initial contents cannot be
/// loaded.
pub fn build(config: &TorrentApprovalConfig) -> Result<Box<dyn Container>, BuildError> {
    match config {
        TorrentApprovalConfig::List(config) => Ok(Box::new(list::List::new(config)?)),
        TorrentApprovalConfig::Directory(config) => Ok(Box::new(directory::Directory::new(config)?)),
    }
}

/// Errors raised while building a container.
#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    /// A configured hash list entry is not a valid info-hash.
    #[error("invalid info hash {value:?} in hash list: {source}")]
    InvalidHashList {
        value: String,
        source: ParseInfoHashError,
    },

    /// The initial scan of the approval directory failed.
    #[error("cannot scan approval directory {path}: {source}", path = .path.display())]
    DirectoryScan {
        path: PathBuf,
        source: std::io::Error,
    },
}
