//! The static list container.
use std::collections::HashSet;

use swarm_tracker_configuration::ListContainerConfig;
use swarm_tracker_primitives::info_hash::InfoHash;

use super::{BuildError, Container};

/// A fixed set of approved info-hashes loaded from the configuration.
#[derive(Debug, Default)]
pub struct List {
    hashes: HashSet<InfoHash>,
}

impl List {
    /// Parses the configured hex entries.
    ///
    /// # Errors
    ///
    /// Will return an error if any entry is not a valid info-hash.
    pub fn new(config: &ListContainerConfig) -> Result<Self, BuildError> {
        let hashes = config
            .hash_list
            .iter()
            .map(|entry| {
                entry.parse::<InfoHash>().map_err(|source| BuildError::InvalidHashList {
                    value: entry.clone(),
                    source,
                })
            })
            .collect::<Result<HashSet<InfoHash>, BuildError>>()?;

        Ok(Self { hashes })
    }
}

impl Container for List {
    fn contains(&self, info_hash: &InfoHash) -> bool {
        self.hashes.contains(info_hash)
    }
}
