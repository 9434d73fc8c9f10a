//! Hook that fails an announce based on a whitelist or blacklist of
//! `BitTorrent` client IDs.
use std::collections::HashSet;
use std::panic::Location;

use swarm_tracker_configuration::ClientApprovalConfig;
use swarm_tracker_primitives::core::AnnounceRequest;
use swarm_tracker_primitives::peer::{ClientId, CLIENT_ID_BYTES_LEN};

use super::Hook;
use crate::error::Error;

/// Client approval hook.
///
/// At most one of the two sets is non-empty. With a whitelist, only listed
/// client IDs are admitted; with a blacklist, listed client IDs are
/// rejected.
#[derive(Debug, Default)]
pub struct ClientApproval {
    approved: HashSet<ClientId>,
    unapproved: HashSet<ClientId>,
}

impl ClientApproval {
    /// Builds the hook from its configuration.
    ///
    /// # Errors
    ///
    /// Will return an error if both lists are populated, or if any entry is
    /// not exactly 6 bytes.
    pub fn new(config: &ClientApprovalConfig) -> Result<Self, ClientApprovalError> {
        if !config.whitelist.is_empty() && !config.blacklist.is_empty() {
            return Err(ClientApprovalError::BothListsConfigured);
        }

        Ok(Self {
            approved: parse_client_ids(&config.whitelist)?,
            unapproved: parse_client_ids(&config.blacklist)?,
        })
    }
}

fn parse_client_ids(entries: &[String]) -> Result<HashSet<ClientId>, ClientApprovalError> {
    entries
        .iter()
        .map(|entry| {
            ClientId::try_from(entry.as_bytes()).map_err(|_| ClientApprovalError::InvalidClientId {
                value: entry.clone(),
                expected: CLIENT_ID_BYTES_LEN,
            })
        })
        .collect()
}

impl Hook for ClientApproval {
    fn handle_announce(&self, request: &AnnounceRequest) -> Result<(), Error> {
        let client_id = request.client_id();

        if !self.approved.is_empty() && !self.approved.contains(&client_id) {
            return Err(Error::ClientUnapproved {
                client_id,
                location: Location::caller(),
            });
        }

        if !self.unapproved.is_empty() && self.unapproved.contains(&client_id) {
            return Err(Error::ClientUnapproved {
                client_id,
                location: Location::caller(),
            });
        }

        Ok(())
    }
}

/// Errors raised while building the client approval hook.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientApprovalError {
    /// The whitelist and the blacklist are mutually exclusive.
    #[error("using both whitelist and blacklist is invalid")]
    BothListsConfigured,

    /// A configured client ID has the wrong length.
    #[error("client ID {value:?} must be exactly {expected} bytes")]
    InvalidClientId { value: String, expected: usize },
}
