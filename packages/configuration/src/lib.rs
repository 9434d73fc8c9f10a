//! Configuration types for the Swarm Tracker.
//!
//! The configuration is loaded once at startup from a TOML document. Every
//! section is optional except the peer store; absent sections disable the
//! corresponding feature. A full document looks like this:
//!
//! ```toml
//! [peer_store]
//! shard_count = 1024
//!
//! [client_approval]
//! whitelist = ["-qB000", "-TR200"]
//!
//! [torrent_approval]
//! initial_source = "directory"
//!
//! [torrent_approval.configuration]
//! path = "/var/lib/tracker/approved"
//! poll_interval = 30
//! format = "hex"
//!
//! [udp_tracker]
//! private_key = "1DVvbHRKL4VmZnfWBFNfEBkWbFTHGiPR"
//! max_clock_skew = 10
//! ```
//!
//! Malformed documents and invalid component options are fatal: startup
//! aborts with an [`Error`]. The one exception is `shard_count`, whose
//! out-of-range values fall back to the default with a warning, see
//! [`PeerStoreConfig::validate`].
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default number of shards per address family in the peer store.
pub const DEFAULT_SHARD_COUNT: usize = 1024;

/// Upper bound for `shard_count`; the store doubles the shard vector to
/// split address families, so the configured value must leave room for that.
const MAX_SHARD_COUNT: usize = usize::MAX / 2;

/// The whole tracker configuration.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Default)]
pub struct Configuration {
    /// Peer store tuning.
    #[serde(default)]
    pub peer_store: PeerStoreConfig,

    /// Client approval middleware; absent means every client is admitted.
    #[serde(default)]
    pub client_approval: Option<ClientApprovalConfig>,

    /// Torrent approval middleware; absent means every torrent is admitted.
    #[serde(default)]
    pub torrent_approval: Option<TorrentApprovalConfig>,

    /// Settings consumed by the UDP tracker frontend.
    #[serde(default)]
    pub udp_tracker: Option<UdpTrackerConfig>,
}

impl Configuration {
    /// Parses a TOML document into a [`Configuration`].
    ///
    /// # Errors
    ///
    /// Will return an error if the document is not valid TOML or does not
    /// match the configuration schema.
    pub fn load_from_toml(raw: &str) -> Result<Self, Error> {
        let configuration = toml::from_str(raw)?;
        Ok(configuration)
    }
}

/// Configuration of the in-memory peer store.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct PeerStoreConfig {
    /// Number of shards per address family. The store allocates twice this
    /// amount: the first half serves IPv4 swarms and the second half IPv6
    /// swarms.
    #[serde(default = "PeerStoreConfig::default_shard_count")]
    pub shard_count: usize,
}

impl Default for PeerStoreConfig {
    fn default() -> Self {
        Self {
            shard_count: Self::default_shard_count(),
        }
    }
}

impl PeerStoreConfig {
    fn default_shard_count() -> usize {
        DEFAULT_SHARD_COUNT
    }

    /// Sanity checks the configured values and returns a copy with default
    /// values replacing anything invalid.
    ///
    /// This function warns to the logger when a value is changed.
    #[must_use]
    pub fn validate(&self) -> Self {
        let mut valid = self.clone();

        if self.shard_count == 0 || self.shard_count > MAX_SHARD_COUNT {
            valid.shard_count = DEFAULT_SHARD_COUNT;
            tracing::warn!(
                provided = self.shard_count,
                default = DEFAULT_SHARD_COUNT,
                "falling back to the default shard count"
            );
        }

        valid
    }
}

/// Configuration of the client approval middleware.
///
/// Both lists hold 6-byte client IDs. It is a configuration error for both
/// lists to be non-empty; length and exclusivity are enforced when the hook
/// is built.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct ClientApprovalConfig {
    /// When non-empty, only these client IDs are admitted.
    #[serde(default)]
    pub whitelist: Vec<String>,

    /// When non-empty, these client IDs are rejected.
    #[serde(default)]
    pub blacklist: Vec<String>,
}

/// Configuration of the torrent approval middleware.
///
/// `initial_source` names the container holding the approved info-hashes and
/// `configuration` carries the container-specific options. Unknown container
/// names and unknown option keys are rejected at load time.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(tag = "initial_source", content = "configuration", rename_all = "snake_case")]
pub enum TorrentApprovalConfig {
    /// A fixed list of approved info-hashes.
    List(ListContainerConfig),

    /// A directory whose files hold the approved info-hashes.
    Directory(DirectoryContainerConfig),
}

/// Options for the static list container.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct ListContainerConfig {
    /// Approved info-hashes as 40-character hex strings.
    #[serde(default)]
    pub hash_list: Vec<String>,
}

/// Options for the directory-watcher container.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct DirectoryContainerConfig {
    /// The watched directory.
    pub path: PathBuf,

    /// Seconds between directory rescans.
    #[serde(default = "DirectoryContainerConfig::default_poll_interval")]
    pub poll_interval: u64,

    /// How the info-hashes inside the files are encoded.
    #[serde(default)]
    pub format: HashFormat,
}

impl DirectoryContainerConfig {
    fn default_poll_interval() -> u64 {
        30
    }
}

/// Encoding of the info-hashes inside watched files.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum HashFormat {
    /// Whitespace-separated 40-character hex strings.
    #[default]
    Hex,

    /// Concatenated 20-byte records.
    Binary,
}

/// Settings consumed by the UDP tracker frontend.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct UdpTrackerConfig {
    /// Secret key for the connection-ID HMAC.
    pub private_key: String,

    /// Seconds of tolerance for connection-ID timestamps from the future,
    /// covering clients whose clocks run ahead of the tracker.
    #[serde(default = "UdpTrackerConfig::default_max_clock_skew")]
    pub max_clock_skew: u64,
}

impl UdpTrackerConfig {
    fn default_max_clock_skew() -> u64 {
        10
    }
}

/// Error raised while loading the configuration.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {source}")]
    Toml {
        #[from]
        source: toml::de::Error,
    },
}
