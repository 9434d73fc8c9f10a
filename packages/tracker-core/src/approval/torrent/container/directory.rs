//! The directory-watcher container.
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use swarm_tracker_configuration::{DirectoryContainerConfig, HashFormat};
use swarm_tracker_primitives::info_hash::{InfoHash, INFO_HASH_BYTES_LEN};
use tokio::task::JoinHandle;

use super::{BuildError, Container};

/// A set of approved info-hashes fed from a watched directory.
///
/// Every file in the directory holds info-hashes, either as
/// whitespace-separated hex strings or as concatenated 20-byte records,
/// depending on the configured format. The container rescans the whole
/// directory on a fixed interval and swaps the new snapshot in under a
/// single write lock, so readers observe file creations, modifications and
/// deletions atomically.
///
/// The initial scan runs at construction and its failure aborts startup.
/// Later scan failures keep the previous snapshot and are only logged. The
/// lists are expected to be small; the rescan reads them synchronously.
pub struct Directory {
    approved: Arc<RwLock<HashSet<InfoHash>>>,
    watcher: JoinHandle<()>,
}

impl Directory {
    /// Scans the directory once and starts the rescan task.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Will return an error if the initial directory scan fails.
    pub fn new(config: &DirectoryContainerConfig) -> Result<Self, BuildError> {
        let initial = scan(&config.path, config.format).map_err(|source| BuildError::DirectoryScan {
            path: config.path.clone(),
            source,
        })?;

        let approved = Arc::new(RwLock::new(initial));
        let watcher = tokio::spawn(rescan_periodically(approved.clone(), config.clone()));

        Ok(Self { approved, watcher })
    }
}

impl Container for Directory {
    fn contains(&self, info_hash: &InfoHash) -> bool {
        self.approved.read().contains(info_hash)
    }
}

impl Drop for Directory {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

async fn rescan_periodically(approved: Arc<RwLock<HashSet<InfoHash>>>, config: DirectoryContainerConfig) {
    let mut interval = tokio::time::interval(Duration::from_secs(config.poll_interval.max(1)));
    interval.tick().await;

    loop {
        interval.tick().await;

        match scan(&config.path, config.format) {
            Ok(hashes) => {
                *approved.write() = hashes;
            }
            Err(error) => {
                tracing::warn!(
                    path = %config.path.display(),
                    %error,
                    "approval directory rescan failed, keeping the previous snapshot"
                );
            }
        }
    }
}

/// Reads every regular file in `path` and collects the info-hashes it
/// holds. Unparsable tokens are skipped with a warning; I/O failures abort
/// the scan.
fn scan(path: &Path, format: HashFormat) -> io::Result<HashSet<InfoHash>> {
    let mut hashes = HashSet::new();

    for entry in fs::read_dir(path)? {
        let entry = entry?;

        if !entry.file_type()?.is_file() {
            continue;
        }

        let contents = fs::read(entry.path())?;

        match format {
            HashFormat::Hex => {
                for token in String::from_utf8_lossy(&contents).split_whitespace() {
                    match token.parse::<InfoHash>() {
                        Ok(hash) => {
                            hashes.insert(hash);
                        }
                        Err(error) => {
                            tracing::warn!(
                                file = %entry.path().display(),
                                token,
                                %error,
                                "skipping unparsable info hash"
                            );
                        }
                    }
                }
            }
            HashFormat::Binary => {
                let chunks = contents.chunks_exact(INFO_HASH_BYTES_LEN);

                if !chunks.remainder().is_empty() {
                    tracing::warn!(
                        file = %entry.path().display(),
                        trailing = chunks.remainder().len(),
                        "ignoring trailing bytes that do not form a whole info hash"
                    );
                }

                for chunk in chunks {
                    let mut bytes = [0u8; INFO_HASH_BYTES_LEN];
                    bytes.copy_from_slice(chunk);
                    hashes.insert(InfoHash::from(bytes));
                }
            }
        }
    }

    Ok(hashes)
}
