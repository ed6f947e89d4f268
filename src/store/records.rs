//! Sharded on-disk record store
//!
//! One JSON file per item key, spread across 256 shard directories named by
//! the first two hex characters of the key's SHA-256. Writes go through a
//! sibling temporary file and an atomic rename, so a process kill mid-save
//! never leaves a half-written record visible.

use crate::store::ItemRecord;
use crate::StoreError;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Store-wide tallies produced by [`RecordStore::scan`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStatistics {
    /// Readable record files
    pub total_records: u64,

    /// Records that carry an external identifier
    pub resolved_records: u64,

    /// Records still waiting for an identifier
    pub unresolved_records: u64,

    /// Observations summed over all records
    pub total_observations: u64,

    /// Files that exist but could not be parsed
    pub corrupt_files: u64,

    /// Shard directories present under the root
    pub shard_directories: u64,
}

/// Returns the shard directory name for a key
///
/// The prefix is the first two hex characters of the key's SHA-256, so the
/// same key maps to the same shard forever, across runs and processes.
pub fn shard_prefix(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..1])
}

/// File-per-record store rooted at a single directory
pub struct RecordStore {
    root: PathBuf,
}

impl RecordStore {
    /// Creates a store handle; the root directory is created lazily on the
    /// first save
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the record file path for a key: `<root>/<hh>/<key>.json`
    pub fn record_path(&self, key: &str) -> PathBuf {
        self.root
            .join(shard_prefix(key))
            .join(format!("{}.json", key))
    }

    /// Loads the record for a key, or a fresh empty one
    ///
    /// An absent file means the key was never harvested. An unreadable or
    /// corrupt file is logged at WARN and also treated as absent, so one
    /// bad file cannot halt a run; the next save replaces it.
    pub fn load(&self, key: &str) -> ItemRecord {
        let path = self.record_path(key);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return ItemRecord::new(key);
            }
            Err(e) => {
                tracing::warn!("Unreadable record {}: {}", path.display(), e);
                return ItemRecord::new(key);
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Corrupt record {}: {}", path.display(), e);
                ItemRecord::new(key)
            }
        }
    }

    /// Saves a record atomically
    ///
    /// The serialized content is written to a sibling `.tmp` path and
    /// renamed over the destination, so an interruption at any point leaves
    /// either the previous record or the new one, never a torn file. Shard
    /// directories are created on demand.
    pub fn save(&self, record: &ItemRecord) -> Result<(), StoreError> {
        let path = self.record_path(&record.key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let bytes =
            serde_json::to_vec_pretty(record).map_err(|source| StoreError::Serialize {
                key: record.key.clone(),
                source,
            })?;

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Removes the record file for a key
    ///
    /// Returns whether a file was actually removed; deleting a key that has
    /// no record is a no-op, not an error.
    pub fn delete(&self, key: &str) -> Result<bool, StoreError> {
        match fs::remove_file(self.record_path(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Walks every shard directory and tallies the store contents
    ///
    /// A missing root directory counts as an empty store. Leftover `.tmp`
    /// files from an interrupted save are skipped; unparsable `.json` files
    /// are counted as corrupt.
    pub fn scan(&self) -> Result<StoreStatistics, StoreError> {
        let mut stats = StoreStatistics::default();

        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(stats),
            Err(e) => return Err(e.into()),
        };

        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            stats.shard_directories += 1;
            self.scan_shard(&entry.path(), &mut stats)?;
        }

        Ok(stats)
    }

    fn scan_shard(&self, shard: &Path, stats: &mut StoreStatistics) -> Result<(), StoreError> {
        for entry in fs::read_dir(shard)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let record: ItemRecord = match fs::read(&path)
                .ok()
                .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            {
                Some(record) => record,
                None => {
                    tracing::warn!("Corrupt record {}", path.display());
                    stats.corrupt_files += 1;
                    continue;
                }
            };

            stats.total_records += 1;
            if record.identifier.is_some() {
                stats.resolved_records += 1;
            } else {
                stats.unresolved_records += 1;
            }
            stats.total_observations += record.observations.len() as u64;
        }
        Ok(())
    }
}
