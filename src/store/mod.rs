//! Durable per-item records and run state
//!
//! This module owns everything the harvester persists between runs:
//! - Item records with their accumulated rating observations
//! - The sharded on-disk record store with atomic writes
//! - The page-cursor checkpoint file

mod checkpoint;
mod records;

pub use checkpoint::Checkpoint;
pub use records::{shard_prefix, RecordStore, StoreStatistics};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One dated rating sample
///
/// At most one observation exists per calendar date; re-harvesting on the
/// same date replaces that date's sample instead of appending.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub average: f64,
    pub count: u64,
}

/// Durable record for one catalog item
///
/// Created on the first successful detail fetch for a key, then loaded and
/// merged on every later harvest. The observation sequence is kept sorted
/// ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub key: String,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub observations: Vec<Observation>,
}

impl ItemRecord {
    /// Creates a fresh record with no identifier and no history
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            identifier: None,
            observations: Vec::new(),
        }
    }

    /// Sets the external identifier if absent or different
    ///
    /// Returns true when the stored value changed.
    pub fn set_identifier(&mut self, identifier: &str) -> bool {
        if self.identifier.as_deref() == Some(identifier) {
            return false;
        }
        self.identifier = Some(identifier.to_string());
        true
    }

    /// Inserts a dated sample, replacing any sample already recorded for
    /// the same date
    ///
    /// The sequence stays sorted ascending by date. Returns true when the
    /// stored content changed; a same-date re-insert with identical values
    /// reports false.
    pub fn upsert_observation(&mut self, observation: Observation) -> bool {
        for existing in &mut self.observations {
            if existing.date == observation.date {
                let changed = existing.average != observation.average
                    || existing.count != observation.count;
                *existing = observation;
                return changed;
            }
        }

        self.observations.push(observation);
        self.observations.sort_by_key(|o| o.date);
        true
    }
}
