//! Statistics reporting for the record store
//!
//! This module provides functionality for summarizing and displaying
//! the state of the on-disk record store.

use crate::store::{RecordStore, StoreStatistics};
use crate::StoreError;

/// Loads statistics by scanning the record store
///
/// # Arguments
///
/// * `store` - The record store to scan
///
/// # Returns
///
/// * `Ok(StoreStatistics)` - Successfully scanned store
/// * `Err(StoreError)` - Failed to walk the store directories
pub fn load_statistics(store: &RecordStore) -> Result<StoreStatistics, StoreError> {
    store.scan()
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Record Store Statistics ===\n");

    let resolved_rate = if stats.total_records > 0 {
        (stats.resolved_records as f64 / stats.total_records as f64) * 100.0
    } else {
        0.0
    };
    let observations_per_record = if stats.total_records > 0 {
        stats.total_observations as f64 / stats.total_records as f64
    } else {
        0.0
    };

    println!("Overview:");
    println!("  Total records: {}", stats.total_records);
    println!(
        "  Resolved: {} ({:.1}%)",
        stats.resolved_records, resolved_rate
    );
    println!("  Unresolved: {}", stats.unresolved_records);
    println!(
        "  Observations: {} ({:.1} per record)",
        stats.total_observations, observations_per_record
    );
    println!();

    println!("Integrity:");
    println!("  Shard directories: {}", stats.shard_directories);
    println!("  Corrupt files: {}", stats.corrupt_files);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ItemRecord, Observation};
    use tempfile::TempDir;

    #[test]
    fn test_load_statistics_from_store() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path());

        let mut resolved = ItemRecord::new("the-godfather");
        resolved.set_identifier("238");
        resolved.upsert_observation(Observation {
            date: "2026-08-25".parse().unwrap(),
            average: 4.5,
            count: 1_000_000,
        });
        store.save(&resolved).unwrap();
        store.save(&ItemRecord::new("unmapped-short")).unwrap();

        let stats = load_statistics(&store).unwrap();
        assert_eq!(stats.total_records, 2);
        assert_eq!(stats.resolved_records, 1);
        assert_eq!(stats.unresolved_records, 1);
        assert_eq!(stats.total_observations, 1);
        assert_eq!(stats.corrupt_files, 0);
    }

    #[test]
    fn test_load_statistics_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("records"));

        let stats = load_statistics(&store).unwrap();
        assert_eq!(stats, StoreStatistics::default());
    }
}
