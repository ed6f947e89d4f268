//! Run driver - main harvest orchestration logic
//!
//! This module contains the main harvest loop that coordinates all aspects
//! of a run, including:
//! - Resuming from the page cursor or starting fresh
//! - Enforcing the wall-clock budget at page granularity
//! - Sampling popularity to decide whether a page is still worth walking
//! - Resolving, rating, and persisting each item on a page
//! - Persisting the cursor so the next run continues where this one stopped

use crate::config::Config;
use crate::harvest::{EventSink, FetchClient, HarvestEvent, LogSink, PacingPolicy, Site};
use crate::store::{Checkpoint, Observation, RecordStore};
use crate::Result;
use std::time::{Duration, Instant};

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopCause {
    /// The wall-clock budget ran out; the cursor points at the next unvisited
    /// page
    BudgetExpired,

    /// A listing page came back empty; the cursor was reset to page 1
    ListingExhausted,

    /// The lead item of a page fell below the popularity floor; the cursor
    /// was reset to page 1
    PopularityFloor,

    /// The lead item's popularity could not be read; the cursor keeps
    /// pointing at the same page for a retry
    PopularityUnavailable,
}

/// What a run accomplished
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Listing pages fully processed
    pub pages_processed: u32,

    /// Item records written
    pub items_saved: u32,

    /// Item records removed after losing their identifier
    pub items_removed: u32,

    /// Page the persisted cursor now points at
    pub final_page: u32,

    /// Why the loop stopped
    pub stop: StopCause,
}

/// Outcome of processing a single item
enum ItemOutcome {
    Saved,
    Removed,
    Unresolved,
    SaveFailed,
}

/// Main run driver structure
pub struct RunDriver {
    site: Site,
    store: RecordStore,
    checkpoint: Checkpoint,
    pacing: PacingPolicy,
    events: Box<dyn EventSink>,
    fresh: bool,
    budget: Duration,
    popularity_floor: u64,
}

impl RunDriver {
    /// Creates a new run driver
    ///
    /// # Arguments
    ///
    /// * `config` - The harvester configuration
    /// * `fresh` - Whether to ignore the stored cursor and start at page 1
    ///
    /// # Returns
    ///
    /// * `Ok(RunDriver)` - Successfully created driver
    /// * `Err(HarvestError)` - Failed to initialize
    pub fn new(config: Config, fresh: bool) -> Result<Self> {
        Self::with_sink(config, fresh, Box::new(LogSink))
    }

    /// Creates a run driver reporting to a custom event sink
    pub fn with_sink(config: Config, fresh: bool, events: Box<dyn EventSink>) -> Result<Self> {
        let client = FetchClient::new(config.fetch.clone())?;
        let site = Site::new(client, config.source.clone());

        Ok(Self {
            site,
            store: RecordStore::new(&config.store.root),
            checkpoint: Checkpoint::new(&config.store.checkpoint),
            pacing: PacingPolicy::new(config.pacing.clone()),
            events,
            fresh,
            budget: Duration::from_secs(config.run.time_budget_secs),
            popularity_floor: config.run.popularity_floor,
        })
    }

    /// Runs the main harvest loop
    ///
    /// This is the core logic that:
    /// 1. Resumes from the stored cursor, or page 1 when fresh
    /// 2. Checks the wall-clock budget before each page
    /// 3. Fetches the listing page; an empty page resets the cursor and stops
    /// 4. Samples the lead item's viewer count; below the floor resets the
    ///    cursor and stops, unreadable stops with the cursor kept in place
    /// 5. Processes every item on the page, pacing between them
    /// 6. Advances the cursor, paces, and goes back to 2
    ///
    /// Whatever stops the loop, the cursor is persisted before returning;
    /// failing to persist it is the one error a run surfaces.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let started = Instant::now();
        let mut page = if self.fresh { 1 } else { self.checkpoint.load() };

        let mut pages_processed = 0u32;
        let mut items_saved = 0u32;
        let mut items_removed = 0u32;

        let stop = loop {
            if started.elapsed() > self.budget {
                self.events.emit(HarvestEvent::BudgetExpired { page });
                break StopCause::BudgetExpired;
            }

            self.events.emit(HarvestEvent::PageStarted { page });

            let keys = self.site.listing_keys(page).await;
            let Some(first) = keys.first() else {
                self.events.emit(HarvestEvent::ListingExhausted { page });
                page = 1;
                break StopCause::ListingExhausted;
            };

            // The listing is ranked, so the first item bounds the page's
            // popularity
            match self.site.viewer_count(first).await {
                None => {
                    self.events.emit(HarvestEvent::PopularityUnavailable {
                        key: first.clone(),
                    });
                    break StopCause::PopularityUnavailable;
                }
                Some(viewers) if viewers < self.popularity_floor => {
                    self.events.emit(HarvestEvent::PopularityBelowFloor {
                        viewers,
                        floor: self.popularity_floor,
                    });
                    page = 1;
                    break StopCause::PopularityFloor;
                }
                Some(viewers) => {
                    self.events.emit(HarvestEvent::PopularitySampled {
                        key: first.clone(),
                        viewers,
                    });
                }
            }

            for key in &keys {
                match self.process_item(key).await {
                    ItemOutcome::Saved => items_saved += 1,
                    ItemOutcome::Removed => items_removed += 1,
                    ItemOutcome::Unresolved | ItemOutcome::SaveFailed => {}
                }
                self.pacing.between_items().await;
            }

            pages_processed += 1;
            page += 1;
            self.pacing.between_pages().await;
        };

        self.checkpoint.save(page)?;

        let summary = RunSummary {
            pages_processed,
            items_saved,
            items_removed,
            final_page: page,
            stop,
        };

        tracing::info!(
            "Run finished in {:?}: {} pages, {} items saved, {} removed, cursor at page {}",
            started.elapsed(),
            summary.pages_processed,
            summary.items_saved,
            summary.items_removed,
            summary.final_page
        );

        Ok(summary)
    }

    /// Processes a single item
    ///
    /// This method:
    /// 1. Loads the stored record, if any
    /// 2. Resolves the external identifier, preferring the stored one over a
    ///    detail-page fetch
    /// 3. Items without an identifier have their record removed
    /// 4. Fetches the current rating and merges it into the record
    /// 5. Writes the record back
    ///
    /// Per-item failures are absorbed; one broken item never stops a page.
    async fn process_item(&self, key: &str) -> ItemOutcome {
        let mut record = self.store.load(key);

        let identifier = match record.identifier.clone() {
            Some(identifier) => Some(identifier),
            None => self.site.external_id(key).await,
        };

        let Some(identifier) = identifier else {
            // No external identifier means the item fell out of the mapped
            // catalog; drop whatever we stored for it
            return match self.store.delete(key) {
                Ok(true) => {
                    self.events.emit(HarvestEvent::ItemRemoved {
                        key: key.to_string(),
                    });
                    ItemOutcome::Removed
                }
                Ok(false) => {
                    self.events.emit(HarvestEvent::ItemUnresolved {
                        key: key.to_string(),
                    });
                    ItemOutcome::Unresolved
                }
                Err(e) => {
                    tracing::error!("Failed to remove record for {}: {}", key, e);
                    ItemOutcome::Unresolved
                }
            };
        };

        let identifier_changed = record.set_identifier(&identifier);

        self.pacing.between_requests().await;

        let rating_changed = match self.site.rating_summary(key).await {
            Some((average, count)) => record.upsert_observation(Observation {
                date: chrono::Local::now().date_naive(),
                average,
                count,
            }),
            None => false,
        };

        match self.store.save(&record) {
            Ok(()) => {
                self.events.emit(HarvestEvent::ItemSaved {
                    key: key.to_string(),
                    identifier,
                    changed: identifier_changed || rating_changed,
                });
                ItemOutcome::Saved
            }
            Err(e) => {
                tracing::error!("Failed to save record for {}: {}", key, e);
                ItemOutcome::SaveFailed
            }
        }
    }
}

/// Runs a complete harvest
///
/// This function orchestrates one time-boxed run:
///
/// 1. Resume from the stored cursor or start fresh
/// 2. Walk listing pages in rank order
/// 3. Resolve, rate, and persist every item encountered
/// 4. Stop on budget expiry, an exhausted listing, or the popularity floor
/// 5. Persist the cursor for the next run
///
/// # Arguments
///
/// * `config` - The harvester configuration
/// * `fresh` - Whether to ignore the stored cursor and start at page 1
///
/// # Returns
///
/// * `Ok(RunSummary)` - The run completed and the cursor was persisted
/// * `Err(HarvestError)` - Initialization or cursor persistence failed
///
/// # Example
///
/// ```no_run
/// use rating_harvest::config::load_config;
/// use rating_harvest::harvest::run_harvest;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let summary = run_harvest(config, false).await?;
/// println!("saved {} items", summary.items_saved);
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(config: Config, fresh: bool) -> Result<RunSummary> {
    let mut driver = RunDriver::new(config, fresh)?;
    driver.run().await
}
