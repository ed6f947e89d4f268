//! Run progress events
//!
//! The driver reports what it is doing through a sink rather than logging
//! inline, so the same run logic serves the CLI (logged) and the tests
//! (recorded and asserted on).

/// Something the driver did or decided during a run
#[derive(Debug, Clone, PartialEq)]
pub enum HarvestEvent {
    /// A listing page is about to be processed
    PageStarted { page: u32 },

    /// The page's lead item reported its viewer count
    PopularitySampled { key: String, viewers: u64 },

    /// The page's lead item has no readable viewer count
    PopularityUnavailable { key: String },

    /// The page's lead item fell below the popularity floor
    PopularityBelowFloor { viewers: u64, floor: u64 },

    /// An item record was written
    ItemSaved {
        key: String,
        identifier: String,
        /// Whether the write changed the record's content
        changed: bool,
    },

    /// An item has no external identifier and no stored record to remove
    ItemUnresolved { key: String },

    /// An item lost its external identifier and its record was removed
    ItemRemoved { key: String },

    /// A listing page came back empty
    ListingExhausted { page: u32 },

    /// The wall-clock budget ran out
    BudgetExpired { page: u32 },
}

/// Receiver for driver events
pub trait EventSink: Send + Sync {
    fn emit(&self, event: HarvestEvent);
}

/// Sink that forwards events to the log
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: HarvestEvent) {
        match event {
            HarvestEvent::PageStarted { page } => {
                tracing::info!("Processing listing page {}", page);
            }
            HarvestEvent::PopularitySampled { key, viewers } => {
                tracing::info!("{}: {} viewers", key, viewers);
            }
            HarvestEvent::PopularityUnavailable { key } => {
                tracing::warn!("No viewer count for {}, stopping run", key);
            }
            HarvestEvent::PopularityBelowFloor { viewers, floor } => {
                tracing::info!(
                    "Fewer than {} viewers ({}), resetting to page 1",
                    floor,
                    viewers
                );
            }
            HarvestEvent::ItemSaved {
                key,
                identifier,
                changed,
            } => {
                if changed {
                    tracing::info!("Saved {} (id {})", key, identifier);
                } else {
                    tracing::debug!("{} unchanged", key);
                }
            }
            HarvestEvent::ItemUnresolved { key } => {
                tracing::warn!("No external identifier for {}", key);
            }
            HarvestEvent::ItemRemoved { key } => {
                tracing::info!("Removed {} (no external identifier)", key);
            }
            HarvestEvent::ListingExhausted { page } => {
                tracing::info!("Listing exhausted at page {}, resetting to page 1", page);
            }
            HarvestEvent::BudgetExpired { page } => {
                tracing::info!("Time budget expired at page {}", page);
            }
        }
    }
}
