//! Randomized delays between fetches
//!
//! Fixed request intervals are an easy crawl signature, so every pause is
//! drawn uniformly from a configured range. Three tiers exist: between the
//! requests for one item, between items on a page, and between pages.

use crate::config::{DelayRange, PacingConfig};
use rand::Rng;
use std::time::Duration;

/// Draws and applies the configured delays
pub struct PacingPolicy {
    config: PacingConfig,
}

impl PacingPolicy {
    pub fn new(config: PacingConfig) -> Self {
        Self { config }
    }

    /// Pause between consecutive requests for the same item
    pub async fn between_requests(&self) {
        self.pause(self.config.request).await;
    }

    /// Pause between items on a listing page
    pub async fn between_items(&self) {
        self.pause(self.config.item).await;
    }

    /// Pause between listing pages
    pub async fn between_pages(&self) {
        self.pause(self.config.page).await;
    }

    async fn pause(&self, range: DelayRange) {
        // The rng handle is not Send, so the draw happens before the await
        let delay = draw_delay(range);
        tokio::time::sleep(delay).await;
    }
}

fn draw_delay(range: DelayRange) -> Duration {
    let millis = if range.max_ms <= range.min_ms {
        range.min_ms
    } else {
        rand::thread_rng().gen_range(range.min_ms..=range.max_ms)
    };
    Duration::from_millis(millis)
}
