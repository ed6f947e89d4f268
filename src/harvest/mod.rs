//! Harvest module for catalog traversal and item processing
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with retry, backoff, and identity rotation
//! - HTML extraction of keys, identifiers, and ratings
//! - Randomized pacing between requests
//! - Overall run orchestration under a wall-clock budget

mod client;
mod driver;
mod events;
pub mod extract;
mod pacing;
mod site;

pub use client::{FetchClient, FetchResponse};
pub use driver::{run_harvest, RunDriver, RunSummary, StopCause};
pub use events::{EventSink, HarvestEvent, LogSink};
pub use pacing::PacingPolicy;
pub use site::Site;
