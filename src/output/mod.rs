//! Output module for reporting on harvested data
//!
//! This module handles:
//! - Summarizing the record store contents
//! - Printing human-readable statistics

pub mod stats;

pub use stats::{load_statistics, print_statistics};
