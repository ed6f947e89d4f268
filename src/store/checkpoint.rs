//! Page cursor persistence
//!
//! A single text file holding the next listing page to process. Written at
//! the end of every run so an interrupted harvest resumes where it left off
//! instead of re-walking the catalog from the top.

use crate::StoreError;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Handle to the cursor file
pub struct Checkpoint {
    path: PathBuf,
}

impl Checkpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the next page to process
    ///
    /// An absent file means a first run and yields page 1. Unreadable or
    /// malformed content is logged at WARN and also yields page 1; starting
    /// over costs time but never skips catalog entries.
    pub fn load(&self) -> u32 {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return 1,
            Err(e) => {
                tracing::warn!("Unreadable checkpoint {}: {}", self.path.display(), e);
                return 1;
            }
        };

        match content.trim().parse::<u32>() {
            Ok(page) if page >= 1 => {
                tracing::info!("Resuming from page {}", page);
                page
            }
            _ => {
                tracing::warn!(
                    "Invalid checkpoint content {:?}, starting from page 1",
                    content.trim()
                );
                1
            }
        }
    }

    /// Writes the next page to process
    pub fn save(&self, page: u32) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, page.to_string())?;
        Ok(())
    }
}
