//! Construction-time configuration.

use crate::error::{Error, Result};
use crate::hash::HashStrategy;
use std::path::PathBuf;

/// Default number of slots per table.
pub const DEFAULT_CAPACITY: usize = 30;

/// Settings for building a [`SlotTable`](crate::SlotTable) or a
/// [`DualIndex`](crate::DualIndex).
#[derive(Debug, Clone)]
pub struct Config {
    /// Slots per table. Never grows.
    pub capacity: usize,

    /// Home-slot function used by every table built from this config.
    pub hash: HashStrategy,

    /// File holding the table keyed on the primary field.
    pub primary_path: PathBuf,

    /// File holding the table keyed on the secondary field.
    pub secondary_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            hash: HashStrategy::ByteSum,
            primary_path: PathBuf::from("data/records_primary.txt"),
            secondary_path: PathBuf::from("data/records_secondary.txt"),
        }
    }
}

impl Config {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-table capacity.
    #[must_use]
    pub const fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the hash strategy.
    #[must_use]
    pub const fn hash(mut self, hash: HashStrategy) -> Self {
        self.hash = hash;
        self
    }

    /// Sets the primary table's file.
    #[must_use]
    pub fn primary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.primary_path = path.into();
        self
    }

    /// Sets the secondary table's file.
    #[must_use]
    pub fn secondary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.secondary_path = path.into();
        self
    }

    /// Rejects a zero capacity with [`Error::InvalidCapacity`].
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::InvalidCapacity);
        }
        Ok(())
    }
}
