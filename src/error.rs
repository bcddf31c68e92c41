//! Error taxonomy shared by every layer of the index.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the index. None of them leave a table in an
/// undefined state.
#[derive(Debug, Error)]
pub enum Error {
    /// The indexed key field of a record was blank.
    #[error("key must not be empty")]
    EmptyKey,

    /// A live record with the same key already exists.
    #[error("duplicate key: {key}")]
    DuplicateKey {
        /// The rejected key.
        key: String,
    },

    /// A field holds text the line format cannot carry: a comma in a key
    /// field, or a line break anywhere.
    #[error("{field} field cannot be stored: {value:?}")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// No Empty or Tombstone slot was reachable within `capacity` probes.
    #[error("table full: no available slot within {capacity} probes")]
    TableFull {
        /// Capacity of the table that rejected the insert.
        capacity: usize,
    },

    /// The key is not live in the table.
    #[error("key not found: {key}")]
    NotFound {
        /// The key that was searched for.
        key: String,
    },

    /// A persisted file could not be opened, read or written.
    #[error("I/O error on {path:?}: {source}")]
    Io {
        /// File the operation was acting on.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Tables must have at least one slot.
    #[error("capacity must be at least 1")]
    InvalidCapacity,
}

impl Error {
    /// Creates a duplicate key error.
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }

    /// Creates an invalid field error.
    pub fn invalid_field(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            value: value.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
