//! probe-directory: a fixed-capacity, open-addressed record index with
//! linear probing, lazy deletion and a coordinator that keeps two indices
//! over the same records in step.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small directory engine whose placement, probing and deletion
//!   rules can each be checked on their own.
//! - Layers:
//!   - `hash` / `probe`: pure functions. A key maps to a home slot; the
//!     probe sequence from there is `(home + attempt) mod capacity`.
//!   - `SlotTable`: a contiguous array of `Slot::{Empty, Occupied,
//!     Tombstone}` keyed on one field of `Record`. Owns every record it
//!     holds; lookups hand out borrows only.
//!   - `DualIndex`: owns one `SlotTable` per key field and keeps them in
//!     step procedurally (insert-then-rollback, delete-independently).
//!   - `codec` / `persist`: one comma-delimited line per record, one file
//!     per table.
//!
//! Constraints
//! - Capacity is fixed at construction; a table never grows or rehashes.
//! - Every probe walk is bounded by `capacity`, so lookups on a table full
//!   of tombstones still terminate.
//! - Tombstones never end a search; only a never-written `Empty` slot does.
//!   They are reused by later inserts and reset only by `clear`.
//! - Duplicate inserts fail; records are never overwritten in place.
//! - Single-threaded: all mutation takes `&mut self`. Sharing a
//!   `DualIndex` across threads needs one lock around the whole index.
//!
//! Hash selection
//! - Each table is built with one `HashStrategy` and keeps it. Switching
//!   strategy on a populated table would strand existing records.
//!
//! Notes and non-goals
//! - No resizing, no non-string keys, no ordering beyond slot index.
//! - `DualIndex::remove` succeeds when either table removed the record.
//!   Insert is all-or-nothing, delete is not.
//! - Logging goes through `tracing`; the crate installs no subscriber.

pub mod codec;
pub mod config;
pub mod dual_index;
pub mod error;
pub mod hash;
pub mod persist;
pub mod probe;
pub mod record;
pub mod slot_table;
mod slot_table_proptest;

// Public surface
pub use config::Config;
pub use dual_index::DualIndex;
pub use error::{Error, Result};
pub use hash::HashStrategy;
pub use record::{KeyField, Record};
pub use slot_table::{Lookup, Slot, SlotTable, TableStats};
