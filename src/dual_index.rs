//! DualIndex: two SlotTables over the same records, one keyed on the
//! primary field and one on the secondary field, kept in step by
//! procedure rather than cross-references.
//!
//! Insert is all-or-nothing: both tables are attempted and any half that
//! succeeded is rolled back if the other failed. Delete is permissive: it
//! succeeds if *either* table removed the record, which tolerates records
//! left in one table by an earlier partial failure but can also leave the
//! tables out of step. Callers must not assume deletes are symmetric.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::hash::HashStrategy;
use crate::record::{KeyField, Record};
use crate::slot_table::{Lookup, SlotTable, TableStats};
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Clone, Debug)]
pub struct DualIndex {
    primary: SlotTable,
    secondary: SlotTable,
}

impl DualIndex {
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_hash(capacity, HashStrategy::default())
    }

    pub fn with_hash(capacity: usize, hash: HashStrategy) -> Result<Self> {
        Ok(Self {
            primary: SlotTable::with_hash(capacity, KeyField::Primary, hash)?,
            secondary: SlotTable::with_hash(capacity, KeyField::Secondary, hash)?,
        })
    }

    pub fn with_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Self::with_hash(config.capacity, config.hash)
    }

    /// Table keyed on [`Record::primary`]. Read-only so that every mutation
    /// goes through the coordinator.
    pub fn primary(&self) -> &SlotTable {
        &self.primary
    }

    /// Table keyed on [`Record::secondary`].
    pub fn secondary(&self) -> &SlotTable {
        &self.secondary
    }

    pub fn capacity(&self) -> usize {
        self.primary.capacity()
    }

    /// Insert into both tables or neither.
    ///
    /// Both inserts are always attempted. On failure the error from the
    /// primary table wins; a rolled-back half leaves a Tombstone behind.
    pub fn insert(&mut self, record: Record) -> Result<()> {
        let in_primary = self.primary.insert(record.clone());
        let in_secondary = self.secondary.insert(record.clone());
        match (in_primary, in_secondary) {
            (Ok(_), Ok(_)) => Ok(()),
            (Ok(_), Err(e)) => {
                match self.primary.remove(&record.primary) {
                    Ok(_) => {
                        debug!(primary = %record.primary, error = %e, "rolled back primary insert")
                    }
                    Err(rb) => {
                        warn!(primary = %record.primary, error = %rb, "primary rollback failed")
                    }
                }
                Err(e)
            }
            (Err(e), Ok(_)) => {
                match self.secondary.remove(&record.secondary) {
                    Ok(_) => {
                        debug!(secondary = %record.secondary, error = %e, "rolled back secondary insert")
                    }
                    Err(rb) => {
                        warn!(secondary = %record.secondary, error = %rb, "secondary rollback failed")
                    }
                }
                Err(e)
            }
            (Err(e), Err(_)) => Err(e),
        }
    }

    /// Remove `record`'s primary key from the primary table and its
    /// secondary key from the secondary table, independently. Returns true
    /// if either removal happened.
    pub fn remove(&mut self, record: &Record) -> bool {
        let from_primary = self.primary.remove(&record.primary).is_ok();
        let from_secondary = self.secondary.remove(&record.secondary).is_ok();
        if from_primary != from_secondary {
            warn!(
                primary = %record.primary,
                secondary = %record.secondary,
                from_primary,
                from_secondary,
                "record removed from only one table"
            );
        }
        from_primary || from_secondary
    }

    /// Look `key` up in the primary table and remove the record it names
    /// from both tables. Returns the removed record.
    pub fn remove_by_primary(&mut self, key: &str) -> Result<Record> {
        let record = self
            .primary
            .search(key)
            .cloned()
            .ok_or_else(|| Error::not_found(key))?;
        self.remove(&record);
        Ok(record)
    }

    /// Look `key` up in the secondary table and remove the record it names
    /// from both tables. Returns the removed record.
    pub fn remove_by_secondary(&mut self, key: &str) -> Result<Record> {
        let record = self
            .secondary
            .search(key)
            .cloned()
            .ok_or_else(|| Error::not_found(key))?;
        self.remove(&record);
        Ok(record)
    }

    pub fn lookup_by_primary(&self, key: &str) -> Option<&Record> {
        self.primary.search(key)
    }

    pub fn lookup_by_secondary(&self, key: &str) -> Option<&Record> {
        self.secondary.search(key)
    }

    pub fn find_primary(&self, key: &str) -> Lookup {
        self.primary.find(key)
    }

    pub fn find_secondary(&self, key: &str) -> Lookup {
        self.secondary.find(key)
    }

    pub fn stats(&self) -> (TableStats, TableStats) {
        (self.primary.stats(), self.secondary.stats())
    }

    pub fn clear(&mut self) {
        self.primary.clear();
        self.secondary.clear();
    }

    /// Save each table to its own file. Returns `(primary, secondary)` counts.
    pub fn save(&self, config: &Config) -> Result<(usize, usize)> {
        let saved_primary = self.primary.save_to_file(&config.primary_path)?;
        let saved_secondary = self.secondary.save_to_file(&config.secondary_path)?;
        Ok((saved_primary, saved_secondary))
    }

    /// Clear both tables and load each from its own file. A missing file
    /// leaves that table empty. Returns the primary table's loaded count.
    pub fn reload(&mut self, config: &Config) -> Result<usize> {
        self.clear();
        let loaded = load_if_present(&mut self.primary, &config.primary_path)?;
        let loaded_secondary = load_if_present(&mut self.secondary, &config.secondary_path)?;
        if loaded != loaded_secondary {
            warn!(loaded, loaded_secondary, "tables loaded different record counts");
        }
        Ok(loaded)
    }
}

fn load_if_present(table: &mut SlotTable, path: &Path) -> Result<usize> {
    match table.load_from_file(path) {
        Err(Error::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            info!(?path, "no saved records");
            Ok(0)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dual(capacity: usize) -> DualIndex {
        DualIndex::new(capacity).unwrap()
    }

    /// Invariant: a successful insert is visible through both keys.
    #[test]
    fn insert_visible_in_both_tables() {
        let mut d = dual(10);
        d.insert(Record::new("Alice", "1234567890", "123 Main St")).unwrap();
        assert_eq!(d.lookup_by_primary("Alice").unwrap().secondary, "1234567890");
        assert_eq!(d.lookup_by_secondary("1234567890").unwrap().primary, "Alice");
        assert!(d.find_primary("Alice").is_found());
        assert!(d.find_secondary("1234567890").is_found());
    }

    /// Invariant: a duplicate primary with a fresh secondary fails overall and
    /// the secondary table is rolled back.
    #[test]
    fn duplicate_primary_rolls_back_secondary() {
        let mut d = dual(10);
        d.insert(Record::new("Alice", "111", "")).unwrap();
        let err = d.insert(Record::new("Alice", "222", "")).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { ref key } if key == "Alice"));
        assert!(d.lookup_by_secondary("222").is_none());
        assert_eq!(d.secondary().len(), 1);
        assert_eq!(d.secondary().tombstones(), 1);
        assert_eq!(d.lookup_by_primary("Alice").unwrap().secondary, "111");
    }

    /// Invariant: a duplicate secondary with a fresh primary rolls back the primary.
    #[test]
    fn duplicate_secondary_rolls_back_primary() {
        let mut d = dual(10);
        d.insert(Record::new("Alice", "111", "")).unwrap();
        let err = d.insert(Record::new("Bob", "111", "")).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { ref key } if key == "111"));
        assert!(d.lookup_by_primary("Bob").is_none());
        assert_eq!(d.primary().len(), 1);
    }

    /// Invariant: an empty secondary key is rejected and nothing stays behind.
    #[test]
    fn empty_secondary_key_rejected() {
        let mut d = dual(5);
        assert!(matches!(
            d.insert(Record::new("Alice", "", "")),
            Err(Error::EmptyKey)
        ));
        assert!(d.primary().is_empty());
        assert!(d.secondary().is_empty());
    }

    /// Invariant: coordinated delete clears both tables.
    #[test]
    fn remove_clears_both() {
        let mut d = dual(10);
        let r = Record::new("Alice", "111", "x");
        d.insert(r.clone()).unwrap();
        assert!(d.remove(&r));
        assert!(d.lookup_by_primary("Alice").is_none());
        assert!(d.lookup_by_secondary("111").is_none());
        assert!(!d.remove(&r));
    }

    /// Invariant: delete succeeds if either table removed the record.
    #[test]
    fn remove_is_permissive() {
        let mut d = dual(10);
        d.insert(Record::new("Alice", "111", "x")).unwrap();
        // Secondary key does not match what is stored: only the primary goes.
        assert!(d.remove(&Record::new("Alice", "999", "")));
        assert!(d.lookup_by_primary("Alice").is_none());
        assert!(d.lookup_by_secondary("111").is_some());
    }

    /// Invariant: delete-by-key resolves the full record first, then removes
    /// it from both tables.
    #[test]
    fn remove_by_either_key() {
        let mut d = dual(10);
        d.insert(Record::new("Alice", "111", "a")).unwrap();
        d.insert(Record::new("Bob", "222", "b")).unwrap();

        let gone = d.remove_by_primary("Alice").unwrap();
        assert_eq!(gone, Record::new("Alice", "111", "a"));
        assert!(d.lookup_by_secondary("111").is_none());

        let gone = d.remove_by_secondary("222").unwrap();
        assert_eq!(gone.primary, "Bob");
        assert!(d.lookup_by_primary("Bob").is_none());

        assert!(matches!(d.remove_by_primary("Alice"), Err(Error::NotFound { .. })));
        assert!(matches!(d.remove_by_secondary("333"), Err(Error::NotFound { .. })));
    }

    /// Invariant: clear and stats cover both tables.
    #[test]
    fn clear_and_stats() {
        let mut d = DualIndex::with_config(&Config::new().capacity(4)).unwrap();
        d.insert(Record::new("a", "1", "")).unwrap();
        let (p, s) = d.stats();
        assert_eq!((p.count, s.count), (1, 1));
        assert_eq!(p.load_factor, 0.25);
        d.clear();
        assert!(d.primary().is_empty() && d.secondary().is_empty());
        assert_eq!(d.capacity(), 4);
    }
}
