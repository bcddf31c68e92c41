//! SlotTable: fixed-capacity open-addressed table with linear probing and
//! lazy deletion.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::hash::HashStrategy;
use crate::probe::ProbeSeq;
use crate::record::{KeyField, Record};
use tracing::{debug, warn};

/// State of one cell.
///
/// `Empty` only until first written (or until `clear`). A removed record
/// stays in its `Tombstone` so chains running through the slot remain
/// intact; the payload is dropped when a later insert overwrites it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Slot {
    #[default]
    Empty,
    Occupied(Record),
    Tombstone(Record),
}

impl Slot {
    /// Empty and Tombstone slots can take a new record.
    #[inline]
    pub fn is_available(&self) -> bool {
        !matches!(self, Slot::Occupied(_))
    }

    /// The record if the slot is live.
    #[inline]
    pub fn live(&self) -> Option<&Record> {
        match self {
            Slot::Occupied(r) => Some(r),
            _ => None,
        }
    }
}

/// Outcome of a probe walk: where the key lives (if it does) and how many
/// slots were examined, counting the home slot as 1.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Lookup {
    pub slot: Option<usize>,
    pub probes: usize,
}

impl Lookup {
    #[inline]
    pub fn is_found(&self) -> bool {
        self.slot.is_some()
    }
}

/// Point-in-time counters for one table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableStats {
    pub count: usize,
    pub capacity: usize,
    pub tombstones: usize,
    pub load_factor: f64,
    pub average_search_length: f64,
}

/// Open-addressed table keyed on one field of [`Record`].
#[derive(Clone, Debug)]
pub struct SlotTable {
    slots: Box<[Slot]>,
    count: usize, // number of Occupied slots
    key_field: KeyField,
    hash: HashStrategy,
}

/// Iterator over live records in slot order.
#[derive(Debug)]
pub struct Iter<'a> {
    it: core::iter::Enumerate<core::slice::Iter<'a, Slot>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (usize, &'a Record);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.find_map(|(i, s)| s.live().map(|r| (i, r)))
    }
}

impl SlotTable {
    /// Table of `capacity` slots using [`HashStrategy::ByteSum`].
    pub fn new(capacity: usize, key_field: KeyField) -> Result<Self> {
        Self::with_hash(capacity, key_field, HashStrategy::default())
    }

    pub fn with_hash(capacity: usize, key_field: KeyField, hash: HashStrategy) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity);
        }
        Ok(Self {
            slots: vec![Slot::Empty; capacity].into_boxed_slice(),
            count: 0,
            key_field,
            hash,
        })
    }

    pub fn with_config(config: &Config, key_field: KeyField) -> Result<Self> {
        config.validate()?;
        Self::with_hash(config.capacity, key_field, config.hash)
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
    pub fn len(&self) -> usize {
        self.count
    }
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
    pub fn key_field(&self) -> KeyField {
        self.key_field
    }
    pub fn hash_strategy(&self) -> HashStrategy {
        self.hash
    }

    #[inline]
    fn home(&self, key: &str) -> usize {
        self.hash.hash(key, self.capacity())
    }

    #[inline]
    fn key_of<'r>(&self, record: &'r Record) -> &'r str {
        self.key_field.extract(record)
    }

    /// Walk the chain for `key`. Tombstones and other keys are skipped; the
    /// walk ends at the first Empty slot or after `capacity` slots.
    pub fn find(&self, key: &str) -> Lookup {
        let mut probes = 0;
        if key.is_empty() {
            return Lookup { slot: None, probes };
        }
        for (attempt, idx) in ProbeSeq::new(self.home(key), self.capacity()) {
            probes = attempt + 1;
            match &self.slots[idx] {
                Slot::Empty => break,
                Slot::Occupied(r) if self.key_of(r) == key => {
                    return Lookup {
                        slot: Some(idx),
                        probes,
                    };
                }
                _ => {}
            }
        }
        Lookup { slot: None, probes }
    }

    pub fn search(&self, key: &str) -> Option<&Record> {
        let idx = self.find(key).slot?;
        self.slots[idx].live()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_found()
    }

    /// Insert `record` under its key field and return the slot it landed in.
    ///
    /// The duplicate check stops at the first Empty slot, while placement
    /// takes the first Empty *or* Tombstone slot, so the two walks are run
    /// separately. Existing records are never overwritten.
    ///
    /// Both key fields are checked with [`Record::validate`], not only the
    /// one this table is keyed on, so every accepted record can be saved
    /// and loaded back.
    pub fn insert(&mut self, record: Record) -> Result<usize> {
        record.validate()?;
        let key = self.key_of(&record);
        if self.find(key).is_found() {
            return Err(Error::duplicate_key(key));
        }
        let target = ProbeSeq::new(self.home(key), self.capacity())
            .find(|&(_, idx)| self.slots[idx].is_available());
        let Some((attempt, idx)) = target else {
            warn!(key, capacity = self.capacity(), "no available slot");
            return Err(Error::TableFull {
                capacity: self.capacity(),
            });
        };
        debug!(key, slot = idx, probes = attempt + 1, "inserted record");
        self.slots[idx] = Slot::Occupied(record);
        self.count += 1;
        Ok(idx)
    }

    /// Lazily delete `key`: its slot becomes a Tombstone that still holds
    /// the payload. Returns the slot index.
    pub fn remove(&mut self, key: &str) -> Result<usize> {
        let idx = self.find(key).slot.ok_or_else(|| Error::not_found(key))?;
        if let Slot::Occupied(r) = core::mem::take(&mut self.slots[idx]) {
            self.slots[idx] = Slot::Tombstone(r);
        }
        self.count -= 1;
        debug!(key, slot = idx, "removed record");
        Ok(idx)
    }

    /// Slots examined to find `key`, or `None` when it is not live.
    pub fn search_length(&self, key: &str) -> Option<usize> {
        let lookup = self.find(key);
        lookup.slot.map(|_| lookup.probes)
    }

    /// Mean search length over every live key; `0.0` for an empty table.
    pub fn average_search_length(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let (total, found) = self
            .iter()
            .filter_map(|(_, r)| self.search_length(self.key_of(r)))
            .fold((0usize, 0usize), |(t, n), len| (t + len, n + 1));
        if found == 0 {
            0.0
        } else {
            total as f64 / found as f64
        }
    }

    /// Live records over capacity. Tombstones do not count.
    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.capacity() as f64
    }

    pub fn tombstones(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Tombstone(_)))
            .count()
    }

    pub fn stats(&self) -> TableStats {
        TableStats {
            count: self.count,
            capacity: self.capacity(),
            tombstones: self.tombstones(),
            load_factor: self.load_factor(),
            average_search_length: self.average_search_length(),
        }
    }

    /// Raw contents of slot `index`, including Empty and Tombstone markers.
    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Reset every slot to Empty.
    pub fn clear(&mut self) {
        self.slots.fill(Slot::Empty);
        self.count = 0;
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            it: self.slots.iter().enumerate(),
        }
    }
}

impl<'a> IntoIterator for &'a SlotTable {
    type Item = (usize, &'a Record);
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
