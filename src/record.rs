//! Directory record and the choice of which field a table is keyed on.

use crate::codec::DELIMITER;
use crate::error::{Error, Result};

/// One directory entry. `primary` and `secondary` are the two lookup
/// keys; `auxiliary` is free-form text and may contain commas.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    pub primary: String,
    pub secondary: String,
    pub auxiliary: String,
}

impl Record {
    pub fn new(
        primary: impl Into<String>,
        secondary: impl Into<String>,
        auxiliary: impl Into<String>,
    ) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
            auxiliary: auxiliary.into(),
        }
    }

    /// Checks that the record survives a save and load unchanged in its
    /// keys: both keys non-blank and free of the delimiter, no field with a
    /// line break.
    pub fn validate(&self) -> Result<()> {
        for (field, key) in [("primary", &self.primary), ("secondary", &self.secondary)] {
            if key.trim().is_empty() {
                return Err(Error::EmptyKey);
            }
            if key.contains([DELIMITER, '\n', '\r']) {
                return Err(Error::invalid_field(field, key.as_str()));
            }
        }
        if self.auxiliary.contains(['\n', '\r']) {
            return Err(Error::invalid_field("auxiliary", self.auxiliary.as_str()));
        }
        Ok(())
    }
}

/// Field a [`SlotTable`](crate::SlotTable) indexes on, fixed at construction.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeyField {
    Primary,
    Secondary,
}

impl KeyField {
    /// Borrow the key this field selects out of `record`.
    #[inline]
    pub fn extract(self, record: &Record) -> &str {
        match self {
            KeyField::Primary => &record.primary,
            KeyField::Secondary => &record.secondary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_selects_field() {
        let r = Record::new("alice", "555-0100", "1 Main St, Apt 2");
        assert_eq!(KeyField::Primary.extract(&r), "alice");
        assert_eq!(KeyField::Secondary.extract(&r), "555-0100");
    }

    #[test]
    fn validate_rejects_unstorable_fields() {
        assert!(Record::new("alice", "555", "1 Main St, Apt 2").validate().is_ok());
        assert!(matches!(
            Record::new("alice", "", "x").validate(),
            Err(Error::EmptyKey)
        ));
        assert!(matches!(
            Record::new(" ", "555", "x").validate(),
            Err(Error::EmptyKey)
        ));
        assert!(matches!(
            Record::new("bob,jr", "555", "y").validate(),
            Err(Error::InvalidField { field: "primary", .. })
        ));
        assert!(matches!(
            Record::new("bob", "555\n", "y").validate(),
            Err(Error::InvalidField { field: "secondary", .. })
        ));
        assert!(matches!(
            Record::new("bob", "555", "line\r\nbreak").validate(),
            Err(Error::InvalidField { field: "auxiliary", .. })
        ));
    }
}
