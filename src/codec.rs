//! One-line text encoding of a [`Record`]: `primary,secondary,auxiliary`.
//!
//! The first two fields must not contain commas; everything after the
//! second comma belongs to the auxiliary text.

use crate::record::Record;

pub const DELIMITER: char = ',';

/// Encode `record` as a single line, without the trailing newline.
pub fn encode_line(record: &Record) -> String {
    let mut line = String::with_capacity(
        record.primary.len() + record.secondary.len() + record.auxiliary.len() + 2,
    );
    line.push_str(&record.primary);
    line.push(DELIMITER);
    line.push_str(&record.secondary);
    line.push(DELIMITER);
    line.push_str(&record.auxiliary);
    line
}

/// Decode one line. Each field is trimmed; a line whose primary or
/// secondary field ends up empty is rejected with `None`.
pub fn decode_line(line: &str) -> Option<Record> {
    let mut fields = line.splitn(3, DELIMITER);
    let primary = fields.next().unwrap_or_default().trim();
    let secondary = fields.next().unwrap_or_default().trim();
    let auxiliary = fields.next().unwrap_or_default().trim();
    if primary.is_empty() || secondary.is_empty() {
        return None;
    }
    Some(Record::new(primary, secondary, auxiliary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auxiliary_keeps_embedded_commas() {
        let r = decode_line("alice,555-0100,1 Main St, Apt 2, Springfield").unwrap();
        assert_eq!(r.primary, "alice");
        assert_eq!(r.secondary, "555-0100");
        assert_eq!(r.auxiliary, "1 Main St, Apt 2, Springfield");
    }

    #[test]
    fn fields_are_trimmed() {
        let r = decode_line("  bob \t,  555-0199 ,  Elm St  \r").unwrap();
        assert_eq!(r, Record::new("bob", "555-0199", "Elm St"));
    }

    #[test]
    fn missing_auxiliary_is_empty() {
        assert_eq!(decode_line("carol,123"), Some(Record::new("carol", "123", "")));
        assert_eq!(decode_line("carol,123,"), Some(Record::new("carol", "123", "")));
    }

    #[test]
    fn blank_keys_are_rejected() {
        assert_eq!(decode_line(""), None);
        assert_eq!(decode_line("   "), None);
        assert_eq!(decode_line("alice"), None);
        assert_eq!(decode_line(" ,555,addr"), None);
        assert_eq!(decode_line("alice, ,addr"), None);
    }

    #[test]
    fn encoded_line_decodes_to_same_record() {
        let r = Record::new("dave", "555-0142", "Flat 3, Harbour Rd");
        assert_eq!(encode_line(&r), "dave,555-0142,Flat 3, Harbour Rd");
        assert_eq!(decode_line(&encode_line(&r)), Some(r));
    }
}
