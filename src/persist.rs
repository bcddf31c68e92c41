//! Text-file persistence: one encoded record per line, no header.
//!
//! Saves go to a sibling `*.tmp` file that is renamed over the target, so
//! a failed save leaves any previous file as it was. Loads skip blank and
//! malformed lines; a read error part-way through keeps what was already
//! accepted.

use crate::codec::{decode_line, encode_line};
use crate::error::{Error, Result};
use crate::record::Record;
use crate::slot_table::SlotTable;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

/// Write `records` to `path`, replacing it. Returns the number of lines.
///
/// Every record is checked with [`Record::validate`] first; a record that
/// could not be read back fails the whole write and leaves `path` untouched.
pub fn write_records<'a, I>(path: impl AsRef<Path>, records: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a Record>,
{
    let path = path.as_ref();
    let records: Vec<&Record> = records.into_iter().collect();
    for record in &records {
        record.validate()?;
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let tmp = tmp_path(path);
    let written = write_lines(&tmp, records)
        .and_then(|n| fs::rename(&tmp, path).map(|()| n))
        .map_err(|e| {
            let _ = fs::remove_file(&tmp);
            Error::io(path, e)
        })?;
    Ok(written)
}

/// Decode every accepted line of `path` without inserting anything.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for_each_record(path.as_ref(), |r| records.push(r))?;
    Ok(records)
}

fn write_lines<'a>(path: &Path, records: impl IntoIterator<Item = &'a Record>) -> io::Result<usize> {
    let mut out = BufWriter::new(File::create(path)?);
    let mut n = 0;
    for record in records {
        writeln!(out, "{}", encode_line(record))?;
        n += 1;
    }
    out.flush()?;
    out.get_ref().sync_all()?;
    Ok(n)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("records"));
    name.push(".tmp");
    path.with_file_name(name)
}

// Opening is the only hard failure; a read error ends the walk early.
// Lines that are not UTF-8 are skipped like any other malformed line.
fn for_each_record(path: &Path, mut f: impl FnMut(Record)) -> Result<()> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    for lineno in 1usize.. {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(?path, line = lineno, error = %e, "stopping load on read error");
                break;
            }
        }
        let Ok(line) = std::str::from_utf8(&buf) else {
            trace!(?path, line = lineno, "skipping line that is not UTF-8");
            continue;
        };
        let line = line.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            continue;
        }
        match decode_line(line) {
            Some(record) => f(record),
            None => trace!(?path, line = lineno, "skipping malformed line"),
        }
    }
    Ok(())
}

impl SlotTable {
    /// Write live records in slot order. Returns how many were written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let saved = write_records(path, self.iter().map(|(_, r)| r))?;
        info!(?path, saved, "saved records");
        Ok(saved)
    }

    /// Insert every accepted line of `path` through the normal insert path.
    ///
    /// Duplicates and full-table rejections only lower the returned count.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let mut loaded = 0;
        for_each_record(path, |record| match self.insert(record) {
            Ok(_) => loaded += 1,
            Err(e) => debug!(error = %e, "record rejected during load"),
        })?;
        info!(?path, loaded, "loaded records");
        Ok(loaded)
    }
}
