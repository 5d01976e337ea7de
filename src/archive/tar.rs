//! Minimal USTAR-subset TAR codec.
//!
//! Only regular files are written and read. Each entry is a 512-byte header
//! followed by the data padded with zeros to the next block boundary, and the
//! archive ends with two zero blocks.
//!
//! Header fields used:
//!
//! | Offset | Len | Field                                      |
//! |--------|-----|--------------------------------------------|
//! | 0      | 100 | name, NUL padded                           |
//! | 100    | 8   | mode `0000644\0`                           |
//! | 108    | 8   | uid `0000000\0`                            |
//! | 116    | 8   | gid `0000000\0`                            |
//! | 124    | 12  | size, 11 octal digits + NUL                |
//! | 136    | 12  | mtime, 11 octal digits + NUL               |
//! | 148    | 8   | checksum, 6 octal digits + NUL + space     |
//! | 156    | 1   | type flag `'0'`                            |

#[cfg(test)]
#[path = "tar_test.rs"]
mod tar_test;

use std::ops::Range;

use time::OffsetDateTime;

use super::ArchiveError;
use crate::consts::{TAR_BLOCK, TAR_NAME_LEN};

const MODE: Range<usize> = 100..108;
const UID: Range<usize> = 108..116;
const GID: Range<usize> = 116..124;
const SIZE: Range<usize> = 124..136;
const MTIME: Range<usize> = 136..148;
const CHECKSUM: Range<usize> = 148..156;
const TYPEFLAG: usize = 156;

/// Largest value an 11-digit octal field can hold.
const MAX_OCTAL_11: u64 = 0o777_7777_7777;

/// A named file inside an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TarEntry {
    pub name: String,
    pub data: Vec<u8>,
}

/// Accumulates entries and serializes them as a TAR stream.
#[derive(Debug, Clone)]
pub struct TarBuilder {
    entries: Vec<TarEntry>,
    mtime: u64,
}

impl Default for TarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TarBuilder {
    /// Builder stamping entries with the current time.
    #[must_use]
    pub fn new() -> Self {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        Self::with_mtime(u64::try_from(now).unwrap_or_default())
    }

    /// Builder stamping entries with a fixed modification time (seconds).
    #[must_use]
    pub fn with_mtime(mtime: u64) -> Self {
        Self { entries: Vec::new(), mtime: mtime.min(MAX_OCTAL_11) }
    }

    /// Queue a file.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::NameTooLong`] when the UTF-8 name does not fit
    /// the 100-byte header field, or [`ArchiveError::InvalidSize`] when the
    /// data is too large for the size field.
    pub fn add_file(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Result<(), ArchiveError> {
        let name = name.into();
        let data = data.into();
        if name.len() > TAR_NAME_LEN {
            return Err(ArchiveError::NameTooLong { name });
        }
        let fits = u64::try_from(data.len()).is_ok_and(|len| len <= MAX_OCTAL_11);
        if !fits {
            return Err(ArchiveError::InvalidSize { name });
        }
        self.entries.push(TarEntry { name, data });
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize all queued entries followed by the end-of-archive marker.
    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        let total: usize = self.entries.iter().map(|e| TAR_BLOCK + padded_len(e.data.len())).sum();
        let mut out = Vec::with_capacity(total + 2 * TAR_BLOCK);
        for entry in &self.entries {
            out.extend_from_slice(&header(&entry.name, entry.data.len(), self.mtime));
            out.extend_from_slice(&entry.data);
            out.resize(out.len() + padding(entry.data.len()), 0);
        }
        out.resize(out.len() + 2 * TAR_BLOCK, 0);
        out
    }
}

fn padding(len: usize) -> usize {
    (TAR_BLOCK - len % TAR_BLOCK) % TAR_BLOCK
}

fn padded_len(len: usize) -> usize {
    len + padding(len)
}

fn put(block: &mut [u8; TAR_BLOCK], range: Range<usize>, text: &str) {
    let bytes = text.as_bytes();
    let end = range.start + bytes.len().min(range.len());
    block[range.start..end].copy_from_slice(&bytes[..end - range.start]);
}

fn header(name: &str, size: usize, mtime: u64) -> [u8; TAR_BLOCK] {
    let mut block = [0u8; TAR_BLOCK];
    put(&mut block, 0..TAR_NAME_LEN, name);
    put(&mut block, MODE, "0000644");
    put(&mut block, UID, "0000000");
    put(&mut block, GID, "0000000");
    put(&mut block, SIZE, &format!("{size:011o}"));
    put(&mut block, MTIME, &format!("{mtime:011o}"));
    block[TYPEFLAG] = b'0';
    let sum = checksum(&block);
    put(&mut block, CHECKSUM, &format!("{sum:06o}\0 "));
    block
}

/// Unsigned byte sum with the checksum field read as spaces.
fn checksum(block: &[u8]) -> u32 {
    block
        .iter()
        .enumerate()
        .map(|(i, &b)| if CHECKSUM.contains(&i) { u32::from(b' ') } else { u32::from(b) })
        .sum()
}

/// Field text up to the first NUL, surrounding whitespace trimmed.
fn field(block: &[u8], range: Range<usize>) -> String {
    let raw = &block[range];
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).trim().to_owned()
}

/// Octal field value; `None` for blank or non-octal text.
fn parse_octal(text: &str) -> Option<u64> {
    if text.is_empty() {
        return None;
    }
    match u64::from_str_radix(text, 8) {
        Ok(v) => Some(v),
        Err(_) => None,
    }
}

fn parse_size(text: &str) -> Option<usize> {
    match parse_octal(text).map(usize::try_from) {
        Some(Ok(size)) => Some(size),
        _ => None,
    }
}

/// Read every entry of a TAR stream.
///
/// Parsing stops at the first all-zero block, a header with an empty name,
/// or the end of input.
///
/// # Errors
///
/// - [`ArchiveError::BadChecksum`] when a header's stored checksum does not
///   match its contents.
/// - [`ArchiveError::InvalidSize`] when the size field is not octal.
/// - [`ArchiveError::Truncated`] when the data region runs past the input.
pub fn extract(data: &[u8]) -> Result<Vec<TarEntry>, ArchiveError> {
    let mut entries = Vec::new();
    let mut offset = 0;
    while offset + TAR_BLOCK <= data.len() {
        let block = &data[offset..offset + TAR_BLOCK];
        if block.iter().all(|&b| b == 0) {
            break;
        }
        let name = field(block, 0..TAR_NAME_LEN);
        if name.is_empty() {
            break;
        }
        let stored = parse_octal(&field(block, CHECKSUM));
        if stored != Some(u64::from(checksum(block))) {
            return Err(ArchiveError::BadChecksum { name });
        }
        let Some(size) = parse_size(&field(block, SIZE)) else {
            return Err(ArchiveError::InvalidSize { name });
        };
        offset += TAR_BLOCK;
        let end = offset.checked_add(size).filter(|&end| end <= data.len());
        let Some(end) = end else {
            return Err(ArchiveError::Truncated { name });
        };
        entries.push(TarEntry { name, data: data[offset..end].to_vec() });
        offset = end + padding(size);
    }
    Ok(entries)
}
