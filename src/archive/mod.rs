//! Project archives: a gzip-compressed TAR of a JSON manifest plus one blob
//! per image.
//!
//! [`tar`] is the block-level codec, [`project`] maps a board to and from the
//! entry set. The gzip layer here is a thin wrapper over `flate2`.

pub mod project;
pub mod tar;

pub use project::{LoadedProject, Manifest, load_project, mime_type, save_project};
pub use tar::{TarBuilder, TarEntry, extract};

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

/// Errors produced while building or reading a project archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("entry name exceeds 100 bytes: {name}")]
    NameTooLong { name: String },

    #[error("archive io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("entry data truncated: {name}")]
    Truncated { name: String },

    #[error("header checksum mismatch: {name}")]
    BadChecksum { name: String },

    #[error("invalid size field: {name}")]
    InvalidSize { name: String },

    #[error("archive has no project.json")]
    MissingManifest,

    #[error("malformed manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("timestamp formatting failed: {0}")]
    Timestamp(#[from] time::error::Format),
}

/// Gzip-compress `data` at the default level.
///
/// # Errors
///
/// Returns [`ArchiveError::Io`] if the encoder fails.
pub fn gzip(data: &[u8]) -> Result<Vec<u8>, ArchiveError> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Decompress a gzip stream.
///
/// # Errors
///
/// Returns [`ArchiveError::Io`] if the stream is not valid gzip.
pub fn gunzip(data: &[u8]) -> Result<Vec<u8>, ArchiveError> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
