//! Project manifest and the archive save/load pipeline.
//!
//! Saving writes `project.json` (pretty JSON, image payloads stripped) and one
//! `images/<filename>` entry per distinct payload, then gzips the TAR.
//! Loading reverses this and reattaches payloads to items by filename.

#[cfg(test)]
#[path = "project_test.rs"]
mod project_test;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{info, warn};

use super::tar::{TarBuilder, extract};
use super::{ArchiveError, gunzip, gzip};
use crate::consts::{FORMAT_VERSION, IMAGE_PREFIX, MANIFEST_NAME};
use crate::doc::{Container, ImageItem};
use crate::geom::Size;
use crate::viewport::Viewport;

/// Creation and modification stamps (RFC 3339).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub version: String,
    pub created: String,
    pub modified: String,
}

/// Logical canvas extent and the viewport at save time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasInfo {
    pub width: f64,
    pub height: f64,
    pub viewport: Viewport,
}

/// Contents of `project.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub metadata: Metadata,
    pub canvas: CanvasInfo,
    pub images: Vec<ImageItem>,
    #[serde(default)]
    pub groups: Vec<Container>,
    #[serde(default)]
    pub artboards: Vec<Container>,
}

impl Manifest {
    /// Empty manifest stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Timestamp`] if the clock cannot be formatted.
    pub fn new(canvas_size: Size, viewport: Viewport) -> Result<Self, ArchiveError> {
        let now = now_rfc3339()?;
        Ok(Self {
            version: FORMAT_VERSION.to_owned(),
            metadata: Metadata { version: FORMAT_VERSION.to_owned(), created: now.clone(), modified: now },
            canvas: CanvasInfo { width: canvas_size.width, height: canvas_size.height, viewport },
            images: Vec::new(),
            groups: Vec::new(),
            artboards: Vec::new(),
        })
    }

    /// Refresh the modification stamp.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Timestamp`] if the clock cannot be formatted.
    pub fn touch(&mut self) -> Result<(), ArchiveError> {
        self.metadata.modified = now_rfc3339()?;
        Ok(())
    }
}

fn now_rfc3339() -> Result<String, ArchiveError> {
    Ok(OffsetDateTime::now_utc().format(&Rfc3339)?)
}

/// A successfully decoded archive.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    /// Manifest with every item's payload reattached.
    pub manifest: Manifest,
    /// Filenames referenced by the manifest that had no blob.
    pub missing: Vec<String>,
}

/// Serialize `manifest` and the item payloads into a gzipped TAR.
///
/// Items sharing a filename share one blob (the first non-empty payload).
/// Items with an empty payload contribute no blob.
///
/// # Errors
///
/// Returns the first [`ArchiveError`] raised while encoding the manifest,
/// adding an entry, or compressing.
pub fn save_project(manifest: &Manifest) -> Result<Vec<u8>, ArchiveError> {
    let mut builder = TarBuilder::new();
    builder.add_file(MANIFEST_NAME, serde_json::to_vec_pretty(manifest)?)?;

    let mut written = HashSet::new();
    for item in &manifest.images {
        if item.data.is_empty() || !written.insert(item.filename.as_str()) {
            continue;
        }
        builder.add_file(format!("{IMAGE_PREFIX}{}", item.filename), item.data.clone())?;
    }

    let tar = builder.build();
    let packed = gzip(&tar)?;
    info!(
        entries = builder.len(),
        images = manifest.images.len(),
        tar_bytes = tar.len(),
        gz_bytes = packed.len(),
        "saved project archive"
    );
    Ok(packed)
}

/// Decode a gzipped project archive.
///
/// # Errors
///
/// - [`ArchiveError::Io`] if the gzip layer is corrupt.
/// - Any TAR reader error from [`extract`].
/// - [`ArchiveError::MissingManifest`] if there is no `project.json`.
/// - [`ArchiveError::Manifest`] if `project.json` is not a valid manifest.
pub fn load_project(bytes: &[u8]) -> Result<LoadedProject, ArchiveError> {
    let tar = gunzip(bytes)?;
    let entries = extract(&tar)?;

    let mut manifest_bytes = None;
    let mut blobs: HashMap<String, Vec<u8>> = HashMap::new();
    for entry in entries {
        if entry.name == MANIFEST_NAME {
            manifest_bytes = Some(entry.data);
        } else if let Some(filename) = entry.name.strip_prefix(IMAGE_PREFIX) {
            blobs.insert(filename.to_owned(), entry.data);
        }
    }

    let Some(manifest_bytes) = manifest_bytes else {
        return Err(ArchiveError::MissingManifest);
    };
    let mut manifest: Manifest = serde_json::from_slice(&manifest_bytes)?;

    let mut missing = Vec::new();
    for item in &mut manifest.images {
        match blobs.get(&item.filename) {
            Some(data) => item.data.clone_from(data),
            None => {
                warn!(filename = %item.filename, "archive has no blob for image");
                item.data.clear();
                missing.push(item.filename.clone());
            }
        }
    }

    info!(
        images = manifest.images.len(),
        groups = manifest.groups.len(),
        artboards = manifest.artboards.len(),
        blobs = blobs.len(),
        missing = missing.len(),
        "loaded project archive"
    );
    Ok(LoadedProject { manifest, missing })
}

/// MIME type for an image filename, by extension.
#[must_use]
pub fn mime_type(filename: &str) -> &'static str {
    let ext = filename.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
