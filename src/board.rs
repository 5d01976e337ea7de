//! The board aggregate: images, groups, and artboards kept consistent.
//!
//! `Board` is the single owner of the three collections. Operations that
//! touch more than one of them live here so the cross-collection
//! invariants hold after every call:
//!
//! - removing an image removes its id from every container's child list;
//! - deleting a container clears the membership field of its former children;
//! - artboard accents are recomputed whenever an artboard's members change.

#[cfg(test)]
#[path = "board_test.rs"]
mod board_test;

use std::fmt;
use std::io::Cursor;

use image::ImageReader;
use tracing::{debug, info, warn};

use crate::archive::{self, ArchiveError, LoadedProject, Manifest};
use crate::color::{self, ColorExtractor};
use crate::consts::{DEFAULT_IMPORT_X, DEFAULT_IMPORT_Y, IMPORT_STAGGER};
use crate::container::ContainerManager;
use crate::doc::{Container, ContainerId, ContainerKind, ImageItem, ItemId, ItemStore};
use crate::geom::{Point, Rect, Size};
use crate::pack;
use crate::settings::Settings;
use crate::viewport::Viewport;

// =============================================================================
// DECODER SEAM
// =============================================================================

/// Natural-size probe over encoded image bytes.
pub trait ImageDecoder {
    /// `None` when the payload is not a decodable image.
    fn dimensions(&self, data: &[u8]) -> Option<Size>;
}

/// [`ImageDecoder`] backed by the `image` crate. Only the header is parsed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn dimensions(&self, data: &[u8]) -> Option<Size> {
        let reader = match ImageReader::new(Cursor::new(data)).with_guessed_format() {
            Ok(reader) => reader,
            Err(e) => {
                debug!(error = %e, "image format sniffing failed");
                return None;
            }
        };
        match reader.into_dimensions() {
            Ok((w, h)) => Some(Size::new(f64::from(w), f64::from(h))),
            Err(e) => {
                debug!(error = %e, "image header decode failed");
                None
            }
        }
    }
}

// =============================================================================
// BOARD
// =============================================================================

pub struct Board {
    pub items: ItemStore,
    pub groups: ContainerManager,
    pub artboards: ContainerManager,
    pub settings: Settings,
    extractor: Option<Box<dyn ColorExtractor>>,
    created: Option<String>,
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("items", &self.items.len())
            .field("groups", &self.groups.len())
            .field("artboards", &self.artboards.len())
            .field("settings", &self.settings)
            .field("extractor", &self.extractor.is_some())
            .finish()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Board {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            items: ItemStore::new(),
            groups: ContainerManager::new(ContainerKind::Group),
            artboards: ContainerManager::new(ContainerKind::Artboard),
            settings,
            extractor: None,
            created: None,
        }
    }

    /// Install the colour capability used for artboard accents.
    pub fn set_extractor(&mut self, extractor: Box<dyn ColorExtractor>) {
        self.extractor = Some(extractor);
    }

    #[must_use]
    pub fn manager(&self, kind: ContainerKind) -> &ContainerManager {
        match kind {
            ContainerKind::Group => &self.groups,
            ContainerKind::Artboard => &self.artboards,
        }
    }

    pub fn manager_mut(&mut self, kind: ContainerKind) -> &mut ContainerManager {
        match kind {
            ContainerKind::Group => &mut self.groups,
            ContainerKind::Artboard => &mut self.artboards,
        }
    }

    /// Selected image ids in collection order.
    #[must_use]
    pub fn selected_item_ids(&self) -> Vec<ItemId> {
        self.items.items().iter().filter(|i| self.items.is_selected(i.id)).map(|i| i.id).collect()
    }

    // --- Import ---

    /// Decode `data` and add it as a new top-most image at `at`
    /// (default `(100, 100)`), auto-scaled per [`Settings::scaled_size`].
    /// Returns `None` when the payload cannot be decoded.
    pub fn import_image(
        &mut self,
        decoder: &dyn ImageDecoder,
        filename: impl Into<String>,
        data: Vec<u8>,
        at: Option<Point>,
    ) -> Option<ItemId> {
        let filename = filename.into();
        let Some(natural) = decoder.dimensions(&data) else {
            warn!(%filename, bytes = data.len(), "image decode failed, skipping");
            return None;
        };
        let size = self.settings.scaled_size(natural);
        let position = at.unwrap_or(Point::new(DEFAULT_IMPORT_X, DEFAULT_IMPORT_Y));
        let item = ImageItem::new(filename, data, position, size, natural);
        debug!(filename = %item.filename, width = size.width, height = size.height, "image imported");
        Some(self.items.add(item))
    }

    /// Import several files, the i-th at `base + i * 20` on both axes.
    /// Files that fail to decode are skipped; the rest keep their slot.
    pub fn import_many(
        &mut self,
        decoder: &dyn ImageDecoder,
        files: impl IntoIterator<Item = (String, Vec<u8>)>,
        base: Option<Point>,
    ) -> Vec<ItemId> {
        let base = base.unwrap_or(Point::new(DEFAULT_IMPORT_X, DEFAULT_IMPORT_Y));
        let mut imported = Vec::new();
        let mut attempted = 0usize;
        for (index, (filename, data)) in files.into_iter().enumerate() {
            attempted += 1;
            #[allow(clippy::cast_precision_loss)]
            let offset = index as f64 * IMPORT_STAGGER;
            if let Some(id) = self.import_image(decoder, filename, data, Some(base.offset(offset, offset))) {
                imported.push(id);
            }
        }
        info!(attempted, imported = imported.len(), "bulk import finished");
        imported
    }

    // --- Removal ---

    /// Remove an image and purge it from every container.
    pub fn remove_item(&mut self, id: ItemId) -> Option<ImageItem> {
        let item = self.items.remove(id)?;
        self.purge(&[item.id]);
        Some(item)
    }

    /// Remove every selected image. Returns how many were removed.
    pub fn remove_selected(&mut self) -> usize {
        let removed: Vec<ItemId> = self.items.remove_selected().into_iter().map(|i| i.id).collect();
        self.purge(&removed);
        removed.len()
    }

    fn purge(&mut self, ids: &[ItemId]) {
        let mut touched = Vec::new();
        for id in ids {
            self.groups.purge_child(*id);
            touched.extend(self.artboards.purge_child(*id));
        }
        touched.sort_unstable();
        touched.dedup();
        for artboard in touched {
            self.refresh_artboard(artboard);
        }
    }

    /// Delete a container, clearing membership on its former children.
    pub fn delete_container(&mut self, kind: ContainerKind, id: ContainerId) -> Option<Container> {
        match kind {
            ContainerKind::Group => self.groups.dissolve(id, &mut self.items),
            ContainerKind::Artboard => self.artboards.dissolve(id, &mut self.items),
        }
    }

    /// Remove every image and container.
    pub fn clear(&mut self) {
        self.items.clear();
        self.groups.clear();
        self.artboards.clear();
        self.created = None;
    }

    // --- Containers ---

    /// Wrap the selected images in a new group.
    pub fn group_selection(&mut self, name: Option<String>) -> Option<ContainerId> {
        let ids = self.selected_item_ids();
        self.groups.create_from_selection(&ids, name, &mut self.items)
    }

    /// Wrap the selected images in a new artboard and derive its accent.
    pub fn create_artboard_from_selection(&mut self, name: Option<String>) -> Option<ContainerId> {
        let ids = self.selected_item_ids();
        let id = self.artboards.create_from_selection(&ids, name, &mut self.items)?;
        self.refresh_artboard(id);
        Some(id)
    }

    /// Move images into an artboard, out of whichever artboard held them.
    pub fn add_to_artboard(&mut self, id: ContainerId, item_ids: &[ItemId]) -> bool {
        let previous: Vec<ContainerId> =
            item_ids.iter().filter_map(|i| self.items.get(*i)).filter_map(|i| i.artboard_id).collect();
        if !self.artboards.assign(id, item_ids, &mut self.items) {
            return false;
        }
        for old in previous.into_iter().filter(|old| *old != id) {
            self.refresh_artboard(old);
        }
        self.refresh_artboard(id);
        true
    }

    /// Take images out of an artboard and clear their membership.
    pub fn remove_from_artboard(&mut self, id: ContainerId, item_ids: &[ItemId]) -> bool {
        if !self.artboards.release(id, item_ids, &mut self.items) {
            return false;
        }
        self.refresh_artboard(id);
        true
    }

    /// Move images into a group, out of whichever group held them.
    pub fn add_to_group(&mut self, id: ContainerId, item_ids: &[ItemId]) -> bool {
        self.groups.assign(id, item_ids, &mut self.items)
    }

    pub fn remove_from_group(&mut self, id: ContainerId, item_ids: &[ItemId]) -> bool {
        self.groups.release(id, item_ids, &mut self.items)
    }

    /// Move a container and its children by `(dx, dy)`.
    pub fn move_container(&mut self, kind: ContainerKind, id: ContainerId, dx: f64, dy: f64) -> bool {
        match kind {
            ContainerKind::Group => self.groups.move_with_children(id, dx, dy, &mut self.items),
            ContainerKind::Artboard => self.artboards.move_with_children(id, dx, dy, &mut self.items),
        }
    }

    /// Grow a container to fit its children.
    pub fn auto_resize(&mut self, kind: ContainerKind, id: ContainerId) -> bool {
        match kind {
            ContainerKind::Group => self.groups.auto_resize(id, &self.items),
            ContainerKind::Artboard => self.artboards.auto_resize(id, &self.items),
        }
    }

    /// Recompute an artboard's accent from its largest member. Without an
    /// extractor the artboard keeps its current colours.
    pub fn refresh_artboard(&mut self, id: ContainerId) -> bool {
        let Some(extractor) = self.extractor.as_deref() else {
            return false;
        };
        let Some(artboard) = self.artboards.get_mut(id) else {
            return false;
        };
        color::refresh_accent(artboard, self.items.items(), extractor)
    }

    // --- Layout ---

    /// Pack the listed images. Unknown ids are ignored. Returns false when
    /// nothing resolved.
    pub fn tidy(&mut self, ids: &[ItemId], start: Option<Point>) -> bool {
        let targets: Vec<(ItemId, Size)> =
            ids.iter().filter_map(|id| self.items.get(*id)).map(|i| (i.id, i.size)).collect();
        if targets.is_empty() {
            return false;
        }
        let sizes: Vec<Size> = targets.iter().map(|(_, size)| *size).collect();
        for ((id, _), position) in targets.iter().zip(pack::tidy_sizes(&sizes, start)) {
            self.items.set_position(*id, position);
        }
        true
    }

    /// Pack the selection in place, anchored at its current top-left corner.
    pub fn tidy_selection(&mut self) -> bool {
        let ids = self.selected_item_ids();
        let anchor = Rect::bounding(ids.iter().filter_map(|id| self.items.get(*id)).map(ImageItem::bounds))
            .map(|r| r.position());
        self.tidy(&ids, anchor)
    }

    /// Pack every image from `start` (default origin).
    pub fn tidy_all(&mut self, start: Option<Point>) {
        pack::tidy(self.items.items_mut(), start);
    }

    // --- Persistence ---

    /// Snapshot the board into a manifest. Payloads ride along in the items
    /// and are split out by [`archive::save_project`].
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Timestamp`] if the clock cannot be formatted.
    pub fn to_manifest(&self, viewport: Viewport) -> Result<Manifest, ArchiveError> {
        let mut manifest = Manifest::new(self.settings.canvas_size, viewport)?;
        if let Some(created) = &self.created {
            manifest.metadata.created.clone_from(created);
        }
        manifest.images = self.items.items().to_vec();
        manifest.groups = self.groups.containers().to_vec();
        manifest.artboards = self.artboards.containers().to_vec();
        Ok(manifest)
    }

    /// Encode the board as a project archive.
    ///
    /// # Errors
    ///
    /// Returns any [`ArchiveError`] raised while building the archive.
    pub fn save(&self, viewport: Viewport) -> Result<Vec<u8>, ArchiveError> {
        archive::save_project(&self.to_manifest(viewport)?)
    }

    /// Replace the board's contents with a loaded project. Returns the saved
    /// viewport.
    pub fn install_project(&mut self, project: LoadedProject) -> Viewport {
        let Manifest { metadata, canvas, images, groups, artboards, .. } = project.manifest;
        self.clear();
        for item in images {
            self.items.restore(item);
        }
        for group in groups {
            self.groups.restore(group);
        }
        for artboard in artboards {
            self.artboards.restore(artboard);
        }
        self.settings.canvas_size = Size::new(canvas.width, canvas.height);
        self.created = Some(metadata.created);
        info!(
            items = self.items.len(),
            groups = self.groups.len(),
            artboards = self.artboards.len(),
            "project installed"
        );
        canvas.viewport
    }

    /// Decode an archive and install it. The board is untouched on error.
    ///
    /// # Errors
    ///
    /// Returns the [`ArchiveError`] from [`archive::load_project`].
    pub fn load(&mut self, bytes: &[u8]) -> Result<Viewport, ArchiveError> {
        let project = archive::load_project(bytes)?;
        Ok(self.install_project(project))
    }
}
