//! Document model: images, groups and artboards, and the image store.
//!
//! `ImageItem` and `Container` are the persisted shapes. `ItemStore` owns the
//! live image collection in insertion order together with the image
//! selection set and the z-index counter. Containers live in
//! [`crate::container::ContainerManager`]; the cross-collection invariants are
//! kept by [`crate::board::Board`].

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geom::{Point, Rect, Size};
use crate::hit::{self, Spatial};

/// Unique identifier for an image.
pub type ItemId = Uuid;

/// Unique identifier for a group or artboard.
pub type ContainerId = Uuid;

/// Id for a manifest string. UUID strings are taken as-is. Any other string,
/// such as `artboard-1700000000000-abc123def`, maps to a name-based UUID, so
/// equal strings always yield equal ids.
#[must_use]
pub fn id_from_str(raw: &str) -> Uuid {
    match Uuid::parse_str(raw) {
        Ok(id) => id,
        Err(_) => Uuid::new_v5(&Uuid::NAMESPACE_OID, raw.as_bytes()),
    }
}

mod manifest_id {
    use serde::{Deserialize, Deserializer};
    use uuid::Uuid;

    use super::id_from_str;

    pub(super) fn one<'de, D: Deserializer<'de>>(d: D) -> Result<Uuid, D::Error> {
        String::deserialize(d).map(|raw| id_from_str(&raw))
    }

    pub(super) fn optional<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Uuid>, D::Error> {
        Option::<String>::deserialize(d).map(|raw| raw.as_deref().map(id_from_str))
    }

    pub(super) fn many<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Uuid>, D::Error> {
        Vec::<String>::deserialize(d).map(|raw| raw.iter().map(|s| id_from_str(s)).collect())
    }
}

/// An image placed on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageItem {
    #[serde(deserialize_with = "manifest_id::one")]
    pub id: ItemId,
    /// Name under which the payload is stored in an archive.
    pub filename: String,
    /// Encoded image bytes. Never written to the manifest.
    #[serde(skip)]
    pub data: Vec<u8>,
    pub position: Point,
    /// Displayed size.
    pub size: Size,
    /// Natural size of the decoded payload.
    pub original_size: Size,
    #[serde(default)]
    pub rotation: f64,
    pub z_index: i64,
    #[serde(default, deserialize_with = "manifest_id::optional", skip_serializing_if = "Option::is_none")]
    pub group_id: Option<ContainerId>,
    #[serde(default, deserialize_with = "manifest_id::optional", skip_serializing_if = "Option::is_none")]
    pub artboard_id: Option<ContainerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_text: Option<bool>,
}

impl ImageItem {
    #[must_use]
    pub fn new(filename: impl Into<String>, data: Vec<u8>, position: Point, size: Size, original_size: Size) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: filename.into(),
            data,
            position,
            size,
            original_size,
            rotation: 0.0,
            z_index: 0,
            group_id: None,
            artboard_id: None,
            title: None,
            description: None,
            show_text: None,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }

    /// The container of the given kind this image belongs to, if any.
    #[must_use]
    pub fn membership(&self, kind: ContainerKind) -> Option<ContainerId> {
        match kind {
            ContainerKind::Group => self.group_id,
            ContainerKind::Artboard => self.artboard_id,
        }
    }

    pub fn set_membership(&mut self, kind: ContainerKind, id: Option<ContainerId>) {
        match kind {
            ContainerKind::Group => self.group_id = id,
            ContainerKind::Artboard => self.artboard_id = id,
        }
    }

    /// Width over height of the natural size.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        self.original_size.width / self.original_size.height
    }
}

impl Spatial for ImageItem {
    fn bounds(&self) -> Rect {
        ImageItem::bounds(self)
    }

    fn z_index(&self) -> i64 {
        self.z_index
    }
}

/// The two flavours of container. They share geometry and bookkeeping but
/// live in separate collections with separate z-order domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    Group,
    Artboard,
}

impl ContainerKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Group => "Group",
            Self::Artboard => "Artboard",
        }
    }
}

fn default_true() -> bool {
    true
}

/// A group or artboard: a named rectangle that owns an ordered list of images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    #[serde(deserialize_with = "manifest_id::one")]
    pub id: ContainerId,
    pub kind: ContainerKind,
    pub name: String,
    pub position: Point,
    pub size: Size,
    /// Member image ids, unique, in the order they were added.
    #[serde(default, deserialize_with = "manifest_id::many")]
    pub children: Vec<ItemId>,
    pub z_index: i64,
    #[serde(default = "default_true")]
    pub expanded: bool,
    pub background_color: String,
    pub border_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

impl Container {
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }

    #[must_use]
    pub fn has_child(&self, id: ItemId) -> bool {
        self.children.contains(&id)
    }

    /// Append a child unless already present. Returns whether it was added.
    pub fn add_child(&mut self, id: ItemId) -> bool {
        if self.has_child(id) {
            return false;
        }
        self.children.push(id);
        true
    }

    /// Returns whether the child was present.
    pub fn remove_child(&mut self, id: ItemId) -> bool {
        let before = self.children.len();
        self.children.retain(|c| *c != id);
        self.children.len() != before
    }
}

impl Spatial for Container {
    fn bounds(&self) -> Rect {
        Container::bounds(self)
    }

    fn z_index(&self) -> i64 {
        self.z_index
    }
}

/// Live image collection, image selection, and the z-index counter.
#[derive(Debug, Clone)]
pub struct ItemStore {
    items: Vec<ImageItem>,
    selected: HashSet<ItemId>,
    next_z: i64,
}

impl Default for ItemStore {
    fn default() -> Self {
        Self { items: Vec::new(), selected: HashSet::new(), next_z: 1 }
    }
}

impl ItemStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Collection ---

    /// Add a new image on top of every other image.
    pub fn add(&mut self, mut item: ImageItem) -> ItemId {
        item.z_index = self.take_z();
        let id = item.id;
        self.items.push(item);
        id
    }

    /// Insert an image keeping its stored z-index (used when loading a project).
    pub fn restore(&mut self, item: ImageItem) {
        self.next_z = self.next_z.max(item.z_index + 1);
        self.items.push(item);
    }

    /// Remove an image and drop it from the selection.
    pub fn remove(&mut self, id: ItemId) -> Option<ImageItem> {
        let index = self.items.iter().position(|i| i.id == id)?;
        self.selected.remove(&id);
        Some(self.items.remove(index))
    }

    /// Remove every selected image, returning them in collection order.
    pub fn remove_selected(&mut self) -> Vec<ImageItem> {
        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.items).into_iter().partition(|i| self.selected.contains(&i.id));
        self.items = kept;
        self.selected.clear();
        removed
    }

    /// Empty the store and restart z-indices at 1.
    pub fn clear(&mut self) {
        self.items.clear();
        self.selected.clear();
        self.next_z = 1;
    }

    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&ImageItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut ImageItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    #[must_use]
    pub fn items(&self) -> &[ImageItem] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [ImageItem] {
        &mut self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn set_position(&mut self, id: ItemId, position: Point) -> bool {
        match self.get_mut(id) {
            Some(item) => {
                item.position = position;
                true
            }
            None => false,
        }
    }

    pub fn set_size(&mut self, id: ItemId, size: Size) -> bool {
        match self.get_mut(id) {
            Some(item) => {
                item.size = size;
                true
            }
            None => false,
        }
    }

    /// Give an image a fresh z-index above every other image.
    pub fn bring_to_front(&mut self, id: ItemId) -> bool {
        let z = self.next_z;
        match self.get_mut(id) {
            Some(item) => {
                item.z_index = z;
                self.next_z += 1;
                true
            }
            None => false,
        }
    }

    fn take_z(&mut self) -> i64 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }

    // --- Queries ---

    #[must_use]
    pub fn at(&self, pt: Point) -> Option<&ImageItem> {
        hit::top_at(&self.items, pt)
    }

    #[must_use]
    pub fn in_rect(&self, rect: &Rect) -> Vec<&ImageItem> {
        hit::all_in_rect(&self.items, rect)
    }

    // --- Selection ---

    /// Select an image. Without `multi` the previous selection is replaced.
    pub fn select(&mut self, id: ItemId, multi: bool) {
        if !multi {
            self.selected.clear();
        }
        self.selected.insert(id);
    }

    pub fn deselect(&mut self, id: ItemId) {
        self.selected.remove(&id);
    }

    /// Flip membership of `id` in the selection, keeping the rest.
    pub fn toggle(&mut self, id: ItemId) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn select_all(&mut self) {
        self.selected.extend(self.items.iter().map(|i| i.id));
    }

    #[must_use]
    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selected.contains(&id)
    }

    #[must_use]
    pub fn selected_ids(&self) -> &HashSet<ItemId> {
        &self.selected
    }

    /// Selected images in collection order.
    #[must_use]
    pub fn selected(&self) -> Vec<&ImageItem> {
        self.items.iter().filter(|i| self.selected.contains(&i.id)).collect()
    }
}
