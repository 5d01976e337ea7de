//! Group and artboard collections.
//!
//! One `ContainerManager` exists per [`ContainerKind`]. It owns the
//! containers of that kind in insertion order, their selection set, and an
//! optional hook fired whenever a container's child list changes.

#[cfg(test)]
#[path = "container_test.rs"]
mod container_test;

use std::collections::HashSet;
use std::fmt;

use uuid::Uuid;

use crate::consts::{
    ARTBOARD_LABEL_HEIGHT, ARTBOARD_PADDING, AUTO_RESIZE_EXTRA_MARGIN, AUTO_RESIZE_PADDING, GROUP_PADDING,
    HANDLE_SIZE,
};
use crate::doc::{Container, ContainerId, ContainerKind, ItemId, ItemStore};
use crate::drag::shift_children;
use crate::geom::{Point, Rect, Size};
use crate::hit::{self, ResizeHandle};

/// Background of a new group.
pub const GROUP_BACKGROUND: &str = "rgba(240, 240, 240, 0.5)";
/// Border of a new group.
pub const GROUP_BORDER: &str = "#d0d0d0";
/// Background of a new artboard, and the fallback accent.
pub const ARTBOARD_BACKGROUND: &str = "rgba(255, 255, 255, 1)";
/// Border of a new artboard.
pub const ARTBOARD_BORDER: &str = "#e0e0e0";
/// Label colour of a new artboard, and the fallback text colour.
pub const ARTBOARD_TEXT: &str = "#000000";

/// Callback fired with the id of a container whose children changed.
pub type ChildrenHook = Box<dyn FnMut(ContainerId)>;

pub struct ContainerManager {
    kind: ContainerKind,
    containers: Vec<Container>,
    selected: HashSet<ContainerId>,
    on_children_changed: Option<ChildrenHook>,
}

impl fmt::Debug for ContainerManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerManager")
            .field("kind", &self.kind)
            .field("containers", &self.containers)
            .field("selected", &self.selected)
            .field("hook", &self.on_children_changed.is_some())
            .finish()
    }
}

impl ContainerManager {
    #[must_use]
    pub fn new(kind: ContainerKind) -> Self {
        Self { kind, containers: Vec::new(), selected: HashSet::new(), on_children_changed: None }
    }

    #[must_use]
    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    /// Install the children-changed hook, replacing any previous one.
    pub fn set_children_hook(&mut self, hook: impl FnMut(ContainerId) + 'static) {
        self.on_children_changed = Some(Box::new(hook));
    }

    fn children_changed(&mut self, id: ContainerId) {
        tracing::debug!(kind = self.kind.label(), %id, "container children changed");
        if let Some(hook) = self.on_children_changed.as_mut() {
            hook(id);
        }
    }

    /// Selection-wrapping margin used by [`Self::create_from_selection`].
    #[must_use]
    pub fn padding(&self) -> f64 {
        match self.kind {
            ContainerKind::Group => GROUP_PADDING,
            ContainerKind::Artboard => ARTBOARD_PADDING,
        }
    }

    /// `Group N` / `Artboard N` where N is one past the current count.
    #[must_use]
    pub fn default_name(&self) -> String {
        format!("{} {}", self.kind.label(), self.containers.len() + 1)
    }

    // --- Collection ---

    /// Create an empty container above every other container of this kind.
    pub fn create(&mut self, name: impl Into<String>, position: Point, size: Size) -> ContainerId {
        let (background, border, text) = match self.kind {
            ContainerKind::Group => (GROUP_BACKGROUND, GROUP_BORDER, None),
            ContainerKind::Artboard => (ARTBOARD_BACKGROUND, ARTBOARD_BORDER, Some(ARTBOARD_TEXT.to_owned())),
        };
        let container = Container {
            id: Uuid::new_v4(),
            kind: self.kind,
            name: name.into(),
            position,
            size,
            children: Vec::new(),
            z_index: self.containers.iter().map(|c| c.z_index).max().unwrap_or(0) + 1,
            expanded: true,
            background_color: background.to_owned(),
            border_color: border.to_owned(),
            text_color: text,
        };
        let id = container.id;
        tracing::debug!(kind = self.kind.label(), %id, name = %container.name, "container created");
        self.containers.push(container);
        id
    }

    /// Insert a stored container as-is (used when loading a project).
    pub fn restore(&mut self, mut container: Container) {
        container.kind = self.kind;
        self.containers.push(container);
    }

    /// Remove a container and drop it from the selection. Children keep their
    /// membership field; see [`Self::dissolve`].
    pub fn delete(&mut self, id: ContainerId) -> Option<Container> {
        let index = self.containers.iter().position(|c| c.id == id)?;
        self.selected.remove(&id);
        Some(self.containers.remove(index))
    }

    /// Clear membership on every child, then delete the container.
    pub fn dissolve(&mut self, id: ContainerId, items: &mut ItemStore) -> Option<Container> {
        let container = self.delete(id)?;
        for child in &container.children {
            if let Some(item) = items.get_mut(*child) {
                if item.membership(self.kind) == Some(id) {
                    item.set_membership(self.kind, None);
                }
            }
        }
        Some(container)
    }

    pub fn clear(&mut self) {
        self.containers.clear();
        self.selected.clear();
    }

    #[must_use]
    pub fn get(&self, id: ContainerId) -> Option<&Container> {
        self.containers.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: ContainerId) -> Option<&mut Container> {
        self.containers.iter_mut().find(|c| c.id == id)
    }

    #[must_use]
    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    pub fn containers_mut(&mut self) -> &mut [Container] {
        &mut self.containers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    // --- Children ---

    /// Append ids to a container's child list, skipping ones already there.
    /// Ids are not checked against the image store; [`Self::assign`] is.
    /// Returns false if the container does not exist.
    pub fn add_children(&mut self, id: ContainerId, item_ids: &[ItemId]) -> bool {
        let Some(container) = self.get_mut(id) else {
            return false;
        };
        for item in item_ids {
            container.add_child(*item);
        }
        self.children_changed(id);
        true
    }

    pub fn remove_children(&mut self, id: ContainerId, item_ids: &[ItemId]) -> bool {
        let Some(container) = self.get_mut(id) else {
            return false;
        };
        container.children.retain(|c| !item_ids.contains(c));
        self.children_changed(id);
        true
    }

    /// Make `item_ids` members of container `id`: add them to its children,
    /// point their membership field at it, and take them out of any other
    /// container of this kind.
    pub fn assign(&mut self, id: ContainerId, item_ids: &[ItemId], items: &mut ItemStore) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        let mut resolved = Vec::with_capacity(item_ids.len());
        let mut previous = Vec::new();
        for item_id in item_ids {
            let Some(item) = items.get_mut(*item_id) else {
                continue;
            };
            if let Some(old) = item.membership(self.kind).filter(|old| *old != id) {
                previous.push(old);
            }
            item.set_membership(self.kind, Some(id));
            resolved.push(*item_id);
        }
        for old in previous {
            self.remove_children(old, &resolved);
        }
        self.add_children(id, &resolved)
    }

    /// Take `item_ids` out of container `id` and clear their membership field
    /// where it points at it. Returns false if the container does not exist.
    pub fn release(&mut self, id: ContainerId, item_ids: &[ItemId], items: &mut ItemStore) -> bool {
        if !self.remove_children(id, item_ids) {
            return false;
        }
        for item_id in item_ids {
            if let Some(item) = items.get_mut(*item_id).filter(|item| item.membership(self.kind) == Some(id)) {
                item.set_membership(self.kind, None);
            }
        }
        true
    }

    /// Remove an image id from every container of this kind. Returns the
    /// containers that changed.
    pub fn purge_child(&mut self, item_id: ItemId) -> Vec<ContainerId> {
        let changed: Vec<ContainerId> =
            self.containers.iter_mut().filter_map(|c| c.remove_child(item_id).then_some(c.id)).collect();
        for id in &changed {
            self.children_changed(*id);
        }
        changed
    }

    // --- Geometry ---

    pub fn set_position(&mut self, id: ContainerId, position: Point) -> bool {
        match self.get_mut(id) {
            Some(c) => {
                c.position = position;
                true
            }
            None => false,
        }
    }

    pub fn set_size(&mut self, id: ContainerId, size: Size) -> bool {
        match self.get_mut(id) {
            Some(c) => {
                c.size = size;
                true
            }
            None => false,
        }
    }

    /// Flip a group's expanded flag. Returns the new value.
    pub fn toggle_expanded(&mut self, id: ContainerId) -> Option<bool> {
        let c = self.get_mut(id)?;
        c.expanded = !c.expanded;
        Some(c.expanded)
    }

    /// Move a container and every listed child by `(dx, dy)`.
    pub fn move_with_children(&mut self, id: ContainerId, dx: f64, dy: f64, items: &mut ItemStore) -> bool {
        let Some(container) = self.get_mut(id) else {
            return false;
        };
        container.position = container.position.offset(dx, dy);
        shift_children(container, Point::new(dx, dy), items);
        true
    }

    /// Grow a container to cover its children plus padding. Never shrinks.
    /// Returns false when there is nothing to fit.
    pub fn auto_resize(&mut self, id: ContainerId, items: &ItemStore) -> bool {
        let Some(container) = self.get_mut(id) else {
            return false;
        };
        let children = container.children.iter().filter_map(|c| items.get(*c)).map(|i| i.bounds());
        let Some(content) = Rect::bounding(children) else {
            return false;
        };
        let wanted = content.inflate(AUTO_RESIZE_PADDING + AUTO_RESIZE_EXTRA_MARGIN);
        let grown = container.bounds().union(&wanted);
        container.position = grown.position();
        container.size = grown.size();
        true
    }

    /// Wrap `item_ids` in a new container sized to their bounding box plus
    /// padding, and make them its members. `None` when no id resolves.
    pub fn create_from_selection(
        &mut self,
        item_ids: &[ItemId],
        name: Option<String>,
        items: &mut ItemStore,
    ) -> Option<ContainerId> {
        let content = Rect::bounding(item_ids.iter().filter_map(|id| items.get(*id)).map(|i| i.bounds()))?;
        let frame = content.inflate(self.padding());
        let name = name.unwrap_or_else(|| self.default_name());
        let id = self.create(name, frame.position(), frame.size());
        self.assign(id, item_ids, items);
        Some(id)
    }

    // --- Queries ---

    #[must_use]
    pub fn at(&self, pt: Point) -> Option<&Container> {
        hit::top_at(&self.containers, pt)
    }

    /// Container whose name strip is under `pt`.
    #[must_use]
    pub fn label_at(&self, pt: Point) -> Option<&Container> {
        hit::label_at(&self.containers, pt, ARTBOARD_LABEL_HEIGHT)
    }

    #[must_use]
    pub fn in_rect(&self, rect: &Rect) -> Vec<&Container> {
        hit::all_in_rect(&self.containers, rect)
    }

    /// Resize handle of container `id` under `pt`, using the default handle size.
    #[must_use]
    pub fn handle_at(&self, id: ContainerId, pt: Point) -> Option<ResizeHandle> {
        self.get(id).and_then(|c| hit::container_handle_at(&c.bounds(), pt, HANDLE_SIZE))
    }

    // --- Selection ---

    /// Select a container. Without `additive` the previous selection is replaced.
    pub fn select(&mut self, id: ContainerId, additive: bool) {
        if !additive {
            self.selected.clear();
        }
        self.selected.insert(id);
    }

    pub fn deselect(&mut self, id: ContainerId) {
        self.selected.remove(&id);
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    #[must_use]
    pub fn is_selected(&self, id: ContainerId) -> bool {
        self.selected.contains(&id)
    }

    /// Selected ids in collection order.
    #[must_use]
    pub fn selected_ids(&self) -> Vec<ContainerId> {
        self.containers.iter().filter(|c| self.selected.contains(&c.id)).map(|c| c.id).collect()
    }
}
