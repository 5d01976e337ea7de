//! Drag and resize interaction engine.
//!
//! Every gesture is snapshot based: `start_*` records the starting geometry
//! and each `update_*` recomputes from that snapshot and the total cursor
//! delta, so repeated updates never accumulate error. Updates while idle are
//! no-ops and report `false`.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use std::collections::HashMap;

use uuid::Uuid;

use crate::consts::{CONTAINER_MIN_SIZE, ITEM_MIN_SIZE};
use crate::doc::{Container, ContainerId, ImageItem, ItemId, ItemStore};
use crate::geom::{Point, Rect};
use crate::hit::ResizeHandle;

/// Resize `origin` by dragging `handle` a total of `delta`.
///
/// Edges not attached to the handle stay where they were. With `aspect`
/// set, corner and east/west handles derive height from width and
/// north/south handles derive width from height. The `min_size` floor is
/// applied last, so a locked aspect ratio can break at the floor.
#[must_use]
pub fn resize_rect(handle: ResizeHandle, origin: Rect, delta: Point, aspect: Option<f64>, min_size: f64) -> Rect {
    let mut x = origin.x;
    let mut y = origin.y;
    let mut width = origin.width;
    let mut height = origin.height;

    if handle.moves_right() {
        width = origin.width + delta.x;
    } else if handle.moves_left() {
        width = origin.width - delta.x;
        x = origin.x + delta.x;
    }
    if handle.moves_bottom() {
        height = origin.height + delta.y;
    } else if handle.moves_top() {
        height = origin.height - delta.y;
        y = origin.y + delta.y;
    }

    if let Some(aspect) = aspect {
        match handle {
            ResizeHandle::N | ResizeHandle::S => width = height * aspect,
            _ => height = width / aspect,
        }
    }

    Rect::new(x, y, width.max(min_size), height.max(min_size))
}

#[derive(Debug, Clone)]
struct DragSession {
    start: Point,
    origins: HashMap<Uuid, Point>,
    order: Vec<Uuid>,
}

impl DragSession {
    fn new(start: Point, snapshot: impl IntoIterator<Item = (Uuid, Point)>) -> Self {
        let mut origins = HashMap::new();
        let mut order = Vec::new();
        for (id, pos) in snapshot {
            if origins.insert(id, pos).is_none() {
                order.push(id);
            }
        }
        Self { start, origins, order }
    }

    fn target(&self, id: Uuid, point: Point) -> Option<Point> {
        let delta = point.delta_from(self.start);
        self.origins.get(&id).map(|o| o.offset(delta.x, delta.y))
    }
}

/// What a resize session is changing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeTarget {
    Item(ItemId),
    Container(ContainerId),
}

#[derive(Debug, Clone, Copy)]
struct ResizeSession {
    target: ResizeTarget,
    handle: ResizeHandle,
    start: Point,
    origin: Rect,
    aspect: f64,
}

/// Drag / resize state for images and containers.
#[derive(Debug, Clone, Default)]
pub struct DragResize {
    item_drag: Option<DragSession>,
    container_drag: Option<DragSession>,
    resize: Option<ResizeSession>,
}

impl DragResize {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.item_drag.is_some()
    }

    #[must_use]
    pub fn is_dragging_container(&self) -> bool {
        self.container_drag.is_some()
    }

    #[must_use]
    pub fn is_resizing(&self) -> bool {
        matches!(self.resize, Some(ResizeSession { target: ResizeTarget::Item(_), .. }))
    }

    #[must_use]
    pub fn is_resizing_container(&self) -> bool {
        matches!(self.resize, Some(ResizeSession { target: ResizeTarget::Container(_), .. }))
    }

    /// Handle held by the active resize, if any.
    #[must_use]
    pub fn handle(&self) -> Option<ResizeHandle> {
        self.resize.map(|r| r.handle)
    }

    // --- Item drag ---

    /// Begin dragging `selection`, or only `primary` when `selection` is empty.
    /// Ids missing from `items` are skipped.
    pub fn start_drag(&mut self, items: &ItemStore, primary: ItemId, start: Point, selection: &[ItemId]) {
        let ids = if selection.is_empty() { std::slice::from_ref(&primary) } else { selection };
        let snapshot = ids.iter().filter_map(|id| items.get(*id).map(|i| (*id, i.position)));
        self.item_drag = Some(DragSession::new(start, snapshot));
    }

    pub fn update_drag(&mut self, point: Point, items: &mut ItemStore) -> bool {
        let Some(session) = &self.item_drag else {
            return false;
        };
        for id in &session.order {
            if let (Some(target), Some(item)) = (session.target(*id, point), items.get_mut(*id)) {
                item.position = target;
            }
        }
        true
    }

    // --- Container drag ---

    /// Begin dragging containers; same selection rule as [`Self::start_drag`].
    pub fn start_container_drag(
        &mut self,
        containers: &[Container],
        primary: ContainerId,
        start: Point,
        selection: &[ContainerId],
    ) {
        let ids = if selection.is_empty() { std::slice::from_ref(&primary) } else { selection };
        let snapshot = ids
            .iter()
            .filter_map(|id| containers.iter().find(|c| c.id == *id).map(|c| (*id, c.position)));
        self.container_drag = Some(DragSession::new(start, snapshot));
    }

    /// Move dragged containers and shift their children by the distance
    /// each container actually moved this update.
    pub fn update_container_drag(&mut self, point: Point, containers: &mut [Container], items: &mut ItemStore) -> bool {
        let Some(session) = &self.container_drag else {
            return false;
        };
        for container in containers.iter_mut() {
            let Some(target) = session.target(container.id, point) else {
                continue;
            };
            let old = container.position;
            container.position = target;
            let moved = container.position.delta_from(old);
            shift_children(container, moved, items);
        }
        true
    }

    /// End either drag kind, dropping both snapshots.
    pub fn end_drag(&mut self) {
        self.item_drag = None;
        self.container_drag = None;
    }

    // --- Resize ---

    pub fn start_resize(&mut self, item: &ImageItem, handle: ResizeHandle, start: Point) {
        self.resize = Some(ResizeSession {
            target: ResizeTarget::Item(item.id),
            handle,
            start,
            origin: item.bounds(),
            aspect: item.aspect_ratio(),
        });
    }

    /// Apply the item resize. `maintain_aspect` locks to the natural aspect ratio.
    pub fn update_resize(&mut self, point: Point, maintain_aspect: bool, items: &mut ItemStore) -> bool {
        let Some(ResizeSession { target: ResizeTarget::Item(id), handle, start, origin, aspect }) = self.resize else {
            return false;
        };
        let Some(item) = items.get_mut(id) else {
            return false;
        };
        let lock = maintain_aspect.then_some(aspect);
        let rect = resize_rect(handle, origin, point.delta_from(start), lock, ITEM_MIN_SIZE);
        item.position = rect.position();
        item.size = rect.size();
        true
    }

    pub fn start_container_resize(&mut self, container: &Container, handle: ResizeHandle, start: Point) {
        self.resize = Some(ResizeSession {
            target: ResizeTarget::Container(container.id),
            handle,
            start,
            origin: container.bounds(),
            aspect: 1.0,
        });
    }

    /// Apply the container resize. Containers are never aspect locked.
    pub fn update_container_resize(&mut self, point: Point, containers: &mut [Container]) -> bool {
        let Some(ResizeSession { target: ResizeTarget::Container(id), handle, start, origin, .. }) = self.resize else {
            return false;
        };
        let Some(container) = containers.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        let rect = resize_rect(handle, origin, point.delta_from(start), None, CONTAINER_MIN_SIZE);
        container.position = rect.position();
        container.size = rect.size();
        true
    }

    /// End either resize kind.
    pub fn end_resize(&mut self) {
        self.resize = None;
    }
}

/// Translate every listed child of `container` by `delta`.
pub fn shift_children(container: &Container, delta: Point, items: &mut ItemStore) {
    for child in &container.children {
        if let Some(item) = items.get_mut(*child) {
            item.position = item.position.offset(delta.x, delta.y);
        }
    }
}
