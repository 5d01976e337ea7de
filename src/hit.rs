//! Hit-testing: z-ordered point queries, rectangle queries, and resize handle
//! detection over any collection of axis-aligned shapes.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::{Deserialize, Serialize};

use crate::geom::{Point, Rect};

/// Anchor position for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeHandle {
    /// Every handle, corners first.
    pub const ALL: [ResizeHandle; 8] = [Self::Nw, Self::Ne, Self::Sw, Self::Se, Self::N, Self::S, Self::W, Self::E];

    /// True when dragging this handle moves the left edge.
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    /// True when dragging this handle moves the top edge.
    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::N | Self::Nw | Self::Ne)
    }

    #[must_use]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    #[must_use]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }
}

/// Cursor name shown while hovering or dragging a handle.
#[must_use]
pub fn cursor_for(handle: ResizeHandle) -> &'static str {
    match handle {
        ResizeHandle::Nw | ResizeHandle::Se => "resize-diag-1",
        ResizeHandle::Ne | ResizeHandle::Sw => "resize-diag-2",
        ResizeHandle::N | ResizeHandle::S => "resize-vertical",
        ResizeHandle::E | ResizeHandle::W => "resize-horizontal",
    }
}

/// Anything with a canvas-space bounding box and a stacking order.
pub trait Spatial {
    fn bounds(&self) -> Rect;
    fn z_index(&self) -> i64;
}

/// Topmost shape containing `pt`.
///
/// Containment is edge-inclusive. Among shapes with equal z-index the one
/// later in `shapes` wins.
#[must_use]
pub fn top_at<T: Spatial>(shapes: &[T], pt: Point) -> Option<&T> {
    top_matching(shapes, |s| s.bounds().contains(pt))
}

/// Every shape whose bounds intersect `query` (touching counts), in
/// collection order.
#[must_use]
pub fn all_in_rect<'a, T: Spatial>(shapes: &'a [T], query: &Rect) -> Vec<&'a T> {
    shapes.iter().filter(|s| s.bounds().intersects(query)).collect()
}

/// Topmost shape whose name strip (a band `label_height` tall sitting on top
/// of its upper edge) contains `pt`.
#[must_use]
pub fn label_at<T: Spatial>(shapes: &[T], pt: Point, label_height: f64) -> Option<&T> {
    top_matching(shapes, |s| label_strip(&s.bounds(), label_height).contains(pt))
}

fn label_strip(bounds: &Rect, label_height: f64) -> Rect {
    Rect::new(bounds.x, bounds.y - label_height, bounds.width, label_height)
}

fn top_matching<T: Spatial>(shapes: &[T], mut pred: impl FnMut(&T) -> bool) -> Option<&T> {
    let mut best: Option<&T> = None;
    for shape in shapes {
        if pred(shape) && best.is_none_or(|b| shape.z_index() >= b.z_index()) {
            best = Some(shape);
        }
    }
    best
}

/// Handle of an image under `pt`.
///
/// Each edge band reaches `handle_size / 2` outside the box and `handle_size`
/// inside it, so handles stay grabbable just beyond the visible border.
/// Corners win over edges; edge handles also require the point to lie within
/// the box's extent along that edge.
#[must_use]
pub fn item_handle_at(bounds: &Rect, pt: Point, handle_size: f64) -> Option<ResizeHandle> {
    let outer = handle_size / 2.0;
    let rel_x = pt.x - bounds.x;
    let rel_y = pt.y - bounds.y;
    let (w, h) = (bounds.width, bounds.height);

    let left = rel_x >= -outer && rel_x < handle_size;
    let right = rel_x > w - handle_size && rel_x <= w + outer;
    let top = rel_y >= -outer && rel_y < handle_size;
    let bottom = rel_y > h - handle_size && rel_y <= h + outer;

    let within_x = (0.0..=w).contains(&rel_x);
    let within_y = (0.0..=h).contains(&rel_y);

    if top && left {
        Some(ResizeHandle::Nw)
    } else if top && right {
        Some(ResizeHandle::Ne)
    } else if bottom && left {
        Some(ResizeHandle::Sw)
    } else if bottom && right {
        Some(ResizeHandle::Se)
    } else if top && within_x {
        Some(ResizeHandle::N)
    } else if bottom && within_x {
        Some(ResizeHandle::S)
    } else if left && within_y {
        Some(ResizeHandle::W)
    } else if right && within_y {
        Some(ResizeHandle::E)
    } else {
        None
    }
}

/// Handle of a group or artboard under `pt`.
///
/// Bands lie entirely inside the box (`handle_size` deep).
/// Points outside the box return `None`, unlike [`item_handle_at`], whose
/// bands reach `handle_size / 2` past the border.
#[must_use]
pub fn container_handle_at(bounds: &Rect, pt: Point, handle_size: f64) -> Option<ResizeHandle> {
    if !bounds.contains(pt) {
        return None;
    }
    let rel_x = pt.x - bounds.x;
    let rel_y = pt.y - bounds.y;

    let left = rel_x < handle_size;
    let right = rel_x > bounds.width - handle_size;
    let top = rel_y < handle_size;
    let bottom = rel_y > bounds.height - handle_size;

    match (top, bottom, left, right) {
        (true, _, true, _) => Some(ResizeHandle::Nw),
        (true, _, _, true) => Some(ResizeHandle::Ne),
        (_, true, true, _) => Some(ResizeHandle::Sw),
        (_, true, _, true) => Some(ResizeHandle::Se),
        (true, _, _, _) => Some(ResizeHandle::N),
        (_, true, _, _) => Some(ResizeHandle::S),
        (_, _, true, _) => Some(ResizeHandle::W),
        (_, _, _, true) => Some(ResizeHandle::E),
        _ => None,
    }
}

/// Rubber-band selection rectangle.
#[derive(Debug, Clone, Copy, Default)]
pub struct Marquee {
    anchor: Option<(Point, Point)>,
}

impl Marquee {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, pt: Point) {
        self.anchor = Some((pt, pt));
    }

    /// Move the free corner. Ignored while inactive.
    pub fn update(&mut self, pt: Point) -> bool {
        match self.anchor.as_mut() {
            Some((_, end)) => {
                *end = pt;
                true
            }
            None => false,
        }
    }

    pub fn end(&mut self) {
        self.anchor = None;
    }

    pub fn cancel(&mut self) {
        self.end();
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.anchor.is_some()
    }

    /// Normalized rectangle spanned by the drag, while active.
    #[must_use]
    pub fn rect(&self) -> Option<Rect> {
        let (start, end) = self.anchor?;
        Some(Rect::new(
            start.x.min(end.x),
            start.y.min(end.y),
            (end.x - start.x).abs(),
            (end.y - start.y).abs(),
        ))
    }
}
