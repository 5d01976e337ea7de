//! Compact greedy packing used by "tidy".
//!
//! Rectangles are placed largest first. Each one tries the start point and,
//! for every rectangle already placed, the spots just right of it and just
//! below it. The valid spot closest to the canvas origin wins (ties: smaller
//! y, then smaller x). Placement is O(n²) per rectangle, which is fine for
//! board-sized inputs.

#[cfg(test)]
#[path = "pack_test.rs"]
mod pack_test;

use crate::consts::PACK_SPACING;
use crate::doc::ImageItem;
use crate::geom::{Point, Rect, Size};

/// Packed top-left positions for `sizes`, returned in input order.
///
/// The layout is translated so its minimum x and y equal `start`
/// (origin when `None`).
#[must_use]
pub fn tidy_sizes(sizes: &[Size], start: Option<Point>) -> Vec<Point> {
    if sizes.is_empty() {
        return Vec::new();
    }
    let start = start.unwrap_or_default();
    let mut order: Vec<usize> = (0..sizes.len()).collect();
    order.sort_by(|&a, &b| sizes[b].area().total_cmp(&sizes[a].area()));

    let mut occupied: Vec<Rect> = Vec::with_capacity(sizes.len());
    let mut positions = vec![Point::default(); sizes.len()];
    for index in order {
        let size = sizes[index];
        let pos = best_position(&occupied, size, start);
        occupied.push(Rect::from_parts(pos, size));
        positions[index] = pos;
    }

    let min_x = occupied.iter().map(|r| r.x).reduce(f64::min);
    let min_y = occupied.iter().map(|r| r.y).reduce(f64::min);
    if let (Some(min_x), Some(min_y)) = (min_x, min_y) {
        let (dx, dy) = (start.x - min_x, start.y - min_y);
        for p in &mut positions {
            *p = p.offset(dx, dy);
        }
    }
    tracing::debug!(count = sizes.len(), "tidied images");
    positions
}

/// Rearrange `items` in place. Empty input is left untouched.
pub fn tidy(items: &mut [ImageItem], start: Option<Point>) {
    if items.is_empty() {
        return;
    }
    let sizes: Vec<Size> = items.iter().map(|i| i.size).collect();
    for (item, pos) in items.iter_mut().zip(tidy_sizes(&sizes, start)) {
        item.position = pos;
    }
}

#[allow(clippy::float_cmp)]
fn best_position(occupied: &[Rect], size: Size, start: Point) -> Point {
    if occupied.is_empty() {
        return start;
    }

    let candidates = std::iter::once(start).chain(occupied.iter().flat_map(|r| {
        [Point::new(r.right() + PACK_SPACING, r.y), Point::new(r.x, r.bottom() + PACK_SPACING)]
    }));

    let mut best = start;
    let mut best_waste = f64::INFINITY;
    for pos in candidates {
        if !fits(occupied, pos, size) {
            continue;
        }
        let waste = pos.x.hypot(pos.y);
        let tie_better = waste == best_waste && (pos.y, pos.x) < (best.y, best.x);
        if waste < best_waste || tie_better {
            best = pos;
            best_waste = waste;
        }
    }
    best
}

/// True when a `size` rectangle at `pos` keeps `PACK_SPACING` clear of every
/// occupied rectangle.
fn fits(occupied: &[Rect], pos: Point, size: Size) -> bool {
    occupied.iter().all(|s| {
        pos.x + size.width + PACK_SPACING <= s.x
            || pos.x >= s.right() + PACK_SPACING
            || pos.y + size.height + PACK_SPACING <= s.y
            || pos.y >= s.bottom() + PACK_SPACING
    })
}
