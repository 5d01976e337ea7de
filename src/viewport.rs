//! Pan/zoom viewport and screen ↔ canvas coordinate conversions.
//!
//! `Viewport` is the plain transform the renderer reads. `ViewportEngine`
//! owns it together with the transient pan anchor and the (optional) size of
//! the render surface it is bound to.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::consts::{FIT_MARGIN, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
use crate::geom::{Point, Size};

/// Affine canvas → screen transform.
///
/// `x` / `y` are screen-space offsets of the canvas origin.
/// `zoom` is a scale factor (1.0 = no zoom).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, zoom: 1.0 }
    }
}

impl Viewport {
    /// Convert a screen-space point to canvas coordinates.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.x) / self.zoom,
            y: (screen.y - self.y) / self.zoom,
        }
    }

    /// Convert a canvas-space point to screen coordinates.
    #[must_use]
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point {
            x: canvas.x * self.zoom + self.x,
            y: canvas.y * self.zoom + self.y,
        }
    }

    /// Convert a screen-space distance to a canvas-space distance.
    #[must_use]
    pub fn screen_dist_to_canvas(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }
}

/// Anchor recorded by `start_pan`. Survives `end_pan`; overwritten by the next start.
#[derive(Debug, Clone, Copy, Default)]
struct PanAnchor {
    active: bool,
    screen_start: Point,
    viewport_start: Point,
}

/// Viewport state plus the pan gesture and the bound render surface.
#[derive(Debug, Clone, Default)]
pub struct ViewportEngine {
    viewport: Viewport,
    pan: PanAnchor,
    surface: Option<Size>,
}

impl ViewportEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine bound to a render surface of the given size.
    #[must_use]
    pub fn with_surface(surface: Size) -> Self {
        Self { surface: Some(surface), ..Self::default() }
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Replace the transform wholesale, e.g. when a saved project is opened.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.pan.active
    }

    #[must_use]
    pub fn surface(&self) -> Option<Size> {
        self.surface
    }

    /// Bind (`Some`) or unbind (`None`) the render surface.
    pub fn set_surface(&mut self, surface: Option<Size>) {
        self.surface = surface;
    }

    // --- Transforms ---

    #[must_use]
    pub fn screen_to_canvas(&self, sx: f64, sy: f64) -> Point {
        self.viewport.screen_to_canvas(Point::new(sx, sy))
    }

    #[must_use]
    pub fn canvas_to_screen(&self, cx: f64, cy: f64) -> Point {
        self.viewport.canvas_to_screen(Point::new(cx, cy))
    }

    // --- Pan ---

    /// Record the pan anchor and the current offset, and enter panning.
    pub fn start_pan(&mut self, sx: f64, sy: f64) {
        self.pan = PanAnchor {
            active: true,
            screen_start: Point::new(sx, sy),
            viewport_start: Point::new(self.viewport.x, self.viewport.y),
        };
    }

    /// Move the offset relative to the anchor. Returns `false` when not panning.
    pub fn update_pan(&mut self, sx: f64, sy: f64) -> bool {
        if !self.pan.active {
            return false;
        }
        self.viewport.x = self.pan.viewport_start.x + (sx - self.pan.screen_start.x);
        self.viewport.y = self.pan.viewport_start.y + (sy - self.pan.screen_start.y);
        true
    }

    pub fn end_pan(&mut self) {
        self.pan.active = false;
    }

    // --- Zoom ---

    /// Step the zoom in (`delta > 0`) or out, keeping the canvas point under
    /// `(center_x, center_y)` fixed on screen. Returns `false` when clamping
    /// leaves the zoom unchanged.
    pub fn zoom(&mut self, delta: f64, center_x: f64, center_y: f64) -> bool {
        let factor = if delta > 0.0 { 1.0 + ZOOM_STEP } else { 1.0 - ZOOM_STEP };
        self.zoom_by(factor, Point::new(center_x, center_y))
    }

    /// Multiply the zoom by `factor` around `center` (used for pinch and
    /// trackpad scale events).
    pub fn zoom_by(&mut self, factor: f64, center: Point) -> bool {
        self.zoom_to(self.viewport.zoom * factor, center)
    }

    /// Set the zoom to `target` (clamped) around `center`.
    #[allow(clippy::float_cmp)]
    pub fn zoom_to(&mut self, target: f64, center: Point) -> bool {
        let old_zoom = self.viewport.zoom;
        let new_zoom = target.clamp(MIN_ZOOM, MAX_ZOOM);
        if new_zoom == old_zoom {
            return false;
        }
        let scale = new_zoom / old_zoom;
        self.viewport.zoom = new_zoom;
        self.viewport.x = center.x - (center.x - self.viewport.x) * scale;
        self.viewport.y = center.y - (center.y - self.viewport.y) * scale;
        true
    }

    pub fn reset_viewport(&mut self) {
        self.viewport = Viewport::default();
    }

    /// Scale and center content of the given size within the bound surface.
    ///
    /// No-op (returns `false`) when no surface is bound or the content has
    /// no area.
    pub fn fit_to_screen(&mut self, content_width: f64, content_height: f64) -> bool {
        let Some(surface) = self.surface else {
            return false;
        };
        if content_width <= 0.0 || content_height <= 0.0 {
            return false;
        }
        let scale_x = surface.width / content_width;
        let scale_y = surface.height / content_height;
        let scale = scale_x.min(scale_y) * FIT_MARGIN;

        self.viewport.zoom = scale;
        self.viewport.x = (surface.width - content_width * scale) / 2.0;
        self.viewport.y = (surface.height - content_height * scale) / 2.0;
        true
    }
}
