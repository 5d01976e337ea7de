//! Multi-pointer tracking and pinch gesture recognition.
//!
//! The host forwards raw pointer and wheel events (client-space coordinates)
//! to a [`GestureTracker`]. Two simultaneous contacts form a pinch; the
//! tracker reports the scale relative to the distance at pinch start so the
//! caller can derive the target zoom from the zoom it had at that moment.
//! Trackpad pinches arrive as wheel events with the precision-zoom modifier
//! and are translated into one-shot scale factors instead.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use crate::consts::{TRACKPAD_ZOOM_IN, TRACKPAD_ZOOM_OUT};
use crate::geom::Point;
use crate::input::Modifiers;

/// Transient identifier of an active contact; unique only while it is down.
pub type PointerId = i64;

/// Screen-space location of one active contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInfo {
    pub id: PointerId,
    pub x: f64,
    pub y: f64,
}

impl PointerInfo {
    #[must_use]
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Pointer event as delivered by the host.
#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    pub pointer_id: PointerId,
    pub client_x: f64,
    pub client_y: f64,
}

/// Wheel / trackpad scroll event as delivered by the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct WheelEvent {
    /// Horizontal scroll amount.
    pub delta_x: f64,
    /// Vertical scroll amount (positive = down).
    pub delta_y: f64,
    pub client_x: f64,
    pub client_y: f64,
    pub modifiers: Modifiers,
}

/// Scale and focal point produced by a pinch update or trackpad pinch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchUpdate {
    pub scale: f64,
    pub center: Point,
}

/// Pinch recognizer state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PinchState {
    #[default]
    Idle,
    Pinching {
        /// Contact distance when the pinch began.
        initial_distance: f64,
        /// Viewport zoom when the pinch began.
        initial_zoom: f64,
        /// Midpoint of the contacts when the pinch began.
        center: Point,
    },
}

/// Euclidean distance between two contacts.
#[must_use]
pub fn distance(p1: &PointerInfo, p2: &PointerInfo) -> f64 {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    dx.hypot(dy)
}

/// Midpoint of two contacts.
#[must_use]
pub fn center(p1: &PointerInfo, p2: &PointerInfo) -> Point {
    Point::new((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0)
}

/// Translate a precision-zoom wheel event into a one-shot scale factor.
///
/// Returns `None` unless Ctrl is held. Scrolling down zooms out.
#[must_use]
pub fn trackpad_pinch(event: &WheelEvent) -> Option<PinchUpdate> {
    if !event.modifiers.ctrl {
        return None;
    }
    let scale = if event.delta_y > 0.0 { TRACKPAD_ZOOM_OUT } else { TRACKPAD_ZOOM_IN };
    Some(PinchUpdate { scale, center: Point::new(event.client_x, event.client_y) })
}

/// Active contacts in arrival order plus the pinch state machine.
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    pointers: Vec<PointerInfo>,
    pinch: PinchState,
}

impl GestureTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Pointer map ---

    /// Insert a contact, or move it if the id is already tracked (keeping its
    /// original position in the arrival order).
    pub fn add_pointer(&mut self, event: &PointerEvent) -> PointerInfo {
        let info = PointerInfo { id: event.pointer_id, x: event.client_x, y: event.client_y };
        match self.pointers.iter_mut().find(|p| p.id == info.id) {
            Some(existing) => *existing = info,
            None => self.pointers.push(info),
        }
        info
    }

    /// Move a tracked contact. Returns `None` for unknown ids.
    pub fn update_pointer(&mut self, event: &PointerEvent) -> Option<PointerInfo> {
        let pointer = self.pointers.iter_mut().find(|p| p.id == event.pointer_id)?;
        pointer.x = event.client_x;
        pointer.y = event.client_y;
        Some(*pointer)
    }

    pub fn remove_pointer(&mut self, event: &PointerEvent) {
        self.pointers.retain(|p| p.id != event.pointer_id);
    }

    #[must_use]
    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    #[must_use]
    pub fn pointers(&self) -> &[PointerInfo] {
        &self.pointers
    }

    /// The two active contacts, in arrival order, iff exactly two are down.
    #[must_use]
    pub fn two_pointers(&self) -> Option<(PointerInfo, PointerInfo)> {
        match self.pointers.as_slice() {
            [a, b] => Some((*a, *b)),
            _ => None,
        }
    }

    /// Drop every contact and force the pinch back to idle.
    pub fn clear_pointers(&mut self) {
        self.pointers.clear();
        self.end_pinch();
    }

    // --- Pinch ---

    #[must_use]
    pub fn pinch(&self) -> PinchState {
        self.pinch
    }

    #[must_use]
    pub fn is_pinching(&self) -> bool {
        matches!(self.pinch, PinchState::Pinching { .. })
    }

    /// Zoom recorded at pinch start, if pinching.
    #[must_use]
    pub fn initial_zoom(&self) -> Option<f64> {
        match self.pinch {
            PinchState::Pinching { initial_zoom, .. } => Some(initial_zoom),
            PinchState::Idle => None,
        }
    }

    /// Begin a pinch. Fails (staying idle) unless exactly two contacts are down.
    pub fn start_pinch(&mut self, current_zoom: f64) -> bool {
        let Some((p1, p2)) = self.two_pointers() else {
            return false;
        };
        self.pinch = PinchState::Pinching {
            initial_distance: distance(&p1, &p2),
            initial_zoom: current_zoom,
            center: center(&p1, &p2),
        };
        true
    }

    /// Current scale relative to pinch start.
    ///
    /// Returns `None` when idle. If the contact count has changed away from
    /// two, the pinch ends here and `None` is returned.
    pub fn update_pinch(&mut self) -> Option<PinchUpdate> {
        let PinchState::Pinching { initial_distance, .. } = self.pinch else {
            return None;
        };
        let Some((p1, p2)) = self.two_pointers() else {
            self.end_pinch();
            return None;
        };
        let current = distance(&p1, &p2);
        let scale = if initial_distance > 0.0 { current / initial_distance } else { 1.0 };
        Some(PinchUpdate { scale, center: center(&p1, &p2) })
    }

    pub fn end_pinch(&mut self) {
        self.pinch = PinchState::Idle;
    }
}
