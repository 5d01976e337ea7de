#![allow(clippy::float_cmp)]

use super::*;

fn down(id: PointerId, x: f64, y: f64) -> PointerEvent {
    PointerEvent { pointer_id: id, client_x: x, client_y: y }
}

fn info(id: PointerId, x: f64, y: f64) -> PointerInfo {
    PointerInfo { id, x, y }
}

fn ctrl() -> Modifiers {
    Modifiers { ctrl: true, ..Default::default() }
}

fn two_finger_tracker() -> GestureTracker {
    let mut tracker = GestureTracker::new();
    tracker.add_pointer(&down(1, 100.0, 100.0));
    tracker.add_pointer(&down(2, 200.0, 100.0));
    tracker
}

// =============================================================
// Pointer map
// =============================================================

#[test]
fn add_pointer_tracks_contact() {
    let mut tracker = GestureTracker::new();
    let p = tracker.add_pointer(&down(7, 100.0, 200.0));
    assert_eq!(p, info(7, 100.0, 200.0));
    assert_eq!(tracker.pointer_count(), 1);
}

#[test]
fn update_pointer_moves_contact() {
    let mut tracker = GestureTracker::new();
    tracker.add_pointer(&down(1, 100.0, 100.0));
    let moved = tracker.update_pointer(&down(1, 150.0, 250.0));
    assert_eq!(moved, Some(info(1, 150.0, 250.0)));
    assert_eq!(tracker.pointers()[0], info(1, 150.0, 250.0));
}

#[test]
fn update_unknown_pointer_returns_none() {
    let mut tracker = GestureTracker::new();
    assert!(tracker.update_pointer(&down(9, 1.0, 1.0)).is_none());
    assert_eq!(tracker.pointer_count(), 0);
}

#[test]
fn remove_pointer_drops_contact() {
    let mut tracker = two_finger_tracker();
    tracker.remove_pointer(&down(1, 0.0, 0.0));
    assert_eq!(tracker.pointer_count(), 1);
    assert_eq!(tracker.pointers()[0].id, 2);
}

#[test]
fn re_adding_pointer_keeps_arrival_order() {
    let mut tracker = two_finger_tracker();
    tracker.add_pointer(&down(1, 5.0, 5.0));
    assert_eq!(tracker.pointer_count(), 2);
    let (a, b) = tracker.two_pointers().unwrap();
    assert_eq!(a, info(1, 5.0, 5.0));
    assert_eq!(b.id, 2);
}

#[test]
fn two_pointers_requires_exactly_two() {
    let mut tracker = GestureTracker::new();
    assert!(tracker.two_pointers().is_none());
    tracker.add_pointer(&down(1, 0.0, 0.0));
    assert!(tracker.two_pointers().is_none());
    tracker.add_pointer(&down(2, 1.0, 1.0));
    assert!(tracker.two_pointers().is_some());
    tracker.add_pointer(&down(3, 2.0, 2.0));
    assert!(tracker.two_pointers().is_none());
}

// =============================================================
// Distance / center
// =============================================================

#[test]
fn distance_is_euclidean() {
    assert_eq!(distance(&info(1, 0.0, 0.0), &info(2, 3.0, 4.0)), 5.0);
}

#[test]
fn center_is_midpoint() {
    assert_eq!(center(&info(1, 0.0, 0.0), &info(2, 3.0, 4.0)), Point::new(1.5, 2.0));
}

// =============================================================
// Pinch state machine
// =============================================================

#[test]
fn start_pinch_with_two_pointers() {
    let mut tracker = two_finger_tracker();
    assert!(tracker.start_pinch(1.5));
    assert!(tracker.is_pinching());
    assert_eq!(
        tracker.pinch(),
        PinchState::Pinching { initial_distance: 100.0, initial_zoom: 1.5, center: Point::new(150.0, 100.0) }
    );
    assert_eq!(tracker.initial_zoom(), Some(1.5));
}

#[test]
fn start_pinch_fails_with_one_pointer() {
    let mut tracker = GestureTracker::new();
    tracker.add_pointer(&down(1, 100.0, 100.0));
    assert!(!tracker.start_pinch(1.0));
    assert!(!tracker.is_pinching());
}

#[test]
fn start_pinch_fails_with_no_pointers() {
    let mut tracker = GestureTracker::new();
    assert!(!tracker.start_pinch(1.0));
    assert_eq!(tracker.pinch(), PinchState::Idle);
}

#[test]
fn start_pinch_fails_with_three_pointers() {
    let mut tracker = two_finger_tracker();
    tracker.add_pointer(&down(3, 0.0, 0.0));
    assert!(!tracker.start_pinch(1.0));
    assert!(!tracker.is_pinching());
}

#[test]
fn update_pinch_reports_scale_and_center() {
    let mut tracker = two_finger_tracker();
    tracker.start_pinch(1.0);
    tracker.update_pointer(&down(2, 300.0, 100.0));
    let update = tracker.update_pinch().unwrap();
    assert_eq!(update.scale, 2.0);
    assert_eq!(update.center, Point::new(200.0, 100.0));
}

#[test]
fn update_pinch_when_idle_returns_none() {
    let mut tracker = two_finger_tracker();
    assert!(tracker.update_pinch().is_none());
}

#[test]
fn update_pinch_self_heals_after_lost_pointer() {
    let mut tracker = two_finger_tracker();
    tracker.start_pinch(1.0);
    tracker.remove_pointer(&down(2, 0.0, 0.0));
    assert!(tracker.update_pinch().is_none());
    assert!(!tracker.is_pinching());
}

#[test]
fn update_pinch_with_coincident_start_reports_unit_scale() {
    let mut tracker = GestureTracker::new();
    tracker.add_pointer(&down(1, 50.0, 50.0));
    tracker.add_pointer(&down(2, 50.0, 50.0));
    tracker.start_pinch(1.0);
    tracker.update_pointer(&down(2, 80.0, 90.0));
    assert_eq!(tracker.update_pinch().unwrap().scale, 1.0);
}

#[test]
fn end_pinch_forces_idle() {
    let mut tracker = two_finger_tracker();
    tracker.start_pinch(1.0);
    tracker.end_pinch();
    assert!(!tracker.is_pinching());
    assert!(tracker.initial_zoom().is_none());
}

#[test]
fn clear_pointers_empties_map_and_ends_pinch() {
    let mut tracker = two_finger_tracker();
    tracker.start_pinch(1.0);
    tracker.clear_pointers();
    assert_eq!(tracker.pointer_count(), 0);
    assert!(!tracker.is_pinching());
}

// =============================================================
// Trackpad pinch
// =============================================================

#[test]
fn trackpad_pinch_with_ctrl_scroll_up_zooms_in() {
    let event = WheelEvent { delta_y: -10.0, client_x: 100.0, client_y: 200.0, modifiers: ctrl(), ..Default::default() };
    let update = trackpad_pinch(&event).unwrap();
    assert_eq!(update.scale, TRACKPAD_ZOOM_IN);
    assert_eq!(update.center, Point::new(100.0, 200.0));
}

#[test]
fn trackpad_pinch_with_ctrl_scroll_down_zooms_out() {
    let event = WheelEvent { delta_y: 10.0, client_x: 5.0, client_y: 6.0, modifiers: ctrl(), ..Default::default() };
    assert_eq!(trackpad_pinch(&event).unwrap().scale, 0.95);
}

#[test]
fn trackpad_pinch_without_ctrl_returns_none() {
    let event = WheelEvent { delta_y: -10.0, client_x: 100.0, client_y: 200.0, ..Default::default() };
    assert!(trackpad_pinch(&event).is_none());
}

#[test]
fn trackpad_pinch_ignores_other_modifiers() {
    let modifiers = Modifiers { meta: true, shift: true, ..Default::default() };
    let event = WheelEvent { delta_y: 3.0, modifiers, ..Default::default() };
    assert!(trackpad_pinch(&event).is_none());
}
