#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Point
// =============================================================

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_default_is_origin() {
    assert_eq!(Point::default(), Point::new(0.0, 0.0));
}

#[test]
fn point_delta_from() {
    let d = Point::new(10.0, 5.0).delta_from(Point::new(4.0, 8.0));
    assert_eq!(d, Point::new(6.0, -3.0));
}

#[test]
fn point_offset() {
    assert_eq!(Point::new(1.0, 2.0).offset(3.0, -4.0), Point::new(4.0, -2.0));
}

#[test]
fn point_serde_shape() {
    let json = serde_json::to_value(Point::new(1.5, 2.0)).unwrap();
    assert_eq!(json, serde_json::json!({ "x": 1.5, "y": 2.0 }));
}

// =============================================================
// Size
// =============================================================

#[test]
fn size_area() {
    assert_eq!(Size::new(20.0, 5.0).area(), 100.0);
}

#[test]
fn size_serde_shape() {
    let json = serde_json::to_value(Size::new(100.0, 80.0)).unwrap();
    assert_eq!(json, serde_json::json!({ "width": 100.0, "height": 80.0 }));
}

// =============================================================
// Rect: containment
// =============================================================

#[test]
fn rect_contains_interior_point() {
    let r = Rect::new(0.0, 0.0, 100.0, 50.0);
    assert!(r.contains(Point::new(50.0, 25.0)));
}

#[test]
fn rect_contains_is_edge_inclusive() {
    let r = Rect::new(10.0, 10.0, 100.0, 50.0);
    assert!(r.contains(Point::new(10.0, 10.0)));
    assert!(r.contains(Point::new(110.0, 60.0)));
    assert!(r.contains(Point::new(110.0, 30.0)));
}

#[test]
fn rect_does_not_contain_outside_point() {
    let r = Rect::new(10.0, 10.0, 100.0, 50.0);
    assert!(!r.contains(Point::new(9.99, 30.0)));
    assert!(!r.contains(Point::new(50.0, 60.01)));
}

// =============================================================
// Rect: intersection
// =============================================================

#[test]
fn rect_intersects_overlapping() {
    let a = Rect::new(0.0, 0.0, 100.0, 100.0);
    let b = Rect::new(50.0, 50.0, 100.0, 100.0);
    assert!(a.intersects(&b));
    assert!(b.intersects(&a));
}

#[test]
fn rect_touching_edges_intersect() {
    let a = Rect::new(0.0, 0.0, 100.0, 100.0);
    let b = Rect::new(100.0, 0.0, 50.0, 50.0);
    assert!(a.intersects(&b));
}

#[test]
fn rect_disjoint_do_not_intersect() {
    let a = Rect::new(0.0, 0.0, 100.0, 100.0);
    let b = Rect::new(100.5, 0.0, 50.0, 50.0);
    let c = Rect::new(0.0, -60.0, 50.0, 50.0);
    assert!(!a.intersects(&b));
    assert!(!a.intersects(&c));
}

#[test]
fn rect_containing_rect_intersects() {
    let outer = Rect::new(0.0, 0.0, 500.0, 500.0);
    let inner = Rect::new(100.0, 100.0, 10.0, 10.0);
    assert!(outer.intersects(&inner));
    assert!(inner.intersects(&outer));
}

// =============================================================
// Rect: inflate / union / bounding
// =============================================================

#[test]
fn rect_inflate_grows_every_side() {
    let r = Rect::new(10.0, 20.0, 30.0, 40.0).inflate(5.0);
    assert_eq!(r, Rect::new(5.0, 15.0, 40.0, 50.0));
}

#[test]
fn rect_union_covers_both() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(20.0, -5.0, 10.0, 10.0);
    assert_eq!(a.union(&b), Rect::new(0.0, -5.0, 30.0, 15.0));
}

#[test]
fn rect_bounding_empty_is_none() {
    assert!(Rect::bounding(Vec::new()).is_none());
}

#[test]
fn rect_bounding_of_several() {
    let rects = vec![Rect::new(100.0, 100.0, 50.0, 50.0), Rect::new(200.0, 150.0, 50.0, 50.0)];
    assert_eq!(Rect::bounding(rects), Some(Rect::new(100.0, 100.0, 150.0, 100.0)));
}

#[test]
fn rect_parts_round_trip() {
    let r = Rect::from_parts(Point::new(1.0, 2.0), Size::new(3.0, 4.0));
    assert_eq!(r.position(), Point::new(1.0, 2.0));
    assert_eq!(r.size(), Size::new(3.0, 4.0));
    assert_eq!(r.right(), 4.0);
    assert_eq!(r.bottom(), 6.0);
}
