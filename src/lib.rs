//! Geometry, layout, and archive core for an infinite-canvas image moodboard.
//!
//! The crate owns everything below the presentation layer: images and the
//! containers that group them, the pan/zoom viewport, pointer gestures, the
//! drag/resize engine, hit-testing, compact packing, and the project archive
//! format. Rendering and event wiring belong to the host; it feeds canvas
//! points and pointer events in and reads geometry back out.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`board`] | [`board::Board`] aggregate keeping images and containers consistent |
//! | [`doc`] | Image and container types, and the image store |
//! | [`container`] | Group / artboard managers |
//! | [`viewport`] | Pan/zoom transform and screen ↔ canvas conversions |
//! | [`gesture`] | Pointer tracking and the pinch state machine |
//! | [`input`] | Modifier keys, input modes, and the persisted mode preference |
//! | [`drag`] | Drag and resize engine for images and containers |
//! | [`hit`] | Point / rectangle / handle hit-testing and the selection marquee |
//! | [`pack`] | Compact packing of images into a non-overlapping layout |
//! | [`color`] | Artboard accent colours and contrast text |
//! | [`archive`] | TAR + gzip project archives |
//! | [`settings`] | Import scaling settings read from the environment |
//! | [`geom`] | Point, size, and rectangle value types |
//! | [`consts`] | Shared numeric constants (zoom limits, minimum sizes, etc.) |

pub mod archive;
pub mod board;
pub mod color;
pub mod consts;
pub mod container;
pub mod doc;
pub mod drag;
pub mod geom;
pub mod gesture;
pub mod hit;
pub mod input;
pub mod pack;
pub mod settings;
pub mod viewport;
