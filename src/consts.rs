//! Shared numeric constants for the moodboard crate.

// ── Viewport ────────────────────────────────────────────────────

/// Smallest zoom factor the viewport will settle on.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest zoom factor the viewport will settle on.
pub const MAX_ZOOM: f64 = 5.0;

/// Relative zoom change per wheel notch (`1 ± ZOOM_STEP`).
pub const ZOOM_STEP: f64 = 0.1;

/// Fraction of the render surface that fitted content may occupy.
pub const FIT_MARGIN: f64 = 0.9;

// ── Gestures ────────────────────────────────────────────────────

/// Per-event scale applied when a precision-zoom wheel event scrolls down.
pub const TRACKPAD_ZOOM_OUT: f64 = 0.95;

/// Per-event scale applied when a precision-zoom wheel event scrolls up.
pub const TRACKPAD_ZOOM_IN: f64 = 1.05;

// ── Drag / resize ───────────────────────────────────────────────

/// Default grab size of a resize handle, in canvas units.
pub const HANDLE_SIZE: f64 = 20.0;

/// Floor on either side of a resized image.
pub const ITEM_MIN_SIZE: f64 = 20.0;

/// Floor on either side of a resized group or artboard.
pub const CONTAINER_MIN_SIZE: f64 = 100.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Height of the clickable name strip drawn above an artboard.
pub const ARTBOARD_LABEL_HEIGHT: f64 = 25.0;

// ── Packing ─────────────────────────────────────────────────────

/// Minimum gap kept between neighbouring images after a tidy.
pub const PACK_SPACING: f64 = 10.0;

// ── Containers ──────────────────────────────────────────────────

/// Margin around the selection when a group is created from it.
pub const GROUP_PADDING: f64 = 20.0;

/// Margin around the selection when an artboard is created from it.
pub const ARTBOARD_PADDING: f64 = 40.0;

/// Margin around the children when a container is grown to fit them.
pub const AUTO_RESIZE_PADDING: f64 = 80.0;

/// Additional margin applied on top of [`AUTO_RESIZE_PADDING`].
pub const AUTO_RESIZE_EXTRA_MARGIN: f64 = 20.0;

// ── Import ──────────────────────────────────────────────────────

/// Default drop location for a newly imported image.
pub const DEFAULT_IMPORT_X: f64 = 100.0;

/// Default drop location for a newly imported image.
pub const DEFAULT_IMPORT_Y: f64 = 100.0;

/// Per-index offset applied to each file of a multi-file import.
pub const IMPORT_STAGGER: f64 = 20.0;

/// Default upper bound on the longer side of an auto-scaled import.
pub const DEFAULT_MAX_IMAGE_SIZE: f64 = 1200.0;

/// Lower bound on the auto-scale factor.
pub const MIN_IMPORT_SCALE: f64 = 0.1;

/// Default logical canvas extent recorded in saved projects.
pub const DEFAULT_CANVAS_SIZE: f64 = 10_000.0;

// ── Archive ─────────────────────────────────────────────────────

/// TAR block size in bytes.
pub const TAR_BLOCK: usize = 512;

/// Maximum length of an entry name in the TAR header.
pub const TAR_NAME_LEN: usize = 100;

/// Entry name of the project manifest inside an archive.
pub const MANIFEST_NAME: &str = "project.json";

/// Directory prefix under which image blobs are stored.
pub const IMAGE_PREFIX: &str = "images/";

/// Manifest format version written by this crate.
pub const FORMAT_VERSION: &str = "1.0.0";
