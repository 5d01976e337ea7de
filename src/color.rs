//! Artboard accent colours derived from their largest image.
//!
//! Pixel analysis is delegated to a [`ColorExtractor`] supplied by the host;
//! this module only picks the source image, formats the result, and chooses a
//! readable label colour.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use crate::container::{ARTBOARD_BACKGROUND, ARTBOARD_TEXT};
use crate::doc::{Container, ImageItem};

/// Label colour used on light backgrounds.
pub const DARK_TEXT: &str = "#000000";
/// Label colour used on dark backgrounds.
pub const LIGHT_TEXT: &str = "#ffffff";

/// An 8-bit sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// WCAG relative luminance in `[0, 1]`.
    #[must_use]
    pub fn luminance(self) -> f64 {
        fn channel(c: u8) -> f64 {
            let c = f64::from(c) / 255.0;
            if c <= 0.039_28 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
        }
        0.2126 * channel(self.r) + 0.7152 * channel(self.g) + 0.0722 * channel(self.b)
    }

    /// Black on light colours, white on dark ones.
    #[must_use]
    pub fn text_color(self) -> &'static str {
        if self.luminance() > 0.5 { DARK_TEXT } else { LIGHT_TEXT }
    }

    /// CSS `rgba(r, g, b, 1)` form.
    #[must_use]
    pub fn to_rgba(self) -> String {
        format!("rgba({}, {}, {}, 1)", self.r, self.g, self.b)
    }
}

/// Dominant-colour capability over encoded image bytes.
pub trait ColorExtractor {
    /// `None` when the payload cannot be analysed.
    fn dominant(&self, data: &[u8]) -> Option<Rgb>;
}

/// Largest image (by displayed area) that belongs to `container`, either
/// through its child list or through its membership field. The earliest
/// wins among equal areas.
#[must_use]
pub fn largest_member<'a>(container: &Container, items: &'a [ImageItem]) -> Option<&'a ImageItem> {
    items
        .iter()
        .filter(|i| container.has_child(i.id) || i.membership(container.kind) == Some(container.id))
        .fold(None, |best: Option<&ImageItem>, cur| match best {
            Some(b) if cur.size.area() <= b.size.area() => Some(b),
            _ => Some(cur),
        })
}

/// Recompute `container`'s background and text colours from its largest
/// member. Falls back to the artboard defaults when there is no member or
/// extraction fails. Returns whether an extracted colour was applied.
pub fn refresh_accent(container: &mut Container, items: &[ImageItem], extractor: &dyn ColorExtractor) -> bool {
    let extracted = largest_member(container, items).and_then(|img| extractor.dominant(&img.data));
    match extracted {
        Some(rgb) => {
            container.background_color = rgb.to_rgba();
            container.text_color = Some(rgb.text_color().to_owned());
            true
        }
        None => {
            container.background_color = ARTBOARD_BACKGROUND.to_owned();
            container.text_color = Some(ARTBOARD_TEXT.to_owned());
            false
        }
    }
}
