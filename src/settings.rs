//! Board settings parsed from environment variables.

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use std::env::VarError;

use crate::consts::{DEFAULT_CANVAS_SIZE, DEFAULT_MAX_IMAGE_SIZE, MIN_IMPORT_SCALE};
use crate::geom::Size;

pub const ENV_AUTO_SCALE: &str = "MOODBOARD_AUTO_SCALE";
pub const ENV_MAX_IMAGE_SIZE: &str = "MOODBOARD_MAX_IMAGE_SIZE";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Parse { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Shrink large images on import.
    pub auto_scale: bool,
    /// Longer side above which an import is shrunk.
    pub max_image_size: f64,
    /// Logical canvas extent recorded in saved projects.
    pub canvas_size: Size,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_scale: true,
            max_image_size: DEFAULT_MAX_IMAGE_SIZE,
            canvas_size: Size::new(DEFAULT_CANVAS_SIZE, DEFAULT_CANVAS_SIZE),
        }
    }
}

impl Settings {
    /// Build settings from environment variables.
    ///
    /// Optional:
    /// - `MOODBOARD_AUTO_SCALE`: `true` (default) / `false` (also `1` / `0`)
    /// - `MOODBOARD_MAX_IMAGE_SIZE`: positive number, default 1200
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(VarError::NotPresent) => None,
            Err(VarError::NotUnicode(raw)) => Some(raw.to_string_lossy().into_owned()),
        })
    }

    /// Build settings from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when a variable is present but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        if let Some(raw) = lookup(ENV_AUTO_SCALE) {
            settings.auto_scale = parse_bool(ENV_AUTO_SCALE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_IMAGE_SIZE) {
            settings.max_image_size = parse_positive(ENV_MAX_IMAGE_SIZE, &raw)?;
        }
        Ok(settings)
    }

    pub fn toggle_auto_scale(&mut self) {
        self.auto_scale = !self.auto_scale;
    }

    pub fn set_max_image_size(&mut self, size: f64) {
        self.max_image_size = size;
    }

    /// Displayed size for an imported image of `natural` size.
    ///
    /// When auto-scaling is on and the longer side exceeds the limit, the
    /// image is shrunk by `limit / side`, damped logarithmically so very large
    /// images shrink harder, never below 10%. Each side is then rounded.
    #[must_use]
    pub fn scaled_size(&self, natural: Size) -> Size {
        let longest = natural.width.max(natural.height);
        if !self.auto_scale || longest <= self.max_image_size {
            return natural;
        }
        let ratio = self.max_image_size / longest;
        let damping = 1.0 - (longest / self.max_image_size).log10() / 3.0;
        let scale = (ratio * damping).max(MIN_IMPORT_SCALE);
        Size::new((natural.width * scale).round(), (natural.height * scale).round())
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::Parse { var, value: raw.to_owned() }),
    }
}

fn parse_positive(var: &'static str, raw: &str) -> Result<f64, ConfigError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(ConfigError::Parse { var, value: raw.to_owned() }),
    }
}
