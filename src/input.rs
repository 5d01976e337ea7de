//! Input model: modifier keys, mouse buttons, and the input-mode preference.
//!
//! The board can be driven by a wheel mouse, a trackpad, or a touch screen.
//! Each `InputMode` maps to an `InputConfig` that decides which gestures pan
//! and which zoom. The chosen mode is persisted as a single string through an
//! injected [`PreferenceStore`] so it survives restarts.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Preference key the input mode is stored under.
pub const INPUT_MODE_KEY: &str = "garden-input-mode";

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held. Browsers also set this for trackpad pinches.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl or Cmd, the platform "add to selection" chord.
    #[must_use]
    pub fn multi_select(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// Which physical device the gesture mapping is tuned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Middle-drag or Alt-drag pans; the wheel zooms.
    Mouse,
    /// Space-drag or two-finger scroll pans; Ctrl+wheel (pinch) zooms.
    #[default]
    Trackpad,
    /// Touch contacts pan and pinch; no keyboard chords.
    Touch,
}

impl InputMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mouse => "mouse",
            Self::Trackpad => "trackpad",
            Self::Touch => "touch",
        }
    }

    /// The mode after this one in the toggle cycle.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Mouse => Self::Trackpad,
            Self::Trackpad => Self::Touch,
            Self::Touch => Self::Mouse,
        }
    }

    /// Gesture switches for this mode.
    #[must_use]
    pub fn config(self) -> InputConfig {
        match self {
            Self::Mouse => InputConfig {
                middle_button_pan: true,
                alt_pan: true,
                space_pan: false,
                two_finger_pan: false,
                wheel_zoom: true,
                ctrl_wheel_zoom: false,
                touch_gestures: false,
            },
            Self::Trackpad => InputConfig {
                middle_button_pan: false,
                alt_pan: false,
                space_pan: true,
                two_finger_pan: true,
                wheel_zoom: false,
                ctrl_wheel_zoom: true,
                touch_gestures: true,
            },
            Self::Touch => InputConfig {
                middle_button_pan: false,
                alt_pan: false,
                space_pan: false,
                two_finger_pan: true,
                wheel_zoom: false,
                ctrl_wheel_zoom: true,
                touch_gestures: true,
            },
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name an [`InputMode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown input mode: {0}")]
pub struct UnknownInputMode(pub String);

impl FromStr for InputMode {
    type Err = UnknownInputMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mouse" => Ok(Self::Mouse),
            "trackpad" => Ok(Self::Trackpad),
            "touch" => Ok(Self::Touch),
            other => Err(UnknownInputMode(other.to_owned())),
        }
    }
}

/// What an unmodified or modified wheel event should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelIntent {
    Zoom,
    Pan,
}

/// Gesture switches derived from an [`InputMode`].
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputConfig {
    pub middle_button_pan: bool,
    pub alt_pan: bool,
    pub space_pan: bool,
    pub two_finger_pan: bool,
    pub wheel_zoom: bool,
    pub ctrl_wheel_zoom: bool,
    pub touch_gestures: bool,
}

impl InputConfig {
    /// Whether a pointer-down with this button and chord starts a pan.
    #[must_use]
    pub fn should_pan(&self, button: Button, modifiers: Modifiers, space_held: bool) -> bool {
        match button {
            Button::Middle => self.middle_button_pan,
            Button::Primary => (self.alt_pan && modifiers.alt) || (self.space_pan && space_held),
            Button::Secondary => false,
        }
    }

    /// How a wheel event with the given chord is interpreted.
    #[must_use]
    pub fn wheel_intent(&self, modifiers: Modifiers) -> WheelIntent {
        if modifiers.ctrl {
            if self.ctrl_wheel_zoom || self.wheel_zoom {
                return WheelIntent::Zoom;
            }
            return WheelIntent::Pan;
        }
        if self.wheel_zoom { WheelIntent::Zoom } else { WheelIntent::Pan }
    }
}

/// Persistent string key-value storage owned by the host.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Process-local [`PreferenceStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }
}

/// Current input mode, persisted through a [`PreferenceStore`] on every change.
pub struct InputModeService<S: PreferenceStore> {
    store: S,
    mode: InputMode,
}

impl<S: PreferenceStore> InputModeService<S> {
    /// Load the stored mode, falling back to the default for missing or
    /// unrecognised values.
    pub fn new(store: S) -> Self {
        let mode = match store.get(INPUT_MODE_KEY) {
            Some(raw) => raw.parse().unwrap_or_else(|err: UnknownInputMode| {
                tracing::warn!(%err, "ignoring stored input mode");
                InputMode::default()
            }),
            None => InputMode::default(),
        };
        Self { store, mode }
    }

    #[must_use]
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    #[must_use]
    pub fn config(&self) -> InputConfig {
        self.mode.config()
    }

    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
        self.store.set(INPUT_MODE_KEY, mode.as_str());
    }

    /// Advance to the next mode in the cycle and return it.
    pub fn toggle(&mut self) -> InputMode {
        self.set_mode(self.mode.next());
        self.mode
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}
