//! Shared types for the compositor boundary.
//!
//! Everything that crosses the process boundary between the coordinator and
//! the external overlay compositor lives here: geometry, window registration
//! options, hotkey bindings, the decoded event union, out-of-band commands,
//! and the translated input shape delivered to surfaces. The compositor's own
//! capture/injection/rendering machinery is opaque; these types describe only
//! its wire contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod cursor;
pub mod events;
pub mod geom;
pub mod input;
pub mod window;

pub use cursor::CursorShape;
pub use events::CompositorEvent;
pub use geom::{CaptionInsets, Rect};
pub use input::SurfaceInput;
pub use window::WindowOptions;

/// Integer identity assigned to a surface for the compositor session.
///
/// Valid only while the surface is registered; the coordinator never reuses
/// an id without an intervening unregistration.
pub type SurfaceId = u32;

/// Modifier set required for a hotkey binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    /// Whether the control key must be held.
    pub ctrl: bool,
}

/// One entry of the fixed hotkey table installed into the compositor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotkeyBinding {
    /// Symbolic action name reported back in hotkey-down events.
    pub name: String,
    /// Platform virtual key code.
    #[serde(rename = "keyCode")]
    pub key_code: u16,
    /// Required modifier set.
    pub modifiers: Modifiers,
}

impl HotkeyBinding {
    /// Binding with no modifiers.
    pub fn plain(name: &str, key_code: u16) -> Self {
        Self {
            name: name.to_string(),
            key_code,
            modifiers: Modifiers::default(),
        }
    }

    /// Binding that requires the control key.
    pub fn ctrl(name: &str, key_code: u16) -> Self {
        Self {
            name: name.to_string(),
            key_code,
            modifiers: Modifiers { ctrl: true },
        }
    }
}

/// Out-of-band command sent to the compositor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum OverlayCommand {
    /// Switch the native cursor shown over overlay surfaces.
    #[serde(rename = "cursor")]
    Cursor {
        /// Native cursor name, e.g. `IDC_ARROW`.
        cursor: String,
    },
    /// Toggle exclusive input interception for the overlay.
    #[serde(rename = "input.intercept")]
    InputIntercept {
        /// True to start intercepting, false to stop.
        intercept: bool,
    },
}

/// A top-level window reported by the compositor's process enumeration.
///
/// Only `title` is interpreted; the remaining fields are carried verbatim so
/// the object can be handed back to `inject_process` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopWindow {
    /// Window title used for target matching.
    pub title: String,
    /// Opaque enumeration fields, passed back as-is.
    #[serde(flatten)]
    pub rest: serde_json::Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_wire_shape() {
        let cmd = OverlayCommand::Cursor {
            cursor: "IDC_HAND".into(),
        };
        let v = serde_json::to_value(&cmd).unwrap();
        assert_eq!(v["command"], "cursor");
        assert_eq!(v["cursor"], "IDC_HAND");

        let cmd = OverlayCommand::InputIntercept { intercept: true };
        let v = serde_json::to_value(&cmd).unwrap();
        assert_eq!(v["command"], "input.intercept");
        assert_eq!(v["intercept"], true);
    }

    #[test]
    fn binding_wire_shape() {
        let b = HotkeyBinding::ctrl("app.reload", 116);
        let v = serde_json::to_value(&b).unwrap();
        assert_eq!(v["name"], "app.reload");
        assert_eq!(v["keyCode"], 116);
        assert_eq!(v["modifiers"]["ctrl"], true);
    }
}
