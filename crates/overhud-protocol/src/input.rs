//! Translated input events delivered to surfaces.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An input event in the shape the UI toolkit accepts.
///
/// Produced by the compositor's translation helper from raw platform input.
/// Positional fields are optional because keyboard events carry none; every
/// other field rides along untyped since the toolkit contract, not the
/// coordinator, gives them meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceInput {
    /// Horizontal position. Device pixels as translated, logical pixels once
    /// the coordinator has applied scale correction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    /// Vertical position, same unit convention as `x`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    /// Remaining toolkit fields (event type, buttons, key codes, ...).
    #[serde(flatten)]
    pub rest: serde_json::Map<String, Value>,
}

impl SurfaceInput {
    /// True if the event carries a position.
    pub fn has_position(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn positionless_events_skip_coordinates() {
        let ev: SurfaceInput =
            serde_json::from_value(json!({"type": "keyDown", "keyCode": "A"})).unwrap();
        assert!(!ev.has_position());
        let v = serde_json::to_value(&ev).unwrap();
        assert!(v.get("x").is_none());
        assert_eq!(v["type"], "keyDown");
    }

    #[test]
    fn positions_survive_round_trip() {
        let ev: SurfaceInput =
            serde_json::from_value(json!({"type": "mouseMove", "x": 250, "y": 125})).unwrap();
        assert_eq!(ev.x, Some(250));
        assert_eq!(ev.y, Some(125));
    }
}
