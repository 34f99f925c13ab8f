//! Decoded compositor events.
//!
//! The compositor delivers `(event_name, payload)` pairs through a single
//! callback. Decoding into [`CompositorEvent`] happens exactly once, at the
//! session boundary; everything downstream matches on the variant instead of
//! comparing strings.

use serde::Deserialize;
use serde_json::Value;

/// Event name for raw game input.
pub const EVENT_INPUT: &str = "game.input";
/// Event name for frame-rate samples.
pub const EVENT_FPS: &str = "graphics.fps";
/// Event name for global hotkey presses.
pub const EVENT_HOTKEY_DOWN: &str = "game.hotkey.down";
/// Event name for overlay focus changes.
pub const EVENT_WINDOW_FOCUSED: &str = "game.window.focused";

/// The four event shapes the compositor is known to emit.
#[derive(Debug, Clone, PartialEq)]
pub enum CompositorEvent {
    /// Raw input addressed to one surface. The payload is kept opaque; it is
    /// handed back to the compositor's translation helper as-is.
    Input {
        /// Compositor-side identity of the target surface.
        window_id: u32,
        /// Raw platform input fields.
        payload: Value,
    },
    /// Frame-rate sample from the capture pipeline.
    Fps {
        /// Frames per second, rounded.
        fps: u32,
    },
    /// A bound hotkey was pressed.
    HotkeyDown {
        /// Symbolic action name from the installed binding table.
        name: String,
    },
    /// The compositor moved focus to a different overlay surface.
    WindowFocused {
        /// Surface that now holds focus.
        focus_window_id: u32,
    },
}

#[derive(Deserialize)]
struct FpsPayload {
    fps: u32,
}

#[derive(Deserialize)]
struct HotkeyPayload {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FocusPayload {
    focus_window_id: u32,
}

impl CompositorEvent {
    /// Decode a raw `(event_name, payload)` pair.
    ///
    /// Returns `None` for unknown event names and for payloads missing the
    /// fields their shape requires; callers drop those silently.
    pub fn decode(event: &str, payload: Value) -> Option<Self> {
        match event {
            EVENT_INPUT => {
                let window_id = payload.get("windowId")?.as_u64()? as u32;
                Some(Self::Input { window_id, payload })
            }
            EVENT_FPS => {
                let FpsPayload { fps } = serde_json::from_value(payload).ok()?;
                Some(Self::Fps { fps })
            }
            EVENT_HOTKEY_DOWN => {
                let HotkeyPayload { name } = serde_json::from_value(payload).ok()?;
                Some(Self::HotkeyDown { name })
            }
            EVENT_WINDOW_FOCUSED => {
                let FocusPayload { focus_window_id } = serde_json::from_value(payload).ok()?;
                Some(Self::WindowFocused { focus_window_id })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_all_four_shapes() {
        let ev = CompositorEvent::decode(EVENT_INPUT, json!({"windowId": 3, "msg": 512}));
        assert!(matches!(ev, Some(CompositorEvent::Input { window_id: 3, .. })));

        let ev = CompositorEvent::decode(EVENT_FPS, json!({"fps": 144}));
        assert_eq!(ev, Some(CompositorEvent::Fps { fps: 144 }));

        let ev = CompositorEvent::decode(EVENT_HOTKEY_DOWN, json!({"name": "app.reload"}));
        assert_eq!(
            ev,
            Some(CompositorEvent::HotkeyDown {
                name: "app.reload".into()
            })
        );

        let ev = CompositorEvent::decode(EVENT_WINDOW_FOCUSED, json!({"focusWindowId": 7}));
        assert_eq!(
            ev,
            Some(CompositorEvent::WindowFocused { focus_window_id: 7 })
        );
    }

    #[test]
    fn unknown_event_name_is_dropped() {
        assert_eq!(
            CompositorEvent::decode("game.unknown", json!({"x": 1})),
            None
        );
    }

    #[test]
    fn malformed_payload_is_dropped() {
        assert_eq!(CompositorEvent::decode(EVENT_FPS, json!({})), None);
        assert_eq!(
            CompositorEvent::decode(EVENT_INPUT, json!({"msg": 512})),
            None
        );
        assert_eq!(
            CompositorEvent::decode(EVENT_HOTKEY_DOWN, json!("app.reload")),
            None
        );
    }

    #[test]
    fn input_payload_is_preserved_verbatim() {
        let raw = json!({"windowId": 9, "msg": 512, "lParam": 123, "wParam": 456});
        match CompositorEvent::decode(EVENT_INPUT, raw.clone()) {
            Some(CompositorEvent::Input { payload, .. }) => assert_eq!(payload, raw),
            other => panic!("unexpected decode: {other:?}"),
        }
    }
}
