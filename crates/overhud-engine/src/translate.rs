//! Scale correction and input translation.
//!
//! The compositor reports device pixels; surfaces think in logical pixels.
//! One scale factor, read from the primary display at session start, covers
//! both directions: outgoing geometry multiplies, incoming pointer
//! coordinates divide.

use serde_json::Value;
use tracing::warn;

use overhud_protocol::{Rect, SurfaceInput};

use crate::deps::CompositorApi;

/// Device-pixel-to-logical-pixel ratio, fixed for the session's lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale(f64);

impl Scale {
    /// No scaling.
    pub const IDENTITY: Self = Self(1.0);

    /// Construct from a display scale factor. Non-finite or non-positive
    /// inputs fall back to identity.
    pub fn new(factor: f64) -> Self {
        if factor.is_finite() && factor > 0.0 {
            Self(factor)
        } else {
            warn!(factor, "invalid display scale factor, using 1.0");
            Self::IDENTITY
        }
    }

    /// The raw factor.
    pub fn factor(self) -> f64 {
        self.0
    }

    /// Logical → device pixels, floored.
    pub fn to_device(self, value: i32) -> i32 {
        (f64::from(value) * self.0).floor() as i32
    }

    /// Device → logical pixels, rounded to nearest.
    pub fn to_logical(self, value: i32) -> i32 {
        (f64::from(value) / self.0).round() as i32
    }

    /// Scale a logical rect's dimensions to device pixels. Position is left
    /// untouched; the compositor takes origin in logical coordinates.
    pub fn device_rect(self, rect: Rect) -> Rect {
        Rect {
            x: rect.x,
            y: rect.y,
            width: self.to_device(rect.width),
            height: self.to_device(rect.height),
        }
    }
}

/// Translates compositor-native input payloads into surface input events.
#[derive(Debug, Clone, Copy)]
pub struct InputTranslator {
    /// Session scale factor applied to incoming positions.
    scale: Scale,
}

impl InputTranslator {
    /// Translator with the given session scale.
    pub fn new(scale: Scale) -> Self {
        Self { scale }
    }

    /// The scale this translator corrects with.
    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Map a raw payload through the compositor's translation helper and
    /// correct positional fields to logical pixels.
    ///
    /// `None` means the payload has no toolkit shape; callers drop it
    /// silently. Foreign input streams are expected to contain events the UI
    /// layer does not model.
    pub fn translate(
        &self,
        compositor: &dyn CompositorApi,
        payload: Value,
    ) -> Option<SurfaceInput> {
        let mut event = compositor.translate_input_event(payload)?;
        if let Some(x) = event.x {
            event.x = Some(self.scale.to_logical(x));
        }
        if let Some(y) = event.y {
            event.y = Some(self.scale.to_logical(y));
        }
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support::MockCompositor;

    #[test]
    fn device_and_logical_round_trip() {
        let scale = Scale::new(1.25);
        assert_eq!(scale.to_device(320), 400);
        assert_eq!(scale.to_device(220), 275);
        assert_eq!(scale.to_logical(250), 200);
        assert_eq!(scale.to_logical(125), 100);
        // Floor on the way out, round on the way in.
        assert_eq!(Scale::new(1.5).to_device(33), 49);
        assert_eq!(Scale::new(1.5).to_logical(50), 33);
    }

    #[test]
    fn rect_scaling_leaves_origin_alone() {
        let scaled = Scale::new(1.25).device_rect(Rect::new(7, 9, 400, 300));
        assert_eq!(scaled, Rect::new(7, 9, 500, 375));
    }

    #[test]
    fn degenerate_factors_fall_back_to_identity() {
        assert_eq!(Scale::new(0.0), Scale::IDENTITY);
        assert_eq!(Scale::new(-2.0), Scale::IDENTITY);
        assert_eq!(Scale::new(f64::NAN), Scale::IDENTITY);
    }

    #[test]
    fn positions_are_corrected_to_logical() {
        let compositor = MockCompositor::new();
        let translator = InputTranslator::new(Scale::new(1.25));
        let event = translator
            .translate(
                &compositor,
                json!({"windowId": 1, "type": "mouseMove", "x": 250, "y": 125}),
            )
            .unwrap();
        assert_eq!(event.x, Some(200));
        assert_eq!(event.y, Some(100));
    }

    #[test]
    fn untranslatable_payloads_are_dropped() {
        let compositor = MockCompositor::new();
        let translator = InputTranslator::new(Scale::IDENTITY);
        // No toolkit shape for this payload; the mock mirrors the native
        // helper by returning nothing.
        assert!(
            translator
                .translate(&compositor, json!({"windowId": 1, "msg": 49322}))
                .is_none()
        );
    }

    #[test]
    fn positionless_events_pass_through_unchanged() {
        let compositor = MockCompositor::new();
        let translator = InputTranslator::new(Scale::new(2.0));
        let event = translator
            .translate(
                &compositor,
                json!({"windowId": 1, "type": "keyDown", "keyCode": "F"}),
            )
            .unwrap();
        assert_eq!(event.x, None);
        assert_eq!(event.y, None);
        assert_eq!(event.rest["keyCode"], "F");
    }
}
