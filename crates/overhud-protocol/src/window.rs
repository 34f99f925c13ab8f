//! Surface registration payload.

use serde::{Deserialize, Serialize};

use crate::geom::{CaptionInsets, Rect};

/// Everything the compositor needs to register one overlay surface.
///
/// `rect` is in device pixels; the min/max dimensions are logical and let the
/// compositor clamp interactive resizes without re-querying the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowOptions {
    /// Logical surface name, unique while the surface is live.
    pub name: String,
    /// Whether the surface background is transparent.
    pub transparent: bool,
    /// Whether the compositor should allow interactive resizing.
    pub resizable: bool,
    /// Resize clamp, upper bound.
    pub max_width: i32,
    /// Resize clamp, upper bound.
    pub max_height: i32,
    /// Resize clamp, lower bound.
    pub min_width: i32,
    /// Resize clamp, lower bound.
    pub min_height: i32,
    /// Platform handle of the underlying window.
    pub native_handle: u64,
    /// Initial bounds in device pixels.
    pub rect: Rect,
    /// Chrome hit-testing insets.
    pub caption: CaptionInsets,
    /// Drag border width, duplicated from the caption insets for the
    /// compositor's flat options shape.
    pub drag_border_width: i32,
}
