//! Geometry primitives shared across the boundary.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle. Units depend on context: logical pixels on the
/// coordinator side, device pixels once scaled for the compositor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width, never negative.
    pub width: i32,
    /// Height, never negative.
    pub height: i32,
}

impl Rect {
    /// Construct a rectangle from parts.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Caption and drag-border insets used by the compositor for window-chrome
/// hit testing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionInsets {
    /// Left drag border width.
    pub left: i32,
    /// Right drag border width.
    pub right: i32,
    /// Top drag border width.
    pub top: i32,
    /// Caption height below the top border.
    pub height: i32,
}

impl CaptionInsets {
    /// Uniform drag border with a caption bar of the given height.
    pub fn bordered(drag_border: i32, caption_height: i32) -> Self {
        Self {
            left: drag_border,
            right: drag_border,
            top: drag_border,
            height: caption_height,
        }
    }
}
