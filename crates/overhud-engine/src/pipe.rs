//! Frame/bounds pipe helpers.
//!
//! Builds the one-shot registration payload for a surface and maps surface
//! cursor reports to compositor commands. The per-event forwarding itself
//! lives on the coordinator loop; these helpers keep it pure and testable.

use overhud_protocol::{CaptionInsets, CursorShape, OverlayCommand, Rect, WindowOptions};

use crate::{
    deps::SurfaceHandle,
    registry::OverlayParams,
    translate::Scale,
};

/// Resize floor for resizable surfaces, logical pixels per edge.
const MIN_RESIZABLE_EDGE: i32 = 100;

/// Compute the registration payload for one surface.
///
/// Fixed-size surfaces are clamped to their current size in both directions;
/// resizable ones may grow to the display nearest the cursor and shrink to
/// the fixed floor. The rect ships in device pixels, origin untouched.
pub(crate) fn window_options(
    name: &str,
    handle: &dyn SurfaceHandle,
    params: OverlayParams,
    display: Rect,
    scale: Scale,
) -> WindowOptions {
    let bounds = handle.bounds();
    let resizable = handle.resizable();
    let (max_width, max_height) = if resizable {
        (display.width, display.height)
    } else {
        (bounds.width, bounds.height)
    };
    let (min_width, min_height) = if resizable {
        (MIN_RESIZABLE_EDGE, MIN_RESIZABLE_EDGE)
    } else {
        (bounds.width, bounds.height)
    };
    WindowOptions {
        name: name.to_string(),
        transparent: params.transparent,
        resizable,
        max_width,
        max_height,
        min_width,
        min_height,
        native_handle: handle.native_handle(),
        rect: scale.device_rect(bounds),
        caption: CaptionInsets::bordered(params.drag_border, params.caption_height),
        drag_border_width: params.drag_border,
    }
}

/// Map a surface cursor report to a compositor command.
///
/// Unknown shapes and the hidden cursor produce no command.
pub(crate) fn cursor_command(shape: &str) -> Option<OverlayCommand> {
    let native = CursorShape::from_css(shape)?.native_name();
    if native.is_empty() {
        return None;
    }
    Some(OverlayCommand::Cursor {
        cursor: native.to_string(),
    })
}
