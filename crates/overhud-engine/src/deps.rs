//! Trait seams for the coordinator's external collaborators.
//!
//! The compositor library, display metrics, and the UI toolkit all live
//! outside this crate. Each is consumed through a narrow trait so the
//! coordinator can be driven end-to-end by the mocks in
//! [`crate::test_support`]. A production build implements these over the
//! native compositor module and the host toolkit's window type.

use serde_json::Value;

use overhud_protocol::{
    HotkeyBinding, OverlayCommand, Rect, SurfaceId, SurfaceInput, TopWindow, WindowOptions,
};

use crate::Result;

/// Raw event callback installed into the compositor library.
///
/// May be invoked from a compositor-owned thread; implementations must
/// marshal back onto the coordinator loop rather than touching state.
pub type EventCallback = Box<dyn Fn(&str, Value) + Send + Sync>;

/// The external overlay compositor's wire contract.
pub trait CompositorApi: Send + Sync {
    /// Begin the capture/composition session.
    fn start(&self) -> Result<()>;
    /// End the session, releasing all registered windows.
    fn stop(&self);
    /// Install the fixed hotkey table.
    fn set_hotkeys(&self, bindings: &[HotkeyBinding]);
    /// Install the single async event callback.
    fn set_event_callback(&self, callback: EventCallback);
    /// Register a surface for compositing.
    fn add_window(&self, id: SurfaceId, options: WindowOptions);
    /// Unregister a surface.
    fn close_window(&self, id: SurfaceId);
    /// Push one rendered frame. Fire-and-forget.
    fn send_frame_buffer(&self, id: SurfaceId, frame: &[u8], width: u32, height: u32);
    /// Push a geometry update in device pixels.
    fn send_window_bounds(&self, id: SurfaceId, rect: Rect);
    /// Send an out-of-band command.
    fn send_command(&self, command: OverlayCommand);
    /// Map a raw input payload to the toolkit input shape, if it has one.
    fn translate_input_event(&self, payload: Value) -> Option<SurfaceInput>;
    /// Enumerate top-level windows for target-process discovery.
    fn top_windows(&self) -> Vec<TopWindow>;
    /// Attach the compositor to the process owning `window`.
    fn inject_process(&self, window: &TopWindow);
}

/// Display metrics read once at session start.
pub trait ScreenInfo: Send + Sync {
    /// Bounds of the display nearest the current cursor position, in logical
    /// pixels. Used to clamp resizable surfaces.
    fn display_near_cursor(&self) -> Rect;
    /// Device-pixel scale of that display.
    fn scale_factor(&self) -> f64;
}

/// One live UI surface as seen by the coordinator.
///
/// Surfaces additionally emit `ready` / `closed` / `resized` / `paint` /
/// `cursor-changed` signals; those arrive through
/// [`CoordinatorHandle::signal`](crate::CoordinatorHandle::signal) rather
/// than through this trait, keeping all state changes on the coordinator
/// loop.
pub trait SurfaceHandle: Send + Sync {
    /// Current bounds in logical pixels.
    fn bounds(&self) -> Rect;
    /// Whether the surface allows interactive resizing.
    fn resizable(&self) -> bool;
    /// Platform handle of the underlying window.
    fn native_handle(&self) -> u64;
    /// Deliver a translated input event.
    fn send_input(&self, event: SurfaceInput);
    /// Deliver an application-level message on a named channel.
    fn post_message(&self, channel: &str, payload: Value);
    /// Give the surface's view input focus.
    fn focus_view(&self);
    /// Remove input focus from the surface's view.
    fn blur_view(&self);
    /// Reload the surface content, bypassing caches.
    fn reload_ignoring_cache(&self);
    /// Ask the surface to close. The surface reports back with a `closed`
    /// signal once it is gone.
    fn close(&self);
}
