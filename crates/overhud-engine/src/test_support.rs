//! Mock collaborators for tests and the smoketest harness.
//!
//! Everything here records what the coordinator did so assertions can be
//! written against call sequences instead of real compositor state. The
//! mocks mirror the native behavior closely enough to drive the coordinator
//! end-to-end: the compositor stores its event callback and replays events
//! through it, and input translation accepts any payload that names a
//! toolkit event type.

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
};

use parking_lot::Mutex;
use serde_json::Value;

use overhud_protocol::{
    HotkeyBinding, OverlayCommand, Rect, SurfaceId, SurfaceInput, TopWindow, WindowOptions,
};

use crate::{
    Result,
    deps::{CompositorApi, EventCallback, ScreenInfo, SurfaceHandle},
    error::Error,
};

/// One recorded compositor invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum CompositorCall {
    /// `start()` succeeded.
    Start,
    /// `stop()` was invoked.
    Stop,
    /// The hotkey table was installed.
    SetHotkeys(Vec<HotkeyBinding>),
    /// A surface was registered.
    AddWindow {
        /// Assigned surface id.
        id: SurfaceId,
        /// Full registration payload.
        options: WindowOptions,
    },
    /// A surface was unregistered.
    CloseWindow {
        /// Surface id released.
        id: SurfaceId,
    },
    /// A frame was pushed.
    FrameBuffer {
        /// Target surface.
        id: SurfaceId,
        /// Byte length of the bitmap.
        len: usize,
        /// Frame width in device pixels.
        width: u32,
        /// Frame height in device pixels.
        height: u32,
    },
    /// A geometry update was pushed.
    WindowBounds {
        /// Target surface.
        id: SurfaceId,
        /// New bounds in device pixels.
        rect: Rect,
    },
    /// An out-of-band command was sent.
    Command(OverlayCommand),
    /// The compositor attached to a target process.
    InjectProcess {
        /// Title of the injected window.
        title: String,
    },
}

/// Recording compositor double.
#[derive(Default)]
pub struct MockCompositor {
    /// Recorded invocations in order.
    calls: Mutex<Vec<CompositorCall>>,
    /// Installed event callback, if any.
    callback: Mutex<Option<EventCallback>>,
    /// When set, `start()` fails.
    fail_start: AtomicBool,
    /// Windows returned from `top_windows`.
    top: Mutex<Vec<TopWindow>>,
}

impl MockCompositor {
    /// Fresh mock with no recorded calls.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `start()` calls fail.
    pub fn set_fail_start(&self, fail: bool) {
        self.fail_start.store(fail, Ordering::SeqCst);
    }

    /// Seed the top-level window enumeration.
    pub fn set_top_windows(&self, windows: Vec<TopWindow>) {
        *self.top.lock() = windows;
    }

    /// Snapshot of recorded calls.
    pub fn calls(&self) -> Vec<CompositorCall> {
        self.calls.lock().clone()
    }

    /// Recorded calls matching a predicate.
    pub fn calls_where(
        &self,
        predicate: impl Fn(&CompositorCall) -> bool,
    ) -> Vec<CompositorCall> {
        self.calls.lock().iter().filter(|c| predicate(c)).cloned().collect()
    }

    /// True once an event callback is installed.
    pub fn has_callback(&self) -> bool {
        self.callback.lock().is_some()
    }

    /// Replay a raw `(event, payload)` pair through the installed callback,
    /// as the native library would from its own thread.
    pub fn emit(&self, event: &str, payload: Value) {
        if let Some(callback) = self.callback.lock().as_ref() {
            callback(event, payload);
        }
    }

    fn record(&self, call: CompositorCall) {
        self.calls.lock().push(call);
    }
}

impl CompositorApi for MockCompositor {
    fn start(&self) -> Result<()> {
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(Error::Session("native module unavailable".into()));
        }
        self.record(CompositorCall::Start);
        Ok(())
    }

    fn stop(&self) {
        self.record(CompositorCall::Stop);
    }

    fn set_hotkeys(&self, bindings: &[HotkeyBinding]) {
        self.record(CompositorCall::SetHotkeys(bindings.to_vec()));
    }

    fn set_event_callback(&self, callback: EventCallback) {
        *self.callback.lock() = Some(callback);
    }

    fn add_window(&self, id: SurfaceId, options: WindowOptions) {
        self.record(CompositorCall::AddWindow { id, options });
    }

    fn close_window(&self, id: SurfaceId) {
        self.record(CompositorCall::CloseWindow { id });
    }

    fn send_frame_buffer(&self, id: SurfaceId, frame: &[u8], width: u32, height: u32) {
        self.record(CompositorCall::FrameBuffer {
            id,
            len: frame.len(),
            width,
            height,
        });
    }

    fn send_window_bounds(&self, id: SurfaceId, rect: Rect) {
        self.record(CompositorCall::WindowBounds { id, rect });
    }

    fn send_command(&self, command: OverlayCommand) {
        self.record(CompositorCall::Command(command));
    }

    fn translate_input_event(&self, payload: Value) -> Option<SurfaceInput> {
        // Payloads without a toolkit event type have no toolkit shape,
        // matching the native helper's null return.
        payload.get("type")?;
        serde_json::from_value(payload).ok()
    }

    fn top_windows(&self) -> Vec<TopWindow> {
        self.top.lock().clone()
    }

    fn inject_process(&self, window: &TopWindow) {
        self.record(CompositorCall::InjectProcess {
            title: window.title.clone(),
        });
    }
}

/// Fixed display metrics.
pub struct MockScreens {
    /// Display bounds returned for the cursor's display.
    display: Rect,
    /// Scale factor reported at session start.
    scale: f64,
}

impl MockScreens {
    /// Metrics with explicit display bounds and scale.
    pub fn new(display: Rect, scale: f64) -> Self {
        Self { display, scale }
    }

    /// 1920×1080 display at the given scale.
    pub fn with_scale(scale: f64) -> Self {
        Self::new(Rect::new(0, 0, 1920, 1080), scale)
    }
}

impl Default for MockScreens {
    fn default() -> Self {
        Self::with_scale(1.0)
    }
}

impl ScreenInfo for MockScreens {
    fn display_near_cursor(&self) -> Rect {
        self.display
    }

    fn scale_factor(&self) -> f64 {
        self.scale
    }
}

/// Monotonic fake native handles so registration payloads stay distinct.
static NEXT_NATIVE_HANDLE: AtomicU64 = AtomicU64::new(0x1000);

/// Recording surface double.
pub struct MockSurface {
    /// Current logical bounds.
    bounds: Mutex<Rect>,
    /// Whether the surface reports itself resizable.
    resizable: bool,
    /// Fake platform handle.
    native_handle: u64,
    /// Delivered input events.
    inputs: Mutex<Vec<SurfaceInput>>,
    /// Delivered `(channel, payload)` messages.
    messages: Mutex<Vec<(String, Value)>>,
    /// Number of focus requests.
    focus_count: AtomicUsize,
    /// Number of blur requests.
    blur_count: AtomicUsize,
    /// Number of cache-bypassing reloads.
    reload_count: AtomicUsize,
    /// Set once `close` is requested.
    close_requested: AtomicBool,
}

impl MockSurface {
    fn new(bounds: Rect, resizable: bool) -> Arc<Self> {
        Arc::new(Self {
            bounds: Mutex::new(bounds),
            resizable,
            native_handle: NEXT_NATIVE_HANDLE.fetch_add(1, Ordering::Relaxed),
            inputs: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
            focus_count: AtomicUsize::new(0),
            blur_count: AtomicUsize::new(0),
            reload_count: AtomicUsize::new(0),
            close_requested: AtomicBool::new(false),
        })
    }

    /// Fixed-size surface.
    pub fn fixed(bounds: Rect) -> Arc<Self> {
        Self::new(bounds, false)
    }

    /// Resizable surface.
    pub fn resizable(bounds: Rect) -> Arc<Self> {
        Self::new(bounds, true)
    }

    /// Update the reported bounds, as a toolkit resize would.
    pub fn set_bounds(&self, bounds: Rect) {
        *self.bounds.lock() = bounds;
    }

    /// Input events delivered so far.
    pub fn inputs(&self) -> Vec<SurfaceInput> {
        self.inputs.lock().clone()
    }

    /// Messages delivered so far.
    pub fn messages(&self) -> Vec<(String, Value)> {
        self.messages.lock().clone()
    }

    /// Messages delivered on one channel.
    pub fn messages_on(&self, channel: &str) -> Vec<Value> {
        self.messages
            .lock()
            .iter()
            .filter(|(c, _)| c == channel)
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    /// Number of focus requests.
    pub fn focus_count(&self) -> usize {
        self.focus_count.load(Ordering::SeqCst)
    }

    /// Number of blur requests.
    pub fn blur_count(&self) -> usize {
        self.blur_count.load(Ordering::SeqCst)
    }

    /// Number of cache-bypassing reloads.
    pub fn reload_count(&self) -> usize {
        self.reload_count.load(Ordering::SeqCst)
    }

    /// True once the coordinator asked this surface to close.
    pub fn close_requested(&self) -> bool {
        self.close_requested.load(Ordering::SeqCst)
    }
}

impl SurfaceHandle for MockSurface {
    fn bounds(&self) -> Rect {
        *self.bounds.lock()
    }

    fn resizable(&self) -> bool {
        self.resizable
    }

    fn native_handle(&self) -> u64 {
        self.native_handle
    }

    fn send_input(&self, event: SurfaceInput) {
        self.inputs.lock().push(event);
    }

    fn post_message(&self, channel: &str, payload: Value) {
        self.messages.lock().push((channel.to_string(), payload));
    }

    fn focus_view(&self) {
        self.focus_count.fetch_add(1, Ordering::SeqCst);
    }

    fn blur_view(&self) {
        self.blur_count.fetch_add(1, Ordering::SeqCst);
    }

    fn reload_ignoring_cache(&self) {
        self.reload_count.fetch_add(1, Ordering::SeqCst);
    }

    fn close(&self) {
        self.close_requested.store(true, Ordering::SeqCst);
    }
}

/// Convenience constructor for a [`TopWindow`] with only a title.
pub fn top_window(title: &str) -> TopWindow {
    TopWindow {
        title: title.to_string(),
        rest: serde_json::Map::new(),
    }
}
