//! Compositor session: lifecycle and guarded outbound traffic.
//!
//! Thin adapter over the external compositor handle. Owns the started flag,
//! the shutdown flag, and the event callback that decodes raw compositor
//! events and marshals them onto the coordinator loop.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::mpsc;
use tracing::{debug, trace};

use overhud_protocol::{
    CompositorEvent, HotkeyBinding, OverlayCommand, Rect, SurfaceId, TopWindow, WindowOptions,
};

use crate::{
    Msg, Result,
    deps::CompositorApi,
    error::Error,
};

/// Coordinator-side owner of the external compositor handle.
pub(crate) struct CompositorSession {
    /// The external library, opaque behind its trait.
    api: Arc<dyn CompositorApi>,
    /// Set once by [`begin_shutdown`](Self::begin_shutdown); checked by every
    /// outbound-forwarding path before sending.
    shutdown: Arc<AtomicBool>,
    /// Whether `start` has succeeded. Re-entrant start is rejected.
    started: bool,
}

impl CompositorSession {
    pub(crate) fn new(api: Arc<dyn CompositorApi>) -> Self {
        Self {
            api,
            shutdown: Arc::new(AtomicBool::new(false)),
            started: false,
        }
    }

    /// Borrow the raw API, e.g. for input translation.
    pub(crate) fn api(&self) -> &dyn CompositorApi {
        self.api.as_ref()
    }

    pub(crate) fn is_started(&self) -> bool {
        self.started
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Start capture, install the hotkey table, and wire the event callback.
    ///
    /// Decoded events are forwarded into `events`; the callback itself never
    /// touches coordinator state since the library may invoke it from its own
    /// thread.
    pub(crate) fn start(
        &mut self,
        bindings: &[HotkeyBinding],
        events: mpsc::UnboundedSender<Msg>,
    ) -> Result<()> {
        if self.started {
            return Err(Error::AlreadyStarted);
        }
        self.api.start()?;
        self.api.set_hotkeys(bindings);
        self.api.set_event_callback(Box::new(move |event, payload| {
            match CompositorEvent::decode(event, payload) {
                Some(decoded) => {
                    let _ = events.send(Msg::Compositor(decoded));
                }
                None => trace!(event, "dropping unrecognized compositor event"),
            }
        }));
        self.started = true;
        debug!(bindings = bindings.len(), "compositor session started");
        Ok(())
    }

    /// Flip the shutdown flag. Idempotent.
    pub(crate) fn begin_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    /// End the session if it was running.
    pub(crate) fn stop(&mut self) {
        if self.started {
            self.api.stop();
            self.started = false;
        }
    }

    /// Register a surface. Callers gate on readiness and shutdown state.
    pub(crate) fn add_window(&self, id: SurfaceId, options: WindowOptions) {
        self.api.add_window(id, options);
    }

    /// Unregister a surface. Deliberately not shutdown-gated: every
    /// registered id must be released even during teardown.
    pub(crate) fn close_window(&self, id: SurfaceId) {
        self.api.close_window(id);
    }

    /// Forward one rendered frame, unless shutting down.
    pub(crate) fn send_frame(&self, id: SurfaceId, frame: &[u8], width: u32, height: u32) {
        if self.is_shutdown() {
            return;
        }
        self.api.send_frame_buffer(id, frame, width, height);
    }

    /// Forward a geometry update, unless shutting down.
    pub(crate) fn send_bounds(&self, id: SurfaceId, rect: Rect) {
        if self.is_shutdown() {
            return;
        }
        self.api.send_window_bounds(id, rect);
    }

    /// Forward an out-of-band command, unless shutting down.
    pub(crate) fn send_command(&self, command: OverlayCommand) {
        if self.is_shutdown() {
            return;
        }
        self.api.send_command(command);
    }

    /// Enumerate top-level windows for target discovery.
    pub(crate) fn top_windows(&self) -> Vec<TopWindow> {
        self.api.top_windows()
    }

    /// Attach the compositor to the process owning `window`.
    pub(crate) fn inject_process(&self, window: &TopWindow) {
        self.api.inject_process(window);
    }
}
