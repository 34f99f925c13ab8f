//! Overlay window coordinator.
//!
//! Coordinates offscreen UI surfaces with an out-of-process compositor that
//! blends them over a third-party game window:
//! - registers/unregisters surfaces with the compositor and owns the
//!   name ↔ compositor-id mapping
//! - routes asynchronous input, hotkey, and focus events from the
//!   compositor to the right surface
//! - pipes per-frame bitmaps and bounds/cursor updates out, applying DPI
//!   scale correction
//!
//! All coordinator state lives on one actor loop: compositor callbacks and
//! surface signals are marshaled into a single mpsc queue, so there is no
//! locking and per-surface event order is the arrival order. The public
//! surface is [`Coordinator::spawn`] plus the cheap-clone
//! [`CoordinatorHandle`].

use std::{fmt, sync::Arc};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, trace};

use overhud_protocol::{CompositorEvent, OverlayCommand, Rect, SurfaceId};

mod deps;
mod error;
/// Fixed hotkey table and action routing.
pub mod hotkeys;
mod pipe;
mod registry;
mod session;
/// Mock collaborators for tests and the smoketest harness.
pub mod test_support;
mod translate;

pub use deps::{CompositorApi, EventCallback, ScreenInfo, SurfaceHandle};
pub use error::{Error, Result};
pub use registry::OverlayParams;
pub use translate::{InputTranslator, Scale};

use hotkeys::{Route, STATUS_SURFACE};
use registry::SurfaceRegistry;
use session::CompositorSession;

/// Lifecycle signals a surface reports to the coordinator.
///
/// These correspond to the surface's observable signals (`ready`, `closed`,
/// `resized`, `paint`, `cursor-changed`); the hosting layer forwards them via
/// [`CoordinatorHandle::signal`] so they are processed on the coordinator
/// loop.
#[derive(Debug, Clone)]
pub enum SurfaceSignal {
    /// The surface is paintable. Gates compositor registration.
    Ready,
    /// The surface is gone. Drives unregistration exactly once.
    Closed,
    /// The surface was resized to the given logical bounds.
    Resized(Rect),
    /// The surface produced a new bitmap for a changed region.
    Paint {
        /// Raw RGBA bytes.
        frame: Vec<u8>,
        /// Bitmap width in device pixels.
        width: u32,
        /// Bitmap height in device pixels.
        height: u32,
    },
    /// The surface requested a different cursor shape (CSS-style name).
    CursorChanged(String),
}

/// Read-only snapshot of one registered surface.
#[derive(Debug, Clone)]
pub struct SurfaceInfo {
    /// Logical name.
    pub name: String,
    /// Compositor-side id.
    pub id: SurfaceId,
    /// Current logical bounds.
    pub bounds: Rect,
    /// Whether the surface is resizable.
    pub resizable: bool,
    /// Whether the surface is currently registered with the compositor.
    pub composited: bool,
}

/// Messages processed on the coordinator loop.
pub(crate) enum Msg {
    /// Decoded compositor event.
    Compositor(CompositorEvent),
    /// Surface lifecycle signal.
    Surface {
        /// Logical surface name.
        name: String,
        /// The signal.
        signal: SurfaceSignal,
    },
    /// Start the overlay session.
    StartOverlay {
        /// Result channel.
        respond: oneshot::Sender<Result<()>>,
    },
    /// Register a surface.
    Register {
        /// Logical surface name, unique while live.
        name: String,
        /// Handle to the UI surface.
        handle: Arc<dyn SurfaceHandle>,
        /// Chrome parameters.
        params: OverlayParams,
        /// Result channel.
        respond: oneshot::Sender<Result<SurfaceId>>,
    },
    /// Ask a surface to close.
    CloseSurface {
        /// Logical surface name.
        name: String,
    },
    /// Toggle exclusive input interception.
    SetIntercept {
        /// True to intercept.
        intercept: bool,
    },
    /// Inject into top-level windows whose title contains a fragment.
    Inject {
        /// Title fragment to match.
        title: String,
        /// Replies with the number of windows injected.
        respond: oneshot::Sender<usize>,
    },
    /// Look up one surface.
    Lookup {
        /// Logical surface name.
        name: String,
        /// Reply channel.
        respond: oneshot::Sender<Option<SurfaceInfo>>,
    },
    /// Snapshot all surfaces.
    Surfaces {
        /// Reply channel.
        respond: oneshot::Sender<Vec<SurfaceInfo>>,
    },
    /// Close every surface and stop the session.
    Shutdown {
        /// Acknowledged once teardown is complete.
        respond: oneshot::Sender<()>,
    },
}

/// The coordinator actor. Owns every piece of mutable state.
pub struct Coordinator {
    /// Authoritative surface store.
    registry: SurfaceRegistry,
    /// Compositor handle, lifecycle, and shutdown gate.
    session: CompositorSession,
    /// Display metrics, read at session start.
    screens: Arc<dyn ScreenInfo>,
    /// Input translation with the session scale factor.
    translator: InputTranslator,
    /// Inbound queue.
    rx: mpsc::UnboundedReceiver<Msg>,
    /// Sender handed to the session's event callback.
    tx: mpsc::UnboundedSender<Msg>,
}

/// Cheap-clone handle to a spawned [`Coordinator`].
#[derive(Clone)]
pub struct CoordinatorHandle {
    /// Queue into the actor loop.
    tx: mpsc::UnboundedSender<Msg>,
}

impl Coordinator {
    /// Spawn the coordinator loop and return a handle to it.
    pub fn spawn(api: Arc<dyn CompositorApi>, screens: Arc<dyn ScreenInfo>) -> CoordinatorHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let coordinator = Self {
            registry: SurfaceRegistry::new(),
            session: CompositorSession::new(api),
            screens,
            translator: InputTranslator::new(Scale::IDENTITY),
            rx,
            tx: tx.clone(),
        };
        tokio::spawn(coordinator.run());
        CoordinatorHandle { tx }
    }

    /// Drain the queue until every handle is dropped.
    async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            self.handle(msg);
        }
        debug!("coordinator loop ended");
    }

    fn handle(&mut self, msg: Msg) {
        match msg {
            Msg::Compositor(event) => self.on_compositor_event(event),
            Msg::Surface { name, signal } => self.on_surface_signal(&name, signal),
            Msg::StartOverlay { respond } => {
                let _ = respond.send(self.start_overlay());
            }
            Msg::Register {
                name,
                handle,
                params,
                respond,
            } => {
                let _ = respond.send(self.registry.register(name, handle, params));
            }
            Msg::CloseSurface { name } => {
                if let Some(entry) = self.registry.get(&name) {
                    entry.handle.close();
                }
            }
            Msg::SetIntercept { intercept } => {
                self.session
                    .send_command(OverlayCommand::InputIntercept { intercept });
            }
            Msg::Inject { title, respond } => {
                let mut injected = 0;
                for window in self.session.top_windows() {
                    if window.title.contains(&title) {
                        info!(title = %window.title, "injecting into process");
                        self.session.inject_process(&window);
                        injected += 1;
                    }
                }
                let _ = respond.send(injected);
            }
            Msg::Lookup { name, respond } => {
                let _ = respond.send(self.registry.get(&name).map(|e| surface_info(&name, e)));
            }
            Msg::Surfaces { respond } => {
                let infos = self
                    .registry
                    .entries()
                    .map(|(name, entry)| surface_info(name, entry))
                    .collect();
                let _ = respond.send(infos);
            }
            Msg::Shutdown { respond } => {
                self.shutdown();
                let _ = respond.send(());
            }
        }
    }

    /// Start the session: seed the scale factor, install hotkeys, wire the
    /// event callback, and composite any surface that was ready early.
    fn start_overlay(&mut self) -> Result<()> {
        let scale = Scale::new(self.screens.scale_factor());
        self.session
            .start(&hotkeys::bindings(), self.tx.clone())?;
        self.translator = InputTranslator::new(scale);
        info!(scale = scale.factor(), "overlay session started");

        let ready: Vec<String> = self
            .registry
            .entries()
            .filter(|(_, entry)| entry.ready && !entry.composited)
            .map(|(name, _)| name.clone())
            .collect();
        for name in ready {
            self.composite(&name);
        }
        Ok(())
    }

    fn on_compositor_event(&mut self, event: CompositorEvent) {
        match event {
            CompositorEvent::Input { window_id, payload } => {
                let Some(entry) = self.registry.by_id(window_id) else {
                    trace!(window_id, "input for unknown surface");
                    return;
                };
                if let Some(input) = self.translator.translate(self.session.api(), payload) {
                    entry.handle.send_input(input);
                }
            }
            CompositorEvent::Fps { fps } => {
                if let Some(entry) = self.registry.get(STATUS_SURFACE) {
                    entry.handle.post_message("fps", fps.into());
                }
            }
            CompositorEvent::HotkeyDown { name } => self.on_hotkey(&name),
            CompositorEvent::WindowFocused { focus_window_id } => {
                for (_, entry) in self.registry.entries() {
                    entry.handle.blur_view();
                }
                if let Some(entry) = self.registry.by_id(focus_window_id) {
                    entry.handle.focus_view();
                } else {
                    trace!(focus_window_id, "focus for unknown surface");
                }
            }
        }
    }

    fn on_hotkey(&self, action: &str) {
        let routes = hotkeys::route(action);
        if routes.is_empty() {
            debug!(action, "unrouted hotkey action");
            return;
        }
        for route in routes {
            match route {
                Route::ReloadAll => {
                    for (_, entry) in self.registry.entries() {
                        entry.handle.reload_ignoring_cache();
                    }
                }
                Route::Send {
                    target,
                    channel,
                    payload,
                } => match self.registry.get(target) {
                    Some(entry) => entry.handle.post_message(channel, payload.resolve(action)),
                    None => trace!(action, target, "hotkey target not registered"),
                },
            }
        }
    }

    fn on_surface_signal(&mut self, name: &str, signal: SurfaceSignal) {
        match signal {
            SurfaceSignal::Ready => {
                match self.registry.get_mut(name) {
                    Some(entry) => entry.ready = true,
                    None => return,
                }
                self.composite(name);
            }
            SurfaceSignal::Resized(bounds) => {
                let scale = self.translator.scale();
                if let Some(entry) = self.registry.get(name) {
                    if entry.composited {
                        self.session.send_bounds(entry.id, scale.device_rect(bounds));
                    }
                }
            }
            SurfaceSignal::Paint {
                frame,
                width,
                height,
            } => {
                if let Some(entry) = self.registry.get(name) {
                    if entry.composited {
                        self.session.send_frame(entry.id, &frame, width, height);
                    }
                }
            }
            SurfaceSignal::CursorChanged(shape) => {
                if self.registry.get(name).is_none() {
                    return;
                }
                match pipe::cursor_command(&shape) {
                    Some(command) => self.session.send_command(command),
                    None => trace!(shape = %shape, "unmapped cursor shape"),
                }
            }
            SurfaceSignal::Closed => {
                if let Some(entry) = self.registry.unregister(name) {
                    if entry.composited {
                        self.session.close_window(entry.id);
                    }
                    debug!(name, id = entry.id, "surface unregistered");
                }
            }
        }
    }

    /// Register one ready surface with the compositor. No-op while the
    /// session is down or tearing down, or if already composited.
    fn composite(&mut self, name: &str) {
        if !self.session.is_started() || self.session.is_shutdown() {
            return;
        }
        let display = self.screens.display_near_cursor();
        let scale = self.translator.scale();
        let Some(entry) = self.registry.get_mut(name) else {
            return;
        };
        if entry.composited {
            return;
        }
        let options = pipe::window_options(name, entry.handle.as_ref(), entry.params, display, scale);
        self.session.add_window(entry.id, options);
        entry.composited = true;
        entry.handle.focus_view();
        debug!(name, id = entry.id, "surface composited");
    }

    /// Set the shutdown flag, close every surface (each releasing its
    /// compositor id exactly once), then stop the session.
    fn shutdown(&mut self) {
        self.session.begin_shutdown();
        info!(surfaces = self.registry.len(), "shutting down overlay");
        for (name, entry) in self.registry.drain() {
            if entry.composited {
                self.session.close_window(entry.id);
            }
            entry.handle.close();
            debug!(name = %name, id = entry.id, "surface closed at shutdown");
        }
        self.session.stop();
    }
}

/// Build a [`SurfaceInfo`] snapshot for one entry.
fn surface_info(name: &str, entry: &registry::SurfaceEntry) -> SurfaceInfo {
    SurfaceInfo {
        name: name.to_string(),
        id: entry.id,
        bounds: entry.handle.bounds(),
        resizable: entry.handle.resizable(),
        composited: entry.composited,
    }
}

impl CoordinatorHandle {
    /// Round-trip a request through the loop.
    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Msg) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.tx.send(build(tx)).map_err(|_| Error::ChannelClosed)?;
        rx.await.map_err(|_| Error::ChannelClosed)
    }

    /// Start the overlay session. Must be called at most once per process;
    /// a second call reports [`Error::AlreadyStarted`].
    pub async fn start_overlay(&self) -> Result<()> {
        self.request(|respond| Msg::StartOverlay { respond }).await?
    }

    /// Register a surface. Compositor registration follows once the surface
    /// signals [`SurfaceSignal::Ready`].
    pub async fn register(
        &self,
        name: &str,
        handle: Arc<dyn SurfaceHandle>,
        params: OverlayParams,
    ) -> Result<SurfaceId> {
        self.request(|respond| Msg::Register {
            name: name.to_string(),
            handle,
            params,
            respond,
        })
        .await?
    }

    /// Forward a surface lifecycle signal onto the coordinator loop.
    /// Fire-and-forget; signals for unknown surfaces are dropped there.
    pub fn signal(&self, name: &str, signal: SurfaceSignal) {
        let _ = self.tx.send(Msg::Surface {
            name: name.to_string(),
            signal,
        });
    }

    /// Ask a surface to close. Unregistration happens when the surface
    /// reports [`SurfaceSignal::Closed`].
    pub fn close_surface(&self, name: &str) {
        let _ = self.tx.send(Msg::CloseSurface {
            name: name.to_string(),
        });
    }

    /// Toggle exclusive input interception.
    pub fn set_intercept(&self, intercept: bool) {
        let _ = self.tx.send(Msg::SetIntercept { intercept });
    }

    /// Inject into every top-level window whose title contains `title`.
    /// Returns how many windows matched.
    pub async fn inject(&self, title: &str) -> Result<usize> {
        self.request(|respond| Msg::Inject {
            title: title.to_string(),
            respond,
        })
        .await
    }

    /// Look up one surface by name. Absence is a normal outcome.
    pub async fn lookup(&self, name: &str) -> Option<SurfaceInfo> {
        self.request(|respond| Msg::Lookup {
            name: name.to_string(),
            respond,
        })
        .await
        .unwrap_or(None)
    }

    /// Snapshot every registered surface.
    pub async fn surfaces(&self) -> Vec<SurfaceInfo> {
        self.request(|respond| Msg::Surfaces { respond })
            .await
            .unwrap_or_default()
    }

    /// Close all surfaces and stop the session. The loop stays alive so
    /// late signals are still drained (and suppressed) afterwards.
    pub async fn shutdown(&self) -> Result<()> {
        self.request(|respond| Msg::Shutdown { respond }).await
    }
}

impl fmt::Debug for CoordinatorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoordinatorHandle").finish_non_exhaustive()
    }
}
