//! End-to-end smoketest for the overlay coordinator.
//!
//! Drives a full session against the in-process mock compositor: start the
//! session, register the overlay window set, replay scripted compositor
//! events, push frames, and shut down. The recorded compositor traffic is
//! checked against what a healthy run must produce, so a failing exit code
//! means the coordinator misbehaved, not that a real game was missing.

use std::{process::ExitCode, sync::Arc};

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;

use overhud_engine::{
    Coordinator, CoordinatorHandle, OverlayParams, SurfaceSignal,
    hotkeys::{self, STATUS_SURFACE, TIP_SURFACE},
    test_support::{CompositorCall, MockCompositor, MockScreens, MockSurface, top_window},
};
use overhud_protocol::{
    Rect,
    events::{EVENT_FPS, EVENT_HOTKEY_DOWN, EVENT_INPUT},
};

mod logs;

/// Smoketest failures.
#[derive(Debug, thiserror::Error)]
enum Error {
    /// Coordinator returned an error.
    #[error("coordinator error: {0}")]
    Coordinator(#[from] overhud_engine::Error),
    /// A post-run expectation did not hold.
    #[error("check failed: {0}")]
    Check(String),
}

/// Smoketest result alias.
type Result<T> = std::result::Result<T, Error>;

#[derive(Parser, Debug)]
#[command(name = "overhud-smoketest", about = "Overhud coordinator smoketest tool", version)]
struct Cli {
    #[command(flatten)]
    logs: logs::LogArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Drive a full scripted overlay session against the mock compositor
    Session {
        /// Display scale factor for the simulated session
        #[arg(long, default_value_t = 1.25)]
        scale: f64,
        /// Frames each overlay surface pushes
        #[arg(long, default_value_t = 3)]
        frames: u32,
    },
    /// Print the fixed hotkey table and where each action routes
    Routes,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logs::init(&cli.logs);

    let outcome = match cli.command {
        Commands::Session { scale, frames } => run_session(scale, frames),
        Commands::Routes => {
            print_routes();
            Ok(())
        }
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("smoketest failed: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Dump the binding table with the effect each action resolves to.
fn print_routes() {
    for binding in hotkeys::bindings() {
        let ctrl = if binding.modifiers.ctrl { "ctrl+" } else { "" };
        let routes = hotkeys::route(&binding.name);
        if routes.is_empty() {
            println!("{:28} {}{:<6} (no routed effect)", binding.name, ctrl, binding.key_code);
            continue;
        }
        for route in routes {
            match route {
                hotkeys::Route::ReloadAll => {
                    println!(
                        "{:28} {}{:<6} reload all surfaces",
                        binding.name, ctrl, binding.key_code
                    );
                }
                hotkeys::Route::Send {
                    target,
                    channel,
                    payload,
                } => {
                    println!(
                        "{:28} {}{:<6} {target} <- {channel} {}",
                        binding.name,
                        ctrl,
                        binding.key_code,
                        payload.resolve(&binding.name)
                    );
                }
            }
        }
    }
}

/// Run the scripted session on a dedicated runtime.
fn run_session(scale: f64, frames: u32) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("build smoketest runtime");
    runtime.block_on(drive_session(scale, frames))
}

/// The scripted session body.
async fn drive_session(scale: f64, frames: u32) -> Result<()> {
    let compositor = Arc::new(MockCompositor::new());
    let screens = Arc::new(MockScreens::with_scale(scale));
    let handle = Coordinator::spawn(compositor.clone(), screens);

    // Target discovery happens before the session comes up, as the tray
    // flow does in production.
    compositor.set_top_windows(vec![top_window("Dota 2"), top_window("Some Editor")]);
    let injected = handle.inject("Dota").await?;
    info!(injected, "target discovery");

    handle.start_overlay().await?;

    let tip = MockSurface::fixed(Rect::new(0, 0, 1920, 1080));
    let bar = MockSurface::fixed(Rect::new(100, 0, 200, 50));
    let main = MockSurface::resizable(Rect::new(1, 1, 640, 360));
    handle
        .register(TIP_SURFACE, tip.clone(), OverlayParams {
            drag_border: 0,
            caption_height: 0,
            transparent: true,
        })
        .await?;
    handle
        .register(STATUS_SURFACE, bar.clone(), OverlayParams {
            drag_border: 0,
            caption_height: 0,
            transparent: true,
        })
        .await?;
    let main_id = handle
        .register("MainOverlay", main.clone(), OverlayParams {
            drag_border: 10,
            caption_height: 40,
            transparent: false,
        })
        .await?;
    for name in [TIP_SURFACE, STATUS_SURFACE, "MainOverlay"] {
        handle.signal(name, SurfaceSignal::Ready);
    }

    // Scripted compositor traffic.
    compositor.emit(EVENT_FPS, json!({"fps": 144}));
    compositor.emit(EVENT_HOTKEY_DOWN, json!({"name": "app.showhide"}));
    compositor.emit(EVENT_HOTKEY_DOWN, json!({"name": "app.quickStatsNetworth"}));
    compositor.emit(EVENT_HOTKEY_DOWN, json!({"name": "app.key5"}));
    compositor.emit(EVENT_HOTKEY_DOWN, json!({"name": "app.reload"}));
    compositor.emit(
        EVENT_INPUT,
        json!({"windowId": main_id, "type": "mouseMove", "x": 250, "y": 125}),
    );

    push_frames(&handle, frames);
    handle.signal("MainOverlay", SurfaceSignal::Resized(Rect::new(1, 1, 800, 450)));
    handle.signal(TIP_SURFACE, SurfaceSignal::CursorChanged("pointer".into()));

    handle.set_intercept(true);
    handle.set_intercept(false);

    // One round trip so everything above has been processed.
    let surfaces = handle.surfaces().await;
    info!(surfaces = surfaces.len(), "session populated");

    handle.shutdown().await?;
    verify(&compositor, &tip, &bar, frames)
}

/// Push `frames` solid bitmaps through each overlay surface.
fn push_frames(handle: &CoordinatorHandle, frames: u32) {
    for (name, width, height) in [
        (TIP_SURFACE, 1920u32, 1080u32),
        (STATUS_SURFACE, 200, 50),
        ("MainOverlay", 640, 360),
    ] {
        for _ in 0..frames {
            handle.signal(name, SurfaceSignal::Paint {
                frame: vec![0u8; (width * height * 4) as usize],
                width,
                height,
            });
        }
    }
}

/// Check the recorded traffic of a completed run.
fn verify(
    compositor: &MockCompositor,
    tip: &MockSurface,
    bar: &MockSurface,
    frames: u32,
) -> Result<()> {
    let calls = compositor.calls();
    let count = |pred: fn(&CompositorCall) -> bool| calls.iter().filter(|c| pred(c)).count();

    let checks: [(&str, usize, usize); 5] = [
        (
            "surfaces registered",
            count(|c| matches!(c, CompositorCall::AddWindow { .. })),
            3,
        ),
        (
            "surfaces released",
            count(|c| matches!(c, CompositorCall::CloseWindow { .. })),
            3,
        ),
        (
            "frames forwarded",
            count(|c| matches!(c, CompositorCall::FrameBuffer { .. })),
            3 * frames as usize,
        ),
        (
            "bounds updates",
            count(|c| matches!(c, CompositorCall::WindowBounds { .. })),
            1,
        ),
        (
            // cursor + intercept on/off
            "commands sent",
            count(|c| matches!(c, CompositorCall::Command(_))),
            3,
        ),
    ];
    for (what, got, want) in checks {
        if got != want {
            return Err(Error::Check(format!("{what}: got {got}, want {want}")));
        }
        info!(what, got, "ok");
    }

    if tip.messages_on("showhide").len() != 1
        || tip.messages_on("quickStats") != vec![json!("networth")]
        || tip.messages_on("key") != vec![json!("app.key5")]
    {
        return Err(Error::Check("tip surface hotkey messages".into()));
    }
    if bar.messages_on("fps") != vec![json!(144)] {
        return Err(Error::Check("status bar fps sample".into()));
    }
    if tip.reload_count() != 1 || bar.reload_count() != 1 {
        return Err(Error::Check("reload broadcast".into()));
    }
    info!("session traffic verified");
    Ok(())
}
