use std::sync::Arc;

use serde_json::json;

use overhud_engine::{
    Coordinator, CoordinatorHandle, Error, OverlayParams, SurfaceSignal,
    test_support::{CompositorCall, MockCompositor, MockScreens, MockSurface, top_window},
};
use overhud_protocol::Rect;

fn setup() -> (CoordinatorHandle, Arc<MockCompositor>) {
    let compositor = Arc::new(MockCompositor::new());
    let screens = Arc::new(MockScreens::default());
    let handle = Coordinator::spawn(compositor.clone(), screens);
    (handle, compositor)
}

async fn drain(handle: &CoordinatorHandle) {
    let _ = handle.surfaces().await;
}

#[tokio::test]
async fn second_start_is_rejected() {
    let (handle, compositor) = setup();
    handle.start_overlay().await.unwrap();
    let err = handle.start_overlay().await.unwrap_err();
    assert!(matches!(err, Error::AlreadyStarted));
    // The library only ever saw one start.
    assert_eq!(
        compositor.calls_where(|c| matches!(c, CompositorCall::Start)),
        vec![CompositorCall::Start]
    );
}

#[tokio::test]
async fn hotkey_table_is_installed_at_start() {
    let (handle, compositor) = setup();
    handle.start_overlay().await.unwrap();

    let installs = compositor.calls_where(|c| matches!(c, CompositorCall::SetHotkeys(_)));
    match installs.as_slice() {
        [CompositorCall::SetHotkeys(bindings)] => {
            assert_eq!(bindings.len(), 29);
            let reload = bindings
                .iter()
                .find(|b| b.name == "app.reload")
                .expect("reload binding");
            assert_eq!(reload.key_code, 116);
            assert!(reload.modifiers.ctrl);
        }
        other => panic!("expected one SetHotkeys, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_start_leaves_surfaces_uncomposited() {
    let (handle, compositor) = setup();
    compositor.set_fail_start(true);

    let err = handle.start_overlay().await.unwrap_err();
    assert!(matches!(err, Error::Session(_)));

    // Surfaces still register and live normally, just without an overlay.
    let tip = MockSurface::fixed(Rect::new(0, 0, 100, 100));
    handle
        .register("Tip", tip, OverlayParams::default())
        .await
        .unwrap();
    handle.signal("Tip", SurfaceSignal::Ready);
    drain(&handle).await;

    let info = handle.lookup("Tip").await.expect("surface is live");
    assert!(!info.composited);
    assert!(
        compositor
            .calls_where(|c| matches!(c, CompositorCall::AddWindow { .. }))
            .is_empty()
    );
}

#[tokio::test]
async fn surfaces_ready_before_start_composite_at_start() {
    let (handle, compositor) = setup();

    let tip = MockSurface::fixed(Rect::new(0, 0, 100, 100));
    let id = handle
        .register("Tip", tip, OverlayParams::default())
        .await
        .unwrap();
    handle.signal("Tip", SurfaceSignal::Ready);
    drain(&handle).await;
    assert!(
        compositor
            .calls_where(|c| matches!(c, CompositorCall::AddWindow { .. }))
            .is_empty()
    );

    handle.start_overlay().await.unwrap();
    let adds = compositor.calls_where(|c| matches!(c, CompositorCall::AddWindow { .. }));
    assert!(
        matches!(adds.as_slice(), [CompositorCall::AddWindow { id: got, .. }] if *got == id)
    );
    assert!(handle.lookup("Tip").await.unwrap().composited);
}

#[tokio::test]
async fn shutdown_closes_each_surface_once_and_suppresses_traffic() {
    let (handle, compositor) = setup();
    handle.start_overlay().await.unwrap();

    let tip = MockSurface::fixed(Rect::new(0, 0, 100, 100));
    let bar = MockSurface::fixed(Rect::new(100, 0, 200, 50));
    let tip_id = handle
        .register("OverlayTip", tip.clone(), OverlayParams::default())
        .await
        .unwrap();
    let bar_id = handle
        .register("StatusBar", bar.clone(), OverlayParams::default())
        .await
        .unwrap();
    handle.signal("OverlayTip", SurfaceSignal::Ready);
    handle.signal("StatusBar", SurfaceSignal::Ready);
    drain(&handle).await;

    handle.shutdown().await.unwrap();

    let mut closed: Vec<_> = compositor
        .calls_where(|c| matches!(c, CompositorCall::CloseWindow { .. }))
        .into_iter()
        .map(|c| match c {
            CompositorCall::CloseWindow { id } => id,
            _ => unreachable!(),
        })
        .collect();
    closed.sort_unstable();
    let mut expected = vec![tip_id, bar_id];
    expected.sort_unstable();
    assert_eq!(closed, expected);
    assert_eq!(
        compositor.calls_where(|c| matches!(c, CompositorCall::Stop)),
        vec![CompositorCall::Stop]
    );
    assert!(tip.close_requested());
    assert!(bar.close_requested());

    // Late signals and commands after the flag is set go nowhere.
    let before = compositor.calls().len();
    handle.signal(
        "OverlayTip",
        SurfaceSignal::Paint {
            frame: vec![0; 4],
            width: 1,
            height: 1,
        },
    );
    handle.signal("OverlayTip", SurfaceSignal::Resized(Rect::new(0, 0, 50, 50)));
    handle.set_intercept(true);
    drain(&handle).await;
    assert_eq!(compositor.calls().len(), before);

    // The registry drained; nothing is left to close twice.
    assert!(handle.surfaces().await.is_empty());
}

#[tokio::test]
async fn intercept_commands_flow_while_running() {
    let (handle, compositor) = setup();
    handle.start_overlay().await.unwrap();

    handle.set_intercept(true);
    handle.set_intercept(false);
    drain(&handle).await;

    let commands: Vec<_> = compositor
        .calls_where(|c| matches!(c, CompositorCall::Command(_)))
        .into_iter()
        .map(|c| match c {
            CompositorCall::Command(cmd) => serde_json::to_value(&cmd).unwrap(),
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(
        commands,
        vec![
            json!({"command": "input.intercept", "intercept": true}),
            json!({"command": "input.intercept", "intercept": false}),
        ]
    );
}

#[tokio::test]
async fn inject_targets_windows_by_title_fragment() {
    let (handle, compositor) = setup();
    compositor.set_top_windows(vec![
        top_window("Dota 2"),
        top_window("Notepad"),
        top_window("Dota 2 - replay"),
    ]);

    let injected = handle.inject("Dota").await.unwrap();
    assert_eq!(injected, 2);

    let titles: Vec<_> = compositor
        .calls_where(|c| matches!(c, CompositorCall::InjectProcess { .. }))
        .into_iter()
        .map(|c| match c {
            CompositorCall::InjectProcess { title } => title,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(titles, vec!["Dota 2".to_string(), "Dota 2 - replay".to_string()]);
}

#[tokio::test]
async fn close_request_round_trips_through_the_surface() {
    let (handle, compositor) = setup();
    handle.start_overlay().await.unwrap();

    let tip = MockSurface::fixed(Rect::new(0, 0, 100, 100));
    let id = handle
        .register("Tip", tip.clone(), OverlayParams::default())
        .await
        .unwrap();
    handle.signal("Tip", SurfaceSignal::Ready);
    drain(&handle).await;

    handle.close_surface("Tip");
    drain(&handle).await;
    // The coordinator asked; the surface is still registered until it
    // reports back.
    assert!(tip.close_requested());
    assert!(handle.lookup("Tip").await.is_some());

    handle.signal("Tip", SurfaceSignal::Closed);
    drain(&handle).await;
    assert!(handle.lookup("Tip").await.is_none());
    assert_eq!(
        compositor.calls_where(|c| matches!(c, CompositorCall::CloseWindow { .. })),
        vec![CompositorCall::CloseWindow { id }]
    );
}
