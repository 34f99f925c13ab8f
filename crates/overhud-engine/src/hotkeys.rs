//! Fixed hotkey table and action routing.
//!
//! The binding table is installed into the compositor once at session start
//! and never mutated. Routing is a pure lookup over action names: the table
//! says what happens, the coordinator applies it against whatever surfaces
//! are live at that moment. Key-repeat and debounce are the compositor's
//! concern, not ours.

use serde_json::Value;

use overhud_protocol::HotkeyBinding;

/// Surface that receives tip-level hotkey effects.
pub const TIP_SURFACE: &str = "OverlayTip";
/// Surface that receives frame-rate samples.
pub const STATUS_SURFACE: &str = "StatusBar";

/// Actions in this family forward their own name on the `key` channel.
const KEY_FAMILY: &str = "app.key";

/// The fixed binding table installed at session start.
pub fn bindings() -> Vec<HotkeyBinding> {
    let mut table: Vec<HotkeyBinding> = (0u16..10)
        .map(|digit| HotkeyBinding::plain(&format!("app.key{digit}"), 48 + digit))
        .collect();
    table.extend([
        HotkeyBinding::ctrl("overlay.toggle", 113),
        HotkeyBinding::ctrl("app.reload", 116),
        HotkeyBinding::plain("app.showhide", 125),
        HotkeyBinding::plain("app.showhide1", 96),
        HotkeyBinding::plain("app.showhide2", 110),
        HotkeyBinding::plain("app.showhide3", 124),
        HotkeyBinding::plain("app.showhide4", 126),
        HotkeyBinding::plain("app.quickStatsKDA", 81),
        HotkeyBinding::plain("app.quickStatsLH", 87),
        HotkeyBinding::plain("app.quickStatsLVL", 69),
        HotkeyBinding::plain("app.quickStatsXPM", 82),
        HotkeyBinding::plain("app.quickStatsCurrentGold", 84),
        HotkeyBinding::plain("app.quickStatsNetworth", 89),
        HotkeyBinding::plain("app.quickStatsGPM", 85),
        HotkeyBinding::plain("app.quickStatsBuyback", 73),
        HotkeyBinding::plain("app.quickStatsToggle", 68),
        HotkeyBinding::plain("app.customEvent", 70),
        HotkeyBinding::plain("app.tab1", 9),
        HotkeyBinding::ctrl("app.tab2", 9),
    ]);
    table
}

/// Message payload carried by a routed effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagePayload {
    /// No payload.
    Empty,
    /// A fixed string.
    Text(&'static str),
    /// The literal action name that triggered the route.
    ActionName,
}

impl MessagePayload {
    /// Materialize the payload for a concrete action.
    pub fn resolve(self, action: &str) -> Value {
        match self {
            Self::Empty => Value::Null,
            Self::Text(text) => Value::String(text.to_string()),
            Self::ActionName => Value::String(action.to_string()),
        }
    }
}

/// One effect of a hotkey action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Reload every live surface, bypassing caches.
    ReloadAll,
    /// Deliver a message on a named channel to one surface.
    Send {
        /// Logical name of the receiving surface.
        target: &'static str,
        /// Application-level channel name.
        channel: &'static str,
        /// Payload template.
        payload: MessagePayload,
    },
}

/// Shorthand for a tip-surface message route.
const fn tip(channel: &'static str, payload: MessagePayload) -> Route {
    Route::Send {
        target: TIP_SURFACE,
        channel,
        payload,
    }
}

/// Action → effect table. The five show/hide physical keys intentionally
/// collapse to one effect; `overlay.toggle` is bound for capture but carries
/// no routed effect.
static ROUTES: &[(&str, Route)] = &[
    ("app.reload", Route::ReloadAll),
    ("app.showhide", tip("showhide", MessagePayload::Empty)),
    ("app.showhide1", tip("showhide", MessagePayload::Empty)),
    ("app.showhide2", tip("showhide", MessagePayload::Empty)),
    ("app.showhide3", tip("showhide", MessagePayload::Empty)),
    ("app.showhide4", tip("showhide", MessagePayload::Empty)),
    (
        "app.quickStatsKDA",
        tip("quickStats", MessagePayload::Text("kda")),
    ),
    (
        "app.quickStatsLH",
        tip("quickStats", MessagePayload::Text("lh")),
    ),
    (
        "app.quickStatsLVL",
        tip("quickStats", MessagePayload::Text("lvl")),
    ),
    (
        "app.quickStatsXPM",
        tip("quickStats", MessagePayload::Text("xpm")),
    ),
    (
        "app.quickStatsCurrentGold",
        tip("quickStats", MessagePayload::Text("currentGold")),
    ),
    (
        "app.quickStatsNetworth",
        tip("quickStats", MessagePayload::Text("networth")),
    ),
    (
        "app.quickStatsGPM",
        tip("quickStats", MessagePayload::Text("gpm")),
    ),
    (
        "app.quickStatsBuyback",
        tip("quickStats", MessagePayload::Text("buyback")),
    ),
    (
        "app.quickStatsToggle",
        tip("quickStatsToggle", MessagePayload::Empty),
    ),
    ("app.customEvent", tip("customEvent", MessagePayload::Empty)),
    ("app.tab1", tip("tab1", MessagePayload::Empty)),
    ("app.tab2", tip("tab2", MessagePayload::Empty)),
    ("app.pickban", tip("pickban", MessagePayload::Empty)),
];

/// Resolve an action name to its effects. Pure; unknown actions yield
/// nothing and the caller logs the drop.
pub fn route(action: &str) -> Vec<Route> {
    if let Some((_, found)) = ROUTES.iter().find(|(name, _)| *name == action) {
        return vec![found.clone()];
    }
    if action.starts_with(KEY_FAMILY) {
        return vec![tip("key", MessagePayload::ActionName)];
    }
    Vec::new()
}
