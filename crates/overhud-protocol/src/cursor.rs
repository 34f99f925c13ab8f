//! Cursor shape vocabulary.
//!
//! Surfaces report cursor changes with CSS-style names; the compositor wants
//! the platform's `IDC_*` vocabulary. The mapping is closed: a name outside
//! the table is dropped by the caller, never an error.

/// Cursor shapes a surface may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorShape {
    /// Default arrow pointer.
    Arrow,
    /// Pointing hand (links, buttons).
    Hand,
    /// Precision crosshair.
    Crosshair,
    /// Text-selection I-beam.
    Text,
    /// Busy indicator.
    Wait,
    /// Help arrow with question mark.
    Help,
    /// Four-way move.
    Move,
    /// Diagonal resize, north-west/south-east.
    ResizeNwse,
    /// Diagonal resize, north-east/south-west.
    ResizeNesw,
    /// Vertical resize.
    ResizeNs,
    /// Horizontal resize.
    ResizeEw,
    /// Cursor hidden entirely.
    Hidden,
}

/// All shapes, in declaration order.
pub const ALL_SHAPES: [CursorShape; 12] = [
    CursorShape::Arrow,
    CursorShape::Hand,
    CursorShape::Crosshair,
    CursorShape::Text,
    CursorShape::Wait,
    CursorShape::Help,
    CursorShape::Move,
    CursorShape::ResizeNwse,
    CursorShape::ResizeNesw,
    CursorShape::ResizeNs,
    CursorShape::ResizeEw,
    CursorShape::Hidden,
];

impl CursorShape {
    /// Parse a CSS-style cursor name as reported by surfaces.
    pub fn from_css(name: &str) -> Option<Self> {
        Some(match name {
            "default" => Self::Arrow,
            "pointer" => Self::Hand,
            "crosshair" => Self::Crosshair,
            "text" => Self::Text,
            "wait" => Self::Wait,
            "help" => Self::Help,
            "move" => Self::Move,
            "nwse-resize" => Self::ResizeNwse,
            "nesw-resize" => Self::ResizeNesw,
            "ns-resize" => Self::ResizeNs,
            "ew-resize" => Self::ResizeEw,
            "none" => Self::Hidden,
            _ => return None,
        })
    }

    /// The compositor's native name for this shape.
    ///
    /// `Hidden` maps to the empty string; callers treat an empty name as
    /// "send nothing".
    pub fn native_name(self) -> &'static str {
        match self {
            Self::Arrow => "IDC_ARROW",
            Self::Hand => "IDC_HAND",
            Self::Crosshair => "IDC_CROSS",
            Self::Text => "IDC_IBEAM",
            Self::Wait => "IDC_WAIT",
            Self::Help => "IDC_HELP",
            Self::Move => "IDC_SIZEALL",
            Self::ResizeNwse => "IDC_SIZENWSE",
            Self::ResizeNesw => "IDC_SIZENESW",
            Self::ResizeNs => "IDC_SIZENS",
            Self::ResizeEw => "IDC_SIZEWE",
            Self::Hidden => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shape_has_one_native_name() {
        let mut seen = std::collections::HashSet::new();
        for shape in ALL_SHAPES {
            // Hidden's empty name is still a fixed mapping of its own.
            assert!(seen.insert(shape.native_name()), "duplicate for {shape:?}");
        }
        assert_eq!(seen.len(), 12);
    }

    #[test]
    fn css_names_round_trip() {
        for (css, shape) in [
            ("default", CursorShape::Arrow),
            ("pointer", CursorShape::Hand),
            ("crosshair", CursorShape::Crosshair),
            ("text", CursorShape::Text),
            ("wait", CursorShape::Wait),
            ("help", CursorShape::Help),
            ("move", CursorShape::Move),
            ("nwse-resize", CursorShape::ResizeNwse),
            ("nesw-resize", CursorShape::ResizeNesw),
            ("ns-resize", CursorShape::ResizeNs),
            ("ew-resize", CursorShape::ResizeEw),
            ("none", CursorShape::Hidden),
        ] {
            assert_eq!(CursorShape::from_css(css), Some(shape));
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(CursorShape::from_css("grab"), None);
        assert_eq!(CursorShape::from_css(""), None);
        assert_eq!(CursorShape::from_css("IDC_ARROW"), None);
    }
}
