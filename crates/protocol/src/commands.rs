use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;
use crate::theme::ThemeToken;
use crate::types::{Color, Point, Rect};

/// A single, stateless render instruction.
///
/// The core emits a `Vec<RenderCommand>` for a timeline. Renderers consume
/// this list in order; each command carries all the data it needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled rectangle, optionally with a tooltip label and the id
    /// of the person it represents (for hit-testing / selection).
    DrawRect {
        rect: Rect,
        color: Paint,
        border_color: Option<ThemeToken>,
        corner_radius: f64,
        label: Option<SharedStr>,
        entity_id: Option<SharedStr>,
        emphasis: Emphasis,
    },

    /// Draw a text string at a position.
    DrawText {
        position: Point,
        text: SharedStr,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
    },

    /// Draw a line segment.
    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
    },

    /// Stroke an open path starting at `start`.
    DrawPath {
        start: Point,
        segments: Vec<PathSegment>,
        color: ThemeToken,
        width: f64,
        /// Dash and gap lengths; `None` strokes a solid line.
        dash: Option<(f64, f64)>,
        emphasis: Emphasis,
    },

    /// Begin a logical group (era bands, connectors, bars, axis). Renderers
    /// may use this for batching, layer separation, or accessibility.
    BeginGroup {
        id: SharedStr,
        label: Option<SharedStr>,
    },

    /// End the current group.
    EndGroup,
}

/// Fill for shapes: a semantic theme token, or a concrete color carried by
/// the dataset itself (era bands).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    Theme(ThemeToken),
    Custom(Color),
}

impl From<ThemeToken> for Paint {
    fn from(token: ThemeToken) -> Self {
        Self::Theme(token)
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Self::Custom(color)
    }
}

/// How strongly an element is drawn relative to the current focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Emphasis {
    #[default]
    Normal,
    /// Part of the focused person's neighborhood.
    Highlighted,
    /// Something else is focused.
    Dimmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathSegment {
    LineTo(Point),
    QuadTo { ctrl: Point, to: Point },
}

impl PathSegment {
    /// End point of the segment.
    pub fn end(&self) -> Point {
        match self {
            Self::LineTo(p) => *p,
            Self::QuadTo { to, .. } => *to,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_serialize_as_tagged_json() {
        let cmd = RenderCommand::DrawPath {
            start: Point::new(0.0, 0.0),
            segments: vec![PathSegment::QuadTo {
                ctrl: Point::new(5.0, 0.0),
                to: Point::new(5.0, 5.0),
            }],
            color: ThemeToken::ConnectionRelative,
            width: 1.5,
            dash: None,
            emphasis: Emphasis::Normal,
        };
        let json = serde_json::to_string(&cmd).unwrap_or_default();
        assert!(json.starts_with(r#"{"DrawPath":"#), "json={json}");
        assert!(json.contains("ConnectionRelative"));
    }

    #[test]
    fn paint_from_token() {
        assert_eq!(
            Paint::from(ThemeToken::RoleComposer),
            Paint::Theme(ThemeToken::RoleComposer)
        );
    }
}
