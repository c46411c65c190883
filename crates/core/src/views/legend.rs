//! Key explaining connector styles and bar colors.

use lineage_protocol::{
    ConnectionType, Emphasis, Paint, PathSegment, Point, Rect, RenderCommand, Role, TextAlign,
    ThemeToken,
};

use super::timeline::connection_dash;

/// Vertical space the legend row takes below a timeline.
pub const LEGEND_HEIGHT: f64 = 28.0;
const LEGEND_INSET: f64 = 8.0;
const KEY_LINE_LENGTH: f64 = 24.0;
const KEY_LINE_WIDTH: f64 = 2.0;
const SWATCH_SIZE: f64 = 12.0;
const LABEL_GAP: f64 = 6.0;
const ENTRY_GAP: f64 = 18.0;
const FONT_SIZE: f64 = 12.0;
/// Rough advance of one label character at `FONT_SIZE`.
const CHAR_WIDTH: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LegendKey {
    /// A short sample of a connector line.
    Line {
        color: ThemeToken,
        dash: Option<(f64, f64)>,
    },
    /// A role color dot.
    Swatch(ThemeToken),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendEntry {
    pub key: LegendKey,
    pub label: &'static str,
}

/// Connector styles first, then role colors, in display order.
pub fn legend_entries() -> Vec<LegendEntry> {
    let connections = [
        (ConnectionType::Relative, "Relative"),
        (ConnectionType::StudentTeacher, "Student/Teacher"),
    ]
    .map(|(kind, label)| LegendEntry {
        key: LegendKey::Line {
            color: ThemeToken::for_connection(kind),
            dash: connection_dash(kind),
        },
        label,
    });
    let roles = [
        (Role::Composer, "Composer"),
        (Role::Player, "Player"),
        (Role::Both, "Both"),
    ]
    .map(|(role, label)| LegendEntry {
        key: LegendKey::Swatch(ThemeToken::for_role(role)),
        label,
    });
    connections.into_iter().chain(roles).collect()
}

/// Render the legend as a single row. `origin` is the left edge and the
/// vertical center of the row.
pub fn render_legend(origin: Point) -> Vec<RenderCommand> {
    let entries = legend_entries();
    let mut commands = Vec::with_capacity(entries.len() * 2 + 2);
    commands.push(RenderCommand::BeginGroup {
        id: "legend".into(),
        label: Some("Legend".into()),
    });

    let y = origin.y;
    let mut x = origin.x;
    for entry in entries {
        let key_width = match entry.key {
            LegendKey::Line { color, dash } => {
                commands.push(RenderCommand::DrawPath {
                    start: Point::new(x, y),
                    segments: vec![PathSegment::LineTo(Point::new(x + KEY_LINE_LENGTH, y))],
                    color,
                    width: KEY_LINE_WIDTH,
                    dash,
                    emphasis: Emphasis::Highlighted,
                });
                KEY_LINE_LENGTH
            }
            LegendKey::Swatch(color) => {
                commands.push(RenderCommand::DrawRect {
                    rect: Rect::new(x, y - SWATCH_SIZE / 2.0, SWATCH_SIZE, SWATCH_SIZE),
                    color: Paint::Theme(color),
                    border_color: None,
                    corner_radius: SWATCH_SIZE / 2.0,
                    label: None,
                    entity_id: None,
                    emphasis: Emphasis::Normal,
                });
                SWATCH_SIZE
            }
        };
        let label_x = x + key_width + LABEL_GAP;
        commands.push(RenderCommand::DrawText {
            position: Point::new(label_x, y + FONT_SIZE / 3.0),
            text: entry.label.into(),
            color: ThemeToken::TextPrimary,
            font_size: FONT_SIZE,
            align: TextAlign::Left,
        });
        x = label_x + entry.label.len() as f64 * CHAR_WIDTH + ENTRY_GAP;
    }

    commands.push(RenderCommand::EndGroup);
    commands
}

/// Append the legend below a timeline that is `timeline_height` tall.
/// Returns the height of the whole document.
pub fn append_legend(commands: &mut Vec<RenderCommand>, timeline_height: f64) -> f64 {
    commands.extend(render_legend(Point::new(
        LEGEND_INSET,
        timeline_height + LEGEND_HEIGHT / 2.0,
    )));
    timeline_height + LEGEND_HEIGHT
}
