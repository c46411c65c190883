//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use std::fmt::Write as _;

use lineage_protocol::{Emphasis, Paint, PathSegment, RenderCommand, TextAlign, ThemeToken};

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions.
/// `dark` selects the color palette.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, dark: bool) -> String {
    let mut svg = String::with_capacity(commands.len() * 160);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif">"#,
    );

    let bg = resolve_color(ThemeToken::Background, dark);
    let _ = write!(svg, r#"<rect width="{width}" height="{height}" fill="{bg}"/>"#);

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                corner_radius,
                label,
                emphasis,
                ..
            } => {
                let (fill, fill_opacity) = resolve_paint(*color, dark);
                let _ = write!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{corner_radius}" fill="{fill}""#,
                    rect.x,
                    rect.y,
                    rect.w.max(0.0),
                    rect.h,
                );
                if fill_opacity < 1.0 {
                    let _ = write!(svg, r#" fill-opacity="{fill_opacity}""#);
                }
                if let Some(border) = border_color {
                    let _ = write!(
                        svg,
                        r#" stroke="{}" stroke-width="2""#,
                        resolve_color(*border, dark)
                    );
                }
                if *emphasis == Emphasis::Dimmed {
                    svg.push_str(r#" opacity="0.3""#);
                }
                svg.push('>');
                if let Some(label) = label {
                    let _ = write!(svg, "<title>{}</title>", escape_xml(label));
                }
                svg.push_str("</rect>");
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let stroke = resolve_color(*color, dark);
                let _ = write!(
                    svg,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="{line_width}"/>"#,
                    from.x, from.y, to.x, to.y,
                );
            }
            RenderCommand::DrawText {
                text,
                position,
                color,
                font_size,
                align,
            } => {
                let fill = resolve_color(*color, dark);
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                let _ = write!(
                    svg,
                    r#"<text x="{}" y="{}" fill="{fill}" font-size="{font_size}" text-anchor="{anchor}" style="pointer-events:none">{}</text>"#,
                    position.x,
                    position.y,
                    escape_xml(text),
                );
            }
            RenderCommand::DrawPath {
                start,
                segments,
                color,
                width: line_width,
                dash,
                emphasis,
            } => {
                let stroke = resolve_color(*color, dark);
                let mut d = format!("M {} {}", start.x, start.y);
                for segment in segments {
                    let _ = match segment {
                        PathSegment::LineTo(p) => write!(d, " L {} {}", p.x, p.y),
                        PathSegment::QuadTo { ctrl, to } => {
                            write!(d, " Q {} {} {} {}", ctrl.x, ctrl.y, to.x, to.y)
                        }
                    };
                }
                let opacity = match emphasis {
                    Emphasis::Normal => 0.5,
                    Emphasis::Highlighted => 1.0,
                    Emphasis::Dimmed => 0.15,
                };
                let _ = write!(
                    svg,
                    r#"<path d="{d}" fill="none" stroke="{stroke}" stroke-width="{line_width}" opacity="{opacity}""#,
                );
                if let Some((on, off)) = dash {
                    let _ = write!(svg, r#" stroke-dasharray="{on} {off}""#);
                }
                svg.push_str("/>");
            }
            RenderCommand::BeginGroup { id, .. } => {
                let _ = write!(svg, r#"<g class="{}">"#, escape_xml(id));
            }
            RenderCommand::EndGroup => svg.push_str("</g>"),
        }
    }

    svg.push_str("</svg>");
    svg
}

fn resolve_paint(paint: Paint, dark: bool) -> (String, f32) {
    match paint {
        Paint::Theme(token) => (resolve_color(token, dark).to_string(), 1.0),
        Paint::Custom(color) => (color.to_hex(), color.a),
    }
}

fn resolve_color(token: ThemeToken, dark: bool) -> &'static str {
    if dark {
        match token {
            ThemeToken::Background => "#1a1a2e",
            ThemeToken::Border => "#303030",
            ThemeToken::RoleComposer => "#5c9ce6",
            ThemeToken::RolePlayer => "#f0903a",
            ThemeToken::RoleBoth => "#a55ec4",
            ThemeToken::BarOutline => "#ececec",
            ThemeToken::ConnectionRelative => "#f06252",
            ThemeToken::ConnectionStudentTeacher => "#4aa8ec",
            ThemeToken::BarLabel | ThemeToken::TextPrimary => "#ffffff",
            ThemeToken::EraLabel | ThemeToken::AxisLabel | ThemeToken::TextMuted => "#9e9e9e",
            ThemeToken::AxisLine => "#616161",
        }
    } else {
        match token {
            ThemeToken::Background => "#ffffff",
            ThemeToken::Border => "#dee2e6",
            ThemeToken::RoleComposer => "#4A90D9",
            ThemeToken::RolePlayer => "#E67E22",
            ThemeToken::RoleBoth => "#8E44AD",
            ThemeToken::BarOutline => "#333333",
            ThemeToken::ConnectionRelative => "#E74C3C",
            ThemeToken::ConnectionStudentTeacher => "#3498DB",
            ThemeToken::BarLabel => "#ffffff",
            ThemeToken::TextPrimary => "#1a1a2e",
            ThemeToken::EraLabel => "#666666",
            ThemeToken::AxisLabel | ThemeToken::TextMuted => "#888888",
            ThemeToken::AxisLine => "#cccccc",
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
