use std::collections::HashMap;

use lineage_protocol::{
    Color, ConnectionType, Emphasis, InstrumentData, Paint, Person, Point, Rect, RenderCommand,
    SharedStr, TextAlign, ThemeToken,
};

use crate::layout::{Focus, Highlight, TimelineLayout, TimelineScale, route_connectors};

use super::time_axis::render_time_axis;

const ERA_OPACITY: f32 = 0.3;
const ERA_LABEL_Y: f64 = 16.0;
const ERA_FONT_SIZE: f64 = 11.0;
const BAR_RADIUS: f64 = 4.0;
const BAR_LABEL_INSET: f64 = 6.0;
const BAR_FONT_SIZE: f64 = 11.0;
const CONNECTOR_WIDTH: f64 = 1.5;
const CONNECTOR_WIDTH_HIGHLIGHTED: f64 = 2.5;
const STUDENT_TEACHER_DASH: (f64, f64) = (6.0, 3.0);

/// Render a laid-out dataset as era bands, connectors, person bars, and a
/// time axis, back to front.
///
/// `layout` must have been computed from `data` with `scale`.
pub fn render_timeline(
    data: &InstrumentData,
    layout: &TimelineLayout,
    scale: &TimelineScale,
    focus: &Focus,
) -> Vec<RenderCommand> {
    if data.people.is_empty() && data.eras.is_empty() {
        return Vec::new();
    }

    let highlight = Highlight::new(&data.connections, focus);
    let mut commands =
        Vec::with_capacity(data.eras.len() * 2 + data.connections.len() + layout.bars.len() * 2 + 32);

    commands.push(RenderCommand::BeginGroup {
        id: SharedStr::from(format!("timeline-{}", data.instrument)),
        label: Some(SharedStr::from(data.instrument.as_str())),
    });

    render_eras(&mut commands, data, layout, scale);
    render_connectors(&mut commands, data, layout, &highlight);
    render_bars(&mut commands, data, layout, &highlight);

    // Scale bounds are whole years when built from `year_domain`.
    let start = scale.start_year().floor() as i32;
    let end = scale.end_year().ceil() as i32;
    commands.extend(render_time_axis(scale, start, end, layout.axis_y()));

    commands.push(RenderCommand::EndGroup);
    commands
}

fn render_eras(
    commands: &mut Vec<RenderCommand>,
    data: &InstrumentData,
    layout: &TimelineLayout,
    scale: &TimelineScale,
) {
    commands.push(RenderCommand::BeginGroup {
        id: "eras".into(),
        label: Some("Eras".into()),
    });

    for era in &data.eras {
        let x = scale.year_to_pixel(f64::from(era.start_year));
        let width = scale.year_to_pixel(f64::from(era.end_year)) - x;
        let fill = match Color::from_hex(&era.color) {
            Some(c) => Paint::Custom(Color::rgba(c.r, c.g, c.b, ERA_OPACITY)),
            None => Paint::Theme(ThemeToken::Border),
        };

        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(x, 0.0, width, layout.lanes_bottom()),
            color: fill,
            border_color: None,
            corner_radius: 0.0,
            label: Some(SharedStr::from(era.name.as_str())),
            entity_id: None,
            emphasis: Emphasis::Normal,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(x + width / 2.0, ERA_LABEL_Y),
            text: SharedStr::from(era.name.as_str()),
            color: ThemeToken::EraLabel,
            font_size: ERA_FONT_SIZE,
            align: TextAlign::Center,
        });
    }

    commands.push(RenderCommand::EndGroup);
}

fn render_connectors(
    commands: &mut Vec<RenderCommand>,
    data: &InstrumentData,
    layout: &TimelineLayout,
    highlight: &Highlight,
) {
    commands.push(RenderCommand::BeginGroup {
        id: "connections".into(),
        label: Some("Connections".into()),
    });

    for connector in route_connectors(&data.connections, layout, highlight) {
        let width = if connector.emphasis == Emphasis::Highlighted {
            CONNECTOR_WIDTH_HIGHLIGHTED
        } else {
            CONNECTOR_WIDTH
        };
        commands.push(RenderCommand::DrawPath {
            start: connector.path.start,
            segments: connector.path.segments().to_vec(),
            color: ThemeToken::for_connection(connector.kind),
            width,
            dash: connection_dash(connector.kind),
            emphasis: connector.emphasis,
        });
    }

    commands.push(RenderCommand::EndGroup);
}

/// Dash pattern (on, off) for a connection's line. Relatives are solid.
pub fn connection_dash(kind: ConnectionType) -> Option<(f64, f64)> {
    match kind {
        ConnectionType::Relative => None,
        ConnectionType::StudentTeacher => Some(STUDENT_TEACHER_DASH),
    }
}

fn render_bars(
    commands: &mut Vec<RenderCommand>,
    data: &InstrumentData,
    layout: &TimelineLayout,
    highlight: &Highlight,
) {
    let people: HashMap<&str, &Person> = data.people.iter().map(|p| (p.id.as_str(), p)).collect();

    commands.push(RenderCommand::BeginGroup {
        id: "people".into(),
        label: Some("People".into()),
    });

    for bar in &layout.bars {
        let Some(person) = people.get(bar.id.as_str()) else {
            continue;
        };
        let emphasis = highlight.person(&bar.id);

        commands.push(RenderCommand::DrawRect {
            rect: bar.rect,
            color: Paint::Theme(ThemeToken::for_role(person.role)),
            border_color: (emphasis == Emphasis::Highlighted).then_some(ThemeToken::BarOutline),
            corner_radius: BAR_RADIUS,
            label: Some(SharedStr::from(format!(
                "{} ({}) · {}",
                person.name,
                person.lifespan_label(),
                person.role
            ))),
            entity_id: Some(bar.id.clone()),
            emphasis,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(
                bar.rect.x + BAR_LABEL_INSET,
                bar.rect.y + bar.rect.h / 2.0 + 4.0,
            ),
            text: person.name.clone(),
            color: ThemeToken::BarLabel,
            font_size: BAR_FONT_SIZE,
            align: TextAlign::Left,
        });
    }

    commands.push(RenderCommand::EndGroup);
}
