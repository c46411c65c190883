//! Integration test: load instrument datasets from JSON fixtures and run
//! them through packing, scaling, layout, rendering, and SVG export.

use lineage_core::data::{
    check_quality, merge_instrument, parse_connections, parse_instrument_config,
    parse_instrument_data, parse_people,
};
use lineage_core::layout::{
    Focus, LayoutConfig, TimelineLayout, TimelineScale, lane_count, pack_lanes, year_domain,
};
use lineage_core::svg::render_svg;
use lineage_core::views::legend::{LEGEND_HEIGHT, append_legend};
use lineage_core::views::timeline::render_timeline;
use lineage_protocol::RenderCommand;

const REFERENCE_YEAR: i32 = 2026;

#[test]
fn violin_dataset_end_to_end() {
    let data = parse_instrument_data(include_bytes!("fixtures/violin.json"))
        .expect("failed to parse violin fixture");
    assert_eq!(data.people.len(), 12);
    assert!(check_quality(&data).is_empty(), "fixture should be clean");

    let packed = pack_lanes(&data.people, REFERENCE_YEAR);
    let order: Vec<(&str, usize)> = packed.iter().map(|a| (a.entity.id.as_str(), a.lane)).collect();
    assert_eq!(
        order,
        vec![
            ("corelli", 0),
            ("vivaldi", 1),
            ("geminiani", 2),
            ("tartini", 3),
            ("leopold-mozart", 0),
            ("viotti", 1),
            ("mozart", 4),
            ("paganini", 2),
            ("joachim", 0),
            ("auer", 1),
            ("heifetz", 2),
            ("hahn", 0),
        ]
    );
    assert_eq!(lane_count(&packed), 5);

    let (start, end) = year_domain(&data, REFERENCE_YEAR);
    assert_eq!((start, end), (1600, 2030));

    let config = LayoutConfig::default();
    let mut scale = TimelineScale::new(f64::from(start), f64::from(end), config.container_width)
        .expect("violin domain is non-empty");
    let layout = TimelineLayout::compute(&data, &scale, REFERENCE_YEAR, &config);
    assert_eq!(layout.lane_count, 5);
    assert_eq!(layout.height, 30.0 + 5.0 * 30.0 + 40.0);

    // Hilary Hahn is alive: her bar runs to the reference year.
    let hahn = layout.bar("hahn").expect("hahn is laid out");
    let hahn_end = scale.pixel_to_year(hahn.rect.x + hahn.rect.w);
    assert!((hahn_end - f64::from(REFERENCE_YEAR)).abs() < 1e-9);

    let focus = Focus {
        selected: None,
        hovered: Some("auer".into()),
    };
    let commands = render_timeline(&data, &layout, &scale, &focus);
    let paths = commands
        .iter()
        .filter(|c| matches!(c, RenderCommand::DrawPath { .. }))
        .count();
    assert_eq!(paths, 4);

    let svg = render_svg(&commands, layout.width, layout.height, false);
    assert!(svg.contains("Niccolò Paganini"));
    assert!(svg.contains(">1900<"));

    // Exported documents carry the legend under the axis.
    let mut exported = commands.clone();
    let height = append_legend(&mut exported, layout.height);
    assert_eq!(height, layout.height + LEGEND_HEIGHT);
    let svg = render_svg(&exported, layout.width, height, false);
    assert!(svg.contains(r#"<g class="legend">"#));
    assert!(svg.contains(">Student/Teacher<"));
    assert!(svg.contains(">Composer<"));

    // Zooming in keeps the lanes and doubles the canvas.
    let policy = config.zoom;
    scale
        .update_zoom(|z| policy.clamp(z * 2.0))
        .expect("clamped zoom is positive");
    let zoomed = TimelineLayout::compute(&data, &scale, REFERENCE_YEAR, &config);
    assert_eq!(zoomed.width, 2.0 * layout.width);
    assert_eq!(zoomed.lane_count, layout.lane_count);
}

#[test]
fn merged_piano_dataset() {
    let config = parse_instrument_config(include_bytes!("fixtures/piano.json"))
        .expect("failed to parse piano config");
    let people = parse_people(include_bytes!("fixtures/people.json"))
        .expect("failed to parse people pool");
    let connections = parse_connections(include_bytes!("fixtures/connections.json"))
        .expect("failed to parse connections");

    let data = merge_instrument(&config, &people, &connections);
    assert_eq!(data.people.len(), 5);
    // Paganini is not a pianist here; his connection to Liszt is dropped.
    assert_eq!(data.connections.len(), 3);
    assert!(check_quality(&data).is_empty());

    let (start, end) = year_domain(&data, REFERENCE_YEAR);
    let scale = TimelineScale::new(f64::from(start), f64::from(end), 1000.0)
        .expect("piano domain is non-empty");
    let layout = TimelineLayout::compute(&data, &scale, REFERENCE_YEAR, &LayoutConfig::default());

    // Haydn and Mozart overlap, Beethoven overlaps both; Czerny and Liszt
    // reuse freed lanes.
    let lanes: Vec<(&str, usize)> = layout.bars.iter().map(|b| (b.id.as_str(), b.lane)).collect();
    assert_eq!(
        lanes,
        vec![("haydn", 0), ("mozart", 1), ("beethoven", 2), ("czerny", 1), ("liszt", 0)]
    );
}
