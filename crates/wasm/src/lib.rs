use std::sync::{Mutex, MutexGuard};

use lineage_core::layout::{Focus, LayoutConfig, TimelineLayout, TimelineScale};
use lineage_core::views::legend::append_legend;
use lineage_core::views::timeline::render_timeline;
use lineage_protocol::InstrumentData;
use serde::Serialize;
use wasm_bindgen::prelude::*;

static DATASETS: Mutex<Vec<InstrumentData>> = Mutex::new(Vec::new());

fn datasets() -> Result<MutexGuard<'static, Vec<InstrumentData>>, JsError> {
    DATASETS
        .lock()
        .map_err(|_| JsError::new("dataset store poisoned"))
}

fn with_dataset<R>(
    handle: usize,
    f: impl FnOnce(&InstrumentData) -> Result<R, JsError>,
) -> Result<R, JsError> {
    let store = datasets()?;
    let data = store
        .get(handle)
        .ok_or_else(|| JsError::new("invalid dataset handle"))?;
    f(data)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&e.to_string()))
}

fn build(
    data: &InstrumentData,
    reference_year: i32,
    container_width: f64,
    zoom: f64,
) -> Result<(TimelineScale, TimelineLayout), JsError> {
    let config = LayoutConfig {
        container_width,
        ..LayoutConfig::default()
    };
    let (start, end) = lineage_core::layout::year_domain(data, reference_year);
    let mut scale = TimelineScale::new(f64::from(start), f64::from(end), container_width)
        .map_err(|e| JsError::new(&e.to_string()))?;
    scale
        .set_zoom(config.zoom.clamp(zoom))
        .map_err(|e| JsError::new(&e.to_string()))?;
    let layout = TimelineLayout::compute(data, &scale, reference_year, &config);
    Ok((scale, layout))
}

/// Parse an instrument dataset (JSON). Returns a handle for later calls.
#[wasm_bindgen]
pub fn load_dataset(data: &[u8]) -> Result<usize, JsError> {
    let parsed = lineage_core::data::parse_instrument_data(data)
        .map_err(|e| JsError::new(&e.to_string()))?;
    let mut store = datasets()?;
    store.push(parsed);
    Ok(store.len() - 1)
}

/// `[start_year, end_year]` the timeline covers.
#[wasm_bindgen]
pub fn year_domain(handle: usize, reference_year: i32) -> Result<Vec<i32>, JsError> {
    with_dataset(handle, |data| {
        let (start, end) = lineage_core::layout::year_domain(data, reference_year);
        Ok(vec![start, end])
    })
}

#[derive(Serialize)]
struct LaneEntry<'a> {
    id: &'a str,
    lane: usize,
}

/// Lane of every person as JSON `[{"id", "lane"}]`, in birth order.
#[wasm_bindgen]
pub fn pack_lanes(handle: usize, reference_year: i32) -> Result<String, JsError> {
    with_dataset(handle, |data| {
        let assignments = lineage_core::layout::pack_lanes(&data.people, reference_year);
        let entries: Vec<LaneEntry<'_>> = assignments
            .iter()
            .map(|a| LaneEntry {
                id: a.entity.id.as_str(),
                lane: a.lane,
            })
            .collect();
        to_json(&entries)
    })
}

/// Full layout (bars, lane count, size) as JSON.
#[wasm_bindgen]
pub fn layout(
    handle: usize,
    reference_year: i32,
    container_width: f64,
    zoom: f64,
) -> Result<String, JsError> {
    with_dataset(handle, |data| {
        let (_, layout) = build(data, reference_year, container_width, zoom)?;
        to_json(&layout)
    })
}

/// Render commands for the timeline as JSON.
#[wasm_bindgen]
pub fn render_view(
    handle: usize,
    reference_year: i32,
    container_width: f64,
    zoom: f64,
    selected: Option<String>,
    hovered: Option<String>,
) -> Result<String, JsError> {
    with_dataset(handle, |data| {
        let (scale, layout) = build(data, reference_year, container_width, zoom)?;
        let focus = Focus {
            selected: selected.map(Into::into),
            hovered: hovered.map(Into::into),
        };
        to_json(&render_timeline(data, &layout, &scale, &focus))
    })
}

/// Standalone SVG of the timeline, with the legend underneath.
#[wasm_bindgen]
pub fn render_svg(
    handle: usize,
    reference_year: i32,
    container_width: f64,
    zoom: f64,
    dark: bool,
) -> Result<String, JsError> {
    with_dataset(handle, |data| {
        let (scale, layout) = build(data, reference_year, container_width, zoom)?;
        let mut commands = render_timeline(data, &layout, &scale, &Focus::default());
        let height = append_legend(&mut commands, layout.height);
        Ok(lineage_core::svg::render_svg(
            &commands,
            layout.width,
            height,
            dark,
        ))
    })
}

/// Data-quality issues as a JSON array of messages.
#[wasm_bindgen]
pub fn check_quality(handle: usize) -> Result<String, JsError> {
    with_dataset(handle, |data| {
        let messages: Vec<String> = lineage_core::data::check_quality(data)
            .iter()
            .map(ToString::to_string)
            .collect();
        to_json(&messages)
    })
}
