use std::collections::HashMap;

use lineage_protocol::{InstrumentData, Point, Rect, SharedStr};
use serde::{Deserialize, Serialize};

use super::lanes::{TimedEntity, lane_count, pack_lanes};
use super::scale::{ScaleError, TimelineScale, ZoomPolicy};

/// Fixed pixel metrics of the timeline, loadable from a JSON config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub bar_height: f64,
    /// Vertical gap between neighboring lanes.
    pub lane_gap: f64,
    /// Space above the first lane (era labels live here).
    pub top_padding: f64,
    /// Space below the last lane (the time axis lives here).
    pub bottom_padding: f64,
    /// Timeline width at zoom 1.
    pub container_width: f64,
    pub zoom: ZoomPolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            bar_height: 24.0,
            lane_gap: 6.0,
            top_padding: 30.0,
            bottom_padding: 40.0,
            container_width: 1200.0,
            zoom: ZoomPolicy::default(),
        }
    }
}

impl LayoutConfig {
    pub fn lane_pitch(&self) -> f64 {
        self.bar_height + self.lane_gap
    }

    /// Reject values a front end cannot build a scale from.
    pub fn validate(&self) -> Result<(), ScaleError> {
        if !(self.container_width.is_finite() && self.container_width > 0.0) {
            return Err(ScaleError::InvalidWidth(self.container_width));
        }
        self.zoom.validate()
    }
}

/// Year range a dataset's timeline should cover.
///
/// Starts at the earliest era start or birth, and ends at the latest era end
/// or `reference_year`, whichever is later. A dataset with no eras and no
/// people yields `(reference_year, reference_year)`, which
/// [`TimelineScale::new`] rejects.
pub fn year_domain(data: &InstrumentData, reference_year: i32) -> (i32, i32) {
    let start = data
        .eras
        .iter()
        .map(|e| e.start_year)
        .chain(data.people.iter().map(|p| p.born))
        .min()
        .unwrap_or(reference_year);
    let end = data
        .eras
        .iter()
        .map(|e| e.end_year)
        .chain(std::iter::once(reference_year))
        .max()
        .unwrap_or(reference_year);
    (start, end)
}

/// One person's bar, positioned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub id: SharedStr,
    pub lane: usize,
    pub rect: Rect,
}

impl Bar {
    /// Where connectors attach.
    pub fn anchor(&self) -> Point {
        self.rect.center()
    }
}

/// Lanes and pixel positions for every person in a dataset.
///
/// Built from the lane packer and a [`TimelineScale`]; rebuild it whenever
/// the dataset, zoom, or reference year changes.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineLayout {
    /// In packing order (by birth year).
    pub bars: Vec<Bar>,
    pub lane_count: usize,
    pub content_height: f64,
    pub width: f64,
    pub height: f64,
    pub config: LayoutConfig,
    #[serde(skip)]
    index: HashMap<SharedStr, usize>,
}

impl TimelineLayout {
    pub fn compute(
        data: &InstrumentData,
        scale: &TimelineScale,
        reference_year: i32,
        config: &LayoutConfig,
    ) -> Self {
        let assignments = pack_lanes(&data.people, reference_year);
        let lanes = lane_count(&assignments);

        let bars: Vec<Bar> = assignments
            .iter()
            .map(|a| {
                let x = scale.year_to_pixel(f64::from(a.entity.start()));
                let end_x = scale.year_to_pixel(f64::from(a.entity.resolved_end(reference_year)));
                let y = config.top_padding + a.lane as f64 * config.lane_pitch();
                Bar {
                    id: a.entity.id.clone(),
                    lane: a.lane,
                    rect: Rect::new(x, y, end_x - x, config.bar_height),
                }
            })
            .collect();

        // Later duplicates win, matching a plain map insert.
        let index = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| (bar.id.clone(), i))
            .collect();

        let content_height = lanes as f64 * config.lane_pitch();
        log::debug!(
            "laid out {} bars in {lanes} lanes, {:.0}x{:.0}px at zoom {}",
            bars.len(),
            scale.total_width(),
            config.top_padding + content_height + config.bottom_padding,
            scale.zoom()
        );

        Self {
            bars,
            lane_count: lanes,
            content_height,
            width: scale.total_width(),
            height: config.top_padding + content_height + config.bottom_padding,
            config: *config,
            index,
        }
    }

    pub fn bar(&self, id: &str) -> Option<&Bar> {
        self.index.get(id).map(|&i| &self.bars[i])
    }

    /// Bottom edge of the lane area; the era bands stop here.
    pub fn lanes_bottom(&self) -> f64 {
        self.config.top_padding + self.content_height
    }

    /// Baseline of the time axis.
    pub fn axis_y(&self) -> f64 {
        self.lanes_bottom() + 4.0
    }

    /// The bar under `point`, if any. Bars drawn later win.
    pub fn hit_test(&self, point: Point) -> Option<&Bar> {
        self.bars.iter().rev().find(|bar| bar.rect.contains(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_protocol::{Era, Person, Role};

    fn person(id: &str, born: i32, died: Option<i32>) -> Person {
        Person {
            id: id.into(),
            name: id.into(),
            born,
            born_estimated: false,
            died,
            role: Role::Player,
            bio: String::new(),
            photo_url: None,
            wiki_url: None,
            website_url: None,
        }
    }

    fn dataset() -> InstrumentData {
        InstrumentData {
            instrument: "cello".into(),
            eras: vec![Era {
                name: "Baroque".into(),
                start_year: 1600,
                end_year: 1750,
                color: "#F5E6CC".into(),
            }],
            people: vec![
                person("boccherini", 1743, Some(1805)),
                person("duport", 1749, Some(1819)),
                person("popper", 1843, Some(1913)),
                person("yo-yo-ma", 1955, None),
            ],
            connections: vec![],
        }
    }

    #[test]
    fn domain_covers_eras_people_and_today() {
        let data = dataset();
        assert_eq!(year_domain(&data, 2026), (1600, 2026));

        let mut late = data.clone();
        late.eras[0].end_year = 2100;
        assert_eq!(year_domain(&late, 2026), (1600, 2100));

        let mut early = data;
        early.people.push(person("gabrielli", 1500, Some(1550)));
        assert_eq!(year_domain(&early, 2026).0, 1500);
    }

    #[test]
    fn empty_dataset_has_degenerate_domain() {
        let data = InstrumentData {
            instrument: "empty".into(),
            eras: vec![],
            people: vec![],
            connections: vec![],
        };
        let (start, end) = year_domain(&data, 2026);
        assert_eq!((start, end), (2026, 2026));
        assert!(TimelineScale::new(f64::from(start), f64::from(end), 1200.0).is_err());
    }

    #[test]
    fn positions_bars_from_lanes_and_scale() {
        let data = dataset();
        let scale = TimelineScale::new(1600.0, 2026.0, 1278.0).expect("valid scale");
        let config = LayoutConfig::default();
        let layout = TimelineLayout::compute(&data, &scale, 2026, &config);

        assert_eq!(layout.lane_count, 2);
        assert_eq!(layout.content_height, 60.0);
        assert_eq!(layout.height, 30.0 + 60.0 + 40.0);
        assert_eq!(layout.width, 1278.0);

        // 3px per year.
        let duport = layout.bar("duport").expect("duport is laid out");
        assert_eq!(duport.lane, 1);
        assert!((duport.rect.x - 447.0).abs() < 1e-9);
        assert!((duport.rect.w - 210.0).abs() < 1e-9);
        assert_eq!(duport.rect.y, 60.0);
        assert_eq!(duport.rect.h, 24.0);

        let ma = layout.bar("yo-yo-ma").expect("living cellist is laid out");
        assert_eq!(ma.lane, 0);
        assert!((ma.rect.x + ma.rect.w - 1278.0).abs() < 1e-9);
        assert_eq!(layout.axis_y(), 94.0);
    }

    #[test]
    fn zoom_widens_bars_but_keeps_lanes() {
        let data = dataset();
        let mut scale = TimelineScale::new(1600.0, 2026.0, 1200.0).expect("valid scale");
        let config = LayoutConfig::default();
        let base = TimelineLayout::compute(&data, &scale, 2026, &config);
        scale.set_zoom(2.0).expect("positive zoom");
        let zoomed = TimelineLayout::compute(&data, &scale, 2026, &config);

        for (a, b) in base.bars.iter().zip(&zoomed.bars) {
            assert_eq!(a.lane, b.lane);
            assert!((b.rect.w - 2.0 * a.rect.w).abs() < 1e-9);
            assert_eq!(a.rect.y, b.rect.y);
        }
        assert_eq!(zoomed.width, 2400.0);
    }

    #[test]
    fn hit_test_finds_bar_under_point() {
        let data = dataset();
        let scale = TimelineScale::new(1600.0, 2026.0, 1278.0).expect("valid scale");
        let layout = TimelineLayout::compute(&data, &scale, 2026, &LayoutConfig::default());

        let popper = layout.bar("popper").expect("popper is laid out");
        let hit = layout.hit_test(popper.anchor()).map(|b| b.id.as_str());
        assert_eq!(hit, Some("popper"));
        assert!(layout.hit_test(Point::new(5.0, 5.0)).is_none());
    }

    #[test]
    fn config_fills_missing_fields_with_defaults() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{"barHeight": 30.0}"#).unwrap_or_default();
        // Keys are snake_case; unknown keys are ignored and defaults remain.
        assert_eq!(config, LayoutConfig::default());

        let config: LayoutConfig =
            serde_json::from_str(r#"{"bar_height": 30.0, "zoom": {"max": 4.0}}"#)
                .unwrap_or_default();
        assert_eq!(config.bar_height, 30.0);
        assert_eq!(config.lane_gap, 6.0);
        assert_eq!(config.zoom.min, 0.5);
        assert_eq!(config.zoom.max, 4.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_with_inverted_zoom_limits_is_rejected() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{"zoom": {"min": 10.0, "max": 0.5}}"#).unwrap_or_default();
        assert_eq!(
            config.validate(),
            Err(ScaleError::InvalidZoomPolicy { min: 10.0, max: 0.5 })
        );
        // Clamping still works on the bad policy.
        assert_eq!(config.zoom.clamp(1.0), 0.5);

        let config: LayoutConfig =
            serde_json::from_str(r#"{"container_width": -5.0}"#).unwrap_or_default();
        assert_eq!(config.validate(), Err(ScaleError::InvalidWidth(-5.0)));
    }
}
