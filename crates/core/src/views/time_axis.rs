use lineage_protocol::{Point, RenderCommand, SharedStr, TextAlign, ThemeToken};

use crate::layout::TimelineScale;

const TICK_HEIGHT: f64 = 8.0;
const LABEL_OFFSET: f64 = 22.0;
const FONT_SIZE: f64 = 12.0;
const LINE_WIDTH: f64 = 1.0;

/// Years between labelled ticks for a timeline covering `range` years.
pub fn tick_interval(range: i64) -> i64 {
    match range {
        r if r > 300 => 100,
        r if r > 150 => 50,
        r if r > 60 => 25,
        _ => 10,
    }
}

/// Tick years from the first multiple of the interval at or after `start`
/// up to and including `end`.
pub fn ticks(start: i32, end: i32) -> Vec<i32> {
    // Widened so years near the ends of `i32` cannot overflow.
    let (start, end) = (i64::from(start), i64::from(end));
    let interval = tick_interval(end - start);
    let first = if start.rem_euclid(interval) == 0 {
        start
    } else {
        (start.div_euclid(interval) + 1) * interval
    };
    (first..=end)
        .step_by(interval as usize)
        .filter_map(|year| i32::try_from(year).ok())
        .collect()
}

/// Render the year axis: a baseline across `start..=end`, a tick mark at
/// every [`ticks`] year, and a centered year label under each tick.
pub fn render_time_axis(scale: &TimelineScale, start: i32, end: i32, y: f64) -> Vec<RenderCommand> {
    let years = ticks(start, end);
    let mut commands = Vec::with_capacity(years.len() * 2 + 3);

    commands.push(RenderCommand::BeginGroup {
        id: "time-axis".into(),
        label: Some("Time Axis".into()),
    });

    commands.push(RenderCommand::DrawLine {
        from: Point::new(scale.year_to_pixel(f64::from(start)), y),
        to: Point::new(scale.year_to_pixel(f64::from(end)), y),
        color: ThemeToken::AxisLine,
        width: LINE_WIDTH,
    });

    for year in years {
        let x = scale.year_to_pixel(f64::from(year));
        commands.push(RenderCommand::DrawLine {
            from: Point::new(x, y),
            to: Point::new(x, y + TICK_HEIGHT),
            color: ThemeToken::AxisLine,
            width: LINE_WIDTH,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(x, y + LABEL_OFFSET),
            text: SharedStr::from(year.to_string()),
            color: ThemeToken::AxisLabel,
            font_size: FONT_SIZE,
            align: TextAlign::Center,
        });
    }

    commands.push(RenderCommand::EndGroup);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_grows_with_range() {
        assert_eq!(tick_interval(430), 100);
        assert_eq!(tick_interval(301), 100);
        assert_eq!(tick_interval(300), 50);
        assert_eq!(tick_interval(151), 50);
        assert_eq!(tick_interval(150), 25);
        assert_eq!(tick_interval(61), 25);
        assert_eq!(tick_interval(60), 10);
        assert_eq!(tick_interval(0), 10);
    }

    #[test]
    fn ticks_start_at_first_multiple() {
        assert_eq!(ticks(1600, 2030), vec![1600, 1700, 1800, 1900, 2000]);
        assert_eq!(ticks(1653, 2026), vec![1700, 1800, 1900, 2000]);
        assert_eq!(ticks(1915, 1962), vec![1920, 1930, 1940, 1950, 1960]);
        assert_eq!(ticks(1750, 1800), vec![1750, 1760, 1770, 1780, 1790, 1800]);
        assert_eq!(ticks(-45, 0), vec![-40, -30, -20, -10, 0]);
        assert!(ticks(1905, 1901).is_empty());
    }

    #[test]
    fn ticks_near_integer_limits() {
        let high = ticks(i32::MAX - 250, i32::MAX);
        assert_eq!(high.len(), 5);
        assert_eq!(high.first(), Some(&2_147_483_400));
        assert_eq!(high.last(), Some(&2_147_483_600));

        let low = ticks(i32::MIN, i32::MIN + 250);
        assert_eq!(low.len(), 5);
        assert_eq!(low.first(), Some(&-2_147_483_600));
        assert_eq!(low.last(), Some(&-2_147_483_400));

        assert!(ticks(i32::MAX, i32::MIN).is_empty());
    }

    #[test]
    fn renders_baseline_ticks_and_labels() {
        let scale = TimelineScale::new(1600.0, 2030.0, 1000.0).expect("valid scale");
        let cmds = render_time_axis(&scale, 1600, 2030, 120.0);

        let lines = cmds
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawLine { .. }))
            .count();
        // Baseline + five ticks.
        assert_eq!(lines, 6);

        let labels: Vec<_> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawText { text, position, .. } => Some((text.to_string(), *position)),
                _ => None,
            })
            .collect();
        assert_eq!(labels.len(), 5);
        assert_eq!(labels[0].0, "1600");
        assert_eq!(labels[0].1, Point::new(0.0, 142.0));
    }
}
