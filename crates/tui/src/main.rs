mod renderer;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::Parser;
use lineage_core::data::{
    check_quality, merge_instrument, parse_connections, parse_instrument_config,
    parse_instrument_data, parse_people,
};
use lineage_core::layout::{Focus, LayoutConfig, TimelineLayout, TimelineScale, year_domain};
use lineage_core::svg::render_svg;
use lineage_core::views::legend::append_legend;
use lineage_core::views::timeline::render_timeline;
use lineage_protocol::InstrumentData;

#[derive(Parser, Debug)]
#[command(name = "lineage")]
#[command(about = "Browse an instrument's lineage of composers and players")]
struct Args {
    /// Instrument datasets (JSON); `[` and `]` switch between them. With
    /// --people and --connections, instrument configs listing person ids.
    #[arg(required = true)]
    datasets: Vec<PathBuf>,

    /// Shared people file to merge with an instrument config
    #[arg(long, requires = "connections")]
    people: Option<PathBuf>,

    /// Shared connections file to merge with an instrument config
    #[arg(long, requires = "people")]
    connections: Option<PathBuf>,

    /// Year living people's bars extend to (defaults to the current year)
    #[arg(long)]
    reference_year: Option<i32>,

    /// Initial zoom factor, clamped to the configured limits
    #[arg(long, default_value_t = 1.0)]
    zoom: f64,

    /// Write the timeline as SVG to this file instead of opening the TUI.
    /// With several datasets, one file per instrument is written next to it.
    #[arg(long, value_name = "OUT")]
    svg: Option<PathBuf>,

    /// Use the dark palette for SVG export
    #[arg(long)]
    dark: bool,

    /// Layout config (JSON); missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn load_datasets(args: &Args) -> Result<Vec<InstrumentData>> {
    let pools = match (&args.people, &args.connections) {
        (Some(people), Some(connections)) => Some((
            parse_people(&read(people)?)?,
            parse_connections(&read(connections)?)?,
        )),
        _ => None,
    };

    args.datasets
        .iter()
        .map(|path| -> Result<InstrumentData> {
            let bytes = read(path)?;
            let data = match &pools {
                Some((people, connections)) => {
                    merge_instrument(&parse_instrument_config(&bytes)?, people, connections)
                }
                None => parse_instrument_data(&bytes)?,
            };
            Ok(data)
        })
        .collect()
}

fn load_config(path: Option<&Path>) -> Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let config: LayoutConfig = serde_json::from_slice(&read(path)?)
        .with_context(|| format!("parsing layout config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid layout config {}", path.display()))?;
    Ok(config)
}

/// `out` itself for a single dataset, else `<stem>-<instrument>.svg` beside it.
fn svg_path(out: &Path, instrument: &str, several: bool) -> PathBuf {
    if !several {
        return out.to_path_buf();
    }
    let stem = out
        .file_stem()
        .map_or_else(|| "lineage".to_string(), |s| s.to_string_lossy().into_owned());
    out.with_file_name(format!("{stem}-{instrument}.svg"))
}

fn export_svg(
    data: &InstrumentData,
    config: &LayoutConfig,
    reference_year: i32,
    args: &Args,
    out: &Path,
) -> Result<()> {
    let (start, end) = year_domain(data, reference_year);
    let mut scale = TimelineScale::new(f64::from(start), f64::from(end), config.container_width)
        .with_context(|| format!("{} has nothing to draw", data.instrument))?;
    scale.set_zoom(config.zoom.clamp(args.zoom))?;

    let layout = TimelineLayout::compute(data, &scale, reference_year, config);
    let mut commands = render_timeline(data, &layout, &scale, &Focus::default());
    let height = append_legend(&mut commands, layout.height);
    let svg = render_svg(&commands, layout.width, height, args.dark);
    std::fs::write(out, svg).with_context(|| format!("writing {}", out.display()))?;
    log::info!(
        "wrote {} ({} bars, {} lanes)",
        out.display(),
        layout.bars.len(),
        layout.lane_count
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let datasets = load_datasets(&args)?;
    let config = load_config(args.config.as_deref())?;
    let reference_year = args
        .reference_year
        .unwrap_or_else(|| chrono::Local::now().year());

    for data in &datasets {
        let issues = check_quality(data);
        if !issues.is_empty() {
            log::warn!("{}: {} data issue(s)", data.instrument, issues.len());
        }
    }

    match &args.svg {
        Some(out) => {
            let several = datasets.len() > 1;
            for data in &datasets {
                let path = svg_path(out, &data.instrument, several);
                export_svg(data, &config, reference_year, &args, &path)?;
            }
            Ok(())
        }
        None => renderer::render_tui(&datasets, &config, reference_year, args.zoom),
    }
}
