#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]

use std::{
    env,
    error::Error,
    fs,
    hash::BuildHasher,
    path::{Path, PathBuf},
    str::FromStr,
};

use chained_map::{
    ChainedHashMap, MapError,
    hash::{BuildAdditive, BuildDjb2, additive, djb2},
    utils::BucketStats,
};
use log::{debug, info};
use plotters::prelude::*;
use rand::{Rng, SeedableRng, rngs::StdRng};
use thiserror::Error;

const USAGE: &str =
    "usage: chain_report [--keys <count>] [--capacity <buckets>] [--seed <u64>] [--out <dir>]";

// Plot styling
const FONT_FAMILY: &str = "sans-serif";
const TITLE_SIZE: i32 = 35;
const TEXT_SIZE: i32 = 16;
const LINE_WIDTH: u32 = 2;
const MARKER_SIZE: i32 = 4;
const COLORS: [RGBColor; 2] = [
    RGBColor(220, 50, 50), // Bright red
    RGBColor(50, 90, 220), // Bright blue
];

#[derive(Debug, Error)]
enum ReportError {
    #[error("missing value for {0}")]
    MissingValue(String),
    #[error("invalid value '{value}' for {flag}")]
    InvalidValue { flag: String, value: String },
    #[error("unknown argument '{0}'")]
    UnknownFlag(String),
}

/// Report settings; the seed makes every run reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ReportConfig {
    keys: usize,
    capacity: usize,
    seed: u64,
    out: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { keys: 10_000, capacity: 16, seed: 42, out: PathBuf::from(".") }
    }
}

impl ReportConfig {
    fn from_args<I: IntoIterator<Item = String>>(args: I) -> Result<Self, ReportError> {
        let mut config = Self::default();
        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            let Some(value) = args.next() else {
                return Err(ReportError::MissingValue(flag));
            };
            match flag.as_str() {
                "--keys" => config.keys = parse_value(&flag, &value)?,
                "--capacity" => config.capacity = parse_value(&flag, &value)?,
                "--seed" => config.seed = parse_value(&flag, &value)?,
                "--out" => config.out = PathBuf::from(value),
                _ => return Err(ReportError::UnknownFlag(flag)),
            }
        }
        Ok(config)
    }
}

fn parse_value<T: FromStr>(flag: &str, value: &str) -> Result<T, ReportError> {
    value
        .parse()
        .map_err(|_| ReportError::InvalidValue { flag: flag.to_string(), value: value.to_string() })
}

/// Lowercase words of 3 to 8 letters; repeats are possible and left in on purpose.
fn random_keys(count: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let len = rng.random_range(3..=8);
            (0..len).map(|_| char::from(rng.random_range(b'a'..=b'z'))).collect()
        })
        .collect()
}

/// Outcome of inserting every key into one map
#[derive(Debug)]
struct HasherRun {
    name: &'static str,
    stats: BucketStats,
    histogram: Vec<usize>,
    /// (entries, capacity) after every successful add
    growth: Vec<(usize, usize)>,
    duplicates: usize,
}

fn run<S: BuildHasher>(
    name: &'static str,
    keys: &[String],
    capacity: usize,
    hasher: S,
) -> Result<HasherRun, MapError> {
    let mut map = ChainedHashMap::with_capacity_and_hasher(capacity, hasher)?;
    let mut growth = vec![(0, map.capacity())];
    let mut duplicates = 0;

    for (index, key) in keys.iter().enumerate() {
        match map.add(key.as_str(), index) {
            Ok(()) => growth.push((map.len(), map.capacity())),
            Err(MapError::DuplicateKey) => duplicates += 1,
            Err(error) => return Err(error),
        }
    }
    debug!("{name}: {} entries in {} buckets, {duplicates} duplicates", map.len(), map.capacity());

    Ok(HasherRun {
        name,
        stats: BucketStats::of(&map),
        histogram: BucketStats::histogram(&map),
        growth,
        duplicates,
    })
}

fn plot_chain_lengths(path: &Path, runs: &[HasherRun]) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_len = runs.iter().map(|run| run.histogram.len()).max().unwrap_or(1);
    let max_count = runs.iter().flat_map(|run| run.histogram.iter().copied()).max().unwrap_or(1);

    let mut chart = ChartBuilder::on(&root)
        .caption("Bucket Chain Length Distribution", (FONT_FAMILY, TITLE_SIZE))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0..max_len, 0..(max_count + max_count / 10 + 1))?;

    chart
        .configure_mesh()
        .x_desc("Chain Length")
        .y_desc("Number of Buckets")
        .axis_desc_style((FONT_FAMILY, TEXT_SIZE))
        .draw()?;

    for (run, color) in runs.iter().zip(COLORS) {
        let line_style = ShapeStyle::from(&color).stroke_width(LINE_WIDTH);
        chart
            .draw_series(LineSeries::new(run.histogram.iter().copied().enumerate(), line_style))?
            .label(run.name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series(
            run.histogram
                .iter()
                .copied()
                .enumerate()
                .map(|point| Circle::new(point, MARKER_SIZE, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    Ok(())
}

fn plot_capacity_growth(path: &Path, run: &HasherRun) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_entries = run.growth.iter().map(|&(entries, _)| entries).max().unwrap_or(1);
    let max_capacity = run.growth.iter().map(|&(_, capacity)| capacity).max().unwrap_or(1);

    let mut chart = ChartBuilder::on(&root)
        .caption("Bucket Array Growth", (FONT_FAMILY, TITLE_SIZE))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0..(max_entries + 1), 0..(max_capacity + max_capacity / 10 + 1))?;

    chart
        .configure_mesh()
        .x_desc("Entries")
        .y_desc("Buckets")
        .axis_desc_style((FONT_FAMILY, TEXT_SIZE))
        .draw()?;

    let [capacity_color, load_color] = COLORS;
    let capacity_style = ShapeStyle::from(&capacity_color).stroke_width(LINE_WIDTH);
    chart
        .draw_series(LineSeries::new(run.growth.iter().copied(), capacity_style))?
        .label("Capacity")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], capacity_style));

    // Fewest buckets that keep the load factor at or below 0.75
    let load_style = ShapeStyle::from(&load_color.mix(0.5)).stroke_width(1);
    chart
        .draw_series(LineSeries::new(
            (0..=max_entries).step_by(max_entries / 100 + 1).map(|n| (n, (n * 4).div_ceil(3))),
            load_style,
        ))?
        .label("0.75 Load Factor")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], load_style));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = ReportConfig::from_args(env::args().skip(1))
        .inspect_err(|error| eprintln!("error: {error}\n{USAGE}"))?;
    info!("inserting {} keys (seed {}) into {} buckets", config.keys, config.seed, config.capacity);

    let keys = random_keys(config.keys, config.seed);
    let djb2_run = run("DJB2", &keys, config.capacity, BuildDjb2::default())?;
    let additive_run = run("Additive", &keys, config.capacity, BuildAdditive::default())?;

    fs::create_dir_all(&config.out)?;
    plot_capacity_growth(&config.out.join("capacity_growth.png"), &djb2_run)?;
    let runs = [djb2_run, additive_run];
    plot_chain_lengths(&config.out.join("chain_lengths.png"), &runs)?;

    println!(
        "{:<10} | {:>8} | {:>8} | {:>8} | {:>12} | {:>10}",
        "Hasher", "Buckets", "Empty", "Longest", "Mean chain", "Duplicates"
    );
    for run in &runs {
        println!(
            "{:<10} | {:>8} | {:>8} | {:>8} | {:>12.2} | {:>10}",
            run.name,
            run.stats.buckets,
            run.stats.empty,
            run.stats.longest,
            run.stats.mean_occupied,
            run.duplicates
        );
    }

    println!("Sample hashes:");
    for key in keys.iter().take(5) {
        println!("  {key:>8}: djb2 = {:>12}, additive = {:>6}", djb2(key), additive(key));
    }

    println!(
        "Generated plot images: {}, {}",
        config.out.join("capacity_growth.png").display(),
        config.out.join("chain_lengths.png").display()
    );

    Ok(())
}
