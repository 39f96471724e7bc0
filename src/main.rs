use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use ndarray::Array2;
use serde::Serialize;

use regiongrow_rust::io::{load_config, load_grayscale, save_grayscale, write_json_file, ToolConfig};
use regiongrow_rust::{Coord, GridAccessor, GrowOptions, RegionBounds, RegionGrower};

/// Bucket-fill a grayscale image from a seed pixel.
///
/// Values missing from both the flags and the config file are asked for
/// interactively.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input image (any format the image crate decodes; converted to grayscale)
    input: Option<PathBuf>,

    /// JSON tool configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed pixel as (row,col), row,col or "row col"
    #[arg(short, long)]
    seed: Option<String>,

    /// Max intensity difference between neighboring pixels (0-255)
    #[arg(short, long)]
    tolerance: Option<i64>,

    /// Intensity written into region pixels
    #[arg(long)]
    fill: Option<u8>,

    /// Overlay image path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Membership grid image path
    #[arg(long)]
    region_map: Option<PathBuf>,

    /// JSON summary path
    #[arg(long)]
    summary: Option<PathBuf>,
}

#[derive(Serialize)]
struct RegionSummary {
    input: PathBuf,
    rows: usize,
    cols: usize,
    seed: Coord,
    tolerance: i64,
    fill_value: u8,
    pixel_count: usize,
    bounds: Option<RegionBounds>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ToolConfig::default(),
    };
    if let Some(path) = args.summary.clone() {
        config.output.summary = Some(path);
    }
    if let Some(path) = args.output.clone() {
        config.output.overlay = path;
    }
    if let Some(path) = args.region_map.clone() {
        config.output.region_map = path;
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let (input, image) = match args.input.clone().or(config.input.clone()) {
        Some(path) => {
            let image = load_grayscale(&path)?;
            (path, image)
        }
        None => prompt(&mut lines, "enter image file name: ", |text| {
            let path = PathBuf::from(text);
            load_grayscale(&path)
                .map(|image| (path, image))
                .map_err(|e| format!("Err: {e:#}"))
        })?,
    };
    let (rows, cols) = image.dim();
    info!("loaded {} ({}x{})", input.display(), rows, cols);

    let grid = GridAccessor::new(image.view());
    let seed = resolve_seed(&args, &config, &grid, &mut lines)?;

    let mut options = config.grow.unwrap_or_default();
    if let Some(fill) = args.fill {
        options.fill_value = fill;
    }
    options.tolerance = resolve_tolerance(&args, &config, options, &mut lines)?;

    let mut overlay: Array2<u8> = image.clone();
    let membership = RegionGrower::new(grid).grow_with(seed, &options, Some(&mut overlay))?;

    save_grayscale(overlay.view(), &config.output.overlay)?;
    save_grayscale(membership.as_array(), &config.output.region_map)?;

    let summary = RegionSummary {
        input,
        rows,
        cols,
        seed,
        tolerance: options.tolerance,
        fill_value: options.fill_value,
        pixel_count: membership.pixel_count(),
        bounds: membership.bounds(),
    };
    if let Some(path) = &config.output.summary {
        write_json_file(path, &summary)?;
    }

    info!(
        "region of {} pixels from seed {} written to {} and {}",
        summary.pixel_count,
        seed,
        config.output.overlay.display(),
        config.output.region_map.display()
    );
    Ok(())
}

fn resolve_seed<L>(
    args: &Args,
    config: &ToolConfig,
    grid: &GridAccessor<'_, u8>,
    lines: &mut L,
) -> Result<Coord>
where
    L: Iterator<Item = io::Result<String>>,
{
    let check = |text: &str| -> std::result::Result<Coord, String> {
        let seed: Coord = text
            .parse()
            .map_err(|e| format!("Err: {e}"))?;
        if !grid.in_bounds(seed) {
            return Err(format!(
                "Err: your selected pixel is outside of the image, use a row between 0-{} and a col between 0-{}",
                grid.rows().saturating_sub(1),
                grid.cols().saturating_sub(1)
            ));
        }
        Ok(seed)
    };

    match args.seed.as_deref().or(config.seed.as_deref()) {
        Some(text) => check(text).map_err(anyhow::Error::msg),
        None => {
            let message = format!(
                "enter starting pixel in the form (row,col) or row,col (image size is {}, {}): ",
                grid.rows(),
                grid.cols()
            );
            prompt(lines, &message, check)
        }
    }
}

fn resolve_tolerance<L>(
    args: &Args,
    config: &ToolConfig,
    options: GrowOptions,
    lines: &mut L,
) -> Result<i64>
where
    L: Iterator<Item = io::Result<String>>,
{
    let check = |tolerance: i64| -> std::result::Result<i64, String> {
        GrowOptions {
            tolerance,
            ..options
        }
        .validate::<u8>()
        .map(|()| tolerance)
        .map_err(|e| format!("Err: {e}"))
    };

    match args.tolerance.or(config.grow.map(|g| g.tolerance)) {
        Some(tolerance) => check(tolerance).map_err(anyhow::Error::msg),
        None => prompt(
            lines,
            "enter tolerance for bucket fill (50 is normally a good value): ",
            |text| {
                let tolerance = text
                    .parse::<i64>()
                    .map_err(|_| format!("Err: {text:?} is not a whole number"))?;
                check(tolerance)
            },
        ),
    }
}

/// Ask until `parse` accepts a line; fails on end of input.
fn prompt<T, L, F>(lines: &mut L, message: &str, mut parse: F) -> Result<T>
where
    L: Iterator<Item = io::Result<String>>,
    F: FnMut(&str) -> std::result::Result<T, String>,
{
    loop {
        print!("{message}");
        io::stdout().flush().context("failed to flush stdout")?;

        let Some(line) = lines.next() else {
            bail!("input closed before a valid value was entered");
        };
        let line = line.context("failed to read stdin")?;

        match parse(line.trim()) {
            Ok(value) => return Ok(value),
            Err(message) => {
                warn!("rejected input {:?}", line.trim());
                println!("{message}");
            }
        }
    }
}
