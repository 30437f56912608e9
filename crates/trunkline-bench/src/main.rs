//! trunkline-bench: CLI tool for scenario experimentation and diagnostics.
//!
//! Runs network synthesis on a scenario file with configurable
//! parameters, printing per-stage diagnostics. Useful for:
//!
//! - Tuning the corridor decay factor
//! - Comparing cost surfaces (uniform, per-cell JSON, raster-derived)
//! - Measuring per-stage durations on realistic grids
//! - Producing the persisted table artifacts and an SVG preview
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin trunkline-bench -- [OPTIONS] <SCENARIO>
//! ```
//!
//! The scenario is a JSON file:
//!
//! ```json
//! {
//!   "width": 40, "height": 30,
//!   "uniform_cost": 1.0,
//!   "diagonal_factor": 1.4142135623730951,
//!   "sources": [{ "cell": 1, "label": "plant-a" }],
//!   "sinks": [{ "cell": 1200, "label": "basin-1" }]
//! }
//! ```
//!
//! Exactly one of `uniform_cost`, `cell_costs`, or `raster` supplies
//! the per-cell costs. A raster is a grayscale image (the classic cost
//! surface shape); its dimensions replace `width`/`height` and each
//! pixel maps to `1 + luma / 255 * raster_scale`.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};

use trunkline_export::{
    SvgMetadata, candidate_edge_records, candidate_network_table, delaunay_pair_records,
    delaunay_pair_table, to_svg,
};
use trunkline_synthesis::{
    Cell, CostSurface, Grid, SynthesisConfig, SynthesisOutcome, Terminal, Terminals, synthesize,
};

/// Scenario experimentation and diagnostics for trunkline.
///
/// Runs network synthesis on a scenario file and prints detailed
/// per-stage timing and count diagnostics.
#[derive(Parser)]
#[command(name = "trunkline-bench", version)]
struct Cli {
    /// Path to the scenario JSON file.
    scenario: PathBuf,

    /// Corridor decay factor applied to used path edges.
    #[arg(long, default_value_t = SynthesisConfig::DEFAULT_CORRIDOR_DECAY)]
    corridor_decay: f64,

    /// Number of runs for averaging durations.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Output diagnostics as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,

    /// Write the candidate network table to this file.
    #[arg(long)]
    network: Option<PathBuf>,

    /// Write the Delaunay pair table to this file.
    #[arg(long)]
    delaunay: Option<PathBuf>,

    /// Write an SVG rendering of the network to this file.
    #[arg(long)]
    svg: Option<PathBuf>,
}

/// One terminal in the scenario file.
#[derive(Serialize, Deserialize)]
struct ScenarioTerminal {
    cell: u32,
    label: String,
}

/// The scenario file contents.
#[derive(Serialize, Deserialize)]
struct Scenario {
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,

    /// One cost per cell, row-major.
    #[serde(default)]
    cell_costs: Option<Vec<f64>>,

    /// One cost for every cell.
    #[serde(default)]
    uniform_cost: Option<f64>,

    /// Grayscale raster whose pixels supply the per-cell costs.
    #[serde(default)]
    raster: Option<PathBuf>,

    /// Multiplier for diagonal steps.
    #[serde(default = "default_diagonal_factor")]
    diagonal_factor: f64,

    /// Scale for raster-derived costs: `1 + luma / 255 * raster_scale`.
    #[serde(default = "default_raster_scale")]
    raster_scale: f64,

    sources: Vec<ScenarioTerminal>,
    sinks: Vec<ScenarioTerminal>,
}

fn default_diagonal_factor() -> f64 {
    std::f64::consts::SQRT_2
}

fn default_raster_scale() -> f64 {
    9.0
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let raw = fs::read_to_string(&cli.scenario)
        .map_err(|e| format!("reading {}: {e}", cli.scenario.display()))?;
    let scenario: Scenario =
        serde_json::from_str(&raw).map_err(|e| format!("parsing scenario: {e}"))?;

    let (surface, terminals) = build_inputs(&scenario)?;
    let config = SynthesisConfig {
        corridor_decay: cli.corridor_decay,
    };

    let mut durations: Vec<Duration> = Vec::with_capacity(cli.runs);
    let mut last: Option<SynthesisOutcome> = None;
    for _ in 0..cli.runs {
        let outcome = synthesize(&surface, &terminals, &config).map_err(|e| e.to_string())?;
        durations.push(outcome.diagnostics.total_duration);
        last = Some(outcome);
    }
    let Some(outcome) = last else {
        return Err("no runs executed".to_owned());
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&outcome.diagnostics)
            .map_err(|e| format!("serializing diagnostics: {e}"))?;
        println!("{json}");
    } else {
        println!("{}", outcome.diagnostics.report());
        if cli.runs > 1 {
            let mean_ms = durations.iter().map(Duration::as_secs_f64).sum::<f64>()
                / durations.len() as f64
                * 1000.0;
            println!();
            println!("Mean total over {} runs: {mean_ms:.3}ms", cli.runs);
        }
    }

    if let Some(path) = &cli.network {
        let records = candidate_edge_records(&outcome.network);
        fs::write(path, candidate_network_table(&records))
            .map_err(|e| format!("writing {}: {e}", path.display()))?;
    }
    if let Some(path) = &cli.delaunay {
        let records = delaunay_pair_records(&outcome.delaunay_pairs, &terminals)
            .map_err(|e| e.to_string())?;
        fs::write(path, delaunay_pair_table(&records))
            .map_err(|e| format!("writing {}: {e}", path.display()))?;
    }
    if let Some(path) = &cli.svg {
        let title = cli
            .scenario
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned());
        let description = format!("corridor_decay={}", cli.corridor_decay);
        let metadata = SvgMetadata {
            title: title.as_deref(),
            description: Some(&description),
        };
        let svg = to_svg(&outcome.network, surface.grid(), &terminals, &metadata);
        fs::write(path, svg).map_err(|e| format!("writing {}: {e}", path.display()))?;
    }

    Ok(())
}

/// Turn a scenario file into the synthesis inputs.
fn build_inputs(scenario: &Scenario) -> Result<(CostSurface, Terminals), String> {
    let supplied = usize::from(scenario.cell_costs.is_some())
        + usize::from(scenario.uniform_cost.is_some())
        + usize::from(scenario.raster.is_some());
    if supplied != 1 {
        return Err(
            "scenario must supply exactly one of cell_costs, uniform_cost, or raster".to_owned(),
        );
    }

    let (grid, cell_costs): (Grid, Vec<f64>) = if let Some(path) = &scenario.raster {
        let image = image::open(path)
            .map_err(|e| format!("reading raster {}: {e}", path.display()))?
            .to_luma8();
        let grid = Grid::new(image.width(), image.height());
        let costs = image
            .pixels()
            .map(|p| 1.0 + f64::from(p.0[0]) / 255.0 * scenario.raster_scale)
            .collect();
        (grid, costs)
    } else {
        let grid = Grid::new(scenario.width, scenario.height);
        let count = usize::try_from(grid.cell_count()).map_err(|_| "grid too large".to_owned())?;
        if count == 0 {
            return Err("scenario grid is empty".to_owned());
        }
        let costs = scenario.cell_costs.clone().map_or_else(
            || vec![scenario.uniform_cost.unwrap_or(1.0); count],
            |c| c,
        );
        (grid, costs)
    };

    let surface = CostSurface::from_cell_costs(grid, &cell_costs, scenario.diagonal_factor)
        .map_err(|e| e.to_string())?;

    let to_terminal = |t: &ScenarioTerminal| {
        Cell::new(t.cell)
            .map(|cell| Terminal::new(cell, t.label.clone()))
            .ok_or_else(|| format!("terminal {:?} uses cell index 0", t.label))
    };
    let sources = scenario
        .sources
        .iter()
        .map(to_terminal)
        .collect::<Result<Vec<_>, _>>()?;
    let sinks = scenario
        .sinks
        .iter()
        .map(to_terminal)
        .collect::<Result<Vec<_>, _>>()?;

    Ok((surface, Terminals::new(sources, sinks)))
}
