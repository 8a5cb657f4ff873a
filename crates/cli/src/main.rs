use std::path::PathBuf;
use std::process;

use clap::Parser;

use regionwatch_core::detection::infrastructure::jsonl_detection_source::JsonlDetectionSource;
use regionwatch_core::occupancy::domain::occupancy_engine::OccupancyEngine;
use regionwatch_core::occupancy::domain::occupancy_updater::UnassignedPolicy;
use regionwatch_core::occupancy::infrastructure::json_region_config::load_regions;
use regionwatch_core::pipeline::count_regions_use_case::CountRegionsUseCase;
use regionwatch_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use regionwatch_core::reporting::domain::count_writer::CountWriter;
use regionwatch_core::reporting::infrastructure::jsonl_count_writer::JsonlCountWriter;
use regionwatch_core::shared::constants::DEFAULT_PROGRESS_EVERY;

/// Count tracked objects entering and leaving polygon regions.
#[derive(Parser)]
#[command(name = "regionwatch")]
struct Cli {
    /// Region configuration (JSON object: name -> polygon).
    regions: PathBuf,

    /// Tracker output, one JSON frame per line.
    detections: PathBuf,

    /// Write per-frame counts here as JSON Lines.
    output: Option<PathBuf>,

    /// Leave detections without a track ID out of occupancy instead of
    /// counting them under the unassigned ID (-1).
    #[arg(long)]
    ignore_unassigned: bool,

    /// Log progress every N frames.
    #[arg(long, default_value_t = DEFAULT_PROGRESS_EVERY)]
    progress_every: usize,

    /// Stop after this many frames.
    #[arg(long)]
    max_frames: Option<usize>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let regions = load_regions(&cli.regions)?;
    let policy = if cli.ignore_unassigned {
        UnassignedPolicy::Ignore
    } else {
        UnassignedPolicy::Count
    };
    let engine = OccupancyEngine::new(regions, policy)?;
    let source = JsonlDetectionSource::open(&cli.detections)?;
    let writer: Option<Box<dyn CountWriter>> = match &cli.output {
        Some(path) => Some(Box::new(JsonlCountWriter::create(path)?)),
        None => None,
    };

    let mut use_case = CountRegionsUseCase::new(
        Box::new(source),
        engine,
        writer,
        Box::new(StdoutPipelineLogger::new(cli.progress_every)),
        cli.max_frames,
        None,
    );
    let summary = use_case.execute()?;

    log::info!(
        "Processed {} frames ({} skipped)",
        summary.frames,
        summary.skipped
    );
    let final_counts = summary
        .last
        .unwrap_or_else(|| use_case.engine().counts(0));
    for region in &final_counts.regions {
        println!("{}", region.label());
    }
    if let Some(path) = &cli.output {
        log::info!("Counts written to {}", path.display());
    }
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.regions.exists() {
        return Err(format!("Region config not found: {}", cli.regions.display()).into());
    }
    if !cli.detections.exists() {
        return Err(format!("Detections file not found: {}", cli.detections.display()).into());
    }
    if cli.progress_every == 0 {
        return Err("--progress-every must be at least 1".into());
    }
    if cli.max_frames == Some(0) {
        return Err("--max-frames must be at least 1".into());
    }
    Ok(())
}
