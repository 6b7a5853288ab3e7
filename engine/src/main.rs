// Engine command-line entry point
use anyhow::{Context, Result};
use clap::Parser;
use engine::config::EngineSettings;
use engine::presentation::{suggestion_lines, technical_lines};
use engine::services::AnalysisService;
use shared::models::TimeFrame;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Score the latest candle of a daily price series")]
struct Args {
    /// Daily candles, CSV (date,open,high,low,close,volume) or a JSON array
    candles: PathBuf,

    /// The position is already held (add / hold / reduce wording)
    #[arg(long)]
    holding: bool,

    /// Candle interval to analyse: 1d, 1w or 1m
    #[arg(long, default_value = "1d", value_parser = parse_interval)]
    interval: TimeFrame,

    /// JSON settings file overriding indicator parameters and the scoring table
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print report lines instead of JSON
    #[arg(long)]
    text: bool,
}

fn parse_interval(raw: &str) -> Result<TimeFrame, String> {
    TimeFrame::parse(raw).ok_or_else(|| format!("unknown interval '{}', expected 1d, 1w or 1m", raw))
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!(path = %args.candles.display(), holding = args.holding, timeframe = ?args.interval, "Starting analysis");

    let settings = match &args.config {
        Some(path) => EngineSettings::load_from_file(path)
            .with_context(|| format!("Failed to load settings '{}'", path.display()))?,
        None => EngineSettings::default(),
    };
    let service = AnalysisService::new(settings)?;

    let candles = service.load_candles(&args.candles, args.interval)?;
    let analysis = service.analyze(&candles, args.holding);
    info!(
        candles = candles.len(),
        action = ?analysis.suggestion.action,
        score = analysis.suggestion.score,
        "Analysis complete"
    );

    if args.text {
        for line in suggestion_lines(&analysis.suggestion).iter().chain(technical_lines(&analysis.snapshot).iter()) {
            println!("{}", line);
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    }
    Ok(())
}
