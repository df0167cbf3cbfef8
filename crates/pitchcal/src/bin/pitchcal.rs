use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use log::{info, warn};
use pitchcal::annotate::{AnnotationIoError, AnnotationStore};
use pitchcal::core::{level_from_verbosity, CalibrationState};
use pitchcal::io::{CalibrationConfig, CalibrationReport, PitchcalIoError, RosterConfig};
use pitchcal::tactics::{corridor_of, predict_pass_targets_with, zone_of, XThreatGrid};

#[derive(Parser, Debug)]
#[command(name = "pitchcal", version)]
#[command(about = "Pitch calibration, annotation and tactics utilities")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve a calibration config and write a JSON report.
    Solve {
        config: PathBuf,
        /// Overrides `output_path` from the config.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the zone, corridor and expected threat of a pitch point.
    Zone {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },
    /// Print ranked pass targets for a ball holder as JSON.
    Pass {
        roster: PathBuf,
        #[arg(long)]
        holder: String,
    },
    /// Print annotations visible at a playback time as JSON.
    Active {
        annotations: PathBuf,
        #[arg(short, long, allow_negative_numbers = true)]
        time: f64,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Io(#[from] PitchcalIoError),
    #[error(transparent)]
    Annotations(#[from] AnnotationIoError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("player {0:?} is not in the roster")]
    UnknownHolder(String),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = level_from_verbosity(verbosity);
    #[cfg(feature = "tracing")]
    {
        let _ = tracing_log::LogTracer::init_with_filter(level);
        pitchcal::core::init_tracing(level, false);
    }
    #[cfg(not(feature = "tracing"))]
    {
        let _ = pitchcal::core::init_with_level(level);
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Solve { config, output } => solve(config, output),
        Command::Zone { x, y } => {
            let xt = XThreatGrid::default();
            println!(
                "zone {} corridor {} xt {:.3}",
                zone_of(x, y),
                corridor_of(y),
                xt.value_at(x, y)
            );
            Ok(())
        }
        Command::Pass { roster, holder } => pass(roster, &holder),
        Command::Active { annotations, time } => active(annotations, time),
    }
}

fn solve(config: PathBuf, output: Option<PathBuf>) -> Result<(), CliError> {
    let cfg = CalibrationConfig::load_json(&config)?;
    let report = CalibrationReport::from_config(&cfg);
    match report.state {
        CalibrationState::Solved => info!(
            "solved from {} pairs, rms {:.4} m",
            report.pair_count,
            report.rms_error_m.unwrap_or(f64::NAN)
        ),
        state => warn!("no homography from {} pairs: {state:?}", report.pair_count),
    }

    let path = output.unwrap_or_else(|| cfg.output_path());
    report.write_json(&path)?;
    println!("wrote calibration report to {}", path.display());
    Ok(())
}

fn pass(roster: PathBuf, holder_id: &str) -> Result<(), CliError> {
    let roster = RosterConfig::load_json(&roster)?;
    let holder = roster
        .players
        .iter()
        .find(|p| p.id == holder_id)
        .ok_or_else(|| CliError::UnknownHolder(holder_id.to_string()))?;

    let ranked = predict_pass_targets_with(holder, &roster.players, &roster.scoring);
    println!("{}", serde_json::to_string_pretty(&ranked)?);
    Ok(())
}

fn active(annotations: PathBuf, time: f64) -> Result<(), CliError> {
    let mut store = AnnotationStore::new();
    let count = store.load_json(&annotations)?;
    let visible = store.active_at(time);
    info!("{} of {count} annotations active at {time}s", visible.len());
    println!("{}", serde_json::to_string_pretty(&visible)?);
    Ok(())
}
