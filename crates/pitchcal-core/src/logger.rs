//! Stderr logging for the `pitchcal` tools.
//!
//! Records from the `pitchcal*` crates are shown down to the chosen level;
//! dependencies only ever get through at `warn` and above. Lines carry the
//! time since start and the module inside the workspace, e.g.
//! `[  0.012s DEBUG core::homography] solve: 4 pairs`.
//!
//! With the `tracing` feature, [`init_tracing`] builds the same split as an
//! `EnvFilter` directive unless `RUST_LOG` overrides it.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

const WORKSPACE_PREFIX: &str = "pitchcal";

/// Level applied to targets outside the workspace.
const DEPENDENCY_LEVEL: LevelFilter = LevelFilter::Warn;

struct PitchcalLogger {
    level: LevelFilter,
    started: Instant,
}

impl PitchcalLogger {
    fn threshold(&self, target: &str) -> LevelFilter {
        if target.starts_with(WORKSPACE_PREFIX) {
            self.level
        } else {
            self.level.min(DEPENDENCY_LEVEL)
        }
    }
}

impl Log for PitchcalLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.threshold(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{:7.3}s {:>5} {}] {}",
            elapsed,
            record.level(),
            short_target(record.target()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// `pitchcal_core::homography` -> `core::homography`; the facade and foreign
/// targets are printed unchanged.
fn short_target(target: &str) -> &str {
    target
        .strip_prefix("pitchcal_")
        .filter(|rest| !rest.is_empty())
        .unwrap_or(target)
}

static LOGGER: OnceLock<PitchcalLogger> = OnceLock::new();

/// Install the stderr logger. `level` applies to the `pitchcal*` crates.
///
/// Only the first call installs anything; later calls return `Ok(())`.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| PitchcalLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Map a `-v` count to a level: 0 = warn, 1 = info, 2 = debug, 3+ = trace.
pub fn level_from_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Default `EnvFilter` directive for a workspace level, e.g.
/// `warn,pitchcal=debug,pitchcal_core=debug,...`.
pub fn filter_directive(level: LevelFilter) -> String {
    let name = |l: LevelFilter| l.as_str().to_ascii_lowercase();
    let mut directive = name(level.min(DEPENDENCY_LEVEL));
    let level = name(level);
    for krate in [
        "pitchcal",
        "pitchcal_core",
        "pitchcal_annotate",
        "pitchcal_tactics",
    ] {
        directive.push_str(&format!(",{krate}={level}"));
    }
    directive
}

/// Install a `tracing-subscriber` formatter. `RUST_LOG` wins over `level`.
#[cfg(feature = "tracing")]
pub fn init_tracing(level: LevelFilter, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));
    if json {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .json()
            .flatten_event(true)
            .finish()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_timer(fmt::time::Uptime::default())
            .with_writer(std::io::stderr)
            .finish()
            .try_init();
    }
}
