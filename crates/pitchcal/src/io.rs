//! JSON configuration and report helpers for offline calibration runs.

use pitchcal_core::{Calibration, CalibrationState, CorrespondencePair, Homography, Point};
use pitchcal_tactics::{corridor_of, zone_of, Corridor, PassScoringParams, PlayerPosition};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum PitchcalIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Read and deserialize a JSON file.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, PitchcalIoError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Serialize `value` as pretty JSON into `path`.
pub fn write_json<T: Serialize + ?Sized>(
    value: &T,
    path: impl AsRef<Path>,
) -> Result<(), PitchcalIoError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Clicked correspondences plus pixels to map once calibrated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    pub pairs: Vec<CorrespondencePair>,
    #[serde(default)]
    pub probe_points: Vec<Point>,
    #[serde(default)]
    pub output_path: Option<String>,
}

impl CalibrationConfig {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, PitchcalIoError> {
        load_json(path)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), PitchcalIoError> {
        write_json(self, path)
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("calibration_report.json"))
    }
}

/// A probe pixel and where it lands on the pitch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub pixel: Point,
    pub pitch: Option<Point>,
    pub zone: Option<u8>,
    pub corridor: Option<Corridor>,
}

/// Outcome of solving a [`CalibrationConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub pair_count: usize,
    pub state: CalibrationState,
    pub matrix: Option<Homography>,
    /// Row-major matrix as nine comma-separated values.
    pub matrix_csv: Option<String>,
    /// Root mean square pixel-to-pitch error over the pairs, in meters.
    pub rms_error_m: Option<f64>,
    pub probes: Vec<ProbeResult>,
}

impl CalibrationReport {
    pub fn from_config(config: &CalibrationConfig) -> Self {
        let calibration = Calibration::from_pairs(config.pairs.clone());
        let matrix = calibration.matrix().copied();

        let probes = config
            .probe_points
            .iter()
            .map(|&pixel| {
                let pitch = calibration.pixel_to_pitch(pixel);
                ProbeResult {
                    pixel,
                    pitch,
                    zone: pitch.map(|p| zone_of(p.x, p.y)),
                    corridor: pitch.map(|p| corridor_of(p.y)),
                }
            })
            .collect();

        Self {
            pair_count: calibration.pairs().len(),
            state: calibration.state(),
            matrix_csv: matrix.as_ref().map(Homography::to_csv),
            rms_error_m: matrix
                .as_ref()
                .and_then(|h| h.rms_reprojection_error(calibration.pairs())),
            matrix,
            probes,
        }
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), PitchcalIoError> {
        write_json(self, path)
    }
}

/// Players plus optional scoring weights for pass-target ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    pub players: Vec<PlayerPosition>,
    #[serde(default)]
    pub scoring: PassScoringParams,
}

impl RosterConfig {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, PitchcalIoError> {
        load_json(path)
    }
}
