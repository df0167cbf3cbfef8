//! Pixel-to-pitch calibration built from operator-clicked correspondences.

use crate::homography::{solve_pairs, Homography, MIN_CORRESPONDENCES};
use crate::{BoundingBox, CorrespondencePair, Point};
use serde::{Deserialize, Serialize};

/// Where a calibration stands, derived from its pairs and solve outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationState {
    /// No pairs yet.
    Empty,
    /// One to three pairs: not enough to solve.
    Partial,
    /// Four or more pairs and a valid homography.
    Solved,
    /// Four or more pairs but the configuration cannot be solved.
    Degenerate,
}

/// Ordered correspondence pairs plus the homography derived from them.
///
/// The matrix is recomputed from scratch whenever the pairs change, so
/// `matrix.is_some()` holds exactly when there are at least four pairs and
/// the solve succeeded.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Calibration {
    pairs: Vec<CorrespondencePair>,
    matrix: Option<Homography>,
}

impl Calibration {
    /// Build a calibration, solving immediately.
    pub fn from_pairs(pairs: Vec<CorrespondencePair>) -> Self {
        let matrix = solve_pairs(&pairs);
        Self { pairs, matrix }
    }

    /// Pairs in click order.
    #[inline]
    pub fn pairs(&self) -> &[CorrespondencePair] {
        &self.pairs
    }

    /// Solved pixel -> pitch homography, if any.
    #[inline]
    pub fn matrix(&self) -> Option<&Homography> {
        self.matrix.as_ref()
    }

    pub fn state(&self) -> CalibrationState {
        match (self.pairs.len(), self.matrix.is_some()) {
            (0, _) => CalibrationState::Empty,
            (n, _) if n < MIN_CORRESPONDENCES => CalibrationState::Partial,
            (_, true) => CalibrationState::Solved,
            (_, false) => CalibrationState::Degenerate,
        }
    }

    /// Map a media pixel to pitch meters.
    pub fn pixel_to_pitch(&self, pixel: Point) -> Option<Point> {
        self.matrix.as_ref()?.try_apply(pixel)
    }

    /// Map pitch meters back to a media pixel.
    pub fn pitch_to_pixel(&self, pitch: Point) -> Option<Point> {
        self.matrix.as_ref()?.inverse()?.try_apply(pitch)
    }

    /// Pitch position of a detected player from its pixel bounding box.
    pub fn bbox_to_pitch(&self, bbox: &BoundingBox) -> Option<Point> {
        self.pixel_to_pitch(bbox.foot_point())
    }

    fn resolve(&mut self) {
        self.matrix = solve_pairs(&self.pairs);
    }

    /// Append a pair and re-solve.
    pub fn push(&mut self, pair: CorrespondencePair) {
        self.pairs.push(pair);
        self.resolve();
    }

    /// Drop the most recent pair and re-solve. Returns the removed pair.
    pub fn pop(&mut self) -> Option<CorrespondencePair> {
        let removed = self.pairs.pop();
        self.resolve();
        removed
    }

    /// Replace every pair and re-solve.
    pub fn set_pairs(&mut self, pairs: Vec<CorrespondencePair>) {
        self.pairs = pairs;
        self.resolve();
    }

    /// Remove every pair.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Serialized form only carries the pairs; the matrix is re-solved on load.
#[derive(Deserialize)]
struct CalibrationRepr {
    pairs: Vec<CorrespondencePair>,
}

impl<'de> Deserialize<'de> for Calibration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let repr = CalibrationRepr::deserialize(deserializer)?;
        Ok(Self::from_pairs(repr.pairs))
    }
}
