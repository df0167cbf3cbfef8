use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Length of the reference pitch along x, in meters.
pub const PITCH_LENGTH_M: f64 = 105.0;
/// Width of the reference pitch along y, in meters.
pub const PITCH_WIDTH_M: f64 = 68.0;

/// 2D coordinate.
///
/// Whether a point is in media pixels or pitch meters depends on where it
/// came from; the two are only converted through a [`crate::Homography`].
pub type Point = Point2<f64>;

/// One calibration sample: a pixel position and the pitch position it shows.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrespondencePair {
    /// Media pixel coordinates.
    pub src: Point,
    /// Pitch coordinates in meters.
    pub dst: Point,
}

impl CorrespondencePair {
    pub fn new(src: Point, dst: Point) -> Self {
        Self { src, dst }
    }
}

/// Axis-aligned pixel box `[x1, y1] .. [x2, y2]` as produced by a detector.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Bottom-centre of the box, where a standing player touches the ground.
    pub fn foot_point(&self) -> Point {
        Point::new((self.x1 + self.x2) * 0.5, self.y1.max(self.y2))
    }
}
