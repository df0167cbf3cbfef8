//! Core geometry for pitch calibration.
//!
//! This crate is purely numerical. It knows nothing about annotations,
//! rosters or any UI; it maps between media pixels, screen space and pitch
//! meters.
//!
//! - [`linalg`]: transpose, multiply, Gaussian elimination, 3×3 inverse.
//! - [`homography`]: normalized DLT solve with `h8 = 1` and point transforms.
//! - [`Calibration`]: correspondence pairs plus their solved homography.
//! - [`viewport`]: letterbox/pillarbox-aware screen <-> media mapping.

mod calibration;
pub mod homography;
pub mod linalg;
mod logger;
mod point;
pub mod viewport;

pub use calibration::{Calibration, CalibrationState};
pub use homography::{
    solve, solve_pairs, transform, Homography, HomographyParseError, MIN_CORRESPONDENCES,
};
pub use point::{BoundingBox, CorrespondencePair, Point, PITCH_LENGTH_M, PITCH_WIDTH_M};
pub use viewport::{
    contain_fit, media_to_screen_percent, screen_to_media, FitRect, MediaPoint, MediaSize, Rect,
    ScreenPercent,
};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{filter_directive, init_with_level, level_from_verbosity};
