//! High-level facade for the `pitchcal-*` workspace.
//!
//! This crate provides:
//! - re-exports of the geometry, annotation and tactics crates,
//! - JSON config/report helpers for offline calibration runs ([`io`]),
//! - the `pitchcal` command-line tool (feature `cli`).
//!
//! ## Quickstart
//!
//! ```
//! use pitchcal::core::{Calibration, CorrespondencePair, Point};
//! use pitchcal::tactics::zone_of;
//!
//! let clicks = [
//!     ((100.0, 100.0), (0.0, 0.0)),
//!     ((900.0, 100.0), (105.0, 0.0)),
//!     ((900.0, 600.0), (105.0, 68.0)),
//!     ((100.0, 600.0), (0.0, 68.0)),
//! ];
//! let pairs = clicks
//!     .iter()
//!     .map(|&((sx, sy), (dx, dy))| {
//!         CorrespondencePair::new(Point::new(sx, sy), Point::new(dx, dy))
//!     })
//!     .collect();
//! let calibration = Calibration::from_pairs(pairs);
//!
//! let on_pitch = calibration.pixel_to_pitch(Point::new(820.0, 150.0)).unwrap();
//! assert_eq!(zone_of(on_pitch.x, on_pitch.y), 1);
//! ```
//!
//! ## API map
//! - `pitchcal::core`: homography solve, calibration state, viewport mapping, logging.
//! - `pitchcal::annotate`: the timed annotation store and its JSON format.
//! - `pitchcal::tactics`: roles, zones, corridors, pass targets, expected threat.

pub use pitchcal_annotate as annotate;
pub use pitchcal_core as core;
pub use pitchcal_tactics as tactics;

pub use pitchcal_annotate::{Annotation, AnnotationStore, NewAnnotation, Shape};
pub use pitchcal_core::{Calibration, CalibrationState, CorrespondencePair, Homography, Point};
pub use pitchcal_tactics::{predict_pass_targets, zone_of, PlayerPosition};

pub mod io;
