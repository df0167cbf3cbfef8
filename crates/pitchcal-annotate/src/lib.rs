//! Time-indexed annotations over a match video.
//!
//! An [`AnnotationStore`] owns:
//! - the list of drawn overlays, each visible over an inclusive playback
//!   interval and carrying exactly one [`Shape`] variant,
//! - the active pitch [`Calibration`](pitchcal_core::Calibration), re-solved
//!   on every correspondence-pair change.
//!
//! Variant changes are impossible through [`AnnotationStore::edit`] and
//! rejected by [`AnnotationStore::update`]. The list round-trips through
//! JSON with [`AnnotationStore::export_all`] / [`AnnotationStore::import_all`].

mod annotation;
mod error;
mod io;
mod shape;
mod store;

pub use annotation::{Annotation, AnnotationId, AnnotationPatch, NewAnnotation, Style};
pub use error::{AnnotationError, AnnotationIoError};
pub use io::{AnnotationDocument, FORMAT_VERSION};
pub use shape::{
    Arrow, Circle, Marker, PlayerTrack, Rectangle, Ruler, Shape, ShapeKind, ShapeVariant,
    Spotlight, Text, Zone,
};
pub use store::AnnotationStore;
