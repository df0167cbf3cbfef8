use crate::shape::{finite_point, Shape, ShapeKind};
use pitchcal_core::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique annotation identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(pub u64);

impl AnnotationId {
    pub(crate) fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Make sure ids generated from now on are greater than `seen`.
    pub(crate) fn reserve_past(seen: AnnotationId) {
        NEXT_ID.fetch_max(seen.0.saturating_add(1), Ordering::Relaxed);
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Presentation hints, opaque to the core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub color: String,
    pub stroke_width: f64,
    pub opacity: f64,
    pub dashed: bool,
}

impl Style {
    pub fn is_finite(&self) -> bool {
        self.stroke_width.is_finite() && self.opacity.is_finite()
    }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: "#ffeb3b".to_string(),
            stroke_width: 3.0,
            opacity: 1.0,
            dashed: false,
        }
    }
}

/// A drawn overlay anchored to a playback interval.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    /// Seconds from the start of the video, inclusive.
    pub start_time: f64,
    /// Seconds from the start of the video, inclusive.
    pub end_time: f64,
    #[serde(default)]
    pub style: Style,
    /// The shape's key points in pitch meters, when a calibration was active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch_coords: Option<Vec<Point>>,
    pub shape: Shape,
}

impl Annotation {
    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// First part of the record holding a NaN or infinite number, if any.
    pub(crate) fn non_finite_part(&self) -> Option<&'static str> {
        non_finite_part(
            Some(&self.shape),
            Some(&self.style),
            Some(self.pitch_coords.as_deref()),
        )
    }

    /// True if `time` lies in `[start_time, end_time]`.
    #[inline]
    pub fn is_active_at(&self, time: f64) -> bool {
        self.start_time <= time && time <= self.end_time
    }
}

/// An annotation before the store assigns it an id.
#[derive(Clone, Debug, PartialEq)]
pub struct NewAnnotation {
    pub start_time: f64,
    pub end_time: f64,
    pub style: Style,
    pub pitch_coords: Option<Vec<Point>>,
    pub shape: Shape,
}

impl NewAnnotation {
    pub fn new(shape: impl Into<Shape>, start_time: f64, end_time: f64) -> Self {
        Self {
            start_time,
            end_time,
            style: Style::default(),
            pitch_coords: None,
            shape: shape.into(),
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_pitch_coords(mut self, coords: Vec<Point>) -> Self {
        self.pitch_coords = Some(coords);
        self
    }

    pub(crate) fn non_finite_part(&self) -> Option<&'static str> {
        non_finite_part(
            Some(&self.shape),
            Some(&self.style),
            Some(self.pitch_coords.as_deref()),
        )
    }

    pub(crate) fn into_annotation(self, id: AnnotationId) -> Annotation {
        Annotation {
            id,
            start_time: self.start_time,
            end_time: self.end_time,
            style: self.style,
            pitch_coords: self.pitch_coords,
            shape: self.shape,
        }
    }
}

/// Partial update for [`crate::AnnotationStore::update`].
///
/// `None` leaves a field unchanged. `shape` must keep the stored variant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnnotationPatch {
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub style: Option<Style>,
    /// `Some(None)` clears the pitch coordinates.
    pub pitch_coords: Option<Option<Vec<Point>>>,
    pub shape: Option<Shape>,
}

impl AnnotationPatch {
    /// Checks only the fields the patch replaces.
    pub(crate) fn non_finite_part(&self) -> Option<&'static str> {
        non_finite_part(
            self.shape.as_ref(),
            self.style.as_ref(),
            self.pitch_coords.as_ref().map(Option::as_deref),
        )
    }
}

/// Name of the first given part that holds a NaN or infinite number.
fn non_finite_part(
    shape: Option<&Shape>,
    style: Option<&Style>,
    pitch_coords: Option<Option<&[Point]>>,
) -> Option<&'static str> {
    if shape.is_some_and(|s| !s.is_finite()) {
        Some("shape")
    } else if style.is_some_and(|s| !s.is_finite()) {
        Some("style")
    } else if pitch_coords
        .flatten()
        .is_some_and(|coords| !coords.iter().all(finite_point))
    {
        Some("pitch_coords")
    } else {
        None
    }
}

pub(crate) fn valid_interval(start: f64, end: f64) -> bool {
    start.is_finite() && end.is_finite() && start <= end
}
