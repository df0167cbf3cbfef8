//! Owner of timed annotations and the active calibration.
//!
//! The store is a plain value: mutate it from a single thread (or behind a
//! mutex). Queries read the current list directly, so a query issued after a
//! mutation always sees that mutation.

use crate::annotation::{
    valid_interval, Annotation, AnnotationId, AnnotationPatch, NewAnnotation,
};
use crate::error::AnnotationError;
use crate::shape::ShapeVariant;
use log::debug;
use pitchcal_core::{Calibration, CorrespondencePair, Point};

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(Clone, Debug, Default)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
    calibration: Calibration,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an annotation under a freshly generated id.
    ///
    /// Rejects a reversed or non-finite interval and any NaN or infinite
    /// coordinate, size or style number.
    pub fn add(&mut self, annotation: NewAnnotation) -> Result<AnnotationId, AnnotationError> {
        if !valid_interval(annotation.start_time, annotation.end_time) {
            return Err(AnnotationError::InvalidInterval {
                start: annotation.start_time,
                end: annotation.end_time,
            });
        }
        if let Some(part) = annotation.non_finite_part() {
            return Err(AnnotationError::NonFinite(part));
        }
        let id = AnnotationId::next();
        debug!("add {} annotation {id}", annotation.shape.kind());
        self.annotations.push(annotation.into_annotation(id));
        Ok(id)
    }

    /// Like [`AnnotationStore::add`], but fills `pitch_coords` from the
    /// shape's key points when none were given and the calibration maps them.
    pub fn add_anchored(
        &mut self,
        mut annotation: NewAnnotation,
    ) -> Result<AnnotationId, AnnotationError> {
        if annotation.pitch_coords.is_none() {
            annotation.pitch_coords = annotation
                .shape
                .key_points()
                .into_iter()
                .map(|p| self.to_pitch(p))
                .collect::<Option<Vec<_>>>();
        }
        self.add(annotation)
    }

    /// Merge `patch` into annotation `id`.
    ///
    /// Fails with [`AnnotationError::TypeMismatch`] if the patch carries a
    /// shape of another variant; nothing is modified on any error.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self, patch)))]
    pub fn update(
        &mut self,
        id: AnnotationId,
        patch: AnnotationPatch,
    ) -> Result<(), AnnotationError> {
        let idx = self.index_of(id)?;
        let current = &self.annotations[idx];

        if let Some(shape) = &patch.shape {
            if shape.kind() != current.kind() {
                debug!("rejected update of {id}: {} -> {}", current.kind(), shape.kind());
                return Err(AnnotationError::TypeMismatch {
                    id,
                    stored: current.kind(),
                    requested: shape.kind(),
                });
            }
        }

        let start = patch.start_time.unwrap_or(current.start_time);
        let end = patch.end_time.unwrap_or(current.end_time);
        if !valid_interval(start, end) {
            return Err(AnnotationError::InvalidInterval { start, end });
        }
        if let Some(part) = patch.non_finite_part() {
            return Err(AnnotationError::NonFinite(part));
        }

        let target = &mut self.annotations[idx];
        target.start_time = start;
        target.end_time = end;
        if let Some(style) = patch.style {
            target.style = style;
        }
        if let Some(coords) = patch.pitch_coords {
            target.pitch_coords = coords;
        }
        if let Some(shape) = patch.shape {
            target.shape = shape;
        }
        debug!("updated annotation {id}");
        Ok(())
    }

    /// Edit the shape of annotation `id` as its concrete variant `S`.
    ///
    /// The closure only ever sees an `&mut S`, so the variant cannot change.
    /// If the stored shape is not an `S`, nothing runs and `TypeMismatch` is
    /// returned. An edit that leaves a NaN or infinite value is undone.
    pub fn edit<S, F>(&mut self, id: AnnotationId, f: F) -> Result<(), AnnotationError>
    where
        S: ShapeVariant,
        F: FnOnce(&mut S),
    {
        let idx = self.index_of(id)?;
        let annotation = &mut self.annotations[idx];
        let stored = annotation.kind();
        let before = annotation.shape.clone();
        match S::from_shape_mut(&mut annotation.shape) {
            Some(shape) => f(shape),
            None => {
                return Err(AnnotationError::TypeMismatch {
                    id,
                    stored,
                    requested: S::KIND,
                });
            }
        }
        if !annotation.shape.is_finite() {
            debug!("reverted edit of {id}: non-finite shape");
            annotation.shape = before;
            return Err(AnnotationError::NonFinite("shape"));
        }
        Ok(())
    }

    /// Delete annotation `id`, returning it.
    pub fn remove(&mut self, id: AnnotationId) -> Result<Annotation, AnnotationError> {
        let idx = self.index_of(id)?;
        debug!("remove annotation {id}");
        Ok(self.annotations.remove(idx))
    }

    /// Delete every annotation. The calibration is kept.
    pub fn clear(&mut self) {
        self.annotations.clear();
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    /// Annotations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Annotations whose inclusive interval contains `time`, in insertion order.
    pub fn active_at(&self, time: f64) -> Vec<&Annotation> {
        self.annotations
            .iter()
            .filter(|a| a.is_active_at(time))
            .collect()
    }

    /// Replace the whole annotation list. Callers validate first.
    pub(crate) fn replace_annotations(&mut self, annotations: Vec<Annotation>) {
        if let Some(max) = annotations.iter().map(|a| a.id).max() {
            AnnotationId::reserve_past(max);
        }
        self.annotations = annotations;
    }

    fn index_of(&self, id: AnnotationId) -> Result<usize, AnnotationError> {
        self.annotations
            .iter()
            .position(|a| a.id == id)
            .ok_or(AnnotationError::NotFound(id))
    }

    // --- calibration ---------------------------------------------------

    /// Current calibration (pairs plus matrix, if solvable).
    #[inline]
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Append a correspondence pair, re-solve, and return the new calibration.
    pub fn add_correspondence_pair(&mut self, pair: CorrespondencePair) -> &Calibration {
        self.calibration.push(pair);
        self.log_calibration();
        &self.calibration
    }

    /// Drop the most recent pair, re-solve, and return the new calibration.
    pub fn remove_last_correspondence_pair(&mut self) -> &Calibration {
        self.calibration.pop();
        self.log_calibration();
        &self.calibration
    }

    /// Replace all pairs, re-solve, and return the new calibration.
    pub fn set_correspondence_pairs(&mut self, pairs: Vec<CorrespondencePair>) -> &Calibration {
        self.calibration.set_pairs(pairs);
        self.log_calibration();
        &self.calibration
    }

    /// Remove all pairs and return the (empty) calibration.
    pub fn clear_calibration(&mut self) -> &Calibration {
        self.calibration.clear();
        self.log_calibration();
        &self.calibration
    }

    /// Map a media pixel to pitch meters through the active calibration.
    pub fn to_pitch(&self, pixel: Point) -> Option<Point> {
        self.calibration.pixel_to_pitch(pixel)
    }

    fn log_calibration(&self) {
        debug!(
            "calibration: {} pairs, state {:?}",
            self.calibration.pairs().len(),
            self.calibration.state()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{Arrow, Circle, Marker, Shape, ShapeKind, Zone};
    use crate::Style;
    use pitchcal_core::CalibrationState;

    fn arrow(t0: f64, t1: f64) -> NewAnnotation {
        NewAnnotation::new(
            Arrow {
                from: Point::new(10.0, 10.0),
                to: Point::new(200.0, 80.0),
            },
            t0,
            t1,
        )
    }

    #[test]
    fn ids_are_unique() {
        let mut store = AnnotationStore::new();
        let a = store.add(arrow(0.0, 1.0)).expect("add");
        let b = store.add(arrow(0.0, 1.0)).expect("add");
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn active_at_uses_inclusive_bounds() {
        let mut store = AnnotationStore::new();
        let early = store.add(arrow(0.0, 2.0)).expect("add");
        let late = store.add(arrow(2.0, 5.0)).expect("add");
        let _ = store.add(arrow(6.0, 6.0)).expect("add");

        let ids = |t: f64| store.active_at(t).iter().map(|a| a.id).collect::<Vec<_>>();
        assert!(ids(-0.1).is_empty());
        assert_eq!(ids(0.0), vec![early]);
        assert_eq!(ids(2.0), vec![early, late]);
        assert_eq!(ids(5.0), vec![late]);
        assert!(ids(5.5).is_empty());
        assert_eq!(ids(6.0).len(), 1);
    }

    #[test]
    fn active_at_reflects_latest_mutation() {
        let mut store = AnnotationStore::new();
        let id = store.add(arrow(0.0, 1.0)).expect("add");
        assert_eq!(store.active_at(3.0).len(), 0);

        store
            .update(
                id,
                AnnotationPatch {
                    end_time: Some(4.0),
                    ..AnnotationPatch::default()
                },
            )
            .expect("update");
        assert_eq!(store.active_at(3.0).len(), 1);

        store.remove(id).expect("remove");
        assert!(store.active_at(0.5).is_empty());
    }

    #[test]
    fn mismatched_variant_update_leaves_record_untouched() {
        let mut store = AnnotationStore::new();
        let id = store.add(arrow(1.0, 3.0)).expect("add");
        let before = store.get(id).cloned().expect("stored");

        let err = store
            .update(
                id,
                AnnotationPatch {
                    start_time: Some(0.0),
                    style: Some(Style {
                        color: "#ff0000".into(),
                        ..Style::default()
                    }),
                    shape: Some(Shape::Circle(Circle {
                        center: Point::new(0.0, 0.0),
                        radius: 1.0,
                    })),
                    ..AnnotationPatch::default()
                },
            )
            .expect_err("variant change must fail");

        assert_eq!(
            err,
            AnnotationError::TypeMismatch {
                id,
                stored: ShapeKind::Arrow,
                requested: ShapeKind::Circle,
            }
        );
        assert_eq!(store.get(id), Some(&before));
    }

    #[test]
    fn same_variant_update_merges_fields() {
        let mut store = AnnotationStore::new();
        let id = store.add(arrow(1.0, 3.0)).expect("add");
        let new_shape = Shape::Arrow(Arrow {
            from: Point::new(0.0, 0.0),
            to: Point::new(1.0, 1.0),
        });

        store
            .update(
                id,
                AnnotationPatch {
                    shape: Some(new_shape.clone()),
                    pitch_coords: Some(Some(vec![Point::new(1.0, 2.0)])),
                    ..AnnotationPatch::default()
                },
            )
            .expect("update");

        let stored = store.get(id).expect("stored");
        assert_eq!(stored.shape, new_shape);
        assert_eq!(stored.start_time, 1.0);
        assert_eq!(stored.end_time, 3.0);
        assert_eq!(stored.pitch_coords.as_deref(), Some(&[Point::new(1.0, 2.0)][..]));
    }

    #[test]
    fn typed_edit_checks_variant() {
        let mut store = AnnotationStore::new();
        let id = store
            .add(NewAnnotation::new(
                Marker {
                    position: Point::new(5.0, 5.0),
                    label: None,
                },
                0.0,
                10.0,
            ))
            .expect("add");
        let before = store.get(id).cloned().expect("stored");

        let err = store
            .edit::<Zone, _>(id, |zone| zone.vertices.clear())
            .expect_err("wrong variant");
        assert!(matches!(err, AnnotationError::TypeMismatch { requested: ShapeKind::Zone, .. }));
        assert_eq!(store.get(id), Some(&before));

        store
            .edit::<Marker, _>(id, |m| m.label = Some("press here".into()))
            .expect("edit");
        match &store.get(id).expect("stored").shape {
            Shape::Marker(m) => assert_eq!(m.label.as_deref(), Some("press here")),
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn invalid_intervals_are_rejected() {
        let mut store = AnnotationStore::new();
        assert!(matches!(
            store.add(arrow(3.0, 1.0)),
            Err(AnnotationError::InvalidInterval { .. })
        ));
        assert!(store.add(arrow(f64::NAN, 1.0)).is_err());
        assert!(store.is_empty());

        let id = store.add(arrow(1.0, 2.0)).expect("add");
        let err = store.update(
            id,
            AnnotationPatch {
                start_time: Some(5.0),
                ..AnnotationPatch::default()
            },
        );
        assert!(err.is_err());
        assert_eq!(store.get(id).expect("stored").start_time, 1.0);
    }

    #[test]
    fn non_finite_geometry_is_rejected() {
        let mut store = AnnotationStore::new();
        let lost = NewAnnotation::new(
            Marker {
                position: Point::new(f64::NAN, 1.0),
                label: None,
            },
            0.0,
            1.0,
        );
        assert_eq!(store.add(lost), Err(AnnotationError::NonFinite("shape")));

        let faded = arrow(0.0, 1.0).with_style(Style {
            opacity: f64::INFINITY,
            ..Style::default()
        });
        assert_eq!(store.add(faded), Err(AnnotationError::NonFinite("style")));

        let anchored = arrow(0.0, 1.0).with_pitch_coords(vec![Point::new(1.0, f64::NAN)]);
        assert_eq!(store.add(anchored), Err(AnnotationError::NonFinite("pitch_coords")));
        assert!(store.is_empty());

        let id = store.add(arrow(0.0, 1.0)).expect("add");
        let before = store.get(id).cloned().expect("stored");
        let err = store.update(
            id,
            AnnotationPatch {
                start_time: Some(0.5),
                shape: Some(Shape::Arrow(Arrow {
                    from: Point::new(0.0, 0.0),
                    to: Point::new(f64::NEG_INFINITY, 0.0),
                })),
                ..AnnotationPatch::default()
            },
        );
        assert_eq!(err, Err(AnnotationError::NonFinite("shape")));
        assert_eq!(store.get(id), Some(&before));

        let err = store.edit::<Arrow, _>(id, |a| a.to.y = f64::NAN);
        assert_eq!(err, Err(AnnotationError::NonFinite("shape")));
        assert_eq!(store.get(id), Some(&before));

        let circle = store
            .add(NewAnnotation::new(
                Circle {
                    center: Point::new(3.0, 3.0),
                    radius: 2.0,
                },
                0.0,
                1.0,
            ))
            .expect("add");
        let err = store.edit::<Circle, _>(circle, |c| c.radius = f64::INFINITY);
        assert_eq!(err, Err(AnnotationError::NonFinite("shape")));
        assert!(store.export_all().is_ok());
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut store = AnnotationStore::new();
        let missing = AnnotationId(u64::MAX);
        assert_eq!(store.remove(missing), Err(AnnotationError::NotFound(missing)));
        assert_eq!(
            store.update(missing, AnnotationPatch::default()),
            Err(AnnotationError::NotFound(missing))
        );
    }

    #[test]
    fn calibration_is_republished_on_every_change() {
        let mut store = AnnotationStore::new();
        let corners = [
            (Point::new(120.0, 200.0), Point::new(0.0, 0.0)),
            (Point::new(1800.0, 210.0), Point::new(105.0, 0.0)),
            (Point::new(1900.0, 1000.0), Point::new(105.0, 68.0)),
            (Point::new(30.0, 990.0), Point::new(0.0, 68.0)),
        ];

        for (i, (src, dst)) in corners.iter().enumerate() {
            let cal = store.add_correspondence_pair(CorrespondencePair::new(*src, *dst));
            assert_eq!(cal.pairs().len(), i + 1);
            assert_eq!(cal.matrix().is_some(), i == 3);
        }
        assert_eq!(store.calibration().state(), CalibrationState::Solved);

        let mapped = store.to_pitch(Point::new(1800.0, 210.0)).expect("mapped");
        assert!((mapped - Point::new(105.0, 0.0)).norm() < 1e-6);

        let cal = store.remove_last_correspondence_pair();
        assert_eq!(cal.state(), CalibrationState::Partial);
        assert!(cal.matrix().is_none());

        let cal = store.set_correspondence_pairs(
            corners
                .iter()
                .map(|(s, d)| CorrespondencePair::new(*s, *d))
                .collect(),
        );
        assert_eq!(cal.state(), CalibrationState::Solved);

        let anchored = store.add_anchored(arrow(0.0, 1.0)).expect("add");
        let coords = store
            .get(anchored)
            .and_then(|a| a.pitch_coords.clone())
            .expect("anchored to the pitch");
        assert_eq!(coords.len(), 2);

        let cal = store.clear_calibration();
        assert_eq!(cal.state(), CalibrationState::Empty);
        assert!(store.to_pitch(Point::new(0.0, 0.0)).is_none());

        let unanchored = store.add_anchored(arrow(0.0, 1.0)).expect("add");
        assert!(store.get(unanchored).expect("stored").pitch_coords.is_none());
    }
}
