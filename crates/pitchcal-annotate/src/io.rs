//! JSON import/export and file persistence for [`AnnotationStore`].

use crate::annotation::{valid_interval, Annotation};
use crate::error::AnnotationIoError;
use crate::AnnotationStore;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::{fs, path::Path};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Version written by [`AnnotationStore::export_all`].
pub const FORMAT_VERSION: u32 = 1;

fn default_version() -> u32 {
    FORMAT_VERSION
}

/// On-disk layout of an exported annotation list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    pub annotations: Vec<Annotation>,
}

impl AnnotationDocument {
    /// Checks everything a store relies on before the list replaces its contents.
    fn validate(&self) -> Result<(), AnnotationIoError> {
        if self.version != FORMAT_VERSION {
            return Err(AnnotationIoError::UnsupportedVersion(self.version));
        }
        let mut seen = HashSet::with_capacity(self.annotations.len());
        for a in &self.annotations {
            if !seen.insert(a.id) {
                return Err(AnnotationIoError::DuplicateId(a.id));
            }
            if !valid_interval(a.start_time, a.end_time) {
                return Err(AnnotationIoError::InvalidInterval { id: a.id });
            }
            if let Some(part) = a.non_finite_part() {
                return Err(AnnotationIoError::NonFinite { id: a.id, part });
            }
        }
        Ok(())
    }
}

impl AnnotationStore {
    /// Serialize every annotation, in insertion order, as pretty JSON.
    ///
    /// The calibration is not part of the document.
    pub fn export_all(&self) -> Result<String, AnnotationIoError> {
        let doc = AnnotationDocument {
            version: FORMAT_VERSION,
            annotations: self.iter().cloned().collect(),
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    /// Replace the whole annotation list with the one in `text`.
    ///
    /// Either every annotation is imported or the store is left untouched.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, text), fields(bytes = text.len()))
    )]
    pub fn import_all(&mut self, text: &str) -> Result<usize, AnnotationIoError> {
        let doc: AnnotationDocument = serde_json::from_str(text).map_err(|err| {
            debug!("annotation import rejected: {err}");
            AnnotationIoError::from(err)
        })?;
        self.validate_and_replace(doc)
    }

    fn validate_and_replace(
        &mut self,
        doc: AnnotationDocument,
    ) -> Result<usize, AnnotationIoError> {
        doc.validate()?;
        let count = doc.annotations.len();
        self.replace_annotations(doc.annotations);
        info!("imported {count} annotations");
        Ok(count)
    }

    /// Write [`AnnotationStore::export_all`] output to `path`.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), AnnotationIoError> {
        let json = self.export_all()?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Read `path` and [`AnnotationStore::import_all`] its contents.
    pub fn load_json(&mut self, path: impl AsRef<Path>) -> Result<usize, AnnotationIoError> {
        let raw = fs::read_to_string(path)?;
        self.import_all(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Marker;
    use crate::{AnnotationId, NewAnnotation};
    use pitchcal_core::Point;

    fn marker(t0: f64, t1: f64) -> NewAnnotation {
        NewAnnotation::new(
            Marker {
                position: Point::new(10.0, 20.0),
                label: None,
            },
            t0,
            t1,
        )
    }

    #[test]
    fn missing_version_defaults_to_current() {
        let mut store = AnnotationStore::new();
        let n = store.import_all(r#"{ "annotations": [] }"#).expect("import");
        assert_eq!(n, 0);
    }

    #[test]
    fn rejects_unknown_version() {
        let mut store = AnnotationStore::new();
        store.add(marker(0.0, 1.0)).expect("add");
        let err = store
            .import_all(r#"{ "version": 7, "annotations": [] }"#)
            .unwrap_err();
        assert!(matches!(err, AnnotationIoError::UnsupportedVersion(7)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn rejects_reversed_interval() {
        let mut store = AnnotationStore::new();
        store.add(marker(0.0, 1.0)).expect("add");
        let text = r#"{
            "version": 1,
            "annotations": [{
                "id": 4000,
                "start_time": 5.0,
                "end_time": 2.0,
                "shape": { "type": "marker", "position": [1.0, 2.0] }
            }]
        }"#;
        let err = store.import_all(text).unwrap_err();
        assert!(matches!(
            err,
            AnnotationIoError::InvalidInterval { id } if id.0 == 4000
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn rejects_non_finite_numbers() {
        let mut store = AnnotationStore::new();
        store.add(marker(0.0, 1.0)).expect("add");
        let doc = AnnotationDocument {
            version: FORMAT_VERSION,
            annotations: vec![marker(0.0, 1.0)
                .with_pitch_coords(vec![Point::new(f64::INFINITY, 3.0)])
                .into_annotation(AnnotationId(4200))],
        };

        let err = doc.validate().unwrap_err();
        assert!(matches!(
            err,
            AnnotationIoError::NonFinite { id, part: "pitch_coords" } if id.0 == 4200
        ));

        assert!(store.validate_and_replace(doc).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn style_defaults_when_omitted() {
        let mut store = AnnotationStore::new();
        let text = r##"{
            "version": 1,
            "annotations": [{
                "id": 4100,
                "start_time": 0.0,
                "end_time": 2.0,
                "style": { "color": "#ff0000" },
                "shape": { "type": "text", "position": [1.0, 2.0], "text": "press" }
            }]
        }"##;
        store.import_all(text).expect("import");
        let a = store.iter().next().expect("one annotation");
        assert_eq!(a.style.color, "#ff0000");
        assert_eq!(a.style.stroke_width, 3.0);
        assert!(a.pitch_coords.is_none());
    }
}
