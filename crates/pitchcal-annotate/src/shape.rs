//! Shape payloads for each annotation variant.

use pitchcal_core::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub from: Point,
    pub to: Point,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

/// Axis-aligned rectangle from its top-left corner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub position: Point,
    pub text: String,
}

/// Polyline following one player over the annotation interval.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerTrack {
    #[serde(default)]
    pub player_id: Option<String>,
    pub points: Vec<Point>,
}

/// Distance measurement between two points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ruler {
    pub from: Point,
    pub to: Point,
}

impl Ruler {
    /// Length in the units of `from`/`to`.
    pub fn length(&self) -> f64 {
        (self.to - self.from).norm()
    }
}

/// Highlight around a player, dimming the rest of the frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spotlight {
    pub center: Point,
    pub radius: f64,
}

/// Closed polygon marking a pitch area.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub vertices: Vec<Point>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub position: Point,
    #[serde(default)]
    pub label: Option<String>,
}

/// Geometry of an annotation. The variant is fixed at creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Arrow(Arrow),
    Circle(Circle),
    Rectangle(Rectangle),
    Text(Text),
    PlayerTrack(PlayerTrack),
    Ruler(Ruler),
    Spotlight(Spotlight),
    Zone(Zone),
    Marker(Marker),
}

/// Variant tag of a [`Shape`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Arrow,
    Circle,
    Rectangle,
    Text,
    PlayerTrack,
    Ruler,
    Spotlight,
    Zone,
    Marker,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Arrow => "arrow",
            ShapeKind::Circle => "circle",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Text => "text",
            ShapeKind::PlayerTrack => "player_track",
            ShapeKind::Ruler => "ruler",
            ShapeKind::Spotlight => "spotlight",
            ShapeKind::Zone => "zone",
            ShapeKind::Marker => "marker",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Arrow(_) => ShapeKind::Arrow,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Text(_) => ShapeKind::Text,
            Shape::PlayerTrack(_) => ShapeKind::PlayerTrack,
            Shape::Ruler(_) => ShapeKind::Ruler,
            Shape::Spotlight(_) => ShapeKind::Spotlight,
            Shape::Zone(_) => ShapeKind::Zone,
            Shape::Marker(_) => ShapeKind::Marker,
        }
    }

    /// True if every coordinate and size of the shape is a finite number.
    pub fn is_finite(&self) -> bool {
        let sizes_finite = match self {
            Shape::Circle(c) => c.radius.is_finite(),
            Shape::Spotlight(s) => s.radius.is_finite(),
            Shape::Rectangle(r) => r.width.is_finite() && r.height.is_finite(),
            _ => true,
        };
        sizes_finite && self.key_points().iter().all(finite_point)
    }

    /// Defining points of the shape, in drawing order.
    pub fn key_points(&self) -> Vec<Point> {
        match self {
            Shape::Arrow(a) => vec![a.from, a.to],
            Shape::Ruler(r) => vec![r.from, r.to],
            Shape::Circle(c) => vec![c.center],
            Shape::Spotlight(s) => vec![s.center],
            Shape::Rectangle(r) => vec![
                r.origin,
                Point::new(r.origin.x + r.width, r.origin.y),
                Point::new(r.origin.x + r.width, r.origin.y + r.height),
                Point::new(r.origin.x, r.origin.y + r.height),
            ],
            Shape::Text(t) => vec![t.position],
            Shape::Marker(m) => vec![m.position],
            Shape::PlayerTrack(t) => t.points.clone(),
            Shape::Zone(z) => z.vertices.clone(),
        }
    }
}

pub(crate) fn finite_point(p: &Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// A payload type that corresponds to exactly one [`Shape`] variant.
///
/// Used by `AnnotationStore::edit` so that a typed edit can never change the
/// variant of a stored annotation.
pub trait ShapeVariant: Sized {
    const KIND: ShapeKind;

    fn from_shape_mut(shape: &mut Shape) -> Option<&mut Self>;
}

macro_rules! shape_variant {
    ($($ty:ident),* $(,)?) => {
        $(
            impl ShapeVariant for $ty {
                const KIND: ShapeKind = ShapeKind::$ty;

                fn from_shape_mut(shape: &mut Shape) -> Option<&mut Self> {
                    match shape {
                        Shape::$ty(inner) => Some(inner),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Shape {
                fn from(inner: $ty) -> Self {
                    Shape::$ty(inner)
                }
            }
        )*
    };
}

shape_variant!(Arrow, Circle, Rectangle, Text, PlayerTrack, Ruler, Spotlight, Zone, Marker);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_tag_matches_kind_name() {
        let shape = Shape::from(PlayerTrack {
            player_id: Some("7".into()),
            points: vec![Point::new(1.0, 2.0)],
        });
        let json = serde_json::to_value(&shape).expect("serialize");
        assert_eq!(json["type"], shape.kind().as_str());
    }

    #[test]
    fn typed_access_only_matches_own_variant() {
        let mut shape = Shape::from(Circle {
            center: Point::new(0.0, 0.0),
            radius: 3.0,
        });
        assert!(Circle::from_shape_mut(&mut shape).is_some());
        assert!(Spotlight::from_shape_mut(&mut shape).is_none());
        assert_eq!(<Spotlight as ShapeVariant>::KIND, ShapeKind::Spotlight);
    }

    #[test]
    fn rectangle_key_points_walk_the_corners() {
        let shape = Shape::from(Rectangle {
            origin: Point::new(1.0, 2.0),
            width: 3.0,
            height: 4.0,
        });
        assert_eq!(
            shape.key_points(),
            vec![
                Point::new(1.0, 2.0),
                Point::new(4.0, 2.0),
                Point::new(4.0, 6.0),
                Point::new(1.0, 6.0),
            ]
        );
    }

    #[test]
    fn finiteness_covers_points_and_sizes() {
        let track = Shape::from(PlayerTrack {
            player_id: None,
            points: vec![Point::new(1.0, 2.0), Point::new(3.0, f64::NAN)],
        });
        assert!(!track.is_finite());

        let wide = Shape::from(Rectangle {
            origin: Point::new(0.0, 0.0),
            width: f64::INFINITY,
            height: 1.0,
        });
        assert!(!wide.is_finite());

        let halo = Shape::from(Spotlight {
            center: Point::new(10.0, 10.0),
            radius: f64::NAN,
        });
        assert!(!halo.is_finite());

        let empty_zone = Shape::from(Zone { vertices: vec![] });
        assert!(empty_zone.is_finite());
    }

    #[test]
    fn ruler_length() {
        let r = Ruler {
            from: Point::new(0.0, 0.0),
            to: Point::new(3.0, 4.0),
        };
        assert_eq!(r.length(), 5.0);
    }
}
