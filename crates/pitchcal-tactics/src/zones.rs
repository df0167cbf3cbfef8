//! 18-zone grid and five vertical corridors.
//!
//! Thresholds are compared exactly as written; results on the boundaries are
//! part of the contract.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Zone number in `1..=18` for pitch coordinates in meters.
///
/// Rows of six: zones 1-6 are the attacking third (`x >= 70`), 7-12 the
/// middle third (`x >= 35`), 13-18 the defensive third. Within a row the zone
/// grows with `y` in bands of 11.33 m.
pub fn zone_of(x: f64, y: f64) -> u8 {
    let band_h: u8 = if x >= 70.0 {
        0
    } else if x >= 35.0 {
        1
    } else {
        2
    };
    let band_v: u8 = if y < 11.33 {
        0
    } else if y < 22.66 {
        1
    } else if y < 34.0 {
        2
    } else if y < 45.33 {
        3
    } else if y < 56.66 {
        4
    } else {
        5
    };
    band_h * 6 + band_v + 1
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corridor {
    #[serde(rename = "LW")]
    LeftWing,
    #[serde(rename = "LHS")]
    LeftHalfSpace,
    #[serde(rename = "C")]
    Centre,
    #[serde(rename = "RHS")]
    RightHalfSpace,
    #[serde(rename = "RW")]
    RightWing,
}

impl Corridor {
    pub fn as_str(self) -> &'static str {
        match self {
            Corridor::LeftWing => "LW",
            Corridor::LeftHalfSpace => "LHS",
            Corridor::Centre => "C",
            Corridor::RightHalfSpace => "RHS",
            Corridor::RightWing => "RW",
        }
    }
}

impl fmt::Display for Corridor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Corridor for a `y` coordinate across the 68 m width.
pub fn corridor_of(y: f64) -> Corridor {
    if y >= 58.0 {
        Corridor::RightWing
    } else if y >= 44.0 {
        Corridor::RightHalfSpace
    } else if y >= 24.0 {
        Corridor::Centre
    } else if y >= 10.0 {
        Corridor::LeftHalfSpace
    } else {
        Corridor::LeftWing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_zones() {
        assert_eq!(zone_of(80.0, 5.0), 1);
        assert_eq!(zone_of(20.0, 60.0), 18);
        assert_eq!(zone_of(52.5, 34.0), 10);
    }

    #[test]
    fn horizontal_boundaries_belong_to_the_higher_band() {
        assert_eq!(zone_of(70.0, 0.0), 1);
        assert_eq!(zone_of(69.999, 0.0), 7);
        assert_eq!(zone_of(35.0, 0.0), 7);
        assert_eq!(zone_of(34.999, 0.0), 13);
    }

    #[test]
    fn vertical_boundaries_follow_the_literal_chain() {
        let cases = [
            (11.33, 2),
            (11.3299, 1),
            (22.66, 3),
            (22.6599, 2),
            (34.0, 4),
            (33.999, 3),
            (45.33, 5),
            (45.3299, 4),
            (56.66, 6),
            (56.6599, 5),
        ];
        for (y, zone) in cases {
            assert_eq!(zone_of(80.0, y), zone, "y = {y}");
        }
    }

    #[test]
    fn off_pitch_points_clamp_to_edge_zones() {
        assert_eq!(zone_of(200.0, -4.0), 1);
        assert_eq!(zone_of(-3.0, 90.0), 18);
    }

    #[test]
    fn corridors() {
        assert_eq!(corridor_of(0.0), Corridor::LeftWing);
        assert_eq!(corridor_of(9.99), Corridor::LeftWing);
        assert_eq!(corridor_of(10.0), Corridor::LeftHalfSpace);
        assert_eq!(corridor_of(24.0), Corridor::Centre);
        assert_eq!(corridor_of(44.0), Corridor::RightHalfSpace);
        assert_eq!(corridor_of(58.0), Corridor::RightWing);
        assert_eq!(corridor_of(68.0), Corridor::RightWing);
        assert_eq!(Corridor::RightHalfSpace.to_string(), "RHS");
    }
}
