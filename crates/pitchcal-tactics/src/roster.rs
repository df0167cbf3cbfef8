//! Players, roles and the default 4-3-3 shape.

use pitchcal_core::{Point, PITCH_LENGTH_M, PITCH_WIDTH_M};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "GK")]
    Goalkeeper,
    #[serde(rename = "DEF")]
    Defender,
    #[serde(rename = "MID")]
    Midfielder,
    #[serde(rename = "FWD")]
    Forward,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Goalkeeper => "GK",
            Role::Defender => "DEF",
            Role::Midfielder => "MID",
            Role::Forward => "FWD",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side of the match. Team A attacks toward `x = 105`, team B toward `x = 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
}

impl Team {
    /// `+1.0` when attacking toward increasing x, `-1.0` otherwise.
    #[inline]
    pub fn attack_sign(self) -> f64 {
        match self {
            Team::A => 1.0,
            Team::B => -1.0,
        }
    }

    /// True if `x` lies in the half this team defends. The halfway line
    /// belongs to neither half.
    #[inline]
    pub fn in_defensive_half(self, x: f64) -> bool {
        let half = PITCH_LENGTH_M / 2.0;
        match self {
            Team::A => x < half,
            Team::B => x > half,
        }
    }
}

/// Map a jersey number to a role. Unlisted numbers are midfielders.
pub fn classify_role(jersey_number: u32) -> Role {
    match jersey_number {
        1 => Role::Goalkeeper,
        2..=5 | 15 | 20..=25 => Role::Defender,
        6..=8 => Role::Midfielder,
        9..=11 => Role::Forward,
        _ => Role::Midfielder,
    }
}

/// 4-3-3 slots for team A, indexed by `number % 11`.
const FORMATION_433: [(f64, f64); 11] = [
    (75.0, 10.0), // 11: left winger
    (5.0, 34.0),  // 1: goalkeeper
    (25.0, 58.0), // 2: right back
    (25.0, 10.0), // 3: left back
    (22.0, 40.0), // 4
    (22.0, 28.0), // 5
    (40.0, 34.0), // 6: holding midfielder
    (75.0, 58.0), // 7: right winger
    (52.0, 48.0), // 8
    (80.0, 34.0), // 9: striker
    (55.0, 20.0), // 10
];

/// Default pitch position for a jersey number, used when tracking has no
/// coordinates for the player. Team B is the point reflection of team A.
pub fn default_position(jersey_number: u32, team: Team) -> Point {
    let (x, y) = FORMATION_433[(jersey_number % 11) as usize];
    match team {
        Team::A => Point::new(x, y),
        Team::B => Point::new(PITCH_LENGTH_M - x, PITCH_WIDTH_M - y),
    }
}

/// A roster entry, optionally with live pitch coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerPosition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub number: u32,
    /// Falls back to [`classify_role`] on the jersey number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub team: Team,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Set on pass-target results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl PlayerPosition {
    pub fn new(id: impl Into<String>, number: u32, team: Team) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            number,
            role: None,
            team,
            x: None,
            y: None,
            score: None,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn role(&self) -> Role {
        self.role.unwrap_or_else(|| classify_role(self.number))
    }

    /// Tracked coordinates, if both are known and finite.
    pub fn tracked(&self) -> Option<Point> {
        let (x, y) = (self.x?, self.y?);
        (x.is_finite() && y.is_finite()).then(|| Point::new(x, y))
    }

    /// Tracked coordinates, or the default formation slot.
    pub fn position_or_default(&self) -> Point {
        self.tracked()
            .unwrap_or_else(|| default_position(self.number, self.team))
    }
}
