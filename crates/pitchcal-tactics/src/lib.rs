//! Tactical helpers on a 105 × 68 m pitch.
//!
//! All coordinates are pitch meters with the origin at a corner flag; team A
//! attacks toward `x = 105`, team B toward `x = 0`.
//!
//! - [`classify_role`] and [`default_position`]: roles from jersey numbers and
//!   a 4-3-3 fallback shape when tracking has no coordinates.
//! - [`zone_of`] and [`corridor_of`]: 18-zone grid and five vertical corridors.
//! - [`predict_pass_targets`]: ranked teammates for the ball holder.
//! - [`XThreatGrid`], [`track_speed_kmh`] and [`position_heatmap`]: expected
//!   threat, player speed and occupancy.

mod kinematics;
mod passing;
mod roster;
mod xthreat;
mod zones;

pub use kinematics::{
    position_heatmap, track_speed_kmh, TrackSample, DEFAULT_HEATMAP_BINS, DEFAULT_SPEED_WINDOW,
};
pub use passing::{predict_pass_targets, predict_pass_targets_with, PassScoringParams, RoleCaps};
pub use roster::{classify_role, default_position, PlayerPosition, Role, Team};
pub use xthreat::{XThreatGrid, XT_COLS, XT_ROWS};
pub use zones::{corridor_of, zone_of, Corridor};
