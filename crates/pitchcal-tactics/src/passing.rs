//! Ranking of pass targets for the ball holder.

use crate::roster::{PlayerPosition, Role};
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Maximum number of targets returned per holder role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleCaps {
    pub goalkeeper: usize,
    pub defender: usize,
    pub midfielder: usize,
    pub forward: usize,
}

impl Default for RoleCaps {
    fn default() -> Self {
        Self {
            goalkeeper: 20,
            defender: 8,
            midfielder: 6,
            forward: 5,
        }
    }
}

impl RoleCaps {
    pub fn for_role(&self, role: Role) -> usize {
        match role {
            Role::Goalkeeper => self.goalkeeper,
            Role::Defender => self.defender,
            Role::Midfielder => self.midfielder,
            Role::Forward => self.forward,
        }
    }
}

/// Weights of the pass score
/// `distance_weight·d + progress_weight·forward + lateral_weight·(−|lateral|)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassScoringParams {
    pub distance_weight: f64,
    pub progress_weight: f64,
    pub lateral_weight: f64,
    /// Added for goalkeeper holders to candidates in the defensive half.
    pub goalkeeper_bonus: f64,
    pub caps: RoleCaps,
}

impl Default for PassScoringParams {
    fn default() -> Self {
        Self {
            distance_weight: -0.5,
            progress_weight: 1.5,
            lateral_weight: 0.4,
            goalkeeper_bonus: 50.0,
            caps: RoleCaps::default(),
        }
    }
}

/// Rank teammates of `holder` as pass targets with default weights.
///
/// See [`predict_pass_targets_with`].
pub fn predict_pass_targets(
    holder: &PlayerPosition,
    roster: &[PlayerPosition],
) -> Vec<PlayerPosition> {
    predict_pass_targets_with(holder, roster, &PassScoringParams::default())
}

/// Rank teammates of `holder` as pass targets.
///
/// Candidates are roster entries on the holder's team with a different id.
/// Missing coordinates (holder or candidate) fall back to the default 4-3-3
/// slot. Returned entries carry resolved `x`, `y`, `role` and `score`.
///
/// For a goalkeeper holder every candidate in the defensive half ranks ahead
/// of every other candidate. Ties keep roster order. The list is truncated to
/// the cap of the holder's role.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(roster, params), fields(holder = %holder.id, n = roster.len()))
)]
pub fn predict_pass_targets_with(
    holder: &PlayerPosition,
    roster: &[PlayerPosition],
    params: &PassScoringParams,
) -> Vec<PlayerPosition> {
    let origin = holder.position_or_default();
    let holder_role = holder.role();
    let team = holder.team;
    let sign = team.attack_sign();

    let mut ranked: Vec<(bool, PlayerPosition)> = roster
        .iter()
        .filter(|p| p.team == team && p.id != holder.id)
        .map(|p| {
            let at = p.position_or_default();
            let distance = (at - origin).norm();
            let forward = (at.x - origin.x) * sign;
            let lateral = (at.y - origin.y).abs();

            let mut score = params.distance_weight * distance
                + params.progress_weight * forward
                + params.lateral_weight * -lateral;

            let back_line = holder_role == Role::Goalkeeper && team.in_defensive_half(at.x);
            if back_line {
                score += params.goalkeeper_bonus;
            }

            let mut out = p.clone();
            out.x = Some(at.x);
            out.y = Some(at.y);
            out.role = Some(p.role());
            out.score = Some(score);
            (back_line, out)
        })
        .collect();

    ranked.sort_by(|(a_back, a), (b_back, b)| {
        b_back.cmp(a_back).then_with(|| by_score_desc(a, b))
    });
    ranked.truncate(params.caps.for_role(holder_role));

    debug!(
        "pass targets for {} ({}): {} ranked",
        holder.id,
        holder_role,
        ranked.len()
    );
    ranked.into_iter().map(|(_, p)| p).collect()
}

fn by_score_desc(a: &PlayerPosition, b: &PlayerPosition) -> Ordering {
    let a = a.score.unwrap_or(f64::NEG_INFINITY);
    let b = b.score.unwrap_or(f64::NEG_INFINITY);
    b.total_cmp(&a)
}
