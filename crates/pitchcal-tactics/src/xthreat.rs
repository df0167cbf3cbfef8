//! Expected-threat lookup on a coarse pitch grid.

use pitchcal_core::{Point, PITCH_LENGTH_M, PITCH_WIDTH_M};
use serde::{Deserialize, Serialize};

pub const XT_COLS: usize = 12;
pub const XT_ROWS: usize = 8;

/// Values for an attack toward increasing x; symmetric about the long axis.
const DEFAULT_XT: [[f64; XT_COLS]; XT_ROWS] = [
    [0.005, 0.01, 0.015, 0.02, 0.03, 0.04, 0.06, 0.08, 0.12, 0.18, 0.25, 0.35],
    [0.008, 0.015, 0.02, 0.03, 0.05, 0.07, 0.10, 0.15, 0.22, 0.30, 0.40, 0.50],
    [0.010, 0.02, 0.03, 0.05, 0.08, 0.12, 0.18, 0.25, 0.35, 0.45, 0.55, 0.65],
    [0.012, 0.025, 0.04, 0.07, 0.12, 0.18, 0.25, 0.35, 0.45, 0.55, 0.65, 0.75],
    [0.012, 0.025, 0.04, 0.07, 0.12, 0.18, 0.25, 0.35, 0.45, 0.55, 0.65, 0.75],
    [0.010, 0.02, 0.03, 0.05, 0.08, 0.12, 0.18, 0.25, 0.35, 0.45, 0.55, 0.65],
    [0.008, 0.015, 0.02, 0.03, 0.05, 0.07, 0.10, 0.15, 0.22, 0.30, 0.40, 0.50],
    [0.005, 0.01, 0.015, 0.02, 0.03, 0.04, 0.06, 0.08, 0.12, 0.18, 0.25, 0.35],
];

/// Probability of scoring from a pitch cell within the next few actions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct XThreatGrid {
    pub field_length: f64,
    pub field_width: f64,
    /// `values[row][col]`, row along y, col along x.
    pub values: [[f64; XT_COLS]; XT_ROWS],
}

impl Default for XThreatGrid {
    fn default() -> Self {
        Self {
            field_length: PITCH_LENGTH_M,
            field_width: PITCH_WIDTH_M,
            values: DEFAULT_XT,
        }
    }
}

impl XThreatGrid {
    /// Threat at `(x, y)` meters. Off-pitch points clamp to the border cells;
    /// NaN coordinates have no threat.
    pub fn value_at(&self, x: f64, y: f64) -> f64 {
        if x.is_nan() || y.is_nan() {
            return 0.0;
        }
        let col = cell_index(x, self.field_length / XT_COLS as f64, XT_COLS);
        let row = cell_index(y, self.field_width / XT_ROWS as f64, XT_ROWS);
        self.values[row][col]
    }

    /// Threat gained by moving the ball from `from` to `to`.
    pub fn delta(&self, from: Point, to: Point) -> f64 {
        self.value_at(to.x, to.y) - self.value_at(from.x, from.y)
    }
}

#[inline]
fn cell_index(v: f64, cell: f64, count: usize) -> usize {
    (v / cell).clamp(0.0, (count - 1) as f64) as usize
}
