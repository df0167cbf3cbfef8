use pitchcal_core::{Point, PITCH_LENGTH_M, PITCH_WIDTH_M};
use serde::{Deserialize, Serialize};

/// Number of trailing samples used for speed when no window is given.
pub const DEFAULT_SPEED_WINDOW: usize = 15;

/// One-meter cells over the full pitch, as `(cols, rows)`.
pub const DEFAULT_HEATMAP_BINS: (usize, usize) = (105, 68);

/// One tracked pitch position at a video frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackSample {
    pub frame: u64,
    pub position: Point,
}

impl TrackSample {
    pub fn new(frame: u64, x: f64, y: f64) -> Self {
        Self {
            frame,
            position: Point::new(x, y),
        }
    }
}

/// Straight-line speed in km/h over the last `window` samples.
///
/// Samples are expected in frame order. Returns `0.0` when fewer than two
/// samples are available, `fps` is not positive, or no time has elapsed.
pub fn track_speed_kmh(samples: &[TrackSample], fps: f64, window: usize) -> f64 {
    if window < 2 || samples.len() < 2 || fps.is_nan() || fps <= 0.0 {
        return 0.0;
    }
    let recent = &samples[samples.len().saturating_sub(window)..];
    let (first, last) = (recent[0], recent[recent.len() - 1]);

    let frames = last.frame.saturating_sub(first.frame);
    if frames == 0 {
        return 0.0;
    }
    let seconds = frames as f64 / fps;
    let meters = (last.position - first.position).norm();
    meters / seconds * 3.6
}

/// Occupancy histogram of a track over the pitch, indexed `[col][row]`.
///
/// Columns split `0..=105` along x and rows split `0..=68` along y into equal
/// bins. Each bin is half-open except the last, which also takes the far
/// touchline or goal line. Samples off the pitch or with non-finite
/// coordinates are not counted.
pub fn position_heatmap(samples: &[TrackSample], cols: usize, rows: usize) -> Vec<Vec<u32>> {
    let mut grid = vec![vec![0u32; rows]; cols];
    if rows == 0 {
        return grid;
    }
    for sample in samples {
        let p = sample.position;
        let (Some(col), Some(row)) = (
            bin_index(p.x, PITCH_LENGTH_M, cols),
            bin_index(p.y, PITCH_WIDTH_M, rows),
        ) else {
            continue;
        };
        grid[col][row] += 1;
    }
    grid
}

fn bin_index(v: f64, extent: f64, bins: usize) -> Option<usize> {
    if bins == 0 || !(0.0..=extent).contains(&v) {
        return None;
    }
    let idx = (v * bins as f64 / extent) as usize;
    Some(idx.min(bins - 1))
}
