use crate::linalg::{self, SINGULAR_TOLERANCE};
use crate::{CorrespondencePair, Point};
use log::debug;
use nalgebra::{DMatrix, DVector, Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Minimal number of correspondences that determine a homography.
pub const MIN_CORRESPONDENCES: usize = 4;

/// Triangle area (in normalized units) below which three points count as collinear.
const COLLINEAR_TOLERANCE: f64 = 1e-9;

/// Projective 3×3 transform, defined up to scale.
///
/// Serialized row-major as `[[a, b, c], [d, e, f], [g, h, i]]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[[f64; 3]; 3]", into = "[[f64; 3]; 3]")]
pub struct Homography {
    pub h: Matrix3<f64>,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    pub fn identity() -> Self {
        Self::new(Matrix3::identity())
    }

    pub fn from_array(rows: [[f64; 3]; 3]) -> Self {
        Self::new(Matrix3::from_row_slice(&[
            rows[0][0], rows[0][1], rows[0][2], rows[1][0], rows[1][1], rows[1][2], rows[2][0],
            rows[2][1], rows[2][2],
        ]))
    }

    pub fn to_array(&self) -> [[f64; 3]; 3] {
        [
            [self.h[(0, 0)], self.h[(0, 1)], self.h[(0, 2)]],
            [self.h[(1, 0)], self.h[(1, 1)], self.h[(1, 2)]],
            [self.h[(2, 0)], self.h[(2, 1)], self.h[(2, 2)]],
        ]
    }

    /// Map `p` through the homography, dividing by the homogeneous `w`.
    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        let v = self.h * Vector3::new(p.x, p.y, 1.0);
        let w = v[2];
        Point::new(v[0] / w, v[1] / w)
    }

    /// Like [`Homography::apply`], but `None` when `p` maps to (near) infinity.
    pub fn try_apply(&self, p: Point) -> Option<Point> {
        let v = self.h * Vector3::new(p.x, p.y, 1.0);
        let w = v[2];
        if w.is_nan() || w.abs() < SINGULAR_TOLERANCE {
            return None;
        }
        Some(Point::new(v[0] / w, v[1] / w))
    }

    /// Inverse transform (e.g. pitch meters back to media pixels).
    pub fn inverse(&self) -> Option<Self> {
        let scaled = normalize_scale(self.h);
        linalg::invert3x3(&scaled).map(|inv| Self::new(normalize_scale(inv)))
    }

    /// Euclidean distance between `H * src` and `dst` for each pair.
    pub fn reprojection_errors(&self, pairs: &[CorrespondencePair]) -> Vec<f64> {
        pairs
            .iter()
            .map(|pair| {
                let p = self.apply(pair.src);
                (p - pair.dst).norm()
            })
            .collect()
    }

    /// Root-mean-square reprojection error over `pairs`, `None` if empty.
    pub fn rms_reprojection_error(&self, pairs: &[CorrespondencePair]) -> Option<f64> {
        if pairs.is_empty() {
            return None;
        }
        let errors = self.reprojection_errors(pairs);
        let sum_sq: f64 = errors.iter().map(|e| e * e).sum();
        Some((sum_sq / errors.len() as f64).sqrt())
    }

    /// Parse nine comma-separated values in row-major order.
    pub fn parse_csv(s: &str) -> Result<Self, HomographyParseError> {
        let mut values = Vec::with_capacity(9);
        for (index, raw) in s.split(',').enumerate() {
            let raw = raw.trim();
            let v: f64 = raw.parse().map_err(|_| HomographyParseError::InvalidNumber {
                index,
                value: raw.to_string(),
            })?;
            if !v.is_finite() {
                return Err(HomographyParseError::NonFinite { index });
            }
            values.push(v);
        }
        if values.len() != 9 {
            return Err(HomographyParseError::WrongCount(values.len()));
        }
        if values.iter().all(|v| *v == 0.0) {
            return Err(HomographyParseError::AllZero);
        }
        Ok(Self::new(Matrix3::from_row_slice(&values)))
    }

    /// Row-major comma-separated representation accepted by [`Homography::parse_csv`].
    pub fn to_csv(&self) -> String {
        self.to_array()
            .iter()
            .flatten()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl From<[[f64; 3]; 3]> for Homography {
    fn from(rows: [[f64; 3]; 3]) -> Self {
        Self::from_array(rows)
    }
}

impl From<Homography> for [[f64; 3]; 3] {
    fn from(h: Homography) -> Self {
        h.to_array()
    }
}

impl FromStr for Homography {
    type Err = HomographyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_csv(s)
    }
}

impl fmt::Display for Homography {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_csv())
    }
}

/// Errors from parsing a textual homography.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum HomographyParseError {
    #[error("expected 9 values, got {0}")]
    WrongCount(usize),
    #[error("value #{index} is not a number: {value:?}")]
    InvalidNumber { index: usize, value: String },
    #[error("value #{index} is not finite")]
    NonFinite { index: usize },
    #[error("homography matrix is all zeros")]
    AllZero,
}

/// Apply `h` to `p`. Free-function form of [`Homography::apply`].
#[inline]
pub fn transform(p: Point, h: &Homography) -> Point {
    h.apply(p)
}

fn hartley_normalization(cx: f64, cy: f64, mean_dist: f64) -> Matrix3<f64> {
    let s = if mean_dist > 1e-12 {
        (2.0_f64).sqrt() / mean_dist
    } else {
        1.0
    };

    Matrix3::<f64>::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0)
}

fn normalize_points(pts: &[Point]) -> (Vec<Point>, Matrix3<f64>) {
    // Translate to centroid, scale so mean distance = sqrt(2).
    let n = pts.len() as f64;
    let (mut cx, mut cy) = (0.0, 0.0);
    for p in pts {
        cx += p.x;
        cy += p.y;
    }
    cx /= n;
    cy /= n;

    let mean_dist = pts
        .iter()
        .map(|p| ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt())
        .sum::<f64>()
        / n;

    let t = hartley_normalization(cx, cy, mean_dist);
    let out = pts
        .iter()
        .map(|p| {
            let v = t * Vector3::new(p.x, p.y, 1.0);
            Point::new(v[0], v[1])
        })
        .collect();
    (out, t)
}

#[inline]
fn cross(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// True when any three points of a normalized set lie on one line.
///
/// Coincident points count as collinear, so this also rejects duplicates.
fn is_degenerate(pts: &[Point]) -> bool {
    let n = pts.len();
    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                if cross(pts[i], pts[j], pts[k]).abs() < COLLINEAR_TOLERANCE {
                    return true;
                }
            }
        }
    }
    false
}

fn normalize_scale(h: Matrix3<f64>) -> Matrix3<f64> {
    let s = h[(2, 2)];
    if s.abs() > 1e-12 {
        return h / s;
    }
    let norm = h.norm();
    if norm > 0.0 {
        h / norm
    } else {
        h
    }
}

/// Estimate `H` such that `dst ~ H * src` from at least four correspondences.
///
/// Both sets are Hartley-normalized, the 2n×8 system with `h8 = 1` is solved
/// through its normal equations, and the result is denormalized as
/// `Tdst⁻¹ · Hn · Tsrc`. Returns `None` for fewer than four pairs, mismatched
/// lengths, degenerate point sets, or a singular system.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(src, dst), fields(n = src.len()))
)]
pub fn solve(src: &[Point], dst: &[Point]) -> Option<Homography> {
    if src.len() != dst.len() {
        debug!("homography: {} src vs {} dst points", src.len(), dst.len());
        return None;
    }
    let n = src.len();
    if n < MIN_CORRESPONDENCES {
        return None;
    }

    let (s, t_src) = normalize_points(src);
    let (d, t_dst) = normalize_points(dst);

    if is_degenerate(&s) || is_degenerate(&d) {
        debug!("homography: degenerate point configuration (n = {n})");
        return None;
    }

    let mut a = DMatrix::<f64>::zeros(2 * n, 8);
    let mut b = DVector::<f64>::zeros(2 * n);

    for k in 0..n {
        let (sx, sy) = (s[k].x, s[k].y);
        let (dx, dy) = (d[k].x, d[k].y);

        // sx*h0 + sy*h1 + h2 - sx*dx*h6 - sy*dx*h7 = dx
        let r0 = 2 * k;
        a[(r0, 0)] = sx;
        a[(r0, 1)] = sy;
        a[(r0, 2)] = 1.0;
        a[(r0, 6)] = -sx * dx;
        a[(r0, 7)] = -sy * dx;
        b[r0] = dx;

        // sx*h3 + sy*h4 + h5 - sx*dy*h6 - sy*dy*h7 = dy
        let r1 = 2 * k + 1;
        a[(r1, 3)] = sx;
        a[(r1, 4)] = sy;
        a[(r1, 5)] = 1.0;
        a[(r1, 6)] = -sx * dy;
        a[(r1, 7)] = -sy * dy;
        b[r1] = dy;
    }

    let at = linalg::transpose(&a);
    let ata = linalg::multiply(&at, &a)?;
    let atb = linalg::multiply_vec(&at, &b)?;
    let Some(x) = linalg::gaussian_solve(&ata, &atb) else {
        debug!("homography: normal equations are singular (n = {n})");
        return None;
    };

    let hn = Matrix3::<f64>::new(
        x[0], x[1], x[2], //
        x[3], x[4], x[5], //
        x[6], x[7], 1.0,
    );

    if linalg::invert3x3(&hn).is_none() {
        debug!("homography: solution is a singular projective map");
        return None;
    }
    for p in &s {
        let w = hn[(2, 0)] * p.x + hn[(2, 1)] * p.y + 1.0;
        if w.is_nan() || w.abs() < SINGULAR_TOLERANCE {
            debug!("homography: a source point maps to infinity");
            return None;
        }
    }

    let t_dst_inv = linalg::invert3x3(&t_dst)?;
    let h = t_dst_inv * hn * t_src;

    Some(Homography::new(normalize_scale(h)))
}

/// [`solve`] over a list of correspondence pairs.
pub fn solve_pairs(pairs: &[CorrespondencePair]) -> Option<Homography> {
    let src: Vec<Point> = pairs.iter().map(|p| p.src).collect();
    let dst: Vec<Point> = pairs.iter().map(|p| p.dst).collect();
    solve(&src, &dst)
}
