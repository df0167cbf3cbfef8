//! Mapping between on-screen positions and native media pixels.
//!
//! Media is shown "contain"-fitted inside its container: letterboxed when it
//! is relatively wider than the container, pillarboxed when it is relatively
//! taller. [`screen_to_media`] and [`media_to_screen_percent`] both go through
//! [`contain_fit`], so a round trip is exact up to floating-point error.

use crate::Point;
use serde::{Deserialize, Serialize};

/// Container rectangle in client (screen) coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Intrinsic media size in native pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MediaSize {
    pub width: f64,
    pub height: f64,
}

impl MediaSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Render rectangle of the fitted media, relative to the container origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitRect {
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Result of [`screen_to_media`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MediaPoint {
    /// Native media pixel coordinates.
    pub point: Point,
    /// The click landed in a letterbox/pillarbox bar or outside the media.
    pub is_out_of_bounds: bool,
}

/// Position as a percentage of the container size, for absolutely positioned overlays.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenPercent {
    pub left_percent: f64,
    pub top_percent: f64,
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// "Contain" fit of `media` into `container`, `None` for empty or non-finite sizes.
pub fn contain_fit(container: &Rect, media: MediaSize) -> Option<FitRect> {
    if !positive(container.width)
        || !positive(container.height)
        || !positive(media.width)
        || !positive(media.height)
    {
        return None;
    }

    let container_aspect = container.width / container.height;
    let media_aspect = media.width / media.height;

    if media_aspect > container_aspect {
        // Letterbox: full width, bars above and below.
        let height = container.width / media_aspect;
        Some(FitRect {
            offset_x: 0.0,
            offset_y: (container.height - height) * 0.5,
            width: container.width,
            height,
        })
    } else {
        // Pillarbox: full height, bars left and right.
        let width = container.height * media_aspect;
        Some(FitRect {
            offset_x: (container.width - width) * 0.5,
            offset_y: 0.0,
            width,
            height: container.height,
        })
    }
}

/// Convert a client-space point into native media pixels.
pub fn screen_to_media(client: Point, container: &Rect, media: MediaSize) -> Option<MediaPoint> {
    let fit = contain_fit(container, media)?;

    let nx = (client.x - container.left - fit.offset_x) / fit.width;
    let ny = (client.y - container.top - fit.offset_y) / fit.height;
    let is_out_of_bounds = !(0.0..=1.0).contains(&nx) || !(0.0..=1.0).contains(&ny);

    Some(MediaPoint {
        point: Point::new(nx * media.width, ny * media.height),
        is_out_of_bounds,
    })
}

/// Convert native media pixels into container-relative percentages.
pub fn media_to_screen_percent(
    media_point: Point,
    container: &Rect,
    media: MediaSize,
) -> Option<ScreenPercent> {
    let fit = contain_fit(container, media)?;

    let nx = media_point.x / media.width;
    let ny = media_point.y / media.height;
    let x = fit.offset_x + nx * fit.width;
    let y = fit.offset_y + ny * fit.height;

    Some(ScreenPercent {
        left_percent: x / container.width * 100.0,
        top_percent: y / container.height * 100.0,
    })
}

/// Convert container-relative percentages back to client coordinates.
pub fn percent_to_client(percent: ScreenPercent, container: &Rect) -> Point {
    Point::new(
        container.left + percent.left_percent / 100.0 * container.width,
        container.top + percent.top_percent / 100.0 * container.height,
    )
}
