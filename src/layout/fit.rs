//! Orientation and scale of one image inside its cell.
//!
//! A landscape or square image is drawn upright. A portrait image is
//! turned a quarter turn counter-clockwise so its long side runs along
//! the cell's width, which keeps portraits legible in wide cells.
//!
//! ## Rotated frame
//!
//! Rotation happens about the cell origin. In the rotated frame a point
//! `(u, v)` lands at page offset `(-v, u)` from the origin, so an image
//! drawn at `(u0, v0)` with frame size `(w, h)` covers the page-space box
//! `[-v0 - h, -v0] × [u0, u0 + w]`. Solving for a box centred inside the
//! cell at `(bx, by)` with size `(h, w)` gives:
//!
//! ```text
//! u0 = by
//! v0 = -(bx + h)
//! ```
//!
//! The ratio is chosen with the cell axes swapped (image width against
//! the available height) so the rotated box always fits.

use super::geometry::{Rect, SheetGeometry};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Normal,
    /// Quarter turn counter-clockwise about the cell origin.
    Rotated,
}

/// How an image is drawn in its cell, relative to the cell origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    pub orientation: Orientation,
    pub scale: f32,
    /// Image size after scaling, in the (possibly rotated) drawing frame.
    pub scaled: (f32, f32),
    /// Where the image is drawn, in the (possibly rotated) drawing frame.
    pub offset: (f32, f32),
    /// The box the image covers, in unrotated cell-local coordinates.
    pub bounds: Rect,
}

/// Pick the largest ratio that keeps both sides within bounds.
///
/// When both sides bind at once the width ratio is used.
fn bounded_ratio(width: f32, height: f32, max_width: f32, max_height: f32) -> f32 {
    let width_ratio = max_width / width;
    let height_ratio = max_height / height;
    if width_ratio <= height_ratio {
        width_ratio
    } else {
        height_ratio
    }
}

/// Fit a `width × height` image into a cell of `geometry`.
///
/// Both dimensions must be non-zero.
pub fn fit_image(width: u32, height: u32, geometry: &SheetGeometry) -> Fit {
    let (w, h) = (width as f32, height as f32);
    let max_w = geometry.max_image_width;
    let max_h = geometry.max_image_height;
    let floor = geometry.gutter + geometry.label_height;

    if width >= height {
        let scale = bounded_ratio(w, h, max_w, max_h);
        let (sw, sh) = (w * scale, h * scale);
        let x = geometry.gutter + (max_w - sw) / 2.0;
        let y = floor + (max_h - sh) / 2.0;
        Fit {
            orientation: Orientation::Normal,
            scale,
            scaled: (sw, sh),
            offset: (x, y),
            bounds: Rect::new(x, y, sw, sh),
        }
    } else {
        let scale = bounded_ratio(w, h, max_h, max_w);
        let (sw, sh) = (w * scale, h * scale);
        // On the page the box is sh wide and sw tall.
        let bx = geometry.gutter + (max_w - sh) / 2.0;
        let by = floor + (max_h - sw) / 2.0;
        Fit {
            orientation: Orientation::Rotated,
            scale,
            scaled: (sw, sh),
            offset: (by, -(bx + sh)),
            bounds: Rect::new(bx, by, sh, sw),
        }
    }
}
