//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::Gravity;

/// Points per inch in PDF user space.
const POINTS_PER_INCH: f32 = 72.0;

/// Calculate dimensions that fit inside `bounds` while keeping the source
/// aspect ratio. The binding axis matches exactly; neither axis drops below 1.
///
/// # Examples
/// ```
/// # use contactsheet::imaging::calculate_fit_dimensions;
/// // 4000x3000 into 1200x800 → height binds
/// assert_eq!(calculate_fit_dimensions((4000, 3000), (1200, 800)), (1067, 800));
/// ```
pub fn calculate_fit_dimensions(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    let w_ratio = max_w as f64 / src_w as f64;
    let h_ratio = max_h as f64 / src_h as f64;
    let ratio = w_ratio.min(h_ratio);

    let w = ((src_w as f64 * ratio).round() as u32).max(1);
    let h = ((src_h as f64 * ratio).round() as u32).max(1);
    (w, h)
}

/// Calculate dimensions needed to fill a target area (resize before crop).
///
/// Returns dimensions that completely cover the target area while maintaining
/// the source aspect ratio. One dimension will match exactly, the other may exceed.
pub fn calculate_fill_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    if src_aspect > tgt_aspect {
        // Source is wider: height will match, width will exceed
        let h = tgt_h;
        let w = ((h as f64 * src_aspect).round() as u32).max(tgt_w);
        (w, h)
    } else {
        // Source is taller: width will match, height will exceed
        let w = tgt_w;
        let h = ((w as f64 / src_aspect).round() as u32).max(tgt_h);
        (w, h)
    }
}

/// Top-left corner of a `crop` sized window inside a `filled` image.
///
/// Horizontal slack is always split evenly; vertical slack depends on gravity.
pub fn crop_origin(filled: (u32, u32), crop: (u32, u32), gravity: Gravity) -> (u32, u32) {
    let x = filled.0.saturating_sub(crop.0) / 2;
    let y = match gravity {
        Gravity::North => 0,
    };
    (x, y)
}

/// Pixel size to embed an image at, given its placed size in points.
///
/// The placed size is converted to pixels at `dpi`, and the source is
/// downsampled to fit. Sources already smaller than that are kept as-is.
pub fn calculate_embed_dimensions(source: (u32, u32), placed_pt: (f32, f32), dpi: u32) -> (u32, u32) {
    let scale = dpi as f32 / POINTS_PER_INCH;
    let target_w = ((placed_pt.0 * scale).ceil() as u32).max(1);
    let target_h = ((placed_pt.1 * scale).ceil() as u32).max(1);

    if source.0 <= target_w && source.1 <= target_h {
        source
    } else {
        calculate_fit_dimensions(source, (target_w, target_h))
    }
}
