//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`operations`](super::operations) module (which
//! decides what files to create and where) and the
//! [`backend`](super::backend) (which does the pixel work), so tests can
//! swap in a recording mock.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG quality (1–100, default 90). Clamped on construction.
//! - [`Gravity`]: Which part of an over-filled image a crop keeps.
//! - [`ResizeParams`]: Fit-within resize: source, output, bounds, quality.
//! - [`CropParams`]: Fill + crop to an exact size anchored at a gravity.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Anchor for crops. `North` keeps the top edge (faces, skylines).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gravity {
    #[default]
    North,
}

/// Resize preserving aspect ratio so the result fits inside `width × height`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}

/// Resize to cover `width × height`, then crop to exactly that size.
#[derive(Debug, Clone, PartialEq)]
pub struct CropParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub gravity: Gravity,
    pub quality: Quality,
}
