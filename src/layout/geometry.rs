//! Sheet geometry: everything derived once from the grid and page size.
//!
//! All values are PDF points with the origin at the bottom-left of the
//! page. Rows are numbered top to bottom, so the y coordinate of a row
//! *decreases* as the row index grows:
//!
//! ```text
//! y = margin + canvas_h − cell_h − row × cell_h
//!
//!  page_h ┌──────────────────────────┐
//!         │ margin                   │
//!         │  ┌────┬────┬────┐ row 0  │
//!         │  ├────┼────┼────┤ row 1  │
//!         │  ├────┼────┼────┤ row 2  │
//!         │  └────┴────┴────┘        │
//!       0 └──────────────────────────┘
//!         0                      page_w
//! ```
//!
//! Dropping the inversion would fill pages bottom-up.

use super::LayoutError;
use crate::config::SheetConfig;
use serde::Serialize;

/// Points per centimetre (72 points per inch, 2.54 cm per inch).
pub const POINTS_PER_CM: f32 = 72.0 / 2.54;

/// Convert centimetres to points.
#[inline]
pub fn cm_to_pt(cm: f32) -> f32 {
    cm * POINTS_PER_CM
}

/// An axis-aligned rectangle; `(x, y)` is the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The same rectangle moved by `(dx, dy)`.
    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

/// Inputs to the sheet geometry, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub cols: u32,
    pub rows: u32,
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub gutter: f32,
    /// Height of the strip reserved for the filename label.
    pub label_height: f32,
}

impl GridSpec {
    /// Convert the centimetre-based config into points.
    pub fn from_config(config: &SheetConfig) -> Self {
        Self {
            cols: config.cols,
            rows: config.rows,
            page_width: cm_to_pt(config.page_width_cm),
            page_height: cm_to_pt(config.page_height_cm),
            margin: cm_to_pt(config.margin_cm),
            gutter: cm_to_pt(config.gutter_cm),
            label_height: config.font_size,
        }
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::from_config(&SheetConfig::default())
    }
}

/// Derived, immutable page layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetGeometry {
    pub cols: u32,
    pub rows: u32,
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub cell_width: f32,
    pub cell_height: f32,
    pub gutter: f32,
    pub label_height: f32,
    /// Largest image width that fits a cell (cell minus both gutters).
    pub max_image_width: f32,
    /// Largest image height that fits a cell (cell minus both gutters and the label strip).
    pub max_image_height: f32,
}

impl SheetGeometry {
    pub fn new(spec: GridSpec) -> Result<Self, LayoutError> {
        if spec.cols == 0 || spec.rows == 0 {
            return Err(LayoutError::Configuration(format!(
                "grid must have at least one column and row, got {}x{}",
                spec.cols, spec.rows
            )));
        }
        if !(spec.margin >= 0.0 && spec.gutter >= 0.0 && spec.label_height >= 0.0) {
            return Err(LayoutError::Configuration(
                "margin, gutter and label height must not be negative".into(),
            ));
        }

        let canvas_width = spec.page_width - spec.margin * 2.0;
        let canvas_height = spec.page_height - spec.margin * 2.0;
        let cell_width = canvas_width / spec.cols as f32;
        let cell_height = canvas_height / spec.rows as f32;

        // Written as !(x > 0) so NaN is rejected too.
        if !(cell_width > 0.0 && cell_height > 0.0) {
            return Err(LayoutError::Configuration(format!(
                "a {}x{} grid leaves no room on a {:.1}x{:.1}pt page with {:.1}pt margins",
                spec.cols, spec.rows, spec.page_width, spec.page_height, spec.margin
            )));
        }

        let max_image_width = cell_width - spec.gutter * 2.0;
        let max_image_height = cell_height - spec.gutter * 2.0 - spec.label_height;
        if !(max_image_width > 0.0 && max_image_height > 0.0) {
            return Err(LayoutError::Configuration(format!(
                "cells of {cell_width:.1}x{cell_height:.1}pt leave no room for an image \
                 after {:.1}pt gutters and a {:.1}pt label",
                spec.gutter, spec.label_height
            )));
        }

        Ok(Self {
            cols: spec.cols,
            rows: spec.rows,
            page_width: spec.page_width,
            page_height: spec.page_height,
            margin: spec.margin,
            canvas_width,
            canvas_height,
            cell_width,
            cell_height,
            gutter: spec.gutter,
            label_height: spec.label_height,
            max_image_width,
            max_image_height,
        })
    }

    /// Cells per page.
    pub fn cells_per_page(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    /// `(column, row)` of a zero-based cell index on a page.
    pub fn cell_position(&self, index: usize) -> (u32, u32) {
        let cols = self.cols as usize;
        ((index % cols) as u32, (index / cols) as u32)
    }

    /// Bottom-left corner of a cell in page space.
    pub fn cell_origin(&self, index: usize) -> (f32, f32) {
        let (col, row) = self.cell_position(index);
        let x = self.margin + col as f32 * self.cell_width;
        let y = self.margin + self.canvas_height - self.cell_height - row as f32 * self.cell_height;
        (x, y)
    }

    /// Page-space rectangle of a cell.
    pub fn cell_rect(&self, index: usize) -> Rect {
        let (x, y) = self.cell_origin(index);
        Rect::new(x, y, self.cell_width, self.cell_height)
    }
}
