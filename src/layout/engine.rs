//! The grid cursor.
//!
//! A [`GridLayout`] owns its canvas and a cursor counting the cells used
//! on the current page. Placing the `k`-th accepted image (zero-based)
//! always lands it at
//!
//! ```text
//! column = k mod C
//! row    = (k div C) mod R
//! page   = k div (C × R) + 1
//! ```
//!
//! Rejected images never move the cursor. A new page is only started when
//! an image actually needs it, so a sheet never ends on an empty page
//! (except for a sheet with no images at all, which has exactly one).

use super::LayoutError;
use super::canvas::SheetCanvas;
use super::fit::{Orientation, fit_image};
use super::geometry::{GridSpec, Rect, SheetGeometry};
use super::label::fit_label;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// An image to place: where it lives and its pixel size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl ImageDescriptor {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
        }
    }
}

/// Which decorations each cell gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub cell_border: bool,
    pub image_border: bool,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            cell_border: true,
            image_border: true,
        }
    }
}

/// Where and how one image was placed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellPlacement {
    pub path: PathBuf,
    /// 1-based page number.
    pub page: usize,
    pub column: u32,
    pub row: u32,
    /// Bottom-left corner of the cell.
    pub origin: (f32, f32),
    pub orientation: Orientation,
    pub scale: f32,
    /// Draw offset from the origin, in the (possibly rotated) drawing frame.
    pub offset: (f32, f32),
    /// Image size in the drawing frame.
    pub scaled: (f32, f32),
    /// Page-space cell rectangle.
    pub cell: Rect,
    /// Page-space box covered by the image.
    pub image: Rect,
    /// Label as drawn, possibly truncated.
    pub label: String,
}

pub struct GridLayout<C: SheetCanvas> {
    geometry: SheetGeometry,
    style: CellStyle,
    canvas: C,
    /// Cells used on the current page.
    cursor: usize,
    /// Pages started so far.
    pages: usize,
    finished: bool,
}

impl<C: SheetCanvas> GridLayout<C> {
    /// Validate the grid and open the first page.
    pub fn new(spec: GridSpec, style: CellStyle, mut canvas: C) -> Result<Self, LayoutError> {
        let geometry = SheetGeometry::new(spec)?;
        canvas.begin_page()?;
        Ok(Self {
            geometry,
            style,
            canvas,
            cursor: 0,
            pages: 1,
            finished: false,
        })
    }

    pub fn geometry(&self) -> &SheetGeometry {
        &self.geometry
    }

    pub fn page_count(&self) -> usize {
        self.pages
    }

    /// Place the next image.
    ///
    /// On [`LayoutError::InvalidImage`] nothing is drawn and the cursor
    /// stays put, so the caller can log the image and carry on.
    pub fn place(&mut self, image: &ImageDescriptor) -> Result<CellPlacement, LayoutError> {
        if self.finished {
            return Err(LayoutError::Sequence);
        }
        if image.width == 0 || image.height == 0 {
            return Err(LayoutError::InvalidImage {
                path: image.path.clone(),
                reason: format!("unusable dimensions {}x{}", image.width, image.height),
            });
        }

        let new_page = self.cursor == self.geometry.cells_per_page();
        let index = if new_page { 0 } else { self.cursor };
        let fit = fit_image(image.width, image.height, &self.geometry);

        let prepared = self
            .canvas
            .prepare_image(&image.path, fit.scaled)
            .map_err(|e| LayoutError::InvalidImage {
                path: image.path.clone(),
                reason: e.to_string(),
            })?;

        if new_page {
            self.canvas.begin_page()?;
            self.pages += 1;
        }

        let cell = self.geometry.cell_rect(index);
        let origin = (cell.x, cell.y);
        if self.style.cell_border {
            self.canvas.stroke_cell(cell);
        }

        let label = self.draw_label(&image.path, cell);
        self.canvas.draw_image(prepared, origin, &fit);
        if self.style.image_border {
            self.canvas.stroke_image(origin, &fit);
        }

        self.cursor = index + 1;
        let (column, row) = self.geometry.cell_position(index);
        Ok(CellPlacement {
            path: image.path.clone(),
            page: self.pages,
            column,
            row,
            origin,
            orientation: fit.orientation,
            scale: fit.scale,
            offset: fit.offset,
            scaled: fit.scaled,
            cell,
            image: fit.bounds.translated(cell.x, cell.y),
            label,
        })
    }

    /// Filename centred under the image, baseline halfway up the label strip.
    fn draw_label(&mut self, path: &Path, cell: Rect) -> String {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        let font_size = self.geometry.label_height;
        let available = cell.width - self.geometry.gutter * 2.0;
        let text = fit_label(&name, available, font_size);
        if !text.is_empty() {
            let width = super::label::text_width(&text, font_size);
            let x = cell.x + (cell.width - width) / 2.0;
            let baseline = cell.y + self.geometry.label_height / 2.0;
            self.canvas.draw_label(&text, x, baseline, font_size);
        }
        text
    }

    /// Close the last page and return the finished document.
    pub fn finish(&mut self) -> Result<C::Output, LayoutError> {
        if self.finished {
            return Err(LayoutError::Sequence);
        }
        self.finished = true;
        Ok(self.canvas.finish()?)
    }
}
