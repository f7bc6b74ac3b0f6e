//! Drawing surface trait.
//!
//! The layout engine decides where everything goes; a [`SheetCanvas`]
//! only turns those decisions into output. The production canvas is
//! [`PdfCanvas`](crate::pdf::PdfCanvas). Tests use the recording canvas
//! in [`tests`].
//!
//! Coordinates passed to a canvas are PDF points, origin bottom-left.

use super::fit::Fit;
use super::geometry::Rect;
use crate::imaging::BackendError;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CanvasError {
    #[error("image error: {0}")]
    Image(#[from] BackendError),
    #[error("document error: {0}")]
    Document(String),
}

pub trait SheetCanvas {
    /// Handle to an image that is ready to draw.
    type Image;
    /// Finished document.
    type Output;

    /// Close the current page, if any, and start a new one.
    fn begin_page(&mut self) -> Result<(), CanvasError>;

    /// Load an image that will be drawn at `placed` size (points).
    ///
    /// Called before anything for the cell is drawn, so a failure leaves
    /// the page untouched.
    fn prepare_image(&mut self, path: &Path, placed: (f32, f32)) -> Result<Self::Image, CanvasError>;

    fn stroke_cell(&mut self, cell: Rect);

    /// Draw `text` with its baseline starting at `(x, baseline)`.
    fn draw_label(&mut self, text: &str, x: f32, baseline: f32, font_size: f32);

    /// Draw a prepared image at `fit` relative to the cell `origin`.
    fn draw_image(&mut self, image: Self::Image, origin: (f32, f32), fit: &Fit);

    /// Outline the image drawn at `fit` relative to the cell `origin`.
    fn stroke_image(&mut self, origin: (f32, f32), fit: &Fit);

    /// Close the last page and hand over the document.
    fn finish(&mut self) -> Result<Self::Output, CanvasError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::layout::fit::Orientation;

    /// Canvas that records every call.
    #[derive(Default)]
    pub struct RecordingCanvas {
        pub ops: Vec<DrawOp>,
        /// Paths whose `prepare_image` fails.
        pub failing_paths: Vec<String>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawOp {
        BeginPage,
        Prepare(String),
        StrokeCell(Rect),
        Label {
            text: String,
            x: f32,
            baseline: f32,
        },
        Image {
            path: String,
            origin: (f32, f32),
            orientation: Orientation,
        },
        StrokeImage {
            origin: (f32, f32),
        },
        Finish,
    }

    impl RecordingCanvas {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_on(paths: &[&str]) -> Self {
            Self {
                failing_paths: paths.iter().map(|s| s.to_string()).collect(),
                ..Self::default()
            }
        }
    }

    /// Number of pages started in a recording.
    pub fn page_count(ops: &[DrawOp]) -> usize {
        ops.iter().filter(|op| **op == DrawOp::BeginPage).count()
    }

    /// Paths drawn, in drawing order.
    pub fn drawn_images(ops: &[DrawOp]) -> Vec<String> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::Image { path, .. } => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    impl SheetCanvas for RecordingCanvas {
        type Image = String;
        type Output = Vec<DrawOp>;

        fn begin_page(&mut self) -> Result<(), CanvasError> {
            self.ops.push(DrawOp::BeginPage);
            Ok(())
        }

        fn prepare_image(&mut self, path: &Path, _placed: (f32, f32)) -> Result<String, CanvasError> {
            let path = path.to_string_lossy().to_string();
            if self.failing_paths.iter().any(|p| path.ends_with(p.as_str())) {
                return Err(CanvasError::Image(BackendError::ProcessingFailed(format!(
                    "mock decode failure for {path}"
                ))));
            }
            self.ops.push(DrawOp::Prepare(path.clone()));
            Ok(path)
        }

        fn stroke_cell(&mut self, cell: Rect) {
            self.ops.push(DrawOp::StrokeCell(cell));
        }

        fn draw_label(&mut self, text: &str, x: f32, baseline: f32, _font_size: f32) {
            self.ops.push(DrawOp::Label {
                text: text.to_string(),
                x,
                baseline,
            });
        }

        fn draw_image(&mut self, image: String, origin: (f32, f32), fit: &Fit) {
            self.ops.push(DrawOp::Image {
                path: image,
                origin,
                orientation: fit.orientation,
            });
        }

        fn stroke_image(&mut self, origin: (f32, f32), _fit: &Fit) {
            self.ops.push(DrawOp::StrokeImage { origin });
        }

        fn finish(&mut self) -> Result<Vec<DrawOp>, CanvasError> {
            self.ops.push(DrawOp::Finish);
            Ok(std::mem::take(&mut self.ops))
        }
    }
}
