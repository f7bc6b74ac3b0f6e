//! Contact-sheet grid layout.
//!
//! Images are placed one at a time into a fixed grid of equal cells,
//! left to right then top to bottom, starting a new page whenever the
//! grid fills. Each cell holds the image, scaled to fit above a one-line
//! filename label, plus optional cell and image borders.
//!
//! | Module | Responsibility |
//! |---|---|
//! | `geometry` | Page, canvas and cell sizes derived from the grid config |
//! | `fit` | Orientation, scale and offset of one image in a cell |
//! | `label` | Helvetica widths and label truncation |
//! | `canvas` | The [`SheetCanvas`] drawing trait |
//! | `engine` | [`GridLayout`]: the cursor, paging and draw order |
//!
//! Everything except the canvas is pure, so layout decisions are tested
//! without producing a document.

pub mod canvas;
mod engine;
pub mod fit;
pub mod geometry;
pub mod label;

pub use canvas::{CanvasError, SheetCanvas};
pub use engine::{CellPlacement, CellStyle, GridLayout, ImageDescriptor};
pub use fit::{Fit, Orientation, fit_image};
pub use geometry::{GridSpec, Rect, SheetGeometry, cm_to_pt};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("invalid sheet configuration: {0}")]
    Configuration(String),
    #[error("cannot place {}: {reason}", path.display())]
    InvalidImage { path: PathBuf, reason: String },
    #[error("the sheet has already been finished")]
    Sequence,
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}
