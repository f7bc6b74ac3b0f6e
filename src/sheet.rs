//! Contact-sheet pipeline: folders in, one PDF out.
//!
//! 1. Each argument is checked to be a folder; anything else is reported
//!    and skipped.
//! 2. Images are collected lazily, folder by folder in argument order,
//!    skipping derivative folders written by `thumbs`.
//! 3. Each image is identified (header only) and handed to the
//!    [`GridLayout`]. Unreadable images are reported and skipped without
//!    leaving a gap in the grid.
//! 4. The finished document is saved, optionally with a JSON record of
//!    every placement.
//!
//! Progress goes out as [`SheetEvent`]s over an optional channel; the CLI
//! prints them from a separate thread.

use crate::collect::{CollectError, ImageFolder, collect_images};
use crate::config::{Config, ConfigError};
use crate::imaging::{ImageBackend, RustBackend, get_dimensions};
use crate::layout::{
    CellPlacement, CellStyle, GridLayout, GridSpec, ImageDescriptor, LayoutError, SheetCanvas,
};
use crate::naming::Derivatives;
use crate::pdf::{PdfCanvas, PdfStyle};
use lopdf::Document;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("Failed to save {}: {reason}", path.display())]
    Save { path: PathBuf, reason: String },
}

/// Progress events emitted while a sheet is built.
#[derive(Debug, Clone)]
pub enum SheetEvent {
    FolderStarted { path: PathBuf },
    NotAFolder { path: PathBuf },
    /// `index` is the 1-based position among placed images.
    ImagePlaced { index: usize, placement: CellPlacement },
    ImageSkipped { path: PathBuf, reason: String },
    WalkFailed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedImage {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything that happened while building a sheet.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SheetReport {
    pub pages: usize,
    pub placements: Vec<CellPlacement>,
    pub skipped: Vec<SkippedImage>,
}

fn emit(progress: Option<&Sender<SheetEvent>>, event: SheetEvent) {
    if let Some(tx) = progress {
        tx.send(event).ok();
    }
}

/// Lazily yield the images of every folder in `folders`, in order.
pub fn gather_images<'a>(
    folders: &'a [PathBuf],
    recursive: bool,
    derivatives: &'a Derivatives,
    progress: Option<&'a Sender<SheetEvent>>,
) -> impl Iterator<Item = PathBuf> + 'a {
    folders
        .iter()
        .filter_map(move |path| match ImageFolder::new(path) {
            Ok(folder) => {
                emit(progress, SheetEvent::FolderStarted { path: path.clone() });
                Some(folder)
            }
            Err(_) => {
                emit(progress, SheetEvent::NotAFolder { path: path.clone() });
                None
            }
        })
        .flat_map(move |folder| {
            collect_images(&folder, recursive, move |dir| derivatives.should_descend(dir))
        })
        .filter_map(move |entry: Result<PathBuf, CollectError>| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                emit(progress, SheetEvent::WalkFailed { reason: e.to_string() });
                None
            }
        })
}

/// Identify and place each image in `paths`, in order.
///
/// Per-image failures are recorded in the report; only errors that leave
/// the sheet unusable are returned.
pub fn place_all<C, B, I>(
    grid: &mut GridLayout<C>,
    backend: &B,
    paths: I,
    progress: Option<&Sender<SheetEvent>>,
) -> Result<SheetReport, SheetError>
where
    C: SheetCanvas,
    B: ImageBackend,
    I: IntoIterator<Item = PathBuf>,
{
    let mut report = SheetReport::default();
    let skip = |report: &mut SheetReport, path: PathBuf, reason: String| {
        emit(
            progress,
            SheetEvent::ImageSkipped {
                path: path.clone(),
                reason: reason.clone(),
            },
        );
        report.skipped.push(SkippedImage { path, reason });
    };

    for path in paths {
        let (width, height) = match get_dimensions(backend, &path) {
            Ok(dims) => dims,
            Err(e) => {
                skip(&mut report, path, e.to_string());
                continue;
            }
        };

        match grid.place(&ImageDescriptor::new(path, width, height)) {
            Ok(placement) => {
                report.placements.push(placement.clone());
                emit(
                    progress,
                    SheetEvent::ImagePlaced {
                        index: report.placements.len(),
                        placement,
                    },
                );
            }
            Err(LayoutError::InvalidImage { path, reason }) => skip(&mut report, path, reason),
            Err(e) => return Err(e.into()),
        }
    }

    report.pages = grid.page_count();
    Ok(report)
}

/// Build a sheet from folders onto any canvas, with any backend.
pub fn build_sheet<C, B>(
    grid: &mut GridLayout<C>,
    backend: &B,
    folders: &[PathBuf],
    recursive: bool,
    derivatives: &Derivatives,
    progress: Option<&Sender<SheetEvent>>,
) -> Result<SheetReport, SheetError>
where
    C: SheetCanvas,
    B: ImageBackend,
{
    let images = gather_images(folders, recursive, derivatives, progress);
    place_all(grid, backend, images, progress)
}

/// Build the PDF contact sheet for `folders` as configured.
pub fn make_contact_sheet(
    folders: &[PathBuf],
    config: &Config,
    recursive: bool,
    progress: Option<Sender<SheetEvent>>,
) -> Result<(Document, SheetReport), SheetError> {
    let canvas = PdfCanvas::new(PdfStyle::from_config(config)?);
    let style = CellStyle {
        cell_border: config.sheet.draw_cell_border,
        image_border: config.sheet.draw_image_border,
    };
    let mut grid = GridLayout::new(GridSpec::from_config(&config.sheet), style, canvas)?;
    let derivatives = Derivatives::new(config.thumbnails.icon_size);

    let report = build_sheet(
        &mut grid,
        &RustBackend::new(),
        folders,
        recursive,
        &derivatives,
        progress.as_ref(),
    )?;
    let doc = grid.finish()?;
    Ok((doc, report))
}

/// Write the document to `path`.
pub fn save_document(doc: &mut Document, path: &Path) -> Result<(), SheetError> {
    doc.save(path).map(|_| ()).map_err(|e| SheetError::Save {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Write the placement report as pretty JSON.
pub fn write_layout_report(report: &SheetReport, path: &Path) -> Result<(), SheetError> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}
