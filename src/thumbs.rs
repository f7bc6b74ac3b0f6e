//! Thumbnail and icon generation.
//!
//! For every folder that directly contains images, each derivative gets a
//! sibling output folder named after it (`Trip-300x200/`, `Trip-75/`) and
//! one JPEG per source image inside. Outputs that already exist are left
//! alone, so re-running over the same folders only fills in what is
//! missing.
//!
//! Folders are independent and processed in parallel on the rayon pool;
//! images within a folder are processed in order. Progress is reported as
//! [`ThumbEvent`]s over an optional channel.
//!
//! Outputs are named after the source stem, so `a.jpg` and `a.png` in one
//! folder would share `a-75.jpg`. The first by name keeps the output; the
//! other is reported as a [`ThumbEvent::NameCollision`] and not processed.

use crate::collect::{ImageFolder, collect_folders};
use crate::config::{Config, ThumbnailsConfig};
use crate::imaging::{
    BackendError, DerivativeOutcome, DerivativeStatus, ImageBackend, Quality, RustBackend,
    create_derivative,
};
use crate::naming::{Derivative, Derivatives};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThumbError {
    #[error("cannot create {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", derivative.label())]
    Derivative {
        derivative: Derivative,
        #[source]
        source: BackendError,
    },
}

/// Which derivatives to produce and where to look.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThumbOptions {
    pub recursive: bool,
    pub icons: bool,
    pub thumbnails: bool,
}

#[derive(Debug)]
pub enum ThumbEvent {
    NotAFolder {
        path: PathBuf,
    },
    WalkFailed {
        reason: String,
    },
    FolderStarted {
        path: PathBuf,
        images: usize,
    },
    /// An output folder could not be created; its derivatives count as failed.
    FolderFailed {
        error: ThumbError,
    },
    ImageDone {
        source: PathBuf,
        outcomes: Vec<DerivativeOutcome>,
        failures: Vec<ThumbError>,
    },
    /// `source` maps to the same output names as `kept` and was not processed.
    NameCollision {
        source: PathBuf,
        kept: PathBuf,
    },
}

/// Totals over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ThumbReport {
    /// Folders visited, including those without images.
    pub folders: usize,
    pub images: usize,
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Images left out because another source already claimed their names.
    pub collisions: usize,
}

impl ThumbReport {
    pub fn merge(self, other: Self) -> Self {
        Self {
            folders: self.folders + other.folders,
            images: self.images + other.images,
            written: self.written + other.written,
            skipped: self.skipped + other.skipped,
            failed: self.failed + other.failed,
            collisions: self.collisions + other.collisions,
        }
    }
}

/// Derivatives requested by `options`: icon first, then thumbnail sizes
/// in config order.
pub fn derivative_set(config: &ThumbnailsConfig, options: &ThumbOptions) -> Vec<Derivative> {
    let mut set = Vec::new();
    if options.icons {
        set.push(Derivative::Icon {
            size: config.icon_size,
        });
    }
    if options.thumbnails {
        set.extend(
            config
                .sizes
                .iter()
                .map(|&[width, height]| Derivative::Thumbnail { width, height }),
        );
    }
    set
}

fn emit(progress: Option<&Sender<ThumbEvent>>, event: ThumbEvent) {
    if let Some(tx) = progress {
        tx.send(event).ok();
    }
}

pub fn generate(
    folders: &[PathBuf],
    config: &Config,
    options: &ThumbOptions,
    progress: Option<Sender<ThumbEvent>>,
) -> ThumbReport {
    generate_with_backend(&RustBackend::new(), folders, config, options, progress)
}

/// Generate derivatives using a specific backend (allows testing with mock).
pub fn generate_with_backend(
    backend: &impl ImageBackend,
    folders: &[PathBuf],
    config: &Config,
    options: &ThumbOptions,
    progress: Option<Sender<ThumbEvent>>,
) -> ThumbReport {
    let set = derivative_set(&config.thumbnails, options);
    if set.is_empty() {
        return ThumbReport::default();
    }
    let naming = Derivatives::new(config.thumbnails.icon_size);
    let quality = Quality::new(config.thumbnails.quality);
    let progress = progress.as_ref();

    let mut targets = Vec::new();
    for path in folders {
        let root = match ImageFolder::new(path) {
            Ok(root) => root,
            Err(_) => {
                emit(progress, ThumbEvent::NotAFolder { path: path.clone() });
                continue;
            }
        };
        for folder in collect_folders(&root, options.recursive, |dir| naming.should_descend(dir)) {
            match folder {
                Ok(folder) => targets.push(folder),
                Err(e) => emit(progress, ThumbEvent::WalkFailed { reason: e.to_string() }),
            }
        }
    }

    targets
        .par_iter()
        .map(|folder| process_folder(backend, folder, &set, quality, progress))
        .reduce(ThumbReport::default, ThumbReport::merge)
}

fn process_folder(
    backend: &impl ImageBackend,
    folder: &ImageFolder,
    set: &[Derivative],
    quality: Quality,
    progress: Option<&Sender<ThumbEvent>>,
) -> ThumbReport {
    let mut report = ThumbReport {
        folders: 1,
        ..ThumbReport::default()
    };

    let mut images = Vec::new();
    for entry in folder.images() {
        match entry {
            Ok(path) => images.push(path),
            Err(e) => emit(progress, ThumbEvent::WalkFailed { reason: e.to_string() }),
        }
    }
    emit(
        progress,
        ThumbEvent::FolderStarted {
            path: folder.path().to_path_buf(),
            images: images.len(),
        },
    );
    if images.is_empty() {
        return report;
    }
    report.images = images.len();

    let images = drop_name_collisions(images, &mut report, progress);
    let destinations = prepare_destinations(folder.path(), set, images.len(), &mut report, progress);

    for source in &images {
        let mut outcomes = Vec::new();
        let mut failures = Vec::new();
        for (derivative, dest) in &destinations {
            match create_derivative(backend, source, dest, *derivative, quality) {
                Ok(outcome) => {
                    match outcome.status {
                        DerivativeStatus::Written => report.written += 1,
                        DerivativeStatus::Skipped => report.skipped += 1,
                    }
                    outcomes.push(outcome);
                }
                Err(error) => {
                    report.failed += 1;
                    failures.push(ThumbError::Derivative {
                        derivative: *derivative,
                        source: error,
                    });
                }
            }
        }
        emit(
            progress,
            ThumbEvent::ImageDone {
                source: source.clone(),
                outcomes,
                failures,
            },
        );
    }

    report
}

/// Keep the first image of every file stem. Later ones would overwrite or
/// be mistaken for its outputs.
fn drop_name_collisions(
    images: Vec<PathBuf>,
    report: &mut ThumbReport,
    progress: Option<&Sender<ThumbEvent>>,
) -> Vec<PathBuf> {
    let mut claimed: HashMap<OsString, PathBuf> = HashMap::new();
    let mut kept = Vec::with_capacity(images.len());
    for image in images {
        let stem = image.file_stem().map(OsString::from).unwrap_or_default();
        match claimed.get(&stem) {
            Some(first) => {
                report.collisions += 1;
                emit(
                    progress,
                    ThumbEvent::NameCollision {
                        source: image,
                        kept: first.clone(),
                    },
                );
            }
            None => {
                claimed.insert(stem, image.clone());
                kept.push(image);
            }
        }
    }
    kept
}

/// Create the output folder of each derivative. A derivative whose folder
/// cannot be created is dropped and all its images count as failed.
fn prepare_destinations(
    folder: &Path,
    set: &[Derivative],
    image_count: usize,
    report: &mut ThumbReport,
    progress: Option<&Sender<ThumbEvent>>,
) -> Vec<(Derivative, PathBuf)> {
    let mut destinations = Vec::with_capacity(set.len());
    for derivative in set {
        let dest = derivative.folder_for(folder);
        match std::fs::create_dir_all(&dest) {
            Ok(()) => destinations.push((*derivative, dest)),
            Err(source) => {
                report.failed += image_count;
                emit(
                    progress,
                    ThumbEvent::FolderFailed {
                        error: ThumbError::CreateDir { path: dest, source },
                    },
                );
            }
        }
    }
    destinations
}
