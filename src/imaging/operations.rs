//! High-level image operations.
//!
//! These functions decide output paths and whether work is needed, then
//! call the backend. A derivative whose destination already exists is
//! skipped without touching the source, which makes repeated runs cheap
//! and lets an interrupted run resume where it stopped.

use super::backend::{BackendError, ImageBackend};
use super::params::{CropParams, Gravity, Quality, ResizeParams};
use crate::naming::Derivative;
use std::path::{Path, PathBuf};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Whether a derivative was produced on this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivativeStatus {
    Written,
    /// Destination already existed.
    Skipped,
}

/// Where a derivative lives and what happened to it.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivativeOutcome {
    pub derivative: Derivative,
    pub output: PathBuf,
    pub status: DerivativeStatus,
}

/// A backend call, planned but not executed.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannedOp {
    Resize(ResizeParams),
    Crop(CropParams),
}

/// Plan the backend call that produces `derivative` of `source` in `dest_dir`.
pub fn plan_derivative(
    source: &Path,
    dest_dir: &Path,
    derivative: Derivative,
    quality: Quality,
) -> PlannedOp {
    let output = dest_dir.join(derivative.file_name_for(source));
    match derivative {
        Derivative::Thumbnail { width, height } => PlannedOp::Resize(ResizeParams {
            source: source.to_path_buf(),
            output,
            width,
            height,
            quality,
        }),
        Derivative::Icon { size } => PlannedOp::Crop(CropParams {
            source: source.to_path_buf(),
            output,
            width: size,
            height: size,
            gravity: Gravity::North,
            quality,
        }),
    }
}

/// Create one derivative unless its destination already exists.
///
/// `dest_dir` must already exist.
pub fn create_derivative(
    backend: &impl ImageBackend,
    source: &Path,
    dest_dir: &Path,
    derivative: Derivative,
    quality: Quality,
) -> Result<DerivativeOutcome> {
    let planned = plan_derivative(source, dest_dir, derivative, quality);
    let output = match &planned {
        PlannedOp::Resize(p) => p.output.clone(),
        PlannedOp::Crop(p) => p.output.clone(),
    };

    if output.exists() {
        return Ok(DerivativeOutcome {
            derivative,
            output,
            status: DerivativeStatus::Skipped,
        });
    }

    match &planned {
        PlannedOp::Resize(params) => backend.resize(params)?,
        PlannedOp::Crop(params) => backend.crop(params)?,
    }

    Ok(DerivativeOutcome {
        derivative,
        output,
        status: DerivativeStatus::Written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Dimensions;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use tempfile::TempDir;

    #[test]
    fn get_dimensions_calls_backend() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 1920,
            height: 1080,
        }]);

        let dims = get_dimensions(&backend, Path::new("/test.jpg")).unwrap();
        assert_eq!(dims, (1920, 1080));
    }

    #[test]
    fn plan_thumbnail_is_fit_resize() {
        let planned = plan_derivative(
            Path::new("/photos/Trip/dawn.png"),
            Path::new("/photos/Trip-300x200"),
            Derivative::Thumbnail {
                width: 300,
                height: 200,
            },
            Quality::new(80),
        );

        assert_eq!(
            planned,
            PlannedOp::Resize(ResizeParams {
                source: "/photos/Trip/dawn.png".into(),
                output: "/photos/Trip-300x200/dawn-300x200.jpg".into(),
                width: 300,
                height: 200,
                quality: Quality::new(80),
            })
        );
    }

    #[test]
    fn plan_icon_is_north_crop() {
        let planned = plan_derivative(
            Path::new("/photos/Trip/dawn.jpg"),
            Path::new("/photos/Trip-75"),
            Derivative::Icon { size: 75 },
            Quality::default(),
        );

        assert!(matches!(
            planned,
            PlannedOp::Crop(CropParams {
                width: 75,
                height: 75,
                gravity: Gravity::North,
                ..
            })
        ));
    }

    #[test]
    fn create_derivative_writes_when_missing() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();

        let outcome = create_derivative(
            &backend,
            Path::new("/src/a.jpg"),
            tmp.path(),
            Derivative::Icon { size: 75 },
            Quality::default(),
        )
        .unwrap();

        assert_eq!(outcome.status, DerivativeStatus::Written);
        assert_eq!(outcome.output, tmp.path().join("a-75.jpg"));
        assert!(matches!(&backend.get_operations()[0], RecordedOp::Crop { .. }));
    }

    #[test]
    fn create_derivative_skips_existing_destination() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("a-300x200.jpg"), b"done").unwrap();
        let backend = MockBackend::new();

        let outcome = create_derivative(
            &backend,
            Path::new("/src/a.jpg"),
            tmp.path(),
            Derivative::Thumbnail {
                width: 300,
                height: 200,
            },
            Quality::default(),
        )
        .unwrap();

        assert_eq!(outcome.status, DerivativeStatus::Skipped);
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn create_derivative_propagates_backend_errors() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::failing_on(&["bad.jpg"]);

        let result = create_derivative(
            &backend,
            Path::new("/src/bad.jpg"),
            tmp.path(),
            Derivative::Icon { size: 75 },
            Quality::default(),
        );
        assert!(result.is_err());
    }
}
