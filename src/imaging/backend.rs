//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the pipelines
//! need: identify, resize (thumbnails) and crop (icons).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate and statically linked into the binary.

use super::params::{CropParams, ResizeParams};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// `Sync` so a single backend can be shared across rayon workers.
pub trait ImageBackend: Sync {
    /// Get image dimensions from the file header.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Resize to fit within bounds and write the result.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;

    /// Fill-resize, crop to exact size and write the result.
    fn crop(&self, params: &CropParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::params::{Gravity, Quality};
    use std::sync::Mutex;

    /// Mock backend that records operations without executing them.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockBackend {
        pub identify_results: Mutex<Vec<Dimensions>>,
        pub operations: Mutex<Vec<RecordedOp>>,
        /// Sources whose resize/crop fails.
        pub failing_sources: Vec<String>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Resize {
            source: String,
            output: String,
            width: u32,
            height: u32,
            quality: u8,
        },
        Crop {
            source: String,
            output: String,
            width: u32,
            height: u32,
            gravity: Gravity,
            quality: u8,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dimensions(dims: Vec<Dimensions>) -> Self {
            Self {
                identify_results: Mutex::new(dims),
                ..Self::default()
            }
        }

        pub fn failing_on(sources: &[&str]) -> Self {
            Self {
                failing_sources: sources.iter().map(|s| s.to_string()).collect(),
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        fn check_failure(&self, source: &Path) -> Result<(), BackendError> {
            let source = source.to_string_lossy();
            if self.failing_sources.iter().any(|s| source.ends_with(s.as_str())) {
                return Err(BackendError::ProcessingFailed(format!(
                    "mock failure for {source}"
                )));
            }
            Ok(())
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(path.to_string_lossy().to_string()));

            self.identify_results
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| BackendError::ProcessingFailed("No mock dimensions".to_string()))
        }

        fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
            self.check_failure(&params.source)?;
            self.operations.lock().unwrap().push(RecordedOp::Resize {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                width: params.width,
                height: params.height,
                quality: params.quality.value(),
            });
            Ok(())
        }

        fn crop(&self, params: &CropParams) -> Result<(), BackendError> {
            self.check_failure(&params.source)?;
            self.operations.lock().unwrap().push(RecordedOp::Crop {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                width: params.width,
                height: params.height,
                gravity: params.gravity,
                quality: params.quality.value(),
            });
            Ok(())
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 800,
            height: 600,
        }]);

        let result = backend.identify(Path::new("/test/image.jpg")).unwrap();
        assert_eq!(result.width, 800);
        assert_eq!(result.height, 600);

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Identify(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_records_crop_with_gravity() {
        let backend = MockBackend::new();

        backend
            .crop(&CropParams {
                source: "/source.jpg".into(),
                output: "/icon.jpg".into(),
                width: 75,
                height: 75,
                gravity: Gravity::North,
                quality: Quality::new(85),
            })
            .unwrap();

        let ops = backend.get_operations();
        assert!(matches!(
            &ops[0],
            RecordedOp::Crop {
                width: 75,
                height: 75,
                gravity: Gravity::North,
                quality: 85,
                ..
            }
        ));
    }

    #[test]
    fn mock_failure_records_nothing() {
        let backend = MockBackend::failing_on(&["bad.jpg"]);
        let result = backend.resize(&ResizeParams {
            source: "/dir/bad.jpg".into(),
            output: "/out/bad-300x200.jpg".into(),
            width: 300,
            height: 200,
            quality: Quality::default(),
        });
        assert!(result.is_err());
        assert!(backend.get_operations().is_empty());
    }
}
