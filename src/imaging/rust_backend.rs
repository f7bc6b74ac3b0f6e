//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `ImageReader::into_dimensions` (header only, format sniffed from content) |
//! | Decode (JPEG, PNG, GIF) | `image::ImageReader` |
//! | Resize | `DynamicImage::resize` with `Lanczos3` |
//! | Icon crop | `resize_exact` to fill + `crop_imm` at the gravity origin |
//! | Encode | `image::codecs::jpeg::JpegEncoder` (all outputs are JPEG) |
//!
//! JPEG has no alpha channel, so every output is flattened to RGB8 first.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{calculate_embed_dimensions, calculate_fill_dimensions, crop_origin};
use super::params::{CropParams, Quality, ResizeParams};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::io::Write;
use std::path::Path;

/// Pure Rust backend using the `image` crate.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Encode as baseline JPEG into any writer.
fn write_jpeg<W: Write>(img: &DynamicImage, writer: W, quality: Quality) -> Result<(), BackendError> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let encoder = JpegEncoder::new_with_quality(writer, quality.value());
    rgb.write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}

/// Save as JPEG. Derivatives are always JPEG regardless of the source format.
fn save_jpeg(img: &DynamicImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let mut writer = std::io::BufWriter::new(file);
    write_jpeg(img, &mut writer, quality)?;
    writer.flush().map_err(BackendError::Io)
}

/// JPEG bytes ready to embed in a document, with their pixel size.
#[derive(Debug, Clone)]
pub struct EncodedJpeg {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Decode `path`, downsample it for a `placed_pt` sized slot at `dpi`, and
/// re-encode as JPEG in memory.
pub fn encode_jpeg_within(
    path: &Path,
    placed_pt: (f32, f32),
    dpi: u32,
    quality: Quality,
) -> Result<EncodedJpeg, BackendError> {
    let img = load_image(path)?;
    let (width, height) = calculate_embed_dimensions((img.width(), img.height()), placed_pt, dpi);
    let img = if (width, height) == (img.width(), img.height()) {
        img
    } else {
        img.resize_exact(width, height, FilterType::Lanczos3)
    };

    let mut data = Vec::new();
    write_jpeg(&img, &mut data, quality)?;
    Ok(EncodedJpeg {
        width: img.width(),
        height: img.height(),
        data,
    })
}

impl ImageBackend for RustBackend {
    /// Same format detection as decoding, so a file is readable for both
    /// pipelines or for neither.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = ImageReader::open(path)
            .map_err(BackendError::Io)?
            .with_guessed_format()
            .map_err(BackendError::Io)?
            .into_dimensions()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
            })?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let resized = img.resize(params.width, params.height, FilterType::Lanczos3);
        save_jpeg(&resized, &params.output, params.quality)
    }

    fn crop(&self, params: &CropParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let target = (params.width, params.height);

        let (fill_w, fill_h) = calculate_fill_dimensions((img.width(), img.height()), target);
        let filled = img.resize_exact(fill_w, fill_h, FilterType::Lanczos3);
        let (x, y) = crop_origin((fill_w, fill_h), target, params.gravity);
        let cropped = filled.crop_imm(x, y, params.width, params.height);

        save_jpeg(&cropped, &params.output, params.quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::Gravity;
    use crate::test_helpers::{create_test_jpeg, create_test_png};

    #[test]
    fn identify_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        create_test_jpeg(&path, 200, 150);

        let backend = RustBackend::new();
        let dims = backend.identify(&path).unwrap();
        assert_eq!(dims.width, 200);
        assert_eq!(dims.height, 150);
    }

    #[test]
    fn identify_nonexistent_file_errors() {
        let backend = RustBackend::new();
        let result = backend.identify(Path::new("/nonexistent/image.jpg"));
        assert!(result.is_err());
    }

    #[test]
    fn identify_garbage_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.jpg");
        std::fs::write(&path, b"not an image").unwrap();

        assert!(RustBackend::new().identify(&path).is_err());
    }

    #[test]
    fn identify_sniffs_content_not_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let png = tmp.path().join("real.png");
        create_test_png(&png, 120, 90);
        let misnamed = tmp.path().join("misnamed.jpg");
        std::fs::rename(&png, &misnamed).unwrap();

        let dims = RustBackend::new().identify(&misnamed).unwrap();
        assert_eq!((dims.width, dims.height), (120, 90));
    }

    #[test]
    fn resize_png_to_jpeg_within_bounds() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.png");
        create_test_png(&source, 400, 300);

        let output = tmp.path().join("resized.jpg");
        let backend = RustBackend::new();
        backend
            .resize(&ResizeParams {
                source,
                output: output.clone(),
                width: 100,
                height: 100,
                quality: Quality::new(85),
            })
            .unwrap();

        let (w, h) = image::image_dimensions(&output).unwrap();
        assert_eq!((w, h), (100, 75));
        assert_eq!(
            image::ImageFormat::from_path(&output).unwrap(),
            image::ImageFormat::Jpeg
        );
    }

    #[test]
    fn crop_produces_exact_square() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 600, 800);

        let output = tmp.path().join("icon.jpg");
        RustBackend::new()
            .crop(&CropParams {
                source,
                output: output.clone(),
                width: 75,
                height: 75,
                gravity: Gravity::North,
                quality: Quality::new(85),
            })
            .unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (75, 75));
    }

    #[test]
    fn encode_jpeg_within_downsamples() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("big.jpg");
        create_test_jpeg(&source, 800, 600);

        // 72pt slot at 72 dpi → 72px wide
        let encoded = encode_jpeg_within(&source, (72.0, 54.0), 72, Quality::new(80)).unwrap();
        assert_eq!((encoded.width, encoded.height), (72, 54));
        assert_eq!(&encoded.data[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn encode_jpeg_within_rejects_undecodable() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.png");
        std::fs::write(&path, b"garbage").unwrap();

        assert!(encode_jpeg_within(&path, (10.0, 10.0), 72, Quality::default()).is_err());
    }
}
