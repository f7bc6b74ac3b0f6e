//! Image processing in pure Rust, via the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` (header only, no decode) |
//! | **Thumbnail** | `resize` with Lanczos3, fit within bounds |
//! | **Icon** | fill-resize + gravity-anchored crop |
//! | **Sheet embedding** | downsample + baseline JPEG bytes |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Output naming and skip-if-exists on top of the backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{calculate_embed_dimensions, calculate_fit_dimensions};
pub use operations::{DerivativeOutcome, DerivativeStatus, create_derivative, get_dimensions};
pub use params::{CropParams, Gravity, Quality, ResizeParams};
pub use rust_backend::{EncodedJpeg, RustBackend, encode_jpeg_within};
