//! Image I/O and filter rendering: pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Load** | `image::ImageReader` |
//! | **Encode** | `image` codecs (JPEG with quality, PNG/TIFF/WebP lossless) |
//! | **Render** | [`effects`] pixel cores, rayon-parallel |
//!
//! The module is split into:
//! - **Calculations**: Pure geometry for the effects (unit testable)
//! - **Parameters**: Encode settings
//! - **Backend**: [`ImageBackend`] + [`FilterEngine`] traits, [`RustBackend`]
//! - **Operations**: High-level load → filter → encode for one file

pub mod backend;
pub mod calculations;
pub mod effects;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{
    BackendError, Dimensions, FilterEngine, ImageBackend, ProcessedImage, SourceImage,
};
pub use operations::{
    FilterJob, FilteredFile, OperationError, filter_file, get_dimensions, output_path,
};
pub use params::{EncodeParams, OutputFormat, Quality, UnknownFormat};
pub use rust_backend::{RustBackend, is_supported_input, supported_input_extensions};
