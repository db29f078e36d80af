//! Pure Rust backend and filter engine built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` |
//! | Identify | `image::image_dimensions` (header only) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with quality |
//! | Encode → PNG, TIFF, WebP | `DynamicImage::save_with_format` (lossless) |
//! | Gaussian blur, unsharp mask | `image::imageops::blur` + [`effects`](super::effects) |
//! | Everything else | [`effects`](super::effects), rayon-parallel row loops |

use super::backend::{BackendError, Dimensions, FilterEngine, ImageBackend, SourceImage};
use super::effects;
use super::params::{EncodeParams, OutputFormat};
use crate::filter::{FilterKind, FilterParameters, ParameterKey};
use image::{DynamicImage, ImageFormat, ImageReader};
use std::path::Path;

/// Input extensions with a decoder compiled in.
const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff", "webp"];

/// Returns the image file extensions that can be loaded.
pub fn supported_input_extensions() -> &'static [&'static str] {
    SUPPORTED_EXTENSIONS
}

/// Whether `path` has a loadable extension (case-insensitive).
pub fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
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

fn save_jpeg(img: &DynamicImage, path: &Path, quality: u8) -> Result<(), BackendError> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality);
    // JPEG has no alpha channel.
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}

fn save_lossless(img: &DynamicImage, path: &Path, format: ImageFormat) -> Result<(), BackendError> {
    // The WebP encoder only takes 8-bit RGB(A).
    let img = match format {
        ImageFormat::WebP => DynamicImage::ImageRgba8(img.to_rgba8()),
        _ => img.clone(),
    };
    img.save_with_format(path, format).map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to write {}: {}", path.display(), e))
    })
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn load(&self, path: &Path) -> Result<SourceImage, BackendError> {
        let image = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!(
                    "Failed to decode {}: {}",
                    path.display(),
                    e
                ))
            })?;
        log::debug!(
            "loaded {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(SourceImage::from(image))
    }

    fn encode(&self, image: &DynamicImage, params: &EncodeParams) -> Result<(), BackendError> {
        if params.format.is_lossy() {
            log::debug!(
                "encoding {} as {} (quality {})",
                params.output.display(),
                params.format,
                params.quality.value()
            );
        } else {
            log::debug!("encoding {} as {}", params.output.display(), params.format);
        }
        match params.format {
            OutputFormat::Jpg => save_jpeg(image, &params.output, params.quality.value() as u8),
            OutputFormat::Png => save_lossless(image, &params.output, ImageFormat::Png),
            OutputFormat::Tiff => save_lossless(image, &params.output, ImageFormat::Tiff),
            OutputFormat::Webp => save_lossless(image, &params.output, ImageFormat::WebP),
        }
    }
}

/// Read a finite scalar as `f32`.
fn scalar(params: &FilterParameters, key: ParameterKey) -> Option<f32> {
    params
        .scalar(key)
        .filter(|v| v.is_finite())
        .map(|v| v as f32)
}

/// Read a finite point as `(f32, f32)`.
fn point(params: &FilterParameters, key: ParameterKey) -> Option<(f32, f32)> {
    params
        .point(key)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(x, y)| (x as f32, y as f32))
}

impl FilterEngine for RustBackend {
    fn render(
        &self,
        kind: FilterKind,
        params: &FilterParameters,
        source: &SourceImage,
    ) -> Option<DynamicImage> {
        if source.dimensions().is_empty() {
            log::debug!("{kind}: empty source, no output");
            return None;
        }
        let src = source.image().to_rgba8();
        let origin = point(params, ParameterKey::Center).unwrap_or((0.0, 0.0));

        let out = match kind {
            FilterKind::SepiaTone => effects::sepia(&src, scalar(params, ParameterKey::Intensity)?),
            FilterKind::Crystallize => {
                effects::crystallize(&src, scalar(params, ParameterKey::Radius)?, origin)
            }
            FilterKind::Edges => effects::edges(&src, scalar(params, ParameterKey::Intensity)?),
            FilterKind::GaussianBlur => {
                effects::gaussian_blur(&src, scalar(params, ParameterKey::Radius)?)
            }
            FilterKind::Pixellate => {
                effects::pixellate(&src, scalar(params, ParameterKey::Scale)?, origin)
            }
            FilterKind::UnsharpMask => effects::unsharp_mask(
                &src,
                scalar(params, ParameterKey::Radius)?,
                scalar(params, ParameterKey::Intensity)?,
            ),
            FilterKind::Vignette => effects::vignette(
                &src,
                scalar(params, ParameterKey::Intensity)?,
                scalar(params, ParameterKey::Radius)?,
            ),
            FilterKind::TwirlDistortion => effects::twirl(
                &src,
                point(params, ParameterKey::Center)?,
                scalar(params, ParameterKey::Radius)?,
                scalar(params, ParameterKey::Angle)?,
            ),
        };
        Some(DynamicImage::ImageRgba8(out))
    }
}
