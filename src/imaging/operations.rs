//! High-level image operations.
//!
//! These functions combine the mapper with backend execution: load a file,
//! compute parameters for its dimensions, render, encode.

use super::backend::{BackendError, Dimensions, FilterEngine, ImageBackend};
use super::params::{EncodeParams, OutputFormat, Quality};
use crate::filter::{
    FilterError, FilterKind, FilterParameters, Intensity, apply_filter, parameters_for_engine,
};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OperationError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, OperationError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<Dimensions> {
    Ok(backend.identify(path)?)
}

/// Everything needed to filter one file.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterJob {
    pub source: PathBuf,
    pub output: PathBuf,
    pub kind: FilterKind,
    pub intensity: Intensity,
    pub format: OutputFormat,
    pub quality: Quality,
}

/// What was written for a [`FilterJob`].
#[derive(Debug, Clone)]
pub struct FilteredFile {
    pub source: PathBuf,
    pub output: PathBuf,
    pub dimensions: Dimensions,
    pub parameters: FilterParameters,
}

/// `<dir>/<stem>-<filter>.<ext>` for a source file.
///
/// ```
/// # use instafilter::filter::FilterKind;
/// # use instafilter::imaging::{OutputFormat, output_path};
/// # use std::path::Path;
/// let out = output_path(Path::new("out"), Path::new("in/cat.png"), FilterKind::Edges, OutputFormat::Jpg);
/// assert_eq!(out, Path::new("out/cat-edges.jpg"));
/// ```
pub fn output_path(
    output_dir: &Path,
    source: &Path,
    kind: FilterKind,
    format: OutputFormat,
) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    output_dir.join(format!("{}-{}.{}", stem, kind.name(), format.extension()))
}

/// Load, filter and encode a single file.
pub fn filter_file<B: ImageBackend, E: FilterEngine>(
    backend: &B,
    engine: &E,
    job: &FilterJob,
) -> Result<FilteredFile> {
    let source = backend.load(&job.source)?;
    let dimensions = source.dimensions();
    let parameters = parameters_for_engine(engine, job.kind, job.intensity, Some(dimensions));
    let processed = apply_filter(engine, job.kind, &parameters, &source)?;

    backend.encode(
        processed.image(),
        &EncodeParams {
            output: job.output.clone(),
            format: job.format,
            quality: job.quality,
        },
    )?;

    Ok(FilteredFile {
        source: job.source.clone(),
        output: job.output.clone(),
        dimensions,
        parameters,
    })
}
