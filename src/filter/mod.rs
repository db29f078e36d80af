//! Filter selection and parameter mapping.
//!
//! - **Kinds**: [`FilterKind`] and the [`ParameterKey`]s each one accepts
//! - **Parameters**: [`Intensity`], [`FilterParameters`]
//! - **Mapper**: [`compute_parameters`]: slider value → filter parameters
//! - **Apply**: [`apply_filter`]: hand parameters to a [`FilterEngine`]
//!
//! Pixel work is never done here; it is delegated to whichever engine the
//! caller passes in.

pub mod kind;
pub mod mapper;
pub mod params;

pub use kind::{FilterKind, ParameterKey, UnknownFilter};
pub use mapper::{TWIRL_RADIUS, compute_parameters};
pub use params::{FilterParameters, Intensity, ParamValue, ParameterError};

use crate::imaging::{FilterEngine, ProcessedImage, SourceImage};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// The engine produced no output for these parameters.
    #[error("filter failed: {kind} produced no output")]
    Render { kind: FilterKind },
}

/// [`compute_parameters`], narrowed to the keys `engine` says it reads.
pub fn parameters_for_engine(
    engine: &dyn FilterEngine,
    kind: FilterKind,
    intensity: Intensity,
    dims: Option<crate::imaging::Dimensions>,
) -> FilterParameters {
    let mut params = compute_parameters(kind, intensity, dims);
    params.retain_keys(engine.accepted_keys(kind));
    params
}

/// Render `source` through `kind` with precomputed `parameters`.
///
/// Fails with [`FilterError::Render`] when the engine returns nothing, for
/// instance because a required key is missing. Parameters computed for a
/// different filter are treated the same way. There is no retry.
pub fn apply_filter(
    engine: &dyn FilterEngine,
    kind: FilterKind,
    parameters: &FilterParameters,
    source: &SourceImage,
) -> Result<ProcessedImage, FilterError> {
    if parameters.kind() != kind {
        log::warn!(
            "refusing to render {kind} with parameters computed for {}",
            parameters.kind()
        );
        return Err(FilterError::Render { kind });
    }
    match engine.render(kind, parameters, source) {
        Some(image) => Ok(ProcessedImage::filtered(kind, image)),
        None => {
            log::warn!("{kind} produced no output with {parameters:?}");
            Err(FilterError::Render { kind })
        }
    }
}
