//! The eight built-in filters and the parameter keys each one accepts.
//!
//! Every variant declares its parameter set statically. There is no runtime
//! "does this filter support key X" introspection: [`FilterKind::accepts`]
//! answers from a fixed table, and the mapper only writes accepted keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A parameter name understood by the filter engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKey {
    Intensity,
    Radius,
    Scale,
    Angle,
    Center,
}

impl ParameterKey {
    pub fn name(self) -> &'static str {
        match self {
            ParameterKey::Intensity => "intensity",
            ParameterKey::Radius => "radius",
            ParameterKey::Scale => "scale",
            ParameterKey::Angle => "angle",
            ParameterKey::Center => "center",
        }
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the built-in filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    #[default]
    SepiaTone,
    Crystallize,
    Edges,
    GaussianBlur,
    Pixellate,
    UnsharpMask,
    Vignette,
    TwirlDistortion,
}

impl FilterKind {
    /// All filters, in menu order.
    pub const ALL: [FilterKind; 8] = [
        FilterKind::SepiaTone,
        FilterKind::Crystallize,
        FilterKind::Edges,
        FilterKind::GaussianBlur,
        FilterKind::Pixellate,
        FilterKind::UnsharpMask,
        FilterKind::Vignette,
        FilterKind::TwirlDistortion,
    ];

    /// Stable kebab-case identifier used in config files and on the CLI.
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::SepiaTone => "sepia-tone",
            FilterKind::Crystallize => "crystallize",
            FilterKind::Edges => "edges",
            FilterKind::GaussianBlur => "gaussian-blur",
            FilterKind::Pixellate => "pixellate",
            FilterKind::UnsharpMask => "unsharp-mask",
            FilterKind::Vignette => "vignette",
            FilterKind::TwirlDistortion => "twirl-distortion",
        }
    }

    /// Human-readable title for menus and CLI listings.
    pub fn title(self) -> &'static str {
        match self {
            FilterKind::SepiaTone => "Sepia Tone",
            FilterKind::Crystallize => "Crystallize",
            FilterKind::Edges => "Edges",
            FilterKind::GaussianBlur => "Gaussian Blur",
            FilterKind::Pixellate => "Pixellate",
            FilterKind::UnsharpMask => "Unsharp Mask",
            FilterKind::Vignette => "Vignette",
            FilterKind::TwirlDistortion => "Twirl Distortion",
        }
    }

    /// Parameter keys this filter reads. Anything else is ignored.
    pub fn accepted_keys(self) -> &'static [ParameterKey] {
        use ParameterKey::*;
        match self {
            FilterKind::SepiaTone => &[Intensity],
            FilterKind::Crystallize => &[Radius, Center],
            FilterKind::Edges => &[Intensity],
            FilterKind::GaussianBlur => &[Radius],
            FilterKind::Pixellate => &[Scale, Center],
            FilterKind::UnsharpMask => &[Radius, Intensity],
            FilterKind::Vignette => &[Intensity, Radius],
            FilterKind::TwirlDistortion => &[Center, Radius, Angle],
        }
    }

    /// Keys the engine cannot render without.
    ///
    /// Optional accepted keys (e.g. `Center` for crystallize and pixellate)
    /// fall back to engine defaults when absent.
    pub fn required_keys(self) -> &'static [ParameterKey] {
        use ParameterKey::*;
        match self {
            FilterKind::SepiaTone => &[Intensity],
            FilterKind::Crystallize => &[Radius],
            FilterKind::Edges => &[Intensity],
            FilterKind::GaussianBlur => &[Radius],
            FilterKind::Pixellate => &[Scale],
            FilterKind::UnsharpMask => &[Radius, Intensity],
            FilterKind::Vignette => &[Intensity, Radius],
            FilterKind::TwirlDistortion => &[Center, Radius, Angle],
        }
    }

    pub fn accepts(self, key: ParameterKey) -> bool {
        self.accepted_keys().contains(&key)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter '{0}' (run `instafilter filters` for the list)")]
pub struct UnknownFilter(pub String);

impl FromStr for FilterKind {
    type Err = UnknownFilter;

    /// Accepts the kebab-case name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        FilterKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| UnknownFilter(s.to_string()))
    }
}
