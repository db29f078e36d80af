//! Parameter types for encode operations.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`OutputFormat`]: Container written on save, chosen by config or `--format`.
//! - [`EncodeParams`]: What an encode needs: output path, format and quality.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Output container.
///
/// Only JPEG is lossy; quality is ignored for the rest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    #[serde(alias = "jpeg")]
    Jpg,
    Png,
    Tiff,
    Webp,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Tiff => "tiff",
            OutputFormat::Webp => "webp",
        }
    }

    pub fn is_lossy(self) -> bool {
        matches!(self, OutputFormat::Jpg)
    }
}

/// Unrecognized format name or extension.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown output format '{0}' (expected jpg, png, tiff or webp)")]
pub struct UnknownFormat(pub String);

/// Parses format names and their common extensions, case-insensitively.
impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(OutputFormat::Jpg),
            "png" => Ok(OutputFormat::Png),
            "tif" | "tiff" => Ok(OutputFormat::Tiff),
            "webp" => Ok(OutputFormat::Webp),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Parameters for an encode-and-write operation.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeParams {
    pub output: PathBuf,
    pub format: OutputFormat,
    pub quality: Quality,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_90() {
        assert_eq!(Quality::default().value(), 90);
    }

    #[test]
    fn format_from_str() {
        assert_eq!("JPEG".parse(), Ok(OutputFormat::Jpg));
        assert_eq!("tif".parse(), Ok(OutputFormat::Tiff));
        assert_eq!("webp".parse(), Ok(OutputFormat::Webp));
        assert_eq!(
            "avif".parse::<OutputFormat>(),
            Err(UnknownFormat("avif".to_string()))
        );
    }

    #[test]
    fn format_serde_accepts_jpeg_alias() {
        let f: OutputFormat = toml::Value::String("jpeg".into()).try_into().unwrap();
        assert_eq!(f, OutputFormat::Jpg);
        let f: OutputFormat = toml::Value::String("webp".into()).try_into().unwrap();
        assert_eq!(f, OutputFormat::Webp);
    }

    #[test]
    fn only_jpg_is_lossy() {
        assert!(OutputFormat::Jpg.is_lossy());
        assert!(!OutputFormat::Png.is_lossy());
        assert!(!OutputFormat::Webp.is_lossy());
    }
}
