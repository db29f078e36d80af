//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Filters
//!
//! ```text
//! 001 Sepia Tone (sepia-tone)
//!     Keys: intensity
//! 002 Crystallize (crystallize)
//!     Keys: radius, center
//! ```
//!
//! ## Apply
//!
//! ```text
//! 001/003 cat.jpg → out/cat-edges.jpg
//!     1200x800, intensity: 100
//! 002/003 (notes.txt) failed: unsupported image format
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::batch::{BatchEvent, BatchSummary};
use crate::filter::{FilterKind, FilterParameters, ParamValue};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Render a parameter value compactly: integers without a fraction,
/// points as `(x, y)`.
fn format_value(value: &ParamValue) -> String {
    fn number(n: f64) -> String {
        if n.fract() == 0.0 && n.abs() < 1e15 {
            format!("{}", n as i64)
        } else {
            format!("{:.3}", n)
        }
    }
    match value {
        ParamValue::Scalar(n) => number(*n),
        ParamValue::Point { x, y } => format!("({}, {})", number(*x), number(*y)),
    }
}

/// One-line `key: value` summary of a parameter set.
fn parameter_summary(parameters: &FilterParameters) -> String {
    parameters
        .iter()
        .map(|(key, value)| format!("{}: {}", key, format_value(&value)))
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// filters
// ============================================================================

/// Every filter with its display title, CLI name and accepted keys.
pub fn format_filter_list() -> Vec<String> {
    let mut lines = Vec::new();
    for (i, kind) in FilterKind::ALL.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            kind.title(),
            kind.name()
        ));
        let keys: Vec<&str> = kind.accepted_keys().iter().map(|k| k.name()).collect();
        lines.push(format!("{}Keys: {}", indent(1), keys.join(", ")));
    }
    lines
}

pub fn print_filter_list() {
    for line in format_filter_list() {
        println!("{}", line);
    }
}

// ============================================================================
// params
// ============================================================================

/// Pretty JSON for a computed parameter set.
pub fn format_parameters(parameters: &FilterParameters) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(parameters)
}

pub fn print_parameters(parameters: &FilterParameters) -> Result<(), serde_json::Error> {
    println!("{}", format_parameters(parameters)?);
    Ok(())
}

// ============================================================================
// apply
// ============================================================================

/// Format a single batch progress event as display lines.
pub fn format_batch_event(event: &BatchEvent) -> Vec<String> {
    match event {
        BatchEvent::Filtered { index, total, file } => {
            let mut lines = vec![format!(
                "{}/{} {} \u{2192} {}",
                format_index(*index),
                format_index(*total),
                file_name(&file.source),
                file.output.display()
            )];
            let mut detail = format!("{}x{}", file.dimensions.width, file.dimensions.height);
            if !file.parameters.is_empty() {
                detail.push_str(", ");
                detail.push_str(&parameter_summary(&file.parameters));
            }
            lines.push(format!("{}{}", indent(1), detail));
            lines
        }
        BatchEvent::Failed {
            index,
            total,
            source,
            error,
        } => vec![format!(
            "{}/{} ({}) failed: {}",
            format_index(*index),
            format_index(*total),
            file_name(source),
            error
        )],
    }
}

pub fn format_batch_summary(summary: &BatchSummary) -> String {
    match summary.filtered.len() {
        1 => "Filtered 1 file".to_string(),
        n => format!("Filtered {} files", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Intensity, ParameterKey, compute_parameters};
    use crate::imaging::{Dimensions, FilteredFile};
    use std::path::PathBuf;

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(1), "    ");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn format_value_integers_and_points() {
        assert_eq!(format_value(&ParamValue::Scalar(200.0)), "200");
        assert_eq!(format_value(&ParamValue::Scalar(0.25)), "0.250");
        assert_eq!(
            format_value(&ParamValue::Point { x: 150.0, y: 100.5 }),
            "(150, 100.500)"
        );
    }

    #[test]
    fn filter_list_has_every_filter() {
        let lines = format_filter_list();
        assert_eq!(lines.len(), FilterKind::ALL.len() * 2);
        assert_eq!(lines[0], "001 Sepia Tone (sepia-tone)");
        assert_eq!(lines[1], "    Keys: intensity");
        assert!(lines.contains(&"    Keys: center, radius, angle".to_string()));
    }

    #[test]
    fn parameters_as_json() {
        let params = compute_parameters(FilterKind::GaussianBlur, Intensity::new(1.0), None);
        let json: serde_json::Value =
            serde_json::from_str(&format_parameters(&params).unwrap()).unwrap();
        assert_eq!(json["kind"], "gaussian-blur");
        assert_eq!(json["values"]["radius"], 200.0);
    }

    #[test]
    fn twirl_center_serializes_as_point() {
        let params = compute_parameters(
            FilterKind::TwirlDistortion,
            Intensity::new(0.5),
            Some(Dimensions {
                width: 300,
                height: 200,
            }),
        );
        let json: serde_json::Value =
            serde_json::from_str(&format_parameters(&params).unwrap()).unwrap();
        assert_eq!(json["values"]["center"]["x"], 150.0);
        assert_eq!(json["values"]["center"]["y"], 100.0);
        assert_eq!(json["values"]["radius"], 400.0);
    }

    #[test]
    fn batch_filtered_event() {
        let params = compute_parameters(FilterKind::Edges, Intensity::new(0.5), None);
        let event = BatchEvent::Filtered {
            index: 1,
            total: 3,
            file: FilteredFile {
                source: PathBuf::from("photos/cat.jpg"),
                output: PathBuf::from("out/cat-edges.jpg"),
                dimensions: Dimensions {
                    width: 1200,
                    height: 800,
                },
                parameters: params,
            },
        };
        let lines = format_batch_event(&event);
        assert_eq!(lines[0], "001/003 cat.jpg \u{2192} out/cat-edges.jpg");
        assert_eq!(lines[1], "    1200x800, intensity: 100");
    }

    #[test]
    fn batch_failed_event() {
        let event = BatchEvent::Failed {
            index: 2,
            total: 3,
            source: PathBuf::from("in/notes.txt"),
            error: "unsupported image format".to_string(),
        };
        assert_eq!(
            format_batch_event(&event),
            vec!["002/003 (notes.txt) failed: unsupported image format"]
        );
    }

    #[test]
    fn parameter_summary_in_key_order() {
        let mut params = FilterParameters::new(FilterKind::UnsharpMask);
        params.set_scalar(ParameterKey::Intensity, 0.5);
        params.set_scalar(ParameterKey::Radius, 100.0);
        assert_eq!(parameter_summary(&params), "intensity: 0.500, radius: 100");
    }

    #[test]
    fn summary_pluralizes() {
        let one = BatchSummary {
            filtered: vec![FilteredFile {
                source: PathBuf::from("a.jpg"),
                output: PathBuf::from("a-edges.jpg"),
                dimensions: Dimensions {
                    width: 1,
                    height: 1,
                },
                parameters: FilterParameters::new(FilterKind::Edges),
            }],
        };
        assert_eq!(format_batch_summary(&one), "Filtered 1 file");
        assert_eq!(format_batch_summary(&BatchSummary::default()), "Filtered 0 files");
    }
}
