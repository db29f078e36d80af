//! # Instafilter
//!
//! Maps a single "intensity" slider onto the parameters of eight photo
//! filters, renders them with a pure-Rust engine, and saves the result.
//!
//! # Architecture
//!
//! ```text
//! slider 0..1 ──► compute_parameters ──► FilterParameters
//!                                             │
//! SourceImage ───────────────► FilterEngine::render ──► ProcessedImage ──► PhotoLibrary
//! ```
//!
//! The mapping is a pure function of `(filter, intensity, dimensions)`. Only
//! the keys a filter accepts are ever set, and parameters are recomputed from
//! scratch on every change, so switching filters never carries values over.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`filter`] | Filter kinds, parameter keys, the intensity mapper and [`filter::apply_filter`] |
//! | [`imaging`] | Image I/O, the [`imaging::FilterEngine`] trait and its pure-Rust implementation |
//! | [`editor`] | Editing session state machine: select image, choose filter, adjust, save |
//! | [`library`] | Background saving of finished images |
//! | [`batch`] | Parallel filtering of many files for the CLI |
//! | [`config`] | `instafilter.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Engine Behind a Trait
//!
//! The mapper never touches pixels. Rendering goes through
//! [`imaging::FilterEngine`], which reports failure as "no output" rather
//! than an error value. Callers turn that into [`filter::FilterError::Render`].
//! Tests substitute a recording mock.
//!
//! ## Twirl Radius
//!
//! The twirl radius is a fixed 400 pixels regardless of intensity or image
//! size; only the angle follows the slider. Small images are twirled across
//! their whole area.

pub mod batch;
pub mod config;
pub mod editor;
pub mod filter;
pub mod imaging;
pub mod library;
pub mod output;
