//! Collaborator traits for pixel work and shared image types.
//!
//! Two seams keep the filter logic independent of any particular imaging
//! library:
//!
//! - [`ImageBackend`]: the image source and sink: identify, load, encode.
//! - [`FilterEngine`]: renders a [`FilterKind`] with [`FilterParameters`].
//!
//! The production implementation of both is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests use the mocks in
//! [`tests`], which record what they were asked to do.

use super::params::EncodeParams;
use crate::filter::{FilterKind, FilterParameters, ParameterKey};
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn of(image: &DynamicImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A decoded image as handed over by the image source.
///
/// Filters only ever read it; every render produces a new buffer.
#[derive(Debug, Clone)]
pub struct SourceImage {
    image: DynamicImage,
}

impl SourceImage {
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::of(&self.image)
    }
}

impl From<DynamicImage> for SourceImage {
    fn from(image: DynamicImage) -> Self {
        Self { image }
    }
}

/// Result of a render, or a raw source promoted for saving.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    filter: Option<FilterKind>,
    image: DynamicImage,
}

impl ProcessedImage {
    pub fn filtered(kind: FilterKind, image: DynamicImage) -> Self {
        Self {
            filter: Some(kind),
            image,
        }
    }

    /// Wrap the unfiltered source so it can be saved as-is.
    pub fn unfiltered(source: &SourceImage) -> Self {
        Self {
            filter: None,
            image: source.image().clone(),
        }
    }

    /// The filter that produced this image, if any.
    pub fn filter(&self) -> Option<FilterKind> {
        self.filter
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::of(&self.image)
    }
}

/// Image source and sink.
pub trait ImageBackend: Sync {
    /// Read dimensions without a full decode where the format allows it.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode an image from disk.
    fn load(&self, path: &Path) -> Result<SourceImage, BackendError>;

    /// Encode and write an image.
    fn encode(&self, image: &DynamicImage, params: &EncodeParams) -> Result<(), BackendError>;
}

/// Renders built-in filters.
///
/// `render` returns `None` when it cannot produce output: a required key is
/// missing, a value is not finite, or the source buffer is unusable.
pub trait FilterEngine: Sync {
    /// Keys the engine reads for `kind`. Defaults to the static table on
    /// [`FilterKind`].
    fn accepted_keys(&self, kind: FilterKind) -> &'static [ParameterKey] {
        kind.accepted_keys()
    }

    fn render(
        &self,
        kind: FilterKind,
        params: &FilterParameters,
        source: &SourceImage,
    ) -> Option<DynamicImage>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::params::{OutputFormat, Quality};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Mock backend that records operations without touching the filesystem.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockBackend {
        pub identify_results: Mutex<Vec<Dimensions>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Load(String),
        Encode {
            output: String,
            format: OutputFormat,
            quality: u32,
            width: u32,
            height: u32,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dimensions(dims: Vec<Dimensions>) -> Self {
            Self {
                identify_results: Mutex::new(dims),
                operations: Mutex::new(Vec::new()),
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(path.to_string_lossy().to_string()));

            self.identify_results
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| BackendError::ProcessingFailed("No mock dimensions".to_string()))
        }

        /// Loads a blank image sized by the next queued dimensions.
        fn load(&self, path: &Path) -> Result<SourceImage, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Load(path.to_string_lossy().to_string()));

            let dims = self
                .identify_results
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| BackendError::ProcessingFailed("No mock dimensions".to_string()))?;
            Ok(SourceImage::from(DynamicImage::new_rgba8(
                dims.width,
                dims.height,
            )))
        }

        fn encode(&self, image: &DynamicImage, params: &EncodeParams) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Encode {
                output: params.output.to_string_lossy().to_string(),
                format: params.format,
                quality: params.quality.value(),
                width: image.width(),
                height: image.height(),
            });
            Ok(())
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedRender {
        pub kind: FilterKind,
        pub keys: Vec<ParameterKey>,
    }

    /// Mock engine that echoes the source back.
    ///
    /// Mirrors the real engine's contract: missing required keys give `None`.
    /// `set_failing(true)` makes every render return `None`.
    #[derive(Default)]
    pub struct MockEngine {
        pub renders: Mutex<Vec<RecordedRender>>,
        pub failing: AtomicBool,
    }

    impl MockEngine {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub fn get_renders(&self) -> Vec<RecordedRender> {
            self.renders.lock().unwrap().clone()
        }
    }

    impl FilterEngine for MockEngine {
        fn render(
            &self,
            kind: FilterKind,
            params: &FilterParameters,
            source: &SourceImage,
        ) -> Option<DynamicImage> {
            if self.failing.load(Ordering::SeqCst) || !params.missing_required().is_empty() {
                return None;
            }
            self.renders.lock().unwrap().push(RecordedRender {
                kind,
                keys: params.keys().collect(),
            });
            Some(source.image().clone())
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 800,
            height: 600,
        }]);

        let result = backend.identify(Path::new("/test/image.jpg")).unwrap();
        assert_eq!(result.width, 800);
        assert_eq!(result.height, 600);

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Identify(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_load_uses_queued_dimensions() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 12,
            height: 7,
        }]);

        let source = backend.load(Path::new("/in.png")).unwrap();
        assert_eq!(
            source.dimensions(),
            Dimensions {
                width: 12,
                height: 7
            }
        );
        assert!(backend.load(Path::new("/again.png")).is_err());
    }

    #[test]
    fn mock_records_encode() {
        let backend = MockBackend::new();
        let image = DynamicImage::new_rgba8(20, 10);

        backend
            .encode(
                &image,
                &EncodeParams {
                    output: "/out.jpg".into(),
                    format: OutputFormat::Jpg,
                    quality: Quality::new(80),
                },
            )
            .unwrap();

        let ops = backend.get_operations();
        assert_eq!(
            ops,
            vec![RecordedOp::Encode {
                output: "/out.jpg".to_string(),
                format: OutputFormat::Jpg,
                quality: 80,
                width: 20,
                height: 10,
            }]
        );
    }

    #[test]
    fn mock_engine_refuses_missing_required_keys() {
        let engine = MockEngine::new();
        let source = SourceImage::from(DynamicImage::new_rgba8(4, 4));
        let params = FilterParameters::new(FilterKind::SepiaTone);
        assert!(engine.render(FilterKind::SepiaTone, &params, &source).is_none());
        assert!(engine.get_renders().is_empty());
    }

    #[test]
    fn engine_accepted_keys_default_to_static_table() {
        let engine = MockEngine::new();
        assert_eq!(
            engine.accepted_keys(FilterKind::UnsharpMask),
            FilterKind::UnsharpMask.accepted_keys()
        );
    }

    #[test]
    fn unfiltered_processed_image_has_no_filter() {
        let source = SourceImage::from(DynamicImage::new_rgb8(3, 2));
        let processed = ProcessedImage::unfiltered(&source);
        assert_eq!(processed.filter(), None);
        assert_eq!(processed.dimensions(), source.dimensions());
    }
}
