//! Editing session: one image, one filter, one intensity.
//!
//! [`Editor`] holds the whole session state explicitly and is passed to
//! whatever drives it (CLI, UI, tests). It moves through three states:
//!
//! ```text
//!                select_image                 choose_filter / switch_filter
//! NoImageSelected ──────────► ImageSelected ────────────────────────► FilterApplied
//!                                   ▲                                   │    ▲
//!                                   └──────────── select_image ─────────┘    │
//!                                                                set_intensity
//! ```
//!
//! Parameters are never cached across filter switches: [`Editor::parameters`]
//! is always computed from the current filter, intensity and image size. A
//! failed render leaves the previous output in place for preview and keeps
//! the newly chosen filter and intensity, so the next attempt starts from
//! the user's latest choice.

use crate::config::EditorConfig;
use crate::filter::{
    FilterError, FilterKind, FilterParameters, Intensity, apply_filter, compute_parameters,
    parameters_for_engine,
};
use crate::imaging::{Dimensions, FilterEngine, ProcessedImage, SourceImage};
use crate::library::{PendingSave, PhotoLibrary, save_in_background};
use image::DynamicImage;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("no image selected")]
    NoImage,
    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// Where the session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    NoImageSelected,
    ImageSelected,
    FilterApplied,
}

#[derive(Debug, Clone, Default)]
pub struct Editor {
    kind: FilterKind,
    intensity: Intensity,
    source: Option<SourceImage>,
    processed: Option<ProcessedImage>,
}

impl Editor {
    pub fn new(kind: FilterKind, intensity: Intensity) -> Self {
        Self {
            kind,
            intensity,
            source: None,
            processed: None,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.filter, Intensity::new(config.intensity))
    }

    pub fn state(&self) -> EditorState {
        match (&self.source, &self.processed) {
            (None, _) => EditorState::NoImageSelected,
            (Some(_), None) => EditorState::ImageSelected,
            (Some(_), Some(_)) => EditorState::FilterApplied,
        }
    }

    pub fn filter(&self) -> FilterKind {
        self.kind
    }

    pub fn intensity(&self) -> Intensity {
        self.intensity
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn source_dimensions(&self) -> Option<Dimensions> {
        self.source.as_ref().map(SourceImage::dimensions)
    }

    /// Parameters for the current filter and intensity.
    pub fn parameters(&self) -> FilterParameters {
        compute_parameters(self.kind, self.intensity, self.source_dimensions())
    }

    /// Start over with a new image. The previous output is dropped; the
    /// chosen filter and intensity carry over.
    pub fn select_image(&mut self, source: SourceImage) -> EditorState {
        let dims = source.dimensions();
        log::debug!("selected image {}x{}", dims.width, dims.height);
        self.source = Some(source);
        self.processed = None;
        self.state()
    }

    /// Pick a filter and render it.
    ///
    /// Without an image the choice is only remembered.
    pub fn choose_filter(
        &mut self,
        engine: &dyn FilterEngine,
        kind: FilterKind,
    ) -> Result<EditorState, EditorError> {
        self.switch_filter(engine, kind)
    }

    /// Replace the active filter and re-render with the current intensity.
    ///
    /// Until the render succeeds, [`Editor::preview`] keeps showing the
    /// previous output.
    pub fn switch_filter(
        &mut self,
        engine: &dyn FilterEngine,
        kind: FilterKind,
    ) -> Result<EditorState, EditorError> {
        if kind != self.kind {
            log::debug!("switching filter {} -> {}", self.kind, kind);
        }
        self.kind = kind;
        if self.source.is_none() {
            return Ok(self.state());
        }
        self.render(engine)
    }

    /// Move the slider. Re-renders only when a filter is already applied.
    pub fn set_intensity(
        &mut self,
        engine: &dyn FilterEngine,
        intensity: Intensity,
    ) -> Result<EditorState, EditorError> {
        self.intensity = intensity;
        if self.state() != EditorState::FilterApplied {
            return Ok(self.state());
        }
        self.render(engine)
    }

    /// Render the current filter onto the current image.
    pub fn apply(&mut self, engine: &dyn FilterEngine) -> Result<EditorState, EditorError> {
        self.render(engine)
    }

    fn render(&mut self, engine: &dyn FilterEngine) -> Result<EditorState, EditorError> {
        let source = self.source.as_ref().ok_or(EditorError::NoImage)?;
        let params =
            parameters_for_engine(engine, self.kind, self.intensity, Some(source.dimensions()));
        let processed = apply_filter(engine, self.kind, &params, source)?;
        self.processed = Some(processed);
        Ok(self.state())
    }

    /// The latest rendered output.
    pub fn processed(&self) -> Option<&ProcessedImage> {
        self.processed.as_ref()
    }

    /// What to show: rendered output, else the raw image, else nothing.
    pub fn preview(&self) -> Option<&DynamicImage> {
        self.processed
            .as_ref()
            .map(ProcessedImage::image)
            .or_else(|| self.source.as_ref().map(SourceImage::image))
    }

    /// The image a save would write: rendered output, else the raw image.
    pub fn image_to_save(&self) -> Result<ProcessedImage, EditorError> {
        match (&self.processed, &self.source) {
            (Some(processed), _) => Ok(processed.clone()),
            (None, Some(source)) => Ok(ProcessedImage::unfiltered(source)),
            (None, None) => Err(EditorError::NoImage),
        }
    }

    /// Save in the background. Fails immediately when there is nothing to save.
    pub fn save<L>(&self, library: Arc<L>) -> Result<PendingSave, EditorError>
    where
        L: PhotoLibrary + ?Sized + 'static,
    {
        let image = self.image_to_save()?;
        Ok(save_in_background(library, image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ParameterKey;
    use crate::imaging::backend::tests::MockEngine;
    use crate::library::tests::MockLibrary;

    fn source(width: u32, height: u32) -> SourceImage {
        SourceImage::from(DynamicImage::new_rgba8(width, height))
    }

    #[test]
    fn starts_with_no_image() {
        let editor = Editor::default();
        assert_eq!(editor.state(), EditorState::NoImageSelected);
        assert!(editor.preview().is_none());
        assert_eq!(editor.filter(), FilterKind::SepiaTone);
        assert_eq!(editor.intensity(), Intensity::default());
    }

    #[test]
    fn select_image_then_choose_filter_applies() {
        let engine = MockEngine::new();
        let mut editor = Editor::new(FilterKind::SepiaTone, Intensity::new(0.5));

        assert_eq!(editor.select_image(source(10, 10)), EditorState::ImageSelected);
        let state = editor.choose_filter(&engine, FilterKind::Crystallize).unwrap();

        assert_eq!(state, EditorState::FilterApplied);
        assert_eq!(
            editor.processed().unwrap().filter(),
            Some(FilterKind::Crystallize)
        );
        assert_eq!(engine.get_renders().len(), 1);
    }

    #[test]
    fn choose_filter_without_image_is_remembered() {
        let engine = MockEngine::new();
        let mut editor = Editor::default();

        let state = editor.choose_filter(&engine, FilterKind::Edges).unwrap();
        assert_eq!(state, EditorState::NoImageSelected);
        assert_eq!(editor.filter(), FilterKind::Edges);
        assert!(engine.get_renders().is_empty());
    }

    #[test]
    fn set_intensity_reapplies_only_when_filter_applied() {
        let engine = MockEngine::new();
        let mut editor = Editor::default();
        editor.select_image(source(4, 4));

        editor.set_intensity(&engine, Intensity::new(0.9)).unwrap();
        assert!(engine.get_renders().is_empty());
        assert_eq!(editor.state(), EditorState::ImageSelected);

        editor.apply(&engine).unwrap();
        editor.set_intensity(&engine, Intensity::new(0.2)).unwrap();
        assert_eq!(engine.get_renders().len(), 2);
        assert_eq!(editor.state(), EditorState::FilterApplied);
        assert_eq!(editor.parameters().scalar(ParameterKey::Intensity), Some(0.2));
    }

    #[test]
    fn switching_filter_never_leaks_previous_parameters() {
        let engine = MockEngine::new();
        let mut editor = Editor::new(FilterKind::TwirlDistortion, Intensity::new(0.5));
        editor.select_image(source(100, 80));
        editor.apply(&engine).unwrap();
        assert!(editor.parameters().contains(ParameterKey::Angle));

        editor.switch_filter(&engine, FilterKind::SepiaTone).unwrap();
        let params = editor.parameters();
        assert_eq!(params.kind(), FilterKind::SepiaTone);
        assert_eq!(params.keys().collect::<Vec<_>>(), vec![ParameterKey::Intensity]);
    }

    #[test]
    fn failed_switch_keeps_previous_preview_and_new_choice() {
        let engine = MockEngine::new();
        let mut editor = Editor::new(FilterKind::SepiaTone, Intensity::new(0.5));
        editor.select_image(source(6, 6));
        editor.apply(&engine).unwrap();

        engine.set_failing(true);
        let err = editor
            .switch_filter(&engine, FilterKind::Vignette)
            .unwrap_err();
        assert_eq!(
            err,
            EditorError::Filter(FilterError::Render {
                kind: FilterKind::Vignette
            })
        );

        // Prior output still previewable, new choice retained.
        assert_eq!(
            editor.processed().unwrap().filter(),
            Some(FilterKind::SepiaTone)
        );
        assert!(editor.preview().is_some());
        assert_eq!(editor.filter(), FilterKind::Vignette);
        assert_eq!(editor.intensity(), Intensity::new(0.5));

        engine.set_failing(false);
        editor.apply(&engine).unwrap();
        assert_eq!(
            editor.processed().unwrap().filter(),
            Some(FilterKind::Vignette)
        );
    }

    #[test]
    fn select_new_image_discards_output_keeps_filter() {
        let engine = MockEngine::new();
        let mut editor = Editor::default();
        editor.select_image(source(5, 5));
        editor.choose_filter(&engine, FilterKind::Pixellate).unwrap();

        let state = editor.select_image(source(9, 7));
        assert_eq!(state, EditorState::ImageSelected);
        assert!(editor.processed().is_none());
        assert_eq!(editor.filter(), FilterKind::Pixellate);
        let preview = editor.preview().unwrap();
        assert_eq!((preview.width(), preview.height()), (9, 7));
    }

    #[test]
    fn apply_without_image_is_no_image_error() {
        let engine = MockEngine::new();
        let mut editor = Editor::default();
        assert_eq!(editor.apply(&engine).unwrap_err(), EditorError::NoImage);
    }

    #[test]
    fn save_without_image_is_no_image_error() {
        let editor = Editor::default();
        let library = Arc::new(MockLibrary::default());
        assert_eq!(editor.save(library.clone()).unwrap_err(), EditorError::NoImage);
        assert!(library.get_saved().is_empty());
    }

    #[test]
    fn save_raw_image_without_filter() {
        let editor = {
            let mut e = Editor::default();
            e.select_image(source(3, 2));
            e
        };
        let library = Arc::new(MockLibrary::default());
        editor.save(library.clone()).unwrap().wait().unwrap();
        assert_eq!(library.get_saved(), vec![(3, 2)]);
        assert_eq!(editor.image_to_save().unwrap().filter(), None);
    }

    #[test]
    fn save_filtered_image() {
        let engine = MockEngine::new();
        let mut editor = Editor::default();
        editor.select_image(source(6, 4));
        editor.choose_filter(&engine, FilterKind::Edges).unwrap();

        let library = Arc::new(MockLibrary::default());
        editor.save(library.clone()).unwrap().wait().unwrap();
        assert_eq!(library.get_saved(), vec![(6, 4)]);
    }

    #[test]
    fn save_failure_keeps_state() {
        let engine = MockEngine::new();
        let mut editor = Editor::new(FilterKind::Crystallize, Intensity::new(0.3));
        editor.select_image(source(6, 4));
        editor.apply(&engine).unwrap();

        let library = Arc::new(MockLibrary::failing("permission denied"));
        let err = editor.save(library).unwrap().wait().unwrap_err();
        assert!(err.to_string().contains("permission denied"));
        assert_eq!(editor.state(), EditorState::FilterApplied);
        assert_eq!(editor.filter(), FilterKind::Crystallize);
        assert_eq!(editor.intensity(), Intensity::new(0.3));
    }

    #[test]
    fn from_config_uses_editor_defaults() {
        let config = EditorConfig {
            filter: FilterKind::GaussianBlur,
            intensity: 1.5,
        };
        let editor = Editor::from_config(&config);
        assert_eq!(editor.filter(), FilterKind::GaussianBlur);
        assert_eq!(editor.intensity(), Intensity::MAX);
    }
}
