//! Saving finished images.
//!
//! A [`PhotoLibrary`] accepts a final image and reports where it went. Saves
//! run on a background thread; the outcome comes back as a `Result` over a
//! channel, wrapped in [`PendingSave`]. Failures are reported once with their
//! description and never retried.
//!
//! [`DirectoryLibrary`] is the stock implementation: it writes
//! `photo-0001.jpg`, `photo-0002.jpg`, ... into a directory, skipping names
//! that already exist.

use crate::imaging::{BackendError, EncodeParams, ImageBackend, OutputFormat, ProcessedImage, Quality};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("save task ended without reporting a result")]
    Disconnected,
}

/// Where a saved image ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPhoto {
    pub location: PathBuf,
}

/// Destination for finished images.
pub trait PhotoLibrary: Send + Sync {
    fn write(&self, image: &ProcessedImage) -> Result<SavedPhoto, SaveError>;
}

/// A save running in the background.
#[derive(Debug)]
pub struct PendingSave {
    rx: Receiver<Result<SavedPhoto, SaveError>>,
}

impl PendingSave {
    /// Block until the save finishes.
    pub fn wait(self) -> Result<SavedPhoto, SaveError> {
        self.rx.recv().unwrap_or(Err(SaveError::Disconnected))
    }

    /// The outcome if the save has already finished.
    pub fn try_result(&self) -> Option<Result<SavedPhoto, SaveError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(SaveError::Disconnected)),
        }
    }
}

/// Hand `image` to `library` on a background thread.
pub fn save_in_background<L>(library: Arc<L>, image: ProcessedImage) -> PendingSave
where
    L: PhotoLibrary + ?Sized + 'static,
{
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let result = library.write(&image);
        match &result {
            Ok(saved) => log::info!("saved photo to {}", saved.location.display()),
            Err(e) => log::warn!("save failed: {e}"),
        }
        // Receiver may have been dropped; nobody is waiting then.
        let _ = tx.send(result);
    });
    PendingSave { rx }
}

/// Writes images into a directory with sequential names.
pub struct DirectoryLibrary<B: ImageBackend> {
    root: PathBuf,
    backend: B,
    format: OutputFormat,
    quality: Quality,
    next_index: Mutex<u32>,
}

impl<B: ImageBackend> DirectoryLibrary<B> {
    pub fn new(root: impl Into<PathBuf>, backend: B, format: OutputFormat, quality: Quality) -> Self {
        Self {
            root: root.into(),
            backend,
            format,
            quality,
            next_index: Mutex::new(1),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_name(&self, index: u32) -> String {
        format!("photo-{:04}.{}", index, self.format.extension())
    }

    /// Claim the next unused path. Holding the lock keeps concurrent saves
    /// from picking the same name.
    fn claim_path(&self) -> PathBuf {
        let mut next = self
            .next_index
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        loop {
            let candidate = self.root.join(self.file_name(*next));
            *next += 1;
            if !candidate.exists() {
                return candidate;
            }
        }
    }
}

impl<B: ImageBackend + Send> PhotoLibrary for DirectoryLibrary<B> {
    fn write(&self, image: &ProcessedImage) -> Result<SavedPhoto, SaveError> {
        std::fs::create_dir_all(&self.root)?;
        let location = self.claim_path();
        self.backend.encode(
            image.image(),
            &EncodeParams {
                output: location.clone(),
                format: self.format,
                quality: self.quality,
            },
        )?;
        Ok(SavedPhoto { location })
    }
}
