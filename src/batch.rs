//! Filtering many files at once.
//!
//! Every input becomes a [`FilterJob`] writing `<stem>-<filter>.<ext>` into
//! the output directory. Jobs run in parallel on the global rayon pool; a
//! failing file is reported and the rest carry on.
//!
//! Progress is streamed as [`BatchEvent`]s over an optional channel so the
//! caller can print while work is still running:
//!
//! ```text
//! 001/002 cat.jpg → out/cat-twirl-distortion.jpg
//!     1200x800, radius: 400, angle: 3.142, center: (600, 400)
//! 002/002 (notes.txt) failed: unsupported image format (expected jpg, jpeg, png, tif, tiff, webp)
//! ```

use crate::filter::{FilterKind, Intensity};
use crate::imaging::{
    FilterEngine, FilterJob, FilteredFile, ImageBackend, OutputFormat, Quality, RustBackend,
    filter_file, is_supported_input, output_path, supported_input_extensions,
};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no input files given")]
    NoInputs,
    #[error("{} and {} would both be written to {}", first.display(), second.display(), output.display())]
    OutputCollision {
        first: PathBuf,
        second: PathBuf,
        output: PathBuf,
    },
    #[error("{failed} of {total} files failed")]
    FilesFailed { failed: usize, total: usize },
}

/// Settings shared by every file in a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOptions {
    pub kind: FilterKind,
    pub intensity: Intensity,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub quality: Quality,
}

/// Progress reported while a batch runs. `index` is 1-based input order.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Filtered {
        index: usize,
        total: usize,
        file: FilteredFile,
    },
    Failed {
        index: usize,
        total: usize,
        source: PathBuf,
        error: String,
    },
}

/// Files written by a successful batch, in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub filtered: Vec<FilteredFile>,
}

/// Build one job per input. Rejects batches where two inputs share an output.
pub fn plan_jobs(inputs: &[PathBuf], options: &BatchOptions) -> Result<Vec<FilterJob>, BatchError> {
    if inputs.is_empty() {
        return Err(BatchError::NoInputs);
    }

    let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
    let mut jobs = Vec::with_capacity(inputs.len());
    for source in inputs {
        let output = output_path(&options.output_dir, source, options.kind, options.format);
        if let Some(first) = claimed.insert(output.clone(), source) {
            return Err(BatchError::OutputCollision {
                first: first.to_path_buf(),
                second: source.clone(),
                output,
            });
        }
        jobs.push(FilterJob {
            source: source.clone(),
            output,
            kind: options.kind,
            intensity: options.intensity,
            format: options.format,
            quality: options.quality,
        });
    }
    Ok(jobs)
}

/// Filter `inputs` with the built-in backend.
pub fn run(
    inputs: &[PathBuf],
    options: &BatchOptions,
    progress: Option<Sender<BatchEvent>>,
) -> Result<BatchSummary, BatchError> {
    let backend = RustBackend::new();
    run_with_backend(&backend, &backend, inputs, options, progress)
}

/// Filter `inputs` using a specific backend and engine (allows testing with mocks).
pub fn run_with_backend<B: ImageBackend, E: FilterEngine>(
    backend: &B,
    engine: &E,
    inputs: &[PathBuf],
    options: &BatchOptions,
    progress: Option<Sender<BatchEvent>>,
) -> Result<BatchSummary, BatchError> {
    let jobs = plan_jobs(inputs, options)?;
    std::fs::create_dir_all(&options.output_dir)?;

    let total = jobs.len();
    log::debug!(
        "filtering {} files with {} at {}",
        total,
        options.kind,
        options.intensity.value()
    );

    let results: Vec<Option<FilteredFile>> = jobs
        .par_iter()
        .enumerate()
        .map(|(i, job)| {
            let index = i + 1;
            let outcome = if is_supported_input(&job.source) {
                filter_file(backend, engine, job).map_err(|e| e.to_string())
            } else {
                Err(format!(
                    "unsupported image format (expected {})",
                    supported_input_extensions().join(", ")
                ))
            };

            match outcome {
                Ok(file) => {
                    if let Some(tx) = &progress {
                        let _ = tx.send(BatchEvent::Filtered {
                            index,
                            total,
                            file: file.clone(),
                        });
                    }
                    Some(file)
                }
                Err(error) => {
                    log::warn!("{}: {}", job.source.display(), error);
                    if let Some(tx) = &progress {
                        let _ = tx.send(BatchEvent::Failed {
                            index,
                            total,
                            source: job.source.clone(),
                            error,
                        });
                    }
                    None
                }
            }
        })
        .collect();

    let filtered: Vec<FilteredFile> = results.into_iter().flatten().collect();
    let failed = total - filtered.len();
    if failed > 0 {
        return Err(BatchError::FilesFailed { failed, total });
    }
    Ok(BatchSummary { filtered })
}
