use crate::component::catalog::CatalogStore;
use crate::component::mosaic_generator::{GenerationOutcome, MosaicGenerator};
use crate::error::{Result, TriageError};
use crate::tools::sweep_temp_files;
use indicatif::ProgressBar;
use log::{error, info, warn};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug)]
pub struct GenerationFailure {
    pub video_path: PathBuf,
    pub error: TriageError,
}

/// Summary of one generation batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub total_candidates: usize,
    /// Newly decoded and catalogued.
    pub created: Vec<PathBuf>,
    /// Mosaic was already on disk without a record; catalogued without decoding.
    pub adopted: Vec<PathBuf>,
    pub already_catalogued: usize,
    /// Records whose mosaic had vanished; dropped and regenerated.
    pub healed: usize,
    pub cancelled: usize,
    pub stale_temp_files_removed: usize,
    pub failures: Vec<GenerationFailure>,
}

impl BatchReport {
    #[must_use]
    pub fn newly_catalogued(&self) -> usize {
        self.created.len() + self.adopted.len()
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

enum TaskOutcome {
    Created(PathBuf),
    Adopted(PathBuf),
    Failed(GenerationFailure),
    Cancelled,
}

/// Runs mosaic generation over many videos on a bounded rayon pool.
///
/// Workers decode in parallel; catalog inserts go through the store's single writer.
/// Per-video failures are collected into the report. A catalog failure aborts the batch.
pub struct BulkGenerator<'a> {
    generator: &'a MosaicGenerator,
    catalog: &'a CatalogStore,
    worker_count: usize,
    revalidate: bool,
    shutdown_signal: Arc<AtomicBool>,
    progress: ProgressBar,
}

impl<'a> BulkGenerator<'a> {
    #[must_use]
    pub fn new(
        generator: &'a MosaicGenerator,
        catalog: &'a CatalogStore,
        shutdown_signal: Arc<AtomicBool>,
    ) -> Self {
        Self {
            generator,
            catalog,
            worker_count: 0,
            revalidate: true,
            shutdown_signal,
            progress: ProgressBar::hidden(),
        }
    }

    /// 0 sizes the pool to the number of cores.
    #[must_use]
    pub const fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    #[must_use]
    pub const fn with_revalidation(mut self, revalidate: bool) -> Self {
        self.revalidate = revalidate;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn run<I>(&self, candidates: I) -> Result<BatchReport>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut report = BatchReport::default();

        let thumbnail_dir = self.generator.layout().thumbnail_dir();
        report.stale_temp_files_removed = sweep_temp_files(thumbnail_dir).unwrap_or_else(|e| {
            warn!("Could not sweep temp files in {}: {e}", thumbnail_dir.display());
            0
        });

        let pending = self.select_pending(candidates, &mut report)?;
        info!(
            "Generating {} mosaics ({} already catalogued)",
            pending.len(),
            report.already_catalogued
        );

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.worker_count)
            .build()
            .map_err(io::Error::other)?;

        self.progress.set_length(pending.len() as u64);
        let outcomes = pool.install(|| {
            pending
                .par_iter()
                .map(|video| self.process(video))
                .collect::<Result<Vec<TaskOutcome>>>()
        });
        self.progress.finish_and_clear();

        for outcome in outcomes? {
            match outcome {
                TaskOutcome::Created(video) => report.created.push(video),
                TaskOutcome::Adopted(video) => report.adopted.push(video),
                TaskOutcome::Failed(failure) => report.failures.push(failure),
                TaskOutcome::Cancelled => report.cancelled += 1,
            }
        }
        report.created.sort();
        report.adopted.sort();
        report
            .failures
            .sort_by(|a, b| a.video_path.cmp(&b.video_path));

        info!(
            "Batch done - created: {}, adopted: {}, skipped: {}, healed: {}, failed: {}, cancelled: {}",
            report.created.len(),
            report.adopted.len(),
            report.already_catalogued,
            report.healed,
            report.failures.len(),
            report.cancelled
        );

        Ok(report)
    }

    /// Drops already catalogued videos. With revalidation on, a record whose mosaic
    /// file is gone is removed so the video is generated again.
    fn select_pending<I>(&self, candidates: I, report: &mut BatchReport) -> Result<Vec<PathBuf>>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut pending = Vec::new();

        for video in candidates {
            report.total_candidates += 1;

            let Some(record) = self.catalog.get(&video)? else {
                pending.push(video);
                continue;
            };

            if self.revalidate && !record.thumbnail_path.is_file() {
                warn!(
                    "Mosaic missing for catalogued {}, regenerating",
                    video.display()
                );
                self.catalog.remove(&video)?;
                report.healed += 1;
                pending.push(video);
            } else {
                report.already_catalogued += 1;
            }
        }

        Ok(pending)
    }

    fn process(&self, video: &Path) -> Result<TaskOutcome> {
        if self.shutdown_signal.load(Ordering::SeqCst) {
            return Ok(TaskOutcome::Cancelled);
        }

        let outcome = match self.generator.generate(video) {
            Ok(mosaic) => {
                self.catalog.insert(video, &mosaic.thumbnail_path)?;
                match mosaic.outcome {
                    GenerationOutcome::Created => TaskOutcome::Created(video.to_path_buf()),
                    GenerationOutcome::Reused => TaskOutcome::Adopted(video.to_path_buf()),
                }
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                error!("Mosaic generation failed for {}: {e}", video.display());
                TaskOutcome::Failed(GenerationFailure {
                    video_path: video.to_path_buf(),
                    error: e,
                })
            }
        };

        self.progress.inc(1);
        Ok(outcome)
    }
}
