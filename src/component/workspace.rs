use crate::component::bulk_generation::{BatchReport, BulkGenerator};
use crate::component::catalog::CatalogStore;
use crate::component::mosaic_generator::{GeneratedMosaic, MosaicGenerator, MosaicSpec};
use crate::component::quarantine::{QuarantineExecutor, QuarantineReport};
use crate::component::review_session::ReviewSession;
use crate::config::{LibraryLayout, UserSettings};
use crate::error::Result;
use crate::tools::{FrameDecoder, VideoFileInfo, VideoScanner};
use indicatif::ProgressBar;
use log::info;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// One triage root with its catalog open.
///
/// This is everything a front end gets: candidate listing, bulk generation, review
/// sessions and quarantine. The catalog handle lives exactly as long as the workspace,
/// so dropping it at the end of a phase closes the store on every exit path.
pub struct Workspace {
    settings: UserSettings,
    scanner: VideoScanner,
    generator: MosaicGenerator,
    catalog: CatalogStore,
}

impl Workspace {
    pub fn open(
        root: &Path,
        settings: &UserSettings,
        decoder: Arc<dyn FrameDecoder>,
    ) -> Result<Self> {
        let layout = LibraryLayout::new(root, settings)?;
        layout.ensure_thumbnail_dir()?;
        let catalog = CatalogStore::open(&layout.catalog_path())?;

        info!("Workspace opened at {}", layout.root().display());

        Ok(Self {
            settings: settings.clone(),
            scanner: VideoScanner::new(&layout, settings),
            generator: MosaicGenerator::new(decoder, layout, MosaicSpec::from_settings(settings)),
            catalog,
        })
    }

    #[must_use]
    pub const fn layout(&self) -> &LibraryLayout {
        self.generator.layout()
    }

    #[must_use]
    pub const fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    #[must_use]
    pub fn list_candidates(&self) -> Vec<VideoFileInfo> {
        self.scanner.scan().collect()
    }

    pub fn generate_all(
        &self,
        shutdown_signal: Arc<AtomicBool>,
        progress: ProgressBar,
    ) -> Result<BatchReport> {
        let candidates = self.scanner.scan().map(|video| video.path);
        BulkGenerator::new(&self.generator, &self.catalog, shutdown_signal)
            .with_worker_count(self.settings.worker_count)
            .with_revalidation(self.settings.revalidate_thumbnails)
            .with_progress(progress)
            .run(candidates)
    }

    pub fn start_review(&self) -> Result<ReviewSession> {
        ReviewSession::from_catalog(&self.catalog)
    }

    /// Re-samples the session's current video at the next refresh offset.
    pub fn refresh_current(&self, session: &mut ReviewSession) -> Result<Option<GeneratedMosaic>> {
        let Some(offset) =
            session.next_refresh_offset(self.settings.sample_offset(), self.settings.refresh_step())
        else {
            return Ok(None);
        };
        let Some(entry) = session.current() else {
            return Ok(None);
        };
        self.generator.refresh(&entry.video_path, offset).map(Some)
    }

    pub fn quarantine_selected(&self, session: &ReviewSession) -> Result<QuarantineReport> {
        QuarantineExecutor::new(&self.catalog, self.generator.layout())
            .with_collision_resolution(self.settings.resolve_collisions)
            .execute(session.selected())
    }

    #[must_use]
    pub fn video_size(&self, video: &Path) -> Option<u64> {
        std::fs::metadata(video).ok().map(|m| m.len())
    }
}
