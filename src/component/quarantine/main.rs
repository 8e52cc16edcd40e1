use crate::component::catalog::CatalogStore;
use crate::config::LibraryLayout;
use crate::error::{Result, TriageError};
use crate::tools::{ensure_directory_exists, unique_destination};
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuarantinedEntry {
    pub video_path: PathBuf,
    pub thumbnail_path: PathBuf,
    pub quarantined_video: PathBuf,
    pub quarantined_thumbnail: PathBuf,
}

#[derive(Debug)]
pub struct QuarantineFailure {
    pub video_path: PathBuf,
    pub error: TriageError,
}

#[derive(Debug, Default)]
pub struct QuarantineReport {
    pub moved: Vec<QuarantinedEntry>,
    pub failures: Vec<QuarantineFailure>,
}

impl QuarantineReport {
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Moves selected videos and their mosaics into the quarantine directory.
///
/// Each entry is all-or-nothing: both files move and the catalog record goes, or
/// everything for that entry is put back. A failed entry never stops the others.
pub struct QuarantineExecutor<'a> {
    catalog: &'a CatalogStore,
    layout: &'a LibraryLayout,
    resolve_collisions: bool,
}

impl<'a> QuarantineExecutor<'a> {
    #[must_use]
    pub const fn new(catalog: &'a CatalogStore, layout: &'a LibraryLayout) -> Self {
        Self {
            catalog,
            layout,
            resolve_collisions: true,
        }
    }

    /// With resolution off, an existing file of the same name fails the entry.
    #[must_use]
    pub const fn with_collision_resolution(mut self, resolve_collisions: bool) -> Self {
        self.resolve_collisions = resolve_collisions;
        self
    }

    pub fn execute<'p, I>(&self, selected: I) -> Result<QuarantineReport>
    where
        I: IntoIterator<Item = &'p PathBuf>,
    {
        let mut report = QuarantineReport::default();

        for video in selected {
            match self.quarantine_one(video) {
                Ok(entry) => {
                    info!(
                        "Quarantined {} -> {}",
                        entry.video_path.display(),
                        entry.quarantined_video.display()
                    );
                    report.moved.push(entry);
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    error!("Quarantine failed for {}: {e}", video.display());
                    report.failures.push(QuarantineFailure {
                        video_path: video.clone(),
                        error: e,
                    });
                }
            }
        }

        info!(
            "Quarantine done - moved: {}, failed: {}",
            report.moved.len(),
            report.failures.len()
        );
        Ok(report)
    }

    fn quarantine_one(&self, video: &Path) -> Result<QuarantinedEntry> {
        let thumbnail = self.catalog.lookup(video)?;

        let quarantine_dir = self.layout.quarantine_dir();
        ensure_directory_exists(quarantine_dir)
            .map_err(|e| TriageError::quarantine(video, e))?;

        let video_dest = self.destination_for(video, video)?;
        let thumbnail_dest = self.destination_for(video, &thumbnail)?;

        move_file(video, video, &video_dest)?;
        if let Err(e) = move_file(video, &thumbnail, &thumbnail_dest) {
            restore(&video_dest, video);
            return Err(e);
        }

        if let Err(e) = self.catalog.remove(video) {
            restore(&thumbnail_dest, &thumbnail);
            restore(&video_dest, video);
            return Err(e);
        }

        Ok(QuarantinedEntry {
            video_path: video.to_path_buf(),
            thumbnail_path: thumbnail,
            quarantined_video: video_dest,
            quarantined_thumbnail: thumbnail_dest,
        })
    }

    fn destination_for(&self, video: &Path, file: &Path) -> Result<PathBuf> {
        let file_name = file
            .file_name()
            .ok_or_else(|| TriageError::quarantine(video, "path has no file name"))?;

        unique_destination(
            self.layout.quarantine_dir(),
            Path::new(file_name),
            self.resolve_collisions,
        )
        .ok_or_else(|| {
            TriageError::quarantine(
                video,
                format!(
                    "{} already exists in quarantine",
                    file_name.to_string_lossy()
                ),
            )
        })
    }
}

fn move_file(video: &Path, from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to).map_err(|e| {
        TriageError::quarantine(
            video,
            format!("cannot move {} to {}: {e}", from.display(), to.display()),
        )
    })
}

/// Best-effort undo of a completed move.
fn restore(moved_to: &Path, original: &Path) {
    if let Err(e) = fs::rename(moved_to, original) {
        error!(
            "Could not restore {} to {}: {e}",
            moved_to.display(),
            original.display()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UserSettings;
    use tempfile::TempDir;

    struct Fixture {
        _temp_dir: TempDir,
        layout: LibraryLayout,
        catalog: CatalogStore,
    }

    impl Fixture {
        fn new() -> Self {
            let temp_dir = TempDir::new().unwrap();
            let layout = LibraryLayout::new(temp_dir.path(), &UserSettings::default()).unwrap();
            layout.ensure_thumbnail_dir().unwrap();
            let catalog = CatalogStore::open(&layout.catalog_path()).unwrap();
            Self {
                _temp_dir: temp_dir,
                layout,
                catalog,
            }
        }

        fn add(&self, name: &str) -> PathBuf {
            let video = self.layout.root().join(name);
            let thumb = self.layout.thumbnail_dir().join(format!("{name}.jpg"));
            fs::write(&video, format!("video {name}")).unwrap();
            fs::write(&thumb, format!("thumb {name}")).unwrap();
            self.catalog.insert(&video, &thumb).unwrap();
            video
        }
    }

    #[test]
    fn test_quarantine_moves_both_files_and_drops_record() {
        let fx = Fixture::new();
        let video = fx.add("a.mp4");

        let report = QuarantineExecutor::new(&fx.catalog, &fx.layout)
            .execute([&video])
            .unwrap();

        assert_eq!(report.moved.len(), 1);
        assert!(!report.has_failures());
        let entry = &report.moved[0];
        assert!(!video.exists());
        assert!(!entry.thumbnail_path.exists());
        assert_eq!(fs::read_to_string(&entry.quarantined_video).unwrap(), "video a.mp4");
        assert_eq!(
            fs::read_to_string(&entry.quarantined_thumbnail).unwrap(),
            "thumb a.mp4"
        );
        assert!(entry.quarantined_video.starts_with(fx.layout.quarantine_dir()));
        assert!(fx.catalog.is_empty().unwrap());
    }

    #[test]
    fn test_collision_gets_numeric_suffix() {
        let fx = Fixture::new();
        let video = fx.add("a.mp4");
        fx.layout.ensure_quarantine_dir().unwrap();
        fs::write(fx.layout.quarantine_dir().join("a.mp4"), "older").unwrap();

        let report = QuarantineExecutor::new(&fx.catalog, &fx.layout)
            .execute([&video])
            .unwrap();

        assert_eq!(
            report.moved[0].quarantined_video,
            fx.layout.quarantine_dir().join("a_1.mp4")
        );
        assert_eq!(
            fs::read_to_string(fx.layout.quarantine_dir().join("a.mp4")).unwrap(),
            "older"
        );
    }

    #[test]
    fn test_missing_thumbnail_rolls_back_video() {
        let fx = Fixture::new();
        let video = fx.add("a.mp4");
        let thumb = fx.catalog.lookup(&video).unwrap();
        fs::remove_file(&thumb).unwrap();

        let report = QuarantineExecutor::new(&fx.catalog, &fx.layout)
            .execute([&video])
            .unwrap();

        assert!(report.moved.is_empty());
        assert!(matches!(
            report.failures[0].error,
            TriageError::QuarantineMove { .. }
        ));
        assert!(video.exists());
        assert!(!fx.layout.quarantine_dir().join("a.mp4").exists());
        assert!(fx.catalog.contains(&video).unwrap());
    }

    #[test]
    fn test_uncatalogued_selection_is_not_found() {
        let fx = Fixture::new();
        let stray = fx.layout.root().join("stray.mp4");
        fs::write(&stray, "video").unwrap();

        let report = QuarantineExecutor::new(&fx.catalog, &fx.layout)
            .execute([&stray])
            .unwrap();

        assert!(matches!(report.failures[0].error, TriageError::NotFound(_)));
        assert!(stray.exists());
    }

    #[test]
    fn test_catalog_failure_aborts_remaining_selection() {
        let fx = Fixture::new();
        let first = fx.add("a.mp4");
        let second = fx.add("b.mp4");
        let second_thumb = fx.catalog.lookup(&second).unwrap();
        let selected = vec![first.clone(), second.clone()];

        let catalog_path = fx.layout.catalog_path();
        let result = QuarantineExecutor::new(&fx.catalog, &fx.layout).execute(
            selected.iter().enumerate().map(|(index, video)| {
                if index == 1 {
                    let other = rusqlite::Connection::open(&catalog_path).unwrap();
                    other.busy_timeout(std::time::Duration::from_secs(5)).unwrap();
                    other.execute_batch("DROP TABLE thumbnails").unwrap();
                }
                video
            }),
        );

        assert!(matches!(result, Err(TriageError::CatalogIo(_))));

        // the entry finished before the failure stays fully quarantined
        assert!(!first.exists());
        assert_eq!(
            fs::read_to_string(fx.layout.quarantine_dir().join("a.mp4")).unwrap(),
            "video a.mp4"
        );
        assert!(fx.layout.quarantine_dir().join("a.mp4.jpg").is_file());

        // the aborted one is untouched
        assert_eq!(fs::read_to_string(&second).unwrap(), "video b.mp4");
        assert!(second_thumb.is_file());
        assert!(!fx.layout.quarantine_dir().join("b.mp4").exists());
    }
}
