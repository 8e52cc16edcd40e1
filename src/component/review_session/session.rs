use crate::component::catalog::{CatalogStore, ThumbnailRecord};
use crate::error::Result;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEntry {
    pub video_path: PathBuf,
    pub thumbnail_path: PathBuf,
}

impl From<ThumbnailRecord> for ReviewEntry {
    fn from(record: ThumbnailRecord) -> Self {
        Self {
            video_path: record.video_path,
            thumbnail_path: record.thumbnail_path,
        }
    }
}

/// Cursor and deletion selection over a fixed snapshot of the catalog.
///
/// The snapshot is taken once and never refreshed. Selection is independent of the
/// cursor, and nothing here touches the catalog or the filesystem.
#[derive(Debug, Clone, Default)]
pub struct ReviewSession {
    entries: Vec<ReviewEntry>,
    cursor: usize,
    selected: BTreeSet<PathBuf>,
    refresh_counts: HashMap<PathBuf, u32>,
}

impl ReviewSession {
    #[must_use]
    pub fn new(entries: Vec<ReviewEntry>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    pub fn from_catalog(catalog: &CatalogStore) -> Result<Self> {
        let entries = catalog.list()?.into_iter().map(ReviewEntry::from).collect();
        Ok(Self::new(entries))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Zero-based cursor index, `None` for an empty snapshot.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.cursor)
    }

    #[must_use]
    pub fn entries(&self) -> &[ReviewEntry] {
        &self.entries
    }

    #[must_use]
    pub fn current(&self) -> Option<&ReviewEntry> {
        self.entries.get(self.cursor)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&ReviewEntry> {
        if !self.entries.is_empty() {
            self.cursor = (self.cursor + 1) % self.entries.len();
        }
        self.current()
    }

    pub fn previous(&mut self) -> Option<&ReviewEntry> {
        if !self.entries.is_empty() {
            self.cursor = (self.cursor + self.entries.len() - 1) % self.entries.len();
        }
        self.current()
    }

    /// Flips the selection of `video`. Returns whether it is now selected;
    /// paths outside the snapshot are never selected.
    pub fn toggle_select(&mut self, video: &Path) -> bool {
        if !self.entries.iter().any(|e| e.video_path == video) {
            return false;
        }
        if self.selected.remove(video) {
            false
        } else {
            self.selected.insert(video.to_path_buf());
            true
        }
    }

    pub fn toggle_current(&mut self) -> Option<bool> {
        let video = self.current()?.video_path.clone();
        Some(self.toggle_select(&video))
    }

    #[must_use]
    pub fn is_selected(&self, video: &Path) -> bool {
        self.selected.contains(video)
    }

    #[must_use]
    pub const fn selected(&self) -> &BTreeSet<PathBuf> {
        &self.selected
    }

    /// Sampling offset for the next refresh of the current entry: each request moves
    /// `step` further than the previous one.
    pub fn next_refresh_offset(&mut self, base: Duration, step: Duration) -> Option<Duration> {
        let video = self.current()?.video_path.clone();
        let count = self.refresh_counts.entry(video).or_insert(0);
        *count += 1;
        Some(base + step * *count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(names: &[&str]) -> ReviewSession {
        ReviewSession::new(
            names
                .iter()
                .map(|name| ReviewEntry {
                    video_path: PathBuf::from(format!("/v/{name}.mp4")),
                    thumbnail_path: PathBuf::from(format!("/t/{name}.mp4.jpg")),
                })
                .collect(),
        )
    }

    fn current_name(session: &ReviewSession) -> String {
        session
            .current()
            .unwrap()
            .video_path
            .file_stem()
            .unwrap()
            .to_string_lossy()
            .to_string()
    }

    #[test]
    fn test_navigation_wraps_around() {
        let mut session = session(&["a", "b", "c"]);
        assert_eq!(current_name(&session), "a");

        session.next();
        session.next();
        assert_eq!(current_name(&session), "c");
        session.next();
        assert_eq!(current_name(&session), "a");
        session.previous();
        assert_eq!(current_name(&session), "c");
        assert_eq!(session.position(), Some(2));
    }

    #[test]
    fn test_empty_session() {
        let mut session = session(&[]);
        assert!(session.is_empty());
        assert!(session.current().is_none());
        assert!(session.next().is_none());
        assert!(session.previous().is_none());
        assert_eq!(session.position(), None);
        assert_eq!(session.toggle_current(), None);
    }

    #[test]
    fn test_toggle_is_a_flip() {
        let mut session = session(&["a", "b"]);
        let a = Path::new("/v/a.mp4");

        assert!(session.toggle_select(a));
        assert!(session.is_selected(a));
        assert!(!session.toggle_select(a));
        assert!(session.selected().is_empty());
    }

    #[test]
    fn test_selection_is_independent_of_cursor() {
        let mut session = session(&["a", "b", "c"]);
        session.toggle_current();
        session.next();
        session.next();
        session.toggle_current();
        session.previous();

        let selected: Vec<&PathBuf> = session.selected().iter().collect();
        assert_eq!(selected, vec![Path::new("/v/a.mp4"), Path::new("/v/c.mp4")]);
        assert_eq!(current_name(&session), "b");
    }

    #[test]
    fn test_unknown_path_is_never_selected() {
        let mut session = session(&["a"]);
        assert!(!session.toggle_select(Path::new("/v/zzz.mp4")));
        assert!(session.selected().is_empty());
    }

    #[test]
    fn test_refresh_offset_grows_per_entry() {
        let mut session = session(&["a", "b"]);
        let step = Duration::from_secs(90);

        assert_eq!(session.next_refresh_offset(Duration::ZERO, step), Some(step));
        assert_eq!(session.next_refresh_offset(Duration::ZERO, step), Some(step * 2));
        session.next();
        assert_eq!(
            session.next_refresh_offset(Duration::from_secs(5), step),
            Some(Duration::from_secs(95))
        );
    }

    #[test]
    fn test_from_catalog_snapshot_is_fixed() {
        let catalog = CatalogStore::open_in_memory().unwrap();
        catalog.insert(Path::new("/v/b.mp4"), Path::new("/t/b.jpg")).unwrap();
        catalog.insert(Path::new("/v/a.mp4"), Path::new("/t/a.jpg")).unwrap();

        let session = ReviewSession::from_catalog(&catalog).unwrap();
        catalog.insert(Path::new("/v/c.mp4"), Path::new("/t/c.jpg")).unwrap();

        assert_eq!(session.len(), 2);
        assert_eq!(current_name(&session), "a");
    }
}
