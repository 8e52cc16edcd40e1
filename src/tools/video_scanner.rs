use crate::config::{LibraryLayout, UserSettings};
use crate::error::TriageError;
use log::warn;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone)]
pub struct VideoFileInfo {
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<SystemTime>,
    pub extension: String,
}

/// Walks a triage root for candidate videos, skipping the reserved subtrees.
///
/// Every call to [`VideoScanner::scan`] starts a fresh walk, entries come out in
/// file-name order, and unreadable entries are logged and skipped.
#[derive(Debug, Clone)]
pub struct VideoScanner {
    layout: LibraryLayout,
    extensions: HashSet<String>,
}

impl VideoScanner {
    #[must_use]
    pub fn new(layout: &LibraryLayout, settings: &UserSettings) -> Self {
        Self {
            layout: layout.clone(),
            extensions: settings.extension_set(),
        }
    }

    #[must_use]
    pub fn is_video_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.contains(&ext.to_lowercase()))
    }

    pub fn scan(&self) -> impl Iterator<Item = VideoFileInfo> + '_ {
        WalkDir::new(self.layout.root())
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.layout.is_reserved(entry.path()))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(source) => {
                    let path = source
                        .path()
                        .map_or_else(|| self.layout.root().to_path_buf(), Path::to_path_buf);
                    warn!("{}", TriageError::Discovery { path, source });
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && self.is_video_file(entry.path()))
            .filter_map(Self::to_video_info)
    }

    fn to_video_info(entry: DirEntry) -> Option<VideoFileInfo> {
        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(source) => {
                let path = entry.path().to_path_buf();
                warn!("{}", TriageError::Discovery { path, source });
                return None;
            }
        };
        let extension = entry
            .path()
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        Some(VideoFileInfo {
            size: metadata.len(),
            modified: metadata.modified().ok(),
            extension,
            path: entry.into_path(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scanner_for(root: &Path) -> VideoScanner {
        let settings = UserSettings::default();
        let layout = LibraryLayout::new(root, &settings).unwrap();
        VideoScanner::new(&layout, &settings)
    }

    #[test]
    fn test_scan_filters_extensions_case_insensitively() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("b.MP4"), "video").unwrap();
        fs::write(root.join("a.mkv"), "video").unwrap();
        fs::write(root.join("notes.txt"), "text").unwrap();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("nested/c.flv"), "video").unwrap();

        let scanner = scanner_for(root);
        let names: Vec<String> = scanner
            .scan()
            .map(|v| v.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["a.mkv", "b.MP4", "c.flv"]);
    }

    #[test]
    fn test_scan_skips_reserved_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("keep.mp4"), "video").unwrap();
        fs::create_dir(root.join("_video_filter")).unwrap();
        fs::write(root.join("_video_filter/cached.mp4"), "video").unwrap();
        fs::create_dir(root.join("_video_filter_deleted")).unwrap();
        fs::write(root.join("_video_filter_deleted/gone.mp4"), "video").unwrap();

        let scanner = scanner_for(root);
        let found: Vec<VideoFileInfo> = scanner.scan().collect();

        assert_eq!(found.len(), 1);
        assert!(found[0].path.ends_with("keep.mp4"));
        assert_eq!(found[0].size, 5);
        assert_eq!(found[0].extension, "mp4");
    }

    #[test]
    fn test_scan_is_restartable() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.avi"), "video").unwrap();

        let scanner = scanner_for(temp_dir.path());
        assert_eq!(scanner.scan().count(), 1);
        fs::write(temp_dir.path().join("b.wmv"), "video").unwrap();
        assert_eq!(scanner.scan().count(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("ok.mp4"), "video").unwrap();
        let locked = root.join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("hidden.mp4"), "video").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let scanner = scanner_for(root);
        let found: Vec<VideoFileInfo> = scanner.scan().collect();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        // root ignores permission bits, so only require that the walk survived
        assert!(found.iter().any(|v| v.path.ends_with("ok.mp4")));
    }
}
