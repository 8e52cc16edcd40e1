use crate::config::types::UserSettings;
use crate::error::Result;
use crate::tools::{ensure_directory_exists, validate_directory_exists};
use std::fs;
use std::path::{Path, PathBuf};

pub const CATALOG_FILE_NAME: &str = "catalog.db";

/// Absolute paths of one triage root and its reserved subdirectories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryLayout {
    root: PathBuf,
    thumbnail_dir: PathBuf,
    quarantine_dir: PathBuf,
}

impl LibraryLayout {
    pub fn new(root: &Path, settings: &UserSettings) -> Result<Self> {
        settings.validate()?;
        validate_directory_exists(root)?;
        let root = fs::canonicalize(root)?;

        Ok(Self {
            thumbnail_dir: root.join(&settings.thumbnail_dir_name),
            quarantine_dir: root.join(&settings.quarantine_dir_name),
            root,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn thumbnail_dir(&self) -> &Path {
        &self.thumbnail_dir
    }

    #[must_use]
    pub fn quarantine_dir(&self) -> &Path {
        &self.quarantine_dir
    }

    #[must_use]
    pub fn catalog_path(&self) -> PathBuf {
        self.thumbnail_dir.join(CATALOG_FILE_NAME)
    }

    /// True for anything inside the thumbnail or quarantine subtree.
    #[must_use]
    pub fn is_reserved(&self, path: &Path) -> bool {
        path.starts_with(&self.thumbnail_dir) || path.starts_with(&self.quarantine_dir)
    }

    pub fn ensure_thumbnail_dir(&self) -> Result<()> {
        ensure_directory_exists(&self.thumbnail_dir)
    }

    pub fn ensure_quarantine_dir(&self) -> Result<()> {
        ensure_directory_exists(&self.quarantine_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_paths() {
        let temp_dir = TempDir::new().unwrap();
        let layout = LibraryLayout::new(temp_dir.path(), &UserSettings::default()).unwrap();
        let root = fs::canonicalize(temp_dir.path()).unwrap();

        assert_eq!(layout.root(), root);
        assert_eq!(layout.thumbnail_dir(), root.join("_video_filter"));
        assert_eq!(layout.catalog_path(), root.join("_video_filter/catalog.db"));
        assert!(layout.is_reserved(&root.join("_video_filter_deleted/a.mp4")));
        assert!(!layout.is_reserved(&root.join("clips/a.mp4")));
        assert!(!layout.thumbnail_dir().exists());
    }

    #[test]
    fn test_layout_requires_existing_root() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        assert!(LibraryLayout::new(&missing, &UserSettings::default()).is_err());
    }
}
