use crate::error::{Result, TriageError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_VIDEO_EXTENSIONS: [&str; 6] = ["mp4", "wmv", "avi", "mkv", "mpg", "flv"];
pub const DEFAULT_THUMBNAIL_DIR: &str = "_video_filter";
pub const DEFAULT_QUARANTINE_DIR: &str = "_video_filter_deleted";
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Upper bound for grid rows and columns.
pub const MAX_GRID_SIDE: u32 = 16;
/// Upper bound for the pixel width of one mosaic cell.
pub const MAX_CELL_WIDTH: u32 = 3840;

/// Mosaic grid: `rows` x `cols` sample cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: u32,
    pub cols: u32,
}

impl GridShape {
    #[must_use]
    pub const fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// K = rows * cols
    #[must_use]
    pub const fn cell_count(self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

impl Default for GridShape {
    fn default() -> Self {
        Self::new(2, 2)
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub thumbnail_dir_name: String,
    pub quarantine_dir_name: String,
    pub video_extensions: Vec<String>,
    pub grid: GridShape,
    /// Width of one mosaic cell in pixels; height follows the video's aspect ratio.
    pub cell_width: u32,
    pub jpeg_quality: u8,
    pub sample_offset_secs: u64,
    pub refresh_step_secs: u64,
    /// 0 means one worker per core.
    pub worker_count: usize,
    pub resolve_collisions: bool,
    pub revalidate_thumbnails: bool,
    pub last_used_dir: Option<String>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            thumbnail_dir_name: DEFAULT_THUMBNAIL_DIR.to_string(),
            quarantine_dir_name: DEFAULT_QUARANTINE_DIR.to_string(),
            video_extensions: DEFAULT_VIDEO_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
            grid: GridShape::default(),
            cell_width: 320,
            jpeg_quality: 85,
            sample_offset_secs: 0,
            refresh_step_secs: 90,
            worker_count: 0,
            resolve_collisions: true,
            revalidate_thumbnails: true,
            last_used_dir: None,
        }
    }
}

impl UserSettings {
    /// Lowercased extensions without the leading dot.
    #[must_use]
    pub fn extension_set(&self) -> HashSet<String> {
        self.video_extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect()
    }

    #[must_use]
    pub const fn sample_offset(&self) -> Duration {
        Duration::from_secs(self.sample_offset_secs)
    }

    #[must_use]
    pub const fn refresh_step(&self) -> Duration {
        Duration::from_secs(self.refresh_step_secs)
    }

    #[must_use]
    pub fn last_used_dir(&self) -> Option<PathBuf> {
        self.last_used_dir.as_ref().map(PathBuf::from)
    }

    pub fn validate(&self) -> Result<()> {
        let sides = 1..=MAX_GRID_SIDE;
        if !sides.contains(&self.grid.rows) || !sides.contains(&self.grid.cols) {
            return Err(TriageError::Config(format!(
                "grid rows and columns must be within 1..={MAX_GRID_SIDE}, got {}",
                self.grid
            )));
        }
        if !(1..=MAX_CELL_WIDTH).contains(&self.cell_width) {
            return Err(TriageError::Config(format!(
                "cell width must be within 1..={MAX_CELL_WIDTH}, got {}",
                self.cell_width
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(TriageError::Config(format!(
                "jpeg quality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        if self.extension_set().is_empty() {
            return Err(TriageError::Config("extension set is empty".into()));
        }
        check_dir_name("thumbnail", &self.thumbnail_dir_name)?;
        check_dir_name("quarantine", &self.quarantine_dir_name)?;
        if self.thumbnail_dir_name == self.quarantine_dir_name {
            return Err(TriageError::Config(
                "thumbnail and quarantine directories must differ".into(),
            ));
        }
        Ok(())
    }
}

/// Reserved directories live directly under the root, so each name must be one plain component.
fn check_dir_name(label: &str, name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(TriageError::Config(format!(
            "{label} directory name must be a single path component, got {name:?}"
        ))),
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: UserSettings,
    pub settings_path: PathBuf,
}
