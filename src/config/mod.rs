pub mod layout;
pub mod load;
pub mod save;
pub mod types;

pub use layout::{CATALOG_FILE_NAME, LibraryLayout};
pub use types::{
    Config, DEFAULT_QUARANTINE_DIR, DEFAULT_THUMBNAIL_DIR, DEFAULT_VIDEO_EXTENSIONS, GridShape,
    MAX_CELL_WIDTH, MAX_GRID_SIDE, UserSettings,
};
