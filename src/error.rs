use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TriageError>;

#[derive(Error, Debug)]
pub enum TriageError {
    /// Unreadable entry; the walk skips it and keeps going.
    #[error("cannot read {}: {source}", path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("no decodable frames in {}: {reason}", video.display())]
    Decode { video: PathBuf, reason: String },

    #[error("catalog store failure: {0}")]
    CatalogIo(#[from] rusqlite::Error),

    #[error("no catalog record for {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot quarantine {}: {reason}", video.display())]
    QuarantineMove { video: PathBuf, reason: String },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl TriageError {
    pub fn decode(video: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Decode {
            video: video.into(),
            reason: reason.to_string(),
        }
    }

    pub fn quarantine(video: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::QuarantineMove {
            video: video.into(),
            reason: reason.to_string(),
        }
    }

    /// Store failures abort the current phase; everything else is per-file.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::CatalogIo(_))
    }
}
