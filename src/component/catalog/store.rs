use crate::error::{Result, TriageError};
use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailRecord {
    pub video_path: PathBuf,
    pub thumbnail_path: PathBuf,
    pub created_at: DateTime<Utc>,
}

impl ThumbnailRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let video_path: Vec<u8> = row.get(0)?;
        let thumbnail_path: Vec<u8> = row.get(1)?;
        let created_at: i64 = row.get(2)?;
        Ok(Self {
            video_path: path_from_key(video_path),
            thumbnail_path: path_from_key(thumbnail_path),
            created_at: DateTime::from_timestamp(created_at, 0).unwrap_or_default(),
        })
    }
}

/// Durable `video_path -> thumbnail_path` mapping in SQLite.
///
/// The connection sits behind a mutex, so one writer commits at a time and the store
/// can be shared by reference across worker threads. Every mutation is its own
/// synchronous transaction. Dropping the store closes the connection.
pub struct CatalogStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl CatalogStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
            db_path: Some(path.to_path_buf()),
        };
        store.init()?;
        debug!("Catalog opened at {}", path.display());
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
            db_path: None,
        };
        store.init()?;
        Ok(store)
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn init(&self) -> Result<()> {
        self.conn().execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = FULL;
             PRAGMA busy_timeout = 5000;
             CREATE TABLE IF NOT EXISTS thumbnails (
                 video_path      BLOB PRIMARY KEY NOT NULL,
                 thumbnail_path  BLOB NOT NULL,
                 created_at      INTEGER NOT NULL
             );",
        )?;
        Ok(())
    }

    // Each statement runs to completion under the lock, so a panic elsewhere
    // cannot leave the connection mid-transaction.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Upsert without overwrite: returns `false` when the video is already catalogued.
    pub fn insert(&self, video_path: &Path, thumbnail_path: &Path) -> Result<bool> {
        let changed = self.conn().execute(
            "INSERT INTO thumbnails (video_path, thumbnail_path, created_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(video_path) DO NOTHING",
            params![
                path_key(video_path),
                path_key(thumbnail_path),
                Utc::now().timestamp()
            ],
        )?;
        if changed == 0 {
            debug!("Already catalogued: {}", video_path.display());
        }
        Ok(changed > 0)
    }

    pub fn get(&self, video_path: &Path) -> Result<Option<ThumbnailRecord>> {
        let record = self
            .conn()
            .query_row(
                "SELECT video_path, thumbnail_path, created_at
                 FROM thumbnails WHERE video_path = ?1",
                [path_key(video_path)],
                ThumbnailRecord::from_row,
            )
            .optional()?;
        Ok(record)
    }

    pub fn lookup(&self, video_path: &Path) -> Result<PathBuf> {
        self.get(video_path)?
            .map(|record| record.thumbnail_path)
            .ok_or_else(|| TriageError::NotFound(video_path.to_path_buf()))
    }

    pub fn contains(&self, video_path: &Path) -> Result<bool> {
        Ok(self.get(video_path)?.is_some())
    }

    /// All records ordered by video path.
    pub fn list(&self) -> Result<Vec<ThumbnailRecord>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT video_path, thumbnail_path, created_at
             FROM thumbnails ORDER BY video_path",
        )?;
        let records = stmt
            .query_map([], ThumbnailRecord::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    pub fn remove(&self, video_path: &Path) -> Result<()> {
        let changed = self.conn().execute(
            "DELETE FROM thumbnails WHERE video_path = ?1",
            [path_key(video_path)],
        )?;
        if changed == 0 {
            return Err(TriageError::NotFound(video_path.to_path_buf()));
        }
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM thumbnails", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

// Paths are stored as their raw OS bytes so names that are not valid UTF-8
// round-trip exactly and never collide.
#[cfg(unix)]
fn path_key(path: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().to_vec()
}

#[cfg(unix)]
fn path_from_key(bytes: Vec<u8>) -> PathBuf {
    use std::os::unix::ffi::OsStringExt;
    PathBuf::from(std::ffi::OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn path_key(path: &Path) -> Vec<u8> {
    path.to_string_lossy().into_owned().into_bytes()
}

#[cfg(not(unix))]
fn path_from_key(bytes: Vec<u8>) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(&bytes).into_owned())
}
