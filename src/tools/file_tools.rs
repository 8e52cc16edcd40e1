use log::{debug, warn};
use std::ffi::{OsStr, OsString};
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use uuid::Uuid;
use walkdir::WalkDir;

/// Suffix of in-progress files written by [`write_atomically`].
pub const TEMP_SUFFIX: &str = ".tmp";

/// Writes `path` through a sibling temp file that is synced and then renamed into place,
/// so readers only ever see the old content or the complete new content.
pub fn write_atomically<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let parent = path.parent().unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let mut temp_name = OsString::from(".");
    temp_name.push(file_name);
    temp_name.push(format!(".{}{TEMP_SUFFIX}", Uuid::new_v4().simple()));
    let temp_path = parent.join(temp_name);

    let result = write_temp_then_rename(&temp_path, path, write);
    if result.is_err() && temp_path.exists() && fs::remove_file(&temp_path).is_err() {
        warn!("Could not remove temp file {}", temp_path.display());
    }
    result
}

fn write_temp_then_rename<F>(temp_path: &Path, path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let mut writer = BufWriter::new(File::create(temp_path)?);
    write(&mut writer)?;
    let file = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
    file.sync_all()?;
    drop(file);
    fs::rename(temp_path, path)
}

#[must_use]
pub fn is_temp_artifact(path: &Path) -> bool {
    path.file_name()
        .map(OsStr::as_encoded_bytes)
        .is_some_and(|name| name.starts_with(b".") && name.ends_with(TEMP_SUFFIX.as_bytes()))
}

/// Deletes leftovers of interrupted [`write_atomically`] calls anywhere under `dir`.
pub fn sweep_temp_files(dir: &Path) -> io::Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() && is_temp_artifact(entry.path()) {
            fs::remove_file(entry.path())?;
            debug!("Removed stale temp file {}", entry.path().display());
            removed += 1;
        }
    }
    Ok(removed)
}

/// Picks a destination for `file_name` inside `dir`.
///
/// When the plain name is taken, a numeric suffix (`stem_1.ext`, `stem_2.ext`, ...) is
/// appended if `resolve_collisions` is set; otherwise `None` is returned.
#[must_use]
pub fn unique_destination(dir: &Path, file_name: &Path, resolve_collisions: bool) -> Option<PathBuf> {
    let dest_path = dir.join(file_name);
    if !dest_path.exists() {
        return Some(dest_path);
    }
    if !resolve_collisions {
        return None;
    }

    let stem = file_name.file_stem().unwrap_or(OsStr::new("file"));
    let ext = file_name.extension();

    let mut counter = 1;
    loop {
        let mut new_name = stem.to_os_string();
        new_name.push(format!("_{counter}"));
        if let Some(ext) = ext {
            new_name.push(".");
            new_name.push(ext);
        }
        let candidate = dir.join(new_name);
        if !candidate.exists() {
            return Some(candidate);
        }
        counter += 1;
    }
}
