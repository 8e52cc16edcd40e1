use super::composer::{CellSize, compose_mosaic, fit_to_cell};
use super::sampler::sample_points;
use crate::config::{GridShape, LibraryLayout, UserSettings};
use crate::error::{Result, TriageError};
use crate::tools::{FrameDecoder, VideoInfo, ensure_directory_exists, write_atomically};
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use log::{debug, info, warn};
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Fixed mosaic parameters shared by every video of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicSpec {
    pub grid: GridShape,
    pub cell_width: u32,
    pub jpeg_quality: u8,
    pub offset: Duration,
}

impl MosaicSpec {
    #[must_use]
    pub const fn from_settings(settings: &UserSettings) -> Self {
        Self {
            grid: settings.grid,
            cell_width: settings.cell_width,
            jpeg_quality: settings.jpeg_quality,
            offset: settings.sample_offset(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Frames were decoded and a new mosaic written.
    Created,
    /// A complete mosaic was already at the target path.
    Reused,
}

#[derive(Debug, Clone)]
pub struct GeneratedMosaic {
    pub thumbnail_path: PathBuf,
    pub outcome: GenerationOutcome,
    pub decoded_frames: usize,
    pub substituted_frames: usize,
}

pub struct MosaicGenerator {
    decoder: Arc<dyn FrameDecoder>,
    layout: LibraryLayout,
    spec: MosaicSpec,
}

impl MosaicGenerator {
    #[must_use]
    pub fn new(decoder: Arc<dyn FrameDecoder>, layout: LibraryLayout, spec: MosaicSpec) -> Self {
        Self {
            decoder,
            layout,
            spec,
        }
    }

    #[must_use]
    pub const fn layout(&self) -> &LibraryLayout {
        &self.layout
    }

    #[must_use]
    pub const fn spec(&self) -> &MosaicSpec {
        &self.spec
    }

    /// `<thumbnail_dir>/<basename>.jpg` for videos directly under the root; nested videos
    /// keep their relative directory so equal basenames in different folders never clash.
    #[must_use]
    pub fn thumbnail_path_for(&self, video: &Path) -> PathBuf {
        let mut file_name = video
            .file_name()
            .map_or_else(|| OsString::from("video"), OsStr::to_os_string);
        file_name.push(".jpg");
        let relative_parent = video
            .strip_prefix(self.layout.root())
            .ok()
            .and_then(Path::parent)
            .unwrap_or(Path::new(""));

        self.layout
            .thumbnail_dir()
            .join(relative_parent)
            .join(file_name)
    }

    /// Produces the mosaic for `video`, keeping an existing one untouched.
    pub fn generate(&self, video: &Path) -> Result<GeneratedMosaic> {
        let thumbnail_path = self.thumbnail_path_for(video);
        if thumbnail_path.is_file() {
            debug!("Mosaic already present: {}", thumbnail_path.display());
            return Ok(GeneratedMosaic {
                thumbnail_path,
                outcome: GenerationOutcome::Reused,
                decoded_frames: 0,
                substituted_frames: 0,
            });
        }

        self.render(video, self.spec.offset, thumbnail_path)
    }

    /// Re-samples `video` at `offset` and atomically replaces its mosaic.
    /// The previous mosaic stays in place if regeneration fails.
    pub fn refresh(&self, video: &Path, offset: Duration) -> Result<GeneratedMosaic> {
        let thumbnail_path = self.thumbnail_path_for(video);
        self.render(video, offset, thumbnail_path)
    }

    fn render(
        &self,
        video: &Path,
        offset: Duration,
        thumbnail_path: PathBuf,
    ) -> Result<GeneratedMosaic> {
        let info = self.decoder.probe(video)?;
        let cell = CellSize::fit_width(self.spec.cell_width, info.width, info.height);
        let (frames, decoded_frames) = self.sample_frames(video, &info, offset, cell)?;
        let substituted_frames = frames.len() - decoded_frames;

        if substituted_frames > 0 {
            warn!(
                "Partial decode for {}: {decoded_frames}/{} samples decoded, duplicated the rest",
                video.display(),
                frames.len()
            );
        }

        let mosaic = compose_mosaic(&frames, self.spec.grid, cell)?;

        if let Some(parent) = thumbnail_path.parent() {
            ensure_directory_exists(parent)?;
        }
        let quality = self.spec.jpeg_quality;
        write_atomically(&thumbnail_path, |writer| {
            let encoder = JpegEncoder::new_with_quality(writer, quality);
            mosaic.write_with_encoder(encoder).map_err(io::Error::other)
        })?;

        info!("Mosaic written: {}", thumbnail_path.display());

        Ok(GeneratedMosaic {
            thumbnail_path,
            outcome: GenerationOutcome::Created,
            decoded_frames,
            substituted_frames,
        })
    }

    /// Decodes every sample point. A failed sample repeats the latest good frame
    /// (leading failures take the first good one); no good frame at all is a decode error.
    fn sample_frames(
        &self,
        video: &Path,
        info: &VideoInfo,
        offset: Duration,
        cell: CellSize,
    ) -> Result<(Vec<RgbImage>, usize)> {
        let points = sample_points(info.duration, self.spec.grid.cell_count(), offset);
        if points.is_empty() {
            return Err(TriageError::decode(video, "video has no playable range"));
        }

        let mut slots: Vec<Option<RgbImage>> = Vec::with_capacity(points.len());
        let mut latest: Option<RgbImage> = None;
        let mut decoded = 0;

        for (index, at) in points.iter().enumerate() {
            match self.decoder.decode_frame(video, *at) {
                Ok(frame) => {
                    let tile = fit_to_cell(&frame.to_rgb8(), cell);
                    latest = Some(tile.clone());
                    slots.push(Some(tile));
                    decoded += 1;
                }
                Err(e) => {
                    debug!("Sample {index} of {} failed: {e}", video.display());
                    slots.push(latest.clone());
                }
            }
        }

        let Some(first_good) = slots.iter().flatten().next().cloned() else {
            return Err(TriageError::decode(
                video,
                format!("none of {} samples decoded", points.len()),
            ));
        };

        let frames = slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| first_good.clone()))
            .collect();
        Ok((frames, decoded))
    }
}
