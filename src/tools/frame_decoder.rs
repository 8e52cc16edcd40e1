use crate::error::{Result, TriageError};
use crate::tools::ffprobe_info::{VideoInfo, get_video_info};
use image::DynamicImage;
use log::debug;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

/// Pre-roll for the two-stage seek: fast keyframe seek before `-i`, precise decode after.
const SEEK_MARGIN: Duration = Duration::from_secs(2);

/// Probing and single-frame decoding of a video.
pub trait FrameDecoder: Send + Sync {
    fn probe(&self, video: &Path) -> Result<VideoInfo>;

    fn decode_frame(&self, video: &Path, at: Duration) -> Result<DynamicImage>;
}

/// [`FrameDecoder`] backed by the `ffprobe` and `ffmpeg` executables.
#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegDecoder;

impl FfmpegDecoder {
    /// The video path is passed through untouched, so names that are not UTF-8 still open.
    fn build_args(video: &Path, at: Duration) -> Vec<OsString> {
        let t0 = at.saturating_sub(SEEK_MARGIN);
        let delta = at - t0;

        let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error"]
            .map(OsString::from)
            .into();

        if !t0.is_zero() {
            args.push("-ss".into());
            args.push(format!("{:.3}", t0.as_secs_f64()).into());
        }

        args.push("-i".into());
        args.push(video.as_os_str().to_os_string());

        if !delta.is_zero() {
            args.push("-ss".into());
            args.push(format!("{:.3}", delta.as_secs_f64()).into());
        }

        args.extend(
            [
                "-frames:v", "1", "-an", "-sn", "-dn", "-threads", "1", "-f", "image2pipe",
                "-c:v", "png", "-",
            ]
            .map(OsString::from),
        );
        args
    }
}

impl FrameDecoder for FfmpegDecoder {
    fn probe(&self, video: &Path) -> Result<VideoInfo> {
        get_video_info(video)
    }

    fn decode_frame(&self, video: &Path, at: Duration) -> Result<DynamicImage> {
        debug!("Decoding {} at {:.2}s", video.display(), at.as_secs_f64());

        let output = Command::new("ffmpeg")
            .args(Self::build_args(video, at))
            .output()
            .map_err(|e| TriageError::decode(video, format!("cannot run ffmpeg: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TriageError::decode(
                video,
                format!("ffmpeg failed at {:.2}s: {}", at.as_secs_f64(), stderr.trim()),
            ));
        }
        if output.stdout.is_empty() {
            return Err(TriageError::decode(
                video,
                format!("no frame at {:.2}s", at.as_secs_f64()),
            ));
        }

        Ok(image::load_from_memory(&output.stdout)?)
    }
}
