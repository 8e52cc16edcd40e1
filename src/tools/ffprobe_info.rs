use crate::error::{Result, TriageError};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub duration: Duration,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    pub frame_count: Option<u64>,
}

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct StreamInfo {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    duration: Option<String>,
    nb_frames: Option<String>,
}

/// Probes a video with ffprobe.
pub fn get_video_info(path: &Path) -> Result<VideoInfo> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|e| TriageError::decode(path, format!("cannot run ffprobe: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TriageError::decode(
            path,
            format!("ffprobe failed: {}", stderr.trim()),
        ));
    }

    parse_probe_output(path, &String::from_utf8_lossy(&output.stdout))
}

fn parse_probe_output(path: &Path, stdout: &str) -> Result<VideoInfo> {
    let probe: FfprobeOutput = serde_json::from_str(stdout)
        .map_err(|e| TriageError::decode(path, format!("unparsable ffprobe output: {e}")))?;

    let video_stream = probe
        .streams
        .as_ref()
        .and_then(|streams| {
            streams
                .iter()
                .find(|s| s.codec_type.as_deref() == Some("video"))
        })
        .ok_or_else(|| TriageError::decode(path, "no video stream"))?;

    let width = video_stream
        .width
        .ok_or_else(|| TriageError::decode(path, "missing width"))?;
    let height = video_stream
        .height
        .ok_or_else(|| TriageError::decode(path, "missing height"))?;

    // format duration first, stream duration as fallback
    let duration_seconds = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .or(video_stream.duration.as_ref())
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .ok_or_else(|| TriageError::decode(path, "missing duration"))?;

    let frame_rate = video_stream
        .r_frame_rate
        .as_ref()
        .and_then(|r| parse_frame_rate(r))
        .unwrap_or(30.0);

    let frame_count = video_stream
        .nb_frames
        .as_ref()
        .and_then(|n| n.parse::<u64>().ok());

    Ok(VideoInfo {
        duration: Duration::from_secs_f64(duration_seconds),
        width,
        height,
        frame_rate,
        frame_count,
    })
}

/// Parses "30/1", "30000/1001" or a plain decimal.
fn parse_frame_rate(rate: &str) -> Option<f64> {
    if let Some((num_str, den_str)) = rate.split_once('/') {
        let num: f64 = num_str.parse().ok()?;
        let den: f64 = den_str.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
        return None;
    }
    rate.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_rate_fraction() {
        assert!((parse_frame_rate("30/1").unwrap() - 30.0).abs() < 0.01);
        assert!((parse_frame_rate("30000/1001").unwrap() - 29.97).abs() < 0.01);
    }

    #[test]
    fn test_parse_frame_rate_decimal() {
        assert!((parse_frame_rate("29.97").unwrap() - 29.97).abs() < 0.01);
        assert!((parse_frame_rate("60").unwrap() - 60.0).abs() < 0.01);
    }

    #[test]
    fn test_parse_frame_rate_invalid() {
        assert!(parse_frame_rate("invalid").is_none());
        assert!(parse_frame_rate("30/0").is_none());
    }

    #[test]
    fn test_parse_probe_output() {
        let json = r#"{
            "format": {"duration": "120.5"},
            "streams": [
                {"codec_type": "audio"},
                {"codec_type": "video", "width": 1920, "height": 1080,
                 "r_frame_rate": "24/1", "nb_frames": "2892"}
            ]
        }"#;
        let info = parse_probe_output(Path::new("/v/a.mp4"), json).unwrap();
        assert_eq!(info.width, 1920);
        assert_eq!(info.height, 1080);
        assert_eq!(info.duration, Duration::from_millis(120_500));
        assert_eq!(info.frame_count, Some(2892));
    }

    #[test]
    fn test_parse_probe_output_without_video_stream() {
        let json = r#"{"format": {"duration": "3.0"}, "streams": [{"codec_type": "audio"}]}"#;
        let err = parse_probe_output(Path::new("/v/a.mp3"), json).unwrap_err();
        assert!(matches!(err, TriageError::Decode { .. }));
    }
}
