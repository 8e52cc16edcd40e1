mod ffprobe_info;
mod file_tools;
mod frame_decoder;
mod path_validator;
mod video_scanner;

pub use ffprobe_info::{VideoInfo, get_video_info};
pub use file_tools::{
    TEMP_SUFFIX, is_temp_artifact, sweep_temp_files, unique_destination, write_atomically,
};
pub use frame_decoder::{FfmpegDecoder, FrameDecoder};
pub use path_validator::{ensure_directory_exists, validate_directory_exists};
pub use video_scanner::{VideoFileInfo, VideoScanner};
