//! Export settings passed through to the encoder boundary.
//!
//! The rendering core does not encode; these settings are carried opaquely
//! to whatever writes the output file.

use cutroom_core::FrameRate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration handed to the external encoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Output file path.
    pub output_path: PathBuf,
    /// Container format ("mp4", "webm", "mov").
    pub format: String,
    /// Codec choice ("h264", "h265", "vp9").
    pub codec: String,
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// Target bitrate in bits per second.
    pub bitrate: u32,
    /// Output frame rate.
    pub frame_rate: FrameRate,
}

impl ExportSettings {
    /// H.264 1080p preset.
    pub fn h264_hd(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            format: "mp4".into(),
            codec: "h264".into(),
            width: 1920,
            height: 1080,
            bitrate: 10_000_000,
            frame_rate: FrameRate::FPS_24,
        }
    }
}
