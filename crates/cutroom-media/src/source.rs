//! The media source abstraction.
//!
//! Everything the timeline engine knows about decoding is expressed here:
//! a source can report its metadata, seek (backward-biased to the nearest
//! keyframe), and decode frames forward in stream order. Container and
//! codec handling live behind this trait.

use cutroom_core::{FrameRate, Result, VideoFrame};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ffmpeg::FfmpegSource;

/// Metadata for an opened media source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Frame rate as a rational number
    pub frame_rate: FrameRate,
    /// Total duration in seconds (0.0 if unknown)
    pub duration: f64,
    /// Codec identifier string (e.g. "h264")
    pub codec: String,
}

/// A decodable media source.
///
/// Each implementation exclusively owns its decode resources and releases
/// them on `close` or drop. No source is ever shared between two providers.
pub trait MediaSource: Send {
    /// Source metadata queried at open time.
    fn info(&self) -> &SourceInfo;

    /// Seek to a position in seconds, backward-biased to the nearest
    /// keyframe. Subsequent `decode_next` calls return frames from that
    /// point forward. Fails if the position is outside the stream bounds.
    fn seek(&mut self, position: f64) -> Result<()>;

    /// Decode the next frame in stream order as RGBA, with its
    /// presentation timestamp. Returns `None` at end of stream.
    fn decode_next(&mut self) -> Result<Option<VideoFrame>>;

    /// Release all decode resources. Also happens on drop.
    fn close(&mut self);
}

/// Open a media file with the default FFmpeg-backed source.
pub fn open_source<P: AsRef<Path>>(path: P) -> Result<Box<dyn MediaSource>> {
    Ok(Box::new(FfmpegSource::open(path)?))
}
