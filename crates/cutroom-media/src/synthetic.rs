//! Synthetic media sources.
//!
//! `SolidSource` generates constant-color frames with exact timing. Used
//! as placeholder media and throughout the test suites, where it stands in
//! for real footage without touching ffmpeg.

use cutroom_core::{CutroomError, FrameRate, Result, VideoFrame};

use crate::source::{MediaSource, SourceInfo};

/// A source producing frames of a single RGBA color.
pub struct SolidSource {
    info: SourceInfo,
    rgba: [u8; 4],
    cursor: i64,
    frame_count: i64,
}

impl SolidSource {
    /// Create a solid-color source at 24 fps.
    pub fn new(width: u32, height: u32, duration: f64, rgba: [u8; 4]) -> Self {
        Self::with_frame_rate(width, height, duration, rgba, FrameRate::FPS_24)
    }

    /// Create a solid-color source with an explicit frame rate.
    pub fn with_frame_rate(
        width: u32,
        height: u32,
        duration: f64,
        rgba: [u8; 4],
        frame_rate: FrameRate,
    ) -> Self {
        let frame_count = (duration * frame_rate.to_fps_f64()).round() as i64;
        Self {
            info: SourceInfo {
                width,
                height,
                frame_rate,
                duration,
                codec: "solid".into(),
            },
            rgba,
            cursor: 0,
            frame_count,
        }
    }

    /// The fill color.
    pub fn color(&self) -> [u8; 4] {
        self.rgba
    }
}

impl MediaSource for SolidSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn seek(&mut self, position: f64) -> Result<()> {
        if !position.is_finite() || position < 0.0 || position > self.info.duration {
            return Err(CutroomError::Seek(format!(
                "seek to {position:.3}s outside [0, {:.3}]s",
                self.info.duration
            )));
        }
        // Every frame is a "keyframe": bias down to the frame boundary.
        self.cursor = (position * self.info.frame_rate.to_fps_f64()).floor() as i64;
        Ok(())
    }

    fn decode_next(&mut self) -> Result<Option<VideoFrame>> {
        if self.cursor >= self.frame_count {
            return Ok(None);
        }
        let mut frame = VideoFrame::solid(self.info.width, self.info.height, self.rgba);
        frame.pts = self.cursor as f64 * self.info.frame_rate.frame_duration_secs();
        self.cursor += 1;
        Ok(Some(frame))
    }

    fn close(&mut self) {}
}
