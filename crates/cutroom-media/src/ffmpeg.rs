//! FFmpeg-backed media source.
//!
//! Decoding runs in an ffmpeg subprocess (via ffmpeg-sidecar) that writes
//! rawvideo RGBA frames to a pipe; metadata comes from an ffprobe JSON
//! probe at open time. Each seek restarts the subprocess at the new
//! position with `-ss`, which seeks to the nearest preceding keyframe and
//! decodes forward internally.

use cutroom_core::{CutroomError, FrameRate, Result, VideoFrame};
use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use ffmpeg_sidecar::iter::FfmpegIterator;
use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

use crate::source::{MediaSource, SourceInfo};

/// A video file decoded by an ffmpeg subprocess.
pub struct FfmpegSource {
    path: String,
    info: SourceInfo,
    child: Option<FfmpegChild>,
    events: Option<FfmpegIterator>,
    /// Seek origin in seconds; output frame timestamps are relative to it.
    origin: f64,
}

impl std::fmt::Debug for FfmpegSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegSource")
            .field("path", &self.path)
            .field("info", &self.info)
            .field("child", &self.child.as_ref().map(|_| ".."))
            .field("events", &self.events.as_ref().map(|_| ".."))
            .field("origin", &self.origin)
            .finish()
    }
}

impl FfmpegSource {
    /// Open a video file, probing its metadata.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let info = probe(path)?;
        info!(
            path = %path.display(),
            codec = %info.codec,
            width = info.width,
            height = info.height,
            duration = info.duration,
            "opened media source"
        );
        Ok(Self {
            path: path.to_string_lossy().into_owned(),
            info,
            child: None,
            events: None,
            origin: 0.0,
        })
    }

    fn stop(&mut self) {
        self.events = None;
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl MediaSource for FfmpegSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn seek(&mut self, position: f64) -> Result<()> {
        if !position.is_finite() || position < 0.0 {
            return Err(CutroomError::Seek(format!(
                "invalid seek position {position}"
            )));
        }
        if self.info.duration > 0.0 && position > self.info.duration {
            return Err(CutroomError::Seek(format!(
                "seek to {position:.3}s beyond stream end at {:.3}s",
                self.info.duration
            )));
        }

        self.stop();

        let mut child = FfmpegCommand::new()
            .hide_banner()
            .seek(format!("{position:.6}"))
            .input(&self.path)
            .no_audio()
            .format("rawvideo")
            .pix_fmt("rgba")
            .output("-")
            .spawn()
            .map_err(|e| CutroomError::Seek(format!("failed to spawn ffmpeg: {e}")))?;
        let events = child
            .iter()
            .map_err(|e| CutroomError::Seek(format!("failed to read ffmpeg output: {e}")))?;

        debug!(path = %self.path, position, "seeked decoder");
        self.child = Some(child);
        self.events = Some(events);
        self.origin = position;
        Ok(())
    }

    fn decode_next(&mut self) -> Result<Option<VideoFrame>> {
        if self.events.is_none() {
            self.seek(0.0)?;
        }
        let Some(events) = self.events.as_mut() else {
            return Err(CutroomError::Decode("decoder not started".into()));
        };

        for event in events {
            match event {
                FfmpegEvent::OutputFrame(frame) => {
                    let pts = self.origin + frame.timestamp as f64;
                    return Ok(Some(VideoFrame::from_rgba(
                        frame.width,
                        frame.height,
                        frame.data,
                        pts,
                    )));
                }
                FfmpegEvent::Error(message) | FfmpegEvent::Log(LogLevel::Fatal, message) => {
                    return Err(CutroomError::Decode(message));
                }
                FfmpegEvent::Done => return Ok(None),
                _ => {}
            }
        }
        Ok(None)
    }

    fn close(&mut self) {
        self.stop();
        debug!(path = %self.path, "closed media source");
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        self.stop();
    }
}

// ── Probing ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Probe a media file with ffprobe.
pub fn probe<P: AsRef<Path>>(path: P) -> Result<SourceInfo> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CutroomError::SourceOpen(format!(
            "file not found: {}",
            path.display()
        )));
    }

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=codec_name,width,height,avg_frame_rate",
            "-show_entries",
            "format=duration",
            "-of",
            "json",
        ])
        .arg(path)
        .output()
        .map_err(|e| CutroomError::SourceOpen(format!("failed to run ffprobe: {e}")))?;

    if !output.status.success() {
        return Err(CutroomError::SourceOpen(format!(
            "ffprobe failed for {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    parse_probe_output(&output.stdout, path)
}

fn parse_probe_output(json: &[u8], path: &Path) -> Result<SourceInfo> {
    let parsed: ProbeOutput = serde_json::from_slice(json)
        .map_err(|e| CutroomError::SourceOpen(format!("unreadable ffprobe output: {e}")))?;

    let stream = parsed.streams.first().ok_or_else(|| {
        CutroomError::SourceOpen(format!("no video stream in {}", path.display()))
    })?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(CutroomError::SourceOpen(format!(
                "missing video dimensions in {}",
                path.display()
            )))
        }
    };

    let frame_rate = stream
        .avg_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .unwrap_or_default();

    let duration = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(SourceInfo {
        width,
        height,
        frame_rate,
        duration,
        codec: stream
            .codec_name
            .clone()
            .unwrap_or_else(|| "unknown".into()),
    })
}

fn parse_frame_rate(s: &str) -> Option<FrameRate> {
    let (num, den) = s.split_once('/')?;
    let num: u32 = num.trim().parse().ok()?;
    let den: u32 = den.trim().parse().ok()?;
    if num == 0 || den == 0 {
        return None;
    }
    Some(FrameRate::new(num, den))
}
