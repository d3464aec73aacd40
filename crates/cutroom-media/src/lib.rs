//! Cutroom Media - the decode boundary of the rendering engine
//!
//! This crate handles:
//! - The `MediaSource` abstraction over decodable sources
//! - FFmpeg-backed decoding via subprocess (ffmpeg-sidecar)
//! - Metadata probing with ffprobe
//! - Per-source frame caching and the source frame provider
//! - Export settings passed through to the encoder boundary

pub mod cache;
pub mod export;
pub mod ffmpeg;
pub mod provider;
pub mod source;
pub mod synthetic;

pub use cache::{FrameCache, DEFAULT_CACHE_CAPACITY};
pub use export::ExportSettings;
pub use ffmpeg::FfmpegSource;
pub use provider::SourceFrameProvider;
pub use source::{open_source, MediaSource, SourceInfo};
pub use synthetic::SolidSource;
