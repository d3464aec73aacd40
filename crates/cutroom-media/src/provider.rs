//! Per-source frame retrieval with caching.

use cutroom_core::{CutroomError, Result, VideoFrame};
use tracing::trace;

use crate::cache::{FrameCache, DEFAULT_CACHE_CAPACITY};
use crate::source::{MediaSource, SourceInfo};

/// Tolerance when matching decoded timestamps against a requested time,
/// half the cache's millisecond quantum.
const PTS_EPSILON: f64 = 0.0005;

/// Retrieves decoded frames for one media source, caching recent requests.
///
/// Owns its source and cache exclusively; dropping the provider releases
/// the decode resources.
pub struct SourceFrameProvider {
    source: Box<dyn MediaSource>,
    cache: FrameCache,
}

impl SourceFrameProvider {
    /// Wrap a source with a default-capacity cache.
    pub fn new(source: Box<dyn MediaSource>) -> Self {
        Self::with_cache_capacity(source, DEFAULT_CACHE_CAPACITY)
    }

    /// Wrap a source with an explicit cache capacity.
    pub fn with_cache_capacity(source: Box<dyn MediaSource>, capacity: usize) -> Self {
        Self {
            source,
            cache: FrameCache::with_capacity(capacity),
        }
    }

    /// Metadata of the underlying source.
    pub fn info(&self) -> &SourceInfo {
        self.source.info()
    }

    /// The provider's frame cache.
    pub fn cache(&self) -> &FrameCache {
        &self.cache
    }

    /// Get the decoded frame representing the source content at
    /// `source_time` seconds.
    ///
    /// On a cache miss this seeks the source (backward-biased to a
    /// keyframe) and decodes forward until the first frame at or after the
    /// requested time, caching a copy keyed by the requested time.
    pub fn get_frame_at(&mut self, source_time: f64) -> Result<VideoFrame> {
        if !source_time.is_finite() || source_time < 0.0 {
            return Err(CutroomError::Seek(format!(
                "invalid source time {source_time}"
            )));
        }

        if let Some(frame) = self.cache.get(source_time) {
            trace!(source_time, "frame cache hit");
            return Ok(frame);
        }

        self.source.seek(source_time)?;
        loop {
            match self.source.decode_next()? {
                Some(frame) if frame.pts + PTS_EPSILON >= source_time => {
                    self.cache.put(source_time, frame.clone());
                    return Ok(frame);
                }
                Some(_) => continue,
                None => {
                    return Err(CutroomError::Decode(format!(
                        "end of stream before {source_time:.3}s"
                    )))
                }
            }
        }
    }

    /// Release the source's decode resources.
    pub fn close(&mut self) {
        self.source.close();
        self.cache.clear();
    }
}
