//! Clip placement on the timeline.

use serde::{Deserialize, Serialize};

/// Unique identifier for a clip, assigned by the caller and stable for
/// the clip's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipId(pub u32);

/// A time-positioned clip referencing a trimmed window of a media source.
///
/// Clips are immutable once registered; an edit is modeled as remove and
/// re-add.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clip {
    /// Unique clip ID
    pub id: ClipId,
    /// Path to the source media
    pub source_path: String,
    /// Position on the timeline in seconds (>= 0)
    pub start_time: f64,
    /// Duration on the timeline in seconds (> 0)
    pub duration: f64,
    /// Trim offset into the source's own timeline in seconds (>= 0)
    pub source_start: f64,
}

impl Clip {
    /// Create a new clip.
    pub fn new(
        id: ClipId,
        source_path: impl Into<String>,
        start_time: f64,
        duration: f64,
        source_start: f64,
    ) -> Self {
        Self {
            id,
            source_path: source_path.into(),
            start_time,
            duration,
            source_start,
        }
    }

    /// End of the clip's interval on the timeline (exclusive).
    #[inline]
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Whether the clip is active at timeline time `t`: start inclusive,
    /// end exclusive.
    #[inline]
    pub fn active_at(&self, t: f64) -> bool {
        t >= self.start_time && t < self.end_time()
    }

    /// Map timeline time to source time, 1:1 within the active interval.
    #[inline]
    pub fn source_time_at(&self, t: f64) -> f64 {
        self.source_start + (t - self.start_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_window_boundaries() {
        let clip = Clip::new(ClipId(1), "a.mp4", 2.0, 3.0, 0.0);
        assert!(!clip.active_at(1.999));
        assert!(clip.active_at(2.0)); // start inclusive
        assert!(clip.active_at(4.999));
        assert!(!clip.active_at(5.0)); // end exclusive
    }

    #[test]
    fn test_source_time_mapping() {
        let clip = Clip::new(ClipId(2), "b.mp4", 3.0, 5.0, 2.0);
        assert_eq!(clip.source_time_at(3.0), 2.0);
        assert_eq!(clip.source_time_at(4.0), 3.0);
        assert_eq!(clip.source_time_at(7.5), 6.5);
    }
}
