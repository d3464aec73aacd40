//! The timeline engine: per-timestamp scheduling and compositing.

use cutroom_compose::Compositor;
use cutroom_core::{CutroomError, FrameRate, Result, VideoFrame};
use cutroom_media::{open_source, MediaSource, SourceFrameProvider};
use tracing::{debug, info, warn};

use crate::clip::{Clip, ClipId};
use crate::registry::{ClipRegistry, ClipStatus};

/// Output configuration for the engine.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Output frame width in pixels.
    pub width: u32,
    /// Output frame height in pixels.
    pub height: u32,
    /// Output frame rate.
    pub frame_rate: FrameRate,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            frame_rate: FrameRate::FPS_24,
        }
    }
}

/// Renders composited frames from time-positioned clips.
///
/// For a requested timestamp the engine scans for active clips, maps
/// timeline time onto each clip's trimmed source window, fetches a frame
/// per clip, and composites the stack in registry insertion order.
/// Rendering never fails: the worst case is a blank transparent frame.
pub struct TimelineEngine {
    settings: EngineSettings,
    registry: ClipRegistry,
    compositor: Compositor,
}

impl TimelineEngine {
    /// Create an engine with the given output settings.
    pub fn new(settings: EngineSettings) -> Self {
        let compositor = Compositor::new(settings.width, settings.height);
        Self {
            settings,
            registry: ClipRegistry::new(),
            compositor,
        }
    }

    /// Output settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Add a clip, opening its source with the default opener.
    ///
    /// On open failure the clip stays registered without a provider (it
    /// renders as absent) and the error is returned so the caller can
    /// report it; `clip_status` exposes it afterwards.
    pub fn add_clip(&mut self, clip: Clip) -> Result<()> {
        // Validate before opening: a rejected clip must not spawn a probe.
        Self::validate(&clip)?;
        let source = open_source(&clip.source_path);
        self.register(clip, source)
    }

    /// Add a clip backed by a caller-supplied media source.
    pub fn add_clip_with_source(&mut self, clip: Clip, source: Box<dyn MediaSource>) -> Result<()> {
        Self::validate(&clip)?;
        self.register(clip, Ok(source))
    }

    fn register(&mut self, clip: Clip, source: Result<Box<dyn MediaSource>>) -> Result<()> {
        let id = clip.id;
        match source {
            Ok(source) => {
                self.registry
                    .add(clip, Ok(SourceFrameProvider::new(source)))?;
                info!(clip = id.0, "registered clip");
                Ok(())
            }
            Err(err) => {
                let reason = err.to_string();
                self.registry.add(clip, Err(reason.clone()))?;
                warn!(clip = id.0, %reason, "clip source failed to open");
                Err(err)
            }
        }
    }

    fn validate(clip: &Clip) -> Result<()> {
        if !(clip.duration > 0.0) {
            return Err(CutroomError::InvalidParameter(format!(
                "clip {} duration must be positive",
                clip.id.0
            )));
        }
        if clip.start_time < 0.0 || clip.source_start < 0.0 {
            return Err(CutroomError::InvalidParameter(format!(
                "clip {} times must be non-negative",
                clip.id.0
            )));
        }
        Ok(())
    }

    /// Remove a clip by id, releasing its decode resources and cache.
    /// Idempotent: removing an unknown id returns false.
    pub fn remove_clip(&mut self, id: ClipId) -> bool {
        let removed = self.registry.remove(id);
        if removed {
            info!(clip = id.0, "removed clip");
        }
        removed
    }

    /// Media availability for a registered clip, or `None` for an
    /// unknown id.
    pub fn clip_status(&self, id: ClipId) -> Option<ClipStatus> {
        self.registry.status(id)
    }

    /// All registered clips in layering order.
    pub fn clips(&self) -> &[Clip] {
        self.registry.clips()
    }

    /// Timeline duration: max clip end time, or 0 with no clips.
    pub fn duration(&self) -> f64 {
        self.registry.duration()
    }

    /// Render the composited frame at timeline time `t` seconds.
    ///
    /// Clips whose frame retrieval fails contribute nothing (the layer is
    /// absent, not transparent black). With no layers the result is a
    /// blank transparent frame at the configured size.
    pub fn render_frame(&mut self, t: f64) -> VideoFrame {
        let active: Vec<(ClipId, f64)> = self
            .registry
            .clips()
            .iter()
            .filter(|c| c.active_at(t))
            .map(|c| (c.id, c.source_time_at(t)))
            .collect();

        let mut layers: Vec<VideoFrame> = Vec::with_capacity(active.len());
        let mut opacities: Vec<f32> = Vec::with_capacity(active.len());

        for (id, source_time) in active {
            let Some(provider) = self.registry.provider_mut(id) else {
                debug!(clip = id.0, "skipping clip without provider");
                continue;
            };
            match provider.get_frame_at(source_time) {
                Ok(frame) => {
                    layers.push(frame);
                    opacities.push(1.0);
                }
                Err(err) => {
                    debug!(clip = id.0, source_time, %err, "skipping layer");
                }
            }
        }

        let mut out = if layers.is_empty() {
            VideoFrame::blank(self.settings.width, self.settings.height)
        } else {
            self.compositor.composite(&layers, &opacities)
        };
        out.pts = t;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutroom_media::SolidSource;

    fn settings(width: u32, height: u32) -> EngineSettings {
        EngineSettings {
            width,
            height,
            frame_rate: FrameRate::FPS_24,
        }
    }

    fn solid(color: [u8; 4]) -> Box<dyn MediaSource> {
        Box::new(SolidSource::new(8, 8, 20.0, color))
    }

    fn clip(id: u32, start: f64, duration: f64, source_start: f64) -> Clip {
        Clip::new(ClipId(id), "mem:solid", start, duration, source_start)
    }

    #[test]
    fn test_empty_timeline_renders_blank() {
        let mut engine = TimelineEngine::new(settings(8, 8));
        let frame = engine.render_frame(1.0);
        assert_eq!(frame.width, 8);
        assert_eq!(frame.height, 8);
        assert!(frame.data.iter().all(|&b| b == 0));
        assert_eq!(frame.pts, 1.0);
    }

    #[test]
    fn test_activity_boundaries() {
        let mut engine = TimelineEngine::new(settings(8, 8));
        engine
            .add_clip_with_source(clip(1, 1.0, 2.0, 0.0), solid([255, 0, 0, 255]))
            .unwrap();

        // Just before the start: blank
        assert!(engine.render_frame(0.99).data.iter().all(|&b| b == 0));
        // Start inclusive
        assert_eq!(engine.render_frame(1.0).pixel(0, 0), [255, 0, 0, 255]);
        // End exclusive
        assert!(engine.render_frame(3.0).data.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_insertion_order_layering() {
        let mut engine = TimelineEngine::new(settings(8, 8));
        engine
            .add_clip_with_source(clip(1, 0.0, 5.0, 0.0), solid([255, 0, 0, 255]))
            .unwrap();
        engine
            .add_clip_with_source(clip(2, 0.0, 5.0, 0.0), solid([0, 0, 255, 255]))
            .unwrap();

        // Later-inserted clip draws on top
        assert_eq!(engine.render_frame(2.0).pixel(4, 4), [0, 0, 255, 255]);
    }

    #[test]
    fn test_remove_clip_excludes_content() {
        let mut engine = TimelineEngine::new(settings(8, 8));
        engine
            .add_clip_with_source(clip(1, 0.0, 5.0, 0.0), solid([255, 0, 0, 255]))
            .unwrap();
        assert_eq!(engine.render_frame(2.0).pixel(0, 0), [255, 0, 0, 255]);

        assert!(engine.remove_clip(ClipId(1)));
        assert!(engine.render_frame(2.0).data.iter().all(|&b| b == 0));
        // Second removal is a no-op
        assert!(!engine.remove_clip(ClipId(1)));
    }

    #[test]
    fn test_duration() {
        let mut engine = TimelineEngine::new(settings(8, 8));
        assert_eq!(engine.duration(), 0.0);
        engine
            .add_clip_with_source(clip(1, 0.0, 5.0, 0.0), solid([1, 1, 1, 255]))
            .unwrap();
        engine
            .add_clip_with_source(clip(2, 3.0, 5.0, 2.0), solid([2, 2, 2, 255]))
            .unwrap();
        assert_eq!(engine.duration(), 8.0);
    }

    #[test]
    fn test_failed_source_is_skipped_but_queryable() {
        let mut engine = TimelineEngine::new(settings(8, 8));
        engine
            .add_clip_with_source(clip(1, 0.0, 5.0, 0.0), solid([255, 0, 0, 255]))
            .unwrap();
        let err = engine.add_clip(clip(2, 0.0, 5.0, 0.0)).unwrap_err();
        assert!(matches!(err, CutroomError::SourceOpen(_)));

        // The broken clip is registered and reported
        assert!(matches!(
            engine.clip_status(ClipId(2)),
            Some(ClipStatus::Unavailable { .. })
        ));
        // Rendering continues with the healthy layer only
        assert_eq!(engine.render_frame(2.0).pixel(0, 0), [255, 0, 0, 255]);
    }

    #[test]
    fn test_invalid_clip_rejected() {
        let mut engine = TimelineEngine::new(settings(8, 8));
        let err = engine
            .add_clip_with_source(clip(1, 0.0, 0.0, 0.0), solid([0, 0, 0, 255]))
            .unwrap_err();
        assert!(matches!(err, CutroomError::InvalidParameter(_)));
        assert!(engine.clips().is_empty());
    }

    #[test]
    fn test_invalid_clip_rejected_before_source_open() {
        let mut engine = TimelineEngine::new(settings(8, 8));
        // Zero duration fails validation first; the bogus path is never
        // probed, so the error is InvalidParameter rather than SourceOpen.
        let err = engine
            .add_clip(Clip::new(ClipId(1), "/nonexistent/x.mp4", 0.0, 0.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, CutroomError::InvalidParameter(_)));
        assert!(engine.clips().is_empty());
    }

    #[test]
    fn test_out_of_source_range_layer_absent() {
        let mut engine = TimelineEngine::new(settings(8, 8));
        // Source is 20s long; trim starts at 18s so times past t=2 run out
        engine
            .add_clip_with_source(clip(1, 0.0, 5.0, 18.0), solid([9, 9, 9, 255]))
            .unwrap();

        assert_eq!(engine.render_frame(1.0).pixel(0, 0), [9, 9, 9, 255]);
        // Beyond the source end the layer is simply absent
        assert!(engine.render_frame(4.0).data.iter().all(|&b| b == 0));
    }
}
