//! End-to-end rendering scenarios across the timeline, media, and
//! compositing crates.

use cutroom_core::{CutroomError, FrameRate, Result, VideoFrame};
use cutroom_media::{MediaSource, SolidSource, SourceInfo};
use cutroom_timeline::{Clip, ClipId, ClipStatus, EngineSettings, TimelineEngine};
use std::sync::{Arc, Mutex};

// ── Helpers ────────────────────────────────────────────────────

/// Route engine log output through the test harness. `RUST_LOG` selects
/// the level; repeated calls are no-ops.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Wraps a source and records every seek position, so tests can observe
/// which source times the engine requested.
struct RecordingSource {
    inner: SolidSource,
    seeks: Arc<Mutex<Vec<f64>>>,
}

impl RecordingSource {
    fn new(color: [u8; 4], seeks: Arc<Mutex<Vec<f64>>>) -> Self {
        Self {
            inner: SolidSource::new(8, 8, 20.0, color),
            seeks,
        }
    }
}

impl MediaSource for RecordingSource {
    fn info(&self) -> &SourceInfo {
        self.inner.info()
    }
    fn seek(&mut self, position: f64) -> Result<()> {
        self.seeks.lock().unwrap().push(position);
        self.inner.seek(position)
    }
    fn decode_next(&mut self) -> Result<Option<VideoFrame>> {
        self.inner.decode_next()
    }
    fn close(&mut self) {
        self.inner.close()
    }
}

fn settings() -> EngineSettings {
    init_tracing();
    EngineSettings {
        width: 8,
        height: 8,
        frame_rate: FrameRate::FPS_24,
    }
}

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

/// Two overlapping clips: A (id 1) covers 0..5 from source time 0, B
/// (id 2) covers 3..8 from source time 2, inserted in that order.
fn two_clip_engine() -> (TimelineEngine, Arc<Mutex<Vec<f64>>>, Arc<Mutex<Vec<f64>>>) {
    let a_seeks = Arc::new(Mutex::new(Vec::new()));
    let b_seeks = Arc::new(Mutex::new(Vec::new()));

    let mut engine = TimelineEngine::new(settings());
    engine
        .add_clip_with_source(
            Clip::new(ClipId(1), "a.mp4", 0.0, 5.0, 0.0),
            Box::new(RecordingSource::new(RED, a_seeks.clone())),
        )
        .unwrap();
    engine
        .add_clip_with_source(
            Clip::new(ClipId(2), "b.mp4", 3.0, 5.0, 2.0),
            Box::new(RecordingSource::new(BLUE, b_seeks.clone())),
        )
        .unwrap();

    (engine, a_seeks, b_seeks)
}

// ── End-to-end scenario ────────────────────────────────────────

#[test]
fn overlap_renders_later_clip_on_top() {
    let (mut engine, a_seeks, b_seeks) = two_clip_engine();

    let frame = engine.render_frame(4.0);
    // B is opaque and inserted after A: the overlap shows B
    assert_eq!(frame.pixel(0, 0), BLUE);
    assert_eq!(frame.pixel(7, 7), BLUE);
    assert_eq!(frame.pts, 4.0);

    // A was asked for source time 4.0, B for 3.0
    assert_eq!(a_seeks.lock().unwrap().as_slice(), &[4.0]);
    assert_eq!(b_seeks.lock().unwrap().as_slice(), &[3.0]);
}

#[test]
fn non_overlapping_regions_show_single_clips() {
    let (mut engine, _, _) = two_clip_engine();

    // Only A is active before 3.0
    assert_eq!(engine.render_frame(1.0).pixel(0, 0), RED);
    // Only B is active from 5.0
    assert_eq!(engine.render_frame(6.0).pixel(0, 0), BLUE);
}

#[test]
fn timeline_duration_is_max_clip_end() {
    let (engine, _, _) = two_clip_engine();
    assert_eq!(engine.duration(), 8.0);
}

#[test]
fn no_active_clips_renders_transparent_black() {
    let (mut engine, _, _) = two_clip_engine();
    let frame = engine.render_frame(9.5);
    assert_eq!(frame.width, 8);
    assert_eq!(frame.height, 8);
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn removed_clip_no_longer_contributes() {
    let (mut engine, _, _) = two_clip_engine();

    assert!(engine.remove_clip(ClipId(2)));
    // The overlap now shows A
    assert_eq!(engine.render_frame(4.0).pixel(0, 0), RED);
    // Removal is idempotent
    assert!(!engine.remove_clip(ClipId(2)));
    assert_eq!(engine.duration(), 5.0);
}

#[test]
fn repeated_render_hits_provider_cache() {
    let (mut engine, a_seeks, _) = two_clip_engine();

    engine.render_frame(1.0);
    engine.render_frame(1.0);
    engine.render_frame(1.0);
    // One seek: subsequent requests are cache hits
    assert_eq!(a_seeks.lock().unwrap().len(), 1);
}

#[test]
fn smaller_layer_composites_only_overlap() {
    let mut engine = TimelineEngine::new(settings());
    engine
        .add_clip_with_source(
            Clip::new(ClipId(1), "bg.mp4", 0.0, 5.0, 0.0),
            Box::new(SolidSource::new(8, 8, 20.0, RED)),
        )
        .unwrap();
    engine
        .add_clip_with_source(
            Clip::new(ClipId(2), "inset.mp4", 0.0, 5.0, 0.0),
            Box::new(SolidSource::new(4, 4, 20.0, BLUE)),
        )
        .unwrap();

    let frame = engine.render_frame(1.0);
    assert_eq!(frame.pixel(0, 0), BLUE);
    assert_eq!(frame.pixel(3, 3), BLUE);
    // Outside the inset the background shows through
    assert_eq!(frame.pixel(6, 6), RED);
}

#[test]
fn broken_source_reports_health_and_renders_around_it() {
    let mut engine = TimelineEngine::new(settings());
    engine
        .add_clip_with_source(
            Clip::new(ClipId(1), "good.mp4", 0.0, 5.0, 0.0),
            Box::new(SolidSource::new(8, 8, 20.0, RED)),
        )
        .unwrap();

    let err = engine
        .add_clip(Clip::new(ClipId(2), "/nonexistent/broken.mp4", 0.0, 5.0, 0.0))
        .unwrap_err();
    assert!(matches!(err, CutroomError::SourceOpen(_)));

    assert_eq!(engine.clip_status(ClipId(1)), Some(ClipStatus::Ready));
    assert!(matches!(
        engine.clip_status(ClipId(2)),
        Some(ClipStatus::Unavailable { .. })
    ));

    // Rendering carries on with the healthy clip
    assert_eq!(engine.render_frame(1.0).pixel(0, 0), RED);
}
