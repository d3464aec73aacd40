//! Cutroom Timeline - clip scheduling and frame rendering
//!
//! Implements the orchestration layer of the rendering engine:
//! - Clip placement on the timeline with source trimming
//! - The registry pairing clips with their frame providers
//! - The timeline engine mapping timeline time to composited frames

pub mod clip;
pub mod engine;
pub mod registry;

pub use clip::{Clip, ClipId};
pub use engine::{EngineSettings, TimelineEngine};
pub use registry::{ClipRegistry, ClipStatus};
