//! Cutroom Core - Foundation types for the rendering engine
//!
//! This crate provides the fundamental types used throughout Cutroom:
//! - Error taxonomy (CutroomError, Result)
//! - Time representation (FrameRate)
//! - RGBA video frames (VideoFrame)

pub mod error;
pub mod frame;
pub mod time;

pub use error::{CutroomError, Result};
pub use frame::VideoFrame;
pub use time::FrameRate;
