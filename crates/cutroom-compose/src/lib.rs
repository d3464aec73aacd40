//! Cutroom Compose - deterministic CPU alpha compositing.

pub mod compositor;

pub use compositor::Compositor;
