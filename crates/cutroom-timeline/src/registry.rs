//! The clip registry: clips paired with their frame providers.

use cutroom_core::{CutroomError, Result};
use cutroom_media::SourceFrameProvider;
use std::collections::HashMap;

use crate::clip::{Clip, ClipId};

/// Availability of a registered clip's media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipStatus {
    /// The source opened and the clip renders normally.
    Ready,
    /// The source failed to open; the clip is skipped at render time.
    Unavailable {
        /// Why the source could not be opened.
        reason: String,
    },
}

/// Ordered set of timeline clips and their providers.
///
/// Clips keep insertion order, which is the layering order at render time
/// (later-inserted clips draw on top). A provider exists for a clip id iff
/// the clip exists and its source opened; clips whose source failed stay
/// registered, flagged `Unavailable`.
#[derive(Default)]
pub struct ClipRegistry {
    clips: Vec<Clip>,
    providers: HashMap<ClipId, SourceFrameProvider>,
    failures: HashMap<ClipId, String>,
}

impl ClipRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a clip with the outcome of opening its source.
    ///
    /// Rejects duplicate ids: the id is the removal and health key.
    pub fn add(
        &mut self,
        clip: Clip,
        provider: std::result::Result<SourceFrameProvider, String>,
    ) -> Result<()> {
        if self.contains(clip.id) {
            return Err(CutroomError::InvalidParameter(format!(
                "clip id {} already registered",
                clip.id.0
            )));
        }
        let id = clip.id;
        self.clips.push(clip);
        match provider {
            Ok(provider) => {
                self.providers.insert(id, provider);
            }
            Err(reason) => {
                self.failures.insert(id, reason);
            }
        }
        Ok(())
    }

    /// Remove a clip and release its provider. Returns false when the id
    /// is unknown, making removal idempotent.
    pub fn remove(&mut self, id: ClipId) -> bool {
        let before = self.clips.len();
        self.clips.retain(|c| c.id != id);
        if let Some(mut provider) = self.providers.remove(&id) {
            provider.close();
        }
        self.failures.remove(&id);
        self.clips.len() != before
    }

    /// Whether a clip id is registered.
    pub fn contains(&self, id: ClipId) -> bool {
        self.clips.iter().any(|c| c.id == id)
    }

    /// Look up a clip by id.
    pub fn get(&self, id: ClipId) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == id)
    }

    /// All clips in insertion (layering) order.
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// The provider for a clip, if its source opened.
    pub fn provider_mut(&mut self, id: ClipId) -> Option<&mut SourceFrameProvider> {
        self.providers.get_mut(&id)
    }

    /// Media availability for a registered clip.
    pub fn status(&self, id: ClipId) -> Option<ClipStatus> {
        if !self.contains(id) {
            return None;
        }
        Some(match self.failures.get(&id) {
            Some(reason) => ClipStatus::Unavailable {
                reason: reason.clone(),
            },
            None => ClipStatus::Ready,
        })
    }

    /// Number of registered clips.
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// Whether the registry holds no clips.
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Timeline duration: the max clip end time, or 0 with no clips.
    pub fn duration(&self) -> f64 {
        self.clips.iter().map(Clip::end_time).fold(0.0, f64::max)
    }
}
