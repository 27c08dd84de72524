use std::sync::Arc;

use image::RgbaImage;
use smallvec::SmallVec;

use crate::video::frame::FrameMetadata;

/// Image transform applied to live video frames after gravity scaling.
pub trait VideoEffect: Send + Sync {
    /// Transform the running image. `frame` describes the original decoded frame.
    fn apply(&self, image: RgbaImage, frame: &FrameMetadata) -> RgbaImage;
}

/// Shared handle to a registered effect. Registration compares handles by identity.
pub type EffectHandle = Arc<dyn VideoEffect>;

/// Ordered set of effects; insertion order is application order.
#[derive(Default, Clone)]
pub struct EffectChain {
    effects: SmallVec<[EffectHandle; 4]>,
}

impl std::fmt::Debug for EffectChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectChain")
            .field("len", &self.effects.len())
            .finish()
    }
}

impl EffectChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `effect`. Returns `false` if this exact handle is already registered.
    pub fn register(&mut self, effect: EffectHandle) -> bool {
        if self.contains(&effect) {
            return false;
        }
        self.effects.push(effect);
        true
    }

    /// Remove the first identity match. Returns whether one was found.
    pub fn unregister(&mut self, effect: &EffectHandle) -> bool {
        match self.effects.iter().position(|e| Arc::ptr_eq(e, effect)) {
            Some(i) => {
                self.effects.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, effect: &EffectHandle) -> bool {
        self.effects.iter().any(|e| Arc::ptr_eq(e, effect))
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Run every effect in registration order.
    pub fn apply(&self, image: RgbaImage, frame: &FrameMetadata) -> RgbaImage {
        self.effects
            .iter()
            .fold(image, |img, effect| effect.apply(img, frame))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/video/effect.rs"]
mod tests;
