use std::collections::HashSet;

use glam::Vec2;
use riftgrid_common::{ContentId, Footprint};
use serde::{Deserialize, Serialize};

/// Handle to a loaded ground texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub u64);

/// Surface material of generated content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Material {
    Textured { texture: TextureHandle, tint: u32 },
    Flat { color: u32 },
}

/// A character that can be rescued from a cage feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rescuable {
    Smith,
    Scribe,
    Builder,
}

impl Rescuable {
    pub const ALL: [Rescuable; 3] = [Rescuable::Smith, Rescuable::Scribe, Rescuable::Builder];
}

/// Interactable special features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Feature {
    Cage {
        footprint: Footprint,
        character: Rescuable,
    },
}

/// What a content handle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ContentKind {
    Floor {
        center: Vec2,
        size: f32,
        material: Material,
    },
    Obstacle {
        footprint: Footprint,
        height: f32,
    },
    Wall {
        footprint: Footprint,
        height: f32,
    },
    Decoration {
        position: Vec2,
        rotation: f32,
        scale: f32,
    },
    Feature(Feature),
}

impl ContentKind {
    /// Collision footprint, if this content blocks movement.
    pub fn footprint(&self) -> Option<Footprint> {
        match self {
            ContentKind::Obstacle { footprint, .. } | ContentKind::Wall { footprint, .. } => {
                Some(*footprint)
            }
            ContentKind::Feature(Feature::Cage { footprint, .. }) => Some(*footprint),
            ContentKind::Floor { .. } | ContentKind::Decoration { .. } => None,
        }
    }
}

/// One spawned piece of chunk content, exclusively owned by its chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentHandle {
    pub id: ContentId,
    pub kind: ContentKind,
}

/// The visual layer that receives spawned content.
pub trait SceneSink {
    fn attach(&mut self, handle: &ContentHandle);
    fn detach(&mut self, handle: &ContentHandle);
}

/// Scene that drops everything, for headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullScene;

impl SceneSink for NullScene {
    fn attach(&mut self, _handle: &ContentHandle) {}
    fn detach(&mut self, _handle: &ContentHandle) {}
}

/// Scene that remembers which content is attached.
#[derive(Debug, Clone, Default)]
pub struct TrackingScene {
    live: HashSet<ContentId>,
    attached_total: usize,
    detached_total: usize,
}

impl TrackingScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live(&self) -> usize {
        self.live.len()
    }

    pub fn contains(&self, id: ContentId) -> bool {
        self.live.contains(&id)
    }

    pub fn attached_total(&self) -> usize {
        self.attached_total
    }

    pub fn detached_total(&self) -> usize {
        self.detached_total
    }
}

impl SceneSink for TrackingScene {
    fn attach(&mut self, handle: &ContentHandle) {
        self.live.insert(handle.id);
        self.attached_total += 1;
    }

    fn detach(&mut self, handle: &ContentHandle) {
        if self.live.remove(&handle.id) {
            self.detached_total += 1;
        }
    }
}

/// Errors from loading generation assets.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssetError {
    #[error("texture not found: {0}")]
    NotFound(String),
    #[error("texture decode failed for {path}: {reason}")]
    Decode { path: String, reason: String },
}

/// Source of ground textures.
pub trait TextureLoader {
    fn load(&self, path: &str) -> Result<TextureHandle, AssetError>;
}

/// Loader that names textures by the hash of their path without touching disk.
///
/// Paths listed in `missing` fail to load.
#[derive(Debug, Clone, Default)]
pub struct PathTextureLoader {
    missing: HashSet<String>,
}

impl PathTextureLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_missing(mut self, path: impl Into<String>) -> Self {
        self.missing.insert(path.into());
        self
    }
}

impl TextureLoader for PathTextureLoader {
    fn load(&self, path: &str) -> Result<TextureHandle, AssetError> {
        if path.is_empty() || self.missing.contains(path) {
            return Err(AssetError::NotFound(path.to_owned()));
        }
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        for &b in path.as_bytes() {
            h ^= b as u64;
            h = h.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(TextureHandle(h))
    }
}
