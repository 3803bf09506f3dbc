use std::collections::BTreeSet;

use riftgrid_common::ChunkCoord;
use serde::{Deserialize, Serialize};

/// Largest accepted window radius, in chunks.
pub const MAX_RENDER_DISTANCE: i32 = 64;

/// Streaming configuration: chunk size and the radius of the active window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Side length of a chunk in world units.
    pub chunk_size: f32,
    /// Radius (in chunks) of the active window around the reference chunk.
    pub render_distance: i32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            chunk_size: 20.0,
            render_distance: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StreamConfigError {
    #[error("chunk_size must be positive and finite, got {0}")]
    ChunkSize(f32),
    #[error("render_distance must lie in 0..={MAX_RENDER_DISTANCE}, got {0}")]
    RenderDistance(i32),
}

impl StreamConfig {
    pub fn validate(&self) -> Result<(), StreamConfigError> {
        if !(self.chunk_size.is_finite() && self.chunk_size > 0.0) {
            return Err(StreamConfigError::ChunkSize(self.chunk_size));
        }
        if !(0..=MAX_RENDER_DISTANCE).contains(&self.render_distance) {
            return Err(StreamConfigError::RenderDistance(self.render_distance));
        }
        Ok(())
    }

    /// Chunk containing a world position.
    pub fn chunk_at(&self, x: f32, z: f32) -> ChunkCoord {
        ChunkCoord::from_world(x, z, self.chunk_size)
    }

    /// Number of chunks in a full window. Out-of-range radii count as the
    /// nearest valid one.
    pub fn window_len(&self) -> usize {
        let radius = self.render_distance.clamp(0, MAX_RENDER_DISTANCE) as usize;
        let side = 2 * radius + 1;
        side * side
    }
}

/// All chunk coordinates within a square radius of `center`.
pub fn window_around(center: ChunkCoord, radius: i32) -> BTreeSet<ChunkCoord> {
    let mut result = BTreeSet::new();
    for dx in -radius..=radius {
        for dz in -radius..=radius {
            result.insert(ChunkCoord::new(center.x + dx, center.z + dz));
        }
    }
    result
}
