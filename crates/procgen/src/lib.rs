//! Procedural chunk content.
//!
//! # Invariants
//! - Output is a pure function of chunk coordinate, chunk size and
//!   [`WorldContext`](riftgrid_common::WorldContext): regenerating a chunk
//!   yields identical footprints.
//! - Every footprint a chunk registers is recorded on the chunk, so
//!   [`Chunk::dispose`] can release exactly what was registered.
//! - Per-chunk content counts are capped constants.

pub mod biome;
mod chunk;
mod content;
mod dungeon;
mod generator;
pub mod rng;
mod wilderness;

pub use biome::{BiomeDef, BiomeRegistry, DEFAULT_BIOME, RegistryError};
pub use chunk::Chunk;
pub use content::{
    AssetError, ContentHandle, ContentKind, Feature, Material, NullScene, PathTextureLoader,
    Rescuable, SceneSink, TextureHandle, TextureLoader, TrackingScene,
};
pub use dungeon::is_wall;
pub use generator::{ChunkGenerator, GenerationParams};
