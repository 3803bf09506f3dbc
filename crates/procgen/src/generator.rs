use riftgrid_common::{ChunkCoord, WorldContext};
use riftgrid_occupancy::OccupancyIndex;
use serde::{Deserialize, Serialize};

use crate::biome::{BiomeDef, BiomeRegistry};
use crate::chunk::Chunk;
use crate::content::{ContentKind, Material, PathTextureLoader, SceneSink, TextureLoader};
use crate::{dungeon, wilderness};

/// Tunables for wilderness generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Probability that a wilderness chunk contains a rescue cage.
    pub rescue_chance: f32,
    /// No wilderness obstacle may come closer than this to a portal.
    pub portal_clear_radius: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            rescue_chance: 0.01,
            portal_clear_radius: 4.0,
        }
    }
}

/// Produces chunk content from coordinate and world context.
pub struct ChunkGenerator {
    chunk_size: f32,
    params: GenerationParams,
    biomes: BiomeRegistry,
    textures: Box<dyn TextureLoader>,
}

impl ChunkGenerator {
    pub fn new(chunk_size: f32) -> Self {
        assert!(chunk_size > 0.0, "chunk_size must be positive");
        Self {
            chunk_size,
            params: GenerationParams::default(),
            biomes: BiomeRegistry::builtin(),
            textures: Box::new(PathTextureLoader::new()),
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_biomes(mut self, biomes: BiomeRegistry) -> Self {
        self.biomes = biomes;
        self
    }

    pub fn with_textures(mut self, textures: Box<dyn TextureLoader>) -> Self {
        self.textures = textures;
        self
    }

    pub fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    pub fn biomes(&self) -> &BiomeRegistry {
        &self.biomes
    }

    /// Generate the chunk at `coord`, registering its obstacles into `index`
    /// and attaching its content to `scene`.
    pub fn generate(
        &self,
        coord: ChunkCoord,
        ctx: &WorldContext,
        index: &mut OccupancyIndex,
        scene: &mut dyn SceneSink,
    ) -> Chunk {
        let _span =
            tracing::debug_span!("generate_chunk", %coord, biome = %ctx.biome, dungeon = ctx.dungeon)
                .entered();
        let biome = self.biomes.get(&ctx.biome);
        let mut chunk = Chunk::new(coord);

        chunk.spawn(
            ContentKind::Floor {
                center: coord.center(self.chunk_size),
                size: self.chunk_size,
                material: self.floor_material(biome),
            },
            index,
            scene,
        );

        if ctx.dungeon {
            dungeon::populate(&mut chunk, self.chunk_size, ctx, index, scene);
        } else {
            wilderness::populate(
                &mut chunk,
                self.chunk_size,
                ctx,
                biome,
                &self.params,
                index,
                scene,
            );
        }

        tracing::debug!(
            content = chunk.content().len(),
            obstacles = chunk.footprints().len(),
            "chunk generated"
        );
        chunk
    }

    /// Biome texture when it loads, flat ground color otherwise.
    fn floor_material(&self, biome: &BiomeDef) -> Material {
        let Some(path) = &biome.ground_texture else {
            return Material::Flat {
                color: biome.ground_color,
            };
        };
        match self.textures.load(path) {
            Ok(texture) => Material::Textured {
                texture,
                tint: biome.ground_color,
            },
            Err(err) => {
                tracing::warn!(%err, biome = %biome.name, "ground texture unavailable, using flat color");
                Material::Flat {
                    color: biome.ground_color,
                }
            }
        }
    }
}
