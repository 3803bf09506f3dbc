//! Biome definitions consumed by chunk generation.

use std::collections::BTreeMap;

use riftgrid_common::BiomeId;
use serde::{Deserialize, Serialize};

/// Biome used whenever a lookup misses.
pub const DEFAULT_BIOME: &str = "rift_wastes";

/// Visual and gameplay properties of one biome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeDef {
    pub name: String,
    /// Flat floor color (0xRRGGBB), also the fallback when the texture fails.
    pub ground_color: u32,
    #[serde(default)]
    pub ground_texture: Option<String>,
    /// Safe hub: no hostiles and no rescue features.
    #[serde(default)]
    pub peaceful: bool,
}

/// Errors from loading biome definitions.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("biome JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Registry of biome definitions keyed by id.
#[derive(Debug, Clone)]
pub struct BiomeRegistry {
    biomes: BTreeMap<BiomeId, BiomeDef>,
    fallback: BiomeDef,
}

impl Default for BiomeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl BiomeRegistry {
    /// The built-in biome set.
    pub fn builtin() -> Self {
        let rift_wastes = BiomeDef {
            name: "The Rift Wastes".into(),
            ground_color: 0x1a1a2e,
            ground_texture: Some("images/tex_scorched_aether_ash.jpg".into()),
            peaceful: false,
        };
        let mut registry = Self {
            biomes: BTreeMap::new(),
            fallback: rift_wastes.clone(),
        };
        registry.register(DEFAULT_BIOME, rift_wastes);
        registry.register(
            "crimson_hollow",
            BiomeDef {
                name: "Crimson Hollow".into(),
                ground_color: 0x2e1a1a,
                ground_texture: None,
                peaceful: false,
            },
        );
        registry.register(
            "flickering_expanse",
            BiomeDef {
                name: "Flickering Expanse".into(),
                ground_color: 0x1a2e2e,
                ground_texture: None,
                peaceful: false,
            },
        );
        registry.register(
            "void_cathedral",
            BiomeDef {
                name: "Void Cathedral".into(),
                ground_color: 0x1a1a30,
                ground_texture: None,
                peaceful: false,
            },
        );
        registry.register(
            "sanctuary",
            BiomeDef {
                name: "The Outpost".into(),
                ground_color: 0x224422,
                ground_texture: Some("images/tex_garrisoned_earth.jpg".into()),
                peaceful: true,
            },
        );
        registry
    }

    /// Built-ins overlaid with definitions from a JSON object of `id -> BiomeDef`.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let extra: BTreeMap<BiomeId, BiomeDef> = serde_json::from_str(json)?;
        let mut registry = Self::builtin();
        for (id, def) in extra {
            registry.register(id.0, def);
        }
        Ok(registry)
    }

    /// Add or replace a definition.
    pub fn register(&mut self, id: impl Into<String>, def: BiomeDef) {
        let id = BiomeId::new(id);
        if id.as_str() == DEFAULT_BIOME {
            self.fallback = def.clone();
        }
        self.biomes.insert(id, def);
    }

    /// Look up a biome, falling back to [`DEFAULT_BIOME`] when unknown.
    pub fn get(&self, id: &BiomeId) -> &BiomeDef {
        match self.biomes.get(id) {
            Some(def) => def,
            None => {
                tracing::warn!(biome = %id, fallback = DEFAULT_BIOME, "unknown biome");
                &self.fallback
            }
        }
    }

    pub fn contains(&self, id: &BiomeId) -> bool {
        self.biomes.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &BiomeId> {
        self.biomes.keys()
    }

    pub fn len(&self) -> usize {
        self.biomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.biomes.is_empty()
    }
}
