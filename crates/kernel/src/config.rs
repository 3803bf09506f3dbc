use std::collections::BTreeMap;
use std::path::Path;

use riftgrid_common::BiomeId;
use riftgrid_nav::{FlowConfig, FlowScheduleConfig, MAX_FLOW_RANGE};
use riftgrid_procgen::{BiomeDef, BiomeRegistry, GenerationParams};
use riftgrid_stream::{StreamConfig, StreamConfigError};
use serde::{Deserialize, Serialize};

/// Errors from loading or validating a [`WorldConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid stream config: {0}")]
    Stream(#[from] StreamConfigError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything a [`World`](crate::World) needs besides its context.
///
/// Every field has a default, so `{}` is a valid config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub stream: StreamConfig,
    pub flow: FlowConfig,
    pub schedule: FlowScheduleConfig,
    pub generation: GenerationParams,
    /// Extra biome definitions, merged over the built-ins.
    pub biomes: BTreeMap<BiomeId, BiomeDef>,
}

impl WorldConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&data)?;
        tracing::info!(path = %path.display(), "world config loaded");
        Ok(config)
    }

    /// Write the config as pretty-printed JSON. Does not validate.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    ///
    /// Radii are capped ([`MAX_FLOW_RANGE`], [`riftgrid_stream::MAX_RENDER_DISTANCE`])
    /// because both windows are allocated densely.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.stream.validate()?;
        if !(1..=MAX_FLOW_RANGE).contains(&self.flow.range) {
            return Err(ConfigError::Invalid(format!(
                "flow.range must lie in 1..={MAX_FLOW_RANGE}, got {}",
                self.flow.range
            )));
        }
        let interval = self.schedule.interval_secs;
        if !interval.is_finite() || interval < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "schedule.interval_secs must be finite and >= 0, got {}",
                interval
            )));
        }
        if self.schedule.max_drift.is_nan() || self.schedule.max_drift <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "schedule.max_drift must be positive, got {}",
                self.schedule.max_drift
            )));
        }
        if !(0.0..=1.0).contains(&self.generation.rescue_chance) {
            return Err(ConfigError::Invalid(format!(
                "generation.rescue_chance must lie in [0, 1], got {}",
                self.generation.rescue_chance
            )));
        }
        if self.generation.portal_clear_radius.is_nan() || self.generation.portal_clear_radius < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "generation.portal_clear_radius must be >= 0, got {}",
                self.generation.portal_clear_radius
            )));
        }
        Ok(())
    }

    /// Built-in biomes with this config's definitions layered on top.
    pub fn biome_registry(&self) -> BiomeRegistry {
        let mut registry = BiomeRegistry::builtin();
        for (id, def) in &self.biomes {
            registry.register(id.as_str(), def.clone());
        }
        registry
    }
}
