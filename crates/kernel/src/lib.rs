//! Simulation kernel: the explicit context that owns the occupancy index,
//! the streamed chunks and the shared flow field.
//!
//! # Invariants
//! - Per tick: streaming update, then flow rebuild, then agent queries.
//! - Agents never receive guidance from a field built against an older
//!   occupancy revision.
//! - All mutations flow through [`World`] operations and are logged.

pub mod config;
pub mod placement;
pub mod world;

pub use config::{ConfigError, WorldConfig};
pub use placement::{Placement, PlacementId, PlacementKind, StructureKind};
pub use world::{StepReport, World, WorldEvent};
