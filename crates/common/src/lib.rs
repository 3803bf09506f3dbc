//! Shared value types used by every riftgrid crate.
//!
//! # Invariants
//! - Every spatial query and obstacle footprint is rasterized to [`Cell`]s.
//! - Rasterization lives in one place ([`Footprint::cell_bounds`]) so that
//!   registration and removal always cover the same cell set.

mod types;

pub use types::{
    BiomeId, Cell, CellKey, ChunkCoord, ContentId, Footprint, FootprintError, PortalDescriptor,
    RASTER_EPSILON, WorldContext,
};
