use riftgrid_common::{Footprint, FootprintError};
use serde::{Deserialize, Serialize};

/// Identifier of an externally placed obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlacementId(pub u64);

/// Player-built structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    Wall,
    Turret,
}

/// Anything placed into the world outside the chunk system that blocks movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementKind {
    Structure(StructureKind),
    RiftGate,
}

impl PlacementKind {
    /// Footprint this kind occupies when placed at (x, z).
    ///
    /// Structures snap to the center of the cell containing the point and
    /// fill exactly that cell. Rift gates cover 3x3 units around the point.
    pub fn footprint_at(self, x: f32, z: f32) -> Result<Footprint, FootprintError> {
        match self {
            PlacementKind::Structure(_) => Footprint::new(x.floor() + 0.5, z.floor() + 0.5, 1.0, 1.0),
            PlacementKind::RiftGate => Footprint::new(x, z, 3.0, 3.0),
        }
    }
}

/// A placed obstacle and the footprint it registered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub kind: PlacementKind,
    pub footprint: Footprint,
}
