use glam::Vec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Amount subtracted from a footprint's maximum bound before flooring, so an
/// edge lying exactly on an integer line does not claim the cell beyond it.
pub const RASTER_EPSILON: f32 = 0.05;

/// A 1x1 unit of world space, identified by its integer (x, z) corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub z: i32,
}

impl Cell {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The cell containing a world position.
    pub fn containing(x: f32, z: f32) -> Self {
        Self {
            x: x.floor() as i32,
            z: z.floor() as i32,
        }
    }

    /// World-space center of the cell.
    pub fn center(self) -> Vec2 {
        Vec2::new(self.x as f32 + 0.5, self.z as f32 + 0.5)
    }

    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    /// Chebyshev (king-move) distance between two cells.
    pub fn chebyshev(self, other: Cell) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }

    pub fn key(self) -> CellKey {
        CellKey::pack(self)
    }
}

/// Both signed cell coordinates packed into one `u64`: x in the high half,
/// z in the low half. Used as an allocation-free hash key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey(pub u64);

impl CellKey {
    pub fn pack(cell: Cell) -> Self {
        Self(((cell.x as u32 as u64) << 32) | (cell.z as u32 as u64))
    }

    pub fn unpack(self) -> Cell {
        Cell {
            x: (self.0 >> 32) as u32 as i32,
            z: self.0 as u32 as i32,
        }
    }
}

impl From<Cell> for CellKey {
    fn from(cell: Cell) -> Self {
        Self::pack(cell)
    }
}

/// Coordinate of a streaming chunk. Chunk `(cx, cz)` is centered on world
/// position `(cx * size, cz * size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk whose square contains the world position. Halves round toward
    /// positive infinity so that `-10 / 20` lands in chunk 0, not -1.
    pub fn from_world(x: f32, z: f32, chunk_size: f32) -> Self {
        Self {
            x: (x / chunk_size + 0.5).floor() as i32,
            z: (z / chunk_size + 0.5).floor() as i32,
        }
    }

    /// World-space center of the chunk.
    pub fn center(self, chunk_size: f32) -> Vec2 {
        Vec2::new(self.x as f32 * chunk_size, self.z as f32 * chunk_size)
    }

    /// The spawn chunk at the world origin.
    pub fn is_origin(self) -> bool {
        self.x == 0 && self.z == 0
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Errors from constructing an obstacle footprint.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FootprintError {
    #[error("footprint has non-finite component: x={x} z={z} width={width} depth={depth}")]
    NonFinite {
        x: f32,
        z: f32,
        width: f32,
        depth: f32,
    },
    #[error("footprint must have positive extent, got {width}x{depth}")]
    NonPositive { width: f32, depth: f32 },
}

/// An axis-aligned obstacle rectangle centered on (x, z).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub x: f32,
    pub z: f32,
    pub width: f32,
    pub depth: f32,
}

impl Footprint {
    /// Build a footprint, rejecting non-finite or non-positive dimensions.
    pub fn new(x: f32, z: f32, width: f32, depth: f32) -> Result<Self, FootprintError> {
        if !(x.is_finite() && z.is_finite() && width.is_finite() && depth.is_finite()) {
            return Err(FootprintError::NonFinite {
                x,
                z,
                width,
                depth,
            });
        }
        if width <= 0.0 || depth <= 0.0 {
            return Err(FootprintError::NonPositive { width, depth });
        }
        Ok(Self {
            x,
            z,
            width,
            depth,
        })
    }

    /// Inclusive min/max cells covered by `[x-w/2, x+w/2) x [z-d/2, z+d/2)`.
    ///
    /// The maximum bound is pulled in by [`RASTER_EPSILON`] before flooring,
    /// but never past the minimum: a positive footprint always claims the
    /// cell it starts in.
    pub fn cell_bounds(&self) -> (Cell, Cell) {
        let half_w = self.width / 2.0;
        let half_d = self.depth / 2.0;
        let min = Cell::new(
            (self.x - half_w).floor() as i32,
            (self.z - half_d).floor() as i32,
        );
        let max = Cell::new(
            ((self.x + half_w - RASTER_EPSILON).floor() as i32).max(min.x),
            ((self.z + half_d - RASTER_EPSILON).floor() as i32).max(min.z),
        );
        (min, max)
    }

    /// Every cell this footprint rasterizes to.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        let (min, max) = self.cell_bounds();
        (min.x..=max.x).flat_map(move |x| (min.z..=max.z).map(move |z| Cell::new(x, z)))
    }

    /// Squared distance from a point to the nearest point of the rectangle.
    pub fn distance_sq_to(&self, p: Vec2) -> f32 {
        let half = Vec2::new(self.width / 2.0, self.depth / 2.0);
        let center = Vec2::new(self.x, self.z);
        let closest = p.clamp(center - half, center + half);
        p.distance_squared(closest)
    }
}

/// Identifier of one spawned piece of chunk content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentId(pub Uuid);

impl ContentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContentId {
    fn default() -> Self {
        Self::new()
    }
}

/// Name of a biome definition, e.g. `rift_wastes`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BiomeId(pub String);

impl BiomeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BiomeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl std::fmt::Display for BiomeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A transition point supplied by the world graph. Generation keeps the
/// area around it unobstructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalDescriptor {
    pub target_id: String,
    pub x: f32,
    pub z: f32,
}

impl PortalDescriptor {
    pub fn new(target_id: impl Into<String>, x: f32, z: f32) -> Self {
        Self {
            target_id: target_id.into(),
            x,
            z,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }
}

/// Externally supplied context that selects and seeds chunk generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldContext {
    pub biome: BiomeId,
    pub dungeon: bool,
    #[serde(default)]
    pub portals: Vec<PortalDescriptor>,
    #[serde(default)]
    pub seed: u64,
}

impl Default for WorldContext {
    fn default() -> Self {
        Self {
            biome: BiomeId::from("rift_wastes"),
            dungeon: false,
            portals: Vec::new(),
            seed: 0,
        }
    }
}

impl WorldContext {
    pub fn wilderness(biome: impl Into<String>) -> Self {
        Self {
            biome: BiomeId::new(biome),
            ..Self::default()
        }
    }

    pub fn dungeon(biome: impl Into<String>) -> Self {
        Self {
            biome: BiomeId::new(biome),
            dungeon: true,
            ..Self::default()
        }
    }

    pub fn with_portals(mut self, portals: Vec<PortalDescriptor>) -> Self {
        self.portals = portals;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_key_roundtrips_negative_coordinates() {
        for cell in [
            Cell::new(0, 0),
            Cell::new(-1, 5),
            Cell::new(i32::MIN, i32::MAX),
            Cell::new(123_456, -987_654),
        ] {
            assert_eq!(cell.key().unpack(), cell);
        }
    }

    #[test]
    fn cell_keys_are_distinct_for_swapped_axes() {
        assert_ne!(Cell::new(1, -1).key(), Cell::new(-1, 1).key());
    }

    #[test]
    fn chunk_from_world_rounds_half_up() {
        assert_eq!(ChunkCoord::from_world(0.0, 0.0, 20.0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_world(9.9, -9.9, 20.0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_world(10.0, -10.0, 20.0), ChunkCoord::new(1, 0));
        assert_eq!(ChunkCoord::from_world(-10.1, 45.0, 20.0), ChunkCoord::new(-1, 2));
    }

    #[test]
    fn footprint_rejects_degenerate_extent() {
        assert!(matches!(
            Footprint::new(0.0, 0.0, 0.0, 1.0),
            Err(FootprintError::NonPositive { .. })
        ));
        assert!(matches!(
            Footprint::new(0.0, 0.0, 1.0, -2.0),
            Err(FootprintError::NonPositive { .. })
        ));
        assert!(matches!(
            Footprint::new(f32::NAN, 0.0, 1.0, 1.0),
            Err(FootprintError::NonFinite { .. })
        ));
    }

    #[test]
    fn footprint_edge_on_integer_line_stays_inside() {
        // [9, 11) x [9, 11): exactly four cells, nothing at x = 11 or z = 11.
        let fp = Footprint::new(10.0, 10.0, 2.0, 2.0).unwrap();
        let cells: Vec<Cell> = fp.cells().collect();
        assert_eq!(cells.len(), 4);
        assert!(cells.contains(&Cell::new(9, 9)));
        assert!(cells.contains(&Cell::new(10, 10)));
        assert!(!cells.contains(&Cell::new(11, 10)));
        assert!(!cells.contains(&Cell::new(10, 11)));
    }

    #[test]
    fn unit_footprint_on_cell_center_covers_one_cell() {
        let fp = Footprint::new(3.5, -2.5, 1.0, 1.0).unwrap();
        let cells: Vec<Cell> = fp.cells().collect();
        assert_eq!(cells, vec![Cell::new(3, -3)]);
    }

    #[test]
    fn fractional_footprint_covers_partial_cells() {
        // [0.25, 1.75) x [0, 1): touches cells x = 0 and x = 1.
        let fp = Footprint::new(1.0, 0.5, 1.5, 1.0).unwrap();
        let cells: Vec<Cell> = fp.cells().collect();
        assert_eq!(cells, vec![Cell::new(0, 0), Cell::new(1, 0)]);
    }

    #[test]
    fn sliver_footprint_claims_its_starting_cell() {
        // [1.0, 1.04) is thinner than the edge epsilon.
        let fp = Footprint::new(1.02, 0.5, 0.04, 1.0).unwrap();
        assert_eq!(fp.cells().collect::<Vec<_>>(), vec![Cell::new(1, 0)]);
        let thin_both = Footprint::new(-2.98, 4.01, 0.04, 0.02).unwrap();
        assert_eq!(thin_both.cells().collect::<Vec<_>>(), vec![Cell::new(-3, 4)]);
    }

    #[test]
    fn footprint_distance_is_zero_inside() {
        let fp = Footprint::new(0.0, 0.0, 2.0, 2.0).unwrap();
        assert_eq!(fp.distance_sq_to(Vec2::new(0.5, -0.5)), 0.0);
        assert!((fp.distance_sq_to(Vec2::new(3.0, 0.0)) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn content_id_uniqueness() {
        assert_ne!(ContentId::new(), ContentId::new());
    }

    #[test]
    fn world_context_defaults_to_wilderness() {
        let ctx = WorldContext::default();
        assert_eq!(ctx.biome.as_str(), "rift_wastes");
        assert!(!ctx.dungeon);
        assert!(ctx.portals.is_empty());
    }
}
