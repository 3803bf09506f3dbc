//! Dungeon layout: a global lattice of 2-unit wall cells whose solidity is a
//! pure function of world position, so chunks agree on walls along shared
//! edges no matter which one was generated first.
//!
//! Each 20-unit macro cell holds a square room centered on the macro cell,
//! sized by a sine hash of the macro coordinates, crossed by a north-south
//! and an east-west corridor. Everything else is wall.

use glam::Vec2;
use riftgrid_common::{Footprint, PortalDescriptor, WorldContext};
use riftgrid_occupancy::OccupancyIndex;

use crate::chunk::Chunk;
use crate::content::{ContentKind, SceneSink};
use crate::rng::sine_hash;

const WALL_CELL: f32 = 2.0;
const WALL_HEIGHT: f32 = 4.0;
const MACRO_CELL: f32 = 20.0;
const SPAWN_CLEAR_RADIUS: f32 = 10.0;
const PORTAL_CLEAR_SQ: f32 = 36.0;
const CORRIDOR_HALF_WIDTH: f32 = 2.0;
const MIN_ROOM_HALF: f32 = 3.0;
const ROOM_HALF_STEPS: f64 = 5.0;

/// Whether the wall cell centered at `center` is solid.
pub fn is_wall(center: Vec2, portals: &[PortalDescriptor]) -> bool {
    if center.length_squared() < SPAWN_CLEAR_RADIUS * SPAWN_CLEAR_RADIUS {
        return false;
    }
    if portals
        .iter()
        .any(|p| center.distance_squared(p.position()) < PORTAL_CLEAR_SQ)
    {
        return false;
    }

    let mx = (center.x / MACRO_CELL).floor() as i32;
    let mz = (center.y / MACRO_CELL).floor() as i32;
    let local = center - Vec2::new(mx as f32, mz as f32) * MACRO_CELL;
    let mid = MACRO_CELL / 2.0;
    let dx = (local.x - mid).abs();
    let dz = (local.y - mid).abs();

    let room_half = MIN_ROOM_HALF + (sine_hash(mx, mz) * ROOM_HALF_STEPS).floor() as f32;
    if dx < room_half && dz < room_half {
        return false;
    }
    if dx < CORRIDOR_HALF_WIDTH || dz < CORRIDOR_HALF_WIDTH {
        return false;
    }
    true
}

/// Index range of global wall cells whose centers fall in `[lo, lo + size)`.
fn lattice_range(lo: f32, size: f32) -> std::ops::Range<i32> {
    let first = (lo / WALL_CELL - 0.5).ceil() as i32;
    let end = ((lo + size) / WALL_CELL - 0.5).ceil() as i32;
    first..end
}

pub(crate) fn populate(
    chunk: &mut Chunk,
    chunk_size: f32,
    ctx: &WorldContext,
    index: &mut OccupancyIndex,
    scene: &mut dyn SceneSink,
) {
    let origin = chunk.coord().center(chunk_size) - Vec2::splat(chunk_size / 2.0);
    for gx in lattice_range(origin.x, chunk_size) {
        for gz in lattice_range(origin.y, chunk_size) {
            let center = Vec2::new(gx as f32 + 0.5, gz as f32 + 0.5) * WALL_CELL;
            if !is_wall(center, &ctx.portals) {
                continue;
            }
            let footprint = Footprint {
                x: center.x,
                z: center.y,
                width: WALL_CELL,
                depth: WALL_CELL,
            };
            chunk.spawn(
                ContentKind::Wall {
                    footprint,
                    height: WALL_HEIGHT,
                },
                index,
                scene,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::NullScene;
    use riftgrid_common::{Cell, ChunkCoord};
    use std::collections::HashSet;

    #[test]
    fn spawn_area_is_open() {
        for x in -4..4 {
            for z in -4..4 {
                let c = Vec2::new(x as f32 + 0.5, z as f32 + 0.5) * WALL_CELL;
                if c.length() < SPAWN_CLEAR_RADIUS {
                    assert!(!is_wall(c, &[]));
                }
            }
        }
    }

    #[test]
    fn corridors_are_open() {
        // Local x = 9 and 11 sit inside the north-south corridor of macro cell (3, 3).
        for lz in (1..20).step_by(2) {
            assert!(!is_wall(Vec2::new(69.0, 60.0 + lz as f32), &[]));
            assert!(!is_wall(Vec2::new(71.0, 60.0 + lz as f32), &[]));
        }
    }

    #[test]
    fn macro_cell_corners_are_solid() {
        // Corner cells are outside every room (half <= 7) and every corridor.
        for (mx, mz) in [(3, 3), (-5, 2), (7, -8)] {
            let base = Vec2::new(mx as f32, mz as f32) * MACRO_CELL;
            assert!(is_wall(base + Vec2::new(1.0, 1.0), &[]));
            assert!(is_wall(base + Vec2::new(19.0, 19.0), &[]));
        }
    }

    #[test]
    fn portal_clears_nearby_walls() {
        let corner = Vec2::new(61.0, 61.0);
        assert!(is_wall(corner, &[]));
        let portal = PortalDescriptor::new("dungeon_exit", 62.0, 62.0);
        assert!(!is_wall(corner, &[portal]));
    }

    #[test]
    fn lattice_partitions_cells_between_chunks() {
        let mut seen = HashSet::new();
        for cx in -1..=1 {
            let origin = cx as f32 * 20.0 - 10.0;
            for gx in lattice_range(origin, 20.0) {
                assert!(seen.insert(gx), "wall column {gx} claimed twice");
            }
        }
        assert_eq!(seen.len(), 30);
    }

    #[test]
    fn neighboring_chunks_never_share_wall_cells() {
        let ctx = WorldContext::dungeon("void_cathedral");
        let mut index = OccupancyIndex::new();
        let a = {
            let mut chunk = Chunk::new(ChunkCoord::new(3, 0));
            populate(&mut chunk, 20.0, &ctx, &mut index, &mut NullScene);
            chunk
        };
        let b = {
            let mut chunk = Chunk::new(ChunkCoord::new(4, 0));
            populate(&mut chunk, 20.0, &ctx, &mut index, &mut NullScene);
            chunk
        };
        let cells_a: HashSet<Cell> = a.footprints().iter().flat_map(|f| f.cells()).collect();
        let cells_b: HashSet<Cell> = b.footprints().iter().flat_map(|f| f.cells()).collect();
        assert!(cells_a.is_disjoint(&cells_b));
        assert!(!cells_a.is_empty());
        // Every blocked cell is covered by exactly one wall.
        for cell in cells_a.iter().chain(cells_b.iter()) {
            assert_eq!(index.count(*cell), 1);
        }
    }
}
