//! Open terrain: grid-aligned box obstacles, scattered decorations and the
//! occasional rescue cage.

use glam::Vec2;
use riftgrid_common::{Cell, Footprint, WorldContext};
use riftgrid_occupancy::OccupancyIndex;

use crate::biome::BiomeDef;
use crate::chunk::Chunk;
use crate::content::{ContentKind, Feature, Rescuable, SceneSink};
use crate::generator::GenerationParams;
use crate::rng::{ChunkRng, chunk_seed};

const MIN_OBSTACLES: u32 = 3;
const EXTRA_OBSTACLES: u32 = 4;
const MAX_OBSTACLE_EXTENT: u32 = 2;
const MIN_DECORATIONS: u32 = 5;
const EXTRA_DECORATIONS: u32 = 10;

pub(crate) fn populate(
    chunk: &mut Chunk,
    chunk_size: f32,
    ctx: &WorldContext,
    biome: &BiomeDef,
    params: &GenerationParams,
    index: &mut OccupancyIndex,
    scene: &mut dyn SceneSink,
) {
    let coord = chunk.coord();
    let mut rng = ChunkRng::new(chunk_seed(coord, &ctx.biome, ctx.seed));
    let center = coord.center(chunk_size);
    let origin = center - Vec2::splat(chunk_size / 2.0);
    let clear_sq = params.portal_clear_radius * params.portal_clear_radius;
    let near_portal =
        |fp: &Footprint| ctx.portals.iter().any(|p| fp.distance_sq_to(p.position()) < clear_sq);

    // The spawn chunk stays open.
    if !coord.is_origin() {
        let count = MIN_OBSTACLES + rng.below(EXTRA_OBSTACLES);
        for _ in 0..count {
            let width = 1 + rng.below(MAX_OBSTACLE_EXTENT);
            let depth = 1 + rng.below(MAX_OBSTACLE_EXTENT);
            let height = 1.0 + rng.next_f32() * 3.0;
            let min_x = grid_slot(origin.x, chunk_size, width, rng.next_f32());
            let min_z = grid_slot(origin.y, chunk_size, depth, rng.next_f32());
            let footprint = Footprint {
                x: min_x + width as f32 / 2.0,
                z: min_z + depth as f32 / 2.0,
                width: width as f32,
                depth: depth as f32,
            };
            if near_portal(&footprint) {
                tracing::trace!(?footprint, "obstacle skipped near portal");
                continue;
            }
            chunk.spawn(ContentKind::Obstacle { footprint, height }, index, scene);
        }
    }

    let decorations = MIN_DECORATIONS + rng.below(EXTRA_DECORATIONS);
    for _ in 0..decorations {
        let position = origin
            + Vec2::new(
                0.5 + rng.next_f32() * (chunk_size - 1.0),
                0.5 + rng.next_f32() * (chunk_size - 1.0),
            );
        let rotation = rng.next_f32() * std::f32::consts::PI;
        let scale = 0.5 + rng.next_f32() * 0.5;
        chunk.spawn(
            ContentKind::Decoration {
                position,
                rotation,
                scale,
            },
            index,
            scene,
        );
    }

    if biome.peaceful || coord.is_origin() || !rng.chance(params.rescue_chance) {
        return;
    }
    let cell = Cell::containing(
        center.x + (rng.next_f32() - 0.5) * (chunk_size - 4.0),
        center.y + (rng.next_f32() - 0.5) * (chunk_size - 4.0),
    );
    let character = Rescuable::ALL[rng.below(Rescuable::ALL.len() as u32) as usize];
    let at = cell.center();
    let footprint = Footprint {
        x: at.x,
        z: at.y,
        width: 1.0,
        depth: 1.0,
    };
    if near_portal(&footprint) {
        return;
    }
    tracing::debug!(coord = %coord, ?character, "rescue cage spawned");
    chunk.spawn(
        ContentKind::Feature(Feature::Cage {
            footprint,
            character,
        }),
        index,
        scene,
    );
}

/// Integer minimum corner for a box of `extent` cells, kept one unit inside
/// the chunk edges. `t` in `[0, 1)` picks the slot.
fn grid_slot(origin: f32, chunk_size: f32, extent: u32, t: f32) -> f32 {
    let lo = (origin + 1.0).ceil();
    let hi = (origin + chunk_size - 1.0 - extent as f32).floor().max(lo);
    let slots = hi - lo + 1.0;
    lo + (t * slots).floor().min(hi - lo)
}
