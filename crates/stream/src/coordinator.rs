use std::time::{Duration, Instant};

use riftgrid_common::{ChunkCoord, WorldContext};
use riftgrid_occupancy::OccupancyIndex;
use riftgrid_procgen::{ChunkGenerator, SceneSink};

use crate::store::ChunkStore;
use crate::window::{MAX_RENDER_DISTANCE, StreamConfig, window_around};

/// Chunks created and disposed by one streaming update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamDelta {
    pub created: Vec<ChunkCoord>,
    pub disposed: Vec<ChunkCoord>,
}

impl StreamDelta {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.disposed.is_empty()
    }
}

/// Per-update streaming statistics for instrumentation.
#[derive(Debug, Clone, Default)]
pub struct StreamStats {
    pub chunks_created_this_update: usize,
    pub chunks_disposed_this_update: usize,
    pub active_chunks: usize,
    pub update_time: Duration,
}

/// Owns the chunk store and decides, each tick, which chunks are active.
pub struct StreamingCoordinator {
    config: StreamConfig,
    store: ChunkStore,
    reference: Option<ChunkCoord>,
    stats: StreamStats,
}

impl StreamingCoordinator {
    /// Create a coordinator. The generator's chunk size must match
    /// `config.chunk_size`.
    pub fn new(config: StreamConfig, generator: ChunkGenerator) -> Self {
        debug_assert_eq!(config.chunk_size, generator.chunk_size());
        Self {
            config,
            store: ChunkStore::new(generator),
            reference: None,
            stats: StreamStats::default(),
        }
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// Reference chunk of the last update, if any.
    pub fn reference(&self) -> Option<ChunkCoord> {
        self.reference
    }

    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    /// Recompute the window around the reference position and bring the
    /// active set in line with it.
    pub fn update(
        &mut self,
        reference_x: f32,
        reference_z: f32,
        ctx: &WorldContext,
        index: &mut OccupancyIndex,
        scene: &mut dyn SceneSink,
    ) -> StreamDelta {
        let _span = tracing::info_span!("stream_update").entered();
        let start = Instant::now();

        let center = self.config.chunk_at(reference_x, reference_z);
        let radius = self.config.render_distance.clamp(0, MAX_RENDER_DISTANCE);
        let window = window_around(center, radius);

        let stale: Vec<ChunkCoord> = self
            .store
            .coords()
            .filter(|c| !window.contains(c))
            .collect();

        let mut delta = StreamDelta::default();
        for coord in stale {
            if self.store.dispose(coord, index, scene) {
                tracing::debug!(%coord, "chunk left window");
                delta.disposed.push(coord);
            }
        }
        for coord in window {
            if self.store.create(coord, ctx, index, scene) {
                tracing::debug!(%coord, "chunk entered window");
                delta.created.push(coord);
            }
        }

        self.reference = Some(center);
        self.stats = StreamStats {
            chunks_created_this_update: delta.created.len(),
            chunks_disposed_this_update: delta.disposed.len(),
            active_chunks: self.store.len(),
            update_time: start.elapsed(),
        };

        tracing::trace!(
            created = delta.created.len(),
            disposed = delta.disposed.len(),
            active = self.store.len(),
            "stream update complete"
        );
        delta
    }

    /// Dispose every chunk and empty the occupancy index unconditionally.
    pub fn clear(&mut self, index: &mut OccupancyIndex, scene: &mut dyn SceneSink) -> usize {
        let disposed = self.store.dispose_all(index, scene);
        index.clear();
        self.reference = None;
        self.stats = StreamStats::default();
        tracing::info!(disposed, "streaming cleared");
        disposed
    }

    pub fn is_active(&self, coord: ChunkCoord) -> bool {
        self.store.is_active(coord)
    }

    pub fn active_len(&self) -> usize {
        self.store.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riftgrid_common::Cell;
    use riftgrid_procgen::TrackingScene;
    use std::collections::{BTreeSet, HashSet};

    fn coordinator(render_distance: i32) -> StreamingCoordinator {
        let config = StreamConfig {
            chunk_size: 20.0,
            render_distance,
        };
        StreamingCoordinator::new(config, ChunkGenerator::new(20.0))
    }

    fn union_of_active_cells(coordinator: &StreamingCoordinator) -> HashSet<Cell> {
        coordinator
            .store()
            .chunks()
            .flat_map(|c| c.footprints().iter().flat_map(|f| f.cells()))
            .collect()
    }

    #[test]
    fn origin_window_has_25_chunks() {
        let mut streaming = coordinator(2);
        let mut index = OccupancyIndex::new();
        let ctx = WorldContext::wilderness("rift_wastes");
        let delta = streaming.update(0.0, 0.0, &ctx, &mut index, &mut TrackingScene::new());

        assert_eq!(delta.created.len(), 25);
        assert!(delta.disposed.is_empty());
        let active: BTreeSet<ChunkCoord> = streaming.store().coords().collect();
        let expected: BTreeSet<ChunkCoord> = (-2..=2)
            .flat_map(|x| (-2..=2).map(move |z| ChunkCoord::new(x, z)))
            .collect();
        assert_eq!(active, expected);
    }

    #[test]
    fn repeated_update_is_idempotent() {
        let mut streaming = coordinator(2);
        let mut index = OccupancyIndex::new();
        let mut scene = TrackingScene::new();
        let ctx = WorldContext::wilderness("rift_wastes");
        streaming.update(33.0, -71.0, &ctx, &mut index, &mut scene);
        let revision = index.revision();

        let second = streaming.update(33.0, -71.0, &ctx, &mut index, &mut scene);
        assert!(second.is_empty());
        assert_eq!(index.revision(), revision);
        assert_eq!(streaming.stats().chunks_created_this_update, 0);
    }

    #[test]
    fn moving_reference_shifts_window() {
        let mut streaming = coordinator(1);
        let mut index = OccupancyIndex::new();
        let mut scene = TrackingScene::new();
        let ctx = WorldContext::wilderness("rift_wastes");
        streaming.update(0.0, 0.0, &ctx, &mut index, &mut scene);

        let delta = streaming.update(20.0, 0.0, &ctx, &mut index, &mut scene);
        assert_eq!(delta.created.len(), 3);
        assert_eq!(delta.disposed.len(), 3);
        assert!(delta.disposed.iter().all(|c| c.x == -1));
        assert!(delta.created.iter().all(|c| c.x == 2));
        assert_eq!(streaming.reference(), Some(ChunkCoord::new(1, 0)));
    }

    #[test]
    fn index_matches_union_of_active_chunks() {
        let mut streaming = coordinator(2);
        let mut index = OccupancyIndex::new();
        let mut scene = TrackingScene::new();
        let ctx = WorldContext::dungeon("void_cathedral");
        for (x, z) in [(0.0, 0.0), (45.0, 10.0), (90.0, 90.0), (-200.0, 15.0), (0.0, 0.0)] {
            streaming.update(x, z, &ctx, &mut index, &mut scene);
            let indexed: HashSet<Cell> = index.blocked_cells().collect();
            assert_eq!(indexed, union_of_active_cells(&streaming));
        }
    }

    #[test]
    fn far_jump_replaces_every_chunk() {
        let mut streaming = coordinator(2);
        let mut index = OccupancyIndex::new();
        let mut scene = TrackingScene::new();
        let ctx = WorldContext::wilderness("rift_wastes");
        streaming.update(0.0, 0.0, &ctx, &mut index, &mut scene);
        let delta = streaming.update(10_000.0, 10_000.0, &ctx, &mut index, &mut scene);
        assert_eq!(delta.created.len(), 25);
        assert_eq!(delta.disposed.len(), 25);
        assert_eq!(streaming.active_len(), 25);
    }

    #[test]
    fn clear_disposes_all_and_empties_index() {
        let mut streaming = coordinator(1);
        let mut index = OccupancyIndex::new();
        let mut scene = TrackingScene::new();
        let ctx = WorldContext::wilderness("rift_wastes");
        streaming.update(50.0, 50.0, &ctx, &mut index, &mut scene);
        // An obstacle registered outside the chunk system is cleared too.
        index.register(&riftgrid_common::Footprint::new(0.5, 0.5, 1.0, 1.0).unwrap());

        assert_eq!(streaming.clear(&mut index, &mut scene), 9);
        assert!(index.is_empty());
        assert_eq!(scene.live(), 0);
        assert_eq!(streaming.reference(), None);
    }
}
