use std::collections::BTreeMap;

use riftgrid_common::{ChunkCoord, WorldContext};
use riftgrid_occupancy::OccupancyIndex;
use riftgrid_procgen::{Chunk, ChunkGenerator, SceneSink};

/// Active chunks keyed by coordinate.
///
/// BTreeMap keeps iteration (and therefore disposal and logging) order
/// deterministic.
pub struct ChunkStore {
    generator: ChunkGenerator,
    chunks: BTreeMap<ChunkCoord, Chunk>,
}

impl ChunkStore {
    pub fn new(generator: ChunkGenerator) -> Self {
        Self {
            generator,
            chunks: BTreeMap::new(),
        }
    }

    pub fn generator(&self) -> &ChunkGenerator {
        &self.generator
    }

    /// Generate the chunk at `coord` unless it is already active.
    /// Returns whether a chunk was created.
    pub fn create(
        &mut self,
        coord: ChunkCoord,
        ctx: &WorldContext,
        index: &mut OccupancyIndex,
        scene: &mut dyn SceneSink,
    ) -> bool {
        if self.chunks.contains_key(&coord) {
            return false;
        }
        let chunk = self.generator.generate(coord, ctx, index, scene);
        self.chunks.insert(coord, chunk);
        true
    }

    /// Dispose the chunk at `coord` if it is active. Returns whether a chunk
    /// was disposed.
    pub fn dispose(
        &mut self,
        coord: ChunkCoord,
        index: &mut OccupancyIndex,
        scene: &mut dyn SceneSink,
    ) -> bool {
        match self.chunks.remove(&coord) {
            Some(chunk) => {
                chunk.dispose(index, scene);
                true
            }
            None => false,
        }
    }

    /// Dispose every active chunk. Returns how many were disposed.
    pub fn dispose_all(&mut self, index: &mut OccupancyIndex, scene: &mut dyn SceneSink) -> usize {
        let chunks = std::mem::take(&mut self.chunks);
        let count = chunks.len();
        for chunk in chunks.into_values() {
            chunk.dispose(index, scene);
        }
        count
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn is_active(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riftgrid_procgen::TrackingScene;

    fn store() -> ChunkStore {
        ChunkStore::new(ChunkGenerator::new(20.0))
    }

    #[test]
    fn create_is_idempotent() {
        let mut store = store();
        let mut index = OccupancyIndex::new();
        let mut scene = TrackingScene::new();
        let ctx = WorldContext::wilderness("rift_wastes");
        let coord = ChunkCoord::new(2, 2);

        assert!(store.create(coord, &ctx, &mut index, &mut scene));
        let blocked = index.len();
        let live = scene.live();
        assert!(!store.create(coord, &ctx, &mut index, &mut scene));
        assert_eq!(index.len(), blocked);
        assert_eq!(scene.live(), live);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn dispose_absent_is_noop() {
        let mut store = store();
        let mut index = OccupancyIndex::new();
        assert!(!store.dispose(ChunkCoord::new(9, 9), &mut index, &mut TrackingScene::new()));
    }

    #[test]
    fn dispose_all_releases_everything() {
        let mut store = store();
        let mut index = OccupancyIndex::new();
        let mut scene = TrackingScene::new();
        let ctx = WorldContext::dungeon("void_cathedral");
        for x in 1..4 {
            store.create(ChunkCoord::new(x, 0), &ctx, &mut index, &mut scene);
        }
        assert_eq!(store.dispose_all(&mut index, &mut scene), 3);
        assert!(store.is_empty());
        assert!(index.is_empty());
        assert_eq!(scene.live(), 0);
    }
}
