use riftgrid_common::{ChunkCoord, ContentId, Footprint};
use riftgrid_occupancy::OccupancyIndex;

use crate::content::{ContentHandle, ContentKind, SceneSink};

/// A streamed square of the world and everything spawned into it.
///
/// The chunk exclusively owns its content handles. It only references index
/// cells, through the footprints it registered.
#[derive(Debug)]
pub struct Chunk {
    coord: ChunkCoord,
    content: Vec<ContentHandle>,
    footprints: Vec<Footprint>,
}

impl Chunk {
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            content: Vec::new(),
            footprints: Vec::new(),
        }
    }

    /// Grid position of this chunk.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Scene handles spawned for this chunk, released on disposal.
    pub fn content(&self) -> &[ContentHandle] {
        &self.content
    }

    /// Footprints registered by this chunk, in registration order.
    pub fn footprints(&self) -> &[Footprint] {
        &self.footprints
    }

    /// Spawn one piece of content: register its footprint (if any), hand it
    /// to the scene and keep the handle.
    pub fn spawn(
        &mut self,
        kind: ContentKind,
        index: &mut OccupancyIndex,
        scene: &mut dyn SceneSink,
    ) -> ContentId {
        if let Some(footprint) = kind.footprint() {
            index.register(&footprint);
            self.footprints.push(footprint);
        }
        let handle = ContentHandle {
            id: ContentId::new(),
            kind,
        };
        scene.attach(&handle);
        let id = handle.id;
        self.content.push(handle);
        id
    }

    /// Release everything this chunk spawned. Consumes the chunk, so a chunk
    /// can only be disposed once.
    pub fn dispose(self, index: &mut OccupancyIndex, scene: &mut dyn SceneSink) {
        for footprint in &self.footprints {
            index.unregister(footprint);
        }
        for handle in &self.content {
            scene.detach(handle);
        }
        tracing::debug!(
            coord = %self.coord,
            content = self.content.len(),
            obstacles = self.footprints.len(),
            "chunk disposed"
        );
    }
}
