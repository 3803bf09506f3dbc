use glam::Vec2;
use riftgrid_common::{BiomeId, Cell, ChunkCoord};
use riftgrid_kernel::World;
use riftgrid_occupancy::CollisionQuery;

/// World inspector for developer tooling.
///
/// Read-only queries and text dumps for debugging streaming, occupancy and
/// the flow field.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &World) -> WorldSummary {
        let ctx = world.context();
        WorldSummary {
            tick: world.tick(),
            biome: ctx.biome.clone(),
            dungeon: ctx.dungeon,
            reference: world.streaming().reference(),
            active_chunks: world.streaming().active_len(),
            blocked_cells: world.index().len(),
            index_revision: world.index().revision(),
            flow_target: world.flow_field().map(|f| f.target()),
            flow_reached: world.flow_field().map(|f| f.reached()),
            placements: world.placements().len(),
            pending_events: world.events().len(),
        }
    }

    /// Square map of blocked (`#`) and free (`.`) cells around `center`.
    ///
    /// Rows run from low z to high z, columns from low x to high x.
    pub fn render_occupancy(world: &World, center: Cell, half_extent: i32) -> String {
        render(center, half_extent, |cell| {
            if world.is_blocked(cell) { '#' } else { '.' }
        })
    }

    /// Square map of the stored flow directions around `center`.
    ///
    /// `#` blocked, `T` target cell, an arrow per stored vector, blank where
    /// the field has no vector.
    pub fn render_flow(world: &World, center: Cell, half_extent: i32) -> String {
        let field = world.flow_field();
        render(center, half_extent, |cell| {
            if world.is_blocked(cell) {
                return '#';
            }
            let Some(field) = field else {
                return ' ';
            };
            if cell == field.target_cell() {
                return 'T';
            }
            field.vector_at(cell).map_or(' ', arrow)
        })
    }
}

fn render(center: Cell, half_extent: i32, glyph: impl Fn(Cell) -> char) -> String {
    let half = half_extent.max(0);
    let side = (2 * half + 1) as usize;
    let mut out = String::with_capacity(side * (side + 1));
    for z in center.z - half..=center.z + half {
        for x in center.x - half..=center.x + half {
            out.push(glyph(Cell::new(x, z)));
        }
        out.push('\n');
    }
    out
}

/// Eight-way glyph for a unit vector, with z growing downward.
fn arrow(v: Vec2) -> char {
    match (v.x.round() as i32, v.y.round() as i32) {
        (1, 0) => '>',
        (-1, 0) => '<',
        (0, 1) => 'v',
        (0, -1) => '^',
        (1, 1) | (-1, -1) => '\\',
        (1, -1) | (-1, 1) => '/',
        _ => '?',
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone)]
pub struct WorldSummary {
    pub tick: u64,
    pub biome: BiomeId,
    pub dungeon: bool,
    pub reference: Option<ChunkCoord>,
    pub active_chunks: usize,
    pub blocked_cells: usize,
    pub index_revision: u64,
    pub flow_target: Option<Vec2>,
    pub flow_reached: Option<usize>,
    pub placements: usize,
    pub pending_events: usize,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: tick={} biome={} dungeon={} chunks={} blocked={} rev={}",
            self.tick,
            self.biome,
            self.dungeon,
            self.active_chunks,
            self.blocked_cells,
            self.index_revision
        )?;
        if let Some(reference) = self.reference {
            write!(f, " ref={reference}")?;
        }
        match (self.flow_target, self.flow_reached) {
            (Some(t), Some(reached)) => write!(f, " flow=({:.1}, {:.1})/{reached}", t.x, t.y)?,
            _ => f.write_str(" flow=none")?,
        }
        write!(
            f,
            " placements={} pending_events={}",
            self.placements, self.pending_events
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riftgrid_common::WorldContext;
    use riftgrid_kernel::{PlacementKind, StructureKind, WorldConfig};

    fn world() -> World {
        World::new(WorldConfig::default(), WorldContext::default()).unwrap()
    }

    #[test]
    fn summary_empty_world() {
        let w = world();
        let summary = WorldInspector::summary(&w);
        assert_eq!(summary.tick, 0);
        assert_eq!(summary.active_chunks, 0);
        assert_eq!(summary.flow_reached, None);
        assert!(format!("{summary}").contains("flow=none"));
    }

    #[test]
    fn summary_line_layout() {
        let summary = WorldSummary {
            tick: 7,
            biome: BiomeId::from("ashlands"),
            dungeon: false,
            reference: Some(ChunkCoord::new(-1, 2)),
            active_chunks: 9,
            blocked_cells: 12,
            index_revision: 3,
            flow_target: Some(Vec2::new(1.3, -0.5)),
            flow_reached: Some(80),
            placements: 2,
            pending_events: 0,
        };
        assert_eq!(
            summary.to_string(),
            "World: tick=7 biome=ashlands dungeon=false chunks=9 blocked=12 rev=3 \
             ref=(-1, 2) flow=(1.3, -0.5)/80 placements=2 pending_events=0"
        );
    }

    #[test]
    fn summary_after_step() {
        let mut w = world();
        w.step(0.016, 0.0, 0.0);
        w.place(PlacementKind::RiftGate, 4.0, 4.0).unwrap();

        let summary = WorldInspector::summary(&w);
        assert_eq!(summary.tick, 1);
        assert_eq!(summary.active_chunks, 25);
        assert_eq!(summary.placements, 1);
        assert_eq!(summary.reference, Some(ChunkCoord::new(0, 0)));
        assert!(summary.flow_reached.unwrap() > 0);
        // 25 chunks + flow rebuild + step + placement
        assert_eq!(summary.pending_events, 28);
        let s = format!("{summary}");
        assert!(s.contains("tick=1"));
        assert!(s.contains("biome=rift_wastes"));
    }

    #[test]
    fn occupancy_map_marks_blocked_cells() {
        let mut w = world();
        w.place(PlacementKind::Structure(StructureKind::Wall), 1.5, 0.5)
            .unwrap();
        let map = WorldInspector::render_occupancy(&w, Cell::new(0, 0), 1);
        assert_eq!(map, "...\n..#\n...\n");
    }

    #[test]
    fn flow_map_shows_target_and_arrows() {
        let mut w = world();
        w.place(PlacementKind::Structure(StructureKind::Turret), -0.5, 0.5)
            .unwrap();
        w.update_flow_field(0.5, 0.5);
        let map = WorldInspector::render_flow(&w, Cell::new(0, 0), 1);
        assert_eq!(map, ">v/\n#T<\n>^\\\n");
    }

    #[test]
    fn flow_map_without_field_is_blank_except_walls() {
        let w = world();
        let map = WorldInspector::render_flow(&w, Cell::new(5, 5), 0);
        assert_eq!(map, " \n");
    }
}
