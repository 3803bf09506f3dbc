use std::collections::BTreeMap;

use glam::Vec2;
use riftgrid_common::{BiomeId, Cell, ChunkCoord, Footprint, FootprintError, WorldContext};
use riftgrid_nav::{FlowField, FlowFieldSolver, FlowSchedule, RebuildReason};
use riftgrid_occupancy::{CollisionQuery, OccupancyIndex};
use riftgrid_procgen::{ChunkGenerator, NullScene, SceneSink};
use riftgrid_stream::{StreamDelta, StreamingCoordinator};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, WorldConfig};
use crate::placement::{Placement, PlacementId, PlacementKind};

/// A record of every observable change to the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// A chunk entered the active window and registered `obstacles` footprints.
    ChunkCreated { coord: ChunkCoord, obstacles: usize },
    ChunkDisposed { coord: ChunkCoord },
    /// An obstacle was registered outside the chunk system.
    ObstacleRegistered { footprint: Footprint },
    ObstacleUnregistered { footprint: Footprint },
    FlowRebuilt { target: Vec2, reached: usize },
    ContextChanged { biome: BiomeId, dungeon: bool },
    Cleared,
    Stepped { tick: u64 },
}

/// What one [`World::step`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub tick: u64,
    pub delta: StreamDelta,
    pub rebuild: Option<RebuildReason>,
}

/// The simulation context.
///
/// Owns the occupancy index, the streamed chunks and the shared flow field.
/// Nothing in the crate reaches this state through globals; callers borrow
/// the world for queries and drive it through [`step`](Self::step).
///
/// Phase order inside a step is fixed: streaming (may mutate the index),
/// then flow rebuild (reads the index), then the caller's agent queries.
///
/// The event log is append-only and every step adds at least one entry.
/// Callers that run indefinitely must take it with
/// [`drain_events`](Self::drain_events) once per frame, as the CLI does.
pub struct World {
    config: WorldConfig,
    ctx: WorldContext,
    index: OccupancyIndex,
    streaming: StreamingCoordinator,
    solver: FlowFieldSolver,
    field: Option<FlowField>,
    target: Option<Vec2>,
    schedule: FlowSchedule,
    scene: Box<dyn SceneSink>,
    placements: BTreeMap<PlacementId, Placement>,
    next_placement: u64,
    tick: u64,
    /// Append-only event log.
    event_log: Vec<WorldEvent>,
}

impl World {
    /// Build a headless world from a validated config.
    pub fn new(config: WorldConfig, ctx: WorldContext) -> Result<Self, ConfigError> {
        Self::with_scene(config, ctx, Box::new(NullScene))
    }

    /// Build a world whose chunk content is handed to `scene`.
    pub fn with_scene(
        config: WorldConfig,
        ctx: WorldContext,
        scene: Box<dyn SceneSink>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let generator = ChunkGenerator::new(config.stream.chunk_size)
            .with_params(config.generation)
            .with_biomes(config.biome_registry());
        Self::from_parts(config, ctx, generator, scene)
    }

    /// Build a world around a caller-configured generator, e.g. one with a
    /// custom texture loader. The generator's chunk size must match the config.
    pub fn from_parts(
        config: WorldConfig,
        ctx: WorldContext,
        generator: ChunkGenerator,
        scene: Box<dyn SceneSink>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if generator.chunk_size() != config.stream.chunk_size {
            return Err(ConfigError::Invalid(format!(
                "generator chunk size {} does not match stream.chunk_size {}",
                generator.chunk_size(),
                config.stream.chunk_size
            )));
        }
        tracing::info!(
            biome = %ctx.biome,
            dungeon = ctx.dungeon,
            chunk_size = config.stream.chunk_size,
            render_distance = config.stream.render_distance,
            "world created"
        );
        Ok(Self {
            streaming: StreamingCoordinator::new(config.stream, generator),
            solver: FlowFieldSolver::new(config.flow),
            schedule: FlowSchedule::new(config.schedule),
            config,
            ctx,
            index: OccupancyIndex::new(),
            field: None,
            target: None,
            scene,
            placements: BTreeMap::new(),
            next_placement: 0,
            tick: 0,
            event_log: Vec::new(),
        })
    }

    /// Validated configuration the world was built with.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Active biome or dungeon context.
    pub fn context(&self) -> &WorldContext {
        &self.ctx
    }

    /// Occupancy of every registered obstacle, streamed or placed.
    pub fn index(&self) -> &OccupancyIndex {
        &self.index
    }

    /// Chunk streaming state, including the active chunk store.
    pub fn streaming(&self) -> &StreamingCoordinator {
        &self.streaming
    }

    /// Current flow field, if one has been built.
    pub fn flow_field(&self) -> Option<&FlowField> {
        self.field.as_ref()
    }

    /// Position the flow field steers toward.
    pub fn target(&self) -> Option<Vec2> {
        self.target
    }

    /// Number of completed steps.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Live placements keyed by id.
    pub fn placements(&self) -> &BTreeMap<PlacementId, Placement> {
        &self.placements
    }

    /// Events recorded since the last [`drain_events`](Self::drain_events).
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Take the event log, leaving it empty.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    // -- Streaming --

    /// Advance streaming around a reference position.
    pub fn update(&mut self, reference_x: f32, reference_z: f32) -> StreamDelta {
        let delta = self.streaming.update(
            reference_x,
            reference_z,
            &self.ctx,
            &mut self.index,
            self.scene.as_mut(),
        );
        for &coord in &delta.disposed {
            self.event_log.push(WorldEvent::ChunkDisposed { coord });
        }
        for &coord in &delta.created {
            let obstacles = self
                .streaming
                .store()
                .get(coord)
                .map_or(0, |chunk| chunk.footprints().len());
            self.event_log
                .push(WorldEvent::ChunkCreated { coord, obstacles });
        }
        delta
    }

    /// Tear down every chunk, placement and obstacle, and drop the flow field.
    pub fn clear(&mut self) {
        let disposed = self.streaming.clear(&mut self.index, self.scene.as_mut());
        let placements = self.placements.len();
        self.placements.clear();
        self.field = None;
        self.schedule.invalidate();
        tracing::info!(disposed, placements, "world cleared");
        self.event_log.push(WorldEvent::Cleared);
    }

    /// Transition to a new biome or dungeon node: clear, then swap context.
    /// Chunks regenerate under the new context on the next update.
    pub fn set_context(&mut self, ctx: WorldContext) {
        self.clear();
        tracing::info!(biome = %ctx.biome, dungeon = ctx.dungeon, "world context changed");
        self.event_log.push(WorldEvent::ContextChanged {
            biome: ctx.biome.clone(),
            dungeon: ctx.dungeon,
        });
        self.ctx = ctx;
    }

    // -- Obstacles --

    /// Point/circle obstruction query.
    pub fn check_collision(&self, x: f32, z: f32, radius: f32) -> bool {
        self.index.check_collision(x, z, radius)
    }

    /// Block the cells under a rectangle centered on (x, z).
    ///
    /// A non-finite or non-positive footprint is a programming error: it
    /// panics in debug builds and is ignored with a warning otherwise.
    pub fn register_obstacle(&mut self, x: f32, z: f32, width: f32, depth: f32) {
        match Footprint::new(x, z, width, depth) {
            Ok(footprint) => self.register_footprint(footprint),
            Err(err) => reject_footprint("register", err),
        }
    }

    /// Release the cells of a rectangle previously passed to
    /// [`register_obstacle`](Self::register_obstacle).
    pub fn unregister_obstacle(&mut self, x: f32, z: f32, width: f32, depth: f32) {
        match Footprint::new(x, z, width, depth) {
            Ok(footprint) => self.unregister_footprint(footprint),
            Err(err) => reject_footprint("unregister", err),
        }
    }

    pub fn register_footprint(&mut self, footprint: Footprint) {
        self.index.register(&footprint);
        self.event_log
            .push(WorldEvent::ObstacleRegistered { footprint });
    }

    pub fn unregister_footprint(&mut self, footprint: Footprint) {
        self.index.unregister(&footprint);
        self.event_log
            .push(WorldEvent::ObstacleUnregistered { footprint });
    }

    /// Place a structure or gate. Its footprint stays registered across
    /// streaming updates until removed or the world is cleared.
    pub fn place(&mut self, kind: PlacementKind, x: f32, z: f32) -> Result<PlacementId, FootprintError> {
        let footprint = kind.footprint_at(x, z)?;
        let id = PlacementId(self.next_placement);
        self.next_placement += 1;
        self.register_footprint(footprint);
        self.placements.insert(id, Placement { kind, footprint });
        tracing::debug!(?id, ?kind, x = footprint.x, z = footprint.z, "placed");
        Ok(id)
    }

    /// Remove a placement and release its cells. Returns whether it existed.
    pub fn remove_placement(&mut self, id: PlacementId) -> bool {
        match self.placements.remove(&id) {
            Some(placement) => {
                self.unregister_footprint(placement.footprint);
                true
            }
            None => false,
        }
    }

    // -- Flow --

    /// Point the flow field at a new target and rebuild it now.
    pub fn update_flow_field(&mut self, target_x: f32, target_z: f32) -> &FlowField {
        self.target = Some(Vec2::new(target_x, target_z));
        self.rebuild_flow()
    }

    /// Change the target without forcing a rebuild; the schedule decides
    /// when the field catches up.
    pub fn set_target(&mut self, target_x: f32, target_z: f32) {
        self.target = Some(Vec2::new(target_x, target_z));
    }

    /// Steering direction toward the target at (x, z).
    ///
    /// `None` when there is no field, the point is out of range or cut off,
    /// or obstacles changed since the field was built. Callers fall back to
    /// direct steering.
    pub fn flow_vector(&self, x: f32, z: f32) -> Option<Vec2> {
        let field = self.field.as_ref()?;
        if field.revision() != self.index.revision() {
            tracing::trace!("flow field stale, no guidance");
            return None;
        }
        field.sample(x, z)
    }

    /// Run one tick with the reference position as the flow target.
    pub fn step(&mut self, dt: f32, player_x: f32, player_z: f32) -> StepReport {
        let player = Vec2::new(player_x, player_z);
        self.step_toward(dt, player, player)
    }

    /// Run one tick: stream around `reference`, then rebuild the flow field
    /// toward `target` if the schedule asks for it.
    pub fn step_toward(&mut self, dt: f32, reference: Vec2, target: Vec2) -> StepReport {
        let _span = tracing::debug_span!("world_step", tick = self.tick + 1).entered();

        let delta = self.update(reference.x, reference.y);

        self.target = Some(target);
        self.schedule.advance(dt);
        let rebuild = self
            .schedule
            .check(self.field.as_ref(), target, self.index.revision());
        if let Some(reason) = rebuild {
            tracing::debug!(?reason, "flow rebuild scheduled");
            self.rebuild_flow();
        }

        self.tick += 1;
        self.event_log.push(WorldEvent::Stepped { tick: self.tick });
        StepReport {
            tick: self.tick,
            delta,
            rebuild,
        }
    }

    fn rebuild_flow(&mut self) -> &FlowField {
        let target = self.target.unwrap_or(Vec2::ZERO);
        let field = self.solver.solve(target, &self.index);
        self.schedule.mark_rebuilt();
        self.event_log.push(WorldEvent::FlowRebuilt {
            target,
            reached: field.reached(),
        });
        self.field.insert(field)
    }
}

impl CollisionQuery for World {
    fn is_blocked(&self, cell: Cell) -> bool {
        self.index.is_blocked(cell)
    }

    fn check_collision(&self, x: f32, z: f32, radius: f32) -> bool {
        self.index.check_collision(x, z, radius)
    }
}

fn reject_footprint(op: &str, err: FootprintError) {
    if cfg!(debug_assertions) {
        panic!("invalid obstacle footprint passed to {op}: {err}");
    }
    tracing::warn!(op, %err, "ignoring invalid obstacle footprint");
}
