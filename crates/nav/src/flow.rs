use glam::Vec2;
use riftgrid_common::Cell;
use riftgrid_occupancy::{CollisionQuery, OccupancyIndex};
use serde::{Deserialize, Serialize};

const CARDINAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Blended magnitudes below this mean "no guidance".
const MIN_BLEND: f32 = 1e-3;

/// Largest accepted search radius. Keeps the dense window allocation bounded.
pub const MAX_FLOW_RANGE: i32 = 1024;

/// Flow field search parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Chebyshev radius (in cells) around the target that gets populated.
    /// Clamped to `1..=MAX_FLOW_RANGE` when solving.
    pub range: i32,
    /// Allow diagonal steps that squeeze between two blocked corners.
    pub corner_cutting: bool,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            range: 40,
            corner_cutting: false,
        }
    }
}

/// Builds flow fields from the occupancy index.
#[derive(Debug, Clone, Default)]
pub struct FlowFieldSolver {
    config: FlowConfig,
}

impl FlowFieldSolver {
    pub fn new(config: FlowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Breadth-first propagation outward from the target's cell.
    ///
    /// Each layer first claims cardinal neighbors of every frontier cell, then
    /// diagonal ones, so a cell prefers a straight parent when one exists in
    /// the previous layer. Claimed cells store the unit vector pointing back
    /// at their parent.
    pub fn solve(&self, target: Vec2, index: &OccupancyIndex) -> FlowField {
        let _span = tracing::info_span!("flow_rebuild", range = self.config.range).entered();
        let range = self.config.range.clamp(1, MAX_FLOW_RANGE);
        let mut field = FlowField::empty(target, range, index.revision());
        let origin = field.target_cell;

        if let Some(i) = field.slot(origin) {
            field.visited[i] = true;
        }
        let mut frontier = vec![origin];
        let mut next = Vec::new();

        while !frontier.is_empty() {
            for (offsets, diagonal) in [(&CARDINAL, false), (&DIAGONAL, true)] {
                for &cell in &frontier {
                    for &(dx, dz) in offsets {
                        let neighbor = cell.offset(dx, dz);
                        let Some(i) = field.slot(neighbor) else {
                            continue;
                        };
                        if field.visited[i] || index.is_blocked(neighbor) {
                            continue;
                        }
                        if diagonal
                            && !self.config.corner_cutting
                            && (index.is_blocked(cell.offset(dx, 0))
                                || index.is_blocked(cell.offset(0, dz)))
                        {
                            continue;
                        }
                        field.visited[i] = true;
                        field.vectors[i] = Some(Vec2::new(-dx as f32, -dz as f32).normalize());
                        field.reached += 1;
                        next.push(neighbor);
                    }
                }
            }
            frontier.clear();
            std::mem::swap(&mut frontier, &mut next);
        }

        tracing::debug!(
            target = ?origin,
            reached = field.reached,
            revision = field.revision,
            "flow field rebuilt"
        );
        field
    }
}

/// Per-cell unit steering vectors toward one target, within a square window.
#[derive(Debug, Clone)]
pub struct FlowField {
    target: Vec2,
    target_cell: Cell,
    range: i32,
    side: usize,
    vectors: Vec<Option<Vec2>>,
    visited: Vec<bool>,
    reached: usize,
    revision: u64,
}

impl FlowField {
    fn empty(target: Vec2, range: i32, revision: u64) -> Self {
        debug_assert!((1..=MAX_FLOW_RANGE).contains(&range));
        let side = 2 * range as usize + 1;
        Self {
            target,
            target_cell: Cell::containing(target.x, target.y),
            range,
            side,
            vectors: vec![None; side * side],
            visited: vec![false; side * side],
            reached: 0,
            revision,
        }
    }

    /// Storage slot for a cell, `None` outside the range window.
    fn slot(&self, cell: Cell) -> Option<usize> {
        let dx = cell.x - self.target_cell.x;
        let dz = cell.z - self.target_cell.z;
        if dx.abs() > self.range || dz.abs() > self.range {
            return None;
        }
        let col = (dx + self.range) as usize;
        let row = (dz + self.range) as usize;
        Some(row * self.side + col)
    }

    /// World position the field steers toward.
    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn target_cell(&self) -> Cell {
        self.target_cell
    }

    pub fn range(&self) -> i32 {
        self.range
    }

    /// Number of cells holding a vector.
    pub fn reached(&self) -> usize {
        self.reached
    }

    /// Occupancy revision the field was built against.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Stored vector of a single cell.
    pub fn vector_at(&self, cell: Cell) -> Option<Vec2> {
        self.slot(cell).and_then(|i| self.vectors[i])
    }

    /// Every populated cell and its vector.
    pub fn cells(&self) -> impl Iterator<Item = (Cell, Vec2)> + '_ {
        let side = self.side as i32;
        self.vectors.iter().enumerate().filter_map(move |(i, v)| {
            let v = (*v)?;
            let i = i as i32;
            let cell = Cell::new(
                self.target_cell.x + i % side - self.range,
                self.target_cell.z + i / side - self.range,
            );
            Some((cell, v))
        })
    }

    /// Smooth steering direction at a world position.
    ///
    /// Bilinearly blends the four surrounding cell-center vectors (absent
    /// cells count as zero) and renormalizes. `None` when the blend is
    /// negligible: the caller should steer directly instead.
    pub fn sample(&self, x: f32, z: f32) -> Option<Vec2> {
        let sx = x - 0.5;
        let sz = z - 0.5;
        let x0 = sx.floor();
        let z0 = sz.floor();
        let fx = sx - x0;
        let fz = sz - z0;
        let base = Cell::new(x0 as i32, z0 as i32);
        let at = |dx, dz| self.vector_at(base.offset(dx, dz)).unwrap_or(Vec2::ZERO);

        let blended = at(0, 0) * (1.0 - fx) * (1.0 - fz)
            + at(1, 0) * fx * (1.0 - fz)
            + at(0, 1) * (1.0 - fx) * fz
            + at(1, 1) * fx * fz;

        if blended.length_squared() < MIN_BLEND * MIN_BLEND {
            return None;
        }
        Some(blended.normalize())
    }
}
