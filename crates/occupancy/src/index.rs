use std::collections::HashMap;

use glam::Vec2;
use riftgrid_common::{Cell, CellKey, Footprint};

/// Read-only obstruction queries shared by the index and anything wrapping it.
pub trait CollisionQuery {
    /// Whether a single cell is blocked.
    fn is_blocked(&self, cell: Cell) -> bool;

    /// Whether any blocked cell intersects the disk of `radius` around (x, z).
    fn check_collision(&self, x: f32, z: f32, radius: f32) -> bool;
}

/// Sparse map of blocked cells with a per-cell reference count.
///
/// Every mutation goes through [`register`](Self::register) and
/// [`unregister`](Self::unregister), which share the rasterization in
/// [`Footprint::cells`].
#[derive(Debug, Clone, Default)]
pub struct OccupancyIndex {
    cells: HashMap<CellKey, u32>,
    revision: u64,
}

impl OccupancyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark every cell covered by the footprint as blocked.
    pub fn register(&mut self, footprint: &Footprint) {
        let mut newly_blocked = 0usize;
        for cell in footprint.cells() {
            let count = self.cells.entry(cell.key()).or_insert(0);
            if *count == 0 {
                newly_blocked += 1;
            }
            *count += 1;
        }
        if newly_blocked > 0 {
            self.revision += 1;
        }
        tracing::trace!(?footprint, newly_blocked, "register obstacle");
    }

    /// Release every cell covered by the footprint. Cells that were never
    /// registered are left alone.
    pub fn unregister(&mut self, footprint: &Footprint) {
        let mut freed = 0usize;
        let mut missing = 0usize;
        for cell in footprint.cells() {
            let key = cell.key();
            match self.cells.get_mut(&key) {
                Some(count) if *count > 1 => *count -= 1,
                Some(_) => {
                    self.cells.remove(&key);
                    freed += 1;
                }
                None => missing += 1,
            }
        }
        if freed > 0 {
            self.revision += 1;
        }
        if missing > 0 {
            tracing::debug!(?footprint, missing, "unregister touched cells that were not blocked");
        }
        tracing::trace!(?footprint, freed, "unregister obstacle");
    }

    /// Number of footprints currently covering `cell`.
    pub fn count(&self, cell: Cell) -> u32 {
        self.cells.get(&cell.key()).copied().unwrap_or(0)
    }

    /// Number of distinct blocked cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Counter bumped whenever the blocked set changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Drop every blocked cell unconditionally.
    pub fn clear(&mut self) {
        if !self.cells.is_empty() {
            self.cells.clear();
            self.revision += 1;
        }
    }

    /// Iterate over blocked cells in unspecified order.
    pub fn blocked_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.keys().map(|k| k.unpack())
    }
}

impl CollisionQuery for OccupancyIndex {
    fn is_blocked(&self, cell: Cell) -> bool {
        self.cells.contains_key(&cell.key())
    }

    fn check_collision(&self, x: f32, z: f32, radius: f32) -> bool {
        if self.cells.is_empty() {
            return false;
        }
        if radius <= 0.0 {
            return self.is_blocked(Cell::containing(x, z));
        }

        let p = Vec2::new(x, z);
        let r_sq = radius * radius;
        let min = Cell::containing(x - radius, z - radius);
        let max = Cell::containing(x + radius, z + radius);
        for cx in min.x..=max.x {
            for cz in min.z..=max.z {
                let cell = Cell::new(cx, cz);
                if !self.is_blocked(cell) {
                    continue;
                }
                let lo = Vec2::new(cx as f32, cz as f32);
                let closest = p.clamp(lo, lo + Vec2::ONE);
                if p.distance_squared(closest) < r_sq {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn fp(x: f32, z: f32, w: f32, d: f32) -> Footprint {
        Footprint::new(x, z, w, d).unwrap()
    }

    fn snapshot(index: &OccupancyIndex) -> HashSet<Cell> {
        index.blocked_cells().collect()
    }

    #[test]
    fn starts_empty() {
        let index = OccupancyIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.revision(), 0);
        assert!(!index.check_collision(0.0, 0.0, 5.0));
    }

    #[test]
    fn register_then_unregister_restores_previous_set() {
        let mut index = OccupancyIndex::new();
        index.register(&fp(-3.0, 4.0, 2.0, 1.0));
        let before = snapshot(&index);

        for rect in [
            fp(0.0, 0.0, 1.0, 1.0),
            fp(2.3, -7.9, 1.7, 2.2),
            fp(-3.0, 4.0, 2.0, 1.0),
            fp(100.5, 100.5, 3.0, 3.0),
        ] {
            index.register(&rect);
            index.unregister(&rect);
            assert_eq!(snapshot(&index), before, "asymmetric for {rect:?}");
        }
    }

    #[test]
    fn edge_on_integer_boundary_does_not_block_neighbor() {
        let mut index = OccupancyIndex::new();
        // Spans [10, 12) x [0, 1).
        index.register(&fp(11.0, 0.5, 2.0, 1.0));
        assert!(index.is_blocked(Cell::new(10, 0)));
        assert!(index.is_blocked(Cell::new(11, 0)));
        assert!(!index.is_blocked(Cell::new(12, 0)));
        assert!(!index.is_blocked(Cell::new(11, 1)));
        assert!(!index.is_blocked(Cell::new(9, 0)));
    }

    #[test]
    fn sliver_footprint_blocks_and_releases_its_cell() {
        let mut index = OccupancyIndex::new();
        let sliver = fp(1.02, 0.5, 0.04, 1.0);
        index.register(&sliver);
        assert!(index.is_blocked(Cell::new(1, 0)));
        assert!(!index.is_blocked(Cell::new(0, 0)));
        index.unregister(&sliver);
        assert!(index.is_empty());
    }

    #[test]
    fn overlapping_footprints_are_reference_counted() {
        let mut index = OccupancyIndex::new();
        let a = fp(0.0, 0.0, 2.0, 2.0);
        let b = fp(1.0, 0.0, 2.0, 2.0);
        index.register(&a);
        index.register(&b);
        assert_eq!(index.count(Cell::new(0, 0)), 2);

        index.unregister(&a);
        assert!(index.is_blocked(Cell::new(0, 0)), "shared cell must stay blocked");
        assert!(!index.is_blocked(Cell::new(-1, 0)));

        index.unregister(&b);
        assert!(index.is_empty());
    }

    #[test]
    fn unregister_of_unknown_footprint_is_noop() {
        let mut index = OccupancyIndex::new();
        index.register(&fp(5.5, 5.5, 1.0, 1.0));
        let rev = index.revision();
        index.unregister(&fp(-20.0, -20.0, 4.0, 4.0));
        assert_eq!(index.len(), 1);
        assert_eq!(index.revision(), rev);
    }

    #[test]
    fn revision_tracks_blocked_set_changes_only() {
        let mut index = OccupancyIndex::new();
        let a = fp(0.5, 0.5, 1.0, 1.0);
        index.register(&a);
        assert_eq!(index.revision(), 1);
        // Same cell again: count changes, blocked set does not.
        index.register(&a);
        assert_eq!(index.revision(), 1);
        index.unregister(&a);
        assert_eq!(index.revision(), 1);
        index.unregister(&a);
        assert_eq!(index.revision(), 2);
    }

    #[test]
    fn collision_scenario() {
        let mut index = OccupancyIndex::new();
        index.register(&fp(10.0, 10.0, 2.0, 2.0));
        assert!(index.check_collision(10.0, 10.0, 0.1));
        assert!(!index.check_collision(20.0, 20.0, 0.1));
    }

    #[test]
    fn circle_reaches_adjacent_blocked_cell() {
        let mut index = OccupancyIndex::new();
        index.register(&fp(5.5, 0.5, 1.0, 1.0)); // cell (5, 0) = [5, 6) x [0, 1)
        assert!(index.check_collision(4.8, 0.5, 0.3));
        assert!(!index.check_collision(4.5, 0.5, 0.3));
        assert!(!index.check_collision(4.0, 0.5, 0.3));
    }

    #[test]
    fn zero_radius_checks_containing_cell() {
        let mut index = OccupancyIndex::new();
        index.register(&fp(0.5, 0.5, 1.0, 1.0));
        assert!(index.check_collision(0.2, 0.9, 0.0));
        assert!(!index.check_collision(1.2, 0.9, 0.0));
    }

    #[test]
    fn clear_empties_and_bumps_revision() {
        let mut index = OccupancyIndex::new();
        index.register(&fp(0.0, 0.0, 4.0, 4.0));
        let rev = index.revision();
        index.clear();
        assert!(index.is_empty());
        assert!(index.revision() > rev);
    }
}
