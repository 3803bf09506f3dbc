//! Occupancy: the authoritative set of blocked unit cells.
//!
//! # Invariants
//! - `register(f)` followed by `unregister(f)` leaves the index unchanged.
//! - Overlapping footprints are reference counted; removing one never
//!   clears a cell another footprint still covers.
//! - `revision` changes whenever the blocked cell set changes.

mod index;

pub use index::{CollisionQuery, OccupancyIndex};
