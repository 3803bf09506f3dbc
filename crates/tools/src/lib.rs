//! Developer tooling: read-only inspection of a running world.
//!
//! # Invariants
//! - Tools never mutate the world they inspect.

pub mod inspector;

pub use inspector::{WorldInspector, WorldSummary};
