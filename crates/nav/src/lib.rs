//! Navigation: one shared steering field toward a single target, so many
//! agents can chase it without running their own searches.
//!
//! # Invariants
//! - Every stored flow vector has unit length.
//! - Search cost is bounded by the configured range, never by world size.
//! - A field records the occupancy revision it was built against; a
//!   mismatch means it is stale.

mod flow;
mod schedule;
mod steering;

pub use flow::{FlowConfig, FlowField, FlowFieldSolver, MAX_FLOW_RANGE};
pub use schedule::{FlowSchedule, FlowScheduleConfig, RebuildReason};
pub use steering::{slide, steer};
