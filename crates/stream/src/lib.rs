//! Streaming: keeps exactly the chunks inside a square window around the
//! reference position alive.
//!
//! # Invariants
//! - After `update`, the active chunk set equals the window set.
//! - The occupancy index holds exactly the obstacles of active chunks (plus
//!   whatever callers registered outside the chunk system).
//! - Creating an active chunk or disposing an absent one is a no-op.

mod coordinator;
mod store;
mod window;

pub use coordinator::{StreamDelta, StreamStats, StreamingCoordinator};
pub use store::ChunkStore;
pub use window::{MAX_RENDER_DISTANCE, StreamConfig, StreamConfigError, window_around};
