//! Deterministic hashing and random streams for generation.

use riftgrid_common::{BiomeId, ChunkCoord};

/// Splitmix64 step: a fast, platform-independent mixing function.
pub fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// FNV-1a over a byte slice, continuing from `h`.
fn fnv1a(mut h: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        h ^= b as u64;
        h = h.wrapping_mul(0x0100_0000_01b3);
    }
    h
}

/// Seed for a chunk's random stream, keyed by coordinate, biome and world seed.
pub fn chunk_seed(coord: ChunkCoord, biome: &BiomeId, world_seed: u64) -> u64 {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    h = fnv1a(h, &coord.x.to_le_bytes());
    h = fnv1a(h, &coord.z.to_le_bytes());
    h = fnv1a(h, biome.as_str().as_bytes());
    h = fnv1a(h, &world_seed.to_le_bytes());
    splitmix64(h)
}

/// Sine-based hash in `[0, 1)` keyed by two grid coordinates.
///
/// Evaluated in `f64` so the same macro cell always produces the same value.
pub fn sine_hash(x: i32, z: i32) -> f64 {
    let t = (x as f64 * 12.9898 + z as f64 * 78.233).sin() * 43758.5453;
    t - t.floor()
}

/// A splitmix64-driven random stream.
#[derive(Debug, Clone)]
pub struct ChunkRng {
    state: u64,
}

impl ChunkRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = splitmix64(self.state);
        self.state
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        // 24 high bits fit an f32 mantissa exactly.
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Uniform integer in `[0, n)`. `n` must be non-zero.
    pub fn below(&mut self, n: u32) -> u32 {
        debug_assert!(n > 0);
        (self.next_u64() % n.max(1) as u64) as u32
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }
}
