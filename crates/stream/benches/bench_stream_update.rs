use std::hint::black_box;
use std::time::Instant;

use riftgrid_common::WorldContext;
use riftgrid_occupancy::OccupancyIndex;
use riftgrid_procgen::{ChunkGenerator, NullScene};
use riftgrid_stream::{StreamConfig, StreamingCoordinator};

fn bench_walk(ctx: &WorldContext, render_distance: i32, steps: usize, stride: f32) {
    let config = StreamConfig {
        chunk_size: 20.0,
        render_distance,
    };
    let mut streaming = StreamingCoordinator::new(config, ChunkGenerator::new(config.chunk_size));
    let mut index = OccupancyIndex::new();
    let mut scene = NullScene;

    let mut created = 0usize;
    let start = Instant::now();
    for i in 0..steps {
        // Walk east along z = 0.
        let x = i as f32 * stride;
        let delta = streaming.update(black_box(x), black_box(0.0), ctx, &mut index, &mut scene);
        created += delta.created.len();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / steps as u32;
    println!(
        "  walk ({}, r={render_distance}, stride={stride}, {steps} steps): {per_iter:?}/update, {created} chunks created, total {elapsed:?}",
        if ctx.dungeon { "dungeon" } else { "wilderness" }
    );
}

fn bench_idle(render_distance: i32, iterations: usize) {
    let config = StreamConfig {
        chunk_size: 20.0,
        render_distance,
    };
    let ctx = WorldContext::wilderness("rift_wastes");
    let mut streaming = StreamingCoordinator::new(config, ChunkGenerator::new(config.chunk_size));
    let mut index = OccupancyIndex::new();
    streaming.update(0.0, 0.0, &ctx, &mut index, &mut NullScene);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(streaming.update(black_box(1.0), black_box(1.0), &ctx, &mut index, &mut NullScene));
    }
    let elapsed = start.elapsed();
    println!(
        "  idle update (r={render_distance}, {iterations} iters): {:?}/iter",
        elapsed / iterations as u32
    );
}

fn main() {
    println!("=== Stream Update Benchmarks ===\n");

    println!("Idle (no window change):");
    bench_idle(2, 10_000);
    bench_idle(4, 10_000);

    println!("\nWalking reference:");
    let wild = WorldContext::wilderness("rift_wastes");
    let dungeon = WorldContext::dungeon("void_cathedral");
    bench_walk(&wild, 2, 1_000, 1.0);
    bench_walk(&wild, 2, 200, 20.0);
    bench_walk(&dungeon, 2, 200, 20.0);
    bench_walk(&dungeon, 4, 100, 20.0);

    println!("\n=== Done ===");
}
