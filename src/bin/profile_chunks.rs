//! Profiling tool for the chunk generation pipeline

use std::time::{Duration, Instant};

use rayon::prelude::*;

use dungeon_generator::chunk::{generate_chunk, generate_chunk_timed, ChunkCoord};
use dungeon_generator::field::SpatialField;
use dungeon_generator::timing::StageTimings;

const SIDE: i64 = 16;

fn main() {
    let field = SpatialField::new();
    let coords: Vec<ChunkCoord> = (0..SIDE)
        .flat_map(|cy| (0..SIDE).map(move |cx| ChunkCoord::new(cx, cy)))
        .collect();

    println!("=== Chunk Generation Profile ===");
    println!("Chunks: {}", coords.len());
    println!();

    // Sequential pass with per-stage timing.
    let mut stage_totals: Vec<(&'static str, Duration)> = Vec::new();
    let sequential_start = Instant::now();
    for &coord in &coords {
        let mut timings = StageTimings::new();
        let _ = generate_chunk_timed(coord, &field, Some(&mut timings));
        for &(stage, elapsed) in timings.stages() {
            match stage_totals.iter_mut().find(|(name, _)| *name == stage) {
                Some((_, total)) => *total += elapsed,
                None => stage_totals.push((stage, elapsed)),
            }
        }
    }
    let sequential_time = sequential_start.elapsed();

    let stage_sum: Duration = stage_totals.iter().map(|(_, d)| *d).sum();
    for (stage, total) in &stage_totals {
        println!(
            "{:<10} {:>7.2}% ({:?})",
            stage,
            100.0 * total.as_secs_f64() / stage_sum.as_secs_f64(),
            total
        );
    }
    println!("─────────────────────────────────");
    println!(
        "Sequential: {:?} ({:.0} chunks/s)",
        sequential_time,
        coords.len() as f64 / sequential_time.as_secs_f64()
    );
    println!();

    // Parallel throughput. Generation is pure, so rayon needs nothing but
    // the shared immutable field reference.
    let parallel_start = Instant::now();
    let total_floor: usize = coords
        .par_iter()
        .map(|&coord| generate_chunk(coord, &field).floor_count())
        .sum();
    let parallel_time = parallel_start.elapsed();

    println!(
        "Parallel:   {:?} ({:.0} chunks/s, speedup {:.1}x)",
        parallel_time,
        coords.len() as f64 / parallel_time.as_secs_f64(),
        sequential_time.as_secs_f64() / parallel_time.as_secs_f64()
    );
    println!("Total floor cells: {}", total_floor);
}
