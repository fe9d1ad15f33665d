//! Audit tool for the seam-matching invariants
//!
//! Sweeps a square region of chunks and verifies the properties the whole
//! boundary scheme exists to guarantee: adjacent chunks resolve identical
//! point sets for their shared edge, every declared opening is floor in the
//! generated grid, and each chunk's floor network is a single connected
//! component.

use std::time::Instant;

use rayon::prelude::*;

use dungeon_generator::boundary::BoundaryConstraints;
use dungeon_generator::chunk::{flood_fill_from, generate_chunk, ChunkCoord};
use dungeon_generator::field::SpatialField;
use dungeon_generator::grid::CHUNK_SIZE;

const RADIUS: i64 = 8;

fn main() {
    let field = SpatialField::new();
    let start = Instant::now();
    let across = 2 * RADIUS + 1;

    println!("=== Seam Audit ===");
    println!(
        "Region: chunks ({0}, {0}) to ({1}, {1}), {2} chunks",
        -RADIUS,
        RADIUS,
        across * across
    );
    println!();

    // Every interior seam checked once from its north/west chunk.
    let mut seam_mismatches = 0usize;
    let mut seams_checked = 0usize;
    for cy in -RADIUS..=RADIUS {
        for cx in -RADIUS..=RADIUS {
            let here = BoundaryConstraints::resolve(cx, cy, CHUNK_SIZE);
            let below = BoundaryConstraints::resolve(cx, cy + 1, CHUNK_SIZE);
            let right = BoundaryConstraints::resolve(cx + 1, cy, CHUNK_SIZE);
            seams_checked += 2;
            if here.south != below.north {
                seam_mismatches += 1;
                println!("MISMATCH: south of ({cx},{cy}) vs north of ({cx},{})", cy + 1);
            }
            if here.east != right.west {
                seam_mismatches += 1;
                println!("MISMATCH: east of ({cx},{cy}) vs west of ({},{cy})", cx + 1);
            }
        }
    }
    println!("Seams checked: {} ({} mismatches)", seams_checked, seam_mismatches);

    let coords: Vec<ChunkCoord> = (-RADIUS..=RADIUS)
        .flat_map(|cy| (-RADIUS..=RADIUS).map(move |cx| ChunkCoord::new(cx, cy)))
        .collect();

    // Per-chunk grid checks, fully parallel: generation shares only the
    // immutable field table.
    let results: Vec<(usize, usize, usize)> = coords
        .par_iter()
        .map(|&coord| {
            let grid = generate_chunk(coord, &field);
            let constraints = BoundaryConstraints::resolve(coord.x, coord.y, CHUNK_SIZE);
            let size = CHUNK_SIZE as i32;

            let mut unsatisfied = 0usize;
            for &x in &constraints.north {
                if !grid.is_floor(x, 0) {
                    unsatisfied += 1;
                }
            }
            for &x in &constraints.south {
                if !grid.is_floor(x, size - 1) {
                    unsatisfied += 1;
                }
            }
            for &y in &constraints.west {
                if !grid.is_floor(0, y) {
                    unsatisfied += 1;
                }
            }
            for &y in &constraints.east {
                if !grid.is_floor(size - 1, y) {
                    unsatisfied += 1;
                }
            }

            let floor = grid.floor_count();
            let disconnected = match grid.iter().find(|(_, _, c)| c.is_floor()) {
                Some((x, y, _)) => floor - flood_fill_from(&grid, (x, y)).len(),
                None => 0,
            };

            (unsatisfied, disconnected, floor)
        })
        .collect();

    let unsatisfied: usize = results.iter().map(|r| r.0).sum();
    let disconnected: usize = results.iter().map(|r| r.1).sum();
    let total_floor: usize = results.iter().map(|r| r.2).sum();
    let cells_per_chunk = CHUNK_SIZE * CHUNK_SIZE;

    println!("Unsatisfied boundary openings: {}", unsatisfied);
    println!("Disconnected floor cells: {}", disconnected);
    println!(
        "Average floor coverage: {:.1}%",
        100.0 * total_floor as f64 / (results.len() * cells_per_chunk) as f64
    );
    println!();
    println!("Audit finished in {:?}", start.elapsed());

    if seam_mismatches + unsatisfied + disconnected > 0 {
        println!("RESULT: FAILED");
        std::process::exit(1);
    }
    println!("RESULT: OK");
}
