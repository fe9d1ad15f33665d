//! Boundary constraint resolution
//!
//! Each side of a chunk must open onto the neighboring chunk at the same
//! cells the neighbor computes for its matching side. Both chunks derive the
//! side's point set from the shared boundary seed, each with its own
//! dedicated PRNG stream, so the two computations are bit-identical without
//! any communication.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::seeds::{boundary_seed, Side};

/// Keep-out distance from chunk corners for boundary points.
pub const BOUNDARY_MARGIN: i32 = 4;
/// Minimum spacing between the mandatory points on one side.
const MANDATORY_MIN_SPACING: i32 = 6;
/// Relaxed spacing for optional extra points.
const EXTRA_MIN_SPACING: i32 = 4;
/// Maximum optional points attempted per side.
const MAX_EXTRA_POINTS: usize = 3;
/// Acceptance probability per optional point attempt.
const EXTRA_POINT_CHANCE: f64 = 0.25;

/// The offsets along each side of a chunk that must be floor.
///
/// North/south hold x coordinates (rows 0 and size-1); east/west hold
/// y coordinates (columns size-1 and 0). Each list is sorted ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundaryConstraints {
    pub north: Vec<i32>,
    pub south: Vec<i32>,
    pub east: Vec<i32>,
    pub west: Vec<i32>,
}

impl BoundaryConstraints {
    /// Resolve all four sides for the chunk at (cx, cy).
    pub fn resolve(cx: i64, cy: i64, chunk_size: usize) -> Self {
        Self {
            north: side_points(boundary_seed(cx, cy, Side::North), chunk_size),
            south: side_points(boundary_seed(cx, cy, Side::South), chunk_size),
            east: side_points(boundary_seed(cx, cy, Side::East), chunk_size),
            west: side_points(boundary_seed(cx, cy, Side::West), chunk_size),
        }
    }

    pub fn side(&self, side: Side) -> &[i32] {
        match side {
            Side::North => &self.north,
            Side::South => &self.south,
            Side::East => &self.east,
            Side::West => &self.west,
        }
    }

    pub fn total_points(&self) -> usize {
        self.north.len() + self.south.len() + self.east.len() + self.west.len()
    }
}

/// Generate the sorted point set for one side from its shared seed.
///
/// 1-2 mandatory points spaced at least 6 apart, then up to three optional
/// points, each gated by a 25% roll and spaced at least 4 from everything
/// already accepted. Candidates violating spacing are dropped, not retried.
fn side_points(seed: u64, chunk_size: usize) -> Vec<i32> {
    let size = chunk_size as i32;
    // A side too short for the corner margins gets no openings at all.
    if size - 2 * BOUNDARY_MARGIN <= 0 {
        return Vec::new();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut points: Vec<i32> = Vec::new();

    let mandatory = rng.gen_range(1..=2);
    for _ in 0..mandatory {
        let candidate = rng.gen_range(BOUNDARY_MARGIN..size - BOUNDARY_MARGIN);
        if points
            .iter()
            .all(|&p| (candidate - p).abs() >= MANDATORY_MIN_SPACING)
        {
            points.push(candidate);
        }
    }

    for _ in 0..MAX_EXTRA_POINTS {
        if rng.gen_bool(EXTRA_POINT_CHANCE) {
            let candidate = rng.gen_range(BOUNDARY_MARGIN..size - BOUNDARY_MARGIN);
            if points
                .iter()
                .all(|&p| (candidate - p).abs() >= EXTRA_MIN_SPACING)
            {
                points.push(candidate);
            }
        }
    }

    points.sort_unstable();
    points
}
