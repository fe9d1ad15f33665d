//! Chunk generation pipeline
//!
//! Pure orchestration of the generation stages in their fixed order. Given
//! the same coordinate and the same spatial field table, the output grid is
//! byte-identical on every call, in every process. That is what lets
//! neighbors be generated independently and still line up.

use std::collections::HashSet;
use std::fmt;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::ascii;
use crate::boundary::BoundaryConstraints;
use crate::carver;
use crate::field::SpatialField;
use crate::grid::{ChunkGrid, CHUNK_SIZE};
use crate::rooms;
use crate::seeds::chunk_seed;
use crate::timing::StageTimings;

/// Coordinates of a chunk in the unbounded world grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i64,
    pub y: i64,
}

impl ChunkCoord {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Generate the grid for one chunk.
pub fn generate_chunk(coord: ChunkCoord, field: &SpatialField) -> ChunkGrid {
    generate_chunk_timed(coord, field, None)
}

/// Generate with an optional stage-timing collector attached.
pub fn generate_chunk_timed(
    coord: ChunkCoord,
    field: &SpatialField,
    mut timings: Option<&mut StageTimings>,
) -> ChunkGrid {
    let mut grid = ChunkGrid::new(CHUNK_SIZE);

    // Boundary cells open before room placement so the placer can treat
    // them as exclusion zones.
    let constraints = timed(&mut timings, "boundary", || {
        BoundaryConstraints::resolve(coord.x, coord.y, CHUNK_SIZE)
    });
    let boundary_points = carver::open_boundaries(&mut grid, &constraints);

    let (alpha, beta) = timed(&mut timings, "field", || {
        field.spatial_parameters(coord.x, coord.y)
    });

    // One explicit stream per chunk; boundary sides each had their own.
    let mut rng = ChaCha8Rng::seed_from_u64(chunk_seed(coord.x, coord.y));

    let placed = timed(&mut timings, "rooms", || {
        rooms::place_rooms(CHUNK_SIZE, alpha, beta, &boundary_points, &mut rng)
    });

    timed(&mut timings, "carve", || {
        carver::carve_rooms(&mut grid, &placed);
        carver::connect_rooms(&mut grid, &placed, &mut rng);
        carver::connect_boundary_points(&mut grid, &placed, &boundary_points, &mut rng);
    });

    grid
}

fn timed<R>(
    timings: &mut Option<&mut StageTimings>,
    stage: &'static str,
    f: impl FnOnce() -> R,
) -> R {
    match timings {
        Some(t) => t.time(stage, f),
        None => f(),
    }
}

/// Elapsed milliseconds for one pipeline stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StageMs {
    pub stage: String,
    pub ms: f64,
}

/// Observational metrics attached to a response on request. Never feeds
/// back into generation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DebugInfo {
    pub alpha: f64,
    pub beta: f64,
    pub variation: f64,
    pub band_wavelengths: Vec<i64>,
    pub stage_ms: Vec<StageMs>,
}

/// The serialized form of one generated chunk: equal-length row strings of
/// wall/floor glyphs, plus optional debug metrics.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChunkResponse {
    pub grid: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugInfo>,
}

impl ChunkResponse {
    /// Generate a chunk and package it for the serving layer.
    pub fn build(coord: ChunkCoord, field: &SpatialField, debug: bool) -> Self {
        if !debug {
            let grid = generate_chunk(coord, field);
            return Self {
                grid: ascii::render_rows(&grid),
                debug: None,
            };
        }

        let mut timings = StageTimings::new();
        let grid = generate_chunk_timed(coord, field, Some(&mut timings));

        let variation = field.sample(coord.x, coord.y);
        let (alpha, beta) = field.spatial_parameters(coord.x, coord.y);
        let stage_ms = timings
            .stage_millis()
            .into_iter()
            .map(|(stage, ms)| StageMs { stage, ms })
            .collect();

        Self {
            grid: ascii::render_rows(&grid),
            debug: Some(DebugInfo {
                alpha: round3(alpha),
                beta: round3(beta),
                variation: round3(variation),
                band_wavelengths: field.wavelengths(),
                stage_ms,
            }),
        }
    }
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// All floor cells reachable from `start` by 4-way movement.
///
/// Used by the connectivity checks: everything the carver floors hangs off
/// the room network, so one fill from any floor cell should cover the lot.
pub fn flood_fill_from(grid: &ChunkGrid, start: (i32, i32)) -> HashSet<(i32, i32)> {
    let mut reached = HashSet::new();
    if !grid.is_floor(start.0, start.1) {
        return reached;
    }

    let mut stack = vec![start];
    reached.insert(start);
    while let Some((x, y)) = stack.pop() {
        for (nx, ny) in [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)] {
            if grid.is_floor(nx, ny) && reached.insert((nx, ny)) {
                stack.push((nx, ny));
            }
        }
    }
    reached
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;

    #[test]
    fn test_generation_is_deterministic() {
        let field = SpatialField::new();
        let coord = ChunkCoord::new(3, -9);
        assert_eq!(generate_chunk(coord, &field), generate_chunk(coord, &field));

        let a = ChunkResponse::build(coord, &field, true);
        let b = ChunkResponse::build(coord, &field, true);
        assert_eq!(a.grid, b.grid);
        let (da, db) = (a.debug.unwrap(), b.debug.unwrap());
        assert_eq!(da.alpha, db.alpha);
        assert_eq!(da.beta, db.beta);
        assert_eq!(da.variation, db.variation);
        assert_eq!(da.band_wavelengths, db.band_wavelengths);
    }

    #[test]
    fn test_origin_chunk_scenario() {
        // Request (0,0) twice: identical 48x48 row strings of the two
        // glyphs, with every declared boundary coordinate a floor glyph on
        // its edge row or column.
        let field = SpatialField::new();
        let first = ChunkResponse::build(ChunkCoord::new(0, 0), &field, false);
        let second = ChunkResponse::build(ChunkCoord::new(0, 0), &field, false);
        assert_eq!(first.grid, second.grid);

        assert_eq!(first.grid.len(), CHUNK_SIZE);
        for row in &first.grid {
            assert_eq!(row.chars().count(), CHUNK_SIZE);
            assert!(row.chars().all(|c| c == '#' || c == ' '));
        }

        let constraints = BoundaryConstraints::resolve(0, 0, CHUNK_SIZE);
        let row = |y: usize| first.grid[y].as_bytes();
        for &x in &constraints.north {
            assert_eq!(row(0)[x as usize], b' ');
        }
        for &x in &constraints.south {
            assert_eq!(row(CHUNK_SIZE - 1)[x as usize], b' ');
        }
        for &y in &constraints.west {
            assert_eq!(row(y as usize)[0], b' ');
        }
        for &y in &constraints.east {
            assert_eq!(row(y as usize)[CHUNK_SIZE - 1], b' ');
        }
    }

    #[test]
    fn test_debug_metrics_do_not_change_the_grid() {
        let field = SpatialField::new();
        for &(x, y) in &[(0i64, 0i64), (-7, 12), (100, -100)] {
            let coord = ChunkCoord::new(x, y);
            let plain = ChunkResponse::build(coord, &field, false);
            let debugged = ChunkResponse::build(coord, &field, true);
            assert_eq!(plain.grid, debugged.grid);
            assert!(plain.debug.is_none());

            let info = debugged.debug.unwrap();
            assert!((0.5..=4.0).contains(&info.alpha));
            assert!((0.5..=4.0).contains(&info.beta));
            assert!((-1.0..=1.0).contains(&info.variation));
            assert_eq!(info.band_wavelengths.len(), crate::field::BAND_COUNT);
            let stages: Vec<_> = info.stage_ms.iter().map(|s| s.stage.as_str()).collect();
            assert_eq!(stages, vec!["boundary", "field", "rooms", "carve"]);
        }
    }

    #[test]
    fn test_debug_values_are_rounded() {
        let field = SpatialField::new();
        let info = ChunkResponse::build(ChunkCoord::new(5, 5), &field, true)
            .debug
            .unwrap();
        for v in [info.alpha, info.beta, info.variation] {
            assert_eq!(v, (v * 1000.0).round() / 1000.0);
        }
    }

    #[test]
    fn test_whole_floor_network_is_connected() {
        // Rooms chain together and every boundary opening hooks into a
        // room, so the floor forms a single component.
        let field = SpatialField::new();
        for &(x, y) in &[(0i64, 0i64), (1, 0), (-3, 8), (42, 42)] {
            let grid = generate_chunk(ChunkCoord::new(x, y), &field);
            let start = grid
                .iter()
                .find(|(_, _, c)| c.is_floor())
                .map(|(cx, cy, _)| (cx, cy))
                .unwrap();
            let reached = flood_fill_from(&grid, start);
            assert_eq!(
                reached.len(),
                grid.floor_count(),
                "disconnected floor in chunk ({x},{y})"
            );
        }
    }

    #[test]
    fn test_neighbor_seams_line_up() {
        // The cells shared across a seam agree: chunk (0,0)'s south edge
        // openings appear at the same x offsets as chunk (0,1)'s north edge.
        let field = SpatialField::new();
        let here = generate_chunk(ChunkCoord::new(0, 0), &field);
        let below = generate_chunk(ChunkCoord::new(0, 1), &field);
        let size = CHUNK_SIZE as i32;

        let constraints = BoundaryConstraints::resolve(0, 0, CHUNK_SIZE);
        for &x in &constraints.south {
            assert_eq!(here.get(x, size - 1), Some(Cell::Floor));
            assert_eq!(below.get(x, 0), Some(Cell::Floor));
        }
    }
}
