//! Room placement
//!
//! Rooms are axis-aligned rectangles placed by rejection sampling. Sizes are
//! drawn from a Beta distribution whose shape parameters come from the
//! spatial field, so different regions of the world favor different room
//! sizes. Placement respects existing rooms and the boundary openings the
//! carver has already recorded.

use rand::Rng;
use rand_distr::{Beta, Distribution};

/// Smallest room edge produced by the main placement loop.
pub const MIN_ROOM_SIZE: i32 = 4;
/// Largest room edge produced by the main placement loop.
pub const MAX_ROOM_SIZE: i32 = 12;
/// Distance rooms keep from the chunk edge during normal placement.
const PLACEMENT_MARGIN: i32 = 3;
/// Required gap between rooms during normal placement.
const ROOM_PADDING: i32 = 2;
/// Attempt budget for the main placement loop.
const MAX_ATTEMPTS: usize = 100;
/// Hard cap on rooms per chunk.
pub const MAX_ROOMS: usize = 8;
/// Best-effort floor on rooms per chunk.
pub const MIN_ROOMS: usize = 3;
/// Utilization below which a sparse chunk gets forced extra rooms.
const UTILIZATION_FLOOR: f64 = 0.4;
/// A single room covering this fraction of the chunk ends placement.
const DOMINANT_ROOM_FRACTION: f64 = 0.6;

/// Forced placement relaxations.
const FORCED_MIN_SIZE: i32 = 3;
const FORCED_MAX_SIZE: i32 = 6;
const FORCED_MARGIN: i32 = 2;
const FORCED_PADDING: i32 = 1;
const FORCED_ATTEMPTS: usize = 50;

/// An axis-aligned room rectangle in chunk-local cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Room {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn area(&self) -> i32 {
        self.width * self.height
    }

    /// True if the rooms overlap when each is grown by `padding` cells.
    pub fn intersects(&self, other: &Room, padding: i32) -> bool {
        !(self.x + self.width + padding <= other.x
            || other.x + other.width + padding <= self.x
            || self.y + self.height + padding <= other.y
            || other.y + other.height + padding <= self.y)
    }

    /// True if a boundary opening at (bx, by) lies within one cell of this
    /// room's perimeter, which would wall off the opening's corridor.
    fn blocks_boundary_point(&self, bx: i32, by: i32) -> bool {
        bx >= self.x - 1
            && bx <= self.x + self.width
            && by >= self.y - 1
            && by <= self.y + self.height
    }
}

/// Place rooms for one chunk.
///
/// Runs the bounded rejection-sampling loop, then, if the chunk came out
/// both underpopulated and underutilized, forces smaller rooms with relaxed
/// spacing until the minimum is met or the forced budget runs out. Never
/// fails: a sparse chunk is accepted as-is.
pub fn place_rooms(
    grid_size: usize,
    alpha: f64,
    beta: f64,
    boundary_points: &[(i32, i32)],
    rng: &mut impl Rng,
) -> Vec<Room> {
    let size = grid_size as i32;
    let chunk_area = (size * size) as f64;
    // Parameters are clamped to [0.5, 4.0] upstream, always a valid Beta.
    let size_dist = Beta::new(alpha, beta).expect("room size distribution parameters out of range");

    let mut rooms: Vec<Room> = Vec::new();
    let mut attempts = 0;

    while rooms.len() < MAX_ROOMS && attempts < MAX_ATTEMPTS {
        attempts += 1;

        let width = sample_room_size(&size_dist, size, rng);
        let height = sample_room_size(&size_dist, size, rng);

        let max_x = size - width - PLACEMENT_MARGIN;
        let max_y = size - height - PLACEMENT_MARGIN;
        if max_x < PLACEMENT_MARGIN || max_y < PLACEMENT_MARGIN {
            continue;
        }
        let x = rng.gen_range(PLACEMENT_MARGIN..=max_x);
        let y = rng.gen_range(PLACEMENT_MARGIN..=max_y);

        let candidate = Room::new(x, y, width, height);
        if accepts(&candidate, &rooms, ROOM_PADDING, boundary_points) {
            let dominant = candidate.area() as f64 > DOMINANT_ROOM_FRACTION * chunk_area;
            rooms.push(candidate);
            if dominant {
                break;
            }
        }
    }

    let utilization = rooms.iter().map(|r| r.area() as f64).sum::<f64>() / chunk_area;
    if rooms.len() < MIN_ROOMS && utilization < UTILIZATION_FLOOR {
        force_place_rooms(&mut rooms, size, boundary_points, rng);
    }

    rooms
}

/// Draw one room edge length: Beta sample rescaled into the room size range,
/// then clamped again to the grid. The second clamp never binds at full
/// chunk size but is kept for smaller grids.
fn sample_room_size(dist: &Beta<f64>, grid_size: i32, rng: &mut impl Rng) -> i32 {
    let t = dist.sample(rng);
    let scaled = MIN_ROOM_SIZE as f64 + t * (MAX_ROOM_SIZE - MIN_ROOM_SIZE) as f64;
    (scaled.round() as i32).min(grid_size - 2)
}

/// Best-effort top-up for sparse chunks: smaller rooms, tighter margins,
/// relaxed padding, bounded attempts. Tolerates failure.
fn force_place_rooms(
    rooms: &mut Vec<Room>,
    size: i32,
    boundary_points: &[(i32, i32)],
    rng: &mut impl Rng,
) {
    let needed = MIN_ROOMS.saturating_sub(rooms.len());
    for _ in 0..needed {
        for _ in 0..FORCED_ATTEMPTS {
            let width = rng.gen_range(FORCED_MIN_SIZE..=FORCED_MAX_SIZE);
            let height = rng.gen_range(FORCED_MIN_SIZE..=FORCED_MAX_SIZE);

            let max_x = size - width - FORCED_MARGIN;
            let max_y = size - height - FORCED_MARGIN;
            if max_x < FORCED_MARGIN || max_y < FORCED_MARGIN {
                continue;
            }
            let x = rng.gen_range(FORCED_MARGIN..=max_x);
            let y = rng.gen_range(FORCED_MARGIN..=max_y);

            let candidate = Room::new(x, y, width, height);
            if accepts(&candidate, rooms, FORCED_PADDING, boundary_points) {
                rooms.push(candidate);
                break;
            }
        }
    }
}

fn accepts(
    candidate: &Room,
    rooms: &[Room],
    padding: i32,
    boundary_points: &[(i32, i32)],
) -> bool {
    rooms.iter().all(|r| !candidate.intersects(r, padding))
        && boundary_points
            .iter()
            .all(|&(bx, by)| !candidate.blocks_boundary_point(bx, by))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::grid::CHUNK_SIZE;

    fn place_with_seed(seed: u64, boundary_points: &[(i32, i32)]) -> Vec<Room> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        place_rooms(CHUNK_SIZE, 2.0, 2.0, boundary_points, &mut rng)
    }

    #[test]
    fn test_room_center() {
        assert_eq!(Room::new(0, 0, 10, 10).center(), (5, 5));
        assert_eq!(Room::new(5, 5, 4, 6).center(), (7, 8));
    }

    #[test]
    fn test_intersects_respects_padding() {
        let a = Room::new(3, 3, 5, 5);
        let b = Room::new(10, 3, 5, 5);
        // Two cells of gap: fine at padding 2, too close at padding 3.
        assert!(!a.intersects(&b, 2));
        assert!(a.intersects(&b, 3));
    }

    #[test]
    fn test_placement_is_deterministic() {
        let points = [(10, 0), (0, 20)];
        assert_eq!(place_with_seed(77, &points), place_with_seed(77, &points));
    }

    #[test]
    fn test_rooms_within_bounds_and_count() {
        for seed in 0..25u64 {
            let rooms = place_with_seed(seed, &[]);
            assert!(!rooms.is_empty());
            assert!(rooms.len() <= MAX_ROOMS);
            for room in &rooms {
                assert!(room.x >= 2 && room.y >= 2);
                assert!(room.x + room.width <= CHUNK_SIZE as i32 - 2);
                assert!(room.y + room.height <= CHUNK_SIZE as i32 - 2);
                assert!(room.width >= FORCED_MIN_SIZE && room.width <= MAX_ROOM_SIZE);
                assert!(room.height >= FORCED_MIN_SIZE && room.height <= MAX_ROOM_SIZE);
            }
        }
    }

    #[test]
    fn test_no_pair_overlaps() {
        // Forced rooms allow padding 1, so that is the floor for every pair.
        for seed in 0..25u64 {
            let rooms = place_with_seed(seed, &[]);
            for i in 0..rooms.len() {
                for j in (i + 1)..rooms.len() {
                    assert!(
                        !rooms[i].intersects(&rooms[j], FORCED_PADDING),
                        "rooms {i} and {j} too close with seed {seed}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_rooms_avoid_boundary_points() {
        let points = [(12, 0), (47, 30), (0, 8), (25, 47)];
        for seed in 0..25u64 {
            let rooms = place_with_seed(seed, &points);
            for room in &rooms {
                for &(bx, by) in &points {
                    assert!(
                        !room.blocks_boundary_point(bx, by),
                        "room {room:?} crowds boundary point ({bx},{by}) with seed {seed}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_skewed_parameters_shift_sizes() {
        // Alpha-heavy distributions should average larger rooms than
        // beta-heavy ones over enough draws.
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let large: i32 = (0..200)
            .map(|_| sample_room_size(&Beta::new(4.0, 0.5).unwrap(), 48, &mut rng))
            .sum();
        let small: i32 = (0..200)
            .map(|_| sample_room_size(&Beta::new(0.5, 4.0).unwrap(), 48, &mut rng))
            .sum();
        assert!(large > small);
    }
}
