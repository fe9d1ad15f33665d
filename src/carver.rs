//! Grid carving
//!
//! Turns the boundary constraints and the room list into the final cell
//! grid. Order matters: boundary cells open before room placement so the
//! placer can treat them as exclusion zones, and rooms are floored before
//! hallway carving so hallway endpoints are already floor.

use rand::Rng;

use crate::boundary::BoundaryConstraints;
use crate::grid::ChunkGrid;
use crate::rooms::Room;

/// Open the mandated boundary cells and return them as (x, y) points.
///
/// Points are recorded in north, south, west, east order; the hookup pass
/// later walks them in this order.
pub fn open_boundaries(grid: &mut ChunkGrid, constraints: &BoundaryConstraints) -> Vec<(i32, i32)> {
    let size = grid.size() as i32;
    let mut points = Vec::with_capacity(constraints.total_points());

    for &x in &constraints.north {
        if (0..size).contains(&x) {
            grid.carve(x, 0);
            points.push((x, 0));
        }
    }
    for &x in &constraints.south {
        if (0..size).contains(&x) {
            grid.carve(x, size - 1);
            points.push((x, size - 1));
        }
    }
    for &y in &constraints.west {
        if (0..size).contains(&y) {
            grid.carve(0, y);
            points.push((0, y));
        }
    }
    for &y in &constraints.east {
        if (0..size).contains(&y) {
            grid.carve(size - 1, y);
            points.push((size - 1, y));
        }
    }

    points
}

/// Floor every room interior.
pub fn carve_rooms(grid: &mut ChunkGrid, rooms: &[Room]) {
    for room in rooms {
        for y in room.y..room.y + room.height {
            for x in room.x..room.x + room.width {
                grid.carve(x, y);
            }
        }
    }
}

/// Connect the rooms into one traversable network.
///
/// Consecutive centers are chained with L-hallways and the chain is closed
/// first-to-last once there are three rooms. Four or more rooms get one
/// extra random connection for less tree-like layouts.
pub fn connect_rooms(grid: &mut ChunkGrid, rooms: &[Room], rng: &mut impl Rng) {
    if rooms.len() < 2 {
        return;
    }

    for pair in rooms.windows(2) {
        carve_hallway(grid, pair[0].center(), pair[1].center(), rng);
    }

    if rooms.len() >= 3 {
        carve_hallway(grid, rooms[0].center(), rooms[rooms.len() - 1].center(), rng);

        if rooms.len() >= 4 {
            let a = rng.gen_range(0..rooms.len());
            let b = rng.gen_range(0..rooms.len());
            if a != b {
                carve_hallway(grid, rooms[a].center(), rooms[b].center(), rng);
            }
        }
    }
}

/// Connect every boundary opening to the room network.
///
/// An opening with a room flush against its edge gets a single door cell
/// just inside that room; every other opening gets an L-corridor to the
/// center of the Manhattan-nearest room.
pub fn connect_boundary_points(
    grid: &mut ChunkGrid,
    rooms: &[Room],
    points: &[(i32, i32)],
    rng: &mut impl Rng,
) {
    if rooms.is_empty() {
        return;
    }

    for &(bx, by) in points {
        if let Some((dx, dy)) = rooms
            .iter()
            .find_map(|room| door_cell(bx, by, room, grid.size() as i32))
        {
            grid.carve(dx, dy);
        } else if let Some(room) = rooms.iter().min_by_key(|room| {
            let (cx, cy) = room.center();
            (cx - bx).abs() + (cy - by).abs()
        }) {
            carve_hallway(grid, room.center(), (bx, by), rng);
        }
    }
}

/// The door cell for a boundary opening, if `room` sits flush against that
/// edge with the opening inside its span.
fn door_cell(bx: i32, by: i32, room: &Room, size: i32) -> Option<(i32, i32)> {
    let spans_x = bx >= room.x && bx < room.x + room.width;
    let spans_y = by >= room.y && by < room.y + room.height;

    if by == 0 && room.y == 1 && spans_x {
        Some((bx, 1))
    } else if by == size - 1 && room.y + room.height == size - 1 && spans_x {
        Some((bx, size - 2))
    } else if bx == 0 && room.x == 1 && spans_y {
        Some((1, by))
    } else if bx == size - 1 && room.x + room.width == size - 1 && spans_y {
        Some((size - 2, by))
    } else {
        None
    }
}

/// Carve an L-shaped hallway between two points, fair coin for which leg
/// comes first.
pub fn carve_hallway(
    grid: &mut ChunkGrid,
    (x1, y1): (i32, i32),
    (x2, y2): (i32, i32),
    rng: &mut impl Rng,
) {
    if rng.gen_bool(0.5) {
        carve_horizontal(grid, x1, x2, y1);
        carve_vertical(grid, y1, y2, x2);
    } else {
        carve_vertical(grid, y1, y2, x1);
        carve_horizontal(grid, x1, x2, y2);
    }
}

fn carve_horizontal(grid: &mut ChunkGrid, x1: i32, x2: i32, y: i32) {
    for x in x1.min(x2)..=x1.max(x2) {
        grid.carve(x, y);
    }
}

fn carve_vertical(grid: &mut ChunkGrid, y1: i32, y2: i32, x: i32) {
    for y in y1.min(y2)..=y1.max(y2) {
        grid.carve(x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_carve_rooms_floors_interiors() {
        let mut grid = ChunkGrid::new(20);
        let room = Room::new(4, 5, 6, 3);
        carve_rooms(&mut grid, &[room]);
        for y in 5..8 {
            for x in 4..10 {
                assert!(grid.is_floor(x, y));
            }
        }
        // Perimeter stays wall.
        assert!(!grid.is_floor(3, 5));
        assert!(!grid.is_floor(10, 5));
        assert!(!grid.is_floor(4, 4));
        assert!(!grid.is_floor(4, 8));
    }

    #[test]
    fn test_hallway_connects_endpoints() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut grid = ChunkGrid::new(20);
        carve_hallway(&mut grid, (2, 2), (15, 12), &mut rng);
        assert!(grid.is_floor(2, 2));
        assert!(grid.is_floor(15, 12));
        // Either elbow shape floors one full horizontal and one full
        // vertical run between the endpoints.
        let horizontal_cells = (2..=15).filter(|&x| grid.is_floor(x, 2) || grid.is_floor(x, 12)).count();
        assert_eq!(horizontal_cells, 14);
    }

    #[test]
    fn test_hallway_out_of_range_is_safe() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut grid = ChunkGrid::new(10);
        carve_hallway(&mut grid, (-5, 3), (20, 3), &mut rng);
        // In-range span got carved, the rest silently dropped.
        for x in 0..10 {
            assert!(grid.is_floor(x, 3));
        }
    }

    #[test]
    fn test_open_boundaries_records_points() {
        let mut grid = ChunkGrid::new(16);
        let constraints = BoundaryConstraints {
            north: vec![5, 11],
            south: vec![7],
            east: vec![4],
            west: vec![9],
        };
        let points = open_boundaries(&mut grid, &constraints);
        assert_eq!(points.len(), 5);
        assert!(grid.is_floor(5, 0));
        assert!(grid.is_floor(11, 0));
        assert!(grid.is_floor(7, 15));
        assert!(grid.is_floor(0, 9));
        assert!(grid.is_floor(15, 4));
    }

    #[test]
    fn test_door_for_flush_room() {
        // Room flush under the north edge spanning the opening.
        let room = Room::new(4, 1, 6, 5);
        assert_eq!(door_cell(6, 0, &room, 16), Some((6, 1)));
        assert_eq!(door_cell(3, 0, &room, 16), None);
        // Same room is not flush against the south edge.
        assert_eq!(door_cell(6, 15, &room, 16), None);
    }

    #[test]
    fn test_boundary_hookup_reaches_openings() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut grid = ChunkGrid::new(24);
        let constraints = BoundaryConstraints {
            north: vec![12],
            south: vec![6],
            east: vec![18],
            west: vec![10],
        };
        let points = open_boundaries(&mut grid, &constraints);
        let rooms = [Room::new(8, 8, 8, 8)];
        carve_rooms(&mut grid, &rooms);
        connect_boundary_points(&mut grid, &rooms, &points, &mut rng);

        // Every opening must now trace floor to the room along its corridor.
        for &(bx, by) in &points {
            assert!(grid.is_floor(bx, by));
        }
        let reached = crate::chunk::flood_fill_from(&grid, rooms[0].center());
        for &p in &points {
            assert!(reached.contains(&p), "opening {p:?} not connected");
        }
    }
}
