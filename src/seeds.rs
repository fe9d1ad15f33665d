//! Seed derivation for chunk generation
//!
//! Every random stream in the pipeline is seeded from pure integer math over
//! the chunk coordinates, so any chunk can be regenerated identically in any
//! process. Boundary seeds are shared symmetrically between the two chunks on
//! either side of an edge.

/// Multiplier for the x coordinate in chunk seed derivation.
pub const SEED_PRIME_X: i64 = 73856093;
/// Multiplier for the y coordinate in chunk seed derivation.
pub const SEED_PRIME_Y: i64 = 19349663;

/// The four sides of a chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    North,
    South,
    East,
    West,
}

impl Side {
    pub fn all() -> &'static [Side] {
        &[Side::North, Side::South, Side::East, Side::West]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Side::North => "north",
            Side::South => "south",
            Side::East => "east",
            Side::West => "west",
        }
    }
}

/// Derive the deterministic seed for a chunk from its coordinates.
///
/// Wrapping integer arithmetic only; no floating point anywhere in seed
/// derivation so results are identical across platforms. Not injective,
/// which is fine: collisions only mean two chunks share internal layout.
pub fn chunk_seed(x: i64, y: i64) -> u64 {
    (x.wrapping_mul(SEED_PRIME_X) ^ y.wrapping_mul(SEED_PRIME_Y)) as u64
}

/// Derive the seed shared by the two chunks on either side of one edge.
///
/// The seed XORs both chunks' seeds, so chunk (cx, cy) resolving its south
/// side and chunk (cx, cy+1) resolving its north side draw from the same
/// stream and produce identical boundary points. This is the property that
/// makes the world tile seamlessly.
pub fn boundary_seed(cx: i64, cy: i64, side: Side) -> u64 {
    match side {
        Side::North => chunk_seed(cx, cy.wrapping_sub(1)) ^ chunk_seed(cx, cy),
        Side::South => chunk_seed(cx, cy) ^ chunk_seed(cx, cy.wrapping_add(1)),
        Side::West => chunk_seed(cx.wrapping_sub(1), cy) ^ chunk_seed(cx, cy),
        Side::East => chunk_seed(cx, cy) ^ chunk_seed(cx.wrapping_add(1), cy),
    }
}
