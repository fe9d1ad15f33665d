//! Chunk caching
//!
//! Generation is deterministic, so cached chunks never go stale; the cache
//! exists purely to avoid regenerating a chunk every time the explorer
//! crosses a seam and comes back. Simple recency eviction over a HashMap.

use std::collections::HashMap;
use std::time::Instant;

use crate::chunk::{generate_chunk, ChunkCoord};
use crate::field::SpatialField;
use crate::grid::{Cell, ChunkGrid, CHUNK_SIZE};

/// Default number of chunks kept resident.
const DEFAULT_MAX_CACHED: usize = 64;

struct CachedChunk {
    grid: ChunkGrid,
    last_accessed: Instant,
}

/// Recency-evicting cache of generated chunks keyed by coordinate.
pub struct ChunkCache {
    chunks: HashMap<ChunkCoord, CachedChunk>,
    max_cached: usize,
}

impl ChunkCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_CACHED)
    }

    pub fn with_capacity(max_cached: usize) -> Self {
        Self {
            chunks: HashMap::new(),
            max_cached: max_cached.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Fetch a chunk, generating and inserting it on first access.
    pub fn get_or_generate(&mut self, field: &SpatialField, coord: ChunkCoord) -> &ChunkGrid {
        if self.chunks.len() >= self.max_cached && !self.chunks.contains_key(&coord) {
            self.evict_oldest();
        }

        let entry = self.chunks.entry(coord).or_insert_with(|| CachedChunk {
            grid: generate_chunk(coord, field),
            last_accessed: Instant::now(),
        });
        entry.last_accessed = Instant::now();
        &entry.grid
    }

    /// Cell at a global world coordinate, pulling the owning chunk in as
    /// needed. Negative coordinates map with floored division so chunk
    /// (-1, 0) covers global x in [-48, 0).
    pub fn cell_at(&mut self, field: &SpatialField, gx: i64, gy: i64) -> Cell {
        let size = CHUNK_SIZE as i64;
        let coord = ChunkCoord::new(gx.div_euclid(size), gy.div_euclid(size));
        let (lx, ly) = (gx.rem_euclid(size) as i32, gy.rem_euclid(size) as i32);
        self.get_or_generate(field, coord)
            .get(lx, ly)
            .unwrap_or_default()
    }

    fn evict_oldest(&mut self) {
        if let Some(coord) = self
            .chunks
            .iter()
            .min_by_key(|(_, cached)| cached.last_accessed)
            .map(|(coord, _)| *coord)
        {
            self.chunks.remove(&coord);
        }
    }
}

impl Default for ChunkCache {
    fn default() -> Self {
        Self::new()
    }
}
