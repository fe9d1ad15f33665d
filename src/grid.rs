//! Chunk cell grid
//!
//! A flat row-major buffer of wall/floor cells. All mutation goes through
//! `carve`, which bounds-checks and silently ignores out-of-range writes;
//! hallway carving near chunk edges relies on that contract.

/// Side length of every chunk, in cells.
pub const CHUNK_SIZE: usize = 48;

/// A single cell in a chunk grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cell {
    #[default]
    Wall,
    Floor,
}

impl Cell {
    /// Glyph used in the serialized row-string representation.
    pub fn glyph(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Floor => ' ',
        }
    }

    pub fn is_floor(self) -> bool {
        self == Cell::Floor
    }
}

/// A square grid of cells for one chunk, indexed `y * size + x`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkGrid {
    size: usize,
    cells: Vec<Cell>,
}

impl ChunkGrid {
    /// Create an all-wall grid.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Wall; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.size as i32 || y >= self.size as i32 {
            return None;
        }
        Some(y as usize * self.size + x as usize)
    }

    /// Cell at (x, y), or `None` outside the grid.
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    pub fn is_floor(&self, x: i32, y: i32) -> bool {
        self.get(x, y) == Some(Cell::Floor)
    }

    /// Open (x, y) to floor. Out-of-range coordinates are a no-op.
    pub fn carve(&mut self, x: i32, y: i32) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = Cell::Floor;
        }
    }

    pub fn floor_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_floor()).count()
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        let size = self.size;
        self.cells.iter().enumerate().map(move |(idx, &cell)| {
            let x = (idx % size) as i32;
            let y = (idx / size) as i32;
            (x, y, cell)
        })
    }
}
