//! ASCII rendering and text export for chunk grids
//!
//! The row-string form here is the wire format: equal-length strings of the
//! wall and floor glyphs, one per grid row.

use std::fs::File;
use std::io::{self, Write};

use chrono::Local;

use crate::boundary::BoundaryConstraints;
use crate::field::SpatialField;
use crate::grid::ChunkGrid;
use crate::seeds::chunk_seed;

/// Render a grid as one string per row.
pub fn render_rows(grid: &ChunkGrid) -> Vec<String> {
    let size = grid.size() as i32;
    let mut rows = Vec::with_capacity(grid.size());
    for y in 0..size {
        let mut row = String::with_capacity(grid.size());
        for x in 0..size {
            let cell = grid.get(x, y).unwrap_or_default();
            row.push(cell.glyph());
        }
        rows.push(row);
    }
    rows
}

/// Render a grid as a single newline-joined block.
pub fn render_text(grid: &ChunkGrid) -> String {
    let mut out = String::with_capacity((grid.size() + 1) * grid.size());
    for row in render_rows(grid) {
        out.push_str(&row);
        out.push('\n');
    }
    out
}

/// Write a chunk to a text file with a header and basic statistics.
pub fn export_chunk_file(
    grid: &ChunkGrid,
    field: &SpatialField,
    cx: i64,
    cy: i64,
    path: &str,
) -> io::Result<()> {
    let mut file = File::create(path)?;
    let size = grid.size();
    let total = size * size;

    let (alpha, beta) = field.spatial_parameters(cx, cy);
    let variation = field.sample(cx, cy);
    let constraints = BoundaryConstraints::resolve(cx, cy, size);

    writeln!(file, "=== DUNGEON CHUNK FILE ===")?;
    writeln!(file, "Chunk: ({}, {})", cx, cy)?;
    writeln!(file, "Size: {}x{}", size, size)?;
    writeln!(file, "Seed: {}", chunk_seed(cx, cy))?;
    writeln!(file, "Alpha/Beta: {:.3} / {:.3}", alpha, beta)?;
    writeln!(file, "Variation: {:.3}", variation)?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    writeln!(file, "=== MAP ===")?;
    write!(file, "{}", render_text(grid))?;
    writeln!(file)?;

    writeln!(file, "=== STATISTICS ===")?;
    let floor = grid.floor_count();
    writeln!(file, "Total cells: {}", total)?;
    writeln!(file, "Floor: {} ({:.1}%)", floor, 100.0 * floor as f64 / total as f64)?;
    writeln!(
        file,
        "Wall: {} ({:.1}%)",
        total - floor,
        100.0 * (total - floor) as f64 / total as f64
    )?;
    writeln!(
        file,
        "Boundary openings: N={} S={} E={} W={}",
        constraints.north.len(),
        constraints.south.len(),
        constraints.east.len(),
        constraints.west.len()
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_rows_shape_and_glyphs() {
        let mut grid = ChunkGrid::new(4);
        grid.carve(1, 2);
        let rows = render_rows(&grid);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], "####");
        assert_eq!(rows[2], "# ##");
    }

    #[test]
    fn test_render_text_joins_rows() {
        let grid = ChunkGrid::new(3);
        assert_eq!(render_text(&grid), "###\n###\n###\n");
    }
}
