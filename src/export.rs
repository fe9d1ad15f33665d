//! PNG export of chunks
//!
//! Renders single chunks or stitched neighborhoods of chunks to images.
//! In a stitched export, corridors leaving one chunk continue in the next
//! with no post-processing; both sides derived the same boundary openings.

use image::{ImageBuffer, Rgb, RgbImage};
use rayon::prelude::*;

use crate::chunk::{generate_chunk, ChunkCoord};
use crate::field::SpatialField;
use crate::grid::{Cell, ChunkGrid, CHUNK_SIZE};

const WALL_COLOR: [u8; 3] = [38, 34, 48];
const FLOOR_COLOR: [u8; 3] = [196, 188, 164];
const GRID_LINE_COLOR: [u8; 3] = [120, 60, 60];

fn cell_color(cell: Cell) -> Rgb<u8> {
    match cell {
        Cell::Wall => Rgb(WALL_COLOR),
        Cell::Floor => Rgb(FLOOR_COLOR),
    }
}

/// Render one chunk at `scale` pixels per cell.
pub fn render_chunk_image(grid: &ChunkGrid, scale: u32) -> RgbImage {
    let scale = scale.max(1);
    let size = grid.size() as u32;
    let mut img: RgbImage = ImageBuffer::new(size * scale, size * scale);

    for (x, y, cell) in grid.iter() {
        let color = cell_color(cell);
        blit_cell(&mut img, x as u32, y as u32, scale, color);
    }

    img
}

/// Export one chunk as a PNG.
pub fn export_chunk_png(
    grid: &ChunkGrid,
    scale: u32,
    path: &str,
) -> Result<(), image::ImageError> {
    render_chunk_image(grid, scale).save(path)
}

/// Render the (2r+1) x (2r+1) neighborhood of chunks centered on `center`.
///
/// Chunks are generated in parallel; generation is a pure function of the
/// coordinate and the shared immutable field table, so no synchronization
/// is needed beyond collecting the results.
pub fn render_neighborhood(
    field: &SpatialField,
    center: ChunkCoord,
    radius: i64,
    scale: u32,
    grid_lines: bool,
) -> RgbImage {
    let radius = radius.max(0);
    let scale = scale.max(1);
    let across = (2 * radius + 1) as u32;
    let chunk_px = CHUNK_SIZE as u32 * scale;

    let coords: Vec<ChunkCoord> = (-radius..=radius)
        .flat_map(|dy| (-radius..=radius).map(move |dx| ChunkCoord::new(center.x + dx, center.y + dy)))
        .collect();
    let chunks: Vec<(ChunkCoord, ChunkGrid)> = coords
        .into_par_iter()
        .map(|coord| (coord, generate_chunk(coord, field)))
        .collect();

    let mut img: RgbImage = ImageBuffer::new(across * chunk_px, across * chunk_px);

    for (coord, grid) in &chunks {
        let ox = (coord.x - center.x + radius) as u32 * chunk_px;
        let oy = (coord.y - center.y + radius) as u32 * chunk_px;
        for (x, y, cell) in grid.iter() {
            let color = cell_color(cell);
            blit_cell_at(&mut img, ox + x as u32 * scale, oy + y as u32 * scale, scale, color);
        }
    }

    if grid_lines {
        draw_chunk_grid(&mut img, across, chunk_px);
    }

    img
}

/// Export a stitched neighborhood as a PNG.
pub fn export_neighborhood(
    field: &SpatialField,
    center: ChunkCoord,
    radius: i64,
    scale: u32,
    grid_lines: bool,
    path: &str,
) -> Result<(), image::ImageError> {
    render_neighborhood(field, center, radius, scale, grid_lines).save(path)
}

fn blit_cell(img: &mut RgbImage, cx: u32, cy: u32, scale: u32, color: Rgb<u8>) {
    blit_cell_at(img, cx * scale, cy * scale, scale, color);
}

fn blit_cell_at(img: &mut RgbImage, px: u32, py: u32, scale: u32, color: Rgb<u8>) {
    for dy in 0..scale {
        for dx in 0..scale {
            img.put_pixel(px + dx, py + dy, color);
        }
    }
}

/// One-pixel lines along every chunk edge of the stitched image.
fn draw_chunk_grid(img: &mut RgbImage, across: u32, chunk_px: u32) {
    let extent = across * chunk_px;
    for line in 0..=across {
        let at = (line * chunk_px).min(extent - 1);
        for p in 0..extent {
            img.put_pixel(at, p, Rgb(GRID_LINE_COLOR));
            img.put_pixel(p, at, Rgb(GRID_LINE_COLOR));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_image_dimensions() {
        let field = SpatialField::new();
        let grid = generate_chunk(ChunkCoord::new(0, 0), &field);
        let img = render_chunk_image(&grid, 3);
        assert_eq!(img.width(), CHUNK_SIZE as u32 * 3);
        assert_eq!(img.height(), CHUNK_SIZE as u32 * 3);
    }

    #[test]
    fn test_neighborhood_dimensions_and_center_match() {
        let field = SpatialField::new();
        let center = ChunkCoord::new(1, -1);
        let img = render_neighborhood(&field, center, 1, 1, false);
        let chunk_px = CHUNK_SIZE as u32;
        assert_eq!(img.width(), 3 * chunk_px);
        assert_eq!(img.height(), 3 * chunk_px);

        // The middle tile of the stitched image is the center chunk.
        let grid = generate_chunk(center, &field);
        for (x, y, cell) in grid.iter() {
            let px = img.get_pixel(chunk_px + x as u32, chunk_px + y as u32);
            assert_eq!(*px, cell_color(cell));
        }
    }

    #[test]
    fn test_seams_are_continuous_in_stitched_image() {
        // Along the seam between the center chunk and its south neighbor,
        // both half-edges of every declared opening read as floor pixels.
        use crate::boundary::BoundaryConstraints;

        let field = SpatialField::new();
        let center = ChunkCoord::new(0, 0);
        let img = render_neighborhood(&field, center, 1, 1, false);
        let chunk_px = CHUNK_SIZE as u32;

        let constraints = BoundaryConstraints::resolve(0, 0, CHUNK_SIZE);
        for &x in &constraints.south {
            let last_row_of_center = chunk_px + (CHUNK_SIZE as u32 - 1);
            let first_row_of_south = 2 * chunk_px;
            assert_eq!(*img.get_pixel(chunk_px + x as u32, last_row_of_center), Rgb(FLOOR_COLOR));
            assert_eq!(*img.get_pixel(chunk_px + x as u32, first_row_of_south), Rgb(FLOOR_COLOR));
        }
    }
}
