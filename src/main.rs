use clap::Parser;

use dungeon_generator::ascii;
use dungeon_generator::boundary::BoundaryConstraints;
use dungeon_generator::chunk::{generate_chunk, ChunkCoord, ChunkResponse};
use dungeon_generator::explorer;
use dungeon_generator::export;
use dungeon_generator::field::SpatialField;
use dungeon_generator::grid::CHUNK_SIZE;

/// Largest coordinate magnitude the serving layer accepts. The generator
/// itself never validates; rejection happens here.
const MAX_COORDINATE: i64 = 1_000_000;

#[derive(Parser, Debug)]
#[command(name = "dungeon_generator")]
#[command(about = "Generate deterministic dungeon chunks with seamless boundaries")]
struct Args {
    /// Chunk X coordinate
    #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
    x: i64,

    /// Chunk Y coordinate
    #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
    y: i64,

    /// Print the chunk as JSON (row strings, the map API payload shape)
    #[arg(long)]
    json: bool,

    /// Include debug metrics (parameters, band wavelengths, stage timings)
    #[arg(long)]
    debug: bool,

    /// Export a stitched PNG of the chunk neighborhood to this path
    #[arg(long)]
    export: Option<String>,

    /// Radius in chunks for the stitched export
    #[arg(long, default_value = "1")]
    radius: i64,

    /// Pixel scale per cell for PNG export
    #[arg(long, default_value = "4")]
    scale: u32,

    /// Draw chunk boundary lines in the export
    #[arg(long)]
    grid_lines: bool,

    /// Write the chunk to a text file with header and statistics
    #[arg(long)]
    out_file: Option<String>,

    /// Launch the interactive chunk explorer
    #[arg(long)]
    explore: bool,
}

fn main() {
    let args = Args::parse();

    if args.x.abs() > MAX_COORDINATE || args.y.abs() > MAX_COORDINATE {
        eprintln!(
            "Invalid chunk coordinates ({}, {}): magnitude limit is {}",
            args.x, args.y, MAX_COORDINATE
        );
        std::process::exit(2);
    }

    // The one piece of shared state, built before any generation starts.
    let field = SpatialField::new();
    let coord = ChunkCoord::new(args.x, args.y);

    if args.explore {
        if let Err(e) = explorer::run_explorer(&field, coord) {
            eprintln!("Explorer error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    if let Some(path) = &args.export {
        println!(
            "Exporting {}x{} chunk neighborhood around {}...",
            2 * args.radius + 1,
            2 * args.radius + 1,
            coord
        );
        match export::export_neighborhood(&field, coord, args.radius, args.scale, args.grid_lines, path)
        {
            Ok(()) => println!("Wrote {}", path),
            Err(e) => {
                eprintln!("Export failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if let Some(path) = &args.out_file {
        let grid = generate_chunk(coord, &field);
        if let Err(e) = ascii::export_chunk_file(&grid, &field, args.x, args.y, path) {
            eprintln!("Export failed: {}", e);
            std::process::exit(1);
        }
        println!("Wrote {}", path);
        return;
    }

    let response = ChunkResponse::build(coord, &field, args.debug);

    if args.json {
        match serde_json::to_string_pretty(&response) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Serialization failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    for row in &response.grid {
        println!("{}", row);
    }

    let (alpha, beta) = field.spatial_parameters(args.x, args.y);
    let constraints = BoundaryConstraints::resolve(args.x, args.y, CHUNK_SIZE);
    let floor: usize = response
        .grid
        .iter()
        .map(|row| row.chars().filter(|&c| c == ' ').count())
        .sum();
    println!();
    println!(
        "Chunk {}: {}x{}, alpha {:.3}, beta {:.3}, floor {:.1}%",
        coord,
        CHUNK_SIZE,
        CHUNK_SIZE,
        alpha,
        beta,
        100.0 * floor as f64 / (CHUNK_SIZE * CHUNK_SIZE) as f64
    );
    println!(
        "Boundary openings: N={} S={} E={} W={}",
        constraints.north.len(),
        constraints.south.len(),
        constraints.east.len(),
        constraints.west.len()
    );

    if let Some(info) = &response.debug {
        println!("Variation: {:+.3}", info.variation);
        println!("Band wavelengths: {:?}", info.band_wavelengths);
        for stage in &info.stage_ms {
            println!("  {:<10} {:.3} ms", stage.stage, stage.ms);
        }
    }
}
