//! Deterministic chunked dungeon generation
//!
//! Re-exports modules for use by binaries and tools.

pub mod ascii;
pub mod boundary;
pub mod cache;
pub mod carver;
pub mod chunk;
pub mod explorer;
pub mod export;
pub mod field;
pub mod grid;
pub mod rooms;
pub mod seeds;
pub mod timing;
