//! Block grid access, section coordinates and the dense finite world.
#![forbid(unsafe_code)]

pub mod grid;
pub mod voxel;
pub mod worldgen;

pub use grid::{BlockGrid, FnGrid};
pub use voxel::{CHUNK_SIZE, ChunkCoord, World};
pub use worldgen::WorldGenConfig;
