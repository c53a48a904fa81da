pub const CHUNK_SIZE: usize = 16;

mod chunk_coord;
pub mod generation;
mod world;

pub use chunk_coord::ChunkCoord;
pub use world::World;
