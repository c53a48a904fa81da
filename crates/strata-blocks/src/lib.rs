//! Block ids, render passes, the terrain atlas and the TOML-configured block registry.
#![forbid(unsafe_code)]

pub mod atlas;
pub mod config;
pub mod registry;
pub mod types;

pub use atlas::{TerrainAtlas, TexRect};
pub use registry::{BlockRegistry, BlockType, RegistryError};
pub use types::{AIR, BlockId, FaceRole, RenderPass, Shape};
