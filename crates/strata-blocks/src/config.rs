use serde::Deserialize;
use std::collections::HashMap;

use crate::types::RenderPass;

// Top-level blocks config file
#[derive(Deserialize, Debug)]
pub struct BlocksConfig {
    pub blocks: Vec<BlockDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    pub id: u8,
    #[serde(default)]
    pub shape: Option<ShapeConfig>,
    // Defaults: sprite shapes draw in the sprite pass, everything else solid
    #[serde(default)]
    pub pass: Option<RenderPass>,
    #[serde(default)]
    pub opaque: Option<bool>,
    // Hide faces shared with the same block (glass, water)
    #[serde(default)]
    pub cull_same: Option<bool>,
    #[serde(default)]
    pub textures: Option<TexturesDef>,
}

// Shape config supports either a simple string ("cube") or a detailed table
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum ShapeConfig {
    Simple(String),
    Detailed(ShapeDetailed),
}

#[derive(Deserialize, Debug, Clone)]
pub struct ShapeDetailed {
    pub kind: String,
    #[serde(default)]
    pub height: Option<f32>,
}

// Texture mapping: all/top/bottom/side, each an atlas texture name
#[derive(Deserialize, Debug, Clone, Default)]
pub struct TexturesDef {
    #[serde(default)]
    pub all: Option<String>,
    #[serde(default)]
    pub top: Option<String>,
    #[serde(default)]
    pub bottom: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
}

// Atlas file: grid dimensions plus named cells
#[derive(Deserialize, Debug)]
pub struct AtlasConfig {
    pub atlas: AtlasDims,
    #[serde(default)]
    pub textures: HashMap<String, u16>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct AtlasDims {
    pub columns: u16,
    pub rows: u16,
}
