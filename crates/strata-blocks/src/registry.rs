use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use thiserror::Error;

use super::atlas::{TerrainAtlas, TexRect};
use super::config::{BlockDef, BlocksConfig, ShapeConfig, ShapeDetailed, TexturesDef};
use super::types::{AIR, BlockId, FaceRole, RenderPass, Shape};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("block '{0}' uses id 0, which is reserved for air")]
    ReservedAirId(String),
    #[error("block id {id} defined by both '{first}' and '{second}'")]
    DuplicateId {
        id: BlockId,
        first: String,
        second: String,
    },
    #[error("block name '{0}' defined twice")]
    DuplicateName(String),
    #[error("block '{name}' has unknown shape '{kind}'")]
    UnknownShape { name: String, kind: String },
    #[error("block '{name}' has height {height}, expected a value in (0, 1]")]
    InvalidHeight { name: String, height: f32 },
    #[error("block '{0}' is opaque but not in the solid pass")]
    OpaqueNotSolid(String),
    #[error("block '{block}' references unknown texture '{texture}'")]
    UnknownTexture { block: String, texture: String },
}

/// A compiled block type. Texture rectangles are resolved once at load time.
#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub shape: Shape,
    pub pass: RenderPass,
    pub opaque: bool,
    pub cull_same: bool,
    pub tex_top: TexRect,
    pub tex_bottom: TexRect,
    pub tex_side: TexRect,
    /// Atlas cell height in V units, copied from the atlas.
    pub inv_element_v: f32,
}

impl BlockType {
    #[inline]
    pub fn height(&self) -> f32 {
        match self.shape {
            Shape::Partial { height } => height,
            Shape::Cube | Shape::Sprite => 1.0,
        }
    }

    #[inline]
    pub fn tex_for(&self, role: FaceRole) -> TexRect {
        match role {
            FaceRole::Top => self.tex_top,
            FaceRole::Bottom => self.tex_bottom,
            FaceRole::Side => self.tex_side,
        }
    }

    /// Occupies its whole cell and hides whatever it touches on every side.
    #[inline]
    pub fn is_full_opaque(&self) -> bool {
        self.opaque && matches!(self.shape, Shape::Cube)
    }
}

#[derive(Clone, Debug)]
pub struct BlockRegistry {
    pub atlas: TerrainAtlas,
    blocks: Vec<Option<BlockType>>,
    by_name: HashMap<String, BlockId>,
}

impl BlockRegistry {
    pub fn new(atlas: TerrainAtlas) -> Self {
        Self {
            atlas,
            blocks: vec![None; 256],
            by_name: HashMap::new(),
        }
    }

    /// Looks up a block type. Air and undefined ids return `None`.
    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks[id as usize].as_ref()
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    /// Like [`Self::id_by_name`] but falls back to air.
    pub fn id_or_air(&self, name: &str) -> BlockId {
        self.id_by_name(name).unwrap_or(AIR)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockType> {
        self.blocks.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn load_from_paths(
        atlas_path: impl AsRef<Path>,
        blocks_path: impl AsRef<Path>,
    ) -> Result<Self, Box<dyn Error>> {
        let atlas = TerrainAtlas::from_path(atlas_path)?;
        let blocks_toml = fs::read_to_string(blocks_path)?;
        let blocks_cfg: BlocksConfig = toml::from_str(&blocks_toml)?;
        Ok(Self::from_configs(atlas, blocks_cfg)?)
    }

    pub fn from_toml_strs(atlas_toml: &str, blocks_toml: &str) -> Result<Self, Box<dyn Error>> {
        let atlas = TerrainAtlas::from_toml_str(atlas_toml)?;
        let blocks_cfg: BlocksConfig = toml::from_str(blocks_toml)?;
        Ok(Self::from_configs(atlas, blocks_cfg)?)
    }

    pub fn from_configs(atlas: TerrainAtlas, cfg: BlocksConfig) -> Result<Self, RegistryError> {
        let mut reg = BlockRegistry::new(atlas);
        for def in cfg.blocks.into_iter() {
            reg.insert(def)?;
        }
        Ok(reg)
    }

    /// Compiles and registers one block definition.
    pub fn insert(&mut self, def: BlockDef) -> Result<BlockId, RegistryError> {
        if def.id == AIR {
            return Err(RegistryError::ReservedAirId(def.name));
        }
        if let Some(existing) = self.get(def.id) {
            return Err(RegistryError::DuplicateId {
                id: def.id,
                first: existing.name.clone(),
                second: def.name,
            });
        }
        if self.by_name.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name));
        }

        let shape = compile_shape(&def.name, def.shape)?;
        let pass = def.pass.unwrap_or(match shape {
            Shape::Sprite => RenderPass::Sprite,
            Shape::Cube | Shape::Partial { .. } => RenderPass::Solid,
        });
        let opaque = def
            .opaque
            .unwrap_or(pass == RenderPass::Solid && shape != Shape::Sprite);
        if opaque && pass != RenderPass::Solid {
            return Err(RegistryError::OpaqueNotSolid(def.name));
        }
        let cull_same = def.cull_same.unwrap_or(pass == RenderPass::Translucent);
        let [tex_top, tex_bottom, tex_side] =
            compile_textures(&self.atlas, &def.name, def.textures.unwrap_or_default())?;

        let ty = BlockType {
            id: def.id,
            name: def.name,
            shape,
            pass,
            opaque,
            cull_same,
            tex_top,
            tex_bottom,
            tex_side,
            inv_element_v: self.atlas.inv_element_size_v(),
        };
        let id = ty.id;
        self.by_name.insert(ty.name.clone(), id);
        self.blocks[id as usize] = Some(ty);
        Ok(id)
    }
}

fn compile_shape(name: &str, shape: Option<ShapeConfig>) -> Result<Shape, RegistryError> {
    let (kind, height) = match shape {
        None => ("cube".to_string(), None),
        Some(ShapeConfig::Simple(kind)) => (kind, None),
        Some(ShapeConfig::Detailed(ShapeDetailed { kind, height })) => (kind, height),
    };
    match kind.as_str() {
        "cube" => Ok(Shape::Cube),
        "sprite" => Ok(Shape::Sprite),
        "partial" => {
            let h = height.unwrap_or(0.5);
            if !(h > 0.0 && h <= 1.0) {
                return Err(RegistryError::InvalidHeight {
                    name: name.to_string(),
                    height: h,
                });
            }
            // A full-height partial is just a cube
            if h == 1.0 {
                Ok(Shape::Cube)
            } else {
                Ok(Shape::Partial { height: h })
            }
        }
        _ => Err(RegistryError::UnknownShape {
            name: name.to_string(),
            kind,
        }),
    }
}

// Returns [top, bottom, side]
fn compile_textures(
    atlas: &TerrainAtlas,
    block: &str,
    tex: TexturesDef,
) -> Result<[TexRect; 3], RegistryError> {
    let resolve = |sel: Option<&String>| -> Result<TexRect, RegistryError> {
        match sel {
            None => Ok(atlas.tex_rect(0)),
            Some(t) => atlas
                .texture_id(t)
                .map(|i| atlas.tex_rect(i))
                .ok_or_else(|| RegistryError::UnknownTexture {
                    block: block.to_string(),
                    texture: t.clone(),
                }),
        }
    };
    let all = tex.all.as_ref();
    Ok([
        resolve(tex.top.as_ref().or(all))?,
        resolve(tex.bottom.as_ref().or(all))?,
        resolve(tex.side.as_ref().or(all))?,
    ])
}
