use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use crate::config::AtlasConfig;

/// Normalized texture rectangle inside the atlas.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TexRect {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

/// A 2D terrain atlas: a `columns x rows` grid of equally sized texture cells.
#[derive(Clone, Debug)]
pub struct TerrainAtlas {
    pub columns: u16,
    pub rows: u16,
    pub by_name: HashMap<String, u16>,
}

impl TerrainAtlas {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
            by_name: HashMap::new(),
        }
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn texture_id(&self, name: &str) -> Option<u16> {
        self.by_name.get(name).copied()
    }

    /// Names a cell. Returns `false` if the index lies outside the grid.
    pub fn insert(&mut self, name: impl Into<String>, index: u16) -> bool {
        if index as usize >= self.cell_count() {
            return false;
        }
        self.by_name.insert(name.into(), index);
        true
    }

    /// Height of one cell in V units, used to shift V for partial-height blocks.
    #[inline]
    pub fn inv_element_size_v(&self) -> f32 {
        1.0 / self.rows as f32
    }

    #[inline]
    pub fn inv_element_size_u(&self) -> f32 {
        1.0 / self.columns as f32
    }

    /// Rectangle of cell `index`, laid out row-major from the top-left.
    pub fn tex_rect(&self, index: u16) -> TexRect {
        let col = index % self.columns;
        let row = index / self.columns;
        let du = self.inv_element_size_u();
        let dv = self.inv_element_size_v();
        let u0 = col as f32 * du;
        let v0 = row as f32 * dv;
        TexRect {
            u0,
            v0,
            u1: u0 + du,
            v1: v0 + dv,
        }
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: AtlasConfig = toml::from_str(toml_str)?;
        let mut atlas = TerrainAtlas::new(cfg.atlas.columns, cfg.atlas.rows);
        for (name, index) in cfg.textures {
            if !atlas.insert(name.clone(), index) {
                return Err(format!(
                    "texture '{name}' uses cell {index} outside the {}x{} atlas",
                    atlas.columns, atlas.rows
                )
                .into());
            }
        }
        Ok(atlas)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}
