use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub flat: Flat,
    #[serde(default)]
    pub height: Height,
    #[serde(default)]
    pub water: Water,
    #[serde(default)]
    pub plants: Plants,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Normal,
    Flat,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Flat {
    #[serde(default = "default_flat_thickness")]
    pub thickness: i32,
}
fn default_flat_thickness() -> i32 {
    4
}
impl Default for Flat {
    fn default() -> Self {
        Self {
            thickness: default_flat_thickness(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Height {
    #[serde(default = "default_height_frequency")]
    pub frequency: f32,
    #[serde(default = "default_min_y_ratio")]
    pub min_y_ratio: f32,
    #[serde(default = "default_max_y_ratio")]
    pub max_y_ratio: f32,
    #[serde(default = "default_topsoil")]
    pub topsoil: i32,
}
fn default_height_frequency() -> f32 {
    0.02
}
fn default_min_y_ratio() -> f32 {
    0.2
}
fn default_max_y_ratio() -> f32 {
    0.7
}
fn default_topsoil() -> i32 {
    3
}
impl Default for Height {
    fn default() -> Self {
        Self {
            frequency: default_height_frequency(),
            min_y_ratio: default_min_y_ratio(),
            max_y_ratio: default_max_y_ratio(),
            topsoil: default_topsoil(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Water {
    #[serde(default = "default_true")]
    pub enable: bool,
    #[serde(default = "default_water_level_ratio")]
    pub level_ratio: f32,
}
fn default_true() -> bool {
    true
}
fn default_water_level_ratio() -> f32 {
    0.35
}
impl Default for Water {
    fn default() -> Self {
        Self {
            enable: true,
            level_ratio: default_water_level_ratio(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Plants {
    // Fraction of grass tops that sprout a plant, 0 disables
    #[serde(default = "default_plant_density")]
    pub density: f32,
}
fn default_plant_density() -> f32 {
    0.08
}
impl Default for Plants {
    fn default() -> Self {
        Self {
            density: default_plant_density(),
        }
    }
}

impl WorldGenConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}
