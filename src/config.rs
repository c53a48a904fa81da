use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use strata_world::WorldGenConfig;

/// Everything the binary reads from `strata.toml`. Every key is optional.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub world: WorldSection,
    #[serde(default)]
    pub worldgen: WorldGenConfig,
    #[serde(default)]
    pub runtime: RuntimeSection,
    #[serde(default)]
    pub render: RenderSection,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WorldSection {
    #[serde(default = "default_chunks_xz")]
    pub chunks_x: usize,
    #[serde(default = "default_chunks_y")]
    pub chunks_y: usize,
    #[serde(default = "default_chunks_xz")]
    pub chunks_z: usize,
    #[serde(default = "default_seed")]
    pub seed: i32,
}
fn default_chunks_xz() -> usize {
    4
}
fn default_chunks_y() -> usize {
    2
}
fn default_seed() -> i32 {
    1337
}
impl Default for WorldSection {
    fn default() -> Self {
        Self {
            chunks_x: default_chunks_xz(),
            chunks_y: default_chunks_y(),
            chunks_z: default_chunks_xz(),
            seed: default_seed(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RuntimeSection {
    // 0 uses every available core
    #[serde(default)]
    pub workers: usize,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RenderSection {
    // Vertex memory cap in MiB, unlimited when absent
    #[serde(default)]
    pub budget_mb: Option<usize>,
    #[serde(default = "default_sun")]
    pub sun: [u8; 3],
}
fn default_sun() -> [u8; 3] {
    [255, 255, 255]
}
impl Default for RenderSection {
    fn default() -> Self {
        Self {
            budget_mb: None,
            sun: default_sun(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: AppConfig = toml::from_str(s)?;
        if cfg.world.chunks_x == 0 || cfg.world.chunks_y == 0 || cfg.world.chunks_z == 0 {
            return Err("world dimensions must be at least one section".into());
        }
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn budget_bytes(&self) -> Option<usize> {
        self.render.budget_mb.map(|mb| mb.saturating_mul(1024 * 1024))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_world::worldgen::Mode;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = AppConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.world.chunks_x, 4);
        assert_eq!(cfg.world.chunks_y, 2);
        assert_eq!(cfg.runtime.workers, 0);
        assert_eq!(cfg.budget_bytes(), None);
        assert_eq!(cfg.worldgen.mode, Mode::Normal);
    }

    #[test]
    fn sections_override_defaults() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [world]
            chunks_x = 1
            seed = 7
            [worldgen]
            mode = "flat"
            [render]
            budget_mb = 2
            sun = [200, 180, 160]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.world.chunks_x, 1);
        assert_eq!(cfg.world.chunks_z, 4);
        assert_eq!(cfg.world.seed, 7);
        assert_eq!(cfg.worldgen.mode, Mode::Flat);
        assert_eq!(cfg.budget_bytes(), Some(2 * 1024 * 1024));
        assert_eq!(cfg.render.sun, [200, 180, 160]);
    }

    #[test]
    fn zero_sized_world_is_rejected() {
        assert!(AppConfig::from_toml_str("[world]\nchunks_y = 0\n").is_err());
    }
}
