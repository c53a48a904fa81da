use fastnoise_lite::{FastNoiseLite, NoiseType};
use strata_blocks::{AIR, BlockId, BlockRegistry};

use super::World;
use crate::worldgen::{Mode, WorldGenConfig};

/// Block ids the generator places, resolved by name once up front.
/// Names missing from the registry resolve to air and are skipped.
#[derive(Clone, Copy, Debug)]
struct Palette {
    stone: BlockId,
    dirt: BlockId,
    grass: BlockId,
    sand: BlockId,
    water: BlockId,
    plants: [BlockId; 3],
}

impl Palette {
    fn resolve(reg: &BlockRegistry) -> Self {
        Self {
            stone: reg.id_or_air("stone"),
            dirt: reg.id_or_air("dirt"),
            grass: reg.id_or_air("grass"),
            sand: reg.id_or_air("sand"),
            water: reg.id_or_air("water"),
            plants: [
                reg.id_or_air("tall_grass"),
                reg.id_or_air("rose"),
                reg.id_or_air("dandelion"),
            ],
        }
    }
}

/// Fills `world` from scratch according to `cfg`.
pub fn generate(world: &mut World, cfg: &WorldGenConfig, seed: i32, reg: &BlockRegistry) {
    let palette = Palette::resolve(reg);
    let t0 = std::time::Instant::now();
    match cfg.mode {
        Mode::Flat => generate_flat(world, cfg, &palette),
        Mode::Normal => generate_normal(world, cfg, seed, &palette),
    }
    log::info!(
        "worldgen mode={:?} size={}x{}x{} solid={} ms={}",
        cfg.mode,
        world.size_x(),
        world.size_y(),
        world.size_z(),
        world.solid_count(),
        t0.elapsed().as_millis()
    );
}

fn generate_flat(world: &mut World, cfg: &WorldGenConfig, p: &Palette) {
    let top = cfg.flat.thickness.clamp(1, world.size_y() as i32) - 1;
    let sx = world.size_x() as i32 - 1;
    let sz = world.size_z() as i32 - 1;
    if top > 1 {
        world.fill((0, 0, 0), (sx, top - 2, sz), p.stone);
    }
    if top > 0 {
        world.fill((0, top - 1, 0), (sx, top - 1, sz), p.dirt);
    }
    world.fill((0, top, 0), (sx, top, sz), p.grass);
}

fn generate_normal(world: &mut World, cfg: &WorldGenConfig, seed: i32, p: &Palette) {
    let mut noise = FastNoiseLite::with_seed(seed);
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_frequency(Some(cfg.height.frequency));

    let size_y = world.size_y() as f32;
    let min_h = (size_y * cfg.height.min_y_ratio) as i32;
    let max_h = (size_y * cfg.height.max_y_ratio) as i32;
    let sea = if cfg.water.enable && p.water != AIR {
        Some((size_y * cfg.water.level_ratio) as i32)
    } else {
        None
    };
    let topsoil = cfg.height.topsoil.max(0);

    for z in 0..world.size_z() as i32 {
        for x in 0..world.size_x() as i32 {
            let h = noise.get_noise_2d(x as f32, z as f32);
            // [-1,1] -> [min_h, max_h]
            let hh = ((h + 1.0) * 0.5 * (max_h - min_h) as f32) as i32 + min_h;
            let height = hh.clamp(1, world.size_y() as i32 - 1);
            let shore = sea.is_some_and(|s| height <= s + 1);

            for y in 0..height {
                let b = if y == height - 1 {
                    if shore { p.sand } else { p.grass }
                } else if y + topsoil >= height {
                    if shore { p.sand } else { p.dirt }
                } else {
                    p.stone
                };
                world.set_block(x, y, z, b);
            }

            if let Some(level) = sea {
                for y in height..=level {
                    world.set_block(x, y, z, p.water);
                }
            }

            if !shore && p.grass != AIR {
                if let Some(plant) = pick_plant(x, z, seed, cfg.plants.density, &p.plants) {
                    world.set_block(x, height, z, plant);
                }
            }
        }
    }
}

fn pick_plant(x: i32, z: i32, seed: i32, density: f32, plants: &[BlockId; 3]) -> Option<BlockId> {
    if density <= 0.0 {
        return None;
    }
    let h = column_hash(x, z, seed);
    let roll = (h & 0xFFFF) as f32 / 65536.0;
    if roll >= density {
        return None;
    }
    // Grass dominates, flowers are the rare remainder
    let kind = match (h >> 16) % 10 {
        0 => plants[1],
        1 => plants[2],
        _ => plants[0],
    };
    (kind != AIR).then_some(kind)
}

#[inline]
fn column_hash(x: i32, z: i32, seed: i32) -> u32 {
    let mut h = (x as u32).wrapping_mul(0x9E37_79B1)
        ^ (z as u32).wrapping_mul(0x85EB_CA77)
        ^ (seed as u32).wrapping_mul(0xC2B2_AE3D);
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    h ^= h >> 12;
    h = h.wrapping_mul(0x297A_2D39);
    h ^ (h >> 15)
}
