use std::error::Error;
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use strata_blocks::{AIR, BlockRegistry};
use strata_mesh::{FacePalette, publish_cpu};
use strata_render::{BufferId, FrameStats, SectionCache, SoftwareBackend, render_frame};
use strata_runtime::{JobOut, Runtime, SectionRevisions};
use strata_world::voxel::generation::generate;
use strata_world::{ChunkCoord, World};

use crate::config::AppConfig;

const RESULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Copy, Debug, Default)]
pub struct Summary {
    pub sections: usize,
    pub published: usize,
    pub stale_dropped: usize,
    pub edit_rebuilds: usize,
    pub frame: FrameStats,
    pub failed_uploads: usize,
    pub peak_bytes: usize,
}

/// GPU-side state owned by the publishing thread.
struct Publisher {
    backend: SoftwareBackend,
    cache: SectionCache<BufferId>,
    revs: SectionRevisions,
}

impl Publisher {
    /// Publishes a finished job unless a newer revision was requested since.
    fn accept(&mut self, out: JobOut, summary: &mut Summary) {
        if !self.revs.is_current(out.coord, out.rev) {
            summary.stale_dropped += 1;
            log::debug!(
                "drop stale mesh ({},{},{}) rev={} current={}",
                out.coord.cx,
                out.coord.cy,
                out.coord.cz,
                out.rev,
                self.revs.current(out.coord)
            );
            return;
        }
        let info = publish_cpu(&mut self.backend, &out.cpu);
        self.cache.insert(&mut self.backend, out.coord, info);
        summary.published += 1;
        summary.peak_bytes = summary.peak_bytes.max(self.backend.used_bytes());
        log::debug!(
            target: "perf",
            "ms={} wait_ms={} mesher_job cx={} cy={} cz={} verts={}",
            out.t_mesh_ms,
            out.t_wait_ms,
            out.coord.cx,
            out.coord.cy,
            out.coord.cz,
            out.cpu.total_vertices()
        );
    }

    fn collect(&mut self, rt: &Runtime, n: usize, summary: &mut Summary) -> Result<(), Box<dyn Error>> {
        for got in 0..n {
            let out = rt
                .recv_result(RESULT_TIMEOUT)
                .ok_or_else(|| format!("mesh workers stalled after {got} of {n} results"))?;
            self.accept(out, summary);
        }
        Ok(())
    }
}

/// Highest non-air y in a column, if any.
fn surface_y(world: &World, x: i32, z: i32) -> Option<i32> {
    (0..world.size_y() as i32)
        .rev()
        .find(|&y| world.get(x, y, z).is_some_and(|b| b != AIR))
}

/// Loads assets, generates a world, meshes every section on the worker pool,
/// publishes the results, replays a pair of block edits and draws one frame.
pub fn run(cfg: &AppConfig, assets: &Path) -> Result<Summary, Box<dyn Error>> {
    let reg = Arc::new(BlockRegistry::load_from_paths(
        assets.join("atlas.toml"),
        assets.join("blocks.toml"),
    )?);
    log::info!("registry loaded blocks={}", reg.len());

    let t0 = Instant::now();
    let mut world = World::new(cfg.world.chunks_x, cfg.world.chunks_y, cfg.world.chunks_z);
    generate(&mut world, &cfg.worldgen, cfg.world.seed, &reg);
    log::info!(
        "world {}x{}x{} generated in {}ms solid={}",
        world.size_x(),
        world.size_y(),
        world.size_z(),
        t0.elapsed().as_millis(),
        world.solid_count()
    );
    let sections: Vec<ChunkCoord> = world.sections().collect();
    let (cx, cz) = (world.size_x() as i32 / 2, world.size_z() as i32 / 2);
    let world = Arc::new(RwLock::new(world));

    let rt = Runtime::new(
        Arc::clone(&world),
        Arc::clone(&reg),
        cfg.runtime.workers,
        FacePalette::from_sun(cfg.render.sun),
    );
    let mut publisher = Publisher {
        backend: match cfg.budget_bytes() {
            Some(bytes) => SoftwareBackend::with_budget(bytes),
            None => SoftwareBackend::new(),
        },
        cache: SectionCache::new(),
        revs: SectionRevisions::new(),
    };
    let atlas = publisher.backend.load_texture("atlas");
    let mut summary = Summary {
        sections: sections.len(),
        ..Summary::default()
    };

    let t_mesh = Instant::now();
    for &coord in &sections {
        let rev = publisher.revs.bump(coord);
        rt.submit_bg(coord, rev);
    }
    publisher.collect(&rt, sections.len(), &mut summary)?;
    log::info!(
        "meshed {} sections in {}ms cached={} vertices={}",
        sections.len(),
        t_mesh.elapsed().as_millis(),
        publisher.cache.len(),
        publisher.cache.total_vertices()
    );

    // Place then break a block on the surface; the first rebuild goes stale
    if let (Some(y), Some(id)) = (
        world.read().ok().and_then(|w| surface_y(&w, cx, cz)),
        reg.id_by_name("cobblestone"),
    ) {
        let mut submitted = 0;
        for placed in [id, AIR] {
            let touched = {
                let mut w = world.write().map_err(|_| "world lock poisoned")?;
                if !w.set_block(cx, y + 1, cz, placed) {
                    break;
                }
                publisher.revs.bump_block(&w, cx, y + 1, cz)
            };
            for (coord, rev) in touched {
                rt.submit_edit(coord, rev);
                submitted += 1;
            }
        }
        publisher.collect(&rt, submitted, &mut summary)?;
        summary.edit_rebuilds = submitted;
    }

    let eye = ChunkCoord::containing(cx, 0, cz);
    let frame = render_frame(&mut publisher.backend, &publisher.cache, atlas, eye)?;
    summary.frame = frame;
    summary.failed_uploads = publisher.backend.stats().failed_uploads;

    publisher.cache.clear(&mut publisher.backend);
    log::info!(
        "released cache live_buffers={} used_bytes={}",
        publisher.backend.live_buffers(),
        publisher.backend.used_bytes()
    );
    Ok(summary)
}
