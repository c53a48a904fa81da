use std::time::Instant;

use strata_blocks::{AIR, RenderPass};
use strata_geom::{Aabb, Vec3};
use strata_world::{BlockGrid, ChunkCoord};

use crate::chunk::ChunkMeshCpu;
use crate::constants::{FACE_COUNT, FLAG_COUNT, SECTION};
use crate::face::Face;
use crate::model::{BlockModel, FacePalette, ModelRegistry};
use crate::padded::{PaddedVolume, SampleFlags};
use crate::pass::PassTable;
use crate::publish::{GraphicsBackend, SectionDrawInfo, publish_passes};
use crate::vertex::Vertex;

/// Summary of the last rebuild.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub coord: ChunkCoord,
    pub flags: SampleFlags,
    pub visible_faces: u32,
    pub vertices: [usize; RenderPass::COUNT],
    pub sample_ms: u32,
    pub total_ms: u32,
}

impl BuildStats {
    #[inline]
    pub fn skipped(&self) -> bool {
        self.flags.is_degenerate()
    }

    pub fn total_vertices(&self) -> usize {
        self.vertices.iter().sum()
    }
}

fn elapsed_ms(start: Instant) -> u32 {
    start.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

/// Index into the draw-flag table for interior block `(lx, ly, lz)`.
#[inline]
pub fn flag_index(lx: usize, ly: usize, lz: usize, face: Face) -> usize {
    ((ly << 8) + (lz << 4) + lx) * FACE_COUNT + face.index()
}

/// Rebuilds section meshes with scratch state reused across calls.
///
/// One builder serves one thread; run one per worker for concurrent meshing.
pub struct ChunkMeshBuilder {
    volume: PaddedVolume,
    flags: Box<[u8]>,
    passes: PassTable,
    palette: FacePalette,
    stats: BuildStats,
}

impl Default for ChunkMeshBuilder {
    fn default() -> Self {
        Self::new(FacePalette::default())
    }
}

impl ChunkMeshBuilder {
    pub fn new(palette: FacePalette) -> Self {
        Self {
            volume: PaddedVolume::new(),
            flags: vec![0u8; FLAG_COUNT].into_boxed_slice(),
            passes: PassTable::default(),
            palette,
            stats: BuildStats::default(),
        }
    }

    #[inline]
    pub fn palette(&self) -> &FacePalette {
        &self.palette
    }

    #[inline]
    pub fn last_stats(&self) -> BuildStats {
        self.stats
    }

    #[inline]
    pub fn volume(&self) -> &PaddedVolume {
        &self.volume
    }

    #[inline]
    pub fn passes(&self) -> &PassTable {
        &self.passes
    }

    /// Vertices written for `pass` by the last rebuild.
    #[inline]
    pub fn pass_vertices(&self, pass: RenderPass) -> &[Vertex] {
        self.passes[pass].filled()
    }

    /// Whether the last rebuild flagged `face` of interior block `(lx, ly, lz)`.
    #[inline]
    pub fn draw_flag(&self, lx: usize, ly: usize, lz: usize, face: Face) -> bool {
        self.flags[flag_index(lx, ly, lz, face)] != 0
    }

    /// Samples, counts and emits `coord` into the pass buffers.
    pub fn rebuild<G, R>(&mut self, grid: &G, models: &R, coord: ChunkCoord) -> &BuildStats
    where
        G: BlockGrid + ?Sized,
        R: ModelRegistry + ?Sized,
    {
        let t0 = Instant::now();
        let origin = coord.origin();
        self.passes.reset();
        self.flags.fill(0);
        self.stats = BuildStats {
            coord,
            ..BuildStats::default()
        };

        let sample = self.volume.sample(grid, models, origin);
        self.stats.flags = sample;
        self.stats.sample_ms = elapsed_ms(t0);
        if sample.is_degenerate() {
            log::trace!(
                "skip section ({},{},{}) all_air={} all_solid={}",
                coord.cx,
                coord.cy,
                coord.cz,
                sample.all_air,
                sample.all_solid
            );
            self.stats.total_ms = elapsed_ms(t0);
            return &self.stats;
        }

        self.stats.visible_faces = self.count_visible(models);
        self.passes.grow_to_targets();
        self.emit_visible(models, origin);

        for (pass, acc) in self.passes.iter() {
            debug_assert_eq!(
                acc.cursor(),
                acc.target(),
                "pass {} counted {} but wrote {}",
                pass.name(),
                acc.target(),
                acc.cursor()
            );
            self.stats.vertices[pass.index()] = acc.cursor();
        }
        self.stats.total_ms = elapsed_ms(t0);
        log::debug!(
            target: "perf",
            "ms={} sample={} mesher_section cx={} cy={} cz={} faces={} solid={} translucent={} sprite={}",
            self.stats.total_ms,
            self.stats.sample_ms,
            coord.cx,
            coord.cy,
            coord.cz,
            self.stats.visible_faces,
            self.stats.vertices[0],
            self.stats.vertices[1],
            self.stats.vertices[2]
        );
        &self.stats
    }

    fn count_visible<R>(&mut self, models: &R) -> u32
    where
        R: ModelRegistry + ?Sized,
    {
        let mut faces = 0u32;
        for ly in 0..SECTION {
            for lz in 0..SECTION {
                for lx in 0..SECTION {
                    let idx = PaddedVolume::index(lx as i32, ly as i32, lz as i32);
                    let id = self.volume.get(idx);
                    if id == AIR {
                        continue;
                    }
                    let Some(model) = models.model(id) else {
                        continue;
                    };
                    let pass = model.render_pass();
                    for face in Face::ALL {
                        if !model.has_face(face) {
                            continue;
                        }
                        let neighbor = models.model(self.volume.neighbor(idx, face));
                        if model.face_hidden(face, neighbor) {
                            continue;
                        }
                        self.flags[flag_index(lx, ly, lz, face)] = 1;
                        self.passes[pass].add_target(model.vertex_count(face, neighbor));
                        faces += 1;
                    }
                }
            }
        }
        faces
    }

    fn emit_visible<R>(&mut self, models: &R, origin: (i32, i32, i32))
    where
        R: ModelRegistry + ?Sized,
    {
        let (x1, y1, z1) = origin;
        for ly in 0..SECTION {
            for lz in 0..SECTION {
                for lx in 0..SECTION {
                    let idx = PaddedVolume::index(lx as i32, ly as i32, lz as i32);
                    let id = self.volume.get(idx);
                    if id == AIR {
                        continue;
                    }
                    let Some(model) = models.model(id) else {
                        continue;
                    };
                    let acc = &mut self.passes[model.render_pass()];
                    for face in Face::ALL {
                        if self.flags[flag_index(lx, ly, lz, face)] == 0 {
                            continue;
                        }
                        let neighbor = models.model(self.volume.neighbor(idx, face));
                        let tint = model.face_tint(face, &self.palette);
                        let written = model.emit_face(
                            face,
                            x1 + lx as i32,
                            y1 + ly as i32,
                            z1 + lz as i32,
                            neighbor,
                            tint,
                            acc.remaining_mut(),
                        );
                        acc.advance(written);
                    }
                }
            }
        }
    }

    /// Rebuilds and uploads every non-empty pass. Must run on the backend's thread.
    pub fn build<G, R, B>(
        &mut self,
        grid: &G,
        models: &R,
        coord: ChunkCoord,
        backend: &mut B,
    ) -> SectionDrawInfo<B::Handle>
    where
        G: BlockGrid + ?Sized,
        R: ModelRegistry + ?Sized,
        B: GraphicsBackend + ?Sized,
    {
        self.rebuild(grid, models, coord);
        self.publish(backend)
    }

    /// Uploads the result of the last rebuild.
    pub fn publish<B>(&self, backend: &mut B) -> SectionDrawInfo<B::Handle>
    where
        B: GraphicsBackend + ?Sized,
    {
        publish_passes(backend, self.passes.filled())
    }

    /// Rebuilds and copies the result out for another thread to publish.
    pub fn build_cpu<G, R>(&mut self, grid: &G, models: &R, coord: ChunkCoord) -> ChunkMeshCpu
    where
        G: BlockGrid + ?Sized,
        R: ModelRegistry + ?Sized,
    {
        self.rebuild(grid, models, coord);
        let (x, y, z) = coord.origin();
        ChunkMeshCpu {
            coord,
            bbox: Aabb::cube(Vec3::from_block(x, y, z), SECTION as f32),
            passes: RenderPass::ALL.map(|p| self.passes[p].filled().to_vec()),
            stats: self.stats,
        }
    }
}
