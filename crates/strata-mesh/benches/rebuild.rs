use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;

use strata_blocks::BlockRegistry;
use strata_mesh::ChunkMeshBuilder;
use strata_world::voxel::generation::generate;
use strata_world::worldgen::Mode;
use strata_world::{ChunkCoord, World, WorldGenConfig};

fn load_registry() -> BlockRegistry {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let assets = root.join("../../assets");
    BlockRegistry::load_from_paths(assets.join("atlas.toml"), assets.join("blocks.toml")).unwrap()
}

fn generated_world(reg: &BlockRegistry, mode: Mode) -> World {
    let mut cfg = WorldGenConfig::default();
    cfg.mode = mode;
    cfg.flat.thickness = 24;
    let mut world = World::new(3, 4, 3);
    generate(&mut world, &cfg, 1337, reg);
    world
}

fn bench_rebuild_flat(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild_flat");
    let reg = load_registry();
    let world = generated_world(&reg, Mode::Flat);
    let mut builder = ChunkMeshBuilder::default();
    // Section 1 holds the grass surface; section 0 is fully enclosed
    for (name, cy) in [("surface", 1), ("buried", 0)] {
        group.bench_function(name, |b| {
            b.iter(|| {
                builder.rebuild(&world, &reg, ChunkCoord::new(1, cy, 1));
                black_box(builder.last_stats());
            })
        });
    }
    group.finish();
}

fn bench_rebuild_normal(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild_normal");
    group.measurement_time(Duration::from_secs(8));
    let reg = load_registry();
    let world = generated_world(&reg, Mode::Normal);
    let mut builder = ChunkMeshBuilder::default();
    group.bench_function("all_sections_3x4x3", |b| {
        b.iter(|| {
            for coord in world.sections() {
                builder.rebuild(&world, &reg, coord);
            }
            black_box(builder.last_stats());
        })
    });
    group.bench_function("build_cpu_surface", |b| {
        b.iter(|| black_box(builder.build_cpu(&world, &reg, ChunkCoord::new(1, 1, 1))))
    });
    group.finish();
}

criterion_group!(benches, bench_rebuild_flat, bench_rebuild_normal);
criterion_main!(benches);
