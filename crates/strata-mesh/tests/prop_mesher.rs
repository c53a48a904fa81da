use proptest::prelude::*;
use strata_blocks::{BlockRegistry, RenderPass};
use strata_mesh::constants::PAD;
use strata_mesh::{ChunkMeshBuilder, Face, VERTICES_PER_QUAD};
use strata_world::{ChunkCoord, FnGrid};

fn registry() -> BlockRegistry {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let assets = root.join("../../assets");
    BlockRegistry::load_from_paths(assets.join("atlas.toml"), assets.join("blocks.toml")).unwrap()
}

/// Section plus halo as a flat y-major array, served through a closure grid.
fn padded_grid(cells: Vec<u8>) -> FnGrid<impl Fn(i32, i32, i32) -> u8> {
    FnGrid(move |x: i32, y: i32, z: i32| {
        let r = -1..=16;
        if !(r.contains(&x) && r.contains(&y) && r.contains(&z)) {
            return 0;
        }
        let i = ((y + 1) as usize * PAD + (z + 1) as usize) * PAD + (x + 1) as usize;
        cells[i]
    })
}

fn mixed_cells() -> impl Strategy<Value = Vec<u8>> {
    // stone, grass, water, glass, sapling, slab, snow, leaves, an undefined id, and air
    let ids = vec![0u8, 0, 0, 0, 1, 2, 8, 20, 6, 44, 78, 18, 200];
    prop::collection::vec(prop::sample::select(ids), PAD * PAD * PAD)
}

fn cube_cells() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(vec![0u8, 1]), PAD * PAD * PAD)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    // Counting and emission agree per pass and every face is a whole quad
    #[test]
    fn counted_matches_written(cells in mixed_cells()) {
        let reg = registry();
        let grid = padded_grid(cells);
        let mut b = ChunkMeshBuilder::default();
        let stats = *b.rebuild(&grid, &reg, ChunkCoord::new(0, 0, 0));
        for (pass, acc) in b.passes().iter() {
            prop_assert_eq!(acc.cursor(), acc.target());
            prop_assert_eq!(acc.cursor() % VERTICES_PER_QUAD, 0);
            prop_assert_eq!(stats.vertices[pass.index()], acc.cursor());
        }
        prop_assert_eq!(stats.total_vertices(), stats.visible_faces as usize * VERTICES_PER_QUAD);
    }

    // A second rebuild of the same data is bit-identical
    #[test]
    fn rebuild_idempotent(cells in mixed_cells()) {
        let reg = registry();
        let grid = padded_grid(cells);
        let mut b = ChunkMeshBuilder::default();
        b.rebuild(&grid, &reg, ChunkCoord::new(0, 0, 0));
        let first: Vec<Vec<_>> = RenderPass::ALL.iter().map(|&p| b.pass_vertices(p).to_vec()).collect();
        b.rebuild(&grid, &reg, ChunkCoord::new(0, 0, 0));
        for (i, &p) in RenderPass::ALL.iter().enumerate() {
            prop_assert_eq!(&first[i][..], b.pass_vertices(p));
        }
    }

    // All geometry stays within the section's bounds
    #[test]
    fn geometry_inside_section(cells in mixed_cells()) {
        let reg = registry();
        let grid = padded_grid(cells);
        let mut b = ChunkMeshBuilder::default();
        b.rebuild(&grid, &reg, ChunkCoord::new(0, 0, 0));
        for p in RenderPass::ALL {
            for v in b.pass_vertices(p) {
                for c in v.pos {
                    prop_assert!((0.0..=16.0).contains(&c));
                }
            }
        }
    }

    // For cubes only, a face is visible exactly when its neighbour is air
    #[test]
    fn cube_faces_match_brute_force(cells in cube_cells()) {
        let reg = registry();
        let grid = padded_grid(cells);
        let mut b = ChunkMeshBuilder::default();
        let stats = *b.rebuild(&grid, &reg, ChunkCoord::new(0, 0, 0));
        if stats.skipped() {
            return Ok(());
        }
        let mut expected = 0u32;
        for y in 0..16 {
            for z in 0..16 {
                for x in 0..16 {
                    if (grid.0)(x, y, z) == 0 {
                        continue;
                    }
                    for face in Face::ALL {
                        let (dx, dy, dz) = face.delta();
                        let open = (grid.0)(x + dx, y + dy, z + dz) == 0;
                        prop_assert_eq!(b.draw_flag(x as usize, y as usize, z as usize, face), open);
                        expected += open as u32;
                    }
                }
            }
        }
        prop_assert_eq!(stats.visible_faces, expected);
        prop_assert_eq!(b.pass_vertices(RenderPass::Solid).len(), expected as usize * VERTICES_PER_QUAD);
    }
}
