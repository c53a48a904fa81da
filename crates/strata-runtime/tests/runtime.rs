use std::sync::{Arc, RwLock};
use std::time::Duration;

use strata_blocks::{BlockRegistry, RenderPass};
use strata_mesh::{ChunkMeshBuilder, FacePalette};
use strata_runtime::{JobKind, JobOut, Runtime, SectionRevisions};
use strata_world::{ChunkCoord, World};

fn registry() -> Arc<BlockRegistry> {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let assets = root.join("../../assets");
    Arc::new(
        BlockRegistry::load_from_paths(assets.join("atlas.toml"), assets.join("blocks.toml"))
            .unwrap(),
    )
}

fn terraced_world(reg: &BlockRegistry) -> World {
    let mut w = World::new(2, 2, 2);
    let stone = reg.id_by_name("stone").unwrap();
    let glass = reg.id_by_name("glass").unwrap();
    let rose = reg.id_by_name("rose").unwrap();
    w.fill((0, 0, 0), (31, 3, 31), stone);
    w.fill((0, 4, 0), (15, 17, 15), stone);
    w.fill((18, 4, 18), (20, 6, 20), glass);
    w.set_block(25, 4, 3, rose);
    w
}

fn collect(rt: &Runtime, n: usize) -> Vec<JobOut> {
    let mut out = Vec::with_capacity(n);
    while out.len() < n {
        match rt.recv_result(Duration::from_secs(10)) {
            Some(job) => out.push(job),
            None => panic!("timed out with {} of {} results", out.len(), n),
        }
    }
    out
}

#[test]
fn pool_output_matches_serial_build() {
    let reg = registry();
    let world = terraced_world(&reg);
    let mut serial = ChunkMeshBuilder::default();
    let expected: Vec<_> = world
        .sections()
        .map(|c| (c, serial.build_cpu(&world, reg.as_ref(), c)))
        .collect();

    let shared = Arc::new(RwLock::new(world));
    let rt = Runtime::new(Arc::clone(&shared), Arc::clone(&reg), 3, FacePalette::default());
    assert_eq!(rt.workers(), 3);
    for (c, _) in &expected {
        rt.submit_bg(*c, 1);
    }
    let results = collect(&rt, expected.len());
    for (c, want) in &expected {
        let got = results.iter().find(|r| r.coord == *c).unwrap();
        assert_eq!(got.rev, 1);
        for pass in RenderPass::ALL {
            assert_eq!(got.cpu.vertices(pass), want.vertices(pass), "{c:?} {pass:?}");
        }
    }
    assert!(rt.drain_results().is_empty());
    assert_eq!(rt.queue_counts().queued_bg, 0);
}

#[test]
fn single_worker_routes_bg_to_edit_lane() {
    let reg = registry();
    let world = Arc::new(RwLock::new(terraced_world(&reg)));
    let rt = Runtime::new(world, reg, 1, FacePalette::default());
    assert_eq!((rt.w_edit, rt.w_bg), (1, 0));
    let a = rt.submit_bg(ChunkCoord::new(0, 0, 0), 1);
    let b = rt.submit_edit(ChunkCoord::new(1, 0, 0), 1);
    assert_ne!(a, b);
    let results = collect(&rt, 2);
    assert!(results.iter().all(|r| r.kind == JobKind::Edit));
    // One worker handles jobs in submission order
    assert_eq!(results[0].job_id, a);
    assert_eq!(results[1].job_id, b);
}

#[test]
fn stale_results_are_detected_by_revision() {
    let reg = registry();
    let world = Arc::new(RwLock::new(terraced_world(&reg)));
    let rt = Runtime::new(Arc::clone(&world), Arc::clone(&reg), 2, FacePalette::default());
    let mut revs = SectionRevisions::new();
    let coord = ChunkCoord::new(0, 0, 0);

    let first = revs.bump(coord);
    rt.submit_edit(coord, first);
    let old = collect(&rt, 1).pop().unwrap();

    // Break a block on the border: both sections on either side get rebuilt
    let touched = {
        let mut w = world.write().unwrap();
        w.set_block(15, 3, 4, 0);
        revs.bump_block(&w, 15, 3, 4)
    };
    let coords: Vec<_> = touched.iter().map(|(c, _)| *c).collect();
    assert_eq!(coords, vec![coord, ChunkCoord::new(1, 0, 0)]);
    for (c, rev) in &touched {
        rt.submit_edit(*c, *rev);
    }
    let fresh = collect(&rt, touched.len());

    assert!(!revs.is_current(old.coord, old.rev));
    for r in &fresh {
        assert!(revs.is_current(r.coord, r.rev));
    }
    let new_own = fresh.iter().find(|r| r.coord == coord).unwrap();
    assert_ne!(
        new_own.cpu.vertices(RenderPass::Solid).len(),
        old.cpu.vertices(RenderPass::Solid).len()
    );
}

#[test]
fn counters_settle_once_results_arrive() {
    let reg = registry();
    let world = Arc::new(RwLock::new(terraced_world(&reg)));
    let rt = Runtime::new(world, reg, 3, FacePalette::default());
    for round in 0..20 {
        for cx in 0..2 {
            rt.submit_bg(ChunkCoord::new(cx, 0, 0), round);
            rt.submit_edit(ChunkCoord::new(cx, 1, 1), round);
        }
        collect(&rt, 4);
        assert_eq!(rt.queue_counts().pending(), 0, "round {round}");
    }
}

#[test]
fn revisions_start_at_zero_and_forget() {
    let mut revs = SectionRevisions::new();
    let c = ChunkCoord::new(0, 1, 0);
    assert_eq!(revs.current(c), 0);
    assert_eq!(revs.bump(c), 1);
    assert_eq!(revs.bump(c), 2);
    assert!(revs.is_current(c, 2));
    revs.forget(c);
    assert!(revs.is_empty());
}
