//! Worker pool that meshes sections off the backend thread.
#![forbid(unsafe_code)]

mod revisions;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TryRecvError, select, unbounded};
use rayon::{ThreadPool, ThreadPoolBuilder};
use strata_blocks::BlockRegistry;
use strata_mesh::{ChunkMeshBuilder, ChunkMeshCpu, FacePalette};
use strata_world::{ChunkCoord, World};

pub use revisions::SectionRevisions;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshJob {
    pub coord: ChunkCoord,
    pub rev: u64,
    pub job_id: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobKind {
    Edit,
    Bg,
}

pub struct JobOut {
    pub coord: ChunkCoord,
    pub rev: u64,
    pub job_id: u64,
    pub kind: JobKind,
    pub cpu: ChunkMeshCpu,
    pub t_wait_ms: u32,
    pub t_mesh_ms: u32,
}

/// Queue and in-flight counts per lane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueCounts {
    pub queued_edit: usize,
    pub inflight_edit: usize,
    pub queued_bg: usize,
    pub inflight_bg: usize,
}

impl QueueCounts {
    pub fn pending(&self) -> usize {
        self.queued_edit + self.inflight_edit + self.queued_bg + self.inflight_bg
    }
}

struct Queued {
    job: MeshJob,
    at: Instant,
}

#[derive(Clone)]
struct Lane {
    kind: JobKind,
    queued: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
}

fn elapsed_ms(start: Instant) -> u32 {
    start.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

/// Everything a worker thread owns. The builder is private to the worker.
struct Worker {
    builder: ChunkMeshBuilder,
    world: Arc<RwLock<World>>,
    reg: Arc<BlockRegistry>,
    tx: Sender<JobOut>,
}

impl Worker {
    fn process(&mut self, queued: Queued, lane: &Lane) {
        lane.queued.fetch_sub(1, Ordering::Relaxed);
        lane.inflight.fetch_add(1, Ordering::Relaxed);
        let Queued { job, at } = queued;
        let t_wait_ms = elapsed_ms(at);
        let t0 = Instant::now();
        let cpu = {
            let world = match self.world.read() {
                Ok(w) => w,
                Err(poisoned) => poisoned.into_inner(),
            };
            self.builder.build_cpu(&*world, self.reg.as_ref(), job.coord)
        };
        let t_mesh_ms = elapsed_ms(t0);
        log::trace!(
            "mesh job {} ({},{},{}) rev={} lane={:?} wait={}ms mesh={}ms",
            job.job_id,
            job.coord.cx,
            job.coord.cy,
            job.coord.cz,
            job.rev,
            lane.kind,
            t_wait_ms,
            t_mesh_ms
        );
        // Settled before the send so a receiver never sees its own job in flight
        lane.inflight.fetch_sub(1, Ordering::Relaxed);
        let _ = self.tx.send(JobOut {
            coord: job.coord,
            rev: job.rev,
            job_id: job.job_id,
            kind: lane.kind,
            cpu,
            t_wait_ms,
            t_mesh_ms,
        });
    }
}

/// Meshes sections on a rayon pool. One edit worker serves rebuilds caused by
/// block changes; background workers take bulk loads and help with edits.
///
/// Jobs always run to completion; callers drop stale results by revision.
pub struct Runtime {
    job_tx_edit: Sender<Queued>,
    job_tx_bg: Sender<Queued>,
    res_rx: Receiver<JobOut>,
    _edit_pool: Arc<ThreadPool>,
    bg_pool: Option<Arc<ThreadPool>>,
    edit: Lane,
    bg: Lane,
    next_job: AtomicUsize,
    pub w_edit: usize,
    pub w_bg: usize,
}

impl Runtime {
    /// `workers` of 0 picks the available parallelism.
    pub fn new(
        world: Arc<RwLock<World>>,
        reg: Arc<BlockRegistry>,
        workers: usize,
        palette: FacePalette,
    ) -> Self {
        let (job_tx_edit, job_rx_edit) = unbounded::<Queued>();
        let (job_tx_bg, job_rx_bg) = unbounded::<Queued>();
        let (res_tx, res_rx) = unbounded::<JobOut>();

        let worker_count = if workers == 0 {
            thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        } else {
            workers
        };
        let w_edit = 1usize;
        let w_bg = worker_count.saturating_sub(w_edit);

        let edit = Lane {
            kind: JobKind::Edit,
            queued: Arc::new(AtomicUsize::new(0)),
            inflight: Arc::new(AtomicUsize::new(0)),
        };
        let bg = Lane {
            kind: JobKind::Bg,
            queued: Arc::new(AtomicUsize::new(0)),
            inflight: Arc::new(AtomicUsize::new(0)),
        };
        let new_worker = || Worker {
            builder: ChunkMeshBuilder::new(palette),
            world: Arc::clone(&world),
            reg: Arc::clone(&reg),
            tx: res_tx.clone(),
        };

        let edit_pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(w_edit)
                .thread_name(|i| format!("strata-edit-{i}"))
                .build()
                .expect("edit pool"),
        );
        for _ in 0..w_edit {
            let rx = job_rx_edit.clone();
            let lane = edit.clone();
            let mut worker = new_worker();
            edit_pool.spawn(move || {
                while let Ok(q) = rx.recv() {
                    worker.process(q, &lane);
                }
            });
        }

        let bg_pool = if w_bg > 0 {
            let pool = Arc::new(
                ThreadPoolBuilder::new()
                    .num_threads(w_bg)
                    .thread_name(|i| format!("strata-bg-{i}"))
                    .build()
                    .expect("bg pool"),
            );
            for _ in 0..w_bg {
                let bg_rx = job_rx_bg.clone();
                let edit_rx = job_rx_edit.clone();
                let bg_lane = bg.clone();
                let edit_lane = edit.clone();
                let mut worker = new_worker();
                pool.spawn(move || {
                    loop {
                        // Edits first, so a burst of edits is not stuck behind one worker
                        match edit_rx.try_recv() {
                            Ok(q) => {
                                worker.process(q, &edit_lane);
                                continue;
                            }
                            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {}
                        }
                        select! {
                            recv(bg_rx) -> res => match res {
                                Ok(q) => worker.process(q, &bg_lane),
                                Err(_) => break,
                            },
                            recv(edit_rx) -> res => {
                                if let Ok(q) = res {
                                    worker.process(q, &edit_lane);
                                }
                            },
                        }
                    }
                });
            }
            Some(pool)
        } else {
            None
        };

        log::info!("runtime workers edit={} bg={}", w_edit, w_bg);

        Self {
            job_tx_edit,
            job_tx_bg,
            res_rx,
            _edit_pool: edit_pool,
            bg_pool,
            edit,
            bg,
            next_job: AtomicUsize::new(0),
            w_edit,
            w_bg,
        }
    }

    fn job(&self, coord: ChunkCoord, rev: u64) -> Queued {
        let job_id = self.next_job.fetch_add(1, Ordering::Relaxed) as u64;
        Queued {
            job: MeshJob { coord, rev, job_id },
            at: Instant::now(),
        }
    }

    /// Queues a rebuild on the edit lane. Returns the job id.
    pub fn submit_edit(&self, coord: ChunkCoord, rev: u64) -> u64 {
        let q = self.job(coord, rev);
        let id = q.job.job_id;
        self.edit.queued.fetch_add(1, Ordering::Relaxed);
        if self.job_tx_edit.send(q).is_err() {
            self.edit.queued.fetch_sub(1, Ordering::Relaxed);
        }
        id
    }

    /// Queues a background rebuild, or an edit-lane one without bg workers.
    pub fn submit_bg(&self, coord: ChunkCoord, rev: u64) -> u64 {
        if self.bg_pool.is_none() {
            return self.submit_edit(coord, rev);
        }
        let q = self.job(coord, rev);
        let id = q.job.job_id;
        self.bg.queued.fetch_add(1, Ordering::Relaxed);
        if self.job_tx_bg.send(q).is_err() {
            self.bg.queued.fetch_sub(1, Ordering::Relaxed);
        }
        id
    }

    pub fn drain_results(&self) -> Vec<JobOut> {
        self.res_rx.try_iter().collect()
    }

    /// Blocks up to `timeout` for the next finished job.
    pub fn recv_result(&self, timeout: Duration) -> Option<JobOut> {
        self.res_rx.recv_timeout(timeout).ok()
    }

    pub fn queue_counts(&self) -> QueueCounts {
        QueueCounts {
            queued_edit: self.edit.queued.load(Ordering::Relaxed),
            inflight_edit: self.edit.inflight.load(Ordering::Relaxed),
            queued_bg: self.bg.queued.load(Ordering::Relaxed),
            inflight_bg: self.bg.inflight.load(Ordering::Relaxed),
        }
    }

    pub fn workers(&self) -> usize {
        self.w_edit + self.w_bg
    }
}
