//! In-process graphics backend, published-section cache and the batched
//! per-pass frame renderer.
#![forbid(unsafe_code)]

pub mod backend;
pub mod cache;
pub mod frame;

pub use backend::{BufferId, DrawStats, SoftwareBackend};
pub use cache::SectionCache;
pub use frame::{FrameStats, PASS_ORDER, render_frame};
