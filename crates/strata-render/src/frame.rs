use strata_blocks::RenderPass;
use strata_mesh::{
    BackendError, GraphicsBackend, TextureId, begin_render, end_render, render_part,
};
use strata_world::ChunkCoord;

use crate::cache::SectionCache;

/// Opaque geometry first, then cut-out sprites, then blended translucency.
pub const PASS_ORDER: [RenderPass; RenderPass::COUNT] =
    [RenderPass::Solid, RenderPass::Sprite, RenderPass::Translucent];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub sections: usize,
    pub draw_calls: usize,
    pub vertices: usize,
    pub skipped_failed: usize,
}

/// Draws every cached section with one batch per pass.
///
/// The atlas is bound once. Opaque passes go near-to-far from `eye`,
/// translucency far-to-near.
pub fn render_frame<B>(
    backend: &mut B,
    cache: &SectionCache<B::Handle>,
    atlas: TextureId,
    eye: ChunkCoord,
) -> Result<FrameStats, BackendError>
where
    B: GraphicsBackend + ?Sized,
{
    let mut order: Vec<_> = cache.iter().collect();
    order.sort_by_key(|(c, _)| (c.distance_sq(eye), c.cx, c.cy, c.cz));

    let mut stats = FrameStats {
        sections: order.len(),
        ..FrameStats::default()
    };
    backend.bind_texture(atlas)?;
    for pass in PASS_ORDER {
        begin_render(backend);
        let mut draw = |info: &strata_mesh::SectionDrawInfo<B::Handle>| -> Result<(), BackendError> {
            let part = info.part(pass);
            if part.upload_failed() {
                stats.skipped_failed += 1;
            } else if render_part(backend, part)? {
                stats.draw_calls += 1;
                stats.vertices += part.vertex_count;
            }
            Ok(())
        };
        let result = if pass == RenderPass::Translucent {
            order.iter().rev().try_for_each(|(_, info)| draw(info))
        } else {
            order.iter().try_for_each(|(_, info)| draw(info))
        };
        end_render(backend);
        result?;
    }
    log::debug!(
        "frame sections={} draws={} vertices={} failed={}",
        stats.sections,
        stats.draw_calls,
        stats.vertices,
        stats.skipped_failed
    );
    Ok(stats)
}
