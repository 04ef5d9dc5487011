/// RenderPass - Vulkan implementation of the RenderPass trait

use nova_3d_engine::nova3d::graphics_device::RenderPass as RendererRenderPass;
use ash::vk;
use std::sync::Arc;

use crate::vulkan_context::GpuContext;

/// Vulkan render pass implementation
///
/// Single-subpass wrapper around vk::RenderPass. Either created by the
/// device or wrapped from a handle the application owns.
pub struct RenderPass {
    /// Shared GPU context
    ctx: Arc<GpuContext>,
    /// Vulkan render pass handle
    pub(crate) render_pass: vk::RenderPass,
    /// Whether this wrapper destroys the handle on drop
    owns_render_pass: bool,
}

impl RenderPass {
    pub(crate) fn new(ctx: Arc<GpuContext>, render_pass: vk::RenderPass, owns_render_pass: bool) -> Self {
        Self { ctx, render_pass, owns_render_pass }
    }

    /// Underlying Vulkan handle (for building pipelines against it)
    pub fn raw(&self) -> vk::RenderPass {
        self.render_pass
    }
}

impl RendererRenderPass for RenderPass {}

impl Drop for RenderPass {
    fn drop(&mut self) {
        if self.owns_render_pass {
            unsafe {
                self.ctx.device.destroy_render_pass(self.render_pass, None);
            }
        }
    }
}
