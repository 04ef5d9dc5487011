/// Pipeline - Vulkan implementation of the Pipeline trait
///
/// Pipelines are built by the application against the engine's render
/// pass and handed in through `VulkanGraphicsDevice::wrap_pipeline`.

use nova_3d_engine::nova3d::graphics_device::Pipeline as RendererPipeline;
use ash::vk;
use std::sync::Arc;

use crate::vulkan_context::GpuContext;

/// Vulkan pipeline implementation
pub struct Pipeline {
    /// Shared GPU context
    ctx: Arc<GpuContext>,
    /// Vulkan graphics pipeline
    pub(crate) pipeline: vk::Pipeline,
    /// Pipeline layout (push constants are recorded against it)
    pub(crate) pipeline_layout: vk::PipelineLayout,
    /// Whether pipeline and layout are destroyed on drop
    owned: bool,
}

impl Pipeline {
    pub(crate) fn new(
        ctx: Arc<GpuContext>,
        pipeline: vk::Pipeline,
        pipeline_layout: vk::PipelineLayout,
        owned: bool,
    ) -> Self {
        Self { ctx, pipeline, pipeline_layout, owned }
    }
}

impl RendererPipeline for Pipeline {}

impl Drop for Pipeline {
    fn drop(&mut self) {
        if self.owned {
            unsafe {
                self.ctx.device.destroy_pipeline(self.pipeline, None);
                self.ctx.device.destroy_pipeline_layout(self.pipeline_layout, None);
            }
        }
    }
}
