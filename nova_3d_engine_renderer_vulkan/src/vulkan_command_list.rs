/// CommandPool and CommandList - Vulkan implementations

use nova_3d_engine::nova3d::{Result, Error};
use nova_3d_engine::nova3d::graphics_device::{
    CommandList as RendererCommandList,
    CommandPool as RendererCommandPool,
    RenderPass as RendererRenderPass,
    Framebuffer as RendererFramebuffer,
    Pipeline as RendererPipeline,
    Buffer as RendererBuffer,
    BufferUsage, IndexType, ShaderStage,
    Viewport, Rect2D, ClearValue,
};
use nova_3d_engine::{engine_bail, engine_err};
use ash::vk;
use std::sync::Arc;

use crate::vulkan_buffer::Buffer;
use crate::vulkan_context::GpuContext;
use crate::vulkan_format::{index_type_to_vk, shader_stages_to_vk};
use crate::vulkan_frame_buffer::Framebuffer;
use crate::vulkan_pipeline::Pipeline;
use crate::vulkan_render_pass::RenderPass;

/// Largest payload `vkCmdUpdateBuffer` accepts
const MAX_UPDATE_BUFFER_SIZE: usize = 65536;

// ============================================================================
// COMMAND POOL
// ============================================================================

/// Pool handle shared by the pool and every list allocated from it
struct PoolHandle {
    ctx: Arc<GpuContext>,
    pool: vk::CommandPool,
}

impl Drop for PoolHandle {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_command_pool(self.pool, None);
        }
    }
}

/// Vulkan command pool implementation
///
/// Lists are individually resettable (each `begin()` resets its buffer).
pub struct CommandPool {
    handle: Arc<PoolHandle>,
}

impl CommandPool {
    pub(crate) fn new(ctx: Arc<GpuContext>, queue_family_index: u32) -> Result<Self> {
        let create_info = vk::CommandPoolCreateInfo::default()
            .queue_family_index(queue_family_index)
            .flags(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER);

        let pool = unsafe { ctx.device.create_command_pool(&create_info, None) }
            .map_err(|e| engine_err!("nova3d::vulkan", "Failed to create command pool: {:?}", e))?;

        Ok(Self { handle: Arc::new(PoolHandle { ctx, pool }) })
    }
}

impl RendererCommandPool for CommandPool {
    fn allocate_command_lists(&self, count: u32) -> Result<Vec<Box<dyn RendererCommandList>>> {
        let allocate_info = vk::CommandBufferAllocateInfo::default()
            .command_pool(self.handle.pool)
            .level(vk::CommandBufferLevel::PRIMARY)
            .command_buffer_count(count);

        let command_buffers = unsafe { self.handle.ctx.device.allocate_command_buffers(&allocate_info) }
            .map_err(|e| engine_err!("nova3d::vulkan", "Failed to allocate {} command buffers: {:?}", count, e))?;

        Ok(command_buffers
            .into_iter()
            .map(|command_buffer| {
                Box::new(CommandList::new(self.handle.clone(), command_buffer)) as Box<dyn RendererCommandList>
            })
            .collect())
    }
}

// ============================================================================
// COMMAND LIST
// ============================================================================

/// Vulkan command list implementation
///
/// Records rendering commands for later submission through `Queue::submit`.
pub struct CommandList {
    /// Owning pool (outlives the list)
    pool: Arc<PoolHandle>,
    /// Command buffer for recording
    command_buffer: vk::CommandBuffer,
    /// Whether the command list is currently recording
    is_recording: bool,
    /// Whether we're inside a render pass
    in_render_pass: bool,
    /// Transfer writes not yet made visible to shader reads
    pending_transfer: bool,
    /// Currently bound pipeline layout (for push constants)
    bound_pipeline_layout: Option<vk::PipelineLayout>,
}

impl CommandList {
    fn new(pool: Arc<PoolHandle>, command_buffer: vk::CommandBuffer) -> Self {
        Self {
            pool,
            command_buffer,
            is_recording: false,
            in_render_pass: false,
            pending_transfer: false,
            bound_pipeline_layout: None,
        }
    }

    fn device(&self) -> &ash::Device {
        &self.pool.ctx.device
    }

    /// Get the underlying Vulkan command buffer
    pub fn command_buffer(&self) -> vk::CommandBuffer {
        self.command_buffer
    }

    fn require_recording(&self) -> Result<()> {
        if !self.is_recording {
            return Err(Error::BackendError("Command list not recording".to_string()));
        }
        Ok(())
    }

    fn require_render_pass(&self) -> Result<()> {
        self.require_recording()?;
        if !self.in_render_pass {
            return Err(Error::BackendError("Not inside a render pass".to_string()));
        }
        Ok(())
    }
}

impl RendererCommandList for CommandList {
    fn begin(&mut self) -> Result<()> {
        if self.is_recording {
            return Err(Error::BackendError("Command list already recording".to_string()));
        }

        unsafe {
            self.device()
                .reset_command_buffer(self.command_buffer, vk::CommandBufferResetFlags::empty())
                .map_err(|e| Error::BackendError(format!("Failed to reset command buffer: {:?}", e)))?;

            let begin_info = vk::CommandBufferBeginInfo::default()
                .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);

            self.device()
                .begin_command_buffer(self.command_buffer, &begin_info)
                .map_err(|e| Error::BackendError(format!("Failed to begin command buffer: {:?}", e)))?;
        }

        self.is_recording = true;
        self.in_render_pass = false;
        self.pending_transfer = false;
        self.bound_pipeline_layout = None;
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        // Legal in any state: the pool is created with RESET_COMMAND_BUFFER
        unsafe {
            self.device()
                .reset_command_buffer(self.command_buffer, vk::CommandBufferResetFlags::empty())
                .map_err(|e| engine_err!("nova3d::vulkan", "Failed to reset command buffer: {:?}", e))?;
        }

        self.is_recording = false;
        self.in_render_pass = false;
        self.pending_transfer = false;
        self.bound_pipeline_layout = None;
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        self.require_recording()?;
        if self.in_render_pass {
            return Err(Error::BackendError("Render pass not ended before ending command list".to_string()));
        }

        unsafe {
            self.device()
                .end_command_buffer(self.command_buffer)
                .map_err(|e| Error::BackendError(format!("Failed to end command buffer: {:?}", e)))?;
        }

        self.is_recording = false;
        Ok(())
    }

    fn begin_render_pass(
        &mut self,
        render_pass: &Arc<dyn RendererRenderPass>,
        framebuffer: &Arc<dyn RendererFramebuffer>,
        render_area: Rect2D,
        clear_values: &[ClearValue],
    ) -> Result<()> {
        self.require_recording()?;
        if self.in_render_pass {
            return Err(Error::BackendError("Already inside a render pass".to_string()));
        }

        unsafe {
            // Downcast to Vulkan types
            let vk_render_pass = &*(render_pass.as_ref() as *const dyn RendererRenderPass as *const RenderPass);
            let vk_framebuffer = &*(framebuffer.as_ref() as *const dyn RendererFramebuffer as *const Framebuffer);

            // Uniform updates recorded so far must land before any shader reads them
            if self.pending_transfer {
                let barrier = vk::MemoryBarrier::default()
                    .src_access_mask(vk::AccessFlags::TRANSFER_WRITE)
                    .dst_access_mask(vk::AccessFlags::UNIFORM_READ);
                self.device().cmd_pipeline_barrier(
                    self.command_buffer,
                    vk::PipelineStageFlags::TRANSFER,
                    vk::PipelineStageFlags::VERTEX_SHADER | vk::PipelineStageFlags::FRAGMENT_SHADER,
                    vk::DependencyFlags::empty(),
                    &[barrier],
                    &[],
                    &[],
                );
                self.pending_transfer = false;
            }

            let vk_clear_values: Vec<vk::ClearValue> = clear_values
                .iter()
                .map(|cv| match cv {
                    ClearValue::Color(color) => vk::ClearValue {
                        color: vk::ClearColorValue { float32: *color },
                    },
                    ClearValue::DepthStencil { depth, stencil } => vk::ClearValue {
                        depth_stencil: vk::ClearDepthStencilValue { depth: *depth, stencil: *stencil },
                    },
                })
                .collect();

            let render_pass_info = vk::RenderPassBeginInfo::default()
                .render_pass(vk_render_pass.render_pass)
                .framebuffer(vk_framebuffer.framebuffer)
                .render_area(vk::Rect2D {
                    offset: vk::Offset2D { x: render_area.x, y: render_area.y },
                    extent: vk::Extent2D { width: render_area.width, height: render_area.height },
                })
                .clear_values(&vk_clear_values);

            self.device().cmd_begin_render_pass(
                self.command_buffer,
                &render_pass_info,
                vk::SubpassContents::INLINE,
            );
        }

        self.in_render_pass = true;
        Ok(())
    }

    fn end_render_pass(&mut self) -> Result<()> {
        self.require_render_pass()?;
        unsafe {
            self.device().cmd_end_render_pass(self.command_buffer);
        }
        self.in_render_pass = false;
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.require_recording()?;
        let vk_viewport = vk::Viewport::default()
            .x(viewport.x)
            .y(viewport.y)
            .width(viewport.width)
            .height(viewport.height)
            .min_depth(viewport.min_depth)
            .max_depth(viewport.max_depth);
        unsafe {
            self.device().cmd_set_viewport(self.command_buffer, 0, &[vk_viewport]);
        }
        Ok(())
    }

    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()> {
        self.require_recording()?;
        let vk_scissor = vk::Rect2D::default()
            .offset(vk::Offset2D { x: scissor.x, y: scissor.y })
            .extent(vk::Extent2D { width: scissor.width, height: scissor.height });
        unsafe {
            self.device().cmd_set_scissor(self.command_buffer, 0, &[vk_scissor]);
        }
        Ok(())
    }

    fn set_blend_constants(&mut self, constants: [f32; 4]) -> Result<()> {
        self.require_recording()?;
        unsafe {
            self.device().cmd_set_blend_constants(self.command_buffer, &constants);
        }
        Ok(())
    }

    fn bind_pipeline(&mut self, pipeline: &Arc<dyn RendererPipeline>) -> Result<()> {
        self.require_render_pass()?;
        unsafe {
            let vk_pipeline = &*(pipeline.as_ref() as *const dyn RendererPipeline as *const Pipeline);
            self.device().cmd_bind_pipeline(
                self.command_buffer,
                vk::PipelineBindPoint::GRAPHICS,
                vk_pipeline.pipeline,
            );
            self.bound_pipeline_layout = Some(vk_pipeline.pipeline_layout);
        }
        Ok(())
    }

    fn push_constants(&mut self, stages: &[ShaderStage], offset: u32, data: &[u8]) -> Result<()> {
        self.require_recording()?;
        let layout = self.bound_pipeline_layout.ok_or_else(|| {
            Error::BackendError("No pipeline bound for push constants".to_string())
        })?;
        unsafe {
            self.device().cmd_push_constants(
                self.command_buffer,
                layout,
                shader_stages_to_vk(stages),
                offset,
                data,
            );
        }
        Ok(())
    }

    fn update_buffer(&mut self, buffer: &Arc<dyn RendererBuffer>, offset: u64, data: &[u8]) -> Result<()> {
        self.require_recording()?;
        if self.in_render_pass {
            engine_bail!("nova3d::vulkan::CommandList", "update_buffer inside a render pass");
        }
        if data.is_empty() || data.len() % 4 != 0 || offset % 4 != 0 || data.len() > MAX_UPDATE_BUFFER_SIZE {
            engine_bail!(
                "nova3d::vulkan::CommandList",
                "update_buffer: {} bytes at offset {} (need 4-byte multiples, at most {} bytes)",
                data.len(), offset, MAX_UPDATE_BUFFER_SIZE
            );
        }

        let vk_buffer = unsafe { &*(buffer.as_ref() as *const dyn RendererBuffer as *const Buffer) };
        if !vk_buffer.usage.contains(BufferUsage::TRANSFER_DST) {
            engine_bail!("nova3d::vulkan::CommandList", "update_buffer on a buffer without TRANSFER_DST usage");
        }
        if offset + data.len() as u64 > vk_buffer.size {
            engine_bail!(
                "nova3d::vulkan::CommandList",
                "update_buffer out of range: {} bytes at offset {} (size {})",
                data.len(), offset, vk_buffer.size
            );
        }

        unsafe {
            self.device().cmd_update_buffer(self.command_buffer, vk_buffer.buffer, offset, data);
        }
        self.pending_transfer = true;
        Ok(())
    }

    fn bind_vertex_buffer(&mut self, buffer: &Arc<dyn RendererBuffer>, offset: u64) -> Result<()> {
        self.require_recording()?;
        unsafe {
            let vk_buffer = &*(buffer.as_ref() as *const dyn RendererBuffer as *const Buffer);
            self.device().cmd_bind_vertex_buffers(self.command_buffer, 0, &[vk_buffer.buffer], &[offset]);
        }
        Ok(())
    }

    fn bind_index_buffer(&mut self, buffer: &Arc<dyn RendererBuffer>, offset: u64, index_type: IndexType) -> Result<()> {
        self.require_recording()?;
        unsafe {
            let vk_buffer = &*(buffer.as_ref() as *const dyn RendererBuffer as *const Buffer);
            self.device().cmd_bind_index_buffer(
                self.command_buffer,
                vk_buffer.buffer,
                offset,
                index_type_to_vk(index_type),
            );
        }
        Ok(())
    }

    fn draw(&mut self, vertex_count: u32, first_vertex: u32) -> Result<()> {
        self.require_render_pass()?;
        unsafe {
            self.device().cmd_draw(
                self.command_buffer,
                vertex_count,
                1, // instance_count
                first_vertex,
                0, // first_instance
            );
        }
        Ok(())
    }

    fn draw_indexed(&mut self, index_count: u32, first_index: u32, vertex_offset: i32) -> Result<()> {
        self.require_render_pass()?;
        unsafe {
            self.device().cmd_draw_indexed(
                self.command_buffer,
                index_count,
                1, // instance_count
                first_index,
                vertex_offset,
                0, // first_instance
            );
        }
        Ok(())
    }
}

impl Drop for CommandList {
    fn drop(&mut self) {
        unsafe {
            self.pool.ctx.device.free_command_buffers(self.pool.pool, &[self.command_buffer]);
        }
    }
}
