/// Fence, Semaphore and Queue - Vulkan synchronization and submission

use nova_3d_engine::nova3d::{Result, Error};
use nova_3d_engine::nova3d::graphics_device::{
    CommandList as RendererCommandList,
    Fence as RendererFence,
    Queue as RendererQueue,
    Semaphore as RendererSemaphore,
    SubmitDesc,
};
use nova_3d_engine::{engine_bail, engine_err, engine_error};
use ash::vk;
use std::sync::Arc;
use std::time::Duration;

use crate::vulkan_command_list::CommandList;
use crate::vulkan_context::GpuContext;
use crate::vulkan_format::pipeline_stage_to_vk;

/// Map a failed queue/fence call to an engine error
fn queue_error(operation: &str, result: vk::Result) -> Error {
    match result {
        vk::Result::ERROR_DEVICE_LOST => {
            engine_error!("nova3d::vulkan::Queue", "{}: device lost", operation);
            Error::DeviceLost(format!("{}: {:?}", operation, result))
        }
        vk::Result::ERROR_OUT_OF_HOST_MEMORY | vk::Result::ERROR_OUT_OF_DEVICE_MEMORY => {
            engine_error!("nova3d::vulkan::Queue", "{}: {:?}", operation, result);
            Error::OutOfMemory
        }
        other => engine_err!("nova3d::vulkan::Queue", "{} failed: {:?}", operation, other),
    }
}

// ============================================================================
// FENCE
// ============================================================================

/// Vulkan fence implementation
pub struct Fence {
    ctx: Arc<GpuContext>,
    pub(crate) fence: vk::Fence,
}

impl Fence {
    pub(crate) fn new(ctx: Arc<GpuContext>, fence: vk::Fence) -> Self {
        Self { ctx, fence }
    }
}

impl RendererFence for Fence {
    fn wait(&self, timeout: Option<Duration>) -> Result<()> {
        let timeout_ns = timeout
            .map(|d| d.as_nanos().min(u64::MAX as u128) as u64)
            .unwrap_or(u64::MAX);

        match unsafe { self.ctx.device.wait_for_fences(&[self.fence], true, timeout_ns) } {
            Ok(()) => Ok(()),
            Err(vk::Result::TIMEOUT) => {
                engine_error!("nova3d::vulkan::Fence", "Fence wait timed out after {:?}", timeout);
                Err(Error::DeviceLost(format!("Fence wait timed out after {:?}", timeout)))
            }
            Err(e) => Err(queue_error("Fence wait", e)),
        }
    }

    fn reset(&self) -> Result<()> {
        unsafe { self.ctx.device.reset_fences(&[self.fence]) }
            .map_err(|e| queue_error("Fence reset", e))
    }

    fn is_signaled(&self) -> Result<bool> {
        unsafe { self.ctx.device.get_fence_status(self.fence) }
            .map_err(|e| queue_error("Fence status", e))
    }
}

impl Drop for Fence {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_fence(self.fence, None);
        }
    }
}

// ============================================================================
// SEMAPHORE
// ============================================================================

/// Vulkan binary semaphore implementation
pub struct Semaphore {
    ctx: Arc<GpuContext>,
    pub(crate) semaphore: vk::Semaphore,
}

impl Semaphore {
    pub(crate) fn new(ctx: Arc<GpuContext>, semaphore: vk::Semaphore) -> Self {
        Self { ctx, semaphore }
    }

    /// Underlying Vulkan handle (for swapchain acquire/present)
    pub fn raw(&self) -> vk::Semaphore {
        self.semaphore
    }
}

impl RendererSemaphore for Semaphore {}

impl Drop for Semaphore {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_semaphore(self.semaphore, None);
        }
    }
}

// ============================================================================
// QUEUE
// ============================================================================

/// Graphics queue
pub struct Queue {
    ctx: Arc<GpuContext>,
}

impl Queue {
    pub(crate) fn new(ctx: Arc<GpuContext>) -> Self {
        Self { ctx }
    }
}

impl RendererQueue for Queue {
    fn family_index(&self) -> u32 {
        self.ctx.graphics_queue_family
    }

    fn submit(&self, desc: &SubmitDesc) -> Result<()> {
        if desc.wait_semaphores.len() != desc.wait_stages.len() {
            engine_bail!(
                "nova3d::vulkan::Queue",
                "submit: {} wait semaphores for {} wait stages",
                desc.wait_semaphores.len(), desc.wait_stages.len()
            );
        }

        unsafe {
            // Downcast to Vulkan types
            let vk_cmd = &*(desc.command_list as *const dyn RendererCommandList as *const CommandList);
            let semaphores = |list: &[&Arc<dyn RendererSemaphore>]| -> Vec<vk::Semaphore> {
                list.iter()
                    .map(|s| (*(s.as_ref() as *const dyn RendererSemaphore as *const Semaphore)).semaphore)
                    .collect()
            };
            let wait_semaphores = semaphores(desc.wait_semaphores);
            let signal_semaphores = semaphores(desc.signal_semaphores);
            let wait_stages: Vec<vk::PipelineStageFlags> =
                desc.wait_stages.iter().map(|&s| pipeline_stage_to_vk(s)).collect();
            let fence = desc.fence
                .map(|f| (*(f as *const dyn RendererFence as *const Fence)).fence)
                .unwrap_or(vk::Fence::null());

            let command_buffers = [vk_cmd.command_buffer()];
            let submit_info = vk::SubmitInfo::default()
                .wait_semaphores(&wait_semaphores)
                .wait_dst_stage_mask(&wait_stages)
                .command_buffers(&command_buffers)
                .signal_semaphores(&signal_semaphores);

            let queue = self.ctx.graphics_queue()?;
            self.ctx.device
                .queue_submit(*queue, &[submit_info], fence)
                .map_err(|e| queue_error("Queue submit", e))
        }
    }

    fn wait_idle(&self) -> Result<()> {
        let queue = self.ctx.graphics_queue()?;
        unsafe { self.ctx.device.queue_wait_idle(*queue) }
            .map_err(|e| queue_error("Queue wait idle", e))
    }
}
