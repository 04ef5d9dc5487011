/// Buffer - Vulkan implementation of the Buffer trait
///
/// Created unbound; `VulkanGraphicsDevice::allocate_memory` binds it once.

use nova_3d_engine::nova3d::{
    Result,
    Error,
    graphics_device::{Buffer as RendererBuffer, BufferUsage},
};
use nova_3d_engine::engine_bail;
use ash::vk;
use std::sync::{Arc, OnceLock};

use crate::vulkan_context::GpuContext;
use crate::vulkan_memory::MemoryBinding;

/// Vulkan buffer implementation
pub struct Buffer {
    /// Shared GPU context
    ctx: Arc<GpuContext>,
    /// Vulkan buffer
    pub(crate) buffer: vk::Buffer,
    /// Buffer size requested at creation
    pub(crate) size: u64,
    /// Usage flags
    pub(crate) usage: BufferUsage,
    /// Memory the buffer is bound to (set once)
    pub(crate) binding: OnceLock<MemoryBinding>,
}

impl Buffer {
    pub(crate) fn new(ctx: Arc<GpuContext>, buffer: vk::Buffer, size: u64, usage: BufferUsage) -> Self {
        Self {
            ctx,
            buffer,
            size,
            usage,
            binding: OnceLock::new(),
        }
    }
}

impl RendererBuffer for Buffer {
    fn size(&self) -> u64 {
        self.size
    }

    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        if offset + data.len() as u64 > self.size {
            engine_bail!(
                "nova3d::vulkan::Buffer",
                "Buffer update out of range: {} bytes at offset {} (size {})",
                data.len(), offset, self.size
            );
        }
        let binding = self.binding.get().ok_or_else(|| {
            Error::InvalidResource("Buffer update before memory was bound".to_string())
        })?;
        let dst = binding.block.mapped_at(binding.offset + offset)?;

        unsafe {
            std::ptr::copy_nonoverlapping(data.as_ptr(), dst, data.len());
        }
        Ok(())
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        // The memory binding (if any) is released after the buffer is destroyed
        unsafe {
            self.ctx.device.destroy_buffer(self.buffer, None);
        }
    }
}
