/// DeviceMemory - one gpu-allocator allocation shared by several resources
///
/// `VulkanGraphicsDevice::allocate_memory` lays the resources out back to
/// back (each at its own alignment), makes a single allocation and binds
/// every resource at its offset. The allocation lives in a `MemoryBlock`
/// that each bound resource also references, so it is freed only after the
/// last resource using it has been destroyed.

use ash::vk;
use gpu_allocator::vulkan::Allocation;
use std::ptr::NonNull;
use std::sync::{Arc, Mutex};
use nova_3d_engine::nova3d::{Error, Result};
use nova_3d_engine::nova3d::graphics_device::{DeviceMemory as RendererDeviceMemory, MemoryLocation};
use nova_3d_engine::engine_error;

use crate::vulkan_context::GpuContext;

/// Start of a persistently mapped allocation
#[derive(Clone, Copy)]
pub(crate) struct MappedPtr(NonNull<u8>);

// The mapping stays valid for the lifetime of the owning MemoryBlock.
unsafe impl Send for MappedPtr {}
unsafe impl Sync for MappedPtr {}

impl MappedPtr {
    pub(crate) fn as_ptr(&self) -> *mut u8 {
        self.0.as_ptr()
    }
}

/// Backing allocation, shared by the memory handle and every bound resource
pub(crate) struct MemoryBlock {
    ctx: Arc<GpuContext>,
    allocation: Mutex<Option<Allocation>>,
    memory: vk::DeviceMemory,
    base_offset: u64,
    size: u64,
    location: MemoryLocation,
    mapped: Option<MappedPtr>,
}

impl MemoryBlock {
    pub(crate) fn new(ctx: Arc<GpuContext>, allocation: Allocation, location: MemoryLocation) -> Self {
        let mapped = allocation.mapped_ptr().map(|ptr| MappedPtr(ptr.cast::<u8>()));
        Self {
            memory: unsafe { allocation.memory() },
            base_offset: allocation.offset(),
            size: allocation.size(),
            allocation: Mutex::new(Some(allocation)),
            ctx,
            location,
            mapped,
        }
    }

    /// `vkDeviceMemory` handle and offset of this block inside it
    pub(crate) fn memory_and_offset(&self) -> (vk::DeviceMemory, u64) {
        (self.memory, self.base_offset)
    }

    /// Host pointer at `offset` bytes into the block
    pub(crate) fn mapped_at(&self, offset: u64) -> Result<*mut u8> {
        let mapped = self.mapped.ok_or_else(|| {
            Error::BackendError("Memory is not host-visible".to_string())
        })?;
        Ok(unsafe { mapped.as_ptr().add(offset as usize) })
    }
}

impl Drop for MemoryBlock {
    fn drop(&mut self) {
        let allocation = match self.allocation.get_mut() {
            Ok(allocation) => allocation.take(),
            Err(_) => None,
        };
        if let Some(allocation) = allocation {
            match self.ctx.allocator() {
                Ok(mut allocator) => {
                    if let Err(e) = allocator.free(allocation) {
                        engine_error!("nova3d::vulkan::DeviceMemory", "Failed to free allocation: {:?}", e);
                    }
                }
                Err(e) => engine_error!("nova3d::vulkan::DeviceMemory", "Leaking allocation: {}", e),
            }
        }
    }
}

/// Where a resource lives inside a block
pub(crate) struct MemoryBinding {
    pub(crate) block: Arc<MemoryBlock>,
    pub(crate) offset: u64,
}

/// Vulkan device memory handle
pub struct DeviceMemory {
    block: Arc<MemoryBlock>,
}

impl DeviceMemory {
    pub(crate) fn new(block: Arc<MemoryBlock>) -> Self {
        Self { block }
    }
}

impl RendererDeviceMemory for DeviceMemory {
    fn size(&self) -> u64 {
        self.block.size
    }

    fn location(&self) -> MemoryLocation {
        self.block.location
    }
}
