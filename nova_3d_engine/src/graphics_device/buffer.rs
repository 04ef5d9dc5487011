/// Buffer trait and buffer descriptor

use bitflags::bitflags;
use crate::error::Result;

bitflags! {
    /// Buffer usage flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        /// Vertex buffer
        const VERTEX = 1 << 0;
        /// Index buffer
        const INDEX = 1 << 1;
        /// Uniform/constant buffer
        const UNIFORM = 1 << 2;
        /// Storage buffer
        const STORAGE = 1 << 3;
        /// Destination of transfer commands (`CommandList::update_buffer`)
        const TRANSFER_DST = 1 << 4;
    }
}

/// Descriptor for creating a buffer
///
/// Buffers are created unbound: memory is attached afterwards through
/// `GraphicsDevice::allocate_memory`.
#[derive(Debug, Clone)]
pub struct BufferDesc {
    /// Size in bytes
    pub size: u64,
    /// Buffer usage
    pub usage: BufferUsage,
}

/// Buffer resource trait
///
/// Implemented by backend-specific buffer types (e.g., vulkan::Buffer).
/// The buffer is automatically destroyed when dropped.
pub trait Buffer: Send + Sync {
    /// Size in bytes requested at creation
    fn size(&self) -> u64;

    /// Update buffer data from the CPU
    ///
    /// Only valid for buffers bound to host-visible memory. Device-local
    /// buffers are written with `CommandList::update_buffer` instead.
    ///
    /// # Arguments
    ///
    /// * `offset` - Offset into the buffer in bytes
    /// * `data` - Data to write
    fn update(&self, offset: u64, data: &[u8]) -> Result<()>;
}
