/// Device memory - one allocation backing one or more buffers/images

use std::sync::Arc;
use crate::graphics_device::{Buffer, Image};

/// Where an allocation lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryLocation {
    /// GPU-only memory (fastest for the GPU, not mappable)
    DeviceLocal,
    /// CPU-visible memory, persistently mapped
    HostVisible,
}

/// Descriptor for a shared device-memory allocation
///
/// Every listed resource is bound into the same allocation, each at an
/// offset that satisfies its own alignment requirement.
pub struct DeviceMemoryDesc<'a> {
    /// Requested memory location
    pub location: MemoryLocation,
    /// Buffers to bind
    pub buffers: &'a [Arc<dyn Buffer>],
    /// Images to bind
    pub images: &'a [Arc<dyn Image>],
}

/// Device memory trait
///
/// The allocation is released when dropped. Resources bound into it must
/// be dropped first.
pub trait DeviceMemory: Send + Sync {
    /// Total size of the allocation in bytes
    fn size(&self) -> u64;

    /// Location the allocation was made in
    fn location(&self) -> MemoryLocation;
}
