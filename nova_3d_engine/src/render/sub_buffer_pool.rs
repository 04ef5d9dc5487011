/// Sub-buffer pool - chunked allocator for transient uniform data.
///
/// Each chunk is one device-local buffer (uniform + transfer-dst usage)
/// bound to its own memory block and sliced into `slots_per_chunk`
/// equal slots. Slot size is the requested size rounded up to the
/// device's minimum uniform buffer offset alignment, so every slot offset
/// is a valid dynamic/uniform offset.
///
/// Chunks are created on demand and never released individually: the
/// pool grows to its peak concurrent demand and keeps that capacity until
/// it is dropped. Sub-buffers reference their chunk by index.
///
/// Not internally synchronized; owned and driven by one rendering thread.

use std::sync::Arc;
use crate::error::{Error, Result};
use crate::graphics_device::{
    GraphicsDevice, Buffer, BufferDesc, BufferUsage, DeviceMemory, DeviceMemoryDesc, MemoryLocation,
};
use crate::utils::SlotAllocator;
use crate::{engine_debug, engine_warn};

/// Handle on one slot of a pool chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubBuffer {
    chunk: u32,
    slot: u32,
    offset: u64,
    size: u64,
}

impl SubBuffer {
    /// Index of the owning chunk
    pub fn chunk(&self) -> u32 {
        self.chunk
    }

    /// Slot index within the chunk
    pub fn slot(&self) -> u32 {
        self.slot
    }

    /// Byte offset within the chunk buffer
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Usable size in bytes (the aligned slot size)
    pub fn size(&self) -> u64 {
        self.size
    }
}

struct Chunk {
    buffer: Arc<dyn Buffer>,
    _memory: Arc<dyn DeviceMemory>,
    slots: SlotAllocator,
}

/// Round `size` up to a multiple of `alignment` (0 or 1 means unaligned)
pub fn align_up(size: u64, alignment: u64) -> u64 {
    if alignment <= 1 {
        return size;
    }
    size.div_ceil(alignment) * alignment
}

pub struct SubBufferPool {
    device: Arc<dyn GraphicsDevice>,
    name: String,
    slots_per_chunk: u32,
    slot_size: u64,
    chunks: Vec<Chunk>,
}

impl SubBufferPool {
    /// Create an empty pool; no GPU memory is allocated until the first `allocate()`
    ///
    /// # Arguments
    ///
    /// * `device` - Device that creates chunk buffers and memory
    /// * `name` - Name used in log messages
    /// * `slots_per_chunk` - Number of slots in each chunk
    /// * `slot_size` - Requested bytes per slot (rounded up to the device alignment)
    pub fn new(
        device: Arc<dyn GraphicsDevice>,
        name: &str,
        slots_per_chunk: u32,
        slot_size: u64,
    ) -> Result<Self> {
        if slots_per_chunk == 0 || slot_size == 0 {
            return Err(Error::InvalidResource(format!(
                "SubBufferPool '{}': slots_per_chunk ({}) and slot_size ({}) must be non-zero",
                name, slots_per_chunk, slot_size
            )));
        }
        let alignment = device.limits().min_uniform_buffer_offset_alignment;
        let slot_size = align_up(slot_size, alignment);

        Ok(Self {
            device,
            name: name.to_string(),
            slots_per_chunk,
            slot_size,
            chunks: Vec::new(),
        })
    }

    /// Take a free slot, creating a new chunk if every chunk is full
    ///
    /// Chunks are scanned in creation order. Fails only if creating a new
    /// chunk's buffer or memory fails.
    pub fn allocate(&mut self) -> Result<SubBuffer> {
        let slot_size = self.slot_size;
        for (index, chunk) in self.chunks.iter_mut().enumerate() {
            if let Some(slot) = chunk.slots.alloc() {
                return Ok(Self::sub_buffer(slot_size, index as u32, slot));
            }
        }

        let index = self.create_chunk()?;
        let slot = self.chunks[index as usize].slots.alloc().ok_or_else(|| {
            Error::BackendError(format!("SubBufferPool '{}': fresh chunk has no free slot", self.name))
        })?;
        Ok(Self::sub_buffer(slot_size, index, slot))
    }

    /// Return a slot to its chunk's free list
    ///
    /// The caller guarantees the GPU no longer reads the slot. Freeing a
    /// slot that is not currently allocated is rejected.
    pub fn free(&mut self, sub_buffer: SubBuffer) -> Result<()> {
        let chunk = self.chunks.get_mut(sub_buffer.chunk as usize).ok_or_else(|| {
            Error::InvalidResource(format!("SubBufferPool: chunk {} does not exist", sub_buffer.chunk))
        })?;
        if !chunk.slots.free(sub_buffer.slot) {
            engine_warn!(
                "nova3d::SubBufferPool",
                "'{}': slot {} of chunk {} freed while not allocated",
                self.name, sub_buffer.slot, sub_buffer.chunk
            );
            return Err(Error::InvalidResource(format!(
                "SubBufferPool '{}': slot {} of chunk {} is not allocated",
                self.name, sub_buffer.slot, sub_buffer.chunk
            )));
        }
        Ok(())
    }

    /// Buffer backing `sub_buffer`
    pub fn buffer(&self, sub_buffer: &SubBuffer) -> Result<&Arc<dyn Buffer>> {
        self.chunks
            .get(sub_buffer.chunk as usize)
            .map(|chunk| &chunk.buffer)
            .ok_or_else(|| Error::InvalidResource(format!(
                "SubBufferPool '{}': chunk {} does not exist",
                self.name, sub_buffer.chunk
            )))
    }

    /// Aligned slot size in bytes
    pub fn slot_size(&self) -> u64 {
        self.slot_size
    }

    pub fn slots_per_chunk(&self) -> u32 {
        self.slots_per_chunk
    }

    /// Number of chunks created so far
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of slots currently allocated across all chunks
    pub fn live_count(&self) -> u32 {
        self.chunks.iter().map(|chunk| chunk.slots.len()).sum()
    }

    fn sub_buffer(slot_size: u64, chunk: u32, slot: u32) -> SubBuffer {
        SubBuffer {
            chunk,
            slot,
            offset: slot as u64 * slot_size,
            size: slot_size,
        }
    }

    fn create_chunk(&mut self) -> Result<u32> {
        let buffer = self.device.create_buffer(&BufferDesc {
            size: self.slot_size * self.slots_per_chunk as u64,
            usage: BufferUsage::UNIFORM | BufferUsage::TRANSFER_DST,
        })?;
        let memory = self.device.allocate_memory(&DeviceMemoryDesc {
            location: MemoryLocation::DeviceLocal,
            buffers: std::slice::from_ref(&buffer),
            images: &[],
        })?;

        let index = self.chunks.len() as u32;
        self.chunks.push(Chunk {
            buffer,
            _memory: memory,
            slots: SlotAllocator::new(self.slots_per_chunk),
        });

        engine_debug!(
            "nova3d::SubBufferPool",
            "'{}': created chunk {} ({} slots x {} bytes)",
            self.name, index, self.slots_per_chunk, self.slot_size
        );
        Ok(index)
    }
}

#[cfg(test)]
#[path = "sub_buffer_pool_tests.rs"]
mod tests;
