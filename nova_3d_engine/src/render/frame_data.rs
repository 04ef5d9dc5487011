/// Per-frame slot state: one per swapchain image, reused round-robin.

use std::sync::Arc;
use crate::graphics_device::{CommandList, Fence, Framebuffer};
use crate::render::SubBuffer;

/// Which pool a deferred sub-buffer belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformPool {
    Camera,
    Light,
}

/// Resources of one frame in flight
///
/// The fence is created signaled so the first `render()` on the slot does
/// not block. Sub-buffers replaced while recording this slot are parked in
/// the pending-free list and go back to their pool only after the fence
/// has been waited on during the slot's next use.
pub struct FrameData {
    pub fence: Box<dyn Fence>,
    pub command_list: Box<dyn CommandList>,
    pub framebuffer: Arc<dyn Framebuffer>,
    /// False after a reset that was not followed by a successful submit:
    /// nothing will ever signal the fence.
    pub fence_armed: bool,
    pending_frees: Vec<(UniformPool, SubBuffer)>,
}

impl FrameData {
    pub fn new(
        fence: Box<dyn Fence>,
        command_list: Box<dyn CommandList>,
        framebuffer: Arc<dyn Framebuffer>,
    ) -> Self {
        Self {
            fence,
            command_list,
            framebuffer,
            fence_armed: true,
            pending_frees: Vec::new(),
        }
    }

    /// Park a sub-buffer until this slot's fence is next observed signaled
    pub fn defer_free(&mut self, pool: UniformPool, sub_buffer: SubBuffer) {
        self.pending_frees.push((pool, sub_buffer));
    }

    /// Take every parked sub-buffer
    pub fn take_pending_frees(&mut self) -> Vec<(UniformPool, SubBuffer)> {
        std::mem::take(&mut self.pending_frees)
    }

    pub fn pending_free_count(&self) -> usize {
        self.pending_frees.len()
    }
}
