/// Framebuffer - Vulkan implementation of the Framebuffer trait
///
/// Wraps a VkFramebuffer that groups a color view and its depth view.
/// Created once per frame slot, reused each frame.

use nova_3d_engine::nova3d::graphics_device::{Framebuffer as RendererFramebuffer, ImageView as RendererImageView};
use ash::vk;
use std::sync::Arc;

use crate::vulkan_context::GpuContext;

/// Vulkan framebuffer implementation
///
/// Keeps its attachments alive; destroyed when dropped.
pub struct Framebuffer {
    /// Shared GPU context
    ctx: Arc<GpuContext>,
    /// Vulkan framebuffer handle
    pub(crate) framebuffer: vk::Framebuffer,
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Attachments, released after the framebuffer is destroyed
    _attachments: Vec<Arc<dyn RendererImageView>>,
}

impl Framebuffer {
    pub(crate) fn new(
        ctx: Arc<GpuContext>,
        framebuffer: vk::Framebuffer,
        width: u32,
        height: u32,
        attachments: Vec<Arc<dyn RendererImageView>>,
    ) -> Self {
        Self { ctx, framebuffer, width, height, _attachments: attachments }
    }
}

impl RendererFramebuffer for Framebuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_framebuffer(self.framebuffer, None);
        }
    }
}
