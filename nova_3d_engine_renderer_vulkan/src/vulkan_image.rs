/// Image and ImageView - Vulkan implementations
///
/// Images are created unbound and bound once by
/// `VulkanGraphicsDevice::allocate_memory`. Views either own their
/// `VkImageView` (created by the device) or wrap one owned elsewhere
/// (swapchain views).

use nova_3d_engine::nova3d::graphics_device::{
    Image as RendererImage, ImageView as RendererImageView, ImageFormat,
};
use ash::vk;
use std::sync::{Arc, OnceLock};

use crate::vulkan_context::GpuContext;
use crate::vulkan_memory::MemoryBinding;

/// Vulkan image implementation
pub struct Image {
    /// Shared GPU context
    ctx: Arc<GpuContext>,
    /// Vulkan image
    pub(crate) image: vk::Image,
    width: u32,
    height: u32,
    format: ImageFormat,
    /// Memory the image is bound to (set once)
    pub(crate) binding: OnceLock<MemoryBinding>,
}

impl Image {
    pub(crate) fn new(ctx: Arc<GpuContext>, image: vk::Image, width: u32, height: u32, format: ImageFormat) -> Self {
        Self {
            ctx,
            image,
            width,
            height,
            format,
            binding: OnceLock::new(),
        }
    }
}

impl RendererImage for Image {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn format(&self) -> ImageFormat {
        self.format
    }
}

impl Drop for Image {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_image(self.image, None);
        }
    }
}

/// Vulkan image view implementation
pub struct ImageView {
    /// Shared GPU context
    ctx: Arc<GpuContext>,
    /// Vulkan image view handle
    pub(crate) image_view: vk::ImageView,
    width: u32,
    height: u32,
    format: ImageFormat,
    /// Viewed image, kept alive while the view exists (None for wrapped views)
    _image: Option<Arc<dyn RendererImage>>,
    /// Whether this view destroys its handle on drop
    owns_image_view: bool,
}

impl ImageView {
    /// View created by the device on one of its images
    pub(crate) fn new_owned(
        ctx: Arc<GpuContext>,
        image_view: vk::ImageView,
        image: Arc<dyn RendererImage>,
    ) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            format: image.format(),
            ctx,
            image_view,
            _image: Some(image),
            owns_image_view: true,
        }
    }

    /// View owned elsewhere (e.g. by the swapchain)
    pub(crate) fn new_wrapped(
        ctx: Arc<GpuContext>,
        image_view: vk::ImageView,
        width: u32,
        height: u32,
        format: ImageFormat,
    ) -> Self {
        Self {
            ctx,
            image_view,
            width,
            height,
            format,
            _image: None,
            owns_image_view: false,
        }
    }
}

impl RendererImageView for ImageView {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn format(&self) -> ImageFormat {
        self.format
    }
}

impl Drop for ImageView {
    fn drop(&mut self) {
        if self.owns_image_view {
            unsafe {
                self.ctx.device.destroy_image_view(self.image_view, None);
            }
        }
    }
}
