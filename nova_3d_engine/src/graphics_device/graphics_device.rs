/// GraphicsDevice trait - factory for every GPU object the engine consumes
///
/// Backends (Vulkan today) implement this trait; the engine only ever sees
/// `Arc<dyn GraphicsDevice>` and the resource traits it hands out.

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{
    Buffer, BufferDesc, CommandPool, DeviceMemory, DeviceMemoryDesc, Fence, Framebuffer,
    FramebufferDesc, Image, ImageAspect, ImageDesc, ImageFormat, ImageUsage, ImageView, Queue,
    RenderPass, RenderPassDesc, Semaphore,
};

/// Device creation configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Enable validation/debug layers
    pub enable_validation: bool,
    /// Application name
    pub app_name: String,
    /// Application version (major, minor, patch)
    pub app_version: (u32, u32, u32),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_validation: cfg!(debug_assertions),
            app_name: "Nova3D Application".to_string(),
            app_version: (1, 0, 0),
        }
    }
}

/// Device limits the engine depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceLimits {
    /// Required alignment of uniform buffer offsets, in bytes (power of two)
    pub min_uniform_buffer_offset_alignment: u64,
}

/// GPU object factory
///
/// All methods take `&self`: backends synchronize internally where needed.
pub trait GraphicsDevice: Send + Sync {
    /// Device limits
    fn limits(&self) -> DeviceLimits;

    /// Whether `format` can be used as an optimal-tiling image with `usage`
    fn supports_format(&self, format: ImageFormat, usage: ImageUsage) -> bool;

    /// Create an unbound buffer
    fn create_buffer(&self, desc: &BufferDesc) -> Result<Arc<dyn Buffer>>;

    /// Create an unbound 2D image
    fn create_image(&self, desc: &ImageDesc) -> Result<Arc<dyn Image>>;

    /// Allocate one block of memory and bind every listed resource into it
    fn allocate_memory(&self, desc: &DeviceMemoryDesc) -> Result<Arc<dyn DeviceMemory>>;

    /// Create a view on a bound image
    fn create_image_view(&self, image: &Arc<dyn Image>, aspect: ImageAspect) -> Result<Arc<dyn ImageView>>;

    /// Create a render pass
    fn create_render_pass(&self, desc: &RenderPassDesc) -> Result<Arc<dyn RenderPass>>;

    /// Create a framebuffer
    fn create_framebuffer(&self, desc: &FramebufferDesc) -> Result<Arc<dyn Framebuffer>>;

    /// Create a command pool for the given queue family
    fn create_command_pool(&self, queue_family_index: u32) -> Result<Arc<dyn CommandPool>>;

    /// Create a fence, optionally already signaled
    fn create_fence(&self, signaled: bool) -> Result<Box<dyn Fence>>;

    /// Create a semaphore
    fn create_semaphore(&self) -> Result<Arc<dyn Semaphore>>;

    /// The graphics-capable queue
    fn graphics_queue(&self) -> Result<Arc<dyn Queue>>;

    /// Block until the whole device is idle
    fn wait_idle(&self) -> Result<()>;
}
