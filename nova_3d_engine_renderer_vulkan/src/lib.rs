/*!
# Nova 3D Engine - Vulkan Backend

Vulkan implementation of the `nova_3d_engine` graphics-device traits, built
on Ash for the Vulkan bindings and gpu-allocator for memory management.

Every object created by [`VulkanGraphicsDevice`] shares one GPU context, so
the logical device is destroyed only after the last of them is dropped.

# Example

```no_run
use std::sync::Arc;
use nova_3d_engine::nova3d::GraphicsDevice;
use nova_3d_engine::nova3d::camera::RenderView;
use nova_3d_engine::nova3d::render::{Config, Forward, ForwardConfig};
use nova_3d_engine_renderer_vulkan::nova3d::VulkanGraphicsDevice;

# fn run(window: &winit::window::Window, view: RenderView) -> nova_3d_engine::nova3d::Result<()> {
let device: Arc<dyn GraphicsDevice> = Arc::new(VulkanGraphicsDevice::new(window, Config::default())?);
let forward = Forward::new(device, view, ForwardConfig::default());
# let _ = forward;
# Ok(())
# }
```
*/

mod vulkan;
mod vulkan_context;
mod vulkan_format;
mod vulkan_memory;
mod vulkan_buffer;
mod vulkan_image;
mod vulkan_render_pass;
mod vulkan_frame_buffer;
mod vulkan_pipeline;
mod vulkan_sync;
mod vulkan_command_list;

#[cfg(feature = "vulkan-validation")]
mod debug;

/// Public API namespace
pub mod nova3d {
    pub use crate::vulkan::VulkanGraphicsDevice;
    pub use crate::vulkan_context::GpuContext;
    pub use crate::vulkan_buffer::Buffer;
    pub use crate::vulkan_memory::DeviceMemory;
    pub use crate::vulkan_image::{Image, ImageView};
    pub use crate::vulkan_render_pass::RenderPass;
    pub use crate::vulkan_frame_buffer::Framebuffer;
    pub use crate::vulkan_pipeline::Pipeline;
    pub use crate::vulkan_sync::{Fence, Queue, Semaphore};
    pub use crate::vulkan_command_list::{CommandList, CommandPool};

    /// Validation layer statistics (`vulkan-validation` feature)
    #[cfg(feature = "vulkan-validation")]
    pub mod validation {
        pub use crate::debug::{get_validation_stats, print_validation_stats_report, ValidationStats};
    }
}
