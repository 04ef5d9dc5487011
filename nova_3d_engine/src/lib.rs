/*!
# Nova 3D Engine

Core traits and types for the Nova 3D forward renderer.

This crate provides the platform-agnostic side of the renderer: the
`GraphicsDevice` trait family that backends implement (Vulkan lives in
`nova_3d_engine_renderer_vulkan`), and the per-frame machinery built on top
of it.

## Architecture

- **GraphicsDevice**: Factory trait for buffers, images, device memory,
  render passes, framebuffers, command pools, fences and semaphores
- **SubBufferPool**: Fixed-size uniform slots carved out of growable chunks
- **FrameData**: One frame slot (fence, command list, framebuffer, deferred frees)
- **DepthBuffers**: One depth image per swapchain image in a single allocation
- **Forward**: Multi-light additive forward technique driving all of the above
*/

// Internal modules
mod error;
mod engine;
mod utils;
pub mod log;
pub mod graphics_device;
pub mod camera;
pub mod render;

// Main nova3d namespace module
pub mod nova3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton (logging)
    pub use crate::engine::Engine;

    // Device factory trait implemented by backends
    pub use crate::graphics_device::GraphicsDevice;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // GPU abstraction implemented by backends
    pub mod graphics_device {
        pub use crate::graphics_device::*;
    }

    // Camera and render view
    pub mod camera {
        pub use crate::camera::*;
    }

    // Draw queue, sub-buffer pools, frame slots and techniques
    pub mod render {
        pub use crate::render::*;
        pub use crate::graphics_device::Config;
    }
}

// Re-export math library at crate root
pub use glam;
