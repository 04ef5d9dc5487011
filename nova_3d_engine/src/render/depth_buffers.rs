/// Depth buffer and framebuffer provisioning
///
/// One depth image per swapchain color view, each sized to its view. All
/// depth images share a single device-local allocation. Framebuffers pair
/// each color view with its depth view.

use std::sync::Arc;
use crate::error::{Error, Result};
use crate::graphics_device::{
    GraphicsDevice, DeviceMemory, DeviceMemoryDesc, Framebuffer, FramebufferDesc, Image,
    ImageAspect, ImageDesc, ImageFormat, ImageUsage, ImageView, MemoryLocation, RenderPass,
};
use crate::{engine_bail, engine_debug};

/// Depth formats tried in order when none is configured
pub const DEFAULT_DEPTH_FORMATS: [ImageFormat; 3] = [
    ImageFormat::D32_SFLOAT,
    ImageFormat::D32_SFLOAT_S8_UINT,
    ImageFormat::D24_UNORM_S8_UINT,
];

/// First format of `preferred` usable as a depth attachment
pub fn select_depth_format(device: &dyn GraphicsDevice, preferred: &[ImageFormat]) -> Result<ImageFormat> {
    for &format in preferred {
        if format.is_depth() && device.supports_format(format, ImageUsage::DEPTH_STENCIL_ATTACHMENT) {
            return Ok(format);
        }
    }
    engine_bail!("nova3d::DepthBuffers", "No supported depth format among {:?}", preferred);
}

/// Depth images, their views and the shared allocation backing them
pub struct DepthBuffers {
    format: ImageFormat,
    views: Vec<Arc<dyn ImageView>>,
    images: Vec<Arc<dyn Image>>,
    _memory: Arc<dyn DeviceMemory>,
}

impl DepthBuffers {
    /// Create one depth image + view per color view
    pub fn create(
        device: &dyn GraphicsDevice,
        color_views: &[Arc<dyn ImageView>],
        format: ImageFormat,
    ) -> Result<Self> {
        if color_views.is_empty() {
            return Err(Error::InvalidResource("DepthBuffers: no color views".to_string()));
        }

        let images = color_views
            .iter()
            .map(|view| {
                device.create_image(&ImageDesc {
                    width: view.width(),
                    height: view.height(),
                    format,
                    usage: ImageUsage::DEPTH_STENCIL_ATTACHMENT,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let memory = device.allocate_memory(&DeviceMemoryDesc {
            location: MemoryLocation::DeviceLocal,
            buffers: &[],
            images: &images,
        })?;

        let views = images
            .iter()
            .map(|image| device.create_image_view(image, ImageAspect::Depth))
            .collect::<Result<Vec<_>>>()?;

        engine_debug!(
            "nova3d::DepthBuffers",
            "Created {} depth buffers ({:?}, {} bytes)",
            images.len(), format, memory.size()
        );

        Ok(Self { format, views, images, _memory: memory })
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn image(&self, index: usize) -> Option<&Arc<dyn Image>> {
        self.images.get(index)
    }

    pub fn view(&self, index: usize) -> Option<&Arc<dyn ImageView>> {
        self.views.get(index)
    }

    /// One framebuffer per color view: `[color, depth]` at the color view's extent
    pub fn create_framebuffers(
        &self,
        device: &dyn GraphicsDevice,
        render_pass: &Arc<dyn RenderPass>,
        color_views: &[Arc<dyn ImageView>],
    ) -> Result<Vec<Arc<dyn Framebuffer>>> {
        if color_views.len() != self.views.len() {
            engine_bail!(
                "nova3d::DepthBuffers",
                "{} color views for {} depth buffers",
                color_views.len(), self.views.len()
            );
        }

        color_views
            .iter()
            .zip(&self.views)
            .map(|(color, depth)| {
                device.create_framebuffer(&FramebufferDesc {
                    render_pass,
                    attachments: vec![color.clone(), depth.clone()],
                    width: color.width(),
                    height: color.height(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "depth_buffers_tests.rs"]
mod tests;
