/// Image and image view traits

use bitflags::bitflags;

/// Image pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum ImageFormat {
    // Color formats
    R8G8B8A8_SRGB,
    R8G8B8A8_UNORM,
    B8G8R8A8_SRGB,
    B8G8R8A8_UNORM,

    // Depth/stencil formats
    D16_UNORM,
    D32_SFLOAT,
    D24_UNORM_S8_UINT,
    D32_SFLOAT_S8_UINT,
}

impl ImageFormat {
    /// Whether this format has a depth component
    pub fn is_depth(&self) -> bool {
        matches!(
            self,
            ImageFormat::D16_UNORM
                | ImageFormat::D32_SFLOAT
                | ImageFormat::D24_UNORM_S8_UINT
                | ImageFormat::D32_SFLOAT_S8_UINT
        )
    }

    /// Whether this format has a stencil component
    pub fn has_stencil(&self) -> bool {
        matches!(self, ImageFormat::D24_UNORM_S8_UINT | ImageFormat::D32_SFLOAT_S8_UINT)
    }
}

bitflags! {
    /// Image usage flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ImageUsage: u32 {
        const SAMPLED = 1 << 0;
        const COLOR_ATTACHMENT = 1 << 1;
        const DEPTH_STENCIL_ATTACHMENT = 1 << 2;
        const TRANSFER_SRC = 1 << 3;
        const TRANSFER_DST = 1 << 4;
    }
}

/// Which aspect of an image a view exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageAspect {
    Color,
    Depth,
}

/// Descriptor for creating a 2D image
#[derive(Debug, Clone)]
pub struct ImageDesc {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub usage: ImageUsage,
}

/// Image resource trait
///
/// Created unbound; memory is attached through `GraphicsDevice::allocate_memory`.
pub trait Image: Send + Sync {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn format(&self) -> ImageFormat;
}

/// View on an image, usable as a framebuffer attachment
///
/// Swapchain color views are provided by the presentation layer through
/// the same trait.
pub trait ImageView: Send + Sync {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn format(&self) -> ImageFormat;
}
