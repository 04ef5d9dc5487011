/// Framebuffer - the color and depth views one frame slot renders into
///
/// Built once per frame slot and rebuilt only when the color views change
/// (`Forward::rebuild_targets`).

use std::sync::Arc;
use crate::graphics_device::{RenderPass, ImageView};

/// Backend framebuffer; keeps its attachment views alive
pub trait Framebuffer: Send + Sync {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
}

/// Descriptor for creating a framebuffer
pub struct FramebufferDesc<'a> {
    /// Render pass the framebuffer must be compatible with
    pub render_pass: &'a Arc<dyn RenderPass>,
    /// Views in render pass attachment order (color, then depth)
    pub attachments: Vec<Arc<dyn ImageView>>,
    pub width: u32,
    pub height: u32,
}
