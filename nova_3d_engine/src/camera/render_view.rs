/// RenderView - a camera and the framebuffer region it renders into

use crate::graphics_device::{Viewport, Rect2D};
use super::camera::Camera;

/// Camera, viewport and optional scissor of one rendered view
///
/// The viewport also defines the render pass render area.
#[derive(Debug, Clone)]
pub struct RenderView {
    camera: Camera,
    viewport: Viewport,
    scissor: Option<Rect2D>,
}

impl RenderView {
    /// View without an explicit scissor
    pub fn new(camera: Camera, viewport: Viewport) -> Self {
        Self {
            camera,
            viewport,
            scissor: None,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn scissor(&self) -> Option<&Rect2D> {
        self.scissor.as_ref()
    }

    /// Viewport rectangle truncated to whole pixels
    pub fn render_area(&self) -> Rect2D {
        Rect2D {
            x: self.viewport.x as i32,
            y: self.viewport.y as i32,
            width: self.viewport.width as u32,
            height: self.viewport.height as u32,
        }
    }

    /// Scissor recorded each frame: the explicit one, else the render area
    pub fn effective_scissor(&self) -> Rect2D {
        self.scissor.unwrap_or_else(|| self.render_area())
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// `None` falls back to the render area
    pub fn set_scissor(&mut self, scissor: Option<Rect2D>) {
        self.scissor = scissor;
    }
}

#[cfg(test)]
#[path = "render_view_tests.rs"]
mod tests;
