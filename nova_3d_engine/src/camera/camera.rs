/// Camera - handle plus view and projection matrices
///
/// Matrices are supplied by the caller. The handle must stay stable across
/// frames: the Forward technique keys the camera's uniform sub-buffer on it
/// and releases that sub-buffer once a frame renders a different handle.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use crate::render::Handle;

/// Per-camera uniform block (128 bytes): view, then projection, column-major
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraData {
    pub view: Mat4,
    pub projection: Mat4,
}

/// Camera state read by `Forward::render`
#[derive(Debug, Clone)]
pub struct Camera {
    handle: Handle,
    view_matrix: Mat4,
    projection_matrix: Mat4,
}

impl Camera {
    pub fn new(handle: Handle, view: Mat4, projection: Mat4) -> Self {
        Self {
            handle,
            view_matrix: view,
            projection_matrix: projection,
        }
    }

    /// Key of the camera's uniform sub-buffer
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// World to view space
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    /// View to clip space
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// `projection * view`
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }

    /// Block written into the camera sub-buffer at the start of each frame
    pub fn data(&self) -> CameraData {
        CameraData {
            view: self.view_matrix,
            projection: self.projection_matrix,
        }
    }

    pub fn set_view(&mut self, matrix: Mat4) {
        self.view_matrix = matrix;
    }

    pub fn set_projection(&mut self, matrix: Mat4) {
        self.projection_matrix = matrix;
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
