/// Draw queue - what scene traversal hands the technique each frame:
/// the visible lights and the mesh instances to draw.

use std::sync::Arc;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use crate::graphics_device::Buffer;

/// Stable identity of a scene object (camera or light) across frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(pub u32);

// ===== LIGHTS =====

/// Light type, encoded in `LightData::light_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum LightKind {
    Directional = 0,
    Point = 1,
    Spot = 2,
    Ambient = 3,
}

/// GPU layout of the per-light uniform block (std140 compatible, 96 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightData {
    pub ambient: [f32; 4],
    pub color: [f32; 4],
    /// xyz, w unused
    pub position: [f32; 4],
    /// xyz, w unused
    pub direction: [f32; 4],
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    pub falloff_angle: f32,
    pub falloff_exponent: f32,
    pub light_type: u32,
    pub _padding: [u32; 2],
}

/// A light as seen by the renderer
#[derive(Debug, Clone)]
pub struct Light {
    pub handle: Handle,
    pub kind: LightKind,
    pub ambient: Vec4,
    pub color: Vec4,
    /// World-space position (point, spot)
    pub position: Vec3,
    /// World-space direction (directional, spot)
    pub direction: Vec3,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    /// Spot cone angle in radians
    pub falloff_angle: f32,
    pub falloff_exponent: f32,
}

impl Light {
    /// A white light of the given kind with unit constant attenuation
    pub fn new(handle: Handle, kind: LightKind) -> Self {
        Self {
            handle,
            kind,
            ambient: Vec4::ZERO,
            color: Vec4::ONE,
            position: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
            falloff_angle: std::f32::consts::FRAC_PI_4,
            falloff_exponent: 0.0,
        }
    }

    /// Uniform block uploaded once per frame
    pub fn data(&self) -> LightData {
        LightData {
            ambient: self.ambient.to_array(),
            color: self.color.to_array(),
            position: self.position.extend(0.0).to_array(),
            direction: self.direction.extend(0.0).to_array(),
            constant: self.constant,
            linear: self.linear,
            quadratic: self.quadratic,
            falloff_angle: self.falloff_angle,
            falloff_exponent: self.falloff_exponent,
            light_type: self.kind as u32,
            _padding: [0; 2],
        }
    }
}

// ===== MESHES =====

/// One drawable range of a mesh: a position stream and optional 32-bit indices
#[derive(Clone)]
pub struct PrimitiveSet {
    /// Vertex positions; `None` means the set has no vertex data and is skipped
    pub position: Option<Arc<dyn Buffer>>,
    /// Bytes per vertex in `position`
    pub vertex_stride: u32,
    /// 32-bit index buffer
    pub indices: Option<Arc<dyn Buffer>>,
}

impl PrimitiveSet {
    /// Number of vertices in the position buffer
    pub fn vertex_count(&self) -> u32 {
        match (&self.position, self.vertex_stride) {
            (Some(buffer), stride) if stride > 0 => (buffer.size() / stride as u64) as u32,
            _ => 0,
        }
    }

    /// Number of 32-bit indices in the index buffer
    pub fn index_count(&self) -> u32 {
        self.indices
            .as_ref()
            .map(|buffer| (buffer.size() / 4) as u32)
            .unwrap_or(0)
    }
}

/// A mesh placed in the world
#[derive(Clone)]
pub struct MeshInstance {
    /// Model transform, pushed as a push constant per draw
    pub transform: Mat4,
    pub primitive_sets: Vec<PrimitiveSet>,
}

// ===== QUEUE =====

/// Ordered visible lights and mesh instances for one frame
#[derive(Clone, Default)]
pub struct DrawQueue {
    lights: Vec<Light>,
    meshes: Vec<MeshInstance>,
}

impl DrawQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn add_mesh(&mut self, mesh: MeshInstance) {
        self.meshes.push(mesh);
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn meshes(&self) -> &[MeshInstance] {
        &self.meshes
    }

    /// Remove everything, keeping allocations for the next frame
    pub fn clear(&mut self) {
        self.lights.clear();
        self.meshes.clear();
    }
}

#[cfg(test)]
#[path = "draw_queue_tests.rs"]
mod tests;
