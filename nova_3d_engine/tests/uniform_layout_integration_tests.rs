//! Integration tests for the uniform block layouts shared with shaders
//!
//! The forward shaders read the camera block as two column-major mat4 and
//! the light block as std140; these tests pin the byte layout through the
//! public API. No GPU required.
//!
//! Run with: cargo test --test uniform_layout_integration_tests

use nova_3d_engine::glam::{Mat4, Vec3, Vec4};
use nova_3d_engine::nova3d::camera::{Camera, CameraData};
use nova_3d_engine::nova3d::render::{DrawQueue, Handle, Light, LightData, LightKind};

fn f32_at(bytes: &[u8], offset: usize) -> f32 {
    f32::from_ne_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_ne_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

#[test]
fn test_integration_camera_block_layout() {
    assert_eq!(std::mem::size_of::<CameraData>(), 128);

    let view = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
    let projection = Mat4::from_scale(Vec3::splat(2.0));
    let camera = Camera::new(Handle(1), view, projection);
    let data = camera.data();
    let bytes = bytemuck::bytes_of(&data);

    // Column 3 of the view matrix holds the translation
    assert_eq!(f32_at(bytes, 48), 1.0);
    assert_eq!(f32_at(bytes, 52), 2.0);
    assert_eq!(f32_at(bytes, 56), 3.0);
    // Projection starts after the 64-byte view matrix
    assert_eq!(f32_at(bytes, 64), 2.0);
}

#[test]
fn test_integration_light_block_layout() {
    assert_eq!(std::mem::size_of::<LightData>(), 96);

    let mut light = Light::new(Handle(4), LightKind::Spot);
    light.color = Vec4::new(0.5, 0.25, 1.0, 1.0);
    light.position = Vec3::new(10.0, 20.0, 30.0);
    light.quadratic = 0.125;
    light.falloff_exponent = 8.0;
    let data = light.data();
    let bytes = bytemuck::bytes_of(&data);

    assert_eq!(f32_at(bytes, 16), 0.5);
    assert_eq!(f32_at(bytes, 32), 10.0);
    assert_eq!(f32_at(bytes, 44), 0.0);
    assert_eq!(f32_at(bytes, 72), 0.125);
    assert_eq!(f32_at(bytes, 80), 8.0);
    assert_eq!(u32_at(bytes, 84), 2);
}

#[test]
fn test_integration_draw_queue_is_reusable_between_frames() {
    let mut queue = DrawQueue::new();
    for handle in 0..3 {
        queue.add_light(Light::new(Handle(handle), LightKind::Point));
    }
    assert_eq!(queue.lights().len(), 3);

    queue.clear();
    assert!(queue.lights().is_empty());
    assert!(queue.meshes().is_empty());

    queue.add_light(Light::new(Handle(9), LightKind::Ambient));
    assert_eq!(queue.lights()[0].data().light_type, 3);
}
