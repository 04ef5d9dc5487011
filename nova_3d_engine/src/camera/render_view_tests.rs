use glam::Mat4;
use crate::graphics_device::{Viewport, Rect2D};
use crate::render::Handle;
use super::*;

fn create_test_viewport() -> Viewport {
    Viewport {
        x: 10.0,
        y: 20.0,
        width: 1920.0,
        height: 1080.0,
        min_depth: 0.0,
        max_depth: 1.0,
    }
}

fn create_view() -> RenderView {
    RenderView::new(Camera::new(Handle(1), Mat4::IDENTITY, Mat4::IDENTITY), create_test_viewport())
}

#[test]
fn test_render_view_new() {
    let view = create_view();
    assert_eq!(view.camera().handle(), Handle(1));
    assert_eq!(view.viewport().width, 1920.0);
    assert!(view.scissor().is_none());
}

#[test]
fn test_render_area_from_viewport() {
    let view = create_view();
    assert_eq!(view.render_area(), Rect2D { x: 10, y: 20, width: 1920, height: 1080 });
}

#[test]
fn test_effective_scissor_defaults_to_viewport() {
    let view = create_view();
    assert_eq!(view.effective_scissor(), view.render_area());
}

#[test]
fn test_effective_scissor_explicit() {
    let mut view = create_view();
    let scissor = Rect2D { x: 100, y: 100, width: 800, height: 600 };
    view.set_scissor(Some(scissor));

    assert_eq!(view.effective_scissor(), scissor);
    view.set_scissor(None);
    assert_eq!(view.effective_scissor(), view.render_area());
}

#[test]
fn test_camera_mut_updates_in_place() {
    let mut view = create_view();
    let moved = Mat4::from_translation(glam::Vec3::new(0.0, 1.0, 0.0));
    view.camera_mut().set_view(moved);
    assert_eq!(*view.camera().view_matrix(), moved);
}

#[test]
fn test_set_camera_and_viewport() {
    let mut view = create_view();
    view.set_camera(Camera::new(Handle(7), Mat4::IDENTITY, Mat4::IDENTITY));
    let mut viewport = create_test_viewport();
    viewport.width = 640.0;
    view.set_viewport(viewport);

    assert_eq!(view.camera().handle(), Handle(7));
    assert_eq!(view.render_area().width, 640);
}
