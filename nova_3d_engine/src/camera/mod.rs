//! Camera module - the viewpoint a technique renders from.
//!
//! Cameras are caller-owned values: the engine reads them each frame and
//! keeps only their uploaded uniform block, keyed by `Handle`.

mod camera;
mod render_view;

pub use camera::{Camera, CameraData};
pub use render_view::RenderView;
