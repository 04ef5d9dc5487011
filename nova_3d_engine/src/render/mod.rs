//! Render module - draw queue, transient uniform allocation, frame slots
//! and the lighting techniques that drive them.

pub mod draw_queue;
pub mod sub_buffer_pool;
pub mod frame_data;
pub mod depth_buffers;
pub mod forward;
pub mod technique;

pub use draw_queue::{DrawQueue, Handle, Light, LightData, LightKind, MeshInstance, PrimitiveSet};
pub use sub_buffer_pool::{SubBuffer, SubBufferPool};
pub use frame_data::{FrameData, UniformPool};
pub use depth_buffers::{DepthBuffers, DEFAULT_DEPTH_FORMATS};
pub use forward::{Forward, ForwardConfig, FrameStats};
pub use technique::Technique;
