/// CommandList and CommandPool - the recording surface the Forward technique drives

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{
    RenderPass, Framebuffer, Pipeline, Buffer, IndexType, ShaderStage,
};

/// Primary command list
///
/// One per frame slot: re-recorded every frame after the slot fence
/// confirms the previous recording has finished executing, then handed to
/// `Queue::submit()`.
pub trait CommandList: Send + Sync {
    /// Discard previous contents and start recording
    ///
    /// Fails while a recording is still open; call `reset()` first to
    /// abandon one.
    fn begin(&mut self) -> Result<()>;

    /// Abandon any recording in progress, including an open render pass,
    /// and return the list to its initial state
    fn reset(&mut self) -> Result<()>;

    /// Finish recording; the list can then be submitted
    fn end(&mut self) -> Result<()>;

    /// Begin `render_pass` on `framebuffer`
    ///
    /// `clear_values` holds one entry per attachment, in attachment order.
    /// Uniform writes recorded with `update_buffer` earlier in the list are
    /// visible to shaders inside the pass.
    fn begin_render_pass(
        &mut self,
        render_pass: &Arc<dyn RenderPass>,
        framebuffer: &Arc<dyn Framebuffer>,
        render_area: Rect2D,
        clear_values: &[ClearValue],
    ) -> Result<()>;

    fn end_render_pass(&mut self) -> Result<()>;

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()>;

    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()>;

    /// Dynamic blend constants (the light passes blend additively from the second light on)
    fn set_blend_constants(&mut self, constants: [f32; 4]) -> Result<()>;

    fn bind_pipeline(&mut self, pipeline: &Arc<dyn Pipeline>) -> Result<()>;

    /// Write `data` into the push constant range of the bound pipeline's layout
    ///
    /// Fails when no pipeline is bound.
    fn push_constants(&mut self, stages: &[ShaderStage], offset: u32, data: &[u8]) -> Result<()>;

    /// Record a GPU-side write of `data` into `buffer` at `offset`
    ///
    /// Must be recorded outside a render pass. `data` length must be a
    /// multiple of 4 and at most 65536 bytes.
    fn update_buffer(&mut self, buffer: &Arc<dyn Buffer>, offset: u64, data: &[u8]) -> Result<()>;

    /// Bind `buffer` as vertex binding 0
    fn bind_vertex_buffer(&mut self, buffer: &Arc<dyn Buffer>, offset: u64) -> Result<()>;

    fn bind_index_buffer(&mut self, buffer: &Arc<dyn Buffer>, offset: u64, index_type: IndexType) -> Result<()>;

    /// Non-indexed draw of `vertex_count` vertices starting at `first_vertex`
    fn draw(&mut self, vertex_count: u32, first_vertex: u32) -> Result<()>;

    /// Indexed draw; `vertex_offset` is added to each index before the vertex fetch
    fn draw_indexed(&mut self, index_count: u32, first_index: u32, vertex_offset: i32) -> Result<()>;
}

/// Command pool - allocates command lists for one queue family
pub trait CommandPool: Send + Sync {
    /// Allocate `count` primary command lists from this pool
    fn allocate_command_lists(&self, count: u32) -> Result<Vec<Box<dyn CommandList>>>;
}

/// Viewport rectangle and depth range, in framebuffer pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

/// Integer rectangle (render area, scissor)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect2D {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Value an attachment is cleared to at `begin_render_pass`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClearValue {
    /// RGBA
    Color([f32; 4]),
    DepthStencil { depth: f32, stencil: u32 },
}
