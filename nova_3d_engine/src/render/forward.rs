/// Forward technique - per-frame orchestration of the additive
/// multi-light forward renderer.
///
/// One `FrameData` slot per swapchain image. `render()` on a slot:
///
/// 1. waits for and resets the slot fence, then returns the sub-buffers the
///    slot parked during its previous use to their pools
/// 2. records: viewport/scissor, camera and light uniform updates (always
///    into freshly allocated sub-buffers), then one render pass with one
///    pass over every mesh per light
/// 3. submits, waiting on `image_ready` at color-attachment output and
///    signaling `draw_complete` plus the slot fence
///
/// Blend constants act as the destination blend factor: zero for the first
/// light pass (it also fills the depth buffer), one for the following
/// passes so their contributions add up.

use std::mem::size_of;
use std::sync::Arc;
use std::time::Duration;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::camera::{CameraData, RenderView};
use crate::error::{Error, Result};
use crate::graphics_device::{
    GraphicsDevice, Buffer, ClearValue, CommandList, CommandPool, Framebuffer, ImageFormat, ImageView,
    IndexType, Pipeline, PipelineStage, Queue, RenderPass, Semaphore, ShaderStage, SubmitDesc,
};
use crate::render::depth_buffers::{select_depth_format, DepthBuffers, DEFAULT_DEPTH_FORMATS};
use crate::render::frame_data::{FrameData, UniformPool};
use crate::render::{DrawQueue, Handle, LightData, SubBuffer, SubBufferPool};
use crate::{engine_debug, engine_error, engine_info, engine_warn};

// ===== CONFIGURATION =====

/// Forward technique configuration
#[derive(Debug, Clone)]
pub struct ForwardConfig {
    /// Camera pool slots per chunk (`None` = one per frame slot)
    pub camera_slots_per_chunk: Option<u32>,
    /// Light pool slots per chunk, per frame slot
    pub light_slots_per_frame: u32,
    /// Bound on the slot fence wait (`None` = wait forever). Exceeding it
    /// fails the frame with `Error::DeviceLost`.
    pub fence_timeout: Option<Duration>,
    /// Color attachment clear value
    pub clear_color: [f32; 4],
    /// Depth attachment clear value
    pub clear_depth: f32,
    /// Depth formats in order of preference
    pub depth_formats: Vec<ImageFormat>,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            camera_slots_per_chunk: None,
            light_slots_per_frame: 50,
            fence_timeout: Some(Duration::from_secs(5)),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            clear_depth: 1.0,
            depth_formats: DEFAULT_DEPTH_FORMATS.to_vec(),
        }
    }
}

/// Counters for the last successful `render()`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Draw and draw-indexed calls recorded
    pub draw_calls: u32,
    /// Light passes recorded
    pub light_passes: u32,
    /// Sub-buffers allocated for camera and light data
    pub sub_buffers_allocated: u32,
    /// Sub-buffers returned to their pool at the start of the frame
    pub sub_buffers_recycled: u32,
}

// ===== UNIFORM BOOKKEEPING =====

/// Camera/light pools and the handle → current sub-buffer maps
struct Uniforms {
    camera_pool: SubBufferPool,
    light_pool: SubBufferPool,
    cameras: FxHashMap<Handle, SubBuffer>,
    lights: FxHashMap<Handle, SubBuffer>,
}

impl Uniforms {
    fn pool_mut(&mut self, pool: UniformPool) -> &mut SubBufferPool {
        match pool {
            UniformPool::Camera => &mut self.camera_pool,
            UniformPool::Light => &mut self.light_pool,
        }
    }

    fn free(&mut self, pool: UniformPool, sub_buffer: SubBuffer) -> Result<()> {
        self.pool_mut(pool).free(sub_buffer)
    }

    /// Allocate a fresh sub-buffer for `handle`, parking the previous one
    ///
    /// The previous sub-buffer may still be read by in-flight work, so it
    /// is never rewritten in place.
    fn refresh(
        &mut self,
        pool: UniformPool,
        handle: Handle,
        parked: &mut Vec<(UniformPool, SubBuffer)>,
    ) -> Result<(Arc<dyn Buffer>, SubBuffer)> {
        let fresh = self.pool_mut(pool).allocate()?;
        let buffer = self.pool_mut(pool).buffer(&fresh)?.clone();
        let map = match pool {
            UniformPool::Camera => &mut self.cameras,
            UniformPool::Light => &mut self.lights,
        };
        if let Some(old) = map.insert(handle, fresh) {
            parked.push((pool, old));
        }
        Ok((buffer, fresh))
    }

    /// Drop map entries for handles absent from this frame
    fn prune(
        &mut self,
        camera: Handle,
        lights: &FxHashSet<Handle>,
        parked: &mut Vec<(UniformPool, SubBuffer)>,
    ) {
        self.cameras.retain(|handle, sub_buffer| {
            let keep = *handle == camera;
            if !keep {
                parked.push((UniformPool::Camera, *sub_buffer));
            }
            keep
        });
        self.lights.retain(|handle, sub_buffer| {
            let keep = lights.contains(handle);
            if !keep {
                parked.push((UniformPool::Light, *sub_buffer));
            }
            keep
        });
    }
}

// ===== FORWARD =====

/// GPU state created by `init()`; field order is drop order
struct ForwardState {
    frames: Vec<FrameData>,
    depth_buffers: DepthBuffers,
    uniforms: Uniforms,
    _command_pool: Arc<dyn CommandPool>,
    pipeline: Arc<dyn Pipeline>,
    render_pass: Arc<dyn RenderPass>,
    queue: Arc<dyn Queue>,
}

/// Forward multi-light technique
pub struct Forward {
    device: Arc<dyn GraphicsDevice>,
    render_view: RenderView,
    config: ForwardConfig,
    state: Option<ForwardState>,
    stats: FrameStats,
}

impl Forward {
    /// Create an uninitialized technique; call `init()` before `render()`
    pub fn new(device: Arc<dyn GraphicsDevice>, render_view: RenderView, config: ForwardConfig) -> Self {
        Self {
            device,
            render_view,
            config,
            state: None,
            stats: FrameStats::default(),
        }
    }

    /// Create frame slots, depth buffers, framebuffers and uniform pools
    ///
    /// # Arguments
    ///
    /// * `color_views` - Swapchain image views, one frame slot each
    /// * `render_pass` - Render pass with `[color, depth]` attachments, shared by all light pipelines
    /// * `pipeline` - Light pipeline bound for every light pass
    pub fn init(
        &mut self,
        color_views: &[Arc<dyn ImageView>],
        render_pass: Arc<dyn RenderPass>,
        pipeline: Arc<dyn Pipeline>,
    ) -> Result<()> {
        if self.state.is_some() {
            return Err(Error::InitializationFailed("Forward is already initialized".to_string()));
        }

        let state = self.create_state(color_views, render_pass, pipeline).map_err(|e| {
            engine_error!("nova3d::Forward", "Initialization failed: {}", e);
            match e {
                Error::InitializationFailed(_) => e,
                other => Error::InitializationFailed(other.to_string()),
            }
        })?;

        engine_info!(
            "nova3d::Forward",
            "Initialized with {} frame slots (depth {:?})",
            state.frames.len(), state.depth_buffers.format()
        );
        self.state = Some(state);
        Ok(())
    }

    fn create_state(
        &self,
        color_views: &[Arc<dyn ImageView>],
        render_pass: Arc<dyn RenderPass>,
        pipeline: Arc<dyn Pipeline>,
    ) -> Result<ForwardState> {
        let frame_count = color_views.len() as u32;
        if frame_count == 0 {
            return Err(Error::InvalidResource("Forward needs at least one color view".to_string()));
        }

        let queue = self.device.graphics_queue()?;
        let command_pool = self.device.create_command_pool(queue.family_index())?;
        let command_lists = command_pool.allocate_command_lists(frame_count)?;

        let depth_format = select_depth_format(self.device.as_ref(), &self.config.depth_formats)?;
        let depth_buffers = DepthBuffers::create(self.device.as_ref(), color_views, depth_format)?;
        let framebuffers = depth_buffers.create_framebuffers(self.device.as_ref(), &render_pass, color_views)?;

        let frames = command_lists
            .into_iter()
            .zip(framebuffers)
            .map(|(command_list, framebuffer)| -> Result<FrameData> {
                Ok(FrameData::new(self.device.create_fence(true)?, command_list, framebuffer))
            })
            .collect::<Result<Vec<_>>>()?;

        let camera_pool = SubBufferPool::new(
            self.device.clone(),
            "camera",
            self.config.camera_slots_per_chunk.unwrap_or(frame_count),
            size_of::<CameraData>() as u64,
        )?;
        let light_pool = SubBufferPool::new(
            self.device.clone(),
            "light",
            frame_count * self.config.light_slots_per_frame,
            size_of::<LightData>() as u64,
        )?;

        Ok(ForwardState {
            frames,
            depth_buffers,
            uniforms: Uniforms {
                camera_pool,
                light_pool,
                cameras: FxHashMap::default(),
                lights: FxHashMap::default(),
            },
            _command_pool: command_pool,
            pipeline,
            render_pass,
            queue,
        })
    }

    /// Record and submit one frame on frame slot `slot_index`
    ///
    /// Blocks only on the slot fence. Any failure aborts the frame.
    pub fn render(
        &mut self,
        draw_queue: &DrawQueue,
        image_ready: &Arc<dyn Semaphore>,
        draw_complete: &Arc<dyn Semaphore>,
        slot_index: usize,
    ) -> Result<()> {
        let state = self.state.as_mut().ok_or_else(|| {
            Error::InitializationFailed("Forward::render called before init".to_string())
        })?;
        if slot_index >= state.frames.len() {
            return Err(Error::InvalidResource(format!(
                "Frame slot {} out of range ({} slots)",
                slot_index, state.frames.len()
            )));
        }

        let mut stats = FrameStats::default();
        let frame = &mut state.frames[slot_index];

        // Slot availability
        if frame.fence_armed {
            frame.fence.wait(self.config.fence_timeout).map_err(|e| {
                engine_error!("nova3d::Forward", "Waiting for frame slot {} failed: {}", slot_index, e);
                e
            })?;
        } else {
            // A failed frame left the fence reset with nothing submitted
            state.queue.wait_idle()?;
        }
        frame.fence.reset()?;
        frame.fence_armed = false;

        // Every parked entry is returned even if one of them is rejected
        let mut recycle_error = None;
        for (pool, sub_buffer) in frame.take_pending_frees() {
            match state.uniforms.free(pool, sub_buffer) {
                Ok(()) => stats.sub_buffers_recycled += 1,
                Err(e) => {
                    recycle_error.get_or_insert(e);
                }
            }
        }
        if let Some(e) = recycle_error {
            return Err(e);
        }

        // Recording
        let mut parked = Vec::new();
        let recorded = Self::record(
            frame.command_list.as_mut(),
            &frame.framebuffer,
            &mut state.uniforms,
            &mut parked,
            &mut stats,
            RecordInputs {
                draw_queue,
                render_view: &self.render_view,
                render_pass: &state.render_pass,
                pipeline: &state.pipeline,
                config: &self.config,
            },
        );
        for (pool, sub_buffer) in parked {
            frame.defer_free(pool, sub_buffer);
        }
        if let Err(e) = recorded {
            // Leave the list ready for the slot's next begin()
            if let Err(reset_error) = frame.command_list.reset() {
                engine_error!("nova3d::Forward", "Resetting command list of slot {} failed: {}", slot_index, reset_error);
            }
            return Err(e);
        }

        // Submission
        state.queue.submit(&SubmitDesc {
            command_list: frame.command_list.as_ref(),
            wait_semaphores: &[image_ready],
            wait_stages: &[PipelineStage::ColorAttachmentOutput],
            signal_semaphores: &[draw_complete],
            fence: Some(frame.fence.as_ref()),
        })?;
        frame.fence_armed = true;

        self.stats = stats;
        Ok(())
    }

    fn record(
        cmd: &mut dyn CommandList,
        framebuffer: &Arc<dyn Framebuffer>,
        uniforms: &mut Uniforms,
        parked: &mut Vec<(UniformPool, SubBuffer)>,
        stats: &mut FrameStats,
        inputs: RecordInputs,
    ) -> Result<()> {
        let RecordInputs { draw_queue, render_view, render_pass, pipeline, config } = inputs;

        cmd.begin()?;
        cmd.set_viewport(*render_view.viewport())?;
        cmd.set_scissor(render_view.effective_scissor())?;

        // Camera
        let camera = render_view.camera();
        let (buffer, sub_buffer) = uniforms.refresh(UniformPool::Camera, camera.handle(), parked)?;
        cmd.update_buffer(&buffer, sub_buffer.offset(), bytemuck::bytes_of(&camera.data()))?;
        stats.sub_buffers_allocated += 1;

        // Lights
        let mut live_lights = FxHashSet::default();
        for light in draw_queue.lights() {
            let (buffer, sub_buffer) = uniforms.refresh(UniformPool::Light, light.handle, parked)?;
            cmd.update_buffer(&buffer, sub_buffer.offset(), bytemuck::bytes_of(&light.data()))?;
            stats.sub_buffers_allocated += 1;
            live_lights.insert(light.handle);
        }
        uniforms.prune(camera.handle(), &live_lights, parked);

        // Light passes
        let clear_values = [
            ClearValue::Color(config.clear_color),
            ClearValue::DepthStencil { depth: config.clear_depth, stencil: 0 },
        ];
        cmd.begin_render_pass(render_pass, framebuffer, render_view.render_area(), &clear_values)?;
        cmd.set_blend_constants([0.0, 0.0, 0.0, 0.0])?;

        let mut warned_empty = false;
        for pass in 0..draw_queue.lights().len() {
            if pass == 1 {
                cmd.set_blend_constants([1.0, 1.0, 1.0, 1.0])?;
            }
            cmd.bind_pipeline(pipeline)?;
            stats.light_passes += 1;

            for mesh in draw_queue.meshes() {
                cmd.push_constants(&[ShaderStage::Vertex], 0, bytemuck::bytes_of(&mesh.transform))?;

                for set in &mesh.primitive_sets {
                    let Some(position) = &set.position else {
                        if !warned_empty {
                            engine_warn!("nova3d::Forward", "Mesh with no vertex data, primitive set skipped");
                            warned_empty = true;
                        }
                        continue;
                    };
                    cmd.bind_vertex_buffer(position, 0)?;

                    match &set.indices {
                        Some(indices) => {
                            cmd.bind_index_buffer(indices, 0, IndexType::U32)?;
                            cmd.draw_indexed(set.index_count(), 0, 0)?;
                        }
                        None => cmd.draw(set.vertex_count(), 0)?,
                    }
                    stats.draw_calls += 1;
                }
            }
        }

        cmd.end_render_pass()?;
        cmd.end()
    }

    /// Re-create depth buffers and framebuffers for new color views
    /// (swapchain recreation). The slot count cannot change.
    pub fn rebuild_targets(&mut self, color_views: &[Arc<dyn ImageView>]) -> Result<()> {
        let state = self.state.as_mut().ok_or_else(|| {
            Error::InitializationFailed("Forward::rebuild_targets called before init".to_string())
        })?;
        if color_views.len() != state.frames.len() {
            return Err(Error::InvalidResource(format!(
                "rebuild_targets: {} color views for {} frame slots",
                color_views.len(), state.frames.len()
            )));
        }

        state.queue.wait_idle()?;

        let format = state.depth_buffers.format();
        let depth_buffers = DepthBuffers::create(self.device.as_ref(), color_views, format)?;
        let framebuffers = depth_buffers.create_framebuffers(self.device.as_ref(), &state.render_pass, color_views)?;

        for (frame, framebuffer) in state.frames.iter_mut().zip(framebuffers) {
            frame.framebuffer = framebuffer;
        }
        state.depth_buffers = depth_buffers;

        engine_debug!("nova3d::Forward", "Rebuilt {} render targets", color_views.len());
        Ok(())
    }

    /// Wait for the queue to go idle, then release every GPU object
    ///
    /// Safe to call more than once; the technique can be re-initialized.
    pub fn destroy(&mut self) {
        if let Some(state) = self.state.take() {
            if let Err(e) = state.queue.wait_idle() {
                engine_error!("nova3d::Forward", "wait_idle before destroy failed: {}", e);
            }
            drop(state);
            engine_debug!("nova3d::Forward", "Destroyed");
        }
    }

    // ===== ACCESSORS =====

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Number of frame slots (0 before init)
    pub fn frame_count(&self) -> usize {
        self.state.as_ref().map(|s| s.frames.len()).unwrap_or(0)
    }

    /// Depth format picked at init
    pub fn depth_format(&self) -> Option<ImageFormat> {
        self.state.as_ref().map(|s| s.depth_buffers.format())
    }

    /// Counters for the last successful `render()`
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn render_view(&self) -> &RenderView {
        &self.render_view
    }

    pub fn render_view_mut(&mut self) -> &mut RenderView {
        &mut self.render_view
    }

    pub fn config(&self) -> &ForwardConfig {
        &self.config
    }
}

impl Drop for Forward {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Read-only inputs of one recording
struct RecordInputs<'a> {
    draw_queue: &'a DrawQueue,
    render_view: &'a RenderView,
    render_pass: &'a Arc<dyn RenderPass>,
    pipeline: &'a Arc<dyn Pipeline>,
    config: &'a ForwardConfig,
}

#[cfg(test)]
#[path = "forward_tests.rs"]
mod tests;
