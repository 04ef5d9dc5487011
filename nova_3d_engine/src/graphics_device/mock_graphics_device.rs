/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Every factory call and every recorded command is appended to a shared
/// journal as a short line (`"cmd#7.draw 3 0"`, `"fence#4.wait"`), so tests
/// can assert on ordering. Objects are named `<kind>#<id>` with ids unique
/// per device.
///
/// Fences are real blocking primitives (Mutex + Condvar). By default a
/// submission signals its fence immediately; `set_auto_signal(false)` leaves
/// fences unsignaled so a test can signal them from another thread.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use crate::graphics_device::{
    GraphicsDevice, DeviceLimits, Buffer, BufferDesc, BufferUsage, CommandList, CommandPool,
    DeviceMemory, DeviceMemoryDesc, MemoryLocation, Fence, Framebuffer, FramebufferDesc, Image,
    ImageAspect, ImageDesc, ImageFormat, ImageUsage, ImageView, IndexType, Pipeline, Queue,
    RenderPass, RenderPassDesc, Semaphore, ShaderStage, SubmitDesc, Viewport, Rect2D, ClearValue,
};
use crate::error::{Error, Result};
use crate::engine_bail;

// ============================================================================
// Shared state
// ============================================================================

/// State shared by the device and every object it creates
pub struct MockShared {
    journal: Mutex<Vec<String>>,
    next_id: AtomicU32,
    fail_buffer_creation: AtomicBool,
    fail_memory_allocation: AtomicBool,
    fail_image_creation: AtomicBool,
    fail_submit: AtomicBool,
    auto_signal: AtomicBool,
}

impl MockShared {
    fn record(&self, line: String) {
        if let Ok(mut journal) = self.journal.lock() {
            journal.push(line);
        }
    }

    fn next_id(&self) -> u32 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}

// Every object handed out by MockGraphicsDevice is one of the Mock* types
// below, so trait objects can be cast back to their concrete type.
fn as_mock<T, D: ?Sized>(object: &D) -> &T {
    unsafe { &*(object as *const D as *const T) }
}

fn names<D: ?Sized>(objects: &[Arc<D>], name_of: impl Fn(&D) -> String) -> String {
    let list: Vec<String> = objects.iter().map(|o| name_of(o.as_ref())).collect();
    format!("[{}]", list.join(", "))
}

// ============================================================================
// Mock Buffer
// ============================================================================

pub struct MockBuffer {
    pub id: u32,
    pub size: u64,
    pub usage: BufferUsage,
    shared: Arc<MockShared>,
}

impl MockBuffer {
    pub fn name(&self) -> String {
        format!("buffer#{}", self.id)
    }
}

impl Buffer for MockBuffer {
    fn size(&self) -> u64 {
        self.size
    }

    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        if offset + data.len() as u64 > self.size {
            engine_bail!("nova3d::MockBuffer", "Update out of range: {} + {} > {}", offset, data.len(), self.size);
        }
        self.shared.record(format!("{}.update +{} {}", self.name(), offset, data.len()));
        Ok(())
    }
}

fn buffer_name(buffer: &dyn Buffer) -> String {
    as_mock::<MockBuffer, _>(buffer).name()
}

// ============================================================================
// Mock Image / ImageView / DeviceMemory
// ============================================================================

pub struct MockImage {
    pub id: u32,
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

impl Image for MockImage {
    fn width(&self) -> u32 { self.width }
    fn height(&self) -> u32 { self.height }
    fn format(&self) -> ImageFormat { self.format }
}

pub struct MockImageView {
    pub id: u32,
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub aspect: ImageAspect,
}

impl ImageView for MockImageView {
    fn width(&self) -> u32 { self.width }
    fn height(&self) -> u32 { self.height }
    fn format(&self) -> ImageFormat { self.format }
}

pub struct MockDeviceMemory {
    pub id: u32,
    pub size: u64,
    pub location: MemoryLocation,
}

impl DeviceMemory for MockDeviceMemory {
    fn size(&self) -> u64 { self.size }
    fn location(&self) -> MemoryLocation { self.location }
}

// ============================================================================
// Mock RenderPass / Framebuffer / Pipeline / Semaphore
// ============================================================================

pub struct MockRenderPass {
    pub id: u32,
}

impl RenderPass for MockRenderPass {}

pub struct MockFramebuffer {
    pub id: u32,
    pub width: u32,
    pub height: u32,
    pub attachments: Vec<u32>,
}

impl Framebuffer for MockFramebuffer {
    fn width(&self) -> u32 { self.width }
    fn height(&self) -> u32 { self.height }
}

pub struct MockPipeline {
    pub id: u32,
}

impl Pipeline for MockPipeline {}

pub struct MockSemaphore {
    pub id: u32,
}

impl Semaphore for MockSemaphore {}

// ============================================================================
// Mock Fence
// ============================================================================

/// Handle on a mock fence's state, usable from any thread
#[derive(Clone)]
pub struct MockFenceHandle {
    pub id: u32,
    state: Arc<(Mutex<bool>, Condvar)>,
}

impl MockFenceHandle {
    /// Signal the fence and wake waiters
    pub fn signal(&self) {
        let (lock, cvar) = &*self.state;
        if let Ok(mut signaled) = lock.lock() {
            *signaled = true;
            cvar.notify_all();
        }
    }

    pub fn is_signaled(&self) -> bool {
        self.state.0.lock().map(|s| *s).unwrap_or(false)
    }
}

pub struct MockFence {
    handle: MockFenceHandle,
    shared: Arc<MockShared>,
}

impl MockFence {
    pub fn name(&self) -> String {
        format!("fence#{}", self.handle.id)
    }
}

impl Fence for MockFence {
    fn wait(&self, timeout: Option<Duration>) -> Result<()> {
        self.shared.record(format!("{}.wait", self.name()));
        let (lock, cvar) = &*self.handle.state;
        let guard = lock.lock()
            .map_err(|_| Error::BackendError("Fence lock poisoned".to_string()))?;
        match timeout {
            None => {
                let _guard = cvar.wait_while(guard, |signaled| !*signaled)
                    .map_err(|_| Error::BackendError("Fence lock poisoned".to_string()))?;
                Ok(())
            }
            Some(timeout) => {
                let (_guard, result) = cvar.wait_timeout_while(guard, timeout, |signaled| !*signaled)
                    .map_err(|_| Error::BackendError("Fence lock poisoned".to_string()))?;
                if result.timed_out() {
                    return Err(Error::DeviceLost(format!("{} wait timed out", self.name())));
                }
                Ok(())
            }
        }
    }

    fn reset(&self) -> Result<()> {
        self.shared.record(format!("{}.reset", self.name()));
        let mut signaled = self.handle.state.0.lock()
            .map_err(|_| Error::BackendError("Fence lock poisoned".to_string()))?;
        *signaled = false;
        Ok(())
    }

    fn is_signaled(&self) -> Result<bool> {
        Ok(self.handle.is_signaled())
    }
}

// ============================================================================
// Mock CommandList / CommandPool
// ============================================================================

pub struct MockCommandList {
    pub id: u32,
    shared: Arc<MockShared>,
    recording: bool,
    in_render_pass: bool,
    pipeline_bound: bool,
}

impl MockCommandList {
    pub fn name(&self) -> String {
        format!("cmd#{}", self.id)
    }

    fn record(&self, command: String) {
        self.shared.record(format!("{}.{}", self.name(), command));
    }

    fn check_recording(&self, command: &str) -> Result<()> {
        if !self.recording {
            engine_bail!("nova3d::MockCommandList", "{} called while not recording", command);
        }
        Ok(())
    }

    fn check_in_render_pass(&self, command: &str) -> Result<()> {
        self.check_recording(command)?;
        if !self.in_render_pass {
            engine_bail!("nova3d::MockCommandList", "{} called outside a render pass", command);
        }
        Ok(())
    }
}

impl CommandList for MockCommandList {
    fn begin(&mut self) -> Result<()> {
        if self.recording {
            engine_bail!("nova3d::MockCommandList", "begin called while already recording");
        }
        self.recording = true;
        self.in_render_pass = false;
        self.pipeline_bound = false;
        self.record("begin".to_string());
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.recording = false;
        self.in_render_pass = false;
        self.pipeline_bound = false;
        self.record("reset".to_string());
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        self.check_recording("end")?;
        if self.in_render_pass {
            engine_bail!("nova3d::MockCommandList", "end called inside a render pass");
        }
        self.recording = false;
        self.record("end".to_string());
        Ok(())
    }

    fn begin_render_pass(
        &mut self,
        render_pass: &Arc<dyn RenderPass>,
        framebuffer: &Arc<dyn Framebuffer>,
        render_area: Rect2D,
        clear_values: &[ClearValue],
    ) -> Result<()> {
        self.check_recording("begin_render_pass")?;
        if self.in_render_pass {
            engine_bail!("nova3d::MockCommandList", "begin_render_pass called inside a render pass");
        }
        self.in_render_pass = true;
        let render_pass = as_mock::<MockRenderPass, _>(render_pass.as_ref());
        let framebuffer = as_mock::<MockFramebuffer, _>(framebuffer.as_ref());
        self.record(format!(
            "begin_render_pass render_pass#{} framebuffer#{} {:?} {:?}",
            render_pass.id, framebuffer.id, render_area, clear_values
        ));
        Ok(())
    }

    fn end_render_pass(&mut self) -> Result<()> {
        self.check_in_render_pass("end_render_pass")?;
        self.in_render_pass = false;
        self.record("end_render_pass".to_string());
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.check_recording("set_viewport")?;
        self.record(format!("set_viewport {:?}", viewport));
        Ok(())
    }

    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()> {
        self.check_recording("set_scissor")?;
        self.record(format!("set_scissor {:?}", scissor));
        Ok(())
    }

    fn set_blend_constants(&mut self, constants: [f32; 4]) -> Result<()> {
        self.check_recording("set_blend_constants")?;
        self.record(format!("set_blend_constants {:?}", constants));
        Ok(())
    }

    fn bind_pipeline(&mut self, pipeline: &Arc<dyn Pipeline>) -> Result<()> {
        self.check_in_render_pass("bind_pipeline")?;
        let pipeline = as_mock::<MockPipeline, _>(pipeline.as_ref());
        self.pipeline_bound = true;
        self.record(format!("bind_pipeline pipeline#{}", pipeline.id));
        Ok(())
    }

    fn push_constants(&mut self, stages: &[ShaderStage], offset: u32, data: &[u8]) -> Result<()> {
        self.check_recording("push_constants")?;
        if !self.pipeline_bound {
            engine_bail!("nova3d::MockCommandList", "push_constants called with no pipeline bound");
        }
        self.record(format!("push_constants {:?} +{} {}", stages, offset, data.len()));
        Ok(())
    }

    fn update_buffer(&mut self, buffer: &Arc<dyn Buffer>, offset: u64, data: &[u8]) -> Result<()> {
        self.check_recording("update_buffer")?;
        if self.in_render_pass {
            engine_bail!("nova3d::MockCommandList", "update_buffer called inside a render pass");
        }
        if data.len() % 4 != 0 || data.len() > 65536 {
            engine_bail!("nova3d::MockCommandList", "update_buffer size {} invalid", data.len());
        }
        if offset + data.len() as u64 > buffer.size() {
            engine_bail!("nova3d::MockCommandList", "update_buffer out of range");
        }
        self.record(format!("update_buffer {} +{} {}", buffer_name(buffer.as_ref()), offset, data.len()));
        Ok(())
    }

    fn bind_vertex_buffer(&mut self, buffer: &Arc<dyn Buffer>, offset: u64) -> Result<()> {
        self.check_recording("bind_vertex_buffer")?;
        self.record(format!("bind_vertex_buffer {} +{}", buffer_name(buffer.as_ref()), offset));
        Ok(())
    }

    fn bind_index_buffer(&mut self, buffer: &Arc<dyn Buffer>, offset: u64, index_type: IndexType) -> Result<()> {
        self.check_recording("bind_index_buffer")?;
        self.record(format!("bind_index_buffer {} +{} {:?}", buffer_name(buffer.as_ref()), offset, index_type));
        Ok(())
    }

    fn draw(&mut self, vertex_count: u32, first_vertex: u32) -> Result<()> {
        self.check_in_render_pass("draw")?;
        self.record(format!("draw {} {}", vertex_count, first_vertex));
        Ok(())
    }

    fn draw_indexed(&mut self, index_count: u32, first_index: u32, vertex_offset: i32) -> Result<()> {
        self.check_in_render_pass("draw_indexed")?;
        self.record(format!("draw_indexed {} {} {}", index_count, first_index, vertex_offset));
        Ok(())
    }
}

pub struct MockCommandPool {
    pub id: u32,
    shared: Arc<MockShared>,
}

impl CommandPool for MockCommandPool {
    fn allocate_command_lists(&self, count: u32) -> Result<Vec<Box<dyn CommandList>>> {
        let mut lists: Vec<Box<dyn CommandList>> = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let id = self.shared.next_id();
            self.shared.record(format!("pool#{}.allocate cmd#{}", self.id, id));
            lists.push(Box::new(MockCommandList {
                id,
                shared: self.shared.clone(),
                recording: false,
                in_render_pass: false,
                pipeline_bound: false,
            }));
        }
        Ok(lists)
    }
}

// ============================================================================
// Mock Queue
// ============================================================================

pub struct MockQueue {
    shared: Arc<MockShared>,
}

impl Queue for MockQueue {
    fn family_index(&self) -> u32 {
        0
    }

    fn submit(&self, desc: &SubmitDesc) -> Result<()> {
        if self.shared.fail_submit.load(Ordering::Relaxed) {
            engine_bail!("nova3d::MockQueue", "Failed to submit: ERROR_DEVICE_LOST");
        }
        if desc.wait_semaphores.len() != desc.wait_stages.len() {
            engine_bail!("nova3d::MockQueue", "wait_semaphores and wait_stages length mismatch");
        }
        let command_list = as_mock::<MockCommandList, _>(desc.command_list);
        if command_list.recording {
            engine_bail!("nova3d::MockQueue", "Submitting {} while still recording", command_list.name());
        }
        let semaphore_names = |semaphores: &[&Arc<dyn Semaphore>]| -> String {
            let list: Vec<String> = semaphores
                .iter()
                .map(|s| format!("semaphore#{}", as_mock::<MockSemaphore, _>(s.as_ref()).id))
                .collect();
            format!("[{}]", list.join(", "))
        };
        let fence = desc.fence.map(|f| as_mock::<MockFence, _>(f));
        self.shared.record(format!(
            "queue.submit {} wait={} stages={:?} signal={} fence={}",
            command_list.name(),
            semaphore_names(desc.wait_semaphores),
            desc.wait_stages,
            semaphore_names(desc.signal_semaphores),
            fence.map(|f| f.name()).unwrap_or_else(|| "none".to_string()),
        ));
        if let Some(fence) = fence {
            if self.shared.auto_signal.load(Ordering::Relaxed) {
                fence.handle.signal();
            }
        }
        Ok(())
    }

    fn wait_idle(&self) -> Result<()> {
        self.shared.record("queue.wait_idle".to_string());
        Ok(())
    }
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

pub struct MockGraphicsDevice {
    shared: Arc<MockShared>,
    queue: Arc<MockQueue>,
    limits: DeviceLimits,
    unsupported_formats: Mutex<Vec<ImageFormat>>,
    fences: Mutex<Vec<MockFenceHandle>>,
    has_graphics_queue: AtomicBool,
}

impl MockGraphicsDevice {
    /// Mock device with a 256-byte uniform offset alignment
    pub fn new() -> Self {
        Self::with_alignment(256)
    }

    pub fn with_alignment(alignment: u64) -> Self {
        let shared = Arc::new(MockShared {
            journal: Mutex::new(Vec::new()),
            next_id: AtomicU32::new(0),
            fail_buffer_creation: AtomicBool::new(false),
            fail_memory_allocation: AtomicBool::new(false),
            fail_image_creation: AtomicBool::new(false),
            fail_submit: AtomicBool::new(false),
            auto_signal: AtomicBool::new(true),
        });
        Self {
            queue: Arc::new(MockQueue { shared: shared.clone() }),
            shared,
            limits: DeviceLimits { min_uniform_buffer_offset_alignment: alignment },
            unsupported_formats: Mutex::new(Vec::new()),
            fences: Mutex::new(Vec::new()),
            has_graphics_queue: AtomicBool::new(true),
        }
    }

    // ===== Journal =====

    pub fn journal(&self) -> Vec<String> {
        self.shared.journal.lock().unwrap().clone()
    }

    pub fn clear_journal(&self) {
        self.shared.journal.lock().unwrap().clear();
    }

    /// Journal lines containing `pattern`
    pub fn entries(&self, pattern: &str) -> Vec<String> {
        self.journal().into_iter().filter(|line| line.contains(pattern)).collect()
    }

    /// Index of the first journal line containing `pattern`
    pub fn position(&self, pattern: &str) -> Option<usize> {
        self.journal().iter().position(|line| line.contains(pattern))
    }

    // ===== Failure injection =====

    pub fn set_fail_buffer_creation(&self, fail: bool) {
        self.shared.fail_buffer_creation.store(fail, Ordering::Relaxed);
    }

    pub fn set_fail_memory_allocation(&self, fail: bool) {
        self.shared.fail_memory_allocation.store(fail, Ordering::Relaxed);
    }

    pub fn set_fail_image_creation(&self, fail: bool) {
        self.shared.fail_image_creation.store(fail, Ordering::Relaxed);
    }

    pub fn set_fail_submit(&self, fail: bool) {
        self.shared.fail_submit.store(fail, Ordering::Relaxed);
    }

    pub fn set_has_graphics_queue(&self, present: bool) {
        self.has_graphics_queue.store(present, Ordering::Relaxed);
    }

    pub fn set_unsupported_formats(&self, formats: &[ImageFormat]) {
        *self.unsupported_formats.lock().unwrap() = formats.to_vec();
    }

    // ===== Fences =====

    /// Whether submissions signal their fence immediately
    pub fn set_auto_signal(&self, auto_signal: bool) {
        self.shared.auto_signal.store(auto_signal, Ordering::Relaxed);
    }

    /// Handle on the n-th fence created by this device
    pub fn fence(&self, index: usize) -> MockFenceHandle {
        self.fences.lock().unwrap()[index].clone()
    }

    // ===== Test object helpers =====

    /// A color view standing in for a swapchain image view
    pub fn create_color_view(&self, width: u32, height: u32) -> Arc<dyn ImageView> {
        let id = self.shared.next_id();
        Arc::new(MockImageView {
            id,
            width,
            height,
            format: ImageFormat::B8G8R8A8_SRGB,
            aspect: ImageAspect::Color,
        })
    }

    pub fn create_pipeline(&self) -> Arc<dyn Pipeline> {
        Arc::new(MockPipeline { id: self.shared.next_id() })
    }
}

impl Default for MockGraphicsDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn limits(&self) -> DeviceLimits {
        self.limits
    }

    fn supports_format(&self, format: ImageFormat, _usage: ImageUsage) -> bool {
        self.unsupported_formats.lock()
            .map(|formats| !formats.contains(&format))
            .unwrap_or(false)
    }

    fn create_buffer(&self, desc: &BufferDesc) -> Result<Arc<dyn Buffer>> {
        if self.shared.fail_buffer_creation.load(Ordering::Relaxed) {
            engine_bail!("nova3d::MockGraphicsDevice", "Failed to create buffer: ERROR_OUT_OF_DEVICE_MEMORY");
        }
        let id = self.shared.next_id();
        self.shared.record(format!("create_buffer buffer#{} size={} usage={:?}", id, desc.size, desc.usage));
        Ok(Arc::new(MockBuffer {
            id,
            size: desc.size,
            usage: desc.usage,
            shared: self.shared.clone(),
        }))
    }

    fn create_image(&self, desc: &ImageDesc) -> Result<Arc<dyn Image>> {
        if self.shared.fail_image_creation.load(Ordering::Relaxed) {
            engine_bail!("nova3d::MockGraphicsDevice", "Failed to create image: ERROR_OUT_OF_DEVICE_MEMORY");
        }
        let id = self.shared.next_id();
        self.shared.record(format!(
            "create_image image#{} {}x{} {:?}",
            id, desc.width, desc.height, desc.format
        ));
        Ok(Arc::new(MockImage {
            id,
            width: desc.width,
            height: desc.height,
            format: desc.format,
        }))
    }

    fn allocate_memory(&self, desc: &DeviceMemoryDesc) -> Result<Arc<dyn DeviceMemory>> {
        if self.shared.fail_memory_allocation.load(Ordering::Relaxed) {
            engine_bail!("nova3d::MockGraphicsDevice", "Failed to allocate memory: ERROR_OUT_OF_DEVICE_MEMORY");
        }
        let align = |size: u64| (size + 255) & !255;
        let size = desc.buffers.iter().map(|b| align(b.size())).sum::<u64>()
            + desc.images.iter().map(|i| align(i.width() as u64 * i.height() as u64 * 4)).sum::<u64>();
        let id = self.shared.next_id();
        self.shared.record(format!(
            "allocate_memory memory#{} {:?} size={} buffers={} images={}",
            id,
            desc.location,
            size,
            names(desc.buffers, |b| buffer_name(b)),
            names(desc.images, |i| format!("image#{}", as_mock::<MockImage, _>(i).id)),
        ));
        Ok(Arc::new(MockDeviceMemory { id, size, location: desc.location }))
    }

    fn create_image_view(&self, image: &Arc<dyn Image>, aspect: ImageAspect) -> Result<Arc<dyn ImageView>> {
        let id = self.shared.next_id();
        let image_id = as_mock::<MockImage, _>(image.as_ref()).id;
        self.shared.record(format!("create_image_view view#{} image#{} {:?}", id, image_id, aspect));
        Ok(Arc::new(MockImageView {
            id,
            width: image.width(),
            height: image.height(),
            format: image.format(),
            aspect,
        }))
    }

    fn create_render_pass(&self, desc: &RenderPassDesc) -> Result<Arc<dyn RenderPass>> {
        let id = self.shared.next_id();
        self.shared.record(format!(
            "create_render_pass render_pass#{} colors={} depth={}",
            id,
            desc.color_attachments.len(),
            desc.depth_attachment.is_some()
        ));
        Ok(Arc::new(MockRenderPass { id }))
    }

    fn create_framebuffer(&self, desc: &FramebufferDesc) -> Result<Arc<dyn Framebuffer>> {
        let id = self.shared.next_id();
        let attachments: Vec<u32> = desc.attachments
            .iter()
            .map(|view| as_mock::<MockImageView, _>(view.as_ref()).id)
            .collect();
        self.shared.record(format!(
            "create_framebuffer framebuffer#{} {}x{} views={:?}",
            id, desc.width, desc.height, attachments
        ));
        Ok(Arc::new(MockFramebuffer {
            id,
            width: desc.width,
            height: desc.height,
            attachments,
        }))
    }

    fn create_command_pool(&self, queue_family_index: u32) -> Result<Arc<dyn CommandPool>> {
        let id = self.shared.next_id();
        self.shared.record(format!("create_command_pool pool#{} family={}", id, queue_family_index));
        Ok(Arc::new(MockCommandPool { id, shared: self.shared.clone() }))
    }

    fn create_fence(&self, signaled: bool) -> Result<Box<dyn Fence>> {
        let id = self.shared.next_id();
        self.shared.record(format!("create_fence fence#{} signaled={}", id, signaled));
        let handle = MockFenceHandle {
            id,
            state: Arc::new((Mutex::new(signaled), Condvar::new())),
        };
        self.fences.lock()
            .map_err(|_| Error::BackendError("Fence list lock poisoned".to_string()))?
            .push(handle.clone());
        Ok(Box::new(MockFence { handle, shared: self.shared.clone() }))
    }

    fn create_semaphore(&self) -> Result<Arc<dyn Semaphore>> {
        let id = self.shared.next_id();
        self.shared.record(format!("create_semaphore semaphore#{}", id));
        Ok(Arc::new(MockSemaphore { id }))
    }

    fn graphics_queue(&self) -> Result<Arc<dyn Queue>> {
        if !self.has_graphics_queue.load(Ordering::Relaxed) {
            engine_bail!("nova3d::MockGraphicsDevice", "No graphics queue available");
        }
        Ok(self.queue.clone())
    }

    fn wait_idle(&self) -> Result<()> {
        self.shared.record("device.wait_idle".to_string());
        Ok(())
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
