/// VulkanGraphicsDevice - Vulkan implementation of the GraphicsDevice trait
///
/// Owns nothing but an `Arc<GpuContext>`: every object it creates holds the
/// same context, so the device outlives all of its resources.

use nova_3d_engine::nova3d::{GraphicsDevice, Result, Error};
use nova_3d_engine::nova3d::graphics_device::{
    Buffer as RendererBuffer, BufferDesc,
    CommandPool as RendererCommandPool,
    Config, DeviceLimits,
    DeviceMemory as RendererDeviceMemory, DeviceMemoryDesc,
    Fence as RendererFence,
    Framebuffer as RendererFramebuffer, FramebufferDesc,
    Image as RendererImage, ImageAspect, ImageDesc, ImageFormat, ImageUsage,
    ImageView as RendererImageView,
    Pipeline as RendererPipeline,
    Queue as RendererQueue,
    RenderPass as RendererRenderPass, RenderPassDesc, AttachmentDesc,
    Semaphore as RendererSemaphore,
};
use ash::vk;
use gpu_allocator::vulkan::{Allocator, AllocatorCreateDesc, AllocationCreateDesc, AllocationScheme};
use gpu_allocator::AllocationError;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use std::sync::Arc;
use nova_3d_engine::{engine_bail, engine_err, engine_error, engine_info, engine_warn};

use crate::vulkan_buffer::Buffer;
use crate::vulkan_command_list::CommandPool;
use crate::vulkan_context::GpuContext;
use crate::vulkan_format::{
    buffer_usage_to_vk, image_aspect_to_vk, image_format_from_vk, image_format_to_vk,
    image_layout_to_vk, image_usage_to_format_features, image_usage_to_vk, load_op_to_vk,
    memory_location_to_gpu_allocator, store_op_to_vk,
};
use crate::vulkan_frame_buffer::Framebuffer;
use crate::vulkan_image::{Image, ImageView};
use crate::vulkan_memory::{DeviceMemory, MemoryBinding, MemoryBlock};
use crate::vulkan_pipeline::Pipeline;
use crate::vulkan_render_pass::RenderPass;
use crate::vulkan_sync::{Fence, Queue, Semaphore};

const SOURCE: &str = "nova3d::vulkan";

/// Round `value` up to a multiple of `alignment` (power of two, or 0/1 for none)
fn align_up(value: u64, alignment: u64) -> u64 {
    if alignment <= 1 {
        value
    } else {
        (value + alignment - 1) & !(alignment - 1)
    }
}

/// Log an initialization failure and build the matching error
fn init_error(what: &str, detail: impl std::fmt::Debug) -> Error {
    engine_error!(SOURCE, "{}: {:?}", what, detail);
    Error::InitializationFailed(format!("{}: {:?}", what, detail))
}

/// A resource waiting for its memory binding
enum BindTarget<'a> {
    Buffer(&'a Buffer, u64),
    Image(&'a Image, u64),
}

/// Run `bind` on every target, then `commit` on every target
///
/// A failed bind stops before anything is committed, so no target keeps a
/// binding from an allocation that is about to be released.
fn bind_all<T>(
    targets: &[T],
    mut bind: impl FnMut(&T) -> Result<()>,
    mut commit: impl FnMut(&T),
) -> Result<()> {
    for target in targets {
        bind(target)?;
    }
    for target in targets {
        commit(target);
    }
    Ok(())
}

/// Vulkan graphics device
///
/// Factory for every GPU object the engine consumes. Presentation is left
/// to the application; swapchain image views enter through
/// [`VulkanGraphicsDevice::wrap_swapchain_view`] and application-built
/// pipelines through [`VulkanGraphicsDevice::wrap_pipeline`].
pub struct VulkanGraphicsDevice {
    /// Shared GPU context for all resources
    ctx: Arc<GpuContext>,
}

impl VulkanGraphicsDevice {
    /// Create a device able to render to `window`
    ///
    /// The window surface is only used to pick a queue family that supports
    /// both graphics and presentation; it is destroyed before returning.
    pub fn new<W: HasDisplayHandle + HasWindowHandle>(
        window: &W,
        config: Config,
    ) -> Result<Self> {
        let enable_validation = cfg!(feature = "vulkan-validation") && config.enable_validation;
        if config.enable_validation && !enable_validation {
            engine_warn!(SOURCE,
                "Validation requested but the crate was built without the `vulkan-validation` feature");
        }

        unsafe {
            // Create Vulkan Entry
            let entry = ash::Entry::load()
                .map_err(|e| init_error("Failed to load Vulkan library", e))?;

            // Application Info
            let app_name = std::ffi::CString::new(config.app_name.clone())
                .map_err(|e| init_error("Invalid application name", e))?;
            let (major, minor, patch) = config.app_version;
            let app_info = vk::ApplicationInfo::default()
                .application_name(&app_name)
                .application_version(vk::make_api_version(0, major, minor, patch))
                .engine_name(c"Nova3D")
                .engine_version(vk::make_api_version(0, 0, 1, 0))
                .api_version(vk::API_VERSION_1_3);

            // Get required extensions
            let display_handle = window.display_handle()
                .map_err(|e| init_error("Failed to get display handle", e))?;
            let mut extension_names = ash_window::enumerate_required_extensions(display_handle.as_raw())
                .map_err(|e| init_error("Failed to get required extensions", e))?
                .to_vec();

            if enable_validation {
                extension_names.push(ash::ext::debug_utils::NAME.as_ptr());
            }

            // Validation layers
            let layer_names = if enable_validation {
                vec![c"VK_LAYER_KHRONOS_validation".as_ptr()]
            } else {
                vec![]
            };

            let create_info = vk::InstanceCreateInfo::default()
                .application_info(&app_info)
                .enabled_layer_names(&layer_names)
                .enabled_extension_names(&extension_names);

            let instance = entry
                .create_instance(&create_info, None)
                .map_err(|e| init_error("Failed to create Vulkan instance", e))?;

            #[cfg(feature = "vulkan-validation")]
            let debug_messenger = if enable_validation {
                match Self::create_debug_messenger(&entry, &instance) {
                    Ok(messenger) => Some(messenger),
                    Err(e) => {
                        instance.destroy_instance(None);
                        return Err(e);
                    }
                }
            } else {
                None
            };

            let selected = Self::select_queue_family(&entry, &instance, window);
            let (physical_device, graphics_family_index) = match selected {
                Ok(selected) => selected,
                Err(e) => {
                    #[cfg(feature = "vulkan-validation")]
                    if let Some((debug_utils, messenger)) = debug_messenger {
                        crate::debug::cleanup_debug_config();
                        debug_utils.destroy_debug_utils_messenger(messenger, None);
                    }
                    instance.destroy_instance(None);
                    return Err(e);
                }
            };

            // Create Logical Device
            let queue_priorities = [1.0];
            let queue_create_infos = [vk::DeviceQueueCreateInfo::default()
                .queue_family_index(graphics_family_index)
                .queue_priorities(&queue_priorities)];

            let device_extension_names = [ash::khr::swapchain::NAME.as_ptr()];

            let device_create_info = vk::DeviceCreateInfo::default()
                .queue_create_infos(&queue_create_infos)
                .enabled_extension_names(&device_extension_names);

            let device = instance
                .create_device(physical_device, &device_create_info, None)
                .map_err(|e| init_error("Failed to create logical device", e))?;

            let graphics_queue = device.get_device_queue(graphics_family_index, 0);

            // Create GPU allocator
            let allocator = match Allocator::new(&AllocatorCreateDesc {
                instance: instance.clone(),
                device: device.clone(),
                physical_device,
                debug_settings: Default::default(),
                buffer_device_address: false,
                allocation_sizes: Default::default(),
            }) {
                Ok(allocator) => allocator,
                Err(e) => {
                    device.destroy_device(None);
                    return Err(init_error("Failed to create GPU allocator", e));
                }
            };

            // GpuContext owns device, instance and messenger destruction
            #[allow(unused_mut)]
            let mut ctx = GpuContext::new(
                entry,
                instance,
                physical_device,
                device,
                allocator,
                graphics_queue,
                graphics_family_index,
            );
            #[cfg(feature = "vulkan-validation")]
            {
                ctx.debug_messenger = debug_messenger;
            }

            let properties = ctx.instance.get_physical_device_properties(physical_device);
            let device_name = properties
                .device_name_as_c_str()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|_| "unknown".to_string());
            engine_info!(SOURCE,
                "Device created on '{}' (queue family {}, uniform offset alignment {}, validation {})",
                device_name, graphics_family_index,
                properties.limits.min_uniform_buffer_offset_alignment,
                if enable_validation { "on" } else { "off" });

            Ok(Self { ctx: Arc::new(ctx) })
        }
    }

    /// Create the validation messenger routed into the engine logger
    #[cfg(feature = "vulkan-validation")]
    unsafe fn create_debug_messenger(
        entry: &ash::Entry,
        instance: &ash::Instance,
    ) -> Result<(ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT)> {
        let debug_utils = ash::ext::debug_utils::Instance::new(entry, instance);

        crate::debug::init_debug_config();

        let debug_info = vk::DebugUtilsMessengerCreateInfoEXT::default()
            .message_severity(
                vk::DebugUtilsMessageSeverityFlagsEXT::ERROR
                    | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                    | vk::DebugUtilsMessageSeverityFlagsEXT::INFO
                    | vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE
            )
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE
            )
            .pfn_user_callback(Some(crate::debug::vulkan_debug_callback));

        let messenger = debug_utils
            .create_debug_utils_messenger(&debug_info, None)
            .map_err(|e| init_error("Failed to create debug messenger", e))?;

        Ok((debug_utils, messenger))
    }

    /// Pick the first physical device with a graphics queue family that can
    /// also present to the window surface
    unsafe fn select_queue_family<W: HasDisplayHandle + HasWindowHandle>(
        entry: &ash::Entry,
        instance: &ash::Instance,
        window: &W,
    ) -> Result<(vk::PhysicalDevice, u32)> {
        let display_handle = window.display_handle()
            .map_err(|e| init_error("Failed to get display handle", e))?;
        let window_handle = window.window_handle()
            .map_err(|e| init_error("Failed to get window handle", e))?;

        // Temporary surface, only used for queue selection
        let surface = ash_window::create_surface(
            entry,
            instance,
            display_handle.as_raw(),
            window_handle.as_raw(),
            None,
        )
        .map_err(|e| init_error("Failed to create surface", e))?;
        let surface_loader = ash::khr::surface::Instance::new(entry, instance);

        let selected = instance
            .enumerate_physical_devices()
            .map_err(|e| init_error("Failed to enumerate physical devices", e))
            .and_then(|physical_devices| {
                if physical_devices.is_empty() {
                    return Err(init_error("No Vulkan-capable GPU found", physical_devices.len()));
                }
                physical_devices
                    .into_iter()
                    .find_map(|physical_device| {
                        instance
                            .get_physical_device_queue_family_properties(physical_device)
                            .iter()
                            .enumerate()
                            .find(|(index, family)| {
                                family.queue_flags.contains(vk::QueueFlags::GRAPHICS)
                                    && surface_loader
                                        .get_physical_device_surface_support(physical_device, *index as u32, surface)
                                        .unwrap_or(false)
                            })
                            .map(|(index, _)| (physical_device, index as u32))
                    })
                    .ok_or_else(|| {
                        engine_error!(SOURCE, "No queue family supports both graphics and present");
                        Error::InitializationFailed("No graphics queue family found".to_string())
                    })
            });

        surface_loader.destroy_surface(surface, None);
        selected
    }

    /// Shared GPU context (device, allocator, queue)
    pub fn gpu_context(&self) -> &Arc<GpuContext> {
        &self.ctx
    }

    /// Wrap a swapchain image view so it can be used as a color attachment
    ///
    /// The view stays owned by the caller and is not destroyed on drop.
    pub fn wrap_swapchain_view(
        &self,
        image_view: vk::ImageView,
        width: u32,
        height: u32,
        format: vk::Format,
    ) -> Result<Arc<dyn RendererImageView>> {
        let Some(format) = image_format_from_vk(format) else {
            engine_bail!(SOURCE, "wrap_swapchain_view: unsupported format {:?}", format);
        };
        Ok(Arc::new(ImageView::new_wrapped(
            Arc::clone(&self.ctx), image_view, width, height, format,
        )))
    }

    /// Wrap an application-built graphics pipeline
    ///
    /// With `owned`, the pipeline and its layout are destroyed when the last
    /// reference is dropped.
    pub fn wrap_pipeline(
        &self,
        pipeline: vk::Pipeline,
        pipeline_layout: vk::PipelineLayout,
        owned: bool,
    ) -> Arc<dyn RendererPipeline> {
        Arc::new(Pipeline::new(Arc::clone(&self.ctx), pipeline, pipeline_layout, owned))
    }

    /// Underlying render pass handle (pipelines must be built against it)
    pub fn raw_render_pass(&self, render_pass: &Arc<dyn RendererRenderPass>) -> vk::RenderPass {
        unsafe {
            let vk_render_pass = &*(render_pass.as_ref() as *const dyn RendererRenderPass as *const RenderPass);
            vk_render_pass.raw()
        }
    }

    /// Attachment description for the render pass
    fn attachment_to_vk(attachment: &AttachmentDesc) -> vk::AttachmentDescription {
        let (stencil_load_op, stencil_store_op) = if attachment.format.has_stencil() {
            (load_op_to_vk(attachment.load_op), store_op_to_vk(attachment.store_op))
        } else {
            (vk::AttachmentLoadOp::DONT_CARE, vk::AttachmentStoreOp::DONT_CARE)
        };

        vk::AttachmentDescription::default()
            .format(image_format_to_vk(attachment.format))
            .samples(vk::SampleCountFlags::TYPE_1)
            .load_op(load_op_to_vk(attachment.load_op))
            .store_op(store_op_to_vk(attachment.store_op))
            .stencil_load_op(stencil_load_op)
            .stencil_store_op(stencil_store_op)
            .initial_layout(image_layout_to_vk(attachment.initial_layout))
            .final_layout(image_layout_to_vk(attachment.final_layout))
    }
}

impl GraphicsDevice for VulkanGraphicsDevice {
    fn limits(&self) -> DeviceLimits {
        DeviceLimits {
            min_uniform_buffer_offset_alignment: self.ctx.limits.min_uniform_buffer_offset_alignment.max(1),
        }
    }

    fn supports_format(&self, format: ImageFormat, usage: ImageUsage) -> bool {
        let properties = unsafe {
            self.ctx.instance.get_physical_device_format_properties(
                self.ctx.physical_device,
                image_format_to_vk(format),
            )
        };
        properties
            .optimal_tiling_features
            .contains(image_usage_to_format_features(usage))
    }

    fn create_buffer(&self, desc: &BufferDesc) -> Result<Arc<dyn RendererBuffer>> {
        if desc.size == 0 {
            engine_error!(SOURCE, "create_buffer: size must be greater than zero");
            return Err(Error::InvalidResource("Buffer size must be greater than zero".to_string()));
        }

        let buffer_info = vk::BufferCreateInfo::default()
            .size(desc.size)
            .usage(buffer_usage_to_vk(desc.usage))
            .sharing_mode(vk::SharingMode::EXCLUSIVE);

        let buffer = unsafe { self.ctx.device.create_buffer(&buffer_info, None) }
            .map_err(|e| engine_err!(SOURCE, "Failed to create buffer of {} bytes: {:?}", desc.size, e))?;

        Ok(Arc::new(Buffer::new(Arc::clone(&self.ctx), buffer, desc.size, desc.usage)))
    }

    fn create_image(&self, desc: &ImageDesc) -> Result<Arc<dyn RendererImage>> {
        if desc.width == 0 || desc.height == 0 {
            engine_error!(SOURCE, "create_image: invalid extent {}x{}", desc.width, desc.height);
            return Err(Error::InvalidResource(format!(
                "Invalid image extent {}x{}", desc.width, desc.height
            )));
        }

        let image_info = vk::ImageCreateInfo::default()
            .image_type(vk::ImageType::TYPE_2D)
            .format(image_format_to_vk(desc.format))
            .extent(vk::Extent3D { width: desc.width, height: desc.height, depth: 1 })
            .mip_levels(1)
            .array_layers(1)
            .samples(vk::SampleCountFlags::TYPE_1)
            .tiling(vk::ImageTiling::OPTIMAL)
            .usage(image_usage_to_vk(desc.usage))
            .sharing_mode(vk::SharingMode::EXCLUSIVE)
            .initial_layout(vk::ImageLayout::UNDEFINED);

        let image = unsafe { self.ctx.device.create_image(&image_info, None) }
            .map_err(|e| engine_err!(SOURCE,
                "Failed to create {}x{} {:?} image: {:?}", desc.width, desc.height, desc.format, e))?;

        Ok(Arc::new(Image::new(Arc::clone(&self.ctx), image, desc.width, desc.height, desc.format)))
    }

    fn allocate_memory(&self, desc: &DeviceMemoryDesc) -> Result<Arc<dyn RendererDeviceMemory>> {
        if desc.buffers.is_empty() && desc.images.is_empty() {
            engine_error!(SOURCE, "allocate_memory: no resources to bind");
            return Err(Error::InvalidResource("allocate_memory: no resources to bind".to_string()));
        }

        // Downcast to Vulkan types
        let buffers: Vec<&Buffer> = desc.buffers
            .iter()
            .map(|b| unsafe { &*(b.as_ref() as *const dyn RendererBuffer as *const Buffer) })
            .collect();
        let images: Vec<&Image> = desc.images
            .iter()
            .map(|i| unsafe { &*(i.as_ref() as *const dyn RendererImage as *const Image) })
            .collect();

        if buffers.iter().any(|b| b.binding.get().is_some())
            || images.iter().any(|i| i.binding.get().is_some())
        {
            engine_error!(SOURCE, "allocate_memory: resource is already bound");
            return Err(Error::InvalidResource("Resource is already bound to memory".to_string()));
        }

        // Lay resources out back to back, buffers first
        let mixed = !buffers.is_empty() && !images.is_empty();
        let granularity = if mixed { self.ctx.limits.buffer_image_granularity } else { 1 };

        let mut memory_type_bits = u32::MAX;
        let mut alignment = 1u64;
        let mut cursor = 0u64;
        let mut place = |requirements: vk::MemoryRequirements, first_image: bool| -> u64 {
            memory_type_bits &= requirements.memory_type_bits;
            alignment = alignment.max(requirements.alignment);
            let mut offset = align_up(cursor, requirements.alignment);
            if first_image {
                offset = align_up(offset, granularity);
            }
            cursor = offset + requirements.size;
            offset
        };

        let buffer_offsets: Vec<u64> = buffers
            .iter()
            .map(|b| place(unsafe { self.ctx.device.get_buffer_memory_requirements(b.buffer) }, false))
            .collect();
        let image_offsets: Vec<u64> = images
            .iter()
            .enumerate()
            .map(|(index, i)| place(unsafe { self.ctx.device.get_image_memory_requirements(i.image) }, index == 0))
            .collect();

        if memory_type_bits == 0 {
            engine_bail!(SOURCE, "allocate_memory: resources share no compatible memory type");
        }

        let requirements = vk::MemoryRequirements {
            size: cursor,
            alignment,
            memory_type_bits,
        };

        // Allocator lock is released at the end of this statement
        let allocated = self.ctx.allocator()?.allocate(&AllocationCreateDesc {
            name: "nova3d_device_memory",
            requirements,
            location: memory_location_to_gpu_allocator(desc.location),
            linear: images.is_empty(),
            allocation_scheme: AllocationScheme::GpuAllocatorManaged,
        });
        let allocation = allocated.map_err(|e| match e {
            AllocationError::OutOfMemory => {
                engine_error!(SOURCE, "allocate_memory: out of memory ({} bytes)", cursor);
                Error::OutOfMemory
            }
            other => engine_err!(SOURCE, "allocate_memory: {} bytes failed: {:?}", cursor, other),
        })?;

        let block = Arc::new(MemoryBlock::new(Arc::clone(&self.ctx), allocation, desc.location));
        let (memory, base_offset) = block.memory_and_offset();

        let targets: Vec<BindTarget> = buffers.iter().zip(&buffer_offsets)
            .map(|(buffer, &offset)| BindTarget::Buffer(*buffer, offset))
            .chain(images.iter().zip(&image_offsets).map(|(image, &offset)| BindTarget::Image(*image, offset)))
            .collect();
        bind_all(
            &targets,
            |target| match target {
                BindTarget::Buffer(buffer, offset) => {
                    unsafe { self.ctx.device.bind_buffer_memory(buffer.buffer, memory, base_offset + offset) }
                        .map_err(|e| engine_err!(SOURCE, "Failed to bind buffer memory: {:?}", e))
                }
                BindTarget::Image(image, offset) => {
                    unsafe { self.ctx.device.bind_image_memory(image.image, memory, base_offset + offset) }
                        .map_err(|e| engine_err!(SOURCE, "Failed to bind image memory: {:?}", e))
                }
            },
            |target| match target {
                BindTarget::Buffer(buffer, offset) => {
                    let _ = buffer.binding.set(MemoryBinding { block: Arc::clone(&block), offset: *offset });
                }
                BindTarget::Image(image, offset) => {
                    let _ = image.binding.set(MemoryBinding { block: Arc::clone(&block), offset: *offset });
                }
            },
        )?;

        Ok(Arc::new(DeviceMemory::new(block)))
    }

    fn create_image_view(&self, image: &Arc<dyn RendererImage>, aspect: ImageAspect) -> Result<Arc<dyn RendererImageView>> {
        let vk_image = unsafe { &*(image.as_ref() as *const dyn RendererImage as *const Image) };
        if vk_image.binding.get().is_none() {
            engine_error!(SOURCE, "create_image_view: image has no memory bound");
            return Err(Error::InvalidResource("Image has no memory bound".to_string()));
        }

        let view_info = vk::ImageViewCreateInfo::default()
            .image(vk_image.image)
            .view_type(vk::ImageViewType::TYPE_2D)
            .format(image_format_to_vk(image.format()))
            .subresource_range(vk::ImageSubresourceRange {
                aspect_mask: image_aspect_to_vk(aspect),
                base_mip_level: 0,
                level_count: 1,
                base_array_layer: 0,
                layer_count: 1,
            });

        let image_view = unsafe { self.ctx.device.create_image_view(&view_info, None) }
            .map_err(|e| engine_err!(SOURCE, "Failed to create image view: {:?}", e))?;

        Ok(Arc::new(ImageView::new_owned(Arc::clone(&self.ctx), image_view, Arc::clone(image))))
    }

    fn create_render_pass(&self, desc: &RenderPassDesc) -> Result<Arc<dyn RendererRenderPass>> {
        let mut attachments: Vec<vk::AttachmentDescription> = desc.color_attachments
            .iter()
            .map(Self::attachment_to_vk)
            .collect();

        let color_attachment_refs: Vec<vk::AttachmentReference> = (0..desc.color_attachments.len() as u32)
            .map(|i| vk::AttachmentReference::default()
                .attachment(i)
                .layout(vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL))
            .collect();

        let depth_attachment_ref = desc.depth_attachment.as_ref().map(|depth| {
            let depth_index = attachments.len() as u32;
            attachments.push(Self::attachment_to_vk(depth));
            vk::AttachmentReference::default()
                .attachment(depth_index)
                .layout(vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL)
        });

        let mut subpass = vk::SubpassDescription::default()
            .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
            .color_attachments(&color_attachment_refs);

        if let Some(ref depth_ref) = depth_attachment_ref {
            subpass = subpass.depth_stencil_attachment(depth_ref);
        }

        // Subpass dependency includes depth stages when a depth attachment is present
        let (stage_mask, access_mask) = if depth_attachment_ref.is_some() {
            (
                vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT
                    | vk::PipelineStageFlags::EARLY_FRAGMENT_TESTS,
                vk::AccessFlags::COLOR_ATTACHMENT_WRITE
                    | vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE,
            )
        } else {
            (
                vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
                vk::AccessFlags::COLOR_ATTACHMENT_WRITE,
            )
        };

        let dependency = vk::SubpassDependency::default()
            .src_subpass(vk::SUBPASS_EXTERNAL)
            .dst_subpass(0)
            .src_stage_mask(stage_mask)
            .src_access_mask(vk::AccessFlags::empty())
            .dst_stage_mask(stage_mask)
            .dst_access_mask(access_mask);

        let render_pass_info = vk::RenderPassCreateInfo::default()
            .attachments(&attachments)
            .subpasses(std::slice::from_ref(&subpass))
            .dependencies(std::slice::from_ref(&dependency));

        let render_pass = unsafe { self.ctx.device.create_render_pass(&render_pass_info, None) }
            .map_err(|e| engine_err!(SOURCE, "Failed to create render pass: {:?}", e))?;

        Ok(Arc::new(RenderPass::new(Arc::clone(&self.ctx), render_pass, true)))
    }

    fn create_framebuffer(&self, desc: &FramebufferDesc) -> Result<Arc<dyn RendererFramebuffer>> {
        let vk_render_pass = unsafe {
            &*(desc.render_pass.as_ref() as *const dyn RendererRenderPass as *const RenderPass)
        };

        let attachments: Vec<vk::ImageView> = desc.attachments
            .iter()
            .map(|view| unsafe {
                (*(view.as_ref() as *const dyn RendererImageView as *const ImageView)).image_view
            })
            .collect();

        let framebuffer_info = vk::FramebufferCreateInfo::default()
            .render_pass(vk_render_pass.render_pass)
            .attachments(&attachments)
            .width(desc.width)
            .height(desc.height)
            .layers(1);

        let framebuffer = unsafe { self.ctx.device.create_framebuffer(&framebuffer_info, None) }
            .map_err(|e| engine_err!(SOURCE, "Failed to create framebuffer: {:?}", e))?;

        Ok(Arc::new(Framebuffer::new(
            Arc::clone(&self.ctx), framebuffer, desc.width, desc.height, desc.attachments.clone(),
        )))
    }

    fn create_command_pool(&self, queue_family_index: u32) -> Result<Arc<dyn RendererCommandPool>> {
        if queue_family_index != self.ctx.graphics_queue_family {
            engine_error!(SOURCE, "create_command_pool: queue family {} was not created", queue_family_index);
            return Err(Error::InvalidResource(format!(
                "Queue family {} was not created by this device", queue_family_index
            )));
        }
        Ok(Arc::new(CommandPool::new(Arc::clone(&self.ctx), queue_family_index)?))
    }

    fn create_fence(&self, signaled: bool) -> Result<Box<dyn RendererFence>> {
        let flags = if signaled { vk::FenceCreateFlags::SIGNALED } else { vk::FenceCreateFlags::empty() };
        let fence_info = vk::FenceCreateInfo::default().flags(flags);

        let fence = unsafe { self.ctx.device.create_fence(&fence_info, None) }
            .map_err(|e| engine_err!(SOURCE, "Failed to create fence: {:?}", e))?;

        Ok(Box::new(Fence::new(Arc::clone(&self.ctx), fence)))
    }

    fn create_semaphore(&self) -> Result<Arc<dyn RendererSemaphore>> {
        let semaphore_info = vk::SemaphoreCreateInfo::default();

        let semaphore = unsafe { self.ctx.device.create_semaphore(&semaphore_info, None) }
            .map_err(|e| engine_err!(SOURCE, "Failed to create semaphore: {:?}", e))?;

        Ok(Arc::new(Semaphore::new(Arc::clone(&self.ctx), semaphore)))
    }

    fn graphics_queue(&self) -> Result<Arc<dyn RendererQueue>> {
        Ok(Arc::new(Queue::new(Arc::clone(&self.ctx))))
    }

    fn wait_idle(&self) -> Result<()> {
        unsafe { self.ctx.device.device_wait_idle() }
            .map_err(|e| engine_err!(SOURCE, "Failed to wait idle: {:?}", e))
    }
}

#[cfg(test)]
#[path = "vulkan_tests.rs"]
mod tests;
