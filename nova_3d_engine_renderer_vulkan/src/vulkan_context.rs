/// GpuContext - Shared GPU state for all Vulkan objects
///
/// Contains everything backend objects need after creation:
/// - Device for Vulkan API calls
/// - Allocator for memory management
/// - Graphics queue (behind a lock: vkQueueSubmit needs external sync)
///
/// Every object created by `VulkanGraphicsDevice` holds an `Arc<GpuContext>`,
/// so the device and instance are destroyed only once the last object is gone.

use ash::vk;
use gpu_allocator::vulkan::Allocator;
use std::mem::ManuallyDrop;
use std::sync::{Mutex, MutexGuard};
use nova_3d_engine::nova3d::{Error, Result};

/// Shared GPU context for all Vulkan resources.
pub struct GpuContext {
    /// Vulkan logical device
    pub device: ash::Device,

    /// Physical device the logical device was created from
    pub physical_device: vk::PhysicalDevice,

    /// GPU memory allocator
    /// Wrapped in ManuallyDrop so it is dropped BEFORE the device is destroyed
    allocator: ManuallyDrop<Mutex<Allocator>>,

    /// Graphics queue (lock held for the duration of a submit or wait)
    graphics_queue: Mutex<vk::Queue>,

    /// Graphics queue family index
    pub graphics_queue_family: u32,

    /// Device limits read once at creation
    pub limits: vk::PhysicalDeviceLimits,

    /// Vulkan instance (destroyed last)
    pub(crate) instance: ash::Instance,

    /// Vulkan entry (must outlive the instance)
    _entry: ash::Entry,

    /// Validation messenger, destroyed before the instance
    #[cfg(feature = "vulkan-validation")]
    pub(crate) debug_messenger: Option<(ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT)>,
}

impl GpuContext {
    /// Create a new GPU context
    ///
    /// # Arguments
    ///
    /// * `entry` - Loaded Vulkan entry
    /// * `instance` - Vulkan instance
    /// * `physical_device` - Selected physical device
    /// * `device` - Vulkan logical device
    /// * `allocator` - GPU memory allocator
    /// * `graphics_queue` - Graphics queue handle
    /// * `graphics_queue_family` - Graphics queue family index
    pub(crate) fn new(
        entry: ash::Entry,
        instance: ash::Instance,
        physical_device: vk::PhysicalDevice,
        device: ash::Device,
        allocator: Allocator,
        graphics_queue: vk::Queue,
        graphics_queue_family: u32,
    ) -> Self {
        let limits = unsafe { instance.get_physical_device_properties(physical_device).limits };
        Self {
            device,
            physical_device,
            allocator: ManuallyDrop::new(Mutex::new(allocator)),
            graphics_queue: Mutex::new(graphics_queue),
            graphics_queue_family,
            limits,
            instance,
            _entry: entry,
            #[cfg(feature = "vulkan-validation")]
            debug_messenger: None,
        }
    }

    /// Lock the allocator
    pub(crate) fn allocator(&self) -> Result<MutexGuard<'_, Allocator>> {
        self.allocator
            .lock()
            .map_err(|_| Error::BackendError("GPU allocator lock poisoned".to_string()))
    }

    /// Lock the graphics queue
    pub(crate) fn graphics_queue(&self) -> Result<MutexGuard<'_, vk::Queue>> {
        self.graphics_queue
            .lock()
            .map_err(|_| Error::BackendError("Graphics queue lock poisoned".to_string()))
    }
}

impl Drop for GpuContext {
    fn drop(&mut self) {
        unsafe {
            self.device.device_wait_idle().ok();

            // 1. Allocator: free VkDeviceMemory pages BEFORE destroying device
            ManuallyDrop::drop(&mut self.allocator);

            // 2. Validation messenger BEFORE the instance
            #[cfg(feature = "vulkan-validation")]
            {
                crate::debug::cleanup_debug_config();
                if let Some((debug_utils, messenger)) = self.debug_messenger.take() {
                    debug_utils.destroy_debug_utils_messenger(messenger, None);
                }
            }

            // 3. Device and instance
            self.device.destroy_device(None);
            self.instance.destroy_instance(None);
        }
    }
}
