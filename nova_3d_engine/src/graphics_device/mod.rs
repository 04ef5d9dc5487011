/// Graphics device module - factory trait and every GPU object type it creates

pub mod graphics_device;
pub mod buffer;
pub mod image;
pub mod device_memory;
pub mod pipeline;
pub mod command_list;
pub mod render_pass;
pub mod frame_buffer;
pub mod sync;

pub use graphics_device::*;
pub use buffer::*;
pub use image::*;
pub use device_memory::*;
pub use pipeline::*;
pub use command_list::*;
pub use render_pass::*;
pub use frame_buffer::*;
pub use sync::*;

// Journaling device for unit tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
