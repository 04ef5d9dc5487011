/// Synchronization primitives and queue submission

use std::time::Duration;
use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::CommandList;

/// CPU-waitable fence, signaled by the GPU when a submission completes
pub trait Fence: Send + Sync {
    /// Block until the fence is signaled
    ///
    /// `None` waits without bound. A wait that times out fails with
    /// `Error::DeviceLost`.
    fn wait(&self, timeout: Option<Duration>) -> Result<()>;

    /// Return the fence to the unsignaled state
    fn reset(&self) -> Result<()>;

    /// Non-blocking status query
    fn is_signaled(&self) -> Result<bool>;
}

/// GPU-GPU semaphore (ordering between acquire, render and present)
pub trait Semaphore: Send + Sync {
    // No methods for now - just a marker trait for type safety
}

/// Pipeline stage a wait semaphore blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    TopOfPipe,
    ColorAttachmentOutput,
    Transfer,
    BottomOfPipe,
}

/// One queue submission
pub struct SubmitDesc<'a> {
    /// Recorded command list
    pub command_list: &'a dyn CommandList,
    /// Semaphores to wait on, paired with `wait_stages`
    pub wait_semaphores: &'a [&'a Arc<dyn Semaphore>],
    /// Stage at which each wait semaphore blocks
    pub wait_stages: &'a [PipelineStage],
    /// Semaphores signaled on completion
    pub signal_semaphores: &'a [&'a Arc<dyn Semaphore>],
    /// Fence signaled on completion
    pub fence: Option<&'a dyn Fence>,
}

/// Device queue
pub trait Queue: Send + Sync {
    /// Queue family index
    fn family_index(&self) -> u32;

    /// Submit recorded work
    fn submit(&self, desc: &SubmitDesc) -> Result<()>;

    /// Block until all work submitted to this queue has completed
    fn wait_idle(&self) -> Result<()>;
}
