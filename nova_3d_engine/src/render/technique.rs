/// Lighting techniques - closed set of renderers sharing one lifecycle.

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{ImageView, Pipeline, RenderPass, Semaphore};
use crate::render::{DrawQueue, Forward, FrameStats};

/// A lighting technique
pub enum Technique {
    Forward(Forward),
}

impl Technique {
    /// Technique name, for logs and UI
    pub fn name(&self) -> &'static str {
        match self {
            Technique::Forward(_) => "Forward",
        }
    }

    pub fn init(
        &mut self,
        color_views: &[Arc<dyn ImageView>],
        render_pass: Arc<dyn RenderPass>,
        pipeline: Arc<dyn Pipeline>,
    ) -> Result<()> {
        match self {
            Technique::Forward(forward) => forward.init(color_views, render_pass, pipeline),
        }
    }

    pub fn render(
        &mut self,
        draw_queue: &DrawQueue,
        image_ready: &Arc<dyn Semaphore>,
        draw_complete: &Arc<dyn Semaphore>,
        slot_index: usize,
    ) -> Result<()> {
        match self {
            Technique::Forward(forward) => forward.render(draw_queue, image_ready, draw_complete, slot_index),
        }
    }

    pub fn rebuild_targets(&mut self, color_views: &[Arc<dyn ImageView>]) -> Result<()> {
        match self {
            Technique::Forward(forward) => forward.rebuild_targets(color_views),
        }
    }

    pub fn destroy(&mut self) {
        match self {
            Technique::Forward(forward) => forward.destroy(),
        }
    }

    pub fn stats(&self) -> FrameStats {
        match self {
            Technique::Forward(forward) => forward.stats(),
        }
    }
}

impl From<Forward> for Technique {
    fn from(forward: Forward) -> Self {
        Technique::Forward(forward)
    }
}
