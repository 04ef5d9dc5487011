/// RenderPass - single-subpass pass description consumed by framebuffers and pipelines

use crate::graphics_device::ImageFormat;

/// Opaque backend render pass
///
/// Framebuffers and the application's light pipeline must be created
/// against the same render pass the Forward technique begins each frame.
pub trait RenderPass: Send + Sync {}

/// One subpass: color attachments first, then the optional depth attachment
#[derive(Debug, Clone)]
pub struct RenderPassDesc {
    pub color_attachments: Vec<AttachmentDesc>,
    pub depth_attachment: Option<AttachmentDesc>,
}

/// How one attachment is loaded, stored and transitioned by the pass
///
/// For formats with a stencil aspect, stencil uses the same load and store
/// operations as depth.
#[derive(Debug, Clone)]
pub struct AttachmentDesc {
    pub format: ImageFormat,
    pub load_op: LoadOp,
    pub store_op: StoreOp,
    /// Layout the attachment is in when the pass begins
    pub initial_layout: ImageLayout,
    /// Layout the pass leaves it in
    pub final_layout: ImageLayout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOp {
    Load,
    Clear,
    DontCare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Store,
    DontCare,
}

/// Attachment image layout at the pass boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLayout {
    Undefined,
    ColorAttachment,
    DepthStencilAttachment,
    ShaderReadOnly,
    PresentSrc,
}
