/// Pipeline marker trait and the enums shared by draw recording
///
/// Pipelines are built outside the engine (shader compilation and pipeline
/// construction happen in the application) and handed in through
/// backend-specific wrappers.

/// Opaque graphics pipeline
///
/// The light pipeline is expected to declare dynamic viewport, scissor and
/// blend constants, and a push constant range holding the model matrix.
pub trait Pipeline: Send + Sync {}

/// Shader stages a push constant range is visible to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Index buffer element type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    U16,
    /// Mesh primitive sets always use 32-bit indices
    U32,
}

impl IndexType {
    pub fn size_bytes(&self) -> u32 {
        match self {
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}
