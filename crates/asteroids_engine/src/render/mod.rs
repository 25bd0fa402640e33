//! Rendering interface
//!
//! The simulation hands meshes, shader sources and per-entity transforms to
//! a [`RenderBackend`]; window and GPU specifics stay behind that trait.
//! [`HeadlessRenderer`] implements it without a window for tests and
//! headless runs.

mod backend;
mod headless;
pub mod mesh;

pub use backend::RenderBackend;
pub use headless::{HeadlessRenderer, FrameStats};
pub use mesh::{Triangle, TriangleMesh, Vertex};

/// Handle to uploaded geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayHandle(pub u32);

/// Handle to an uploaded texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Handle to a linked shader program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderProgramHandle(pub u32);

/// Location of a uniform inside a shader program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation {
    /// Program the location belongs to
    pub program: ShaderProgramHandle,
    /// Backend slot
    pub slot: u32,
}

/// Rendering errors
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// Window or context creation failed
    #[error("renderer initialization failed: {0}")]
    InitializationFailed(String),

    /// Shader compile or link failure
    #[error("shader build failed: {0}")]
    ShaderBuild(String),

    /// Geometry could not be uploaded
    #[error("vertex array build failed: {0}")]
    VertexArray(String),

    /// A handle that this backend never issued
    #[error("unknown {kind} handle {id}")]
    UnknownHandle {
        /// Handle kind
        kind: &'static str,
        /// Raw handle
        id: u32,
    },

    /// Frame calls out of order (draw outside a frame, nested begin)
    #[error("frame state: {0}")]
    FrameState(&'static str),
}

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;
