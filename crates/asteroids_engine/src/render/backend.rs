//! Backend abstraction trait for the rendering system

use super::{
    RenderResult, ShaderProgramHandle, TriangleMesh, UniformLocation, VertexArrayHandle,
};
use crate::foundation::math::Mat4;

/// Main rendering backend trait
///
/// A frame is `begin_frame`, any number of uniform updates and draws, then
/// `end_frame`. Resource builders may be called outside a frame.
pub trait RenderBackend {
    /// Start a frame and clear the target
    ///
    /// # Errors
    ///
    /// Fails if a frame is already open or the surface is lost.
    fn begin_frame(&mut self) -> RenderResult<()>;

    /// Finish and present the open frame
    ///
    /// # Errors
    ///
    /// Fails if no frame is open.
    fn end_frame(&mut self) -> RenderResult<()>;

    /// Upload `mesh` and return a handle for drawing it
    ///
    /// # Errors
    ///
    /// Fails if the mesh is empty or the upload is refused.
    fn build_vertex_array(&mut self, mesh: &TriangleMesh) -> RenderResult<VertexArrayHandle>;

    /// Compile and link a program from vertex and fragment source
    ///
    /// # Errors
    ///
    /// Fails with the compiler log on a compile or link error.
    fn build_shader_program(&mut self, vertex_source: &str, fragment_source: &str) -> RenderResult<ShaderProgramHandle>;

    /// Bind `program` for subsequent uniform updates and draws
    ///
    /// # Errors
    ///
    /// Fails for a handle this backend did not issue.
    fn use_shader_program(&mut self, program: ShaderProgramHandle) -> RenderResult<()>;

    /// Location of the uniform `name`, or `None` if the program lacks it
    fn shader_uniform_location(&self, program: ShaderProgramHandle, name: &str) -> Option<UniformLocation>;

    /// Set a matrix uniform on the bound program
    ///
    /// # Errors
    ///
    /// Fails if `location` belongs to a program that is not bound.
    fn shader_set_uniform(&mut self, location: UniformLocation, value: &Mat4) -> RenderResult<()>;

    /// Draw a vertex array with the bound program
    ///
    /// # Errors
    ///
    /// Fails outside a frame or for an unknown handle.
    fn render_vertex_array(&mut self, vertex_array: VertexArrayHandle) -> RenderResult<()>;

    /// Drawable size in pixels
    fn viewport_size(&self) -> (u32, u32);
}
