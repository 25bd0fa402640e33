//! Window-less render backend
//!
//! Validates call order and handles the way a GPU backend would, keeps the
//! last value written to every uniform, and counts draws per frame.

use std::collections::HashMap;

use super::{
    RenderBackend, RenderError, RenderResult, ShaderProgramHandle, TriangleMesh,
    UniformLocation, VertexArrayHandle,
};
use crate::foundation::math::Mat4;

/// Counters for the most recently presented frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames presented so far
    pub frames_presented: u64,
    /// Draw calls in the last presented frame
    pub draw_calls: usize,
    /// Uniform writes in the last presented frame
    pub uniform_writes: usize,
}

#[derive(Debug)]
struct Program {
    uniforms: Vec<String>,
}

/// Render backend without a window or GPU
#[derive(Debug)]
pub struct HeadlessRenderer {
    viewport: (u32, u32),
    vertex_arrays: Vec<usize>,
    programs: Vec<Program>,
    bound: Option<ShaderProgramHandle>,
    in_frame: bool,
    uniforms: HashMap<UniformLocation, Mat4>,
    pending: FrameStats,
    stats: FrameStats,
}

/// Uniform names declared with `uniform <type> <name>;`
fn declared_uniforms(source: &str) -> impl Iterator<Item = &str> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("uniform "))
        .filter_map(|line| line.trim_end_matches(';').split_whitespace().last())
}

impl HeadlessRenderer {
    /// Backend reporting a `width` x `height` viewport
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: (width, height),
            vertex_arrays: Vec::new(),
            programs: Vec::new(),
            bound: None,
            in_frame: false,
            uniforms: HashMap::new(),
            pending: FrameStats::default(),
            stats: FrameStats::default(),
        }
    }

    /// Counters for the last presented frame
    #[must_use]
    pub const fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Last value written to `location`
    #[must_use]
    pub fn uniform_value(&self, location: UniformLocation) -> Option<&Mat4> {
        self.uniforms.get(&location)
    }

    /// Number of vertex arrays built
    #[must_use]
    pub fn vertex_array_count(&self) -> usize {
        self.vertex_arrays.len()
    }

    fn program(&self, handle: ShaderProgramHandle) -> RenderResult<&Program> {
        usize::try_from(handle.0)
            .ok()
            .and_then(|slot| self.programs.get(slot))
            .ok_or(RenderError::UnknownHandle {
                kind: "shader program",
                id: handle.0,
            })
    }
}

impl RenderBackend for HeadlessRenderer {
    fn begin_frame(&mut self) -> RenderResult<()> {
        if self.in_frame {
            return Err(RenderError::FrameState("begin_frame inside an open frame"));
        }
        self.in_frame = true;
        self.pending = FrameStats {
            frames_presented: self.stats.frames_presented,
            ..FrameStats::default()
        };
        Ok(())
    }

    fn end_frame(&mut self) -> RenderResult<()> {
        if !self.in_frame {
            return Err(RenderError::FrameState("end_frame without begin_frame"));
        }
        self.in_frame = false;
        self.stats = FrameStats {
            frames_presented: self.pending.frames_presented + 1,
            ..self.pending
        };
        Ok(())
    }

    fn build_vertex_array(&mut self, mesh: &TriangleMesh) -> RenderResult<VertexArrayHandle> {
        if mesh.triangles().is_empty() {
            return Err(RenderError::VertexArray("mesh has no triangles".into()));
        }
        if !mesh.indices_in_bounds() {
            return Err(RenderError::VertexArray("triangle index out of range".into()));
        }
        let id = u32::try_from(self.vertex_arrays.len())
            .map_err(|_| RenderError::VertexArray("too many vertex arrays".into()))?;
        self.vertex_arrays.push(mesh.triangles().len() * 3);
        Ok(VertexArrayHandle(id))
    }

    fn build_shader_program(&mut self, vertex_source: &str, fragment_source: &str) -> RenderResult<ShaderProgramHandle> {
        if vertex_source.trim().is_empty() || fragment_source.trim().is_empty() {
            return Err(RenderError::ShaderBuild("empty shader source".into()));
        }
        let uniforms = declared_uniforms(vertex_source)
            .chain(declared_uniforms(fragment_source))
            .map(str::to_owned)
            .collect();
        let id = u32::try_from(self.programs.len())
            .map_err(|_| RenderError::ShaderBuild("too many programs".into()))?;
        self.programs.push(Program { uniforms });
        Ok(ShaderProgramHandle(id))
    }

    fn use_shader_program(&mut self, program: ShaderProgramHandle) -> RenderResult<()> {
        self.program(program)?;
        self.bound = Some(program);
        Ok(())
    }

    fn shader_uniform_location(&self, program: ShaderProgramHandle, name: &str) -> Option<UniformLocation> {
        let slot = self
            .program(program)
            .ok()?
            .uniforms
            .iter()
            .position(|uniform| uniform == name)?;
        Some(UniformLocation {
            program,
            slot: u32::try_from(slot).ok()?,
        })
    }

    fn shader_set_uniform(&mut self, location: UniformLocation, value: &Mat4) -> RenderResult<()> {
        if self.bound != Some(location.program) {
            return Err(RenderError::FrameState("uniform set on a program that is not bound"));
        }
        self.uniforms.insert(location, *value);
        self.pending.uniform_writes += 1;
        Ok(())
    }

    fn render_vertex_array(&mut self, vertex_array: VertexArrayHandle) -> RenderResult<()> {
        if !self.in_frame {
            return Err(RenderError::FrameState("draw outside a frame"));
        }
        if self.bound.is_none() {
            return Err(RenderError::FrameState("draw without a bound program"));
        }
        let known = usize::try_from(vertex_array.0).is_ok_and(|slot| slot < self.vertex_arrays.len());
        if !known {
            return Err(RenderError::UnknownHandle {
                kind: "vertex array",
                id: vertex_array.0,
            });
        }
        self.pending.draw_calls += 1;
        Ok(())
    }

    fn viewport_size(&self) -> (u32, u32) {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::foundation::memory::Arena;
    use crate::render::{Triangle, Vertex};

    const VERT: &str = "#version 330 core\nuniform mat4 M;\nuniform mat4 V;\nuniform mat4 P;\nvoid main() {}\n";
    const FRAG: &str = "#version 330 core\nout vec4 color;\nvoid main() {}\n";

    fn triangle(arena: &mut Arena) -> TriangleMesh {
        let mut mesh = TriangleMesh::carve(arena, 3, 1).unwrap();
        for position in [Vec3::zeros(), Vec3::x(), Vec3::y()] {
            mesh.push_vertex(Vertex::new(position)).unwrap();
        }
        mesh.push_triangle(Triangle { a: 0, b: 1, c: 2 }).unwrap();
        mesh
    }

    #[test]
    fn test_frame_counts_draws() {
        let mut arena = Arena::create("MESH", 1024).unwrap();
        let mut renderer = HeadlessRenderer::new(640, 480);
        let va = renderer.build_vertex_array(&triangle(&mut arena)).unwrap();
        let program = renderer.build_shader_program(VERT, FRAG).unwrap();

        renderer.begin_frame().unwrap();
        renderer.use_shader_program(program).unwrap();
        let m = renderer.shader_uniform_location(program, "M").unwrap();
        renderer.shader_set_uniform(m, &Mat4::identity()).unwrap();
        renderer.render_vertex_array(va).unwrap();
        renderer.render_vertex_array(va).unwrap();
        renderer.end_frame().unwrap();

        let stats = renderer.stats();
        assert_eq!(stats.frames_presented, 1);
        assert_eq!(stats.draw_calls, 2);
        assert_eq!(stats.uniform_writes, 1);
        assert_eq!(renderer.uniform_value(m), Some(&Mat4::identity()));
    }

    #[test]
    fn test_uniform_lookup() {
        let mut renderer = HeadlessRenderer::new(640, 480);
        let program = renderer.build_shader_program(VERT, FRAG).unwrap();
        assert!(renderer.shader_uniform_location(program, "P").is_some());
        assert!(renderer.shader_uniform_location(program, "missing").is_none());
        assert!(renderer
            .shader_uniform_location(ShaderProgramHandle(7), "M")
            .is_none());
    }

    #[test]
    fn test_call_order_is_validated() {
        let mut arena = Arena::create("MESH", 1024).unwrap();
        let mut renderer = HeadlessRenderer::new(640, 480);
        let va = renderer.build_vertex_array(&triangle(&mut arena)).unwrap();

        assert!(renderer.end_frame().is_err());
        assert!(renderer.render_vertex_array(va).is_err());
        renderer.begin_frame().unwrap();
        assert!(renderer.begin_frame().is_err());
        assert!(matches!(
            renderer.render_vertex_array(va),
            Err(RenderError::FrameState(_))
        ));
    }

    #[test]
    fn test_rejects_empty_inputs() {
        let mut arena = Arena::create("MESH", 1024).unwrap();
        let mut renderer = HeadlessRenderer::new(640, 480);
        let empty = TriangleMesh::carve(&mut arena, 0, 0).unwrap();
        assert!(renderer.build_vertex_array(&empty).is_err());

        let mut dangling = TriangleMesh::carve(&mut arena, 1, 1).unwrap();
        dangling.push_vertex(Vertex::new(Vec3::zeros())).unwrap();
        dangling.push_triangle(Triangle { a: 0, b: 0, c: 1 }).unwrap();
        assert!(renderer.build_vertex_array(&dangling).is_err());
        assert!(renderer.build_shader_program("", FRAG).is_err());
    }
}
