//! Triangle meshes

use crate::foundation::math::Vec3;
use crate::foundation::memory::{Arena, MemoryError, Pool};
use crate::spatial::Aabb;

/// Mesh vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Model-space position
    pub position: Vec3,
}

impl Vertex {
    /// Vertex at `position`
    #[must_use]
    pub const fn new(position: Vec3) -> Self {
        Self { position }
    }
}

/// Three zero-based vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    /// First corner
    pub a: u32,
    /// Second corner
    pub b: u32,
    /// Third corner
    pub c: u32,
}

impl Triangle {
    /// Corner indices in order
    #[must_use]
    pub const fn indices(&self) -> [u32; 3] {
        [self.a, self.b, self.c]
    }

    fn in_bounds(&self, vertex_count: usize) -> bool {
        self.indices()
            .iter()
            .all(|&i| usize::try_from(i).is_ok_and(|i| i < vertex_count))
    }
}

/// Indexed triangle list carved from an arena
#[derive(Debug)]
pub struct TriangleMesh {
    vertices: Pool<Vertex>,
    triangles: Pool<Triangle>,
}

impl TriangleMesh {
    /// Empty mesh with room for `max_vertices` and `max_triangles`
    ///
    /// # Errors
    ///
    /// [`MemoryError`] if either array does not fit in `arena`.
    pub fn carve(arena: &mut Arena, max_vertices: usize, max_triangles: usize) -> Result<Self, MemoryError> {
        Ok(Self {
            vertices: Pool::carve(arena, max_vertices)?,
            triangles: Pool::carve(arena, max_triangles)?,
        })
    }

    /// Append a vertex, returning its index
    ///
    /// # Errors
    ///
    /// [`MemoryError::CapacityExceeded`] when the vertex array is full.
    pub fn push_vertex(&mut self, vertex: Vertex) -> Result<usize, MemoryError> {
        self.vertices.push(vertex)
    }

    /// Append a triangle, returning its index
    ///
    /// # Errors
    ///
    /// [`MemoryError::CapacityExceeded`] when the triangle array is full.
    pub fn push_triangle(&mut self, triangle: Triangle) -> Result<usize, MemoryError> {
        self.triangles.push(triangle)
    }

    /// Drop triangles referring to a vertex that does not exist; returns how
    /// many were dropped
    pub fn drop_dangling_triangles(&mut self) -> usize {
        let vertex_count = self.vertices.len();
        let before = self.triangles.len();
        self.triangles.retain(|triangle| triangle.in_bounds(vertex_count));
        before - self.triangles.len()
    }

    /// Vertex positions
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        self.vertices.as_slice()
    }

    /// Triangles indexing into [`TriangleMesh::vertices`]
    #[must_use]
    pub fn triangles(&self) -> &[Triangle] {
        self.triangles.as_slice()
    }

    /// Grow `aabb`'s half-edge until every vertex fits around its center
    pub fn fit_aabb(&self, aabb: &mut Aabb) {
        for vertex in self.vertices() {
            aabb.update_edge(&vertex.position);
        }
    }

    /// Whether every triangle index refers to an existing vertex
    #[must_use]
    pub fn indices_in_bounds(&self) -> bool {
        let vertex_count = self.vertices.len();
        self.triangles.iter().all(|triangle| triangle.in_bounds(vertex_count))
    }
}
