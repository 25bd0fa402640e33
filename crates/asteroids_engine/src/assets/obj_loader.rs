//! OBJ file loader for 3D models
//!
//! Reads `v x y z` positions and `f` faces (`f 1 2 3`, `f 1/1/1 2/2/2 3/3/3`
//! and polygons, which are fan-triangulated). Comments, blank lines and
//! other record types are ignored. A malformed `v` or `f` line is logged
//! and skipped rather than failing the whole mesh.

use super::AssetError;
use crate::foundation::math::Vec3;
use crate::foundation::memory::Arena;
use crate::render::{Triangle, TriangleMesh, Vertex};

/// Caps on the size of a parsed mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjLimits {
    /// Maximum vertex positions
    pub max_vertices: usize,
    /// Maximum triangles after fan triangulation
    pub max_triangles: usize,
}

impl Default for ObjLimits {
    fn default() -> Self {
        Self {
            max_vertices: 4096,
            max_triangles: 4096,
        }
    }
}

/// Wavefront OBJ reader
pub struct ObjLoader;

fn parse_position(fields: &[&str]) -> Option<Vec3> {
    match fields {
        [x, y, z, ..] => Some(Vec3::new(x.parse().ok()?, y.parse().ok()?, z.parse().ok()?)),
        _ => None,
    }
}

/// Zero-based position index from a face corner like `7`, `7/2` or `7/2/5`
fn parse_corner(corner: &str) -> Option<u32> {
    let one_based: u32 = corner.split('/').next()?.parse().ok()?;
    one_based.checked_sub(1)
}

fn parse_face(fields: &[&str]) -> Option<Vec<u32>> {
    if fields.len() < 3 {
        return None;
    }
    fields.iter().map(|corner| parse_corner(corner)).collect()
}

/// `(line number, trimmed line, record type, fields)` for every record
fn records(source: &str) -> impl Iterator<Item = (usize, &str, &str, Vec<&str>)> + '_ {
    source.lines().enumerate().filter_map(|(number, line)| {
        let line = line.trim();
        if line.starts_with('#') {
            return None;
        }
        let mut fields = line.split_whitespace();
        let record = fields.next()?;
        Some((number + 1, line, record, fields.collect()))
    })
}

impl ObjLoader {
    /// Parse OBJ text into a triangle mesh carved from `arena`
    ///
    /// Records are counted first so the mesh arrays are carved once at their
    /// final size.
    ///
    /// # Errors
    ///
    /// Fails when a limit in `limits` is exceeded, when the arena cannot hold
    /// the mesh or when no valid triangle remains.
    pub fn parse(source: &str, limits: ObjLimits, arena: &mut Arena) -> Result<TriangleMesh, AssetError> {
        let (mut vertex_records, mut triangle_records) = (0_usize, 0_usize);
        for (_, _, record, fields) in records(source) {
            match record {
                "v" => vertex_records += 1,
                "f" => triangle_records += fields.len().saturating_sub(2),
                _ => {}
            }
        }
        if vertex_records > limits.max_vertices {
            return Err(AssetError::TooManyVertices {
                max: limits.max_vertices,
            });
        }
        if triangle_records > limits.max_triangles {
            return Err(AssetError::TooManyTriangles {
                max: limits.max_triangles,
            });
        }

        let mut mesh = TriangleMesh::carve(arena, vertex_records, triangle_records)?;
        for (number, line, record, fields) in records(source) {
            match record {
                "v" => match parse_position(&fields) {
                    Some(position) => {
                        mesh.push_vertex(Vertex::new(position))?;
                    }
                    None => log::warn!("OBJ line {number}: malformed vertex '{line}'"),
                },
                "f" => {
                    let Some(corners) = parse_face(&fields) else {
                        log::warn!("OBJ line {number}: malformed face '{line}'");
                        continue;
                    };
                    for pair in corners[1..].windows(2) {
                        mesh.push_triangle(Triangle {
                            a: corners[0],
                            b: pair[0],
                            c: pair[1],
                        })?;
                    }
                }
                _ => {}
            }
        }

        let dropped = mesh.drop_dangling_triangles();
        if dropped > 0 {
            log::warn!("OBJ: dropped {dropped} triangles referencing missing vertices");
        }
        if mesh.triangles().is_empty() {
            return Err(AssetError::EmptyMesh);
        }
        Ok(mesh)
    }
}
