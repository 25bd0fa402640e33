//! Entity templates
//!
//! Every kind of entity (ship, asteroid, projectile) is drawn from one mesh
//! and may carry sounds. Mesh and shader files are read into the FILEIO
//! arena and meshes are parsed into the MESH arena, where they stay until
//! the arena is freed after upload.

use std::path::Path;

use asteroids_engine::assets::{file_io, ObjLimits, ObjLoader};
use asteroids_engine::audio::{AudioBackend, SoundId};
use asteroids_engine::ecs::MAX_COMPONENT_SOUNDS;
use asteroids_engine::foundation::memory::Arena;
use asteroids_engine::render::{RenderBackend, ShaderProgramHandle, TriangleMesh, VertexArrayHandle};
use asteroids_engine::spatial::Aabb;

use crate::config::AssetPaths;
use crate::error::InitError;

/// What every entity of one kind shares
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityTemplate {
    /// Uploaded mesh
    pub vertex_array: VertexArrayHandle,

    /// Half-edge enclosing every mesh vertex around the model origin
    pub half_edge: f32,

    /// Samples by slot
    pub sounds: [Option<SoundId>; MAX_COMPONENT_SOUNDS],
}

impl EntityTemplate {
    /// Template for an uploaded mesh with no sounds
    #[must_use]
    pub fn new(vertex_array: VertexArrayHandle, mesh: &TriangleMesh) -> Self {
        let mut bounds = Aabb::default();
        mesh.fit_aabb(&mut bounds);
        Self {
            vertex_array,
            half_edge: bounds.half_edge,
            sounds: [None; MAX_COMPONENT_SOUNDS],
        }
    }

    /// Put `sound` in `slot`; out-of-range slots are ignored
    #[must_use]
    pub fn with_sound(mut self, slot: usize, sound: SoundId) -> Self {
        if let Some(entry) = self.sounds.get_mut(slot) {
            *entry = Some(sound);
        } else {
            log::warn!("Sound slot {slot} out of range, sample {sound:?} not attached");
        }
        self
    }
}

/// Reads startup assets through the arenas
pub struct TemplateLoader<'a> {
    paths: &'a AssetPaths,
    file_io: &'a mut Arena,
    meshes: &'a mut Arena,
}

impl<'a> TemplateLoader<'a> {
    /// Loader reading files into `file_io` and parsing meshes into `meshes`
    pub fn new(paths: &'a AssetPaths, file_io: &'a mut Arena, meshes: &'a mut Arena) -> Self {
        Self { paths, file_io, meshes }
    }

    /// Read and parse an OBJ mesh into the MESH arena
    ///
    /// # Errors
    ///
    /// IO and parse failures, or either arena running out.
    pub fn load_mesh(&mut self, relative: &Path) -> Result<TriangleMesh, InitError> {
        let paths = self.paths;
        let limits = ObjLimits {
            max_vertices: paths.max_mesh_vertices,
            max_triangles: paths.max_mesh_triangles,
        };
        let path = paths.resolve(relative);
        let source = read_text(self.file_io, &path, paths.max_mesh_bytes)?;
        let mesh = ObjLoader::parse(source, limits, self.meshes).map_err(InitError::asset(&path))?;

        log::info!(
            "Loaded mesh {}: {} vertices, {} triangles, [{}] {} of {} bytes used",
            relative.display(),
            mesh.vertices().len(),
            mesh.triangles().len(),
            self.meshes.tag(),
            self.meshes.used(),
            self.meshes.capacity()
        );
        Ok(mesh)
    }

    /// Load a mesh, upload it and derive its bounds
    ///
    /// # Errors
    ///
    /// Mesh loading failures and upload refusals.
    pub fn load_template(&mut self, renderer: &mut dyn RenderBackend, mesh: &Path) -> Result<EntityTemplate, InitError> {
        let mesh = self.load_mesh(mesh)?;
        let vertex_array = renderer.build_vertex_array(&mesh)?;
        Ok(EntityTemplate::new(vertex_array, &mesh))
    }

    /// Load a sample
    ///
    /// # Errors
    ///
    /// Whatever the audio backend reports.
    pub fn load_sound(&self, audio: &mut dyn AudioBackend, relative: &Path) -> Result<SoundId, InitError> {
        Ok(audio.load_sound(&self.paths.resolve(relative))?)
    }

    /// Read both shader sources and build the program
    ///
    /// # Errors
    ///
    /// IO failures and compile or link errors.
    pub fn load_shader_program(&mut self, renderer: &mut dyn RenderBackend) -> Result<ShaderProgramHandle, InitError> {
        let paths = self.paths;
        let vertex = read_text(self.file_io, &paths.resolve(&paths.vertex_shader), paths.max_shader_bytes)?.to_owned();
        let fragment = read_text(self.file_io, &paths.resolve(&paths.fragment_shader), paths.max_shader_bytes)?;
        Ok(renderer.build_shader_program(&vertex, fragment)?)
    }
}

/// Read a text file into `file_io`
fn read_text<'f>(scratch: &'f mut Arena, path: &Path, max_size: usize) -> Result<&'f str, InitError> {
    let block = file_io::read_bytes(scratch, path, max_size).map_err(InitError::asset(path))?;
    file_io::text(scratch, block).map_err(InitError::asset(path))
}
