//! Startup failures

use std::path::PathBuf;

use asteroids_engine::assets::AssetError;
use asteroids_engine::audio::AudioError;
use asteroids_engine::ecs::EcsError;
use asteroids_engine::foundation::memory::MemoryError;
use asteroids_engine::render::RenderError;
use asteroids_engine::spatial::SpatialError;

/// Anything that stops the game from starting
///
/// The binary logs the error and exits with code 1.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    /// Arena creation or carving failed
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    /// Entity store could not be built or populated
    #[error("Entity store error: {0}")]
    Ecs(#[from] EcsError),

    /// Spatial index could not be built
    #[error("Spatial index error: {0}")]
    Spatial(#[from] SpatialError),

    /// An asset file could not be read or parsed
    #[error("Failed to load {}: {source}", path.display())]
    Asset {
        /// File being loaded
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: AssetError,
    },

    /// Renderer refused a resource
    #[error("Renderer error: {0}")]
    Render(#[from] RenderError),

    /// Audio device or sample failure
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// The shader program does not declare a required uniform
    #[error("Shader program has no uniform '{0}'")]
    MissingUniform(&'static str),
}

impl InitError {
    /// Wrap an asset failure with the file it came from
    pub fn asset(path: impl Into<PathBuf>) -> impl FnOnce(AssetError) -> Self {
        let path = path.into();
        move |source| Self::Asset { path, source }
    }
}
