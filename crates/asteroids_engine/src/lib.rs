//! # Asteroids Engine
//!
//! Simulation core for a 2D asteroid field arcade game.
//!
//! ## Features
//!
//! - **Arena Memory**: Named bump arenas and fixed-capacity pools sized once at startup
//! - **Entity Store**: Dense entities with physics, render and sound components
//! - **Spatial Index**: Adaptive quadtree rebuilt from scratch every tick
//! - **Platform Seams**: Render, audio and input traits with headless implementations
//! - **Assets**: Arena-backed file reads and a forgiving OBJ mesh reader
//!
//! ## Quick Start
//!
//! ```rust
//! use asteroids_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut entity_arena = Arena::create("ENTITY", megabytes(1))?;
//!     let mut tree_arena = Arena::create("QUADTREE", megabytes(1))?;
//!
//!     let mut world = World::new(&mut entity_arena, 128)?;
//!     let mut tree = QuadTree::new(&mut tree_arena, QuadTreeCapacity { nodes: 1024, ids: 128 })?;
//!
//!     let rock = world.create_entity(ComponentMask::PHYSICS | ComponentMask::RENDER)?;
//!     if let Some(physics) = world.physics_mut(rock) {
//!         physics.aabb.pos = Vec3::new(250.0, -40.0, 0.0);
//!         physics.velocity = Vec3::new(-10.0, 0.0, 0.0);
//!     }
//!
//!     // One tick: integrate, then rebuild the index
//!     tree.init(8, 1000.0)?;
//!     if let Some(physics) = world.physics_mut(rock) {
//!         physics.integrate(1.0 / 60.0);
//!         tree.insert(rock, &physics.aabb);
//!     }
//!     assert_eq!(tree.id_count(), 1);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod audio;
pub mod config;
pub mod ecs;
pub mod foundation;
pub mod input;
pub mod render;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetError, ObjLimits, ObjLoader},
        audio::{AudioBackend, AudioError, RecordingAudio, SoundId},
        config::{Config, ConfigError},
        ecs::{ComponentMask, EcsError, EntityId, PhysicsComponent, RenderComponent, SoundComponent, World},
        foundation::{
            math::{Mat4, Vec3},
            memory::{kilobytes, megabytes, Arena, MemoryError, Pool},
            time::{Stopwatch, Timer},
        },
        input::{Action, InputSource, InputState, KeyBindings, ScriptedInput},
        render::{HeadlessRenderer, RenderBackend, RenderError, TriangleMesh, VertexArrayHandle},
        spatial::{Aabb, QuadTree, QuadTreeCapacity, SpatialError},
    };
}
