//! Asteroid field arcade game
//!
//! A ship flies through a field of drifting asteroids. Startup builds a
//! [`context::GameContext`] from a [`config::GameConfig`]; a
//! [`game_loop::Simulation`] then ticks it until quit.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod camera;
pub mod config;
pub mod context;
pub mod error;
pub mod game_loop;
pub mod templates;

pub use config::{CommandLine, GameConfig};
pub use context::GameContext;
pub use error::InitError;
pub use game_loop::{SimState, Simulation};
