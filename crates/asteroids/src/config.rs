//! Game configuration
//!
//! Loaded once at startup from `asteroids.toml` (or `.ron`) next to the
//! working directory; every field has a default so a partial file, or no
//! file at all, is fine. A few settings can be overridden on the command
//! line.

use std::path::{Path, PathBuf};

use asteroids_engine::config::Config;
use asteroids_engine::foundation::math::radians;
use asteroids_engine::input::KeyBindings;
use serde::{Deserialize, Serialize};

/// Default configuration file
pub const DEFAULT_CONFIG_PATH: &str = "asteroids.toml";

/// Frames a headless run lasts when `--frames` is not given
pub const DEFAULT_HEADLESS_FRAMES: u64 = 600;

/// Complete game configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Window settings
    pub window: WindowConfig,

    /// Key bindings
    pub keys: KeyBindings,

    /// World size and population
    pub world: WorldConfig,

    /// Player ship handling
    pub ship: ShipConfig,

    /// Camera zoom limits
    pub camera: CameraConfig,

    /// Arena budgets
    pub memory: MemoryConfig,

    /// Asset locations
    pub assets: AssetPaths,
}

impl Config for GameConfig {}

/// Window configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width
    pub width: u32,

    /// Window height
    pub height: u32,

    /// Fullscreen mode
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            fullscreen: false,
        }
    }
}

/// World configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Half-edge of the square world, centered at the origin
    pub half_edge: f32,

    /// Entity store capacity
    pub max_entities: usize,

    /// Deepest quadtree level, root is level 1
    pub quadtree_depth: u32,

    /// Quadtree node budget per tick
    pub quadtree_nodes: usize,

    /// Asteroids spawned at startup
    pub asteroid_count: usize,

    /// Upper bound on asteroid drift speed, units per second
    pub asteroid_drift: f32,

    /// Seed for asteroid placement; random when absent
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            half_edge: 100_000.0,
            max_entities: 10_000,
            quadtree_depth: 10,
            quadtree_nodes: 65_536,
            asteroid_count: 5_000,
            asteroid_drift: 40.0,
            seed: None,
        }
    }
}

/// Ship handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    /// Turn rate, radians per second
    pub rotation_speed: f32,

    /// Speed while thrusting, units per second
    pub speed: f32,

    /// Projectile speed as a multiple of `speed`
    pub projectile_speed_factor: f32,

    /// Model scale; also the ship's bounding half-edge
    pub scale: f32,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            // Half a degree per millisecond
            rotation_speed: radians(500.0),
            speed: 500.0,
            projectile_speed_factor: 3.0,
            scale: 15.0,
        }
    }
}

/// Orthographic view limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Narrowest half-height of the view
    pub min_half_width: f32,

    /// Widest half-height of the view
    pub max_half_width: f32,

    /// Zoom rate, units of half-width per second
    pub zoom_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_half_width: 1_000.0,
            max_half_width: 100_000.0,
            zoom_speed: 600.0,
        }
    }
}

/// Arena sizes in megabytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Scratch for reading asset files; released after startup
    pub file_io_mb: usize,

    /// Parsed meshes
    pub mesh_mb: usize,

    /// Entity and component arrays
    pub entity_mb: usize,

    /// Quadtree nodes and ids
    pub quadtree_mb: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            file_io_mb: 10,
            mesh_mb: 10,
            entity_mb: 10,
            quadtree_mb: 16,
        }
    }
}

/// Asset file locations, relative to `root`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    /// Directory the other paths are relative to
    pub root: PathBuf,

    /// Ship mesh
    pub ship_mesh: PathBuf,

    /// Asteroid mesh
    pub asteroid_mesh: PathBuf,

    /// Projectile mesh
    pub projectile_mesh: PathBuf,

    /// Vertex shader source
    pub vertex_shader: PathBuf,

    /// Fragment shader source
    pub fragment_shader: PathBuf,

    /// Engine sound
    pub ship_sound: PathBuf,

    /// Asteroid explosion sound
    pub asteroid_sound: PathBuf,

    /// Background music
    pub music: PathBuf,

    /// Largest mesh file accepted, in bytes
    pub max_mesh_bytes: usize,

    /// Largest shader file accepted, in bytes
    pub max_shader_bytes: usize,

    /// Vertex cap per mesh
    pub max_mesh_vertices: usize,

    /// Triangle cap per mesh
    pub max_mesh_triangles: usize,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            ship_mesh: PathBuf::from("meshes/ship.obj"),
            asteroid_mesh: PathBuf::from("meshes/asteroid.obj"),
            projectile_mesh: PathBuf::from("meshes/projectile.obj"),
            vertex_shader: PathBuf::from("shaders/main.vert"),
            fragment_shader: PathBuf::from("shaders/main.frag"),
            ship_sound: PathBuf::from("sounds/ship-propulsion.wav"),
            asteroid_sound: PathBuf::from("sounds/asteroid-explosion.wav"),
            music: PathBuf::from("sounds/music.mp3"),
            max_mesh_bytes: 100 * 1024,
            max_shader_bytes: 10 * 1024,
            max_mesh_vertices: 4096,
            max_mesh_triangles: 4096,
        }
    }
}

impl AssetPaths {
    /// `relative` resolved against `root`
    #[must_use]
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }
}

/// Settings taken from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Configuration file to load
    pub config_path: PathBuf,

    /// `--fullscreen`
    pub fullscreen: bool,

    /// `--w=<pixels>`
    pub width: Option<u32>,

    /// `--h=<pixels>`
    pub height: Option<u32>,

    /// `--frames=<n>`, length of a headless run
    pub frames: u64,

    /// `--seed=<n>`
    pub seed: Option<u64>,
}

impl Default for CommandLine {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            fullscreen: false,
            width: None,
            height: None,
            frames: DEFAULT_HEADLESS_FRAMES,
            seed: None,
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Option<T> {
    let parsed = value.parse().ok();
    if parsed.is_none() {
        log::warn!("Ignoring {key}: '{value}' is not a valid value");
    }
    parsed
}

impl CommandLine {
    /// Parse arguments (program name excluded); unknown arguments are
    /// logged and skipped
    #[must_use]
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut command_line = Self::default();

        for arg in args {
            let arg = arg.as_ref();
            if arg == "--fullscreen" {
                command_line.fullscreen = true;
                continue;
            }

            let (key, value) = arg.split_once('=').unwrap_or((arg, ""));
            match key {
                "--w" | "--width" => {
                    if let Some(width) = parse_value(key, value) {
                        command_line.width = Some(width);
                    }
                }
                "--h" | "--height" => {
                    if let Some(height) = parse_value(key, value) {
                        command_line.height = Some(height);
                    }
                }
                "--frames" => {
                    if let Some(frames) = parse_value(key, value) {
                        command_line.frames = frames;
                    }
                }
                "--seed" => command_line.seed = parse_value(key, value),
                "--config" if !value.is_empty() => command_line.config_path = PathBuf::from(value),
                _ => log::warn!("Ignoring unknown argument '{arg}'"),
            }
        }

        command_line
    }
}

impl GameConfig {
    /// Apply command-line overrides on top of file settings
    pub fn apply(&mut self, command_line: &CommandLine) {
        if command_line.fullscreen {
            self.window.fullscreen = true;
        }
        if let Some(width) = command_line.width {
            self.window.width = width;
        }
        if let Some(height) = command_line.height {
            self.window.height = height;
        }
        if command_line.seed.is_some() {
            self.world.seed = command_line.seed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use asteroids_engine::config::ConfigFormat;
    use asteroids_engine::input::Scancode;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 768);
        assert_eq!(config.world.max_entities, 10_000);
        assert_eq!(config.keys.thrust, Scancode(98));
        assert_relative_eq!(config.ship.rotation_speed, 0.5_f32.to_radians() * 1000.0, epsilon = 1e-4);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let text = "[window]\nfullscreen = true\n\n[keys]\nshoot = 57\n\n[world]\nasteroid_count = 12\n";
        let config = GameConfig::from_str_with(text, ConfigFormat::Toml).unwrap();
        assert!(config.window.fullscreen);
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.keys.shoot, Scancode(57));
        assert_eq!(config.keys.quit, Scancode(41));
        assert_eq!(config.world.asteroid_count, 12);
    }

    #[test]
    fn test_command_line_overrides() {
        let command_line = CommandLine::parse(["--fullscreen", "--w=800", "--h=600", "--frames=5", "--seed=9"]);
        assert_eq!(command_line.frames, 5);

        let mut config = GameConfig::default();
        config.apply(&command_line);
        assert!(config.window.fullscreen);
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.world.seed, Some(9));
    }

    #[test]
    fn test_bad_arguments_are_ignored() {
        let command_line = CommandLine::parse(["--w=wide", "--volume=11", "--config=custom.ron"]);
        assert_eq!(command_line.width, None);
        assert_eq!(command_line.config_path, PathBuf::from("custom.ron"));
        assert_eq!(command_line.frames, DEFAULT_HEADLESS_FRAMES);
    }

    #[test]
    fn test_asset_paths_resolve_against_root() {
        let assets = AssetPaths {
            root: PathBuf::from("/data"),
            ..AssetPaths::default()
        };
        assert_eq!(assets.resolve(&assets.ship_mesh), PathBuf::from("/data/meshes/ship.obj"));
    }
}
