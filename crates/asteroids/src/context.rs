//! Application context
//!
//! One [`GameContext`] is built at startup and owns every long-lived piece of
//! the game: the entity and quadtree arenas, the entity store, the render
//! and audio backends, the entity templates and the player's id. The FILEIO
//! and MESH arenas only live through asset loading. The frame loop borrows
//! the context.

use asteroids_engine::audio::AudioBackend;
use asteroids_engine::ecs::{ComponentMask, EcsError, EntityId, World};
use asteroids_engine::foundation::math::{constants::TAU, rotate_z, translation, trs_z, Vec3};
use asteroids_engine::foundation::memory::{megabytes, Arena};
use asteroids_engine::render::{RenderBackend, ShaderProgramHandle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GameConfig;
use crate::error::InitError;
use crate::templates::{EntityTemplate, TemplateLoader};

/// Sound slot of the ship's engine
pub const ENGINE_SOUND_SLOT: usize = 0;

/// Sound slot of an asteroid's explosion
pub const EXPLOSION_SOUND_SLOT: usize = 0;

/// Templates for every entity kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Templates {
    /// Player ship
    pub ship: EntityTemplate,
    /// Asteroid
    pub asteroid: EntityTemplate,
    /// Projectile
    pub projectile: EntityTemplate,
}

/// Everything the game owns between startup and shutdown
#[derive(Debug)]
pub struct GameContext<R, A> {
    /// Settings in effect
    pub config: GameConfig,

    /// Render backend
    pub renderer: R,

    /// Audio backend
    pub audio: A,

    /// Entity store
    pub world: World,

    /// The ship the input drives
    pub player: EntityId,

    /// Entity templates
    pub templates: Templates,

    /// Program every entity is drawn with
    pub shader: ShaderProgramHandle,

    entities: Arena,
    quadtree: Arena,
}

impl<R: RenderBackend, A: AudioBackend> GameContext<R, A> {
    /// Build the game: carve arenas, load assets, spawn the player and the
    /// asteroid field, then start the music
    ///
    /// # Errors
    ///
    /// Any arena, asset, renderer, audio or entity failure.
    pub fn new(config: GameConfig, mut renderer: R, mut audio: A) -> Result<Self, InitError> {
        let memory = &config.memory;
        let mut file_io = Arena::create("FILEIO", megabytes(memory.file_io_mb))?;
        let mut meshes = Arena::create("MESH", megabytes(memory.mesh_mb))?;
        let mut entities = Arena::create("ENTITY", megabytes(memory.entity_mb))?;
        let quadtree = Arena::create("QUADTREE", megabytes(memory.quadtree_mb))?;

        let paths = &config.assets;
        let mut loader = TemplateLoader::new(paths, &mut file_io, &mut meshes);
        let shader = loader.load_shader_program(&mut renderer)?;

        let engine = loader.load_sound(&mut audio, &paths.ship_sound)?;
        let explosion = loader.load_sound(&mut audio, &paths.asteroid_sound)?;
        let templates = Templates {
            ship: loader
                .load_template(&mut renderer, &paths.ship_mesh)?
                .with_sound(ENGINE_SOUND_SLOT, engine),
            asteroid: loader
                .load_template(&mut renderer, &paths.asteroid_mesh)?
                .with_sound(EXPLOSION_SOUND_SLOT, explosion),
            projectile: loader.load_template(&mut renderer, &paths.projectile_mesh)?,
        };
        log::info!(
            "Assets loaded, {} of {} bytes of file scratch and {} of {} bytes of mesh storage used",
            file_io.used(),
            file_io.capacity(),
            meshes.used(),
            meshes.capacity()
        );
        file_io.free();
        meshes.free();

        let mut world = World::new(&mut entities, config.world.max_entities)?;
        let player = spawn_player(&mut world, &templates.ship, config.ship.scale)?;

        let seed = config.world.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..config.world.asteroid_count {
            let half_edge = templates.asteroid.half_edge;
            let position = random_position(&mut rng, config.world.half_edge - half_edge);
            let velocity = random_drift(&mut rng, config.world.asteroid_drift);
            spawn_asteroid(&mut world, &templates.asteroid, position, velocity)?;
        }
        log::info!(
            "Spawned {} asteroids (seed {seed}), {} entities total",
            config.world.asteroid_count,
            world.len()
        );

        let music = paths.resolve(&paths.music);
        match audio.load_music(&music) {
            Ok(()) => audio.play_music(),
            Err(e) => log::warn!("Playing without music: {e}"),
        }

        Ok(Self {
            config,
            renderer,
            audio,
            world,
            player,
            templates,
            shader,
            entities,
            quadtree,
        })
    }

    /// Fire a projectile from the player's current position and heading
    ///
    /// # Errors
    ///
    /// [`EcsError`] when the entity store is full.
    pub fn spawn_projectile(&mut self) -> Result<EntityId, EcsError> {
        let (position, orientation) = self
            .world
            .physics(self.player)
            .map(|physics| (*physics.position(), physics.orientation))
            .unwrap_or_default();
        let speed = self.config.ship.speed * self.config.ship.projectile_speed_factor;
        spawn_projectile(&mut self.world, &self.templates.projectile, position, orientation, speed)
    }

    /// Arena the spatial index is carved from
    pub fn quadtree_arena(&mut self) -> &mut Arena {
        &mut self.quadtree
    }
}

/// Uniform position in the square of half-edge `extent` around the origin
fn random_position(rng: &mut impl Rng, extent: f32) -> Vec3 {
    let extent = extent.max(0.0);
    Vec3::new(rng.gen_range(-extent..=extent), rng.gen_range(-extent..=extent), 0.0)
}

/// Random heading at a speed up to `max_speed`
fn random_drift(rng: &mut impl Rng, max_speed: f32) -> Vec3 {
    let speed = rng.gen_range(0.0..=max_speed.max(0.0));
    rotate_z(&Vec3::y(), rng.gen_range(0.0..TAU)) * speed
}

fn apply_template(world: &mut World, id: EntityId, template: &EntityTemplate) {
    if let Some(render) = world.render_mut(id) {
        render.vertex_array = Some(template.vertex_array);
    }
    if let Some(sound) = world.sound_mut(id) {
        sound.sounds = template.sounds;
    }
    if let Some(physics) = world.physics_mut(id) {
        physics.aabb.half_edge = template.half_edge;
    }
}

/// Spawn the ship at the origin, facing +Y
///
/// # Errors
///
/// [`EcsError`] when the entity store is full.
pub fn spawn_player(world: &mut World, template: &EntityTemplate, scale: f32) -> Result<EntityId, EcsError> {
    let id = world.create_entity(ComponentMask::PHYSICS | ComponentMask::RENDER | ComponentMask::SOUND)?;
    apply_template(world, id, template);

    let (physics, render) = world.physics_and_render_mut(id);
    if let Some(physics) = physics {
        physics.aabb.half_edge = scale;
    }
    if let Some(render) = render {
        render.world_transform = trs_z(&Vec3::zeros(), 0.0, scale);
    }
    Ok(id)
}

/// Spawn an asteroid at `position` drifting with `velocity`
///
/// # Errors
///
/// [`EcsError`] when the entity store is full.
pub fn spawn_asteroid(
    world: &mut World,
    template: &EntityTemplate,
    position: Vec3,
    velocity: Vec3,
) -> Result<EntityId, EcsError> {
    let id = world.create_entity(ComponentMask::PHYSICS | ComponentMask::RENDER | ComponentMask::SOUND)?;
    apply_template(world, id, template);

    let (physics, render) = world.physics_and_render_mut(id);
    if let Some(physics) = physics {
        physics.aabb.pos = position;
        physics.velocity = velocity;
    }
    if let Some(render) = render {
        render.world_transform = translation(&position);
    }
    Ok(id)
}

/// Spawn a projectile at `position` flying along `orientation` at `speed`
///
/// # Errors
///
/// [`EcsError`] when the entity store is full.
pub fn spawn_projectile(
    world: &mut World,
    template: &EntityTemplate,
    position: Vec3,
    orientation: f32,
    speed: f32,
) -> Result<EntityId, EcsError> {
    let id = world.create_entity(ComponentMask::PHYSICS | ComponentMask::RENDER)?;
    apply_template(world, id, template);

    let (physics, render) = world.physics_and_render_mut(id);
    if let Some(physics) = physics {
        physics.aabb.pos = position;
        physics.orientation = orientation;
        physics.velocity = rotate_z(&Vec3::y(), orientation) * speed;
    }
    if let Some(render) = render {
        render.world_transform = translation(&position);
    }
    Ok(id)
}
