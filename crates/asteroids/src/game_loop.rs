//! Frame loop
//!
//! Each frame samples input, advances the simulation by the elapsed time and
//! draws the world. The spatial index is rebuilt from scratch every update.

use asteroids_engine::audio::AudioBackend;
use asteroids_engine::ecs::EntityId;
use asteroids_engine::foundation::math::{rotate_z, translation, trs_z, Vec3};
use asteroids_engine::foundation::time::{Stopwatch, Timer};
use asteroids_engine::input::{Action, InputSource, InputState};
use asteroids_engine::render::{RenderBackend, RenderResult, UniformLocation};
use asteroids_engine::spatial::{NodeIndex, QuadTree, QuadTreeCapacity};

use crate::camera::Camera;
use crate::context::{GameContext, ENGINE_SOUND_SLOT};
use crate::error::InitError;

/// Whether the loop is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    /// Built, or quit
    Stopped,
    /// Ticking
    Running,
}

/// Shader uniforms written every frame
#[derive(Debug, Clone, Copy)]
struct Uniforms {
    model: UniformLocation,
    view: UniformLocation,
    projection: UniformLocation,
}

/// Drives the game one frame at a time
pub struct Simulation<R, A> {
    context: GameContext<R, A>,
    tree: QuadTree,
    camera: Camera,
    input: InputState,
    uniforms: Uniforms,
    state: SimState,
    player_region: Option<NodeIndex>,
}

impl<R: RenderBackend, A: AudioBackend> Simulation<R, A> {
    /// Set up the spatial index, camera and shader uniforms for `context`
    ///
    /// # Errors
    ///
    /// The quadtree does not fit its arena, the world settings are invalid,
    /// or the shader lacks one of `M`, `V` and `P`.
    pub fn new(mut context: GameContext<R, A>) -> Result<Self, InitError> {
        let capacity = QuadTreeCapacity {
            nodes: context.config.world.quadtree_nodes,
            ids: context.config.world.max_entities,
        };
        let mut tree = QuadTree::new(context.quadtree_arena(), capacity)?;
        tree.init(context.config.world.quadtree_depth, context.config.world.half_edge)?;

        let lookup = |name: &'static str| {
            context
                .renderer
                .shader_uniform_location(context.shader, name)
                .ok_or(InitError::MissingUniform(name))
        };
        let uniforms = Uniforms {
            model: lookup("M")?,
            view: lookup("V")?,
            projection: lookup("P")?,
        };

        let camera = Camera::new(&context.config.camera, context.renderer.viewport_size());
        Ok(Self {
            context,
            tree,
            camera,
            input: InputState::new(),
            uniforms,
            state: SimState::Stopped,
            player_region: None,
        })
    }

    /// Enter the running state
    pub fn start(&mut self) {
        log::info!("Simulation running");
        self.state = SimState::Running;
    }

    /// Leave the running state; a frame in progress still completes
    pub fn quit(&mut self) {
        if self.state == SimState::Running {
            log::info!("Simulation stopped");
        }
        self.state = SimState::Stopped;
    }

    /// Tick on wall-clock time until quit or until `source` closes
    ///
    /// Returns the number of frames run.
    ///
    /// # Errors
    ///
    /// The first render failure, which also stops the loop.
    pub fn run(&mut self, source: &mut dyn InputSource) -> RenderResult<u64> {
        self.start();
        let mut timer = Timer::new();
        while self.state == SimState::Running {
            let delta_time = timer.update();
            if let Err(e) = self.tick(source, delta_time) {
                self.quit();
                return Err(e);
            }
        }
        log::info!(
            "Ran {} frames in {:.2}s ({:.1} fps)",
            timer.frame_count(),
            timer.total_time(),
            timer.average_fps()
        );
        Ok(timer.frame_count())
    }

    /// One frame: sample input, update by `delta_time` seconds, render
    ///
    /// Does nothing unless running. A quit request stops the loop once this
    /// frame has been updated and drawn.
    ///
    /// # Errors
    ///
    /// Whatever the render backend reports.
    pub fn tick(&mut self, source: &mut dyn InputSource, delta_time: f32) -> RenderResult<()> {
        if self.state != SimState::Running {
            return Ok(());
        }

        self.input.sample(source, &self.context.config.keys);
        if self.input.pressed(Action::QUIT) {
            self.quit();
        }

        let mut stopwatch = Stopwatch::start_new();
        self.update(delta_time);
        let update_ms = stopwatch.elapsed_millis();

        stopwatch.restart();
        self.render()?;
        log::trace!("update {update_ms:.3}ms, render {:.3}ms", stopwatch.elapsed_millis());
        Ok(())
    }

    /// Advance the world by `delta_time` seconds using the sampled input
    pub fn update(&mut self, delta_time: f32) {
        let player_position = self.update_player(delta_time);

        self.tree.finalize();
        let settings = &self.context.config.world;
        if let Err(e) = self.tree.init(settings.quadtree_depth, settings.half_edge) {
            log::error!("Spatial index reset failed: {e}");
        }

        let player = self.context.player;
        for index in 0..self.context.world.len() {
            let Ok(raw) = u32::try_from(index) else {
                break;
            };
            let id = EntityId::new(raw);
            if id == player {
                continue;
            }
            let (Some(physics), render) = self.context.world.physics_and_render_mut(id) else {
                continue;
            };
            physics.integrate(delta_time);
            if let Some(render) = render {
                render.world_transform = translation(physics.position());
            }
            self.tree.insert(id, &physics.aabb);
        }

        let dropped = self.tree.dropped_inserts();
        if dropped > 0 {
            log::debug!("{dropped} entities missing from the spatial index this frame");
        }
        self.camera.follow(&player_position);
    }

    /// Turn, thrust and fire; returns the player's position
    fn update_player(&mut self, delta_time: f32) -> Vec3 {
        let ship = &self.context.config.ship;
        let player = self.context.player;
        let input = &self.input;

        if input.pressed(Action::ZOOM_IN) {
            self.camera.zoom_in(delta_time);
        }
        if input.pressed(Action::ZOOM_OUT) {
            self.camera.zoom_out(delta_time);
        }

        let (Some(physics), render) = self.context.world.physics_and_render_mut(player) else {
            log::warn!("Player {player:?} has no physics component");
            return Vec3::zeros();
        };

        if input.pressed(Action::ROTATE_LEFT) {
            physics.orientation += ship.rotation_speed * delta_time;
        }
        if input.pressed(Action::ROTATE_RIGHT) {
            physics.orientation -= ship.rotation_speed * delta_time;
        }

        if input.pressed(Action::THRUST) {
            physics.velocity = rotate_z(&Vec3::y(), physics.orientation) * ship.speed;
            physics.integrate(delta_time);
        } else {
            physics.velocity = Vec3::zeros();
        }

        physics.aabb.half_edge = ship.scale;
        let position = *physics.position();
        let bounds = physics.aabb;
        if let Some(render) = render {
            render.world_transform = trs_z(&position, physics.orientation, ship.scale);
        }

        if input.just_pressed(Action::THRUST) {
            let engine = self
                .context
                .world
                .sound(player)
                .and_then(|sound| sound.sound(ENGINE_SOUND_SLOT));
            if let Some(engine) = engine {
                self.context.audio.play_sound(engine);
            }
        }

        if input.just_pressed(Action::SHOOT) {
            match self.context.spawn_projectile() {
                Ok(id) => log::debug!("Projectile {id:?} fired"),
                Err(e) => log::warn!("Projectile not fired: {e}"),
            }
        }

        self.player_region = self.tree.query(&bounds);
        if self.player_region.is_none() {
            log::trace!("Player at ({}, {}) is outside the world", position.x, position.y);
        }
        position
    }

    /// Draw every entity that has a mesh
    ///
    /// # Errors
    ///
    /// Whatever the render backend reports.
    pub fn render(&mut self) -> RenderResult<()> {
        let renderer = &mut self.context.renderer;
        renderer.begin_frame()?;
        renderer.use_shader_program(self.context.shader)?;
        renderer.shader_set_uniform(self.uniforms.view, self.camera.view())?;
        renderer.shader_set_uniform(self.uniforms.projection, self.camera.projection())?;

        for component in self.context.world.render_components() {
            let Some(vertex_array) = component.vertex_array else {
                continue;
            };
            renderer.shader_set_uniform(self.uniforms.model, &component.world_transform)?;
            renderer.render_vertex_array(vertex_array)?;
        }

        renderer.end_frame()
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> SimState {
        self.state
    }

    /// Game context
    #[must_use]
    pub const fn context(&self) -> &GameContext<R, A> {
        &self.context
    }

    /// Spatial index as rebuilt by the last update
    #[must_use]
    pub const fn quadtree(&self) -> &QuadTree {
        &self.tree
    }

    /// Camera
    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Node of the spatial index holding the player's bounds, as of the last
    /// update
    #[must_use]
    pub const fn player_region(&self) -> Option<NodeIndex> {
        self.player_region
    }
}
