//! Asteroids entry point
//!
//! Runs the game against the headless backends for a fixed number of frames
//! (`--frames=<n>`). Exits with 1 if startup fails.

use std::process::ExitCode;

use asteroids::{CommandLine, GameConfig, GameContext, Simulation};
use asteroids_engine::audio::RecordingAudio;
use asteroids_engine::config::Config;
use asteroids_engine::foundation::logging;
use asteroids_engine::input::ScriptedInput;
use asteroids_engine::render::HeadlessRenderer;

fn main() -> ExitCode {
    logging::init_with_default("info");

    let command_line = CommandLine::parse(std::env::args().skip(1));
    let mut config = GameConfig::load_or_default(&command_line.config_path);
    config.apply(&command_line);

    let renderer = HeadlessRenderer::new(config.window.width, config.window.height);
    let simulation = GameContext::new(config, renderer, RecordingAudio::new()).and_then(Simulation::new);
    let mut simulation = match simulation {
        Ok(simulation) => simulation,
        Err(e) => {
            log::error!("Startup failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let frames = usize::try_from(command_line.frames).unwrap_or(usize::MAX);
    let mut input = ScriptedInput::idle(frames);
    match simulation.run(&mut input) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Render failure: {e}");
            ExitCode::FAILURE
        }
    }
}
